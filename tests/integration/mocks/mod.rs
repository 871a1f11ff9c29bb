//! Mock implementations for integration tests.
//!
//! - [`MockWalletCapability`] / [`MockWavePortalRemote`]: scripted trait mocks
//! - [`InMemoryPortal`]: a stateful contract double that finalizes waves and feeds live events

mod portal;

pub use portal::InMemoryPortal;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use mockall::mock;
use wave_portal_client::{
	models::{Finalization, SubmissionHandle, Wave},
	services::{
		contract::{ContractError, WavePortalRemote, WaveStream},
		wallet::{WalletCapability, WalletError},
	},
};

mock! {
	/// Mock implementation of the wallet capability.
	pub WalletCapability {}

	#[async_trait]
	impl WalletCapability for WalletCapability {
		async fn is_available(&self) -> bool;
		async fn request_accounts(&self, interactive: bool) -> Result<Vec<Address>, WalletError>;
	}
}

mock! {
	/// Mock implementation of the remote wave portal contract.
	pub WavePortalRemote {}

	#[async_trait]
	impl WavePortalRemote for WavePortalRemote {
		async fn get_all_waves(&self) -> Result<Vec<Wave>, ContractError>;
		async fn get_total_waves(&self) -> Result<U256, ContractError>;
		async fn get_balance(&self) -> Result<U256, ContractError>;
		async fn send_wave(
			&self,
			from: Address,
			message: String,
			cost_ceiling: u64,
		) -> Result<SubmissionHandle, ContractError>;
		async fn await_finalization(
			&self,
			handle: SubmissionHandle,
		) -> Result<Finalization, ContractError>;
		async fn watch_waves(&self) -> Result<WaveStream, ContractError>;
	}
}

/// Wallet that has already granted `account` and grants it again on request
pub fn granted_wallet(account: Address) -> MockWalletCapability {
	let mut wallet = MockWalletCapability::new();
	wallet.expect_is_available().returning(|| true);
	wallet
		.expect_request_accounts()
		.returning(move |_| Ok(vec![account]));
	wallet
}
