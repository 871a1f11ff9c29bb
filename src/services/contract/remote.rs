//! Capability interface of the remote contract.
//!
//! This is the seam between the facade and whatever actually talks to the chain. The alloy
//! implementation lives in `alloy_portal.rs`; tests script it with mocks.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::{
	models::{Finalization, SubmissionHandle, Wave},
	services::contract::ContractError,
};

/// Live stream of newly finalized waves, in finalization order
pub type WaveStream = BoxStream<'static, Result<Wave, ContractError>>;

/// Request/response and publish/subscribe operations of the wave portal contract
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WavePortalRemote: Send + Sync {
	/// `getAllWaves()`, in the contract's storage order
	async fn get_all_waves(&self) -> Result<Vec<Wave>, ContractError>;

	/// `getTotalWaves()`
	async fn get_total_waves(&self) -> Result<U256, ContractError>;

	/// Balance held by the contract, in wei
	async fn get_balance(&self) -> Result<U256, ContractError>;

	/// Sends `wave(message)` from `from` with `cost_ceiling` as gas limit
	///
	/// Returns once the node has accepted the transaction and issued its hash.
	async fn send_wave(
		&self,
		from: Address,
		message: String,
		cost_ceiling: u64,
	) -> Result<SubmissionHandle, ContractError>;

	/// Resolves once the submission is included, with its execution outcome
	///
	/// Does not time out on its own.
	async fn await_finalization(
		&self,
		handle: SubmissionHandle,
	) -> Result<Finalization, ContractError>;

	/// Opens a live feed of `NewWave` events
	async fn watch_waves(&self) -> Result<WaveStream, ContractError>;
}
