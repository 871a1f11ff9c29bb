//! Wallet capability served by the connected node.
//!
//! Injected browser wallets and dev nodes both speak the same account methods, so the
//! connection flow runs against whatever endpoint the provider points at.

use alloy::{
	primitives::Address,
	providers::{DynProvider, Provider},
	transports::TransportError,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::services::wallet::{WalletCapability, WalletError};

/// EIP-1193 code for a request the user declined
const USER_REJECTED_CODE: i64 = 4001;

/// Wallet capability backed by `eth_accounts` and `eth_requestAccounts`
#[derive(Clone)]
pub struct RpcWallet {
	provider: DynProvider,
}

impl RpcWallet {
	pub fn new(provider: DynProvider) -> Self {
		Self { provider }
	}
}

fn is_user_rejection(err: &TransportError) -> bool {
	err.as_error_resp()
		.is_some_and(|payload| payload.code == USER_REJECTED_CODE)
}

fn request_error(method: &str, err: TransportError) -> WalletError {
	WalletError::request_failed(
		"wallet account request failed",
		Some(Box::new(err)),
		Some(HashMap::from([("method".to_string(), method.to_string())])),
	)
}

#[async_trait]
impl WalletCapability for RpcWallet {
	async fn is_available(&self) -> bool {
		match self.provider.get_chain_id().await {
			Ok(chain_id) => {
				debug!(chain_id, "wallet endpoint answered");
				true
			}
			Err(e) => {
				debug!(error = %e, "wallet endpoint did not answer");
				false
			}
		}
	}

	#[instrument(skip(self))]
	async fn request_accounts(&self, interactive: bool) -> Result<Vec<Address>, WalletError> {
		if !interactive {
			return self
				.provider
				.get_accounts()
				.await
				.map_err(|e| request_error("eth_accounts", e));
		}

		match self
			.provider
			.raw_request::<_, Vec<Address>>("eth_requestAccounts".into(), ())
			.await
		{
			Ok(accounts) => Ok(accounts),
			Err(e) if is_user_rejection(&e) => {
				debug!("account request declined");
				Ok(Vec::new())
			}
			Err(e) => Err(request_error("eth_requestAccounts", e)),
		}
	}
}
