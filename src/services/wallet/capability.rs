use alloy::primitives::Address;
use async_trait::async_trait;

use crate::services::wallet::WalletError;

/// Host-provided identity and signing capability
///
/// Signing is not part of this interface; writes made through the same endpoint are signed by
/// the wallet behind it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletCapability: Send + Sync {
	/// Whether the capability answers at all
	async fn is_available(&self) -> bool;

	/// Accounts the user has authorised
	///
	/// Non-interactive requests only report earlier grants. Interactive requests may prompt the
	/// user; a declined prompt yields an empty list.
	async fn request_accounts(&self, interactive: bool) -> Result<Vec<Address>, WalletError>;
}
