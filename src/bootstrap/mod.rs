//! Bootstrap module for building a wave portal session from configuration.
//!
//! The externally supplied ABI, when configured, is validated before anything touches the
//! network. An unreachable endpoint or a contract that fails its probe does not abort startup:
//! the session is built without the missing capability and degrades the way the presentation
//! layer expects.

use std::path::Path;
use tracing::{info, instrument, warn};

use crate::{
	models::{ConfigError, ConfigLoader, PortalConfig},
	services::{
		contract::{connect_provider, load_and_validate_abi, AlloyWavePortal},
		session::{SessionError, WavePortalSession},
		wallet::RpcWallet,
	},
};

/// Session backed by the connected node
pub type PortalSession = WavePortalSession<RpcWallet, AlloyWavePortal>;

/// Loads and validates the configuration at `path`, environment overrides included
pub fn load_config(path: &Path) -> Result<PortalConfig, ConfigError> {
	PortalConfig::load_from_path(path)
}

/// Builds a session for `config`
///
/// # Errors
/// Fails only when a configured ABI file is missing, unparsable or incompatible.
#[instrument(skip_all, fields(rpc_url = %config.rpc_url))]
pub async fn build_session(config: &PortalConfig) -> Result<PortalSession, SessionError> {
	if let Some(abi_path) = &config.abi_path {
		load_and_validate_abi(abi_path)?;
		info!(path = %abi_path.display(), "contract ABI validated");
	}

	let provider = match connect_provider(&config.rpc_url).await {
		Ok(provider) => provider,
		Err(e) => {
			warn!(error = %e, "RPC endpoint unavailable; blockchain features disabled");
			return Ok(WavePortalSession::new(None, None, config.submission_policy()));
		}
	};

	let remote = match AlloyWavePortal::from_config(provider.clone(), config).await {
		Ok(remote) => {
			info!(contract = %remote.address(), "wave portal contract ready");
			Some(remote)
		}
		Err(e) => {
			warn!(error = %e, "wave portal contract unavailable");
			None
		}
	};

	Ok(WavePortalSession::new(
		Some(RpcWallet::new(provider)),
		remote,
		config.submission_policy(),
	))
}
