use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::{
	collections::HashMap,
	path::{Path, PathBuf},
	time::Duration,
};
use url::Url;

use crate::{
	models::{ConfigError, ConfigLoader},
	services::{contract::SCHEMA_VERSION, transaction::SubmissionPolicy},
};

/// Overrides `rpc_url` when set
pub const RPC_URL_ENV: &str = "WAVE_PORTAL_RPC_URL";
/// Overrides `contract_address` when set
pub const CONTRACT_ADDRESS_ENV: &str = "WAVE_PORTAL_CONTRACT_ADDRESS";

fn default_cost_ceiling() -> u64 {
	300_000
}

fn default_confirmation_timeout_ms() -> u64 {
	120_000
}

fn default_poll_interval_ms() -> u64 {
	1_000
}

fn default_schema_version() -> u32 {
	SCHEMA_VERSION
}

/// Endpoint, contract and submission policy for one process lifetime
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PortalConfig {
	/// Node endpoint; http(s) for polling, ws(s) for push
	pub rpc_url: String,
	/// Deployed contract, 0x-prefixed
	pub contract_address: String,
	/// Gas limit attached to every `wave` call
	#[serde(default = "default_cost_ceiling")]
	pub cost_ceiling: u64,
	/// How long a submitted wave may stay pending before it is reported as timed out
	#[serde(default = "default_confirmation_timeout_ms")]
	pub confirmation_timeout_ms: u64,
	/// Cadence of receipt and event polling
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
	/// Optional contract artifact or ABI file checked against the compiled interface
	#[serde(default)]
	pub abi_path: Option<PathBuf>,
	/// Version of the compiled interface this configuration was written for
	#[serde(default = "default_schema_version")]
	pub schema_version: u32,
}

impl PortalConfig {
	/// Parsed contract address
	pub fn contract_address(&self) -> Result<Address, ConfigError> {
		self.contract_address.parse::<Address>().map_err(|e| {
			ConfigError::validation_error(
				"contract_address is not a 20-byte hex address",
				Some(Box::new(e)),
				Some(HashMap::from([(
					"contract_address".to_string(),
					self.contract_address.clone(),
				)])),
			)
		})
	}

	pub fn submission_policy(&self) -> SubmissionPolicy {
		SubmissionPolicy {
			cost_ceiling: self.cost_ceiling,
			confirmation_timeout: Duration::from_millis(self.confirmation_timeout_ms),
		}
	}

	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}

	/// Applies [`RPC_URL_ENV`] and [`CONTRACT_ADDRESS_ENV`] from the process environment
	pub fn with_env_overrides(self) -> Self {
		self.with_overrides_from(|key| std::env::var(key).ok())
	}

	/// Applies overrides from an arbitrary key lookup
	pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(url) = lookup(RPC_URL_ENV).filter(|v| !v.is_empty()) {
			self.rpc_url = url;
		}
		if let Some(address) = lookup(CONTRACT_ADDRESS_ENV).filter(|v| !v.is_empty()) {
			self.contract_address = address;
		}
		self
	}
}

impl ConfigLoader for PortalConfig {
	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(
				"configuration must be a .json file",
				None,
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			));
		}

		let file = std::fs::File::open(path)?;
		let config: PortalConfig = serde_json::from_reader(file)?;
		let config = config.with_env_overrides();
		config.validate()?;

		Ok(config)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		let url = Url::parse(&self.rpc_url).map_err(|e| {
			ConfigError::validation_error("rpc_url is not a valid URL", Some(Box::new(e)), None)
		})?;

		if !matches!(url.scheme(), "http" | "https" | "ws" | "wss") {
			return Err(ConfigError::validation_error(
				"rpc_url must use http, https, ws or wss",
				None,
				Some(HashMap::from([(
					"scheme".to_string(),
					url.scheme().to_string(),
				)])),
			));
		}

		self.contract_address()?;

		if self.cost_ceiling == 0 {
			return Err(ConfigError::validation_error(
				"cost_ceiling must be greater than 0",
				None,
				None,
			));
		}

		if self.confirmation_timeout_ms == 0 {
			return Err(ConfigError::validation_error(
				"confirmation_timeout_ms must be greater than 0",
				None,
				None,
			));
		}

		if self.poll_interval_ms < 100 {
			return Err(ConfigError::validation_error(
				"poll_interval_ms must be at least 100",
				None,
				None,
			));
		}

		if self.schema_version != SCHEMA_VERSION {
			return Err(ConfigError::validation_error(
				"schema_version does not match the compiled contract interface",
				None,
				Some(HashMap::from([
					("expected".to_string(), SCHEMA_VERSION.to_string()),
					("found".to_string(), self.schema_version.to_string()),
				])),
			));
		}

		Ok(())
	}
}
