//! Test helper utilities for portal configuration
//!
//! - `PortalConfigBuilder`: Builder for creating test PortalConfig instances

use crate::{models::PortalConfig, services::contract::SCHEMA_VERSION};
use std::path::PathBuf;

/// Builder for creating test PortalConfig instances
pub struct PortalConfigBuilder {
	config: PortalConfig,
}

impl Default for PortalConfigBuilder {
	fn default() -> Self {
		Self {
			config: PortalConfig {
				rpc_url: "http://localhost:8545".to_string(),
				contract_address: "0x04bDEC5C41616Fa68eF3EBBdf7E92C31948358c7".to_string(),
				cost_ceiling: 300_000,
				confirmation_timeout_ms: 120_000,
				poll_interval_ms: 1_000,
				abi_path: None,
				schema_version: SCHEMA_VERSION,
			},
		}
	}
}

impl PortalConfigBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn rpc_url(mut self, url: &str) -> Self {
		self.config.rpc_url = url.to_string();
		self
	}

	pub fn contract_address(mut self, address: &str) -> Self {
		self.config.contract_address = address.to_string();
		self
	}

	pub fn cost_ceiling(mut self, cost_ceiling: u64) -> Self {
		self.config.cost_ceiling = cost_ceiling;
		self
	}

	pub fn confirmation_timeout_ms(mut self, timeout_ms: u64) -> Self {
		self.config.confirmation_timeout_ms = timeout_ms;
		self
	}

	pub fn poll_interval_ms(mut self, interval_ms: u64) -> Self {
		self.config.poll_interval_ms = interval_ms;
		self
	}

	pub fn abi_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.config.abi_path = Some(path.into());
		self
	}

	pub fn schema_version(mut self, version: u32) -> Self {
		self.config.schema_version = version;
		self
	}

	pub fn build(self) -> PortalConfig {
		self.config
	}
}
