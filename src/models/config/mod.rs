//! Configuration loading and validation.
//!
//! The client reads a single JSON file describing the endpoint, the contract and the
//! submission policy. See [`PortalConfig`] for the fields and their defaults.

use std::path::Path;

mod error;
mod portal_config;

pub use error::ConfigError;
pub use portal_config::{PortalConfig, CONTRACT_ADDRESS_ENV, RPC_URL_ENV};

/// Common interface for loading configuration files
pub trait ConfigLoader: Sized {
	fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	fn validate(&self) -> Result<(), ConfigError>;

	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}
}
