//! Contract facade for the wave portal.
//!
//! - `interface`: the compiled contract interface and validation of supplied ABIs
//! - `remote`: the capability trait the facade calls through
//! - `alloy_portal`: the alloy-backed implementation of that trait
//! - `facade`: typed bulk read, write, auxiliary reads and live subscription
//! - `subscription`: the disposable handle returned by a subscription

mod alloy_portal;
mod error;
mod facade;
mod interface;
mod remote;
mod subscription;

pub use alloy_portal::{connect_provider, AlloyWavePortal};
pub use error::ContractError;
pub use facade::ContractFacade;
pub use interface::{load_and_validate_abi, parse_abi, validate_abi, WavePortal, SCHEMA_VERSION};
#[cfg(test)]
pub use remote::MockWavePortalRemote;
pub use remote::{WavePortalRemote, WaveStream};
pub use subscription::SubscriptionHandle;
