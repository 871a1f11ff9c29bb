//! Domain models and data structures for the wave portal client.
//!
//! - `wave`: the domain event and its structural dedup key
//! - `connection`: wallet connection state and transitions
//! - `transaction`: in-flight submission lifecycle and balance observations
//! - `config`: configuration loading and validation

mod config;
mod connection;
mod transaction;
mod wave;

pub use config::{ConfigError, ConfigLoader, PortalConfig, CONTRACT_ADDRESS_ENV, RPC_URL_ENV};
pub use connection::{ConnectionState, ConnectionTransition};
pub use transaction::{
	BalanceChange, FailureReason, Finalization, SubmissionHandle, TransactionRecord,
	TransactionStatus,
};
pub use wave::{Wave, WaveKey};
