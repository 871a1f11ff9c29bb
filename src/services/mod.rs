//! Core services of the wave portal client.
//!
//! - `wallet`: connection manager over the host wallet capability
//! - `contract`: typed facade over the remote contract
//! - `transaction`: lifecycle tracking of a submitted wave
//! - `reconciliation`: the deduplicated wave log
//! - `session`: the intents and projections the presentation layer uses

pub mod contract;
pub mod reconciliation;
pub mod session;
pub mod transaction;
pub mod wallet;
