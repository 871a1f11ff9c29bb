//! Wave portal client core.
//!
//! Connects a wallet, reads and writes the wave portal contract, tracks submitted waves to
//! finalization and keeps a deduplicated log of every wave, whether it arrived through a bulk
//! read or through the live event feed.
//!
//! # Modules
//! - `models`: waves, connection and transaction state, configuration
//! - `services`: wallet, contract, transaction, reconciliation and session services
//! - `bootstrap`: builds a session from configuration
//! - `utils`: logging and test builders

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
