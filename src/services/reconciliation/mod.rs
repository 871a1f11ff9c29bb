//! Event reconciliation.
//!
//! Merges the bulk `getAllWaves` read and the live `NewWave` feed into one deduplicated,
//! ordered log.

mod log;
mod shared;

pub use log::WaveLog;
pub use shared::SharedWaveLog;
