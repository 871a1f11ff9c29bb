//! Wave domain event.

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One finalized `wave` call as recorded by the contract
///
/// Waves carry no identifier of their own; [`Wave::key`] derives one from all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Wave {
	/// Account that sent the wave
	pub waver: Address,
	/// Block timestamp of the wave, in seconds since the Unix epoch
	pub timestamp: u64,
	/// Free-text message attached to the wave
	pub message: String,
}

/// Structural identity of a [`Wave`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaveKey {
	pub waver: Address,
	pub timestamp: u64,
	pub message: String,
}

impl Wave {
	pub fn new(waver: Address, timestamp: u64, message: impl Into<String>) -> Self {
		Self {
			waver,
			timestamp,
			message: message.into(),
		}
	}

	/// Returns the dedup key of this wave
	pub fn key(&self) -> WaveKey {
		WaveKey {
			waver: self.waver,
			timestamp: self.timestamp,
			message: self.message.clone(),
		}
	}

	/// Returns the timestamp as a point in time
	///
	/// `None` when the on-chain value is outside the range chrono can represent.
	pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
		i64::try_from(self.timestamp)
			.ok()
			.and_then(|secs| DateTime::from_timestamp(secs, 0))
	}
}

impl From<&Wave> for WaveKey {
	fn from(wave: &Wave) -> Self {
		wave.key()
	}
}
