//! Test helper utilities for waves
//!
//! - `WaveBuilder`: Builder for creating test Wave instances

use crate::models::Wave;
use alloy::primitives::Address;

/// Builder for creating test Wave instances
pub struct WaveBuilder {
	waver: Address,
	timestamp: u64,
	message: String,
}

impl Default for WaveBuilder {
	fn default() -> Self {
		Self {
			waver: Address::repeat_byte(0xaa),
			timestamp: 1_000,
			message: "hello".to_string(),
		}
	}
}

impl WaveBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn waver(mut self, waver: Address) -> Self {
		self.waver = waver;
		self
	}

	/// Sets the waver to an address made of `byte` repeated, e.g. `0xbb` for `0xbbbb…bb`
	pub fn waver_byte(mut self, byte: u8) -> Self {
		self.waver = Address::repeat_byte(byte);
		self
	}

	pub fn timestamp(mut self, timestamp: u64) -> Self {
		self.timestamp = timestamp;
		self
	}

	pub fn message(mut self, message: &str) -> Self {
		self.message = message.to_string();
		self
	}

	pub fn build(self) -> Wave {
		Wave::new(self.waver, self.timestamp, self.message)
	}
}
