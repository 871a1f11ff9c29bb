//! Deduplicated, ordered log of waves.
//!
//! Entries are kept oldest-first. Identity is the `(waver, timestamp, message)` triple, and the
//! log never holds two entries with the same key.

use std::collections::{HashMap, HashSet};

use crate::models::{Wave, WaveKey};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaveLog {
	entries: Vec<Wave>,
	keys: HashSet<WaveKey>,
}

impl WaveLog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Merges a bulk read, returning how many waves were new
	///
	/// Waves already in the log keep their position and act as anchors: new waves are placed
	/// after the last anchor that precedes them in the snapshot, so both the snapshot's order
	/// and the order of earlier live arrivals are respected. Ingesting the same snapshot twice
	/// is a no-op.
	pub fn ingest_snapshot(&mut self, snapshot: &[Wave]) -> usize {
		let positions: HashMap<WaveKey, usize> = self
			.entries
			.iter()
			.enumerate()
			.map(|(i, wave)| (wave.key(), i))
			.collect();

		let existing = std::mem::take(&mut self.entries);
		let mut merged = Vec::with_capacity(existing.len() + snapshot.len());
		let mut cursor = 0;
		let mut inserted = 0;

		for wave in snapshot {
			let key = wave.key();
			match positions.get(&key) {
				Some(&at) if at >= cursor => {
					merged.extend_from_slice(&existing[cursor..=at]);
					cursor = at + 1;
				}
				Some(_) => {}
				None => {
					if self.keys.insert(key) {
						merged.push(wave.clone());
						inserted += 1;
					}
				}
			}
		}

		merged.extend_from_slice(&existing[cursor..]);
		self.entries = merged;
		inserted
	}

	/// Appends a pushed wave unless its key is already present
	pub fn ingest_live(&mut self, wave: Wave) -> bool {
		if !self.keys.insert(wave.key()) {
			return false;
		}
		self.entries.push(wave);
		true
	}

	/// Most-recent-first copy for display
	pub fn view(&self) -> Vec<Wave> {
		self.entries.iter().rev().cloned().collect()
	}

	/// Oldest-first entries
	pub fn entries(&self) -> &[Wave] {
		&self.entries
	}

	pub fn contains(&self, key: &WaveKey) -> bool {
		self.keys.contains(key)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
