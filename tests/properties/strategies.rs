use alloy::primitives::Address;
use proptest::prelude::*;
use wave_portal_client::models::Wave;

const MAX_SNAPSHOT_SIZE: usize = 12;
const MAX_OPERATIONS: usize = 16;

/// One ingestion into the reconciliation log
#[derive(Debug, Clone)]
pub enum Ingest {
	Snapshot(Vec<Wave>),
	Live(Wave),
}

/// Waves drawn from a small domain so that key collisions are frequent
pub fn wave_strategy() -> impl Strategy<Value = Wave> {
	(
		prop::sample::select(vec![0xaau8, 0xbb, 0xcc]),
		0u64..6,
		prop::sample::select(vec!["hi", "gm", "hello"]),
	)
		.prop_map(|(byte, timestamp, message)| {
			Wave::new(Address::repeat_byte(byte), timestamp, message)
		})
}

pub fn snapshot_strategy() -> impl Strategy<Value = Vec<Wave>> {
	prop::collection::vec(wave_strategy(), 0..MAX_SNAPSHOT_SIZE)
}

pub fn ingest_strategy() -> impl Strategy<Value = Ingest> {
	prop_oneof![
		snapshot_strategy().prop_map(Ingest::Snapshot),
		wave_strategy().prop_map(Ingest::Live),
	]
}

pub fn ingest_sequence_strategy() -> impl Strategy<Value = Vec<Ingest>> {
	prop::collection::vec(ingest_strategy(), 0..MAX_OPERATIONS)
}
