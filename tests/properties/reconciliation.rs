use crate::properties::strategies::{
	ingest_sequence_strategy, snapshot_strategy, wave_strategy, Ingest,
};

use proptest::{prelude::*, test_runner::Config};
use std::collections::HashSet;
use wave_portal_client::{
	models::{Wave, WaveKey},
	services::reconciliation::WaveLog,
};

fn apply(log: &mut WaveLog, operations: &[Ingest]) {
	for operation in operations {
		match operation {
			Ingest::Snapshot(waves) => {
				log.ingest_snapshot(waves);
			}
			Ingest::Live(wave) => {
				log.ingest_live(wave.clone());
			}
		}
	}
}

fn key_set(log: &WaveLog) -> HashSet<WaveKey> {
	log.entries().iter().map(Wave::key).collect()
}

fn all_keys(operations: &[Ingest]) -> HashSet<WaveKey> {
	operations
		.iter()
		.flat_map(|operation| match operation {
			Ingest::Snapshot(waves) => waves.iter().map(Wave::key).collect::<Vec<_>>(),
			Ingest::Live(wave) => vec![wave.key()],
		})
		.collect()
}

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_snapshot_idempotence(
		prefix in ingest_sequence_strategy(),
		snapshot in snapshot_strategy()
	) {
		let mut log = WaveLog::new();
		apply(&mut log, &prefix);

		log.ingest_snapshot(&snapshot);
		let once = log.clone();

		prop_assert_eq!(log.ingest_snapshot(&snapshot), 0);
		prop_assert_eq!(log, once);
	}

	#[test]
	fn test_live_commutativity(a in wave_strategy(), b in wave_strategy()) {
		let mut ab = WaveLog::new();
		ab.ingest_live(a.clone());
		ab.ingest_live(b.clone());

		let mut ba = WaveLog::new();
		ba.ingest_live(b);
		ba.ingest_live(a);

		prop_assert_eq!(key_set(&ab), key_set(&ba));
	}

	#[test]
	fn test_uniqueness(operations in ingest_sequence_strategy()) {
		let mut log = WaveLog::new();
		apply(&mut log, &operations);

		let keys = key_set(&log);
		prop_assert_eq!(keys.len(), log.len());
	}

	#[test]
	fn test_convergence_under_any_interleaving(
		operations in ingest_sequence_strategy()
			.prop_flat_map(|ops| (Just(ops.clone()), Just(ops).prop_shuffle()))
	) {
		let (original, shuffled) = operations;

		let mut first = WaveLog::new();
		apply(&mut first, &original);
		let mut second = WaveLog::new();
		apply(&mut second, &shuffled);

		prop_assert_eq!(key_set(&first), key_set(&second));
		prop_assert_eq!(key_set(&first), all_keys(&original));
	}

	#[test]
	fn test_snapshot_order_is_kept(snapshot in snapshot_strategy()) {
		let mut log = WaveLog::new();
		log.ingest_snapshot(&snapshot);

		let mut seen = HashSet::new();
		let expected: Vec<Wave> = snapshot
			.into_iter()
			.filter(|wave| seen.insert(wave.key()))
			.collect();

		prop_assert_eq!(log.entries(), expected.as_slice());
	}

	#[test]
	fn test_existing_order_survives_snapshot(
		live in prop::collection::vec(wave_strategy(), 0..8),
		snapshot in snapshot_strategy()
	) {
		let mut log = WaveLog::new();
		for wave in live {
			log.ingest_live(wave);
		}
		let before: Vec<Wave> = log.entries().to_vec();

		log.ingest_snapshot(&snapshot);

		let kept: Vec<Wave> = log
			.entries()
			.iter()
			.filter(|wave| before.contains(wave))
			.cloned()
			.collect();
		prop_assert_eq!(kept, before);
	}

	#[test]
	fn test_view_is_reverse_of_entries(operations in ingest_sequence_strategy()) {
		let mut log = WaveLog::new();
		apply(&mut log, &operations);

		let mut reversed = log.entries().to_vec();
		reversed.reverse();
		prop_assert_eq!(log.view(), reversed);
	}
}
