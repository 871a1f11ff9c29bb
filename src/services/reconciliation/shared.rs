use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use crate::{models::Wave, services::reconciliation::WaveLog};

/// A [`WaveLog`] shared between the bulk-read path and the live subscription
///
/// Each ingestion is a short critical section on the watch channel and notifies readers only
/// when the log actually grew.
#[derive(Clone)]
pub struct SharedWaveLog {
	tx: Arc<watch::Sender<WaveLog>>,
}

impl Default for SharedWaveLog {
	fn default() -> Self {
		Self::new()
	}
}

impl SharedWaveLog {
	pub fn new() -> Self {
		let (tx, _) = watch::channel(WaveLog::new());
		Self { tx: Arc::new(tx) }
	}

	pub fn ingest_snapshot(&self, snapshot: &[Wave]) -> usize {
		let mut inserted = 0;
		self.tx.send_if_modified(|log| {
			inserted = log.ingest_snapshot(snapshot);
			inserted > 0
		});
		debug!(received = snapshot.len(), inserted, "snapshot reconciled");
		inserted
	}

	pub fn ingest_live(&self, wave: Wave) -> bool {
		let inserted = self.tx.send_if_modified(|log| log.ingest_live(wave));
		debug!(inserted, "live wave reconciled");
		inserted
	}

	/// Most-recent-first copy for display
	pub fn view(&self) -> Vec<Wave> {
		self.tx.borrow().view()
	}

	pub fn snapshot(&self) -> WaveLog {
		self.tx.borrow().clone()
	}

	pub fn len(&self) -> usize {
		self.tx.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.tx.borrow().is_empty()
	}

	/// Receiver notified whenever the log grows
	pub fn subscribe(&self) -> watch::Receiver<WaveLog> {
		self.tx.subscribe()
	}
}
