//! Handle for a live event subscription.

use std::sync::{
	atomic::{AtomicUsize, Ordering},
	Arc,
};
use tokio::task::JoinHandle;
use tracing::debug;

/// Owns the background task that forwards live events
///
/// The task is aborted by [`SubscriptionHandle::unsubscribe`] or, failing that, when the handle
/// is dropped, so every exit path of the owning scope releases the channel.
#[derive(Debug)]
pub struct SubscriptionHandle {
	task: Option<JoinHandle<()>>,
	skipped: Arc<AtomicUsize>,
}

impl SubscriptionHandle {
	pub fn new(task: JoinHandle<()>) -> Self {
		Self::with_skip_counter(task, Arc::new(AtomicUsize::new(0)))
	}

	/// Wraps a forwarding task that bumps `skipped` for every event it could not deliver
	pub fn with_skip_counter(task: JoinHandle<()>, skipped: Arc<AtomicUsize>) -> Self {
		Self {
			task: Some(task),
			skipped,
		}
	}

	/// Live events dropped so far because they could not be decoded
	///
	/// A non-zero count means the log may be missing waves until the next snapshot.
	pub fn skipped_events(&self) -> usize {
		self.skipped.load(Ordering::Relaxed)
	}

	/// True while the forwarding task is still running
	pub fn is_active(&self) -> bool {
		self.task.as_ref().is_some_and(|task| !task.is_finished())
	}

	/// Stops the forwarding task
	pub fn unsubscribe(mut self) {
		self.release();
	}

	fn release(&mut self) {
		if let Some(task) = self.task.take() {
			task.abort();
			debug!("live wave subscription released");
		}
	}
}

impl Drop for SubscriptionHandle {
	fn drop(&mut self) {
		self.release();
	}
}
