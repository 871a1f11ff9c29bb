//! Transaction lifecycle tracker.
//!
//! Drives one `wave` write through `Idle -> Submitted -> Pending -> {Confirmed, Failed}` and
//! records the contract balance and write count around it. A tracker is consumed by
//! [`TransactionTracker::run`]; it never resubmits.

use alloy::primitives::{Address, U256};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::{
	models::{FailureReason, Finalization, SubmissionHandle, TransactionRecord, TransactionStatus},
	services::{
		contract::{ContractError, ContractFacade, WavePortalRemote},
		transaction::TransactionError,
	},
};

/// Default gas limit for a single `wave`
pub const DEFAULT_COST_CEILING: u64 = 300_000;

/// Default wait for finalization of a submitted `wave`
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Caller-chosen bounds of a single submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionPolicy {
	/// Upper bound on gas the write may consume
	pub cost_ceiling: u64,
	/// Upper bound on the wait for finalization
	pub confirmation_timeout: Duration,
}

impl Default for SubmissionPolicy {
	fn default() -> Self {
		Self {
			cost_ceiling: DEFAULT_COST_CEILING,
			confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
		}
	}
}

pub struct TransactionTracker {
	status_tx: Arc<watch::Sender<TransactionStatus>>,
	/// Set once this tracker has published `Submitted`
	owns_flight: bool,
}

impl Default for TransactionTracker {
	fn default() -> Self {
		Self::new()
	}
}

impl TransactionTracker {
	pub fn new() -> Self {
		let (status_tx, _) = watch::channel(TransactionStatus::Idle);
		Self {
			status_tx: Arc::new(status_tx),
			owns_flight: false,
		}
	}

	/// Creates a tracker that publishes on an existing channel
	///
	/// A terminal status left by an earlier run is cleared to `Idle`; an in-flight one is kept,
	/// and [`TransactionTracker::run`] then refuses to start.
	pub fn attached(status_tx: Arc<watch::Sender<TransactionStatus>>) -> Self {
		status_tx.send_if_modified(|status| {
			if status.is_terminal() {
				*status = TransactionStatus::Idle;
				true
			} else {
				false
			}
		});
		Self {
			status_tx,
			owns_flight: false,
		}
	}

	pub fn status(&self) -> TransactionStatus {
		*self.status_tx.borrow()
	}

	pub fn subscribe(&self) -> watch::Receiver<TransactionStatus> {
		self.status_tx.subscribe()
	}

	/// Submits `payload` as `from` and follows it to a terminal state
	///
	/// Failures before a handle exists leave the status at `Idle`. A timeout only abandons the
	/// local wait; the write may still finalize and should be reconciled with a fresh read. The
	/// same holds when the returned future is dropped mid-flight: the status then ends as
	/// `Failed { reason: ConfirmationTimeout }`.
	#[instrument(skip_all, fields(from = %from, cost_ceiling = policy.cost_ceiling))]
	pub async fn run<R: WavePortalRemote + 'static>(
		mut self,
		facade: &ContractFacade<R>,
		from: Address,
		payload: &str,
		policy: &SubmissionPolicy,
	) -> Result<TransactionRecord, TransactionError> {
		let current = self.status();
		if current != TransactionStatus::Idle {
			return Err(TransactionError::invalid_transition(
				"another transaction is still being tracked",
				None,
				Some(HashMap::from([("from".to_string(), format!("{current:?}"))])),
			));
		}

		let balance_before = facade
			.get_balance()
			.await
			.map_err(|e| read_error("getBalance", e))?;
		let write_count_before = facade
			.get_write_count()
			.await
			.map_err(|e| read_error("getTotalWaves", e))?;
		let mut record = TransactionRecord::new(payload, balance_before, write_count_before);

		let handle = facade
			.submit_wave(from, payload, policy.cost_ceiling)
			.await
			.map_err(|e| submission_error(e, policy))?;
		record.handle = Some(handle);

		self.advance(TransactionStatus::Submitted(handle))?;
		self.owns_flight = true;
		self.advance(TransactionStatus::Pending(handle))?;

		let finalization =
			tokio::time::timeout(policy.confirmation_timeout, facade.await_finalization(handle)).await;

		match finalization {
			Ok(Ok(Finalization::Accepted)) => {}
			Ok(Ok(Finalization::Reverted)) => {
				self.fail(handle, FailureReason::Reverted)?;
				return Err(TransactionError::transaction_reverted(
					"wave was finalized but reverted",
					None,
					Some(handle_metadata(handle)),
				));
			}
			Ok(Err(e)) => {
				self.fail(handle, FailureReason::RemoteUnavailable)?;
				return Err(TransactionError::remote_unavailable(
					"lost the remote while awaiting finalization",
					Some(Box::new(e)),
					Some(handle_metadata(handle)),
				));
			}
			Err(_) => {
				self.fail(handle, FailureReason::ConfirmationTimeout)?;
				let mut metadata = handle_metadata(handle);
				metadata.insert(
					"timeout_ms".to_string(),
					policy.confirmation_timeout.as_millis().to_string(),
				);
				return Err(TransactionError::confirmation_timeout(
					"no finalization observed within the wait policy",
					None,
					Some(metadata),
				));
			}
		}

		record.balance_after = post_write_read("getBalance", facade.get_balance().await);
		record.write_count_after = post_write_read("getTotalWaves", facade.get_write_count().await);

		self.advance(TransactionStatus::Confirmed(handle))?;
		record.status = TransactionStatus::Confirmed(handle);

		if let Some(change) = record.balance_change() {
			info!(handle = %handle, change = ?change, "balance change observed");
		}

		Ok(record)
	}

	fn fail(&self, handle: SubmissionHandle, reason: FailureReason) -> Result<(), TransactionError> {
		self.advance(TransactionStatus::Failed { handle, reason })
	}

	fn advance(&self, next: TransactionStatus) -> Result<(), TransactionError> {
		let mut rejected = None;
		self.status_tx.send_if_modified(|status| {
			if status.can_advance_to(&next) {
				*status = next;
				true
			} else {
				rejected = Some(*status);
				false
			}
		});

		match rejected {
			Some(current) => Err(TransactionError::invalid_transition(
				"transaction status cannot advance",
				None,
				Some(HashMap::from([
					("from".to_string(), format!("{current:?}")),
					("to".to_string(), format!("{next:?}")),
				])),
			)),
			None => {
				info!(status = ?next, "transaction status changed");
				Ok(())
			}
		}
	}
}

impl Drop for TransactionTracker {
	fn drop(&mut self) {
		if !self.owns_flight {
			return;
		}
		self.status_tx.send_if_modified(|status| match *status {
			TransactionStatus::Submitted(handle) | TransactionStatus::Pending(handle) => {
				warn!(handle = %handle, "tracking abandoned before finalization");
				*status = TransactionStatus::Failed {
					handle,
					reason: FailureReason::ConfirmationTimeout,
				};
				true
			}
			_ => false,
		});
	}
}

fn handle_metadata(handle: SubmissionHandle) -> HashMap<String, String> {
	HashMap::from([("handle".to_string(), handle.to_string())])
}

fn read_error(call: &str, err: ContractError) -> TransactionError {
	TransactionError::remote_unavailable(
		"failed to read pre-write snapshot",
		Some(Box::new(err)),
		Some(HashMap::from([("call".to_string(), call.to_string())])),
	)
}

fn submission_error(err: ContractError, policy: &SubmissionPolicy) -> TransactionError {
	let metadata = Some(HashMap::from([(
		"cost_ceiling".to_string(),
		policy.cost_ceiling.to_string(),
	)]));

	match err {
		ContractError::ResourceCeilingExceeded(_) => TransactionError::resource_ceiling_exceeded(
			"wave would exceed the cost ceiling",
			Some(Box::new(err)),
			metadata,
		),
		e if e.is_remote_unavailable() => TransactionError::remote_unavailable(
			"remote unavailable during submission",
			Some(Box::new(e)),
			metadata,
		),
		e => TransactionError::submission_rejected(
			"wave was rejected before a handle was issued",
			Some(Box::new(e)),
			metadata,
		),
	}
}

/// The write already landed; a failed follow-up read only loses the observation
fn post_write_read(call: &str, result: Result<U256, ContractError>) -> Option<U256> {
	match result {
		Ok(value) => Some(value),
		Err(e) => {
			warn!(call = call, error = %e, "post-write read failed");
			None
		}
	}
}
