//! In-flight `wave` transaction models.
//!
//! None of these outlive the process; the contract is the only durable store.

use alloy::primitives::{TxHash, U256};
use std::fmt;

/// Opaque reference to a submitted write, used to query its finalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionHandle(pub TxHash);

impl fmt::Display for SubmissionHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// How the remote system finalized a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finalization {
	/// Included and executed successfully
	Accepted,
	/// Included but reverted
	Reverted,
}

/// Why a pending submission ended in [`TransactionStatus::Failed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
	/// Finalized but rejected by the contract
	Reverted,
	/// No finalization observed within the wait policy; the write may still land
	ConfirmationTimeout,
	/// The remote became unreachable while waiting; outcome unknown
	RemoteUnavailable,
}

/// Lifecycle of a single submission
///
/// `Idle -> Submitted -> Pending -> {Confirmed, Failed}`. A rejection before a handle exists
/// leaves the status at `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionStatus {
	#[default]
	Idle,
	Submitted(SubmissionHandle),
	Pending(SubmissionHandle),
	Confirmed(SubmissionHandle),
	Failed {
		handle: SubmissionHandle,
		reason: FailureReason,
	},
}

impl TransactionStatus {
	pub fn is_terminal(&self) -> bool {
		matches!(self, Self::Confirmed(_) | Self::Failed { .. })
	}

	pub fn handle(&self) -> Option<SubmissionHandle> {
		match self {
			Self::Idle => None,
			Self::Submitted(handle) | Self::Pending(handle) | Self::Confirmed(handle) => {
				Some(*handle)
			}
			Self::Failed { handle, .. } => Some(*handle),
		}
	}

	/// Whether `next` is a legal successor of `self`
	pub fn can_advance_to(&self, next: &TransactionStatus) -> bool {
		match (self, next) {
			(Self::Idle, Self::Submitted(_)) => true,
			(Self::Submitted(a), Self::Pending(b)) => a == b,
			(Self::Pending(a), Self::Confirmed(b)) => a == b,
			(Self::Pending(a), Self::Failed { handle: b, .. }) => a == b,
			_ => false,
		}
	}
}

/// Observed change of the contract's held funds across a submission
///
/// A decrease is read as "the contract paid out", which is a heuristic only: unrelated
/// deposits or withdrawals landing in the same window are indistinguishable from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceChange {
	Decreased { by: U256 },
	Unchanged,
	Increased { by: U256 },
}

impl BalanceChange {
	/// Compares two exact balance snapshots
	pub fn between(before: U256, after: U256) -> Self {
		match after.cmp(&before) {
			std::cmp::Ordering::Less => Self::Decreased { by: before - after },
			std::cmp::Ordering::Equal => Self::Unchanged,
			std::cmp::Ordering::Greater => Self::Increased { by: after - before },
		}
	}

	pub fn decreased(&self) -> bool {
		matches!(self, Self::Decreased { .. })
	}
}

/// Local record of one submission, handed to the caller once it is confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
	pub handle: Option<SubmissionHandle>,
	pub status: TransactionStatus,
	pub message: String,
	pub balance_before: U256,
	pub balance_after: Option<U256>,
	pub write_count_before: U256,
	pub write_count_after: Option<U256>,
}

impl TransactionRecord {
	pub fn new(message: impl Into<String>, balance_before: U256, write_count_before: U256) -> Self {
		Self {
			handle: None,
			status: TransactionStatus::Idle,
			message: message.into(),
			balance_before,
			balance_after: None,
			write_count_before,
			write_count_after: None,
		}
	}

	/// Balance change, once the post-write snapshot is known
	pub fn balance_change(&self) -> Option<BalanceChange> {
		self.balance_after
			.map(|after| BalanceChange::between(self.balance_before, after))
	}
}
