//! Transaction lifecycle error types.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents possible outcomes of a write that did not confirm
#[derive(ThisError, Debug)]
pub enum TransactionError {
	/// The node or signer refused the write before a handle existed
	#[error("Submission rejected: {0}")]
	SubmissionRejected(ErrorContext),

	/// The write would exceed the cost ceiling; raise it and resubmit
	#[error("Resource ceiling exceeded: {0}")]
	ResourceCeilingExceeded(ErrorContext),

	/// The remote could not be reached
	#[error("Remote unavailable: {0}")]
	RemoteUnavailable(ErrorContext),

	/// The write was finalized but rejected by the contract
	#[error("Transaction reverted: {0}")]
	TransactionReverted(ErrorContext),

	/// No finalization was observed in time; the write may still land
	#[error("Confirmation timeout: {0}")]
	ConfirmationTimeout(ErrorContext),

	/// A status change that the lifecycle does not allow
	#[error("Invalid transition: {0}")]
	InvalidTransition(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl TransactionError {
	pub fn submission_rejected(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::SubmissionRejected(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn resource_ceiling_exceeded(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ResourceCeilingExceeded(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn remote_unavailable(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RemoteUnavailable(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn transaction_reverted(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::TransactionReverted(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn confirmation_timeout(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConfirmationTimeout(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn invalid_transition(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidTransition(ErrorContext::new_with_log(msg, source, metadata))
	}

	/// Whether the caller may resubmit right away
	///
	/// A timed-out write may still finalize, so it must be reconciled with a fresh read first.
	pub fn is_retryable(&self) -> bool {
		matches!(
			self,
			Self::SubmissionRejected(_) | Self::ResourceCeilingExceeded(_) | Self::RemoteUnavailable(_)
		)
	}
}

impl TraceableError for TransactionError {
	fn trace_id(&self) -> String {
		match self {
			Self::SubmissionRejected(ctx)
			| Self::ResourceCeilingExceeded(ctx)
			| Self::RemoteUnavailable(ctx)
			| Self::TransactionReverted(ctx)
			| Self::ConfirmationTimeout(ctx)
			| Self::InvalidTransition(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
