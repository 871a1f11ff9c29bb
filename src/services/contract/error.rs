//! Contract facade error types.
//!
//! Covers reachability of the remote contract, mismatches between the remote and the compiled
//! interface, and rejections that happen before a submission handle is issued.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents possible errors of contract calls
#[derive(ThisError, Debug)]
pub enum ContractError {
	/// No capability handle, or the endpoint could not be reached
	#[error("Remote unavailable: {0}")]
	RemoteUnavailable(ErrorContext),

	/// The remote answered with a shape the compiled interface does not describe
	#[error("Schema mismatch: {0}")]
	SchemaMismatch(ErrorContext),

	/// The write would need more gas than the caller-supplied ceiling
	#[error("Resource ceiling exceeded: {0}")]
	ResourceCeilingExceeded(ErrorContext),

	/// The node or the signer refused the write before issuing a handle
	#[error("Submission rejected: {0}")]
	SubmissionRejected(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl ContractError {
	pub fn remote_unavailable(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RemoteUnavailable(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn schema_mismatch(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::SchemaMismatch(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn resource_ceiling_exceeded(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ResourceCeilingExceeded(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn submission_rejected(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::SubmissionRejected(ErrorContext::new_with_log(msg, source, metadata))
	}

	/// Schema mismatches belong to the remote-unavailable class
	pub fn is_remote_unavailable(&self) -> bool {
		matches!(self, Self::RemoteUnavailable(_) | Self::SchemaMismatch(_))
	}
}

impl TraceableError for ContractError {
	fn trace_id(&self) -> String {
		match self {
			Self::RemoteUnavailable(ctx)
			| Self::SchemaMismatch(ctx)
			| Self::ResourceCeilingExceeded(ctx)
			| Self::SubmissionRejected(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
