//! Wallet error types.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents possible errors of wallet operations
#[derive(ThisError, Debug)]
pub enum WalletError {
	/// The host environment exposes no wallet capability
	#[error("Capability unavailable: {0}")]
	CapabilityUnavailable(ErrorContext),

	/// The user declined the authorization prompt
	#[error("User rejected: {0}")]
	UserRejected(ErrorContext),

	/// The wallet could not answer an account request
	#[error("Request failed: {0}")]
	RequestFailed(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl WalletError {
	pub fn capability_unavailable(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::CapabilityUnavailable(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn user_rejected(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::UserRejected(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn request_failed(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestFailed(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for WalletError {
	fn trace_id(&self) -> String {
		match self {
			Self::CapabilityUnavailable(ctx) | Self::UserRejected(ctx) | Self::RequestFailed(ctx) => {
				ctx.trace_id.clone()
			}
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
