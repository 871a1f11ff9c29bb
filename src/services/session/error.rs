//! Session error types.

use crate::{
	services::{contract::ContractError, transaction::TransactionError, wallet::WalletError},
	utils::logging::error::{ErrorContext, TraceableError},
};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents possible errors of presentation intents
#[derive(ThisError, Debug)]
pub enum SessionError {
	/// The intent needs an active account
	#[error("Not connected: {0}")]
	NotConnected(ErrorContext),

	/// Another submission has not reached a terminal state yet
	#[error("Transaction in flight: {0}")]
	TransactionInFlight(ErrorContext),

	#[error("Wallet error: {0}")]
	Wallet(#[from] WalletError),

	#[error("Contract error: {0}")]
	Contract(#[from] ContractError),

	#[error("Transaction error: {0}")]
	Transaction(#[from] TransactionError),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl SessionError {
	pub fn not_connected(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NotConnected(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn transaction_in_flight(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::TransactionInFlight(ErrorContext::new_with_log(msg, source, metadata))
	}

	/// Whether the presentation should degrade to a disabled connect prompt
	pub fn is_capability_unavailable(&self) -> bool {
		matches!(self, Self::Wallet(WalletError::CapabilityUnavailable(_)))
	}
}

impl TraceableError for SessionError {
	fn trace_id(&self) -> String {
		match self {
			Self::NotConnected(ctx) | Self::TransactionInFlight(ctx) => ctx.trace_id.clone(),
			Self::Wallet(e) => e.trace_id(),
			Self::Contract(e) => e.trace_id(),
			Self::Transaction(e) => e.trace_id(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
