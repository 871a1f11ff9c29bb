//! Transaction lifecycle tracking for `wave` writes.

mod error;
mod tracker;

pub use error::TransactionError;
pub use tracker::{
	SubmissionPolicy, TransactionTracker, DEFAULT_CONFIRMATION_TIMEOUT, DEFAULT_COST_CEILING,
};
