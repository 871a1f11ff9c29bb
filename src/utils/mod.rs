//! Utility modules for common functionality.
//!
//! - logging: tracing setup and the error context every service error wraps
//! - tests: builders for test instances of models

pub mod logging;
pub mod tests;
