//! Logging utilities for the client.
//!
//! Structured logging goes through `tracing`; the subscriber is configured here once per
//! process. `RUST_LOG` takes precedence, otherwise [`DEFAULT_DIRECTIVE`] applies, which keeps
//! the client at `info` and quiets the RPC stack underneath it.
//!
//! - `error`: [`ErrorContext`](error::ErrorContext), the payload every service error wraps

pub mod error;

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_DIRECTIVE: &str = "info,alloy_transport_http=warn,alloy_rpc_client=warn,hyper=warn";

/// Sets up logging to stdout
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
	setup_logging_with_writer(std::io::stdout, DEFAULT_DIRECTIVE)
}

/// Sets up logging with a custom writer and fallback filter directive
///
/// # Arguments
/// * `writer` - Destination of formatted events
/// * `default_directive` - Filter applied when `RUST_LOG` is absent or unparsable
pub fn setup_logging_with_writer<W>(
	writer: W,
	default_directive: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::registry()
		.with(filter)
		.with(
			fmt::layer()
				.with_writer(writer)
				.event_format(
					fmt::format()
						.with_level(true)
						.with_target(true)
						.with_thread_ids(false)
						.with_thread_names(false)
						.with_ansi(true)
						.compact(),
				)
				.fmt_fields(fmt::format::PrettyFields::new()),
		)
		.try_init()?;
	Ok(())
}
