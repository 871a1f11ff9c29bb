//! Wave portal client entry point.
//!
//! Terminal rendering of the wave portal: connects the wallet behind the configured endpoint,
//! shows every wave most recent first, optionally sends one and optionally keeps following the
//! live feed until Ctrl+C.
//!
//! # Flow
//! 1. Loads `.env` and the JSON configuration
//! 2. Builds the session and restores (or requests) a wallet connection
//! 3. Renders the wave log
//! 4. Sends `--wave <MESSAGE>` if given and renders its outcome
//! 5. With `--watch`, renders new waves as they arrive until interrupted

use clap::{Arg, ArgAction, Command};
use dotenvy::dotenv;
use std::{
	collections::HashSet,
	env::{set_var, var},
	path::PathBuf,
	time::Duration,
};
use tracing::{error, info, warn};
use wave_portal_client::{
	bootstrap::{build_session, load_config, PortalSession},
	models::{
		BalanceChange, ConnectionState, ConnectionTransition, TransactionRecord, Wave, WaveKey,
	},
	services::{session::SessionError, transaction::TransactionError},
	utils::logging::{error::TraceableError, setup_logging},
};

const DEFAULT_CONFIG_PATH: &str = "config/portal.json";

/// How often `--watch` checks the live feed for undecodable events
const FEED_CHECK_INTERVAL: Duration = Duration::from_secs(5);

fn render_wave(wave: &Wave) {
	let when = wave
		.occurred_at()
		.map(|at| at.to_rfc3339())
		.unwrap_or_else(|| wave.timestamp.to_string());
	info!(waver = %wave.waver, at = %when, "{}", wave.message);
}

fn render_waves(waves: &[Wave]) {
	info!(total = waves.len(), "=========== Waves ===========");
	for wave in waves {
		render_wave(wave);
	}
	info!("=============================");
}

fn render_record(record: &TransactionRecord) {
	info!(
		handle = ?record.handle,
		status = ?record.status,
		waves_before = %record.write_count_before,
		waves_after = ?record.write_count_after,
		"wave confirmed"
	);

	match record.balance_change() {
		Some(BalanceChange::Decreased { by }) => {
			info!(paid = %by, "contract balance decreased, a reward was likely paid")
		}
		Some(BalanceChange::Unchanged) => info!("contract balance unchanged, no reward this time"),
		Some(BalanceChange::Increased { by }) => info!(received = %by, "contract balance increased"),
		None => warn!("contract balance after the wave is unknown"),
	}
}

async fn send_wave(session: &PortalSession, message: &str) {
	match session.submit_wave(message).await {
		Ok(record) => render_record(&record),
		Err(SessionError::Transaction(TransactionError::ConfirmationTimeout(ctx))) => {
			warn!(trace_id = %ctx.trace_id, "no confirmation yet; the wave may still land");
			if let Err(e) = session.refresh().await {
				error!(trace_id = %e.trace_id(), error = %e, "failed to refresh waves");
			}
		}
		Err(e) => error!(trace_id = %e.trace_id(), error = %e, "wave failed"),
	}
	session.acknowledge_transaction();
}

async fn watch_waves(session: &PortalSession) {
	let mut rx = session.subscribe_waves();
	let mut shown: HashSet<WaveKey> = rx
		.borrow_and_update()
		.entries()
		.iter()
		.map(Wave::key)
		.collect();
	info!("watching for new waves, press Ctrl+C to stop");

	let mut feed_check = tokio::time::interval(FEED_CHECK_INTERVAL);
	let mut skipped = session.skipped_live_events();

	loop {
		tokio::select! {
			_ = tokio::signal::ctrl_c() => {
				info!("shutdown signal received");
				break;
			}
			_ = feed_check.tick() => {
				let now = session.skipped_live_events();
				if now > skipped {
					warn!(skipped = now - skipped, "live feed dropped events, refreshing");
					if let Err(e) = session.refresh().await {
						error!(trace_id = %e.trace_id(), error = %e, "failed to refresh waves");
					}
				}
				skipped = now;
			}
			changed = rx.changed() => {
				if changed.is_err() {
					break;
				}
				let log = rx.borrow_and_update().clone();
				// Snapshot merges can insert before the newest entry
				for wave in log.entries() {
					if shown.insert(wave.key()) {
						render_wave(wave);
					}
				}
			}
		}
	}
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let matches = Command::new("wave-portal-client")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Connects a wallet to the wave portal contract, sends waves and follows the wave log.")
		.arg(
			Arg::new("config")
				.long("config")
				.help("Path to the JSON configuration (default: config/portal.json)")
				.value_name("PATH"),
		)
		.arg(
			Arg::new("wave")
				.long("wave")
				.help("Send a wave with this message")
				.value_name("MESSAGE"),
		)
		.arg(
			Arg::new("watch")
				.long("watch")
				.help("Keep following new waves until Ctrl+C")
				.action(ArgAction::SetTrue),
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.help("Set log level (trace, debug, info, warn, error)")
				.value_name("LEVEL"),
		)
		.get_matches();

	dotenv().ok();

	if let Some(level) = matches.get_one::<String>("log-level") {
		if var("RUST_LOG").is_err() {
			set_var("RUST_LOG", level);
		}
	}

	setup_logging().unwrap_or_else(|e| {
		eprintln!("Failed to setup logging: {}", e);
	});

	let config_path = matches
		.get_one::<String>("config")
		.map(PathBuf::from)
		.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

	let config = load_config(&config_path).map_err(|e| {
		anyhow::anyhow!(
			"Failed to load configuration from {}: {}",
			config_path.display(),
			e
		)
	})?;

	let mut session = build_session(&config).await?;

	match session.start().await {
		Ok(_) => {}
		Err(e) if e.is_capability_unavailable() => {
			warn!("no wallet available; connect is disabled");
			render_waves(&session.waves());
			return Ok(());
		}
		Err(e) => {
			warn!(trace_id = %e.trace_id(), error = %e, "initial load failed, retrying once");
			session.connect().await?;
		}
	}

	if session.connection_state() == ConnectionState::Disconnected {
		match session.connect().await {
			Ok(ConnectionTransition::Connected(account)) => info!(account = %account, "connected"),
			Ok(_) => {}
			Err(e) => {
				error!(trace_id = %e.trace_id(), error = %e, "wallet connection failed");
				return Ok(());
			}
		}
	}

	render_waves(&session.view().waves);

	if let Some(message) = matches.get_one::<String>("wave") {
		send_wave(&session, message).await;
	}

	if matches.get_flag("watch") {
		watch_waves(&session).await;
	}

	session.disconnect();
	Ok(())
}
