//! Wave portal session.
//!
//! Wires the connection manager, contract facade, transaction tracker and reconciliation log
//! together behind the intents the presentation layer raises, and exposes read-only
//! projections of their state.

use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{info, instrument, warn};

use crate::{
	models::{ConnectionState, ConnectionTransition, TransactionRecord, TransactionStatus, Wave},
	services::{
		contract::{ContractFacade, SubscriptionHandle, WavePortalRemote},
		reconciliation::{SharedWaveLog, WaveLog},
		session::SessionError,
		transaction::{SubmissionPolicy, TransactionTracker},
		wallet::{ConnectionManager, WalletCapability},
	},
};

/// Everything the presentation layer renders, captured at one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalView {
	pub connection: ConnectionState,
	/// Waves, most recent first
	pub waves: Vec<Wave>,
	pub transaction: TransactionStatus,
}

pub struct WavePortalSession<W: WalletCapability, R: WavePortalRemote> {
	connection: ConnectionManager<W>,
	contract: ContractFacade<R>,
	log: SharedWaveLog,
	status_tx: Arc<watch::Sender<TransactionStatus>>,
	policy: SubmissionPolicy,
	subscription: Option<SubscriptionHandle>,
	submission_lock: Mutex<()>,
}

impl<W: WalletCapability, R: WavePortalRemote + 'static> WavePortalSession<W, R> {
	/// Creates a session; a missing capability disables the features that need it
	pub fn new(wallet: Option<W>, remote: Option<R>, policy: SubmissionPolicy) -> Self {
		let (status_tx, _) = watch::channel(TransactionStatus::Idle);
		Self {
			connection: ConnectionManager::new(wallet),
			contract: ContractFacade::new(remote),
			log: SharedWaveLog::new(),
			status_tx: Arc::new(status_tx),
			policy,
			subscription: None,
			submission_lock: Mutex::new(()),
		}
	}

	/// Detects the wallet and adopts a previously granted account
	///
	/// Fails when the host has no wallet capability; the state is then
	/// [`ConnectionState::Unavailable`].
	#[instrument(skip_all)]
	pub async fn start(&mut self) -> Result<ConnectionTransition, SessionError> {
		self.connection.detect_capability().await?;
		let transition = self.connection.restore_connection().await?;
		self.on_transition(transition).await
	}

	/// Prompts the user for an account
	///
	/// When the account is already active but its live feed or initial load failed earlier, this
	/// retries both and reports the connection as `Connected`.
	#[instrument(skip_all)]
	pub async fn connect(&mut self) -> Result<ConnectionTransition, SessionError> {
		let transition = self.connection.request_connection().await?;
		self.on_transition(transition).await
	}

	/// Clears the active account and releases the live feed
	pub fn disconnect(&mut self) -> ConnectionTransition {
		self.release_feed();
		self.connection.disconnect()
	}

	/// Re-reads every wave and merges them into the log, returning how many were new
	///
	/// Also the way to reconcile after a confirmation timeout.
	#[instrument(skip_all)]
	pub async fn refresh(&self) -> Result<usize, SessionError> {
		let waves = self.contract.fetch_all().await?;
		let inserted = self.log.ingest_snapshot(&waves);
		info!(total = self.log.len(), inserted, "wave log refreshed");
		Ok(inserted)
	}

	/// Sends a wave from the active account and follows it to a terminal state
	///
	/// One wave is tracked at a time. A call made while another is running fails with
	/// [`SessionError::TransactionInFlight`] before anything is sent.
	#[instrument(skip_all)]
	pub async fn submit_wave(&self, payload: &str) -> Result<TransactionRecord, SessionError> {
		let account = self.connection.active_account().ok_or_else(|| {
			SessionError::not_connected("connect a wallet before waving", None, None)
		})?;

		let record = {
			let _guard = self.submission_lock.try_lock().map_err(|_| {
				SessionError::transaction_in_flight("wait for the previous wave to finish", None, None)
			})?;

			TransactionTracker::attached(self.status_tx.clone())
				.run(&self.contract, account, payload, &self.policy)
				.await?
		};

		if let Err(e) = self.refresh().await {
			warn!(error = %e, "refresh after confirmation failed");
		}

		Ok(record)
	}

	/// Drops a terminal transaction status once it has been shown
	pub fn acknowledge_transaction(&self) -> bool {
		self.status_tx.send_if_modified(|status| {
			if status.is_terminal() {
				*status = TransactionStatus::Idle;
				true
			} else {
				false
			}
		})
	}

	pub fn connection_state(&self) -> ConnectionState {
		self.connection.state()
	}

	/// Waves, most recent first
	pub fn waves(&self) -> Vec<Wave> {
		self.log.view()
	}

	pub fn transaction_status(&self) -> TransactionStatus {
		*self.status_tx.borrow()
	}

	pub fn view(&self) -> PortalView {
		PortalView {
			connection: self.connection_state(),
			waves: self.waves(),
			transaction: self.transaction_status(),
		}
	}

	pub fn subscribe_connection(&self) -> watch::Receiver<ConnectionState> {
		self.connection.subscribe()
	}

	pub fn subscribe_waves(&self) -> watch::Receiver<WaveLog> {
		self.log.subscribe()
	}

	pub fn subscribe_transaction(&self) -> watch::Receiver<TransactionStatus> {
		self.status_tx.subscribe()
	}

	/// True while the live feed of the current connection is running
	pub fn is_subscribed(&self) -> bool {
		self.subscription
			.as_ref()
			.is_some_and(SubscriptionHandle::is_active)
	}

	/// Live events the current feed could not decode; a `refresh` recovers the waves they carried
	pub fn skipped_live_events(&self) -> usize {
		self.subscription
			.as_ref()
			.map_or(0, SubscriptionHandle::skipped_events)
	}

	/// Opens the feed and runs the initial load for a new connection
	///
	/// An active account without a running feed is treated as a new connection. On failure the
	/// feed is released so the next `start` or `connect` retries both steps.
	async fn on_transition(
		&mut self,
		transition: ConnectionTransition,
	) -> Result<ConnectionTransition, SessionError> {
		let transition = match (transition, self.connection.active_account()) {
			(ConnectionTransition::Unchanged, Some(account)) if !self.is_subscribed() => {
				info!(account = %account, "resuming incomplete connection");
				ConnectionTransition::Connected(account)
			}
			(transition, _) => transition,
		};

		if let ConnectionTransition::Connected(account) = transition {
			if let Err(e) = self.load_connection().await {
				self.release_feed();
				return Err(e);
			}
			let total = self.log.len();
			info!(account = %account, total, "initial wave load complete");
		}
		Ok(transition)
	}

	async fn load_connection(&mut self) -> Result<(), SessionError> {
		self.open_feed().await?;
		self.refresh().await?;
		Ok(())
	}

	/// Subscribes before the bulk read so no wave finalized in between is missed
	async fn open_feed(&mut self) -> Result<(), SessionError> {
		self.release_feed();

		let log = self.log.clone();
		let handle = self
			.contract
			.subscribe(move |wave| {
				log.ingest_live(wave);
			})
			.await?;

		self.subscription = Some(handle);
		Ok(())
	}

	fn release_feed(&mut self) {
		if let Some(handle) = self.subscription.take() {
			handle.unsubscribe();
		}
	}
}
