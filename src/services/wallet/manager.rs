//! Connection manager.
//!
//! Owns the single active account identity. Every change is published on a watch channel and
//! reported to the caller as a [`ConnectionTransition`], so the caller can start the initial
//! load and the live subscription exactly once per connection.

use alloy::primitives::Address;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::watch;
use tracing::{info, instrument};

use crate::{
	models::{ConnectionState, ConnectionTransition},
	services::wallet::{WalletCapability, WalletError},
};

pub struct ConnectionManager<W: WalletCapability> {
	wallet: Option<Arc<W>>,
	state_tx: watch::Sender<ConnectionState>,
}

impl<W: WalletCapability> ConnectionManager<W> {
	/// Creates a manager; `None` means the host environment has no wallet capability
	pub fn new(wallet: Option<W>) -> Self {
		let (state_tx, _) = watch::channel(ConnectionState::default());
		Self {
			wallet: wallet.map(Arc::new),
			state_tx,
		}
	}

	pub fn state(&self) -> ConnectionState {
		*self.state_tx.borrow()
	}

	/// Receiver notified on every connection state change
	pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
		self.state_tx.subscribe()
	}

	pub fn active_account(&self) -> Option<Address> {
		self.state().account()
	}

	/// Checks the wallet capability answers
	///
	/// On failure the state becomes [`ConnectionState::Unavailable`].
	#[instrument(skip_all)]
	pub async fn detect_capability(&self) -> Result<(), WalletError> {
		let available = match &self.wallet {
			Some(wallet) => wallet.is_available().await,
			None => false,
		};

		if !available {
			self.publish(ConnectionState::Unavailable);
			return Err(WalletError::capability_unavailable(
				"no wallet capability in the host environment",
				None,
				None,
			));
		}

		self.state_tx.send_if_modified(|state| {
			if *state == ConnectionState::Unavailable {
				*state = ConnectionState::Disconnected;
				true
			} else {
				false
			}
		});
		Ok(())
	}

	/// Adopts a previously granted account without prompting
	///
	/// Finding no granted account is not an error; the state stays disconnected.
	#[instrument(skip_all)]
	pub async fn restore_connection(&self) -> Result<ConnectionTransition, WalletError> {
		let accounts = self.wallet()?.request_accounts(false).await?;

		match accounts.first() {
			Some(account) => Ok(self.activate(*account)),
			None => {
				info!("no previously authorised account");
				Ok(ConnectionTransition::Unchanged)
			}
		}
	}

	/// Prompts the user for an account
	#[instrument(skip_all)]
	pub async fn request_connection(&self) -> Result<ConnectionTransition, WalletError> {
		let accounts = self.wallet()?.request_accounts(true).await?;

		match accounts.first() {
			Some(account) => Ok(self.activate(*account)),
			None => Err(WalletError::user_rejected(
				"account authorization was declined",
				None,
				Some(HashMap::from([(
					"state".to_string(),
					format!("{:?}", self.state()),
				)])),
			)),
		}
	}

	/// Clears the active identity
	pub fn disconnect(&self) -> ConnectionTransition {
		let Some(account) = self.active_account() else {
			return ConnectionTransition::Unchanged;
		};

		self.publish(ConnectionState::Disconnected);
		info!(account = %account, "wallet disconnected");
		ConnectionTransition::Disconnected
	}

	fn wallet(&self) -> Result<&Arc<W>, WalletError> {
		self.wallet.as_ref().ok_or_else(|| {
			WalletError::capability_unavailable("no wallet capability in the host environment", None, None)
		})
	}

	fn activate(&self, account: Address) -> ConnectionTransition {
		if self.active_account() == Some(account) {
			return ConnectionTransition::Unchanged;
		}

		self.publish(ConnectionState::Connected(account));
		info!(account = %account, "wallet connected");
		ConnectionTransition::Connected(account)
	}

	fn publish(&self, state: ConnectionState) {
		self.state_tx.send_replace(state);
	}
}
