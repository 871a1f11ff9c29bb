//! Typed facade over the remote wave portal contract.

use alloy::primitives::{Address, U256};
use futures::StreamExt;
use std::sync::{
	atomic::{AtomicUsize, Ordering},
	Arc,
};
use tracing::{debug, instrument, warn};

use crate::{
	models::{Finalization, SubmissionHandle, Wave},
	services::contract::{ContractError, SubscriptionHandle, WavePortalRemote},
};

/// Bulk read, write-with-payload, auxiliary reads and live subscription of the contract
///
/// The remote capability is optional: without it every call fails with
/// [`ContractError::RemoteUnavailable`].
pub struct ContractFacade<R: WavePortalRemote> {
	remote: Option<Arc<R>>,
}

impl<R: WavePortalRemote> Clone for ContractFacade<R> {
	fn clone(&self) -> Self {
		Self {
			remote: self.remote.clone(),
		}
	}
}

impl<R: WavePortalRemote + 'static> ContractFacade<R> {
	pub fn new(remote: Option<R>) -> Self {
		Self {
			remote: remote.map(Arc::new),
		}
	}

	pub fn connected(remote: R) -> Self {
		Self::new(Some(remote))
	}

	pub fn unavailable() -> Self {
		Self { remote: None }
	}

	pub fn is_available(&self) -> bool {
		self.remote.is_some()
	}

	fn remote(&self) -> Result<&Arc<R>, ContractError> {
		self.remote.as_ref().ok_or_else(|| {
			ContractError::remote_unavailable("no remote contract capability", None, None)
		})
	}

	/// Every wave currently known to the contract, oldest first
	///
	/// Read-only and unsigned.
	#[instrument(skip_all)]
	pub async fn fetch_all(&self) -> Result<Vec<Wave>, ContractError> {
		let waves = self.remote()?.get_all_waves().await?;
		debug!(count = waves.len(), "fetched all waves");
		Ok(waves)
	}

	/// Submits `wave(payload)` signed by `from`, bounded by `cost_ceiling` gas
	#[instrument(skip_all, fields(from = %from, cost_ceiling = cost_ceiling))]
	pub async fn submit_wave(
		&self,
		from: Address,
		payload: &str,
		cost_ceiling: u64,
	) -> Result<SubmissionHandle, ContractError> {
		let handle = self
			.remote()?
			.send_wave(from, payload.to_string(), cost_ceiling)
			.await?;
		debug!(handle = %handle, "wave submitted");
		Ok(handle)
	}

	pub async fn get_balance(&self) -> Result<U256, ContractError> {
		self.remote()?.get_balance().await
	}

	pub async fn get_write_count(&self) -> Result<U256, ContractError> {
		self.remote()?.get_total_waves().await
	}

	/// Waits until `handle` is included; never times out on its own
	pub async fn await_finalization(
		&self,
		handle: SubmissionHandle,
	) -> Result<Finalization, ContractError> {
		self.remote()?.await_finalization(handle).await
	}

	/// Invokes `on_event` once per newly finalized wave, in finalization order
	///
	/// Undecodable events are logged, counted on the returned handle and skipped; the feed keeps
	/// running.
	#[instrument(skip_all)]
	pub async fn subscribe<F>(&self, on_event: F) -> Result<SubscriptionHandle, ContractError>
	where
		F: Fn(Wave) + Send + 'static,
	{
		let mut stream = self.remote()?.watch_waves().await?;
		let skipped = Arc::new(AtomicUsize::new(0));
		let counter = skipped.clone();

		let task = tokio::spawn(async move {
			while let Some(item) = stream.next().await {
				match item {
					Ok(wave) => on_event(wave),
					Err(e) => {
						let total = counter.fetch_add(1, Ordering::Relaxed) + 1;
						warn!(error = %e, skipped = total, "dropping undecodable live event");
					}
				}
			}
			debug!("live wave stream ended");
		});

		Ok(SubscriptionHandle::with_skip_counter(task, skipped))
	}
}
