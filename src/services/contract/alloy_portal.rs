//! Alloy implementation of the remote wave portal contract.
//!
//! Reads go through `eth_call`, writes through `eth_sendTransaction` on the connected node,
//! which is where the wallet signs. Live events come from `eth_subscribe` on ws/wss endpoints
//! and from a log filter poller on http/https endpoints.

use alloy::{
	network::ReceiptResponse,
	primitives::{Address, U256},
	providers::{DynProvider, Provider, ProviderBuilder},
	rpc::types::{Filter, Log},
	sol_types::SolEvent,
};
use async_trait::async_trait;
use futures::StreamExt;
use std::{collections::HashMap, future::Future, time::Duration};
use tracing::{debug, instrument, warn};

use crate::{
	models::{Finalization, PortalConfig, SubmissionHandle, Wave},
	services::contract::{
		interface::WavePortal,
		remote::{WavePortalRemote, WaveStream},
		ContractError,
	},
};

/// Node error fragments that mean the gas limit was too low for the call
const CEILING_MARKERS: [&str; 4] = [
	"gas required exceeds",
	"out of gas",
	"intrinsic gas too low",
	"exceeds allowance",
];

/// Consecutive failed receipt lookups tolerated while waiting for finalization
const MAX_RECEIPT_ERRORS: u32 = 5;

/// Connects a type-erased provider to `rpc_url`
pub async fn connect_provider(rpc_url: &str) -> Result<DynProvider, ContractError> {
	let provider = ProviderBuilder::new().connect(rpc_url).await.map_err(|e| {
		ContractError::remote_unavailable(
			"failed to connect to RPC endpoint",
			Some(Box::new(e)),
			Some(HashMap::from([("rpc_url".to_string(), rpc_url.to_string())])),
		)
	})?;

	Ok(provider.erased())
}

/// Wave portal contract reached through an alloy provider
#[derive(Clone)]
pub struct AlloyWavePortal {
	provider: DynProvider,
	address: Address,
	poll_interval: Duration,
	push: bool,
}

impl AlloyWavePortal {
	/// Wraps an existing provider
	///
	/// `push` selects `eth_subscribe` for live events; it needs a pubsub transport.
	pub fn new(provider: DynProvider, address: Address, poll_interval: Duration, push: bool) -> Self {
		Self {
			provider,
			address,
			poll_interval,
			push,
		}
	}

	/// Builds the contract handle from configuration and probes it
	pub async fn from_config(
		provider: DynProvider,
		config: &PortalConfig,
	) -> Result<Self, ContractError> {
		let address = config.contract_address().map_err(|e| {
			ContractError::remote_unavailable("invalid contract address", Some(Box::new(e)), None)
		})?;
		let push = config.rpc_url.starts_with("ws://") || config.rpc_url.starts_with("wss://");

		let portal = Self::new(provider, address, config.poll_interval(), push);
		portal.probe().await?;
		Ok(portal)
	}

	pub fn address(&self) -> Address {
		self.address
	}

	/// Checks that code is deployed at the address and answers the compiled interface
	#[instrument(skip_all, fields(contract = %self.address))]
	pub async fn probe(&self) -> Result<(), ContractError> {
		let code = self.provider.get_code_at(self.address).await.map_err(|e| {
			ContractError::remote_unavailable("failed to read contract code", Some(Box::new(e)), None)
		})?;

		if code.is_empty() {
			return Err(ContractError::schema_mismatch(
				"no contract code deployed at address",
				None,
				Some(HashMap::from([(
					"contract".to_string(),
					self.address.to_string(),
				)])),
			));
		}

		let total = self.get_total_waves().await?;
		debug!(total = %total, "contract probe succeeded");
		Ok(())
	}

	fn contract(&self) -> WavePortal::WavePortalInstance<DynProvider> {
		WavePortal::new(self.address, self.provider.clone())
	}
}

fn to_seconds(timestamp: U256) -> Result<u64, ContractError> {
	u64::try_from(timestamp).map_err(|_| {
		ContractError::schema_mismatch(
			"wave timestamp does not fit in 64 bits",
			None,
			Some(HashMap::from([(
				"timestamp".to_string(),
				timestamp.to_string(),
			)])),
		)
	})
}

fn into_wave(raw: WavePortal::Wave) -> Result<Wave, ContractError> {
	Ok(Wave::new(raw.waver, to_seconds(raw.timestamp)?, raw.message))
}

fn decode_new_wave(log: &Log) -> Result<Wave, ContractError> {
	let decoded = log.log_decode::<WavePortal::NewWave>().map_err(|e| {
		ContractError::schema_mismatch("undecodable NewWave log", Some(Box::new(e)), None)
	})?;
	let event = decoded.inner.data;

	Ok(Wave::new(event.from, to_seconds(event.timestamp)?, event.message))
}

/// Maps failed reads to the remote-unavailable class
fn read_error(call: &str, err: alloy::contract::Error) -> ContractError {
	let metadata = Some(HashMap::from([("call".to_string(), call.to_string())]));
	match err {
		alloy::contract::Error::AbiError(_) | alloy::contract::Error::ZeroData(..) => {
			ContractError::schema_mismatch("undecodable contract response", Some(Box::new(err)), metadata)
		}
		other => ContractError::remote_unavailable("contract call failed", Some(Box::new(other)), metadata),
	}
}

/// Classifies a failure that happened before a transaction hash was issued
fn submission_error(err: alloy::contract::Error, cost_ceiling: u64) -> ContractError {
	let text = err.to_string().to_lowercase();
	let metadata = Some(HashMap::from([(
		"cost_ceiling".to_string(),
		cost_ceiling.to_string(),
	)]));

	if CEILING_MARKERS.iter().any(|marker| text.contains(marker)) {
		return ContractError::resource_ceiling_exceeded(
			"node reports the wave would exceed the cost ceiling",
			Some(Box::new(err)),
			metadata,
		);
	}

	let unreachable = matches!(
		&err,
		alloy::contract::Error::TransportError(transport) if !transport.is_error_resp()
	);

	if unreachable {
		ContractError::remote_unavailable("failed to reach node while submitting", Some(Box::new(err)), metadata)
	} else {
		ContractError::submission_rejected("wave submission was rejected", Some(Box::new(err)), metadata)
	}
}

#[async_trait]
impl WavePortalRemote for AlloyWavePortal {
	async fn get_all_waves(&self) -> Result<Vec<Wave>, ContractError> {
		let raw = self
			.contract()
			.getAllWaves()
			.call()
			.await
			.map_err(|e| read_error("getAllWaves", e))?;

		raw.into_iter().map(into_wave).collect()
	}

	async fn get_total_waves(&self) -> Result<U256, ContractError> {
		self.contract()
			.getTotalWaves()
			.call()
			.await
			.map_err(|e| read_error("getTotalWaves", e))
	}

	async fn get_balance(&self) -> Result<U256, ContractError> {
		self.provider.get_balance(self.address).await.map_err(|e| {
			ContractError::remote_unavailable("failed to read contract balance", Some(Box::new(e)), None)
		})
	}

	#[instrument(skip_all, fields(from = %from, cost_ceiling = cost_ceiling))]
	async fn send_wave(
		&self,
		from: Address,
		message: String,
		cost_ceiling: u64,
	) -> Result<SubmissionHandle, ContractError> {
		let contract = self.contract();
		let call = contract.wave(message).from(from).gas(cost_ceiling);

		let estimate = call
			.estimate_gas()
			.await
			.map_err(|e| submission_error(e, cost_ceiling))?;

		if estimate > cost_ceiling {
			return Err(ContractError::resource_ceiling_exceeded(
				"estimated gas is above the cost ceiling",
				None,
				Some(HashMap::from([
					("cost_ceiling".to_string(), cost_ceiling.to_string()),
					("estimate".to_string(), estimate.to_string()),
				])),
			));
		}

		let pending = call
			.send()
			.await
			.map_err(|e| submission_error(e, cost_ceiling))?;

		Ok(SubmissionHandle(*pending.tx_hash()))
	}

	async fn await_finalization(
		&self,
		handle: SubmissionHandle,
	) -> Result<Finalization, ContractError> {
		let provider = &self.provider;
		poll_finalization(self.poll_interval, || async move {
			let receipt = provider
				.get_transaction_receipt(handle.0)
				.await
				.map_err(|e| {
					ContractError::remote_unavailable(
						"failed to fetch transaction receipt",
						Some(Box::new(e)),
						Some(HashMap::from([("handle".to_string(), handle.to_string())])),
					)
				})?;
			Ok(receipt.map(|receipt| receipt.status()))
		})
		.await
	}

	async fn watch_waves(&self) -> Result<WaveStream, ContractError> {
		let filter = Filter::new()
			.address(self.address)
			.event_signature(WavePortal::NewWave::SIGNATURE_HASH);

		if self.push {
			let subscription = self.provider.subscribe_logs(&filter).await.map_err(|e| {
				ContractError::remote_unavailable("failed to subscribe to NewWave", Some(Box::new(e)), None)
			})?;

			return Ok(subscription
				.into_stream()
				.map(|log| decode_new_wave(&log))
				.boxed());
		}

		let poller = self.provider.watch_logs(&filter).await.map_err(|e| {
			ContractError::remote_unavailable("failed to install NewWave filter", Some(Box::new(e)), None)
		})?;

		Ok(poller
			.with_poll_interval(self.poll_interval)
			.into_stream()
			.flat_map(futures::stream::iter)
			.map(|log| decode_new_wave(&log))
			.boxed())
	}
}

/// Polls `lookup` until it reports an execution status
///
/// `lookup` yields `None` while the transaction is not yet included. Transient lookup errors
/// are retried; [`MAX_RECEIPT_ERRORS`] in a row end the wait with the last one. There is no
/// overall deadline, callers bound the wait.
async fn poll_finalization<F, Fut>(
	poll_interval: Duration,
	mut lookup: F,
) -> Result<Finalization, ContractError>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<Option<bool>, ContractError>>,
{
	let mut failures = 0;
	loop {
		match lookup().await {
			Ok(Some(true)) => return Ok(Finalization::Accepted),
			Ok(Some(false)) => return Ok(Finalization::Reverted),
			Ok(None) => failures = 0,
			Err(e) => {
				failures += 1;
				if failures >= MAX_RECEIPT_ERRORS {
					return Err(e);
				}
				warn!(error = %e, failures, "receipt lookup failed, retrying");
			}
		}
		tokio::time::sleep(poll_interval).await;
	}
}
