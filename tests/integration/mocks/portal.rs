use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use futures::{channel::mpsc, StreamExt};
use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
};
use wave_portal_client::{
	models::{Finalization, SubmissionHandle, Wave},
	services::contract::{ContractError, WavePortalRemote, WaveStream},
};

const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

struct PortalState {
	waves: Vec<Wave>,
	balance: U256,
	reward: U256,
	gas_per_wave: u64,
	clock: u64,
	nonce: u8,
	stall: bool,
	revert: bool,
	yielding: bool,
	submitted: Vec<(Address, String, u64)>,
	pending: HashMap<SubmissionHandle, Wave>,
	subscribers: Vec<mpsc::UnboundedSender<Result<Wave, ContractError>>>,
}

impl PortalState {
	fn broadcast(&mut self, wave: &Wave) {
		self.subscribers
			.retain(|tx| tx.unbounded_send(Ok(wave.clone())).is_ok());
	}
}

/// Contract double that behaves like a deployed wave portal
///
/// A submitted wave is recorded when it is finalized: it is appended to the bulk read, the
/// reward is paid out of the balance and every live subscriber is notified.
#[derive(Clone)]
pub struct InMemoryPortal {
	state: Arc<Mutex<PortalState>>,
}

impl InMemoryPortal {
	pub fn new(balance: U256, reward: U256) -> Self {
		Self {
			state: Arc::new(Mutex::new(PortalState {
				waves: Vec::new(),
				balance,
				reward,
				gas_per_wave: 90_000,
				clock: GENESIS_TIMESTAMP,
				nonce: 0,
				stall: false,
				revert: false,
				yielding: false,
				submitted: Vec::new(),
				pending: HashMap::new(),
				subscribers: Vec::new(),
			})),
		}
	}

	pub fn with_waves(self, waves: Vec<Wave>) -> Self {
		self.state.lock().unwrap().waves = waves;
		self
	}

	pub fn with_gas_per_wave(self, gas: u64) -> Self {
		self.state.lock().unwrap().gas_per_wave = gas;
		self
	}

	/// Submissions are accepted but never finalized
	pub fn stalled(self) -> Self {
		self.state.lock().unwrap().stall = true;
		self
	}

	/// Submissions are finalized as reverted
	pub fn reverting(self) -> Self {
		self.state.lock().unwrap().revert = true;
		self
	}

	/// Every read and send gives up the executor first, so concurrent callers interleave
	pub fn yielding(self) -> Self {
		self.state.lock().unwrap().yielding = true;
		self
	}

	/// Finalizes every stalled submission, as a slow chain eventually would
	pub fn finalize_stalled(&self) {
		let mut state = self.state.lock().unwrap();
		state.stall = false;
		let pending: Vec<Wave> = state.pending.drain().map(|(_, wave)| wave).collect();
		for wave in pending {
			state.waves.push(wave.clone());
			state.balance = state.balance.saturating_sub(state.reward);
		}
	}

	/// A wave sent by someone else: recorded and pushed to live subscribers
	pub fn external_wave(&self, wave: Wave) {
		let mut state = self.state.lock().unwrap();
		state.waves.push(wave.clone());
		state.broadcast(&wave);
	}

	/// Pushes `wave` to live subscribers without recording it
	pub fn push_live(&self, wave: Wave) {
		self.state.lock().unwrap().broadcast(&wave);
	}

	/// Records `wave` without pushing it
	pub fn record_silently(&self, wave: Wave) {
		self.state.lock().unwrap().waves.push(wave);
	}

	pub fn balance(&self) -> U256 {
		self.state.lock().unwrap().balance
	}

	pub fn waves(&self) -> Vec<Wave> {
		self.state.lock().unwrap().waves.clone()
	}

	pub fn submitted(&self) -> Vec<(Address, String, u64)> {
		self.state.lock().unwrap().submitted.clone()
	}

	async fn pause(&self) {
		let yielding = self.state.lock().unwrap().yielding;
		if yielding {
			tokio::task::yield_now().await;
		}
	}

	pub fn live_subscribers(&self) -> usize {
		let mut state = self.state.lock().unwrap();
		state.subscribers.retain(|tx| !tx.is_closed());
		state.subscribers.len()
	}
}

#[async_trait]
impl WavePortalRemote for InMemoryPortal {
	async fn get_all_waves(&self) -> Result<Vec<Wave>, ContractError> {
		self.pause().await;
		Ok(self.waves())
	}

	async fn get_total_waves(&self) -> Result<U256, ContractError> {
		self.pause().await;
		Ok(U256::from(self.state.lock().unwrap().waves.len()))
	}

	async fn get_balance(&self) -> Result<U256, ContractError> {
		self.pause().await;
		Ok(self.balance())
	}

	async fn send_wave(
		&self,
		from: Address,
		message: String,
		cost_ceiling: u64,
	) -> Result<SubmissionHandle, ContractError> {
		self.pause().await;
		let mut state = self.state.lock().unwrap();
		state.submitted.push((from, message.clone(), cost_ceiling));

		if state.gas_per_wave > cost_ceiling {
			return Err(ContractError::resource_ceiling_exceeded(
				"gas required exceeds allowance",
				None,
				None,
			));
		}

		state.clock += 1;
		state.nonce += 1;
		let handle = SubmissionHandle(B256::with_last_byte(state.nonce));
		let wave = Wave::new(from, state.clock, message);
		state.pending.insert(handle, wave);
		Ok(handle)
	}

	async fn await_finalization(
		&self,
		handle: SubmissionHandle,
	) -> Result<Finalization, ContractError> {
		self.pause().await;
		let stalled = self.state.lock().unwrap().stall;
		if stalled {
			futures::future::pending::<()>().await;
		}

		let mut state = self.state.lock().unwrap();
		let Some(wave) = state.pending.remove(&handle) else {
			return Err(ContractError::remote_unavailable("unknown handle", None, None));
		};

		if state.revert {
			return Ok(Finalization::Reverted);
		}

		state.waves.push(wave.clone());
		state.balance = state.balance.saturating_sub(state.reward);
		state.broadcast(&wave);
		Ok(Finalization::Accepted)
	}

	async fn watch_waves(&self) -> Result<WaveStream, ContractError> {
		let (tx, rx) = mpsc::unbounded();
		self.state.lock().unwrap().subscribers.push(tx);
		Ok(rx.boxed())
	}
}
