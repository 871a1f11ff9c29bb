use alloy::primitives::Address;

/// Wallet connection as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
	/// No wallet capability in the host environment; only a disabled connect prompt applies
	Unavailable,
	/// Capability present (or not yet probed), no authorised account
	#[default]
	Disconnected,
	/// An account is active
	Connected(Address),
}

impl ConnectionState {
	/// Returns the active account, if any
	pub fn account(&self) -> Option<Address> {
		match self {
			Self::Connected(account) => Some(*account),
			_ => None,
		}
	}

	pub fn is_connected(&self) -> bool {
		matches!(self, Self::Connected(_))
	}
}

/// Outcome of a connection intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionTransition {
	/// A new identity became active; initial load and subscription are due
	Connected(Address),
	/// The active identity did not change
	Unchanged,
	/// The active identity was cleared
	Disconnected,
}
