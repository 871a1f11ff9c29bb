//! Wallet connection management.
//!
//! - `capability`: the host-provided wallet interface
//! - `rpc`: that interface served by the connected node
//! - `manager`: discovery, restore, connect and disconnect of the active account

mod capability;
mod error;
mod manager;
mod rpc;

#[cfg(test)]
pub use capability::MockWalletCapability;
pub use capability::WalletCapability;
pub use error::WalletError;
pub use manager::ConnectionManager;
pub use rpc::RpcWallet;
