//! Ethereum RPC boundary for the transfer dashboard service.
//!
//! Everything that touches a JSON-RPC provider lives behind this crate:
//! submitting the transfer contract call, fetching and waiting for
//! receipts, reading the connected account's native balance, and
//! resolving ERC-20 token symbols for history enrichment.

use async_trait::async_trait;
use transfer_types::{Transaction, TransactionHash, TransactionReceipt};

use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

/// Errors that can occur at the RPC boundary.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// Network-level failure talking to the provider.
	#[error("Network error: {0}")]
	Network(String),
	/// The wallet refused to sign or send the call.
	#[error("Wallet rejected the request: {0}")]
	Rejected(String),
	/// No provider is configured for the requested chain.
	#[error("No provider available for chain {0}")]
	NoProviderAvailable(u64),
}

/// Interface to an RPC provider set.
#[async_trait]
pub trait DeliveryInterface: Send + Sync {
	/// Signs and submits a contract call, returning its hash.
	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError>;

	/// Returns the receipt for a transaction, or an error while it is
	/// not yet mined.
	async fn get_receipt(
		&self,
		hash: &TransactionHash,
		chain_id: u64,
	) -> Result<TransactionReceipt, DeliveryError>;

	/// Blocks until the transaction has the required confirmations or
	/// the wait times out.
	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		chain_id: u64,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError>;

	/// Native balance of an account.
	async fn get_balance(&self, address: Address, chain_id: u64) -> Result<U256, DeliveryError>;

	/// Resolves an ERC-20 token's display symbol via its `symbol()`
	/// view function.
	async fn token_symbol(&self, token: Address, chain_id: u64) -> Result<String, DeliveryError>;
}

/// Service routing delivery operations to the configured provider set.
pub struct DeliveryService {
	backend: Box<dyn DeliveryInterface>,
	/// Confirmations required before a transfer counts as confirmed.
	confirmations: u64,
}

impl DeliveryService {
	/// Creates a new DeliveryService over the given backend.
	pub fn new(backend: Box<dyn DeliveryInterface>, confirmations: u64) -> Self {
		Self {
			backend,
			confirmations,
		}
	}

	/// Signs and submits a contract call on its chain.
	pub async fn deliver(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError> {
		self.backend.submit(tx).await
	}

	/// Returns the current receipt for a transaction.
	pub async fn receipt(
		&self,
		hash: &TransactionHash,
		chain_id: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		self.backend.get_receipt(hash, chain_id).await
	}

	/// Waits for the configured number of confirmations.
	pub async fn confirm_with_default(
		&self,
		hash: &TransactionHash,
		chain_id: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		self.backend
			.wait_for_confirmation(hash, chain_id, self.confirmations)
			.await
	}

	/// Native balance of an account.
	pub async fn balance(&self, address: Address, chain_id: u64) -> Result<U256, DeliveryError> {
		self.backend.get_balance(address, chain_id).await
	}

	/// Display symbol of an ERC-20 token.
	pub async fn token_symbol(
		&self,
		token: Address,
		chain_id: u64,
	) -> Result<String, DeliveryError> {
		self.backend.token_symbol(token, chain_id).await
	}
}
