//! Alloy-based EVM delivery implementation.
//!
//! Builds one HTTP provider per configured chain, each carrying the
//! connected wallet as its signer, and implements submission, receipt
//! polling, balance reads, and `symbol()` resolution on top of them.

use crate::{DeliveryError, DeliveryInterface};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, FixedBytes, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use alloy_transport_http::Http;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use transfer_types::{
	with_0x_prefix, ChainRegistry, Transaction, TransactionHash, TransactionReceipt,
};
use transfer_wallet::WalletService;

sol! {
	/// Minimal ERC-20 metadata surface used for history enrichment.
	interface IERC20Metadata {
		function symbol() external view returns (string);
	}
}

/// Delivery implementation backed by alloy HTTP providers.
///
/// One provider per registry entry; every provider signs with the
/// connected wallet bound to its chain ID.
pub struct AlloyDelivery {
	providers: HashMap<u64, Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>>,
}

impl AlloyDelivery {
	/// Creates providers for every chain in the registry.
	pub fn new(registry: &ChainRegistry, wallet: &WalletService) -> Result<Self, DeliveryError> {
		if registry.is_empty() {
			return Err(DeliveryError::Network(
				"At least one chain must be configured".to_string(),
			));
		}

		let mut providers = HashMap::new();

		for (chain_id, chain) in registry {
			let url = chain.rpc_url.parse().map_err(|e| {
				DeliveryError::Network(format!("Invalid RPC URL for chain {}: {}", chain_id, e))
			})?;

			let chain_signer = wallet.chain_signer(*chain_id);
			let provider = ProviderBuilder::new()
				.with_recommended_fillers()
				.wallet(EthereumWallet::from(chain_signer))
				.on_http(url);

			provider
				.client()
				.set_poll_interval(std::time::Duration::from_secs(7));

			providers.insert(
				*chain_id,
				Arc::new(provider) as Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
			);
		}

		Ok(Self { providers })
	}

	fn get_provider(
		&self,
		chain_id: u64,
	) -> Result<&Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>, DeliveryError> {
		self.providers
			.get(&chain_id)
			.ok_or(DeliveryError::NoProviderAvailable(chain_id))
	}
}

/// Classifies a send failure as a wallet rejection or a network error.
///
/// EIP-1193 user rejections surface as code 4001; providers differ on
/// the exact message, so match loosely.
fn classify_send_error(message: String) -> DeliveryError {
	let lower = message.to_lowercase();
	if lower.contains("4001") || lower.contains("rejected") || lower.contains("denied") {
		DeliveryError::Rejected(message)
	} else {
		DeliveryError::Network(message)
	}
}

#[async_trait]
impl DeliveryInterface for AlloyDelivery {
	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError> {
		let chain_id = tx.chain_id;
		let provider = self.get_provider(chain_id)?;

		let request = TransactionRequest::default()
			.to(tx.to)
			.input(tx.data.into())
			.value(tx.value);

		// The provider's wallet filler signs; this is the single signing
		// request issued per dispatched transfer.
		let pending_tx = provider
			.send_transaction(request)
			.await
			.map_err(|e| classify_send_error(e.to_string()))?;

		let tx_hash = *pending_tx.tx_hash();
		tracing::info!(
			tx_hash = %with_0x_prefix(&hex::encode(tx_hash.0)),
			chain_id = chain_id,
			"Submitted transaction"
		);

		Ok(TransactionHash(tx_hash.0.to_vec()))
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
		chain_id: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		let tx_hash = FixedBytes::<32>::from_slice(&hash.0);
		let provider = self.get_provider(chain_id)?;

		match provider.get_transaction_receipt(tx_hash).await {
			Ok(Some(receipt)) => Ok(TransactionReceipt {
				hash: TransactionHash(receipt.transaction_hash.0.to_vec()),
				block_number: receipt.block_number.unwrap_or(0),
				success: receipt.status(),
			}),
			Ok(None) => Err(DeliveryError::Network(format!(
				"Transaction not found on chain {}",
				chain_id
			))),
			Err(e) => Err(DeliveryError::Network(format!(
				"Failed to get receipt on chain {}: {}",
				chain_id, e
			))),
		}
	}

	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		chain_id: u64,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		let tx_hash = FixedBytes::<32>::from_slice(&hash.0);
		let provider = self.get_provider(chain_id)?;

		let poll_interval = tokio::time::Duration::from_secs(10);
		// ~15s block time plus buffer, capped at one hour
		let seconds_per_confirmation = 20;
		let timeout_seconds = (confirmations * seconds_per_confirmation)
			.max(seconds_per_confirmation)
			.min(3600);
		let max_wait_time = tokio::time::Duration::from_secs(timeout_seconds);
		let start_time = tokio::time::Instant::now();

		loop {
			if start_time.elapsed() > max_wait_time {
				return Err(DeliveryError::Network(format!(
					"Timeout waiting for {} confirmations after {} seconds",
					confirmations, timeout_seconds
				)));
			}

			let receipt = match provider.get_transaction_receipt(tx_hash).await {
				Ok(Some(receipt)) => receipt,
				Ok(None) => {
					tokio::time::sleep(poll_interval).await;
					continue;
				}
				Err(e) => {
					return Err(DeliveryError::Network(format!(
						"Failed to get receipt: {}",
						e
					)));
				}
			};

			let current_block = provider
				.get_block_number()
				.await
				.map_err(|e| DeliveryError::Network(format!("Failed to get block number: {}", e)))?;

			let tx_block = receipt.block_number.unwrap_or(0);
			if current_block.saturating_sub(tx_block) >= confirmations.saturating_sub(1) {
				return Ok(TransactionReceipt {
					hash: TransactionHash(receipt.transaction_hash.0.to_vec()),
					block_number: tx_block,
					success: receipt.status(),
				});
			}

			tokio::time::sleep(poll_interval).await;
		}
	}

	async fn get_balance(&self, address: Address, chain_id: u64) -> Result<U256, DeliveryError> {
		let provider = self.get_provider(chain_id)?;

		provider
			.get_balance(address)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get balance: {}", e)))
	}

	async fn token_symbol(&self, token: Address, chain_id: u64) -> Result<String, DeliveryError> {
		let provider = self.get_provider(chain_id)?;

		let call_data = IERC20Metadata::symbolCall {}.abi_encode();
		let call_result = provider
			.call(
				&TransactionRequest::default()
					.to(token)
					.input(call_data.into()),
			)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to call symbol(): {}", e)))?;

		let decoded = IERC20Metadata::symbolCall::abi_decode_returns(&call_result, true)
			.map_err(|e| DeliveryError::Network(format!("Invalid symbol() response: {}", e)))?;

		Ok(decoded._0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_classify_send_error() {
		assert!(matches!(
			classify_send_error("User rejected the request (code 4001)".into()),
			DeliveryError::Rejected(_)
		));
		assert!(matches!(
			classify_send_error("connection refused".into()),
			DeliveryError::Network(_)
		));
	}

	#[test]
	fn test_symbol_calldata_selector() {
		// keccak("symbol()")[..4]
		let data = IERC20Metadata::symbolCall {}.abi_encode();
		assert_eq!(&data[..4], &[0x95, 0xd8, 0x9b, 0x41]);
	}
}
