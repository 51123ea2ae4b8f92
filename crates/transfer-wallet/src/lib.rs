//! Wallet boundary for the transfer dashboard service.
//!
//! The service acts for a single connected account. This crate holds the
//! signing key, derives the account address, and hands out per-chain
//! signers for the RPC layer to embed in its providers. Signing itself
//! happens inside the provider wallet filler at submission time; one
//! signing request is issued per dispatched transfer.

use alloy_primitives::Address;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use thiserror::Error;
use transfer_types::SecretString;

/// Errors that can occur during wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
	/// The configured private key is malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// Service managing the connected account's signing key.
pub struct WalletService {
	signer: PrivateKeySigner,
}

impl WalletService {
	/// Creates a wallet from a hex-encoded private key.
	pub fn from_key(private_key: &SecretString) -> Result<Self, WalletError> {
		let signer: PrivateKeySigner = private_key.with_exposed(|key| {
			key.parse()
				.map_err(|_| WalletError::InvalidKey("Private key format".to_string()))
		})?;
		Ok(Self { signer })
	}

	/// Address of the connected account.
	pub fn address(&self) -> Address {
		self.signer.address()
	}

	/// Returns a signer bound to the given chain ID, for use in a
	/// provider's wallet filler.
	pub fn chain_signer(&self, chain_id: u64) -> PrivateKeySigner {
		self.signer.clone().with_chain_id(Some(chain_id))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_key_derives_address() {
		// anvil's first well-known dev key
		let key = SecretString::from(
			"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
		);
		let wallet = WalletService::from_key(&key).unwrap();
		assert_eq!(
			wallet.address().to_checksum(None),
			"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
		);
	}

	#[test]
	fn test_invalid_key_rejected() {
		let key = SecretString::from("not-a-key");
		assert!(matches!(
			WalletService::from_key(&key),
			Err(WalletError::InvalidKey(_))
		));
	}
}
