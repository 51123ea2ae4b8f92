//! Transaction types for the RPC delivery boundary.

use alloy_primitives::{Address, U256};
use serde::Deserialize;

/// Blockchain transaction hash, stored as raw bytes.
///
/// Serializes as a 0x-prefixed hex string, which is what API consumers
/// and explorer links expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionHash(pub Vec<u8>);

impl TransactionHash {
	/// Returns the hash as a lowercase hex string with "0x" prefix.
	pub fn to_hex(&self) -> String {
		format!("0x{}", hex::encode(&self.0))
	}
}

impl serde::Serialize for TransactionHash {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(&self.to_hex())
	}
}

impl<'de> serde::Deserialize<'de> for TransactionHash {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		let bytes = hex::decode(s.trim_start_matches("0x").trim_start_matches("0X"))
			.map_err(serde::de::Error::custom)?;
		Ok(TransactionHash(bytes))
	}
}

/// An outbound contract call ready for signing and submission.
#[derive(Debug, Clone)]
pub struct Transaction {
	/// Chain the call is submitted on.
	pub chain_id: u64,
	/// Contract address receiving the call.
	pub to: Address,
	/// ABI-encoded calldata.
	pub data: Vec<u8>,
	/// Native value attached to the call.
	pub value: U256,
}

/// Receipt for a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransactionReceipt {
	/// The hash of the transaction.
	pub hash: TransactionHash,
	/// Block number the transaction was included in.
	pub block_number: u64,
	/// Whether execution succeeded (false = reverted).
	pub success: bool,
}
