//! Chain registry configuration for the transfer service.
//!
//! Each supported network carries the addresses and the cross-chain
//! selector the transfer workflow needs: the transferor contract deployed
//! on that chain, the selector that identifies the chain as a message
//! destination, and the address of the transferable token. Entries are
//! loaded from TOML at startup and never mutated at runtime.

use alloy_primitives::Address;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Configuration for a single supported chain.
///
/// A chain can act as the source of a transfer (its `transferor_address`
/// receives the contract call) and as a destination (its `chain_selector`
/// and `token_address` become call arguments).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
	/// Human-readable network name, e.g. "Ethereum Sepolia".
	pub name: String,
	/// HTTP(S) JSON-RPC endpoint for this chain.
	pub rpc_url: String,
	/// Address of the deployed token transferor contract.
	pub transferor_address: Address,
	/// Numeric selector identifying this chain as a message destination.
	/// Selectors exceed TOML's signed integer range, so they are written
	/// as strings in configuration.
	#[serde(deserialize_with = "deserialize_selector")]
	pub chain_selector: u64,
	/// Address of the transferable token on this chain.
	pub token_address: Address,
	/// Block explorer base URL for transaction links.
	#[serde(default)]
	pub explorer_url: Option<String>,
}

/// Registry mapping chain IDs to their configurations.
///
/// A missing entry for a referenced chain ID is a configuration error;
/// callers surface it as fatal for the operation rather than recovering
/// silently.
pub type ChainRegistry = HashMap<u64, ChainConfig>;

/// Deserializes a chain selector from either a string or an integer.
///
/// Production selectors are 64-bit values above i64::MAX, which TOML
/// cannot express as integers.
fn deserialize_selector<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Selector {
		Number(u64),
		Text(String),
	}

	match Selector::deserialize(deserializer)? {
		Selector::Number(n) => Ok(n),
		Selector::Text(s) => s
			.parse::<u64>()
			.map_err(|e| serde::de::Error::custom(format!("Invalid chain selector '{}': {}", s, e))),
	}
}

/// Deserializes a chain registry from TOML.
///
/// TOML tables cannot use numeric keys, so chain IDs arrive as strings
/// and are parsed into u64 keys here.
pub fn deserialize_chains<'de, D>(deserializer: D) -> Result<ChainRegistry, D::Error>
where
	D: Deserializer<'de>,
{
	let string_map: HashMap<String, ChainConfig> = HashMap::deserialize(deserializer)?;
	let mut result = HashMap::new();

	for (key, value) in string_map {
		let chain_id = key
			.parse::<u64>()
			.map_err(|e| serde::de::Error::custom(format!("Invalid chain id '{}': {}", key, e)))?;
		result.insert(chain_id, value);
	}

	Ok(result)
}
