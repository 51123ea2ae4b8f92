//! Transfer history records from the indexing service.

use serde::{Deserialize, Serialize};

/// One historical transfer event as reported by the indexer.
///
/// Records are immutable once fetched; `symbol` is filled in
/// asynchronously per record and stays `None` when resolution fails
/// (displayed as an unresolved placeholder, never an error).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
	/// Hash of the transfer transaction.
	pub transaction_hash: String,
	/// Receiver address on the destination chain.
	pub receiver: String,
	/// Address of the transferred token contract.
	pub token: String,
	/// Transferred amount in base units, as a decimal string.
	pub amount: String,
	/// Unix timestamp of the block containing the transfer.
	pub block_timestamp: u64,
	/// Display symbol of the token, when resolution succeeded.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub symbol: Option<String>,
}
