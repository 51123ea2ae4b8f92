//! Subgraph-backed indexer implementation.
//!
//! Queries a hosted GraphQL endpoint for `tokensTransferreds` events,
//! the entity the transferor contract's subgraph emits per transfer.

use crate::{IndexerError, IndexerInterface};
use async_trait::async_trait;
use serde::Deserialize;
use transfer_types::HistoryRecord;

/// Indexer implementation over a hosted subgraph endpoint.
pub struct SubgraphIndexer {
	client: reqwest::Client,
	url: String,
}

impl SubgraphIndexer {
	/// Creates an indexer querying the given GraphQL endpoint.
	pub fn new(client: reqwest::Client, url: String) -> Self {
		Self { client, url }
	}

	fn query(limit: u64) -> String {
		format!(
			"{{ tokensTransferreds(first: {}, orderBy: id) {{ \
			 blockTimestamp receiver token tokenAmount transactionHash }} }}",
			limit
		)
	}
}

/// Raw GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphQlResponse {
	data: Option<TransferredData>,
	#[serde(default)]
	errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
	message: String,
}

#[derive(Debug, Deserialize)]
struct TransferredData {
	#[serde(rename = "tokensTransferreds")]
	tokens_transferreds: Vec<TokenTransferredRow>,
}

/// One transfer event row as the subgraph reports it.
#[derive(Debug, Deserialize)]
struct TokenTransferredRow {
	#[serde(rename = "blockTimestamp")]
	block_timestamp: String,
	receiver: String,
	token: String,
	#[serde(rename = "tokenAmount")]
	token_amount: String,
	#[serde(rename = "transactionHash")]
	transaction_hash: String,
}

impl TokenTransferredRow {
	fn into_record(self) -> Result<HistoryRecord, IndexerError> {
		let block_timestamp = self.block_timestamp.parse::<u64>().map_err(|e| {
			IndexerError::Parse(format!(
				"Invalid blockTimestamp '{}': {}",
				self.block_timestamp, e
			))
		})?;

		Ok(HistoryRecord {
			transaction_hash: self.transaction_hash,
			receiver: self.receiver,
			token: self.token,
			amount: self.token_amount,
			block_timestamp,
			symbol: None,
		})
	}
}

#[async_trait]
impl IndexerInterface for SubgraphIndexer {
	async fn fetch_recent(&self, limit: u64) -> Result<Vec<HistoryRecord>, IndexerError> {
		let body = serde_json::json!({ "query": Self::query(limit) });

		let response = self
			.client
			.post(&self.url)
			.json(&body)
			.send()
			.await
			.map_err(|e| IndexerError::Network(e.to_string()))?;

		let parsed: GraphQlResponse = response
			.json()
			.await
			.map_err(|e| IndexerError::Parse(e.to_string()))?;

		if let Some(error) = parsed.errors.first() {
			return Err(IndexerError::Network(format!(
				"Indexer returned an error: {}",
				error.message
			)));
		}

		let data = parsed
			.data
			.ok_or_else(|| IndexerError::Parse("Response carried no data".to_string()))?;

		data.tokens_transferreds
			.into_iter()
			.map(TokenTransferredRow::into_record)
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_query_shape() {
		let q = SubgraphIndexer::query(10);
		assert!(q.contains("tokensTransferreds(first: 10, orderBy: id)"));
		assert!(q.contains("transactionHash"));
	}

	#[test]
	fn test_parse_response_payload() {
		let payload = r#"{
			"data": {
				"tokensTransferreds": [
					{
						"blockTimestamp": "1718000000",
						"receiver": "0x1111111111111111111111111111111111111111",
						"token": "0xcab0EF91Bee323d1A617c0a027eE753aFd6997E4",
						"tokenAmount": "1500000000000000000",
						"transactionHash": "0xabc"
					}
				]
			}
		}"#;

		let parsed: GraphQlResponse = serde_json::from_str(payload).unwrap();
		let rows = parsed.data.unwrap().tokens_transferreds;
		assert_eq!(rows.len(), 1);

		let record = rows.into_iter().next().unwrap().into_record().unwrap();
		assert_eq!(record.block_timestamp, 1_718_000_000);
		assert_eq!(record.amount, "1500000000000000000");
		assert_eq!(record.symbol, None);
	}

	#[test]
	fn test_bad_timestamp_rejected() {
		let row = TokenTransferredRow {
			block_timestamp: "not-a-number".to_string(),
			receiver: String::new(),
			token: String::new(),
			token_amount: String::new(),
			transaction_hash: String::new(),
		};
		assert!(matches!(row.into_record(), Err(IndexerError::Parse(_))));
	}
}
