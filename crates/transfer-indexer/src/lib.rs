//! History feed adapter for the transfer dashboard service.
//!
//! Pulls the most recent transfer records from the hosted GraphQL
//! indexer and enriches each record with its token's display symbol.
//! Every fetch is fresh (no cursor state); the stored record set is
//! replaced wholesale, and when refreshes overlap the latest-started
//! fetch wins. Symbol enrichment is best-effort per record: one failed
//! lookup degrades that record only, never the batch.

use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use transfer_types::HistoryRecord;

/// Re-export implementations
pub mod implementations {
	pub mod subgraph;
}

/// Errors that can occur while fetching history.
#[derive(Debug, Error)]
pub enum IndexerError {
	/// Network-level failure talking to the indexing service.
	#[error("Network error: {0}")]
	Network(String),
	/// The service responded with something unparseable.
	#[error("Parse error: {0}")]
	Parse(String),
}

/// Interface to a transfer-history indexing service.
#[async_trait]
pub trait IndexerInterface: Send + Sync {
	/// Fetches the most recent transfer records, newest-ordered by the
	/// service's own identifier ordering. Each call is a fresh query.
	async fn fetch_recent(&self, limit: u64) -> Result<Vec<HistoryRecord>, IndexerError>;
}

/// Source of token display symbols for enrichment.
#[async_trait]
pub trait SymbolSource: Send + Sync {
	/// Resolves the display symbol for a token contract address.
	async fn symbol_for(&self, token: &str) -> Result<String, IndexerError>;
}

/// Symbol source backed by the RPC delivery boundary.
pub struct DeliverySymbolSource {
	delivery: Arc<transfer_delivery::DeliveryService>,
	chain_id: u64,
}

impl DeliverySymbolSource {
	/// Resolves symbols via `symbol()` calls on the given chain.
	pub fn new(delivery: Arc<transfer_delivery::DeliveryService>, chain_id: u64) -> Self {
		Self { delivery, chain_id }
	}
}

#[async_trait]
impl SymbolSource for DeliverySymbolSource {
	async fn symbol_for(&self, token: &str) -> Result<String, IndexerError> {
		let address: alloy_primitives::Address = token
			.parse()
			.map_err(|e| IndexerError::Parse(format!("Invalid token address '{}': {}", token, e)))?;
		self.delivery
			.token_symbol(address, self.chain_id)
			.await
			.map_err(|e| IndexerError::Network(e.to_string()))
	}
}

/// Stored history snapshot tagged with the fetch that produced it.
#[derive(Default)]
struct StoredFeed {
	generation: u64,
	records: Vec<HistoryRecord>,
}

/// Service owning the transfer-history record set.
pub struct HistoryService {
	indexer: Box<dyn IndexerInterface>,
	symbols: Arc<dyn SymbolSource>,
	page_size: u64,
	store: RwLock<StoredFeed>,
	next_generation: AtomicU64,
}

impl HistoryService {
	/// Creates a history service over an indexer and a symbol source.
	pub fn new(
		indexer: Box<dyn IndexerInterface>,
		symbols: Arc<dyn SymbolSource>,
		page_size: u64,
	) -> Self {
		Self {
			indexer,
			symbols,
			page_size,
			store: RwLock::new(StoredFeed::default()),
			next_generation: AtomicU64::new(0),
		}
	}

	/// Fetches a fresh record set, enriches it, and stores it.
	///
	/// Returns the number of records fetched. An in-flight refresh is
	/// never cancelled by a newer one; the generation check below makes
	/// the latest-started fetch win the store.
	pub async fn refresh(&self) -> Result<usize, IndexerError> {
		let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;

		let mut records = self.indexer.fetch_recent(self.page_size).await?;
		self.enrich(&mut records).await;

		let count = records.len();
		self.apply(generation, records).await;
		Ok(count)
	}

	/// Returns the current record set.
	pub async fn records(&self) -> Vec<HistoryRecord> {
		self.store.read().await.records.clone()
	}

	/// Replaces the store if no newer fetch has landed already.
	async fn apply(&self, generation: u64, records: Vec<HistoryRecord>) {
		let mut store = self.store.write().await;
		if generation < store.generation {
			tracing::debug!(
				generation,
				current = store.generation,
				"Discarding superseded history fetch"
			);
			return;
		}
		store.generation = generation;
		store.records = records;
	}

	/// Fills in `symbol` for each record, best-effort.
	///
	/// Resolution fans out one lookup per distinct token address and
	/// joins results back by that key, so completion order and record
	/// positions never matter. A failed lookup leaves `symbol` unset.
	async fn enrich(&self, records: &mut [HistoryRecord]) {
		let mut tokens: Vec<String> = records.iter().map(|r| r.token.clone()).collect();
		tokens.sort();
		tokens.dedup();

		let lookups = tokens.iter().map(|token| {
			let symbols = Arc::clone(&self.symbols);
			async move {
				match symbols.symbol_for(token).await {
					Ok(symbol) => (token.clone(), Some(symbol)),
					Err(e) => {
						tracing::warn!(token = %token, error = %e, "Symbol resolution failed");
						(token.clone(), None)
					}
				}
			}
		});

		let resolved: HashMap<String, Option<String>> = join_all(lookups).await.into_iter().collect();

		for record in records.iter_mut() {
			record.symbol = resolved.get(&record.token).cloned().flatten();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct FixedIndexer {
		records: Vec<HistoryRecord>,
	}

	#[async_trait]
	impl IndexerInterface for FixedIndexer {
		async fn fetch_recent(&self, limit: u64) -> Result<Vec<HistoryRecord>, IndexerError> {
			Ok(self.records.iter().take(limit as usize).cloned().collect())
		}
	}

	/// Resolves every token except the one configured to fail.
	struct FlakySymbols {
		failing_token: String,
	}

	#[async_trait]
	impl SymbolSource for FlakySymbols {
		async fn symbol_for(&self, token: &str) -> Result<String, IndexerError> {
			if token == self.failing_token {
				Err(IndexerError::Network("symbol() reverted".into()))
			} else {
				Ok("CCIP-BnM".to_string())
			}
		}
	}

	fn record(hash: &str, token: &str) -> HistoryRecord {
		HistoryRecord {
			transaction_hash: hash.to_string(),
			receiver: "0x1111111111111111111111111111111111111111".to_string(),
			token: token.to_string(),
			amount: "1500000000000000000".to_string(),
			block_timestamp: 1_700_000_000,
			symbol: None,
		}
	}

	#[tokio::test]
	async fn test_partial_enrichment_failure_degrades_one_record() {
		let bad = "0x00000000000000000000000000000000000000bb";
		let good = "0x00000000000000000000000000000000000000aa";
		let service = HistoryService::new(
			Box::new(FixedIndexer {
				records: vec![record("0x01", bad), record("0x02", good)],
			}),
			Arc::new(FlakySymbols {
				failing_token: bad.to_string(),
			}),
			10,
		);

		let count = service.refresh().await.unwrap();
		assert_eq!(count, 2);

		let records = service.records().await;
		assert_eq!(records[0].symbol, None);
		assert_eq!(records[1].symbol.as_deref(), Some("CCIP-BnM"));
	}

	#[tokio::test]
	async fn test_limit_is_respected() {
		let token = "0x00000000000000000000000000000000000000aa";
		let service = HistoryService::new(
			Box::new(FixedIndexer {
				records: (0..5).map(|i| record(&format!("0x{:02}", i), token)).collect(),
			}),
			Arc::new(FlakySymbols {
				failing_token: String::new(),
			}),
			3,
		);

		assert_eq!(service.refresh().await.unwrap(), 3);
		assert_eq!(service.records().await.len(), 3);
	}

	#[tokio::test]
	async fn test_last_fetch_wins() {
		let token = "0x00000000000000000000000000000000000000aa";
		let service = HistoryService::new(
			Box::new(FixedIndexer { records: vec![] }),
			Arc::new(FlakySymbols {
				failing_token: String::new(),
			}),
			10,
		);

		// A newer fetch lands first; the older one must not overwrite it.
		service.apply(2, vec![record("0xnew", token)]).await;
		service.apply(1, vec![record("0xold", token)]).await;

		let records = service.records().await;
		assert_eq!(records.len(), 1);
		assert_eq!(records[0].transaction_hash, "0xnew");
	}
}
