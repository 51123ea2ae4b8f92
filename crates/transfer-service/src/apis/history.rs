//! Transfer history endpoint.

use crate::server::AppState;
use axum::{
	extract::{Query, State},
	http::StatusCode,
	response::Json,
};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use transfer_core::TOKEN_DECIMALS;
use transfer_types::{format_units, HistoryRecord};

/// Query parameters for GET /api/history.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
	/// When true, fetch a fresh record set before responding.
	#[serde(default)]
	pub refresh: bool,
}

/// One history record shaped for display.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
	#[serde(rename = "transactionHash")]
	pub transaction_hash: String,
	pub receiver: String,
	/// Resolved token symbol, or the unresolved placeholder.
	pub symbol: String,
	/// Human-readable amount.
	pub amount: String,
	/// Unix timestamp of the containing block.
	pub timestamp: u64,
	/// RFC 3339 rendering of the timestamp.
	pub time: String,
	/// Explorer link for the transaction, when the chain has one.
	#[serde(rename = "explorerUrl", skip_serializing_if = "Option::is_none")]
	pub explorer_url: Option<String>,
}

impl HistoryEntry {
	fn new(record: HistoryRecord, explorer_base: Option<&str>) -> Self {
		let time = DateTime::from_timestamp(record.block_timestamp as i64, 0)
			.map(|dt| dt.to_rfc3339())
			.unwrap_or_default();
		let explorer_url =
			explorer_base.map(|base| format!("{}/tx/{}", base, record.transaction_hash));
		Self {
			transaction_hash: record.transaction_hash,
			receiver: record.receiver,
			symbol: record.symbol.unwrap_or_else(|| "Unknown".to_string()),
			amount: format_units(&record.amount, TOKEN_DECIMALS),
			timestamp: record.block_timestamp,
			time,
			explorer_url,
		}
	}
}

/// Response body for GET /api/history.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
	pub records: Vec<HistoryEntry>,
}

/// Handles GET /api/history.
///
/// `?refresh=true` triggers a fresh fetch from the indexer first; a
/// fetch failure is surfaced, but a stale stored set is still a valid
/// response without the flag.
pub async fn handle_history(
	State(state): State<AppState>,
	Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, (StatusCode, Json<Value>)> {
	if query.refresh {
		if let Err(e) = state.history.refresh().await {
			tracing::warn!(error = %e, "History refresh failed");
			return Err((
				StatusCode::BAD_GATEWAY,
				Json(json!({ "error": e.to_string() })),
			));
		}
	}

	// Indexed transfers live on the indexer's chain; its explorer hosts
	// the transaction links
	let config = state.engine.config();
	let explorer_base = config
		.chains
		.get(&config.indexer.chain_id)
		.and_then(|chain| chain.explorer_url.as_deref());

	let records = state
		.history
		.records()
		.await
		.into_iter()
		.map(|record| HistoryEntry::new(record, explorer_base))
		.collect();

	Ok(Json(HistoryResponse { records }))
}
