//! Chain registry endpoint.

use crate::server::AppState;
use axum::{extract::State, response::Json};
use serde::Serialize;

/// One configured chain as the front end sees it.
#[derive(Debug, Serialize)]
pub struct ChainEntry {
	#[serde(rename = "chainId")]
	pub chain_id: u64,
	pub name: String,
	#[serde(rename = "explorerUrl", skip_serializing_if = "Option::is_none")]
	pub explorer_url: Option<String>,
	/// True for the chain the wallet is connected to.
	pub current: bool,
}

/// Response body for GET /api/chains.
#[derive(Debug, Serialize)]
pub struct ChainsResponse {
	#[serde(rename = "sourceChain")]
	pub source_chain: u64,
	pub chains: Vec<ChainEntry>,
}

/// Handles GET /api/chains.
///
/// Lists the configured networks so a front end can show the connected
/// network and populate the destination choices.
pub async fn handle_chains(State(state): State<AppState>) -> Json<ChainsResponse> {
	let config = state.engine.config();
	let source_chain = config.session.source_chain;

	let mut chains: Vec<ChainEntry> = config
		.chains
		.iter()
		.map(|(chain_id, chain)| ChainEntry {
			chain_id: *chain_id,
			name: chain.name.clone(),
			explorer_url: chain.explorer_url.clone(),
			current: *chain_id == source_chain,
		})
		.collect();
	chains.sort_by_key(|c| c.chain_id);

	Json(ChainsResponse {
		source_chain,
		chains,
	})
}
