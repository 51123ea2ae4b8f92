//! Main entry point for the transfer dashboard service.
//!
//! Wires the configured services together — wallet, RPC delivery,
//! history indexer, preference storage — around the session engine, and
//! serves the dashboard HTTP API next to it.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use transfer_config::Config;
use transfer_core::SessionEngine;
use transfer_delivery::{implementations::evm::alloy::AlloyDelivery, DeliveryService};
use transfer_indexer::{
	implementations::subgraph::SubgraphIndexer, DeliverySymbolSource, HistoryService,
};
use transfer_storage::{implementations::file::FileStorage, PreferenceStore, StorageService};
use transfer_wallet::WalletService;

mod apis;
mod server;

/// Command-line arguments for the dashboard service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};
	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(args.log_level.to_string()));
	fmt().with_env_filter(env_filter).with_target(true).init();

	// Load configuration
	let config = Config::from_file(
		args.config
			.to_str()
			.ok_or("Configuration path is not valid UTF-8")?,
	)
	.await?;
	tracing::info!(
		chains = config.chains.len(),
		source_chain = config.session.source_chain,
		"Loaded configuration"
	);

	// Connected wallet
	let wallet = Arc::new(WalletService::from_key(&config.wallet.private_key)?);
	tracing::info!(account = %wallet.address(), "Connected wallet");

	// RPC delivery boundary over all configured chains
	let alloy = AlloyDelivery::new(&config.chains, &wallet)?;
	let delivery = Arc::new(DeliveryService::new(
		Box::new(alloy),
		config.session.confirmations,
	));

	// History feed: subgraph fetch plus on-chain symbol resolution
	let client = reqwest::Client::builder()
		.timeout(std::time::Duration::from_secs(30))
		.build()?;
	let indexer = SubgraphIndexer::new(client, config.indexer.url.clone());
	let symbols = Arc::new(DeliverySymbolSource::new(
		Arc::clone(&delivery),
		config.indexer.chain_id,
	));
	let history = Arc::new(HistoryService::new(
		Box::new(indexer),
		symbols,
		config.indexer.page_size,
	));

	// Persisted display preference
	let preferences = Arc::new(PreferenceStore::new(StorageService::new(Box::new(
		FileStorage::new(&config.preferences.path),
	))));

	let api_config = config.api.clone();
	let engine = Arc::new(SessionEngine::new(
		config,
		delivery,
		wallet,
		Arc::clone(&history),
	));

	let api_enabled = api_config.as_ref().is_some_and(|api| api.enabled);
	if api_enabled {
		let api_config = api_config.ok_or("API configuration missing")?;
		let state = server::AppState {
			engine: Arc::clone(&engine),
			history,
			preferences,
		};

		// Run the engine and the API server concurrently
		tokio::select! {
			result = engine.run() => {
				tracing::info!("Session engine finished");
				result?;
			}
			result = server::start_server(api_config, state) => {
				tracing::info!("API server finished");
				result?;
			}
		}
	} else {
		tracing::info!("API disabled, running session engine only");
		engine.run().await?;
	}

	tracing::info!("Stopped");
	Ok(())
}
