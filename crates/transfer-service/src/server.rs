//! HTTP server for the dashboard API.
//!
//! The reactive UI boundary of the dashboard: a front end submits
//! transfers, polls the live submission, reads history and balance, and
//! persists its theme through these endpoints.

use axum::{
	routing::{get, post},
	Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use transfer_config::ApiConfig;
use transfer_core::SessionEngine;
use transfer_indexer::HistoryService;
use transfer_storage::PreferenceStore;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Session engine processing transfer submissions.
	pub engine: Arc<SessionEngine>,
	/// History feed adapter.
	pub history: Arc<HistoryService>,
	/// Persisted display preference.
	pub preferences: Arc<PreferenceStore>,
}

/// Starts the HTTP server for the dashboard API.
pub async fn start_server(
	api_config: ApiConfig,
	state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/transfers", post(crate::apis::transfers::handle_submit))
				.route(
					"/transfers/current",
					get(crate::apis::transfers::handle_current),
				)
				.route("/balance", get(crate::apis::transfers::handle_balance))
				.route("/chains", get(crate::apis::chains::handle_chains))
				.route("/history", get(crate::apis::history::handle_history))
				.route(
					"/preferences/theme",
					get(crate::apis::preferences::handle_get_theme)
						.put(crate::apis::preferences::handle_set_theme),
				),
		)
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(state);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Dashboard API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}
