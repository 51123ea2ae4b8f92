//! Display preference endpoints.

use crate::server::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use transfer_types::Theme;

/// Body for the theme endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeBody {
	pub theme: Theme,
}

/// Handles GET /api/preferences/theme.
pub async fn handle_get_theme(
	State(state): State<AppState>,
) -> Result<Json<ThemeBody>, (StatusCode, Json<Value>)> {
	match state.preferences.theme().await {
		Ok(theme) => Ok(Json(ThemeBody { theme })),
		Err(e) => Err((
			StatusCode::INTERNAL_SERVER_ERROR,
			Json(json!({ "error": e.to_string() })),
		)),
	}
}

/// Handles PUT /api/preferences/theme.
pub async fn handle_set_theme(
	State(state): State<AppState>,
	Json(body): Json<ThemeBody>,
) -> Result<Json<ThemeBody>, (StatusCode, Json<Value>)> {
	match state.preferences.set_theme(body.theme).await {
		Ok(()) => Ok(Json(body)),
		Err(e) => {
			tracing::warn!(error = %e, "Failed to persist theme");
			Err((
				StatusCode::INTERNAL_SERVER_ERROR,
				Json(json!({ "error": e.to_string() })),
			))
		}
	}
}
