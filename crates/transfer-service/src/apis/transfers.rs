//! Transfer submission and status endpoints.

use crate::server::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use serde_json::{json, Value};
use transfer_core::{SubmitError, TOKEN_DECIMALS};
use transfer_types::{format_units, TransferRequest, TransferSubmission};
use uuid::Uuid;

/// Response body for an accepted submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
	#[serde(rename = "requestId")]
	pub request_id: Uuid,
}

/// Handles POST /api/transfers.
///
/// Validation failures come back as 422 with the specific reason; they
/// are input errors for the form, not failure notifications.
pub async fn handle_submit(
	State(state): State<AppState>,
	Json(request): Json<TransferRequest>,
) -> Result<Json<SubmitResponse>, (StatusCode, Json<Value>)> {
	match state.engine.submit(request).await {
		Ok(request_id) => Ok(Json(SubmitResponse { request_id })),
		Err(e) => {
			let status = match &e {
				SubmitError::Validation(_) | SubmitError::UnsupportedChain(_) => {
					StatusCode::UNPROCESSABLE_ENTITY
				}
				SubmitError::Balance(_) => StatusCode::BAD_GATEWAY,
				SubmitError::NotRunning => StatusCode::SERVICE_UNAVAILABLE,
			};
			tracing::warn!(error = %e, "Transfer submission not accepted");
			Err((status, Json(json!({ "error": e.to_string() }))))
		}
	}
}

/// Handles GET /api/transfers/current.
///
/// Returns the live submission, or null when none exists.
pub async fn handle_current(
	State(state): State<AppState>,
) -> Json<Option<TransferSubmission>> {
	Json(state.engine.current_submission().await)
}

/// Response body for the connected account's balance.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
	/// Balance in base units, as a decimal string.
	pub balance: String,
	/// Human-readable balance.
	pub formatted: String,
}

/// Handles GET /api/balance.
pub async fn handle_balance(
	State(state): State<AppState>,
) -> Result<Json<BalanceResponse>, (StatusCode, Json<Value>)> {
	match state.engine.balance().await {
		Ok(balance) => {
			let raw = balance.to_string();
			let formatted = format_units(&raw, TOKEN_DECIMALS);
			Ok(Json(BalanceResponse {
				balance: raw,
				formatted,
			}))
		}
		Err(e) => {
			tracing::warn!(error = %e, "Balance read failed");
			Err((
				StatusCode::BAD_GATEWAY,
				Json(json!({ "error": e.to_string() })),
			))
		}
	}
}
