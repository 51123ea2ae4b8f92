//! Transfer request and submission lifecycle types.
//!
//! A [`TransferRequest`] captures the user's input exactly as entered.
//! Once accepted, it becomes a [`TransferSubmission`] that moves through
//! the lifecycle `Idle -> Submitting -> PendingConfirmation ->
//! Confirmed | Failed`. At most one submission is live at a time; the
//! session reconciler owns the live slot for the whole lifecycle.

use crate::TransactionHash;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A candidate cross-chain transfer as entered by the user.
///
/// Amounts are decimal strings ("1.5"), not base units; parsing and
/// range checks happen in the validator. Immutable once submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
	/// Receiver account address on the destination chain.
	pub receiver: String,
	/// Token amount as a decimal string.
	pub amount: String,
	/// Chain ID of the destination network.
	pub destination_chain: u64,
}

/// Status of a transfer submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SubmissionState {
	/// Accepted but not yet dispatched.
	Idle,
	/// Contract call handed to the wallet/RPC boundary, no hash yet.
	Submitting,
	/// Transaction hash known, awaiting the receipt.
	PendingConfirmation,
	/// Receipt observed with successful execution. Terminal.
	Confirmed,
	/// Submission or confirmation failed. Terminal.
	Failed,
}

impl SubmissionState {
	/// True for states from which no further transition occurs.
	pub fn is_terminal(&self) -> bool {
		matches!(self, SubmissionState::Confirmed | SubmissionState::Failed)
	}

	/// True while a submission is outstanding on the wire.
	pub fn is_in_flight(&self) -> bool {
		matches!(
			self,
			SubmissionState::Submitting | SubmissionState::PendingConfirmation
		)
	}
}

impl fmt::Display for SubmissionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SubmissionState::Idle => write!(f, "Idle"),
			SubmissionState::Submitting => write!(f, "Submitting"),
			SubmissionState::PendingConfirmation => write!(f, "PendingConfirmation"),
			SubmissionState::Confirmed => write!(f, "Confirmed"),
			SubmissionState::Failed => write!(f, "Failed"),
		}
	}
}

/// A transfer attempt with its lifecycle state.
///
/// Each attempt gets a fresh client-generated `request_id`; retrying a
/// failed transfer is a new submission, never a reuse of the old handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferSubmission {
	/// Unique identifier for this attempt.
	pub request_id: Uuid,
	/// Receiver address as entered.
	pub receiver: String,
	/// Destination chain ID.
	pub destination_chain: u64,
	/// Transfer amount in base units, as a decimal string.
	pub amount: String,
	/// Current lifecycle state.
	pub state: SubmissionState,
	/// Transaction hash once the dispatch returned one.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tx_hash: Option<TransactionHash>,
	/// Human-readable cause when `state` is `Failed`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	/// Unix timestamp when this attempt was created.
	pub created_at: u64,
	/// Unix timestamp of the last state change.
	pub updated_at: u64,
}
