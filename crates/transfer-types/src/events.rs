//! Event types for the session bus.
//!
//! Components never mutate the live submission directly; they publish
//! discrete events which the session reconciler applies in arrival
//! order. Every event carries the `request_id` of the attempt it belongs
//! to so events from abandoned attempts can be dropped.

use crate::{TransactionHash, TransactionReceipt};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// All events flowing through the session bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
	/// Events from the transfer submitter.
	Submission(SubmissionEvent),
	/// Events from the confirmation tracker.
	Confirmation(ConfirmationEvent),
	/// Events from the history feed adapter.
	History(HistoryEvent),
}

/// Outcomes of dispatching a transfer contract call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SubmissionEvent {
	/// The call was handed to the wallet/RPC boundary and returned a hash.
	TransactionPending {
		request_id: Uuid,
		tx_hash: TransactionHash,
		chain_id: u64,
	},
	/// Dispatch failed before a hash existed (wallet rejection, RPC
	/// failure, malformed arguments).
	Failed { request_id: Uuid, error: String },
}

/// Terminal outcomes observed by the confirmation tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConfirmationEvent {
	/// A successful receipt was observed.
	Confirmed {
		request_id: Uuid,
		tx_hash: TransactionHash,
		receipt: TransactionReceipt,
	},
	/// The transaction reverted or receipt tracking failed.
	Failed {
		request_id: Uuid,
		tx_hash: TransactionHash,
		error: String,
	},
}

/// History feed notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HistoryEvent {
	/// A refresh completed and replaced the stored record set.
	Refreshed { records: usize },
}
