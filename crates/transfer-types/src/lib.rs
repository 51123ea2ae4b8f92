//! Common types for the cross-chain transfer dashboard service.
//!
//! This crate defines the data model shared by every component of the
//! service: chain registry entries, transfer requests and submissions,
//! history records, session events, and small utilities for hex and
//! token-amount handling.

/// Chain registry configuration types.
pub mod chains;
/// Transaction hash, receipt, and outbound call types.
pub mod delivery;
/// Session event types flowing over the event bus.
pub mod events;
/// Transfer history records fetched from the indexing service.
pub mod history;
/// Display preference types.
pub mod preferences;
/// Secure string wrapper for the wallet signing key.
pub mod secret_string;
/// Transfer request and submission lifecycle types.
pub mod transfer;
/// Hex and token-amount helpers.
pub mod utils;

pub use chains::{deserialize_chains, ChainConfig, ChainRegistry};
pub use delivery::{Transaction, TransactionHash, TransactionReceipt};
pub use events::{ConfirmationEvent, HistoryEvent, SessionEvent, SubmissionEvent};
pub use history::HistoryRecord;
pub use preferences::Theme;
pub use secret_string::SecretString;
pub use transfer::{SubmissionState, TransferRequest, TransferSubmission};
pub use utils::{format_units, parse_units, truncate_id, with_0x_prefix, AmountError};
