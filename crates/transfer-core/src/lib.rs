//! Core workflow for the cross-chain transfer dashboard service.
//!
//! This crate owns the transfer submission and confirmation workflow:
//! input validation, contract-call construction and dispatch, receipt
//! tracking, and the session reconciler that merges the resulting
//! asynchronous events into one consistent submission state.

/// Session engine and event bus.
pub mod engine;
/// Transfer submitter.
pub mod handlers;
/// Confirmation tracker.
pub mod monitoring;
/// Submission state machine and session slot.
pub mod state;
/// Pure input validation.
pub mod validator;

pub use engine::{EngineError, SessionEngine, SubmitError};
pub use handlers::submission::{PreparedTransfer, SubmissionError, TransferSubmitter};
pub use state::SessionState;
pub use validator::{validate, ValidTransfer, ValidationError, TOKEN_DECIMALS};
