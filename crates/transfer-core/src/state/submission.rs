//! Single-slot submission state machine.
//!
//! The session holds at most one live [`TransferSubmission`]. All
//! mutation happens here, driven by discrete session events applied in
//! arrival order. Two rules give the workflow its consistency:
//!
//! - events carrying a `request_id` other than the live slot's are
//!   dropped, which is how an abandoned submission goes silent;
//! - a transition table rejects any move out of a terminal state, so a
//!   late event can never overwrite `Confirmed` or `Failed`.

use crate::handlers::submission::PreparedTransfer;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};
use transfer_types::{
	ConfirmationEvent, SessionEvent, SubmissionEvent, SubmissionState, TransferSubmission,
};

/// Allowed state transitions. Terminal states map to the empty set.
static TRANSITIONS: Lazy<HashMap<SubmissionState, HashSet<SubmissionState>>> = Lazy::new(|| {
	let mut m = HashMap::new();
	m.insert(
		SubmissionState::Idle,
		HashSet::from([SubmissionState::Submitting, SubmissionState::Failed]),
	);
	m.insert(
		SubmissionState::Submitting,
		HashSet::from([
			SubmissionState::PendingConfirmation,
			SubmissionState::Failed,
		]),
	);
	m.insert(
		SubmissionState::PendingConfirmation,
		HashSet::from([SubmissionState::Confirmed, SubmissionState::Failed]),
	);
	m.insert(SubmissionState::Confirmed, HashSet::new());
	m.insert(SubmissionState::Failed, HashSet::new());
	m
});

fn now_secs() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default()
		.as_secs()
}

/// The reconciler-owned session slot.
#[derive(Default)]
pub struct SessionState {
	current: Option<TransferSubmission>,
}

impl SessionState {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the live submission, if any.
	pub fn current(&self) -> Option<&TransferSubmission> {
		self.current.as_ref()
	}

	/// Replaces the slot with a fresh submission in `Idle`.
	///
	/// Any previous submission is abandoned: its events no longer match
	/// the live `request_id` and will be dropped by [`apply`].
	///
	/// [`apply`]: SessionState::apply
	pub fn begin(&mut self, prepared: &PreparedTransfer) {
		if let Some(previous) = &self.current {
			if !previous.state.is_terminal() {
				tracing::info!(
					request_id = %previous.request_id,
					state = %previous.state,
					"Abandoning previous submission"
				);
			}
		}

		let now = now_secs();
		self.current = Some(TransferSubmission {
			request_id: prepared.request_id,
			receiver: prepared.receiver.to_checksum(None),
			destination_chain: prepared.destination_chain,
			amount: prepared.amount.to_string(),
			state: SubmissionState::Idle,
			tx_hash: None,
			error: None,
			created_at: now,
			updated_at: now,
		});
	}

	/// Marks the live submission as dispatched to the wallet boundary.
	pub fn start_dispatch(&mut self, request_id: uuid::Uuid) {
		self.transition(request_id, SubmissionState::Submitting, None, None);
	}

	/// Applies a session event to the slot.
	///
	/// Returns true when the event changed the slot; false when it was
	/// dropped as stale or as an invalid transition.
	pub fn apply(&mut self, event: &SessionEvent) -> bool {
		match event {
			SessionEvent::Submission(SubmissionEvent::TransactionPending {
				request_id,
				tx_hash,
				..
			}) => self.transition(
				*request_id,
				SubmissionState::PendingConfirmation,
				Some(tx_hash.clone()),
				None,
			),
			SessionEvent::Submission(SubmissionEvent::Failed { request_id, error }) => {
				self.transition(
					*request_id,
					SubmissionState::Failed,
					None,
					Some(error.clone()),
				)
			}
			SessionEvent::Confirmation(ConfirmationEvent::Confirmed { request_id, .. }) => {
				self.transition(*request_id, SubmissionState::Confirmed, None, None)
			}
			SessionEvent::Confirmation(ConfirmationEvent::Failed {
				request_id, error, ..
			}) => self.transition(
				*request_id,
				SubmissionState::Failed,
				None,
				Some(error.clone()),
			),
			SessionEvent::History(_) => false,
		}
	}

	fn transition(
		&mut self,
		request_id: uuid::Uuid,
		to: SubmissionState,
		tx_hash: Option<transfer_types::TransactionHash>,
		error: Option<String>,
	) -> bool {
		let Some(submission) = self.current.as_mut() else {
			tracing::debug!(%request_id, "Dropping event with no live submission");
			return false;
		};

		if submission.request_id != request_id {
			tracing::debug!(
				%request_id,
				live = %submission.request_id,
				"Dropping event for abandoned submission"
			);
			return false;
		}

		let allowed = TRANSITIONS
			.get(&submission.state)
			.is_some_and(|set| set.contains(&to));
		if !allowed {
			tracing::debug!(
				%request_id,
				from = %submission.state,
				to = %to,
				"Dropping invalid transition"
			);
			return false;
		}

		submission.state = to;
		if tx_hash.is_some() {
			submission.tx_hash = tx_hash;
		}
		if error.is_some() {
			submission.error = error;
		}
		submission.updated_at = now_secs();
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{Address, U256};
	use transfer_types::{TransactionHash, TransactionReceipt};
	use uuid::Uuid;

	fn prepared() -> PreparedTransfer {
		PreparedTransfer {
			request_id: Uuid::new_v4(),
			receiver: Address::ZERO,
			destination_chain: 80002,
			amount: U256::from(1_500_000_000_000_000_000u128),
		}
	}

	fn hash() -> TransactionHash {
		TransactionHash(vec![0xab; 32])
	}

	fn pending(request_id: Uuid) -> SessionEvent {
		SessionEvent::Submission(SubmissionEvent::TransactionPending {
			request_id,
			tx_hash: hash(),
			chain_id: 11155111,
		})
	}

	fn confirmed(request_id: Uuid) -> SessionEvent {
		SessionEvent::Confirmation(ConfirmationEvent::Confirmed {
			request_id,
			tx_hash: hash(),
			receipt: TransactionReceipt {
				hash: hash(),
				block_number: 100,
				success: true,
			},
		})
	}

	fn confirmation_failed(request_id: Uuid, error: &str) -> SessionEvent {
		SessionEvent::Confirmation(ConfirmationEvent::Failed {
			request_id,
			tx_hash: hash(),
			error: error.to_string(),
		})
	}

	#[test]
	fn test_full_lifecycle() {
		let mut session = SessionState::new();
		let p = prepared();

		session.begin(&p);
		assert_eq!(session.current().unwrap().state, SubmissionState::Idle);

		session.start_dispatch(p.request_id);
		assert_eq!(session.current().unwrap().state, SubmissionState::Submitting);

		assert!(session.apply(&pending(p.request_id)));
		let live = session.current().unwrap();
		assert_eq!(live.state, SubmissionState::PendingConfirmation);
		assert!(live.tx_hash.is_some());

		assert!(session.apply(&confirmed(p.request_id)));
		let live = session.current().unwrap();
		assert_eq!(live.state, SubmissionState::Confirmed);
		assert!(live.error.is_none());
	}

	#[test]
	fn test_terminal_states_are_sticky() {
		let mut session = SessionState::new();
		let p = prepared();
		session.begin(&p);
		session.start_dispatch(p.request_id);
		session.apply(&pending(p.request_id));
		session.apply(&confirmed(p.request_id));

		// A late failure for the same request must not overwrite Confirmed
		assert!(!session.apply(&confirmation_failed(p.request_id, "stale error")));
		let live = session.current().unwrap();
		assert_eq!(live.state, SubmissionState::Confirmed);
		assert!(live.error.is_none());
	}

	#[test]
	fn test_duplicate_terminal_event_ignored() {
		let mut session = SessionState::new();
		let p = prepared();
		session.begin(&p);
		session.start_dispatch(p.request_id);
		session.apply(&pending(p.request_id));

		assert!(session.apply(&confirmed(p.request_id)));
		assert!(!session.apply(&confirmed(p.request_id)));
	}

	#[test]
	fn test_new_submission_suppresses_the_old_one() {
		let mut session = SessionState::new();
		let a = prepared();
		session.begin(&a);
		session.start_dispatch(a.request_id);
		session.apply(&pending(a.request_id));

		// B preempts while A is PendingConfirmation
		let b = prepared();
		session.begin(&b);
		session.start_dispatch(b.request_id);

		// Anything still arriving for A is dropped
		assert!(!session.apply(&confirmed(a.request_id)));
		assert!(!session.apply(&confirmation_failed(a.request_id, "late")));

		assert!(session.apply(&pending(b.request_id)));
		assert!(session.apply(&confirmed(b.request_id)));
		assert_eq!(session.current().unwrap().request_id, b.request_id);
		assert_eq!(session.current().unwrap().state, SubmissionState::Confirmed);
	}

	#[test]
	fn test_submission_failure_before_hash() {
		let mut session = SessionState::new();
		let p = prepared();
		session.begin(&p);
		session.start_dispatch(p.request_id);

		assert!(session.apply(&SessionEvent::Submission(SubmissionEvent::Failed {
			request_id: p.request_id,
			error: "User rejected the request".to_string(),
		})));
		let live = session.current().unwrap();
		assert_eq!(live.state, SubmissionState::Failed);
		assert_eq!(live.error.as_deref(), Some("User rejected the request"));
		assert!(live.tx_hash.is_none());
	}
}
