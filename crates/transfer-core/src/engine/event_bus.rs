//! Broadcast event bus for session events.
//!
//! Components publish fire-and-forget; the engine loop is the primary
//! subscriber and applies events to the session slot in arrival order.

use tokio::sync::broadcast;
use transfer_types::SessionEvent;

/// Cloneable handle to the session event bus.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
	/// Creates a bus with the given channel capacity.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Publishes an event to all current subscribers.
	///
	/// Returns Err only when no subscriber exists; publishers treat that
	/// as non-fatal (`publish(..).ok()`).
	pub fn publish(
		&self,
		event: SessionEvent,
	) -> Result<usize, broadcast::error::SendError<SessionEvent>> {
		self.sender.send(event)
	}

	/// Creates a new subscription receiving events from this point on.
	pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
		self.sender.subscribe()
	}
}
