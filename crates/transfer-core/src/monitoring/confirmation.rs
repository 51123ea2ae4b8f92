//! Confirmation tracker for submitted transfers.
//!
//! Watches a single transaction hash from submission until a terminal
//! outcome: a successful receipt, a revert, or a tracking failure
//! (timeout included). Publishes at most one terminal event per watch —
//! every publish is immediately followed by return, so duplicate receipt
//! observations can never produce a second notification. A watch also
//! carries the generation it was started under; when a new submission
//! bumps the shared generation, the old watch stops polling and goes
//! silent.

use crate::engine::event_bus::EventBus;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use transfer_delivery::DeliveryService;
use transfer_types::{truncate_id, ConfirmationEvent, SessionEvent, TransactionHash};
use uuid::Uuid;

/// Tracks pending transactions until they resolve.
pub struct ConfirmationMonitor {
	delivery: Arc<DeliveryService>,
	event_bus: EventBus,
	timeout_minutes: u64,
	generation: Arc<AtomicU64>,
}

impl ConfirmationMonitor {
	pub fn new(
		delivery: Arc<DeliveryService>,
		event_bus: EventBus,
		timeout_minutes: u64,
		generation: Arc<AtomicU64>,
	) -> Self {
		Self {
			delivery,
			event_bus,
			timeout_minutes,
			generation,
		}
	}

	/// Watches a transaction hash until it reaches a terminal outcome.
	///
	/// `generation` is the value of the shared watch counter at spawn
	/// time; the watch abandons itself once a newer submission has
	/// bumped it.
	pub async fn watch(
		&self,
		request_id: Uuid,
		tx_hash: TransactionHash,
		chain_id: u64,
		generation: u64,
	) {
		let monitoring_timeout = tokio::time::Duration::from_secs(self.timeout_minutes * 60);
		let poll_interval = tokio::time::Duration::from_secs(3);
		let start_time = tokio::time::Instant::now();

		loop {
			if self.generation.load(Ordering::SeqCst) != generation {
				tracing::info!(
					request_id = %truncate_id(&request_id.to_string()),
					tx_hash = %truncate_id(&tx_hash.to_hex()),
					"Watch superseded by a newer submission"
				);
				return;
			}

			if start_time.elapsed() > monitoring_timeout {
				tracing::warn!(
					request_id = %truncate_id(&request_id.to_string()),
					tx_hash = %truncate_id(&tx_hash.to_hex()),
					"Confirmation timeout reached after {} minutes",
					self.timeout_minutes
				);
				self.publish_failed(
					request_id,
					tx_hash,
					format!(
						"No confirmation after {} minutes",
						self.timeout_minutes
					),
				);
				return;
			}

			match self.delivery.receipt(&tx_hash, chain_id).await {
				Ok(receipt) if receipt.success => {
					match self.delivery.confirm_with_default(&tx_hash, chain_id).await {
						Ok(receipt) => {
							tracing::info!(
								request_id = %truncate_id(&request_id.to_string()),
								tx_hash = %truncate_id(&tx_hash.to_hex()),
								block = receipt.block_number,
								"Confirmed"
							);
							self.event_bus
								.publish(SessionEvent::Confirmation(ConfirmationEvent::Confirmed {
									request_id,
									tx_hash,
									receipt,
								}))
								.ok();
						}
						Err(e) => {
							self.publish_failed(
								request_id,
								tx_hash,
								format!("Failed waiting for confirmations: {}", e),
							);
						}
					}
					return;
				}
				Ok(_) => {
					self.publish_failed(request_id, tx_hash, "Transaction reverted".to_string());
					return;
				}
				Err(e) => {
					// Not yet mined or a transient provider error; keep
					// polling until the timeout
					tracing::debug!(
						tx_hash = %truncate_id(&tx_hash.to_hex()),
						elapsed_secs = start_time.elapsed().as_secs(),
						error = %e,
						"Receipt not available yet"
					);
				}
			}

			tokio::time::sleep(poll_interval).await;
		}
	}

	fn publish_failed(&self, request_id: Uuid, tx_hash: TransactionHash, error: String) {
		tracing::warn!(
			request_id = %truncate_id(&request_id.to_string()),
			error = %error,
			"Confirmation failed"
		);
		self.event_bus
			.publish(SessionEvent::Confirmation(ConfirmationEvent::Failed {
				request_id,
				tx_hash,
				error,
			}))
			.ok();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{Address, U256};
	use std::collections::VecDeque;
	use std::sync::Mutex;
	use transfer_delivery::{DeliveryError, DeliveryInterface};
	use transfer_types::{Transaction, TransactionReceipt};

	/// Delivery stub replaying a scripted sequence of receipt results;
	/// the last entry repeats forever.
	struct ScriptedDelivery {
		receipts: Mutex<VecDeque<Result<TransactionReceipt, String>>>,
		last: Result<TransactionReceipt, String>,
	}

	impl ScriptedDelivery {
		fn new(
			script: Vec<Result<TransactionReceipt, String>>,
			last: Result<TransactionReceipt, String>,
		) -> Self {
			Self {
				receipts: Mutex::new(script.into()),
				last,
			}
		}

		fn next(&self) -> Result<TransactionReceipt, DeliveryError> {
			let mut receipts = self.receipts.lock().unwrap();
			receipts
				.pop_front()
				.unwrap_or_else(|| self.last.clone())
				.map_err(DeliveryError::Network)
		}
	}

	#[async_trait::async_trait]
	impl DeliveryInterface for ScriptedDelivery {
		async fn submit(&self, _tx: Transaction) -> Result<TransactionHash, DeliveryError> {
			Err(DeliveryError::Network("unused".into()))
		}

		async fn get_receipt(
			&self,
			_hash: &TransactionHash,
			_chain_id: u64,
		) -> Result<TransactionReceipt, DeliveryError> {
			self.next()
		}

		async fn wait_for_confirmation(
			&self,
			_hash: &TransactionHash,
			_chain_id: u64,
			_confirmations: u64,
		) -> Result<TransactionReceipt, DeliveryError> {
			self.next()
		}

		async fn get_balance(
			&self,
			_address: Address,
			_chain_id: u64,
		) -> Result<U256, DeliveryError> {
			Ok(U256::ZERO)
		}

		async fn token_symbol(
			&self,
			_token: Address,
			_chain_id: u64,
		) -> Result<String, DeliveryError> {
			Err(DeliveryError::Network("unused".into()))
		}
	}

	fn receipt(success: bool) -> TransactionReceipt {
		TransactionReceipt {
			hash: TransactionHash(vec![0xab; 32]),
			block_number: 42,
			success,
		}
	}

	fn drain(
		rx: &mut tokio::sync::broadcast::Receiver<SessionEvent>,
	) -> Vec<SessionEvent> {
		let mut events = Vec::new();
		while let Ok(event) = rx.try_recv() {
			events.push(event);
		}
		events
	}

	#[tokio::test(start_paused = true)]
	async fn test_success_emits_exactly_one_terminal_event() {
		let bus = EventBus::new(16);
		let mut rx = bus.subscribe();
		let delivery = Arc::new(DeliveryService::new(
			// Pending twice, then success forever: the repeats must not
			// produce further events
			Box::new(ScriptedDelivery::new(
				vec![Err("not found".into()), Err("not found".into())],
				Ok(receipt(true)),
			)),
			1,
		));
		let generation = Arc::new(AtomicU64::new(1));
		let monitor = ConfirmationMonitor::new(delivery, bus, 30, generation);

		monitor
			.watch(Uuid::new_v4(), TransactionHash(vec![0xab; 32]), 11155111, 1)
			.await;

		let events = drain(&mut rx);
		assert_eq!(events.len(), 1);
		assert!(matches!(
			events[0],
			SessionEvent::Confirmation(ConfirmationEvent::Confirmed { .. })
		));
	}

	#[tokio::test(start_paused = true)]
	async fn test_revert_emits_failure() {
		let bus = EventBus::new(16);
		let mut rx = bus.subscribe();
		let delivery = Arc::new(DeliveryService::new(
			Box::new(ScriptedDelivery::new(vec![], Ok(receipt(false)))),
			1,
		));
		let generation = Arc::new(AtomicU64::new(1));
		let monitor = ConfirmationMonitor::new(delivery, bus, 30, generation);

		monitor
			.watch(Uuid::new_v4(), TransactionHash(vec![0xab; 32]), 11155111, 1)
			.await;

		let events = drain(&mut rx);
		assert_eq!(events.len(), 1);
		match &events[0] {
			SessionEvent::Confirmation(ConfirmationEvent::Failed { error, .. }) => {
				assert_eq!(error, "Transaction reverted");
			}
			other => panic!("Unexpected event: {:?}", other),
		}
	}

	#[tokio::test(start_paused = true)]
	async fn test_timeout_emits_failure() {
		let bus = EventBus::new(16);
		let mut rx = bus.subscribe();
		let delivery = Arc::new(DeliveryService::new(
			Box::new(ScriptedDelivery::new(vec![], Err("not found".into()))),
			1,
		));
		let generation = Arc::new(AtomicU64::new(1));
		let monitor = ConfirmationMonitor::new(delivery, bus, 1, generation);

		monitor
			.watch(Uuid::new_v4(), TransactionHash(vec![0xab; 32]), 11155111, 1)
			.await;

		let events = drain(&mut rx);
		assert_eq!(events.len(), 1);
		assert!(matches!(
			&events[0],
			SessionEvent::Confirmation(ConfirmationEvent::Failed { .. })
		));
	}

	#[tokio::test(start_paused = true)]
	async fn test_superseded_watch_goes_silent() {
		let bus = EventBus::new(16);
		let mut rx = bus.subscribe();
		let delivery = Arc::new(DeliveryService::new(
			Box::new(ScriptedDelivery::new(vec![], Ok(receipt(true)))),
			1,
		));
		let generation = Arc::new(AtomicU64::new(2));
		let monitor = ConfirmationMonitor::new(delivery, bus, 30, generation);

		// Started under generation 1, but a newer submission already
		// bumped the counter to 2
		monitor
			.watch(Uuid::new_v4(), TransactionHash(vec![0xab; 32]), 11155111, 1)
			.await;

		assert!(drain(&mut rx).is_empty());
	}
}
