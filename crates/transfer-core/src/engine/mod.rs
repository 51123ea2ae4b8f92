//! Session engine orchestrating the transfer workflow.
//!
//! The engine is the reconciler of the system: it owns the single live
//! submission slot and is the only writer to it. User submissions come
//! in through an mpsc channel; submitter and tracker outcomes come back
//! over the broadcast bus; the run loop applies both in arrival order.

pub mod event_bus;

use crate::handlers::submission::{PreparedTransfer, TransferSubmitter};
use crate::monitoring::confirmation::ConfirmationMonitor;
use crate::state::SessionState;
use crate::validator::{validate, ValidationError};
use event_bus::EventBus;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex, RwLock};
use transfer_config::Config;
use transfer_delivery::DeliveryService;
use transfer_indexer::HistoryService;
use transfer_types::{
	truncate_id, ConfirmationEvent, HistoryEvent, SessionEvent, SubmissionEvent,
	TransferRequest, TransferSubmission,
};
use transfer_wallet::WalletService;
use uuid::Uuid;

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Service error: {0}")]
	Service(String),
}

/// Errors returned synchronously when a submission is not accepted.
///
/// Validation failures block submission without ever reaching the
/// wallet boundary; the API surfaces them as input errors, not as
/// failure notifications.
#[derive(Debug, Error)]
pub enum SubmitError {
	#[error(transparent)]
	Validation(#[from] ValidationError),
	#[error("Destination chain {0} is not configured")]
	UnsupportedChain(u64),
	#[error("Failed to read balance: {0}")]
	Balance(String),
	#[error("Session engine is not running")]
	NotRunning,
}

/// Main engine driving the transfer submission lifecycle.
pub struct SessionEngine {
	/// Service configuration.
	config: Config,
	/// RPC delivery boundary.
	delivery: Arc<DeliveryService>,
	/// Connected wallet.
	wallet: Arc<WalletService>,
	/// History feed adapter.
	history: Arc<HistoryService>,
	/// Builds and dispatches transfer calls.
	submitter: TransferSubmitter,
	/// Tracks pending transactions.
	monitor: Arc<ConfirmationMonitor>,
	/// Event bus for submitter/tracker outcomes.
	event_bus: EventBus,
	/// The single live submission slot.
	session: Arc<RwLock<SessionState>>,
	/// Bumped on every new submission; watches from older generations
	/// abandon themselves.
	watch_generation: Arc<AtomicU64>,
	/// Accepted submissions queued for the run loop.
	submit_tx: mpsc::UnboundedSender<PreparedTransfer>,
	/// Receiver side, taken once by run().
	submit_rx: Mutex<Option<mpsc::UnboundedReceiver<PreparedTransfer>>>,
}

impl SessionEngine {
	/// Creates a new engine over the given services.
	pub fn new(
		config: Config,
		delivery: Arc<DeliveryService>,
		wallet: Arc<WalletService>,
		history: Arc<HistoryService>,
	) -> Self {
		let event_bus = EventBus::new(1000);
		let watch_generation = Arc::new(AtomicU64::new(0));

		let submitter = TransferSubmitter::new(
			config.chains.clone(),
			config.session.source_chain,
			Arc::clone(&delivery),
			event_bus.clone(),
		);
		let monitor = Arc::new(ConfirmationMonitor::new(
			Arc::clone(&delivery),
			event_bus.clone(),
			config.session.monitoring_timeout_minutes,
			Arc::clone(&watch_generation),
		));

		let (submit_tx, submit_rx) = mpsc::unbounded_channel();

		Self {
			config,
			delivery,
			wallet,
			history,
			submitter,
			monitor,
			event_bus,
			session: Arc::new(RwLock::new(SessionState::new())),
			watch_generation,
			submit_tx,
			submit_rx: Mutex::new(Some(submit_rx)),
		}
	}

	/// Returns a reference to the event bus.
	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}

	/// Returns a reference to the configuration.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Returns the live submission, if any.
	pub async fn current_submission(&self) -> Option<TransferSubmission> {
		self.session.read().await.current().cloned()
	}

	/// Native balance of the connected account on the source chain.
	pub async fn balance(&self) -> Result<alloy_primitives::U256, SubmitError> {
		self.delivery
			.balance(self.wallet.address(), self.config.session.source_chain)
			.await
			.map_err(|e| SubmitError::Balance(e.to_string()))
	}

	/// Validates a transfer request and queues it for dispatch.
	///
	/// Returns the fresh request id on acceptance. Validation runs here,
	/// synchronously, so a rejected request never reaches the wallet
	/// boundary. Accepting a request while another submission is in
	/// flight abandons the old one.
	pub async fn submit(&self, request: TransferRequest) -> Result<Uuid, SubmitError> {
		if !self.config.chains.contains_key(&request.destination_chain) {
			return Err(SubmitError::UnsupportedChain(request.destination_chain));
		}

		let balance = self.balance().await?;
		let valid = validate(&request, balance)?;

		let prepared = PreparedTransfer {
			request_id: Uuid::new_v4(),
			receiver: valid.receiver,
			destination_chain: request.destination_chain,
			amount: valid.amount,
		};
		let request_id = prepared.request_id;

		self.submit_tx
			.send(prepared)
			.map_err(|_| SubmitError::NotRunning)?;

		tracing::info!(
			request_id = %truncate_id(&request_id.to_string()),
			destination_chain = request.destination_chain,
			"Accepted transfer submission"
		);
		Ok(request_id)
	}

	/// Main execution loop.
	///
	/// Processes accepted submissions, applies bus events to the session
	/// slot, refreshes history on the configured interval, and shuts
	/// down on Ctrl+C.
	pub async fn run(&self) -> Result<(), EngineError> {
		let mut submit_rx = self
			.submit_rx
			.lock()
			.await
			.take()
			.ok_or_else(|| EngineError::Service("Engine is already running".into()))?;

		let mut events = self.event_bus.subscribe();
		let mut refresh_interval = self
			.config
			.indexer
			.refresh_interval_secs
			.map(|secs| tokio::time::interval(tokio::time::Duration::from_secs(secs)));

		// Populate the history feed for the freshly connected account
		self.spawn_history_refresh();

		loop {
			tokio::select! {
				Some(prepared) = submit_rx.recv() => {
					self.handle_submission(prepared).await;
				}

				Ok(event) = events.recv() => {
					self.handle_event(event).await;
				}

				_ = maybe_tick(&mut refresh_interval) => {
					self.spawn_history_refresh();
				}

				_ = tokio::signal::ctrl_c() => {
					tracing::info!("Shutting down session engine");
					break;
				}
			}
		}

		Ok(())
	}

	/// Starts the lifecycle of an accepted submission.
	async fn handle_submission(&self, prepared: PreparedTransfer) {
		// Any watch started before this point is now superseded
		self.watch_generation.fetch_add(1, Ordering::SeqCst);

		{
			let mut session = self.session.write().await;
			session.begin(&prepared);
			session.start_dispatch(prepared.request_id);
		}

		self.submitter.dispatch(&prepared).await;
	}

	/// Applies a bus event to the session slot and reacts to it.
	async fn handle_event(&self, event: SessionEvent) {
		if let SessionEvent::History(HistoryEvent::Refreshed { records }) = &event {
			tracing::debug!(records, "History refreshed");
			return;
		}

		let applied = self.session.write().await.apply(&event);
		if !applied {
			return;
		}

		match event {
			SessionEvent::Submission(SubmissionEvent::TransactionPending {
				request_id,
				tx_hash,
				chain_id,
			}) => {
				let monitor = Arc::clone(&self.monitor);
				let generation = self.watch_generation.load(Ordering::SeqCst);
				tokio::spawn(async move {
					monitor.watch(request_id, tx_hash, chain_id, generation).await;
				});
			}
			SessionEvent::Confirmation(ConfirmationEvent::Confirmed { request_id, .. }) => {
				tracing::info!(
					request_id = %truncate_id(&request_id.to_string()),
					"Transfer confirmed"
				);
				// The confirmed transfer will show up in the indexer
				self.spawn_history_refresh();
			}
			SessionEvent::Submission(SubmissionEvent::Failed { request_id, error })
			| SessionEvent::Confirmation(ConfirmationEvent::Failed {
				request_id, error, ..
			}) => {
				tracing::warn!(
					request_id = %truncate_id(&request_id.to_string()),
					error = %error,
					"Transfer failed"
				);
			}
			SessionEvent::History(_) => {}
		}
	}

	fn spawn_history_refresh(&self) {
		let history = Arc::clone(&self.history);
		let event_bus = self.event_bus.clone();
		tokio::spawn(async move {
			match history.refresh().await {
				Ok(records) => {
					event_bus
						.publish(SessionEvent::History(HistoryEvent::Refreshed { records }))
						.ok();
				}
				Err(e) => tracing::warn!(error = %e, "History refresh failed"),
			}
		});
	}
}

/// Waits for the next tick, or forever when no interval is configured.
async fn maybe_tick(interval: &mut Option<tokio::time::Interval>) {
	match interval {
		Some(interval) => {
			interval.tick().await;
		}
		None => std::future::pending::<()>().await,
	}
}
