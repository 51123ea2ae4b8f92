//! Transfer submitter.
//!
//! Builds the cross-chain transfer contract call from registry data and
//! a validated request, and dispatches it through the delivery boundary.
//! Exactly one outbound signing request is issued per dispatch; nothing
//! here retries — a retry is a fresh submission with a fresh request id.

use crate::engine::event_bus::EventBus;
use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use std::sync::Arc;
use thiserror::Error;
use transfer_delivery::{DeliveryError, DeliveryService};
use transfer_types::{
	truncate_id, ChainRegistry, SessionEvent, SubmissionEvent, Transaction,
};
use uuid::Uuid;

sol! {
	/// Transferor contract entrypoint; fees are paid in LINK.
	interface ITokenTransferor {
		function transferTokensPayLINK(
			uint64 destinationChainSelector,
			address receiver,
			address token,
			uint256 amount
		) external returns (bytes32 messageId);
	}
}

/// Errors raised while building or dispatching a transfer call.
#[derive(Debug, Error)]
pub enum SubmissionError {
	/// A referenced chain has no registry entry. Configuration error,
	/// fatal for the attempt.
	#[error("Chain {0} is not configured")]
	UnsupportedChain(u64),
	/// The wallet/RPC boundary refused or failed the dispatch.
	#[error("{0}")]
	Delivery(#[from] DeliveryError),
}

/// A validated transfer ready for dispatch.
///
/// Produced by the engine after validation passed; carries parsed
/// values only.
#[derive(Debug, Clone)]
pub struct PreparedTransfer {
	/// Fresh client-generated identifier for this attempt.
	pub request_id: Uuid,
	/// Parsed receiver address.
	pub receiver: Address,
	/// Destination chain ID.
	pub destination_chain: u64,
	/// Transfer amount in base units.
	pub amount: U256,
}

/// Builds and dispatches transfer contract calls.
pub struct TransferSubmitter {
	registry: ChainRegistry,
	source_chain: u64,
	delivery: Arc<DeliveryService>,
	event_bus: EventBus,
}

impl TransferSubmitter {
	pub fn new(
		registry: ChainRegistry,
		source_chain: u64,
		delivery: Arc<DeliveryService>,
		event_bus: EventBus,
	) -> Self {
		Self {
			registry,
			source_chain,
			delivery,
			event_bus,
		}
	}

	/// Builds the contract call for a prepared transfer.
	///
	/// The contract address comes from the connected (source) chain; the
	/// selector and token address come from the chosen destination.
	pub fn build_transaction(
		&self,
		prepared: &PreparedTransfer,
	) -> Result<Transaction, SubmissionError> {
		let source = self
			.registry
			.get(&self.source_chain)
			.ok_or(SubmissionError::UnsupportedChain(self.source_chain))?;
		let destination = self
			.registry
			.get(&prepared.destination_chain)
			.ok_or(SubmissionError::UnsupportedChain(prepared.destination_chain))?;

		let call = ITokenTransferor::transferTokensPayLINKCall {
			destinationChainSelector: destination.chain_selector,
			receiver: prepared.receiver,
			token: destination.token_address,
			amount: prepared.amount,
		};

		Ok(Transaction {
			chain_id: self.source_chain,
			to: source.transferor_address,
			data: call.abi_encode(),
			value: U256::ZERO,
		})
	}

	/// Dispatches a prepared transfer and publishes the outcome.
	///
	/// On success a `TransactionPending` event carries the hash; any
	/// failure becomes a `Submission::Failed` event with the cause.
	pub async fn dispatch(&self, prepared: &PreparedTransfer) {
		let outcome = match self.build_transaction(prepared) {
			Ok(tx) => self.delivery.deliver(tx).await.map_err(SubmissionError::from),
			Err(e) => Err(e),
		};

		match outcome {
			Ok(tx_hash) => {
				tracing::info!(
					request_id = %truncate_id(&prepared.request_id.to_string()),
					tx_hash = %truncate_id(&tx_hash.to_hex()),
					"Transfer dispatched"
				);
				self.event_bus
					.publish(SessionEvent::Submission(SubmissionEvent::TransactionPending {
						request_id: prepared.request_id,
						tx_hash,
						chain_id: self.source_chain,
					}))
					.ok();
			}
			Err(e) => {
				tracing::warn!(
					request_id = %truncate_id(&prepared.request_id.to_string()),
					error = %e,
					"Transfer dispatch failed"
				);
				self.event_bus
					.publish(SessionEvent::Submission(SubmissionEvent::Failed {
						request_id: prepared.request_id,
						error: e.to_string(),
					}))
					.ok();
			}
		}
	}
}
