//! Pure validation of candidate transfers.
//!
//! Checks run in a fixed order: receiver well-formedness, amount
//! parseability and positivity, then balance sufficiency. The first
//! failure wins and is returned as the specific reason. No side effects;
//! callers decide how to surface the result (the API disables
//! submission, it never raises a notification).

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;
use transfer_types::{parse_units, TransferRequest};

/// Decimals of the transferable token; amounts are entered as decimal
/// strings and converted to base units at this scale.
pub const TOKEN_DECIMALS: u8 = 18;

/// Reasons a candidate transfer is rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
	/// Receiver is not a well-formed account address.
	#[error("Receiver is not a valid address")]
	InvalidAddress,
	/// Amount is not a positive decimal number.
	#[error("Amount is not a positive number")]
	InvalidAmount,
	/// Amount exceeds the connected account's balance.
	#[error("Amount exceeds the available balance")]
	InsufficientBalance,
}

/// A transfer that passed validation, with inputs parsed once.
///
/// The submitter consumes these fields directly and never re-parses
/// user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTransfer {
	/// Parsed receiver address.
	pub receiver: Address,
	/// Transfer amount in base units.
	pub amount: U256,
}

/// Validates a candidate transfer against the current known balance.
pub fn validate(
	request: &TransferRequest,
	balance: U256,
) -> Result<ValidTransfer, ValidationError> {
	let receiver = parse_receiver(&request.receiver).ok_or(ValidationError::InvalidAddress)?;

	let decimal = Decimal::from_str(request.amount.trim())
		.map_err(|_| ValidationError::InvalidAmount)?;
	if decimal <= Decimal::ZERO {
		return Err(ValidationError::InvalidAmount);
	}
	let amount = parse_units(&request.amount, TOKEN_DECIMALS)
		.map_err(|_| ValidationError::InvalidAmount)?;

	if amount > balance {
		return Err(ValidationError::InsufficientBalance);
	}

	Ok(ValidTransfer { receiver, amount })
}

/// Parses a receiver string as a strict 0x-prefixed account address.
fn parse_receiver(receiver: &str) -> Option<Address> {
	if !receiver.starts_with("0x") || receiver.len() != 42 {
		return None;
	}
	receiver.parse().ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	const RECEIVER: &str = "0x1111111111111111111111111111111111111111";

	fn request(receiver: &str, amount: &str) -> TransferRequest {
		TransferRequest {
			receiver: receiver.to_string(),
			amount: amount.to_string(),
			destination_chain: 80002,
		}
	}

	fn eth(amount: &str) -> U256 {
		parse_units(amount, TOKEN_DECIMALS).unwrap()
	}

	#[test]
	fn test_valid_transfer() {
		let valid = validate(&request(RECEIVER, "1.5"), eth("2.0")).unwrap();
		assert_eq!(valid.amount, eth("1.5"));
		assert_eq!(
			valid.receiver,
			RECEIVER.parse::<Address>().unwrap()
		);
	}

	#[test]
	fn test_invalid_amounts_rejected_regardless_of_balance() {
		for amount in ["0", "-1", "-0.5", "abc", "", "1..5"] {
			assert_eq!(
				validate(&request(RECEIVER, amount), eth("1000000")),
				Err(ValidationError::InvalidAmount),
				"amount {:?}",
				amount
			);
		}
	}

	#[test]
	fn test_insufficient_balance() {
		assert_eq!(
			validate(&request(RECEIVER, "1.5"), eth("1.0")),
			Err(ValidationError::InsufficientBalance)
		);
		// Exactly the balance is allowed
		assert!(validate(&request(RECEIVER, "1.5"), eth("1.5")).is_ok());
	}

	#[test]
	fn test_malformed_receivers_rejected() {
		for receiver in [
			"",
			"0x123",
			"1111111111111111111111111111111111111111",
			"0x11111111111111111111111111111111111111zz",
			"0x11111111111111111111111111111111111111111",
		] {
			assert_eq!(
				validate(&request(receiver, "1.0"), eth("2.0")),
				Err(ValidationError::InvalidAddress),
				"receiver {:?}",
				receiver
			);
		}
	}

	#[test]
	fn test_address_check_runs_first() {
		// A bad receiver wins over a bad amount
		assert_eq!(
			validate(&request("0x123", "abc"), U256::ZERO),
			Err(ValidationError::InvalidAddress)
		);
	}
}
