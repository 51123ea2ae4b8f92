//! Hex-string and token-amount helpers.

use alloy_primitives::U256;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when converting a decimal amount to base units.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
	/// The input does not parse as a decimal number.
	#[error("Not a decimal number: {0}")]
	NotANumber(String),
	/// Negative amounts cannot be represented on-chain.
	#[error("Amount is negative")]
	Negative,
	/// More fractional digits than the token supports.
	#[error("More than {0} decimal places")]
	TooManyDecimals(u8),
}

/// Truncates an identifier for log output.
///
/// Shows the first 8 characters followed by ".." for longer strings.
pub fn truncate_id(id: &str) -> String {
	if id.len() <= 8 {
		id.to_string()
	} else {
		format!("{}..", &id[..8])
	}
}

/// Ensures a hex string carries the "0x" prefix.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.to_lowercase().starts_with("0x") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Converts a user-entered decimal amount into base units.
///
/// "1.5" with 18 decimals becomes 1_500_000_000_000_000_000. Rejects
/// negative values and amounts with more fractional digits than the
/// token carries; positivity is a validator concern, not enforced here.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, AmountError> {
	let value =
		Decimal::from_str(amount.trim()).map_err(|_| AmountError::NotANumber(amount.to_string()))?;
	if value.is_sign_negative() {
		return Err(AmountError::Negative);
	}
	let scale = value.scale();
	if scale > decimals as u32 {
		return Err(AmountError::TooManyDecimals(decimals));
	}

	// mantissa is non-negative after the sign check above
	let mantissa = value.mantissa().unsigned_abs();
	let shift = decimals as u32 - scale;
	Ok(U256::from(mantissa) * U256::from(10u8).pow(U256::from(shift)))
}

/// Formats a base-unit amount for display.
///
/// The inverse of [`parse_units`]: "1500000000000000000" with 18
/// decimals renders as "1.5", with trailing zeros trimmed.
pub fn format_units(amount: &str, decimals: u8) -> String {
	if decimals == 0 {
		return amount.to_string();
	}

	let places = decimals as usize;
	let (integer_part, decimal_part) = if amount.len() <= places {
		(
			"0".to_string(),
			format!("{:0>width$}", amount, width = places),
		)
	} else {
		let split = amount.len() - places;
		(amount[..split].to_string(), amount[split..].to_string())
	};

	let trimmed = decimal_part.trim_end_matches('0');
	if trimmed.is_empty() {
		integer_part
	} else {
		format!("{}.{}", integer_part, trimmed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_truncate_id() {
		assert_eq!(truncate_id("12345678"), "12345678");
		assert_eq!(truncate_id("0x1234567890abcdef"), "0x123456..");
	}

	#[test]
	fn test_with_0x_prefix() {
		assert_eq!(with_0x_prefix("abc123"), "0xabc123");
		assert_eq!(with_0x_prefix("0xabc123"), "0xabc123");
	}

	#[test]
	fn test_parse_units() {
		assert_eq!(
			parse_units("1.5", 18).unwrap(),
			U256::from(1_500_000_000_000_000_000u128)
		);
		assert_eq!(parse_units("0", 18).unwrap(), U256::ZERO);
		assert_eq!(parse_units("2", 6).unwrap(), U256::from(2_000_000u64));
		assert_eq!(parse_units("-1", 18), Err(AmountError::Negative));
		assert!(matches!(
			parse_units("abc", 18),
			Err(AmountError::NotANumber(_))
		));
		assert_eq!(
			parse_units("0.1234567", 6),
			Err(AmountError::TooManyDecimals(6))
		);
	}

	#[test]
	fn test_format_units() {
		assert_eq!(format_units("1500000000000000000", 18), "1.5");
		assert_eq!(format_units("1000000000000000000", 18), "1");
		assert_eq!(format_units("100000000000000000", 18), "0.1");
		assert_eq!(format_units("1500000", 6), "1.5");
		assert_eq!(format_units("1000", 0), "1000");
	}

	#[test]
	fn test_parse_format_agree() {
		let raw = parse_units("12.25", 18).unwrap().to_string();
		assert_eq!(format_units(&raw, 18), "12.25");
	}
}
