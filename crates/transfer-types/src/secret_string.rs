//! Secure wrapper for sensitive configuration strings.
//!
//! The wallet signing key passes through configuration as a
//! [`SecretString`]: memory is zeroed on drop and the value never shows
//! up in Debug/Display output or serialized logs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::Zeroizing;

/// A string whose contents are zeroed on drop and redacted in output.
#[derive(Clone)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
	/// Wraps a string as a secret.
	pub fn new(s: String) -> Self {
		Self(Zeroizing::new(s))
	}

	/// Exposes the secret to a closure, limiting the scope in which the
	/// raw value is visible.
	pub fn with_exposed<F, R>(&self, f: F) -> R
	where
		F: FnOnce(&str) -> R,
	{
		f(&self.0)
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SecretString(***)")
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "***")
	}
}

impl From<String> for SecretString {
	fn from(s: String) -> Self {
		Self::new(s)
	}
}

impl From<&str> for SecretString {
	fn from(s: &str) -> Self {
		Self::new(s.to_string())
	}
}

impl Serialize for SecretString {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		// Secrets round-trip through config serialization as-is; they are
		// redacted only in human-facing output.
		serializer.serialize_str(&self.0)
	}
}

impl<'de> Deserialize<'de> for SecretString {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		Ok(Self::new(s))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_debug_is_redacted() {
		let secret = SecretString::from("0xdeadbeef");
		assert_eq!(format!("{:?}", secret), "SecretString(***)");
		assert_eq!(format!("{}", secret), "***");
	}

	#[test]
	fn test_with_exposed() {
		let secret = SecretString::from("key-material");
		let len = secret.with_exposed(|s| s.len());
		assert_eq!(len, 12);
	}
}
