//! Display preference types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Light/dark display preference, persisted as a single key-value pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
	Light,
	Dark,
}

impl Default for Theme {
	fn default() -> Self {
		Theme::Light
	}
}

impl fmt::Display for Theme {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Theme::Light => write!(f, "light"),
			Theme::Dark => write!(f, "dark"),
		}
	}
}

impl FromStr for Theme {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"light" => Ok(Theme::Light),
			"dark" => Ok(Theme::Dark),
			other => Err(format!("Unknown theme '{}'", other)),
		}
	}
}
