//! Configuration for the transfer dashboard service.
//!
//! Configuration is loaded from a TOML file with `${VAR}` environment
//! substitution (with optional `${VAR:-default}` fallbacks), parsed into
//! typed sections, and validated before any service is constructed. The
//! chain registry lives here: per-chain transferor addresses, chain
//! selectors, and token addresses are static configuration, never
//! mutated at runtime.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use transfer_types::{deserialize_chains, ChainRegistry, SecretString};

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message, drop the input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration for the transfer service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Session workflow settings.
	pub session: SessionConfig,
	/// Chain registry keyed by chain ID.
	#[serde(deserialize_with = "deserialize_chains")]
	pub chains: ChainRegistry,
	/// Wallet signing key configuration.
	pub wallet: WalletConfig,
	/// Indexing-service settings for the history feed.
	pub indexer: IndexerConfig,
	/// Display preference persistence.
	#[serde(default)]
	pub preferences: PreferencesConfig,
	/// HTTP API server settings.
	pub api: Option<ApiConfig>,
}

/// Settings for the transfer submission and confirmation workflow.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
	/// Chain ID the wallet is connected to; transfers are submitted here.
	pub source_chain: u64,
	/// How long the confirmation tracker watches a hash before giving up.
	#[serde(default = "default_monitoring_timeout_minutes")]
	pub monitoring_timeout_minutes: u64,
	/// Confirmations required before a transfer counts as confirmed.
	#[serde(default = "default_confirmations")]
	pub confirmations: u64,
}

fn default_monitoring_timeout_minutes() -> u64 {
	30
}

fn default_confirmations() -> u64 {
	1
}

/// Wallet signing key configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WalletConfig {
	/// Hex-encoded private key, usually injected via `${...}`.
	pub private_key: SecretString,
}

/// Settings for the hosted GraphQL indexer supplying transfer history.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexerConfig {
	/// GraphQL endpoint URL.
	pub url: String,
	/// Chain the indexed transfers (and their tokens) live on.
	pub chain_id: u64,
	/// Number of records per fetch.
	#[serde(default = "default_page_size")]
	pub page_size: u64,
	/// Optional automatic refresh interval; absent means explicit
	/// refresh only.
	#[serde(default)]
	pub refresh_interval_secs: Option<u64>,
}

fn default_page_size() -> u64 {
	10
}

/// Display preference persistence settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PreferencesConfig {
	/// Directory for the preference store.
	#[serde(default = "default_preferences_path")]
	pub path: String,
}

impl Default for PreferencesConfig {
	fn default() -> Self {
		Self {
			path: default_preferences_path(),
		}
	}
}

fn default_preferences_path() -> String {
	"./data/preferences".to_string()
}

/// HTTP API server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Whether the API server is started.
	#[serde(default = "default_api_enabled")]
	pub enabled: bool,
	/// Bind host.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Bind port.
	#[serde(default = "default_api_port")]
	pub port: u16,
}

fn default_api_enabled() -> bool {
	true
}

fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
	8080
}

impl Config {
	/// Loads configuration from a TOML file, resolving environment
	/// variables and validating the result.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path).await?;
		content.parse()
	}

	/// Validates the configuration before services are constructed.
	///
	/// Registry lookups at submission time assume the referenced chains
	/// exist; that is enforced here so a missing entry is a startup
	/// error, not a runtime surprise.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.chains.is_empty() {
			return Err(ConfigError::Validation(
				"At least one chain must be configured".into(),
			));
		}
		if !self.chains.contains_key(&self.session.source_chain) {
			return Err(ConfigError::Validation(format!(
				"Source chain {} has no registry entry",
				self.session.source_chain
			)));
		}
		for (chain_id, chain) in &self.chains {
			if chain.rpc_url.is_empty() {
				return Err(ConfigError::Validation(format!(
					"Chain {} has an empty rpc_url",
					chain_id
				)));
			}
		}
		if !self.chains.contains_key(&self.indexer.chain_id) {
			return Err(ConfigError::Validation(format!(
				"Indexer chain {} has no registry entry",
				self.indexer.chain_id
			)));
		}
		if !self.indexer.url.starts_with("http://") && !self.indexer.url.starts_with("https://") {
			return Err(ConfigError::Validation(format!(
				"Indexer url must be http(s): {}",
				self.indexer.url
			)));
		}
		if self.indexer.page_size == 0 {
			return Err(ConfigError::Validation(
				"Indexer page_size must be positive".into(),
			));
		}
		if self.wallet.private_key.with_exposed(str::is_empty) {
			return Err(ConfigError::Validation(
				"Wallet private_key must not be empty".into(),
			));
		}
		if let Some(api) = &self.api {
			if api.enabled && api.port == 0 {
				return Err(ConfigError::Validation("API port must not be 0".into()));
			}
		}
		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

/// Resolves `${VAR}` and `${VAR:-default}` placeholders in config text.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).ok_or_else(|| {
			ConfigError::Parse("Internal regex capture error".to_string())
		})?;
		let var_name = &cap[1];
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)))
				}
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply in reverse so earlier offsets stay valid
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

#[cfg(test)]
mod tests {
	use super::*;

	const EXAMPLE: &str = r#"
[session]
source_chain = 11155111

[chains.11155111]
name = "Ethereum Sepolia"
rpc_url = "https://rpc.sepolia.example"
transferor_address = "0x877318dAA446F696Ff2D82Ff8e0A99176A33f320"
chain_selector = "16015286601757825753"
token_address = "0xcab0EF91Bee323d1A617c0a027eE753aFd6997E4"

[chains.80002]
name = "Polygon Amoy"
rpc_url = "https://rpc.amoy.example"
transferor_address = "0x01E13A4a3FA4bA560b94a6DDdCD8Bca2bE60f6D1"
chain_selector = "16281711391670634445"
token_address = "0xFd57b4ddBf88a4e07fF4e34C487b99af2Fe82a05"

[wallet]
private_key = "0x0101010101010101010101010101010101010101010101010101010101010101"

[indexer]
url = "https://indexer.example/query"
chain_id = 11155111
"#;

	#[test]
	fn test_parse_example() {
		let config: Config = EXAMPLE.parse().unwrap();
		assert_eq!(config.session.source_chain, 11155111);
		assert_eq!(config.session.confirmations, 1);
		assert_eq!(config.chains.len(), 2);
		assert_eq!(config.chains[&80002].chain_selector, 16281711391670634445);
		assert_eq!(config.indexer.page_size, 10);
		assert!(config.api.is_none());
	}

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("TEST_INDEXER_URL", "https://indexer.example/query");

		let resolved =
			resolve_env_vars("url = \"${TEST_INDEXER_URL}\"\nhost = \"${TEST_MISSING:-local}\"")
				.unwrap();
		assert!(resolved.contains("https://indexer.example/query"));
		assert!(resolved.contains("\"local\""));
	}

	#[test]
	fn test_missing_env_var_fails() {
		let result = resolve_env_vars("key = \"${DEFINITELY_NOT_SET_ANYWHERE}\"");
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_unknown_source_chain_rejected() {
		let broken = EXAMPLE.replace("source_chain = 11155111", "source_chain = 1");
		let result: Result<Config, _> = broken.parse();
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_missing_section_rejected() {
		let broken = EXAMPLE.replace("[wallet]", "[wallet_oops]");
		let result: Result<Config, _> = broken.parse();
		assert!(matches!(result, Err(ConfigError::Parse(_))));
	}

	#[tokio::test]
	async fn test_from_file() {
		use std::io::Write;
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(EXAMPLE.as_bytes()).unwrap();

		let config = Config::from_file(file.path().to_str().unwrap())
			.await
			.unwrap();
		assert_eq!(config.chains.len(), 2);
	}
}
