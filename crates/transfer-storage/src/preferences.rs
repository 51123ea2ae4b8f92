//! Persisted display preference.
//!
//! The dashboard remembers one thing between sessions: the light/dark
//! theme. It lives under a single key; a missing value means the
//! default.

use crate::{StorageError, StorageService};
use transfer_types::Theme;

const NAMESPACE: &str = "preferences";
const THEME_KEY: &str = "theme";

/// Store for the persisted display preference.
pub struct PreferenceStore {
	storage: StorageService,
}

impl PreferenceStore {
	/// Creates a preference store over the given storage service.
	pub fn new(storage: StorageService) -> Self {
		Self { storage }
	}

	/// Returns the persisted theme, or the default when none was saved.
	pub async fn theme(&self) -> Result<Theme, StorageError> {
		match self.storage.retrieve(NAMESPACE, THEME_KEY).await {
			Ok(theme) => Ok(theme),
			Err(StorageError::NotFound) => Ok(Theme::default()),
			Err(e) => Err(e),
		}
	}

	/// Persists the theme.
	pub async fn set_theme(&self, theme: Theme) -> Result<(), StorageError> {
		self.storage.store(NAMESPACE, THEME_KEY, &theme).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::implementations::memory::MemoryStorage;

	#[tokio::test]
	async fn test_defaults_to_light() {
		let store = PreferenceStore::new(StorageService::new(Box::new(MemoryStorage::new())));
		assert_eq!(store.theme().await.unwrap(), Theme::Light);
	}

	#[tokio::test]
	async fn test_roundtrip() {
		let store = PreferenceStore::new(StorageService::new(Box::new(MemoryStorage::new())));
		store.set_theme(Theme::Dark).await.unwrap();
		assert_eq!(store.theme().await.unwrap(), Theme::Dark);
	}
}
