//! In-memory storage implementation.
//!
//! Keeps values in a HashMap behind a read-write lock. No persistence
//! across restarts; intended for tests and development.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Storage backend holding all values in process memory.
#[derive(Default)]
pub struct MemoryStorage {
	store: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
	/// Creates an empty MemoryStorage.
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl StorageInterface for MemoryStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let store = self.store.read().await;
		store.get(key).cloned().ok_or(StorageError::NotFound)
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let mut store = self.store.write().await;
		store.insert(key.to_string(), value);
		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		let mut store = self.store.write().await;
		store.remove(key);
		Ok(())
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		let store = self.store.read().await;
		Ok(store.contains_key(key))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_basic_operations() {
		let storage = MemoryStorage::new();

		storage
			.set_bytes("test_key", b"test_value".to_vec())
			.await
			.unwrap();
		assert_eq!(storage.get_bytes("test_key").await.unwrap(), b"test_value");
		assert!(storage.exists("test_key").await.unwrap());

		storage.delete("test_key").await.unwrap();
		assert!(matches!(
			storage.get_bytes("test_key").await,
			Err(StorageError::NotFound)
		));
	}

	#[tokio::test]
	async fn test_overwrite() {
		let storage = MemoryStorage::new();

		storage.set_bytes("k", b"one".to_vec()).await.unwrap();
		storage.set_bytes("k", b"two".to_vec()).await.unwrap();
		assert_eq!(storage.get_bytes("k").await.unwrap(), b"two");
	}
}
