//! File-backed storage implementation.
//!
//! Each key maps to one JSON file inside the configured directory. Keys
//! are sanitized into filenames; writes go through a temporary file and
//! an atomic rename so a crash never leaves a half-written value.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Storage backend persisting each key as a file on disk.
pub struct FileStorage {
	base_dir: PathBuf,
}

impl FileStorage {
	/// Creates a file storage rooted at the given directory.
	///
	/// The directory is created on first write if it does not exist.
	pub fn new(base_dir: impl AsRef<Path>) -> Self {
		Self {
			base_dir: base_dir.as_ref().to_path_buf(),
		}
	}

	/// Maps a storage key to its file path.
	///
	/// Characters outside [a-zA-Z0-9._-] are replaced so keys like
	/// "preferences:theme" produce portable filenames.
	fn path_for(&self, key: &str) -> PathBuf {
		let safe: String = key
			.chars()
			.map(|c| {
				if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
					c
				} else {
					'_'
				}
			})
			.collect();
		self.base_dir.join(format!("{}.json", safe))
	}
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		match fs::read(self.path_for(key)).await {
			Ok(bytes) => Ok(bytes),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		fs::create_dir_all(&self.base_dir)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		let path = self.path_for(key);
		let tmp = path.with_extension("json.tmp");
		fs::write(&tmp, value)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		fs::rename(&tmp, &path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		match fs::remove_file(self.path_for(key)).await {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		Ok(fs::try_exists(self.path_for(key))
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_roundtrip_across_reopen() {
		let dir = tempfile::tempdir().unwrap();
		let storage = FileStorage::new(dir.path());

		storage
			.set_bytes("preferences:theme", b"\"dark\"".to_vec())
			.await
			.unwrap();

		// A fresh instance over the same directory sees the value
		let reopened = FileStorage::new(dir.path());
		let bytes = reopened.get_bytes("preferences:theme").await.unwrap();
		assert_eq!(bytes, b"\"dark\"");
	}

	#[tokio::test]
	async fn test_missing_key() {
		let dir = tempfile::tempdir().unwrap();
		let storage = FileStorage::new(dir.path());

		assert!(matches!(
			storage.get_bytes("nope").await,
			Err(StorageError::NotFound)
		));
		assert!(!storage.exists("nope").await.unwrap());
	}

	#[tokio::test]
	async fn test_delete_is_idempotent() {
		let dir = tempfile::tempdir().unwrap();
		let storage = FileStorage::new(dir.path());

		storage.set_bytes("k", b"v".to_vec()).await.unwrap();
		storage.delete("k").await.unwrap();
		storage.delete("k").await.unwrap();
		assert!(!storage.exists("k").await.unwrap());
	}
}
