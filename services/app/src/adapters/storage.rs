//! services/app/src/adapters/storage.rs
//!
//! This module contains the file-backed storage adapter.
//! It implements the `StateStorage` port from the `core` crate: each logical
//! key maps to one JSON document inside the data directory.

use async_trait::async_trait;
use plastivize_core::ports::{PortError, PortResult, StateStorage};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that stores each key as `<data_dir>/<key>.json`.
#[derive(Clone)]
pub struct FileStorageAdapter {
    data_dir: PathBuf,
}

impl FileStorageAdapter {
    /// Creates a new `FileStorageAdapter`, creating the data directory if
    /// it does not exist yet.
    pub fn new(data_dir: &Path) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(data_dir)?;
        Ok(Self { data_dir: data_dir.to_path_buf() })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

//=========================================================================================
// `StateStorage` Trait Implementation
//=========================================================================================

#[async_trait]
impl StateStorage for FileStorageAdapter {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        // Write to a temp file first so a crash mid-write can never leave a
        // torn document at the real path.
        let path = self.path_for(key);
        let tmp_path = self.data_dir.join(format!("{key}.json.tmp"));
        tokio::fs::write(&tmp_path, value)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn adapter() -> (TempDir, FileStorageAdapter) {
        let dir = TempDir::new().unwrap();
        let adapter = FileStorageAdapter::new(dir.path()).unwrap();
        (dir, adapter)
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let (_dir, storage) = adapter();
        storage.set("plastivize_userdata", "{\"username\":\"a@b.com\"}").await.unwrap();
        let loaded = storage.get("plastivize_userdata").await.unwrap();
        assert_eq!(loaded.as_deref(), Some("{\"username\":\"a@b.com\"}"));
    }

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let (_dir, storage) = adapter();
        assert_eq!(storage.get("plastivize_userdata").await.unwrap(), None);
    }

    #[tokio::test]
    async fn remove_deletes_and_tolerates_missing_keys() {
        let (_dir, storage) = adapter();
        storage.set("plastivize_userdata", "{}").await.unwrap();
        storage.remove("plastivize_userdata").await.unwrap();
        assert_eq!(storage.get("plastivize_userdata").await.unwrap(), None);

        // A second remove must not error.
        storage.remove("plastivize_userdata").await.unwrap();
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let (_dir, storage) = adapter();
        storage.set("k", "first").await.unwrap();
        storage.set("k", "second").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn no_temp_file_is_left_behind() {
        let (dir, storage) = adapter();
        storage.set("k", "value").await.unwrap();
        assert!(!dir.path().join("k.json.tmp").exists());
        assert!(dir.path().join("k.json").exists());
    }
}
