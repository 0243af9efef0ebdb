//! Persistent key-value storage backing the playlist

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{PlaylistError, Result};

/// String-valued key-value store, the local equivalent of browser storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Stores each key as `<data_dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).await?;
        info!("📁 Playlist storage at {}", data_dir.display());
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PlaylistError::InvalidInput(format!(
                "storage key '{}' must be alphanumeric",
                key
            )));
        }
        Ok(self.data_dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        let tmp_path = path.with_extension("json.tmp");

        // Write then rename so a crash never leaves a half-written array
        fs::write(&tmp_path, value).await?;
        fs::rename(&tmp_path, &path).await?;

        debug!("💾 Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path().join("data")).await.unwrap();

        assert_eq!(store.get("playlist").await.unwrap(), None);

        store.set("playlist", "[]").await.unwrap();
        assert_eq!(store.get("playlist").await.unwrap().as_deref(), Some("[]"));
        assert!(store.data_dir().join("playlist.json").exists());

        store.remove("playlist").await.unwrap();
        assert_eq!(store.get("playlist").await.unwrap(), None);
        // Removing twice is fine
        store.remove("playlist").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_rejects_path_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path()).await.unwrap();
        assert!(store.set("../escape", "x").await.is_err());
        assert!(store.get("").await.is_err());
    }

    #[test]
    fn test_memory_store() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            store.set("k", "v").await.unwrap();
            assert!(store.contains("k").await);
            store.remove("k").await.unwrap();
            assert!(!store.contains("k").await);
        });
    }
}
