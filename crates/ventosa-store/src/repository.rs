//! Key-value persistence for the store
//!
//! Durable state lives in a small string-keyed map with an explicit
//! `get`/`set`/`remove` surface, so storage failures surface as
//! `StoreError::Storage` instead of vanishing into ad hoc side effects.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// String key-value repository backing the store's durable state
pub trait Repository: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Repository persisted as a single JSON object file. Every mutation writes
/// the whole map back synchronously.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    map: BTreeMap<String, String>,
}

impl JsonFileRepository {
    /// Open the repository at `path`, loading any existing contents. A
    /// missing file starts empty; an unreadable or unparsable file is a
    /// storage error.
    pub fn open(path: &Path) -> Result<Self> {
        let map = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                StoreError::Storage(format!("Failed to read store file {:?}: {}", path, e))
            })?;
            serde_json::from_str(&content).map_err(|e| {
                StoreError::Storage(format!("Corrupt store file {:?}: {}", path, e))
            })?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            map,
        })
    }

    fn flush(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.map)?;
        std::fs::write(&self.path, content).map_err(|e| {
            StoreError::Storage(format!("Failed to write store file {:?}: {}", self.path, e))
        })
    }
}

impl Repository for JsonFileRepository {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.map.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.map.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// In-memory repository for tests
#[derive(Debug, Default)]
pub struct MemoryRepository {
    map: BTreeMap<String, String>,
}

impl Repository for MemoryRepository {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.map.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::open(&dir.path().join("store.json")).unwrap();
        assert_eq!(repo.get("anything"), None);
    }

    #[test]
    fn set_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut repo = JsonFileRepository::open(&path).unwrap();
        repo.set("isAuthenticated", "true").unwrap();
        repo.set("user", r#"{"email":"a@b"}"#).unwrap();

        let reopened = JsonFileRepository::open(&path).unwrap();
        assert_eq!(reopened.get("isAuthenticated").as_deref(), Some("true"));
        assert_eq!(reopened.get("user").as_deref(), Some(r#"{"email":"a@b"}"#));
    }

    #[test]
    fn remove_deletes_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut repo = JsonFileRepository::open(&path).unwrap();
        repo.set("user", "x").unwrap();
        repo.remove("user").unwrap();
        assert_eq!(repo.get("user"), None);

        let reopened = JsonFileRepository::open(&path).unwrap();
        assert_eq!(reopened.get("user"), None);
    }

    #[test]
    fn remove_absent_key_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = JsonFileRepository::open(&dir.path().join("store.json")).unwrap();
        assert!(repo.remove("missing").is_ok());
    }

    #[test]
    fn open_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonFileRepository::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        assert!(err.to_string().contains("Corrupt store file"));
    }

    #[test]
    fn memory_repository_get_set_remove() {
        let mut repo = MemoryRepository::default();
        assert_eq!(repo.get("k"), None);
        repo.set("k", "v").unwrap();
        assert_eq!(repo.get("k").as_deref(), Some("v"));
        repo.remove("k").unwrap();
        assert_eq!(repo.get("k"), None);
    }
}
