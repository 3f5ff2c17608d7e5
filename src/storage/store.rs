//! Key/value persistence
//!
//! The store is string-keyed and holds JSON values. Signer lists live under
//! `<address>signerEntries`, regular key material under `<address>regularKey`
//! and `<address>regularKeySeed`. Reads and writes are last-writer-wins.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// A string-keyed JSON value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;

    fn remove_value(&self, key: &str) -> Result<(), StorageError>;

    /// Read and deserialize a value
    fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError>
    where
        Self: Sized,
    {
        match self.get(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Serialize and write a value
    fn set_as<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError>
    where
        Self: Sized,
    {
        self.set(key, serde_json::to_value(value)?)
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Process-local store, used by tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::LockPoisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_value(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// JSON file store
// =============================================================================

/// Store persisted as a single JSON object on disk
///
/// Every write rewrites the whole file through a temporary file and an
/// atomic rename.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, Value>>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories as needed
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = if path.exists() {
            let file = fs::File::open(path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader)?
        } else {
            BTreeMap::new()
        };

        log::debug!("Opened store {:?} with {} keys", path, entries.len());

        Ok(Self {
            path: path.to_path_buf(),
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, Value>) -> Result<(), StorageError> {
        let temp_path = self.path.with_extension("tmp");
        let file = fs::File::create(&temp_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, entries)?;

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::LockPoisoned)?;
        entries.insert(key.to_string(), value);
        self.flush(&entries)
    }

    fn remove_value(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::LockPoisoned)?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.get("missing").unwrap().is_none());

        store.set("k", json!([1, 2])).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!([1, 2])));
        assert_eq!(store.len(), 1);

        store.remove_value("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_typed_helpers() {
        let store = MemoryStore::new();
        store.set_as("n", &vec![3u32, 4]).unwrap();
        let back: Option<Vec<u32>> = store.get_as("n").unwrap();
        assert_eq!(back, Some(vec![3, 4]));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("store.json");

        {
            let store = JsonFileStore::open(&path).unwrap();
            store.set("akey", json!("value")).unwrap();
            store.set("other", json!(5)).unwrap();
            store.remove_value("other").unwrap();
        }

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("akey").unwrap(), Some(json!("value")));
        assert!(reopened.get("other").unwrap().is_none());
        assert!(!path.with_extension("tmp").exists());
    }
}
