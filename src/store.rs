//! Client-scoped key/value persistence.
//!
//! The engine never touches a concrete storage backend directly. It receives a
//! [`PersistenceStore`] so tests can inject [`MemoryStore`] while the CLI uses
//! the JSON-file backed [`FileStore`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StoreError;

/// On-disk schema version for [`FileStore`] payloads.
const STORE_FILE_VERSION: u32 = 1;

/// Plain string get/set capability scoped to one client.
pub trait PersistenceStore: Send + Sync {
    /// Read one key. `Ok(None)` means the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write one key, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Process-local store, used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored key/value pair.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl PersistenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// On-disk payload shape for [`FileStore`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedEntries {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// JSON-file backed store that survives process restarts.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open a store at `path`. The file is created lazily on first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<PersistedEntries, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PersistedEntries::default())
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        if raw.trim().is_empty() {
            return Ok(PersistedEntries::default());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write(&self, payload: &PersistedEntries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_vec_pretty(payload)?;
        // Write to a sibling temporary file first so partial writes do not
        // corrupt the last known-good store.
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl PersistenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("file store lock poisoned".to_string()))?;
        let mut payload = self.load()?;
        if payload.entries.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        payload.version = STORE_FILE_VERSION;
        payload.entries.insert(key.to_string(), value.to_string());
        self.write(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        store.set("k", "w").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
        assert_eq!(store.entries().len(), 1);
    }

    #[test]
    fn file_store_survives_reopen() {
        let tmp = TestTempDir::new("file-store");
        let path = tmp.child("nested/storage.json");
        FileStore::open(&path).set("palette", "Vintage Rose").unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(
            reopened.get("palette").unwrap().as_deref(),
            Some("Vintage Rose")
        );
        assert_eq!(reopened.get("missing").unwrap(), None);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn file_store_treats_missing_and_empty_files_as_empty() {
        let tmp = TestTempDir::new("file-store-empty");
        assert_eq!(FileStore::open(tmp.child("none.json")).get("k").unwrap(), None);
        let empty = tmp.write_text("empty.json", "  \n");
        assert_eq!(FileStore::open(empty).get("k").unwrap(), None);
    }

    #[test]
    fn file_store_reports_corrupt_payloads() {
        let tmp = TestTempDir::new("file-store-corrupt");
        let path = tmp.write_text("storage.json", "{not json");
        let err = FileStore::open(path).get("k").expect_err("corrupt");
        assert!(matches!(err, StoreError::Json(_)), "got: {err}");
    }

    #[test]
    fn file_store_write_fails_when_parent_is_a_file() {
        let tmp = TestTempDir::new("file-store-blocked");
        let blocker = tmp.write_text("blocker", "x");
        let store = FileStore::open(blocker.join("storage.json"));
        assert!(store.set("k", "v").is_err());
    }
}
