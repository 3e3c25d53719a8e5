//! Durable client-side state storage.
//!
//! The session store and the draft stores persist small string values under
//! fixed keys (`auth_token`, `content`, `media`). Which medium backs those
//! keys depends on the execution context:
//!
//! - [`FileStateStorage`] — one file per key under a data directory; the
//!   normal desktop/CLI configuration.
//! - [`MemoryStateStorage`] — in-process map; tests and embedded use.
//! - [`NoopStateStorage`] — a context with no storage medium at all
//!   (server-side pre-render). `available()` is `false` and every operation
//!   is inert.
//!
//! Consumers must check [`StateStorage::available`] before each access;
//! storage mutations themselves have no error contract — I/O failures are
//! logged and swallowed.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Capability interface over a durable key/value medium.
pub trait StateStorage: Send + Sync {
    /// Whether this context has a storage medium at all.
    fn available(&self) -> bool;

    /// Read the value stored under `key`, if any.
    fn read(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, overwriting any previous value.
    fn write(&self, key: &str, value: &str);

    /// Remove the entry under `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str);
}

// ── File-backed storage ──────────────────────────────────────────

/// One file per key under a fixed directory.
pub struct FileStateStorage {
    dir: PathBuf,
}

impl FileStateStorage {
    /// Open storage rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Root directory backing this storage.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StateStorage for FileStateStorage {
    fn available(&self) -> bool {
        true
    }

    fn read(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(key, error = %err, "state read failed");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(err) = std::fs::write(self.key_path(key), value) {
            tracing::warn!(key, error = %err, "state write failed");
        }
    }

    fn remove(&self, key: &str) {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(key, error = %err, "state remove failed");
            }
        }
    }
}

// ── In-memory storage ────────────────────────────────────────────

/// Map-backed storage with no durability across processes.
#[derive(Default)]
pub struct MemoryStateStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStateStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry, for wiring up a pre-existing state in tests.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.write(key, value);
        storage
    }
}

impl StateStorage for MemoryStateStorage {
    fn available(&self) -> bool {
        true
    }

    fn read(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        self.entries.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

// ── Storage-less contexts ────────────────────────────────────────

/// The "no medium here" implementation: reads see nothing, writes go nowhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStateStorage;

impl StateStorage for NoopStateStorage {
    fn available(&self) -> bool {
        false
    }

    fn read(&self, _key: &str) -> Option<String> {
        None
    }

    fn write(&self, _key: &str, _value: &str) {}

    fn remove(&self, _key: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStateStorage::new(dir.path().join("state")).unwrap();

        assert!(storage.available());
        assert_eq!(storage.read("auth_token"), None);

        storage.write("auth_token", "tok-123");
        assert_eq!(storage.read("auth_token"), Some("tok-123".into()));

        storage.write("auth_token", "tok-456");
        assert_eq!(storage.read("auth_token"), Some("tok-456".into()));

        storage.remove("auth_token");
        assert_eq!(storage.read("auth_token"), None);
    }

    #[test]
    fn file_storage_remove_absent_key_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStateStorage::new(dir.path()).unwrap();
        storage.remove("never-written");
    }

    #[test]
    fn file_storage_keys_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStateStorage::new(dir.path()).unwrap();
        storage.write("auth_token", "a");
        storage.write("content", "b");
        assert_eq!(storage.read("auth_token"), Some("a".into()));
        assert_eq!(storage.read("content"), Some("b".into()));
    }

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStateStorage::with_entry("auth_token", "tok");
        assert_eq!(storage.read("auth_token"), Some("tok".into()));
        storage.remove("auth_token");
        assert_eq!(storage.read("auth_token"), None);
    }

    #[test]
    fn noop_storage_reports_unavailable_and_stores_nothing() {
        let storage = NoopStateStorage;
        assert!(!storage.available());
        storage.write("auth_token", "tok");
        assert_eq!(storage.read("auth_token"), None);
    }
}
