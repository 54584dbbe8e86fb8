//! Persistence seam for progress records.
//!
//! [`KeyValueStore`] is the raw string get/set collaborator; records are
//! scoped by a composite key of [`PROGRESS_KEY_PREFIX`] and the learning
//! language. [`ProgressStore`] is the typed load/save interface the ledger
//! depends on.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::progress::record::UserProgress;
use crate::registry::LanguageCode;

/// Fixed prefix of every progress key.
pub const PROGRESS_KEY_PREFIX: &str = "parlance_progress";

/// Storage key of the progress record for one learning language.
pub fn progress_key(language: LanguageCode) -> String {
    format!("{PROGRESS_KEY_PREFIX}_{language}")
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored record is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// Key/value stores
// ---------------------------------------------------------------------------

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for Arc<K> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Process-local store, used in tests and when no directory is configured.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys map to file names; anything outside `[A-Za-z0-9_-]` becomes `_`.
    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // Readers only ever see a complete record.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Typed progress store
// ---------------------------------------------------------------------------

pub trait ProgressStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved for `language` yet.
    fn load(&self, language: LanguageCode) -> Result<Option<UserProgress>, StoreError>;
    fn save(&self, language: LanguageCode, progress: &UserProgress) -> Result<(), StoreError>;
}

/// JSON-encodes records into any [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct KeyValueProgressStore<K> {
    kv: K,
}

impl<K: KeyValueStore> KeyValueProgressStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }
}

impl<K: KeyValueStore> ProgressStore for KeyValueProgressStore<K> {
    fn load(&self, language: LanguageCode) -> Result<Option<UserProgress>, StoreError> {
        match self.kv.get(&progress_key(language))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, language: LanguageCode, progress: &UserProgress) -> Result<(), StoreError> {
        let raw = serde_json::to_string(progress)?;
        self.kv.set(&progress_key(language), &raw)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;
    use crate::catalog::Location;

    #[test]
    fn key_combines_prefix_and_language() {
        assert_eq!(progress_key(LanguageCode::Es), "parlance_progress_es");
    }

    #[test]
    fn memory_store_returns_none_for_missing_key() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("missing").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        FileKeyValueStore::new(dir.path()).set("parlance_progress_fr", "{}").unwrap();

        let reopened = FileKeyValueStore::new(dir.path());
        assert_eq!(reopened.get("parlance_progress_fr").unwrap().as_deref(), Some("{}"));
        assert_eq!(reopened.get("parlance_progress_de").unwrap(), None);
    }

    #[test]
    fn file_store_sanitises_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        store.set("../escape", "x").unwrap();
        assert!(dir.path().join("___escape.json").exists());
    }

    #[test]
    fn progress_store_is_scoped_by_language() {
        let store = KeyValueProgressStore::new(MemoryKeyValueStore::new());
        let mut progress = UserProgress::default();
        progress.record_completion(Location::Cafe, Utc::now());
        store.save(LanguageCode::Es, &progress).unwrap();

        assert_eq!(store.load(LanguageCode::Es).unwrap(), Some(progress));
        assert_eq!(store.load(LanguageCode::Ja).unwrap(), None);
    }

    #[test]
    fn corrupt_record_is_a_serialization_error() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        kv.set(&progress_key(LanguageCode::It), "not json").unwrap();
        let store = KeyValueProgressStore::new(Arc::clone(&kv));
        assert_matches!(store.load(LanguageCode::It), Err(StoreError::Serialization(_)));
    }
}
