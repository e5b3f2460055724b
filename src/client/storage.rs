use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Well-known keys
pub mod keys {
    /// Bearer token issued by `/login`
    pub const TOKEN: &str = "token";
    /// Denormalized copy of the signed-in user
    pub const USER_DATA: &str = "user_data";
    /// Selected colour theme
    pub const THEME: &str = "theme";
    /// Path to return to after the next successful login
    pub const AUTH_REDIRECT: &str = "auth_redirect";
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value persistence for client session state
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

pub fn set_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StorageError> {
    store.set(key, &serde_json::to_string(value)?)
}

/// In-process store, used by tests and short-lived embeddings
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        if !self.path.exists() {
            return BTreeMap::new();
        }

        let parsed = fs::read_to_string(&self.path)
            .map_err(StorageError::from)
            .and_then(|content| serde_json::from_str(&content).map_err(StorageError::from));

        match parsed {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Discarding unreadable session file {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.load();
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.load();
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileStore::new(&path);
        store.set(keys::TOKEN, "abc").unwrap();
        store.set(keys::THEME, "dark").unwrap();
        store.remove(keys::THEME).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(keys::TOKEN).as_deref(), Some("abc"));
        assert!(reopened.get(keys::THEME).is_none());
    }

    #[test]
    fn file_store_treats_corrupt_file_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(store.get(keys::TOKEN).is_none());
        store.set(keys::TOKEN, "fresh").unwrap();
        assert_eq!(store.get(keys::TOKEN).as_deref(), Some("fresh"));
    }

    #[test]
    fn set_json_stores_encoded_value() {
        let store = MemoryStore::new();
        set_json(&store, keys::USER_DATA, &serde_json::json!({"email": "a@b.c"})).unwrap();
        let raw = store.get(keys::USER_DATA).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["email"], "a@b.c");
    }
}
