//! Key-value persistence for UI preferences.
//!
//! Only the markets search parameters are persisted, as JSON under
//! [`MARKETS_STORAGE_KEY`](crate::network::MARKETS_STORAGE_KEY). The backing
//! store is injected so the same code runs against a file on native, browser
//! storage behind a custom impl on WASM, or memory in tests.

use crate::error::ExplorerError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// String key-value store.
pub trait ParamStorage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, ExplorerError>;
    fn save(&self, key: &str, value: &str) -> Result<(), ExplorerError>;
    fn remove(&self, key: &str) -> Result<(), ExplorerError>;
}

/// Read and deserialize the JSON value under `key`.
pub fn load_json<T: DeserializeOwned>(
    storage: &dyn ParamStorage,
    key: &str,
) -> Result<Option<T>, ExplorerError> {
    match storage.load(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize `value` as JSON under `key`.
pub fn save_json<T: Serialize>(
    storage: &dyn ParamStorage,
    key: &str,
    value: &T,
) -> Result<(), ExplorerError> {
    let raw = serde_json::to_string(value)?;
    storage.save(key, &raw)
}

// ─── MemoryStorage ───────────────────────────────────────────────────────────

/// Process-local storage; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ParamStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, ExplorerError> {
        Ok(self.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), ExplorerError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ExplorerError> {
        self.lock().remove(key);
        Ok(())
    }
}

// ─── JsonFileStorage ─────────────────────────────────────────────────────────

/// One `<key>.json` file per key inside a directory.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStorage {
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> std::path::PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ParamStorage for JsonFileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, ExplorerError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ExplorerError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), ExplorerError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            ExplorerError::Storage(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;
        let path = self.path_for(key);
        // Write-then-rename: readers see the old file or the new one.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)
            .and_then(|_| std::fs::rename(&tmp, &path))
            .map_err(|e| {
                ExplorerError::Storage(format!("Failed to write {}: {}", path.display(), e))
            })
    }

    fn remove(&self, key: &str) -> Result<(), ExplorerError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ExplorerError::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
