use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

/// Store file name in the data directory
const STORE_FILE: &str = "store.json";

pub const KEY_TOKEN: &str = "token";
pub const KEY_USERNAME: &str = "username";
pub const KEY_DEMO_INITIALIZED: &str = "demo_initialized";
pub const KEY_DEMO_USER: &str = "demo_user";
pub const KEY_DEMO_TASKS: &str = "demo_tasks";
pub const KEY_DEMO_CATEGORIES: &str = "demo_categories";

/// String-keyed local persistence, last write wins.
///
/// `token` and `username` hold raw strings; the demo keys hold
/// JSON-serialized blobs via `get_json`/`set_json`.
pub struct LocalStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl LocalStore {
    /// Open (or create) the store under the given directory.
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create store directory {}", dir.display()))?;
        let path = dir.join(STORE_FILE);

        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse store file {}", path.display()))?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: impl Into<String>) -> Result<()> {
        let mut entries = self.lock();
        entries.insert(key.to_string(), value.into());
        self.persist(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.lock();
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    /// Read a JSON-serialized value. A missing key or an unparseable
    /// blob both read as absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(key, error = %e, "Discarding unparseable store entry");
                None
            }
        }
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, raw)
    }

    // ===== Convenience accessors =====

    pub fn token(&self) -> Option<String> {
        self.get(KEY_TOKEN).filter(|t| !t.is_empty())
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.set(KEY_TOKEN, token)
    }

    /// Best-effort token removal; a failed write must not fail the
    /// caller (the in-memory copy is gone either way).
    pub fn clear_token(&self) {
        if let Err(e) = self.remove(KEY_TOKEN) {
            warn!(error = %e, "Failed to persist token removal");
        }
    }

    pub fn username(&self) -> Option<String> {
        self.get(KEY_USERNAME)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().expect("store mutex poisoned")
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write store file {}", self.path.display()))?;
        Ok(())
    }
}
