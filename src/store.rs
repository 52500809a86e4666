//! Durable key-value persistence boundary

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// The durable string store the host supplies: browser-style local storage,
/// a settings file, or a test double. Values are opaque strings; record
/// schemas live with their owners.
pub trait KeyValueStore {
    /// Returns the stored value for `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// In-memory store for tests and hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store: one JSON object of string keys and values, rewritten
/// on every `set`.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonFileStore {
    values: HashMap<String, String>,
    #[serde(skip)]
    file_path: Option<PathBuf>,
}

impl JsonFileStore {
    /// A store that never touches disk
    pub fn ephemeral() -> Self {
        Self {
            values: HashMap::new(),
            file_path: None,
        }
    }

    /// An empty store that will write to `file_path`
    pub fn with_file(file_path: &Path) -> Self {
        Self {
            values: HashMap::new(),
            file_path: Some(file_path.to_path_buf()),
        }
    }

    /// Loads from `file_path` when given, falling back to an empty
    /// file-backed store (logged) on read/parse failure, or to a purely
    /// ephemeral store when no path is given.
    pub fn load_or_ephemeral(file_path: Option<&Path>) -> Self {
        match file_path {
            Some(path) => Self::load_from_file(path).unwrap_or_else(|e| {
                log::error!("Failed to load key-value store from {}: {e}", path.display());
                Self::with_file(path)
            }),
            None => Self::ephemeral(),
        }
    }

    pub fn load_from_file(file_path: &Path) -> anyhow::Result<Self> {
        if file_path.exists() {
            let content =
                fs::read_to_string(file_path).context("Failed to read store file")?;
            let mut store: Self =
                serde_json::from_str(&content).context("Failed to parse store file")?;
            store.file_path = Some(file_path.to_path_buf());
            Ok(store)
        } else {
            Ok(Self::with_file(file_path))
        }
    }

    fn save(&self) -> anyhow::Result<()> {
        match &self.file_path {
            Some(path) => {
                let content =
                    serde_json::to_string_pretty(self).context("Failed to serialize store")?;
                fs::write(path, content).context("Failed to write store file")?;
                Ok(())
            }
            // Ephemeral stores don't save to disk
            None => Ok(()),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }
}
