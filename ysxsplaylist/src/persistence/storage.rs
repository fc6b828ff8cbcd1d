//! Stockage clé/valeur des enregistrements de lecture

use anyhow::{anyhow, Context};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// String values under string keys, like a browser local storage
pub trait RecordStorage: Send + Sync {
    /// `None` when nothing was ever stored under `key`
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Volatile storage, lost with the process
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> anyhow::Result<MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| anyhow!("Memory storage lock poisoned"))
    }
}

impl RecordStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    /// Creates the directory if needed
    pub fn new(directory: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).with_context(|| {
            format!("Failed to create records directory {}", directory.display())
        })?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File backing `key`
    pub fn item_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.directory.join(format!("{}.json", file_name))
    }
}

impl RecordStorage for FileStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.item_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.item_path(key);
        // Écriture dans un fichier temporaire puis renommage
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}
