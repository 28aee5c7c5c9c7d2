//! JSON-file storage backend used by the CLI.
//!
//! DESIGN
//! ======
//! The whole store is one JSON object mapping keys to string values. Reads
//! parse the file on every call; writes rewrite it through a sibling temp file
//! and a rename so a crash mid-write never leaves a truncated document.

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{KeyValueStore, StorageError};

/// File name used by [`FileStorage::in_dir`].
pub const STORAGE_FILE_NAME: &str = "storage.json";

/// Extension appended to a corrupt document when it is moved aside.
pub const CORRUPT_SUFFIX: &str = "corrupt";

type Entries = BTreeMap<String, String>;

/// Key-value store persisted as a single JSON document.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `dir/storage.json`. The directory is created on first write.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(STORAGE_FILE_NAME))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt(format!("{}: {e}", self.path.display())))
    }

    /// Entries to rewrite on `set`/`remove`. A corrupt document is moved
    /// aside and replaced, so one bad file cannot block every later write.
    fn entries_for_write(&self) -> Result<Entries, StorageError> {
        match self.read_entries() {
            Err(StorageError::Corrupt(reason)) => {
                let aside = self.corrupt_path();
                warn!(path = %self.path.display(), moved_to = %aside.display(), %reason, "replacing corrupt storage file");
                fs::rename(&self.path, &aside)?;
                Ok(Entries::new())
            }
            other => other,
        }
    }

    /// Where a corrupt document is kept (`storage.json.corrupt`).
    #[must_use]
    pub fn corrupt_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".");
        name.push(CORRUPT_SUFFIX);
        PathBuf::from(name)
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        replace_file(&self.path, &raw)?;
        debug!(path = %self.path.display(), keys = entries.len(), "storage file written");
        Ok(())
    }
}

/// Write `raw` to a sibling temp file, then rename it over `path`. The temp
/// file never outlives a failed call.
fn replace_file(path: &Path, raw: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, raw)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries_for_write()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries_for_write()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}
