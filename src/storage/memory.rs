//! In-process storage backend.
//!
//! Clones share the same map, so a second store built over a clone observes
//! everything the first one wrote. Quota and availability knobs reproduce the
//! failure modes of browser `localStorage`.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{KeyValueStore, StorageError};

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, String>,
    quota: Option<usize>,
    unavailable: bool,
    set_calls: usize,
}

impl Inner {
    fn used_bytes_with(&self, key: &str, value: &str) -> usize {
        let others: usize = self
            .entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        others + key.len() + value.len()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable("storage disabled".to_owned()));
        }
        Ok(())
    }
}

/// Shared in-memory key-value map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that rejects writes once keys plus values exceed `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        let storage = Self::default();
        storage.lock().quota = Some(bytes);
        storage
    }

    /// Backend whose every call fails, like storage disabled by the user agent.
    #[must_use]
    pub fn unavailable() -> Self {
        let storage = Self::default();
        storage.lock().unavailable = true;
        storage
    }

    /// Seed `key` directly, bypassing quota and availability checks.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.lock().entries.insert(key.to_owned(), value.to_owned());
    }

    /// Read `key` directly, bypassing availability checks.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().entries.get(key).cloned()
    }

    /// Number of `set` calls attempted, including rejected ones.
    #[must_use]
    pub fn set_calls(&self) -> usize {
        self.lock().set_calls
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let inner = self.lock();
        inner.check_available()?;
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        inner.set_calls += 1;
        inner.check_available()?;
        if let Some(quota) = inner.quota {
            let needed = inner.used_bytes_with(key, value);
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        inner.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        inner.check_available()?;
        inner.entries.remove(key);
        Ok(())
    }
}
