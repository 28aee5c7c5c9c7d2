//! Browser `localStorage` backend (feature `web`).

use super::{KeyValueStore, StorageError};

/// Key-value store backed by `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| StorageError::Unavailable("localStorage unavailable".to_owned()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("localStorage getItem failed: {e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // Browsers report quota exhaustion as a DOMException from setItem.
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Unavailable(format!("localStorage setItem failed: {e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Unavailable(format!("localStorage removeItem failed: {e:?}")))
    }
}
