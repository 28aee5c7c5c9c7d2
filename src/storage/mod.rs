//! Key-value storage backends for locally persisted state.
//!
//! SYSTEM CONTEXT
//! ==============
//! The favorites store mirrors its state into a synchronous, string-keyed
//! medium. Backends here cover the in-process map used by tests, a JSON file
//! on disk used by the CLI, and browser `localStorage` behind the `web`
//! feature.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, StorageError>`. Callers decide whether a
//! failure matters; the favorites store treats all of them as best-effort.

mod file;
#[cfg(feature = "web")]
mod local;
mod memory;

pub use file::FileStorage;
#[cfg(feature = "web")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Errors produced by storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend is disabled or missing entirely.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A write would exceed the backend's capacity.
    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// The backing medium could not be read or written.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing medium holds data the backend cannot interpret.
    #[error("storage contents corrupt: {0}")]
    Corrupt(String),
}

/// A synchronous string-keyed store with get/set/remove.
///
/// Methods take `&self`; backends that mutate shared state do so through
/// interior mutability so one backend can be handed to several owners.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the write is rejected.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
