//! Favorites store — a write-through set of character ids.
//!
//! DESIGN
//! ======
//! The store owns the authoritative in-memory set and mirrors it, whole, into
//! a [`KeyValueStore`] after every mutation. State is restored from the backend
//! when the store is built. Persistence is best-effort: read and write failures
//! are handed to a [`FailureSink`] and never reach the caller, so the in-memory
//! set stays correct even when storage is broken.
//!
//! Enumeration follows insertion order, matching how the set is persisted and
//! restored.

#[cfg(test)]
#[path = "favorites_test.rs"]
mod favorites_test;

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, error};

use crate::api::CharacterId;
use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the serialized favorites array.
pub const FAVORITES_STORAGE_KEY: &str = "rick-and-morty-favorites";

// =============================================================================
// ERRORS
// =============================================================================

/// Which half of the sync protocol failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOp {
    Load,
    Save,
}

impl fmt::Display for SyncOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load => f.write_str("load"),
            Self::Save => f.write_str("save"),
        }
    }
}

/// A persistence failure the store recovered from.
#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    /// The backend rejected the read or write.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The stored value is not a JSON array of ids.
    #[error("stored favorites are not a JSON array of ids: {0}")]
    Corrupt(serde_json::Error),

    /// The set could not be encoded.
    #[error("favorites encode failed: {0}")]
    Encode(serde_json::Error),
}

/// Receives persistence failures the store swallowed.
pub trait FailureSink {
    fn record(&self, op: SyncOp, key: &str, error: &FavoritesError);
}

/// Default sink: one `error` event per failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn record(&self, op: SyncOp, key: &str, error: &FavoritesError) {
        error!(%op, key, error = %error, "favorites persistence failed");
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Favorite character ids, mirrored into a key-value backend.
pub struct FavoritesStore<S, L = TracingSink> {
    storage: S,
    sink: L,
    key: String,
    order: Vec<CharacterId>,
    members: HashSet<CharacterId>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Build a store under the default key and load its prior state.
    pub fn new(storage: S) -> Self {
        Self::with_sink(storage, TracingSink)
    }
}

impl<S: KeyValueStore, L: FailureSink> FavoritesStore<S, L> {
    pub fn with_sink(storage: S, sink: L) -> Self {
        Self::with_key(storage, sink, FAVORITES_STORAGE_KEY)
    }

    /// Build a store persisting under `key` and load its prior state.
    pub fn with_key(storage: S, sink: L, key: impl Into<String>) -> Self {
        let mut store = Self {
            storage,
            sink,
            key: key.into(),
            order: Vec::new(),
            members: HashSet::new(),
        };
        store.load();
        store
    }

    /// Replace the in-memory set with what the backend holds.
    ///
    /// An absent or empty value leaves the set as it is. Unreadable or
    /// malformed data resets the set to empty.
    pub fn load(&mut self) {
        match self.read_stored() {
            Ok(Some(ids)) => {
                self.replace(ids);
                debug!(key = %self.key, count = self.order.len(), "favorites loaded");
            }
            Ok(None) => {}
            Err(e) => {
                self.replace(Vec::new());
                self.sink.record(SyncOp::Load, &self.key, &e);
            }
        }
    }

    /// Write the whole set to the backend. Failures go to the sink.
    pub fn save(&self) {
        if let Err(e) = self.write_stored() {
            self.sink.record(SyncOp::Save, &self.key, &e);
        }
    }

    #[must_use]
    pub fn is_favorite(&self, id: CharacterId) -> bool {
        self.members.contains(&id)
    }

    pub fn add(&mut self, id: CharacterId) {
        if self.members.insert(id) {
            self.order.push(id);
        }
        self.save();
    }

    pub fn remove(&mut self, id: CharacterId) {
        if self.members.remove(&id) {
            self.order.retain(|&existing| existing != id);
        }
        self.save();
    }

    /// Flip membership of `id` and return whether it is now a favorite.
    pub fn toggle(&mut self, id: CharacterId) -> bool {
        if self.is_favorite(id) {
            self.remove(id);
            false
        } else {
            self.add(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.order.clear();
        self.save();
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Ids in iteration order.
    #[must_use]
    pub fn ids_array(&self) -> Vec<CharacterId> {
        self.order.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.order.iter().copied()
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn sink(&self) -> &L {
        &self.sink
    }

    fn replace(&mut self, ids: Vec<CharacterId>) {
        self.order.clear();
        self.members.clear();
        for id in ids {
            if self.members.insert(id) {
                self.order.push(id);
            }
        }
    }

    fn read_stored(&self) -> Result<Option<Vec<CharacterId>>, FavoritesError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        let ids: Option<Vec<CharacterId>> = serde_json::from_str(&raw).map_err(FavoritesError::Corrupt)?;
        Ok(Some(ids.unwrap_or_default()))
    }

    fn write_stored(&self) -> Result<(), FavoritesError> {
        let raw = serde_json::to_string(&self.order).map_err(FavoritesError::Encode)?;
        self.storage.set(&self.key, &raw)?;
        debug!(key = %self.key, count = self.order.len(), "favorites saved");
        Ok(())
    }
}

impl<S, L> fmt::Debug for FavoritesStore<S, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("key", &self.key)
            .field("ids", &self.order)
            .finish_non_exhaustive()
    }
}
