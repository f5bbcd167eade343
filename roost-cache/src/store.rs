//! Storage backends for cache entries.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::{CacheEntry, CacheError};

/// Persists one [`CacheEntry`] per `(user_id, location_id)`.
///
/// Saving replaces the whole entry, so a reader never observes a result
/// paired with another entry's hash. Implementations must be safe to share
/// across worker threads.
pub trait EntryStore: Send + Sync {
    /// Load the entry stored for the pair, if any.
    ///
    /// # Errors
    /// Returns [`CacheError`] when the backend cannot be read.
    fn load(&self, user_id: &str, location_id: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Store `entry` for `user_id`, replacing any previous entry for the
    /// same location.
    ///
    /// # Errors
    /// Returns [`CacheError`] when the backend cannot be written.
    fn save(&self, user_id: &str, entry: &CacheEntry) -> Result<(), CacheError>;
}

/// Process-local store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    entries: RwLock<HashMap<(String, String), CacheEntry>>,
}

impl MemoryEntryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    ///
    /// # Errors
    /// Returns [`CacheError::Poisoned`] when a writer panicked.
    pub fn len(&self) -> Result<usize, CacheError> {
        self.entries
            .read()
            .map(|entries| entries.len())
            .map_err(|_| CacheError::Poisoned)
    }

    /// Whether the store holds no entries.
    ///
    /// # Errors
    /// Returns [`CacheError::Poisoned`] when a writer panicked.
    pub fn is_empty(&self) -> Result<bool, CacheError> {
        self.len().map(|len| len == 0)
    }
}

impl EntryStore for MemoryEntryStore {
    fn load(&self, user_id: &str, location_id: &str) -> Result<Option<CacheEntry>, CacheError> {
        let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
        Ok(entries
            .get(&(user_id.to_owned(), location_id.to_owned()))
            .cloned())
    }

    fn save(&self, user_id: &str, entry: &CacheEntry) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.insert(
            (user_id.to_owned(), entry.location_id.clone()),
            entry.clone(),
        );
        Ok(())
    }
}
