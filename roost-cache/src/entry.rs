//! Cached score entries.

use std::time::SystemTime;

use roost_core::ScoreResult;
use serde::{Deserialize, Serialize};

/// The latest score stored for one `(user, location)` pair.
///
/// An entry is only valid for the preferences whose hash it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Hash of the preferences the result was computed from.
    pub preferences_hash: String,
    /// Scored location.
    pub location_id: String,
    /// The computed result.
    pub result: ScoreResult,
    /// When the result was computed.
    pub computed_at: SystemTime,
}

impl CacheEntry {
    /// Stamp a freshly computed result.
    #[must_use]
    pub fn new(
        preferences_hash: impl Into<String>,
        location_id: impl Into<String>,
        result: ScoreResult,
    ) -> Self {
        Self {
            preferences_hash: preferences_hash.into(),
            location_id: location_id.into(),
            result,
            computed_at: SystemTime::now(),
        }
    }

    /// Whether the entry was computed from preferences hashing to `hash`.
    #[must_use]
    pub fn is_valid_for(&self, hash: &str) -> bool {
        self.preferences_hash == hash
    }
}

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// A result computed from the same preferences.
    Hit(ScoreResult),
    /// Nothing is stored for the pair.
    Miss,
    /// An entry exists but was computed from other preferences.
    Stale {
        /// Hash of the preferences the stored entry came from.
        stored_hash: String,
    },
}

impl CacheLookup {
    /// The cached result, if the lookup hit.
    #[must_use]
    pub fn into_hit(self) -> Option<ScoreResult> {
        match self {
            Self::Hit(result) => Some(result),
            Self::Miss | Self::Stale { .. } => None,
        }
    }
}
