//! Error types for cache stores.

#[cfg(feature = "sqlite")]
use camino::Utf8PathBuf;
use thiserror::Error;

/// Failures raised by [`EntryStore`](crate::EntryStore) implementations and
/// preference hashing.
///
/// The cache treats every variant as a miss: the score is recomputed and the
/// error is logged.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The preferences could not be serialized for hashing.
    #[error("failed to serialize preferences for hashing: {source}")]
    Hash {
        /// JSON serialization failure.
        #[source]
        source: serde_json::Error,
    },
    /// A stored result could not be encoded or decoded.
    #[error("failed to encode cached result for {location_id}: {source}")]
    Codec {
        /// Location the entry belongs to.
        location_id: String,
        /// JSON failure.
        #[source]
        source: serde_json::Error,
    },
    /// The in-memory store's lock was poisoned by a panicking writer.
    #[error("cache store lock poisoned")]
    Poisoned,
    /// The parent directory of the cache database could not be created.
    #[cfg(feature = "sqlite")]
    #[error("failed to create cache directory {path}: {source}")]
    CreateParent {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Source I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the cache database failed.
    #[cfg(feature = "sqlite")]
    #[error("failed to open cache database at {path}: {source}")]
    Open {
        /// Location of the database on disk.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A query against the cache database failed.
    #[cfg(feature = "sqlite")]
    #[error("cache database error during {operation}: {source}")]
    Query {
        /// Operation that failed.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
}
