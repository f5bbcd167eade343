//! Score caching for the Roost compatibility engine.
//!
//! [`PreferenceVersionCache`] remembers the latest result for every
//! `(user, location)` pair together with a hash of the normalized
//! preferences and scoring rules it was computed from. A read is a hit only when the caller's
//! current hash matches, so editing preferences invalidates old results
//! lazily without a sweep.
//!
//! Entries live in an [`EntryStore`]: [`MemoryEntryStore`] for a single
//! process, or `SqliteEntryStore` (feature `sqlite`) for persistence.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod cache;
mod entry;
mod error;
mod hash;
#[cfg(feature = "sqlite")]
mod sqlite;
mod store;

pub use cache::PreferenceVersionCache;
pub use entry::{CacheEntry, CacheLookup};
pub use error::CacheError;
pub use hash::validity_hash;
#[cfg(feature = "sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "sqlite")))]
pub use sqlite::SqliteEntryStore;
pub use store::{EntryStore, MemoryEntryStore};
