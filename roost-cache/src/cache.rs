//! Lazily invalidated score cache.

use log::{debug, warn};
use roost_core::{CacheKey, NormalizedPreferences, ScoreCache, ScoreResult, ScoringRules};

use crate::{CacheEntry, CacheError, CacheLookup, EntryStore, validity_hash};

/// Memoizes scores per `(user, location)`, valid only while the user's
/// preferences and the scoring rules hash to the same value.
///
/// There is no eager invalidation: an entry computed from other preferences
/// is simply treated as a miss and overwritten. Store failures degrade to
/// recomputation, so the cache never changes what a caller receives.
///
/// # Examples
/// ```
/// use roost_cache::{MemoryEntryStore, PreferenceVersionCache};
/// use roost_core::{Location, UserPreferences};
/// use roost_scorer::ScoreAggregator;
///
/// let aggregator = ScoreAggregator::default();
/// let cache = PreferenceVersionCache::new(MemoryEntryStore::new());
/// let preferences = aggregator.normalize(&UserPreferences::default());
/// let rules = aggregator.rules().expect("built-in scorers");
/// let hash = roost_cache::validity_hash(&preferences, &rules).expect("hash");
/// let town = Location::new("porto");
///
/// let first = cache.get_or_compute("user", "porto", &hash, || aggregator.score(&preferences, &town));
/// assert!(cache.lookup("user", "porto", &hash).into_hit().is_some());
/// assert_eq!(first.match_score, 100);
/// ```
#[derive(Debug, Default)]
pub struct PreferenceVersionCache<S> {
    store: S,
}

impl<S: EntryStore> PreferenceVersionCache<S> {
    /// Wrap `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Read the entry for the pair and check it against `hash`.
    ///
    /// Store errors are logged and reported as a miss.
    #[must_use]
    pub fn lookup(&self, user_id: &str, location_id: &str, hash: &str) -> CacheLookup {
        match self.store.load(user_id, location_id) {
            Ok(Some(entry)) if entry.is_valid_for(hash) => CacheLookup::Hit(entry.result),
            Ok(Some(entry)) => CacheLookup::Stale {
                stored_hash: entry.preferences_hash,
            },
            Ok(None) => CacheLookup::Miss,
            Err(error) => {
                warn!("cache read failed for {user_id}/{location_id}: {error}");
                CacheLookup::Miss
            }
        }
    }

    /// Store a complete result for the pair.
    ///
    /// # Errors
    /// Returns [`CacheError`] when the store rejects the write.
    pub fn store_result(
        &self,
        user_id: &str,
        location_id: &str,
        hash: &str,
        result: &ScoreResult,
    ) -> Result<(), CacheError> {
        self.store
            .save(user_id, &CacheEntry::new(hash, location_id, result.clone()))
    }

    /// Return the cached result for the pair, or compute and store it.
    #[must_use]
    pub fn get_or_compute<F>(
        &self,
        user_id: &str,
        location_id: &str,
        hash: &str,
        compute: F,
    ) -> ScoreResult
    where
        F: FnOnce() -> ScoreResult,
    {
        match self.lookup(user_id, location_id, hash) {
            CacheLookup::Hit(result) => {
                debug!("cache hit for {user_id}/{location_id}");
                result
            }
            lookup => {
                if let CacheLookup::Stale { stored_hash } = &lookup {
                    debug!("stale cache entry for {user_id}/{location_id} (was {stored_hash})");
                } else {
                    debug!("cache miss for {user_id}/{location_id}");
                }
                let result = compute();
                if let Err(error) = self.store_result(user_id, location_id, hash, &result) {
                    warn!("cache write failed for {user_id}/{location_id}: {error}");
                }
                result
            }
        }
    }
}

impl<S: EntryStore> ScoreCache for PreferenceVersionCache<S> {
    fn preferences_hash(
        &self,
        preferences: &NormalizedPreferences,
        rules: &ScoringRules<'_>,
    ) -> Option<String> {
        validity_hash(preferences, rules)
            .inspect_err(|error| warn!("scoring without cache: {error}"))
            .ok()
    }

    fn get_or_compute(
        &self,
        key: &CacheKey<'_>,
        compute: &mut dyn FnMut() -> ScoreResult,
    ) -> ScoreResult {
        Self::get_or_compute(self, key.user_id, key.location_id, key.preferences_hash, compute)
    }
}
