//! Memoization seam between batch scoring and result caches.

use serde::Serialize;

use crate::{CategoryWeights, NormalizedPreferences, ScoreResult, ScoringContext};

/// Identifies one cached score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey<'a> {
    /// Owner of the preferences.
    pub user_id: &'a str,
    /// Scored location.
    pub location_id: &'a str,
    /// Validity hash of the preferences and the rules the score was
    /// computed with.
    pub preferences_hash: &'a str,
}

/// Everything besides the preferences that shapes a [`ScoreResult`].
///
/// A cached result is only valid for the rules it was computed under, so
/// these are folded into the validity hash alongside the preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringRules<'a> {
    /// Taxonomy and adjacency tables.
    pub context: &'a ScoringContext,
    /// Category weights of the overall score.
    pub weights: CategoryWeights,
    /// Number of reported top factors.
    pub top_factors: usize,
}

/// Memoizes score results per user and location.
///
/// A cache must be transparent: returning a cached value or recomputing it
/// yields the same result. Implementations are shared across worker
/// threads.
pub trait ScoreCache: Send + Sync {
    /// Validity hash of `preferences` scored under `rules`.
    ///
    /// `None` means the inputs could not be hashed; callers then score
    /// without the cache.
    fn preferences_hash(
        &self,
        preferences: &NormalizedPreferences,
        rules: &ScoringRules<'_>,
    ) -> Option<String>;

    /// Return the stored result for `key` when its hash matches, otherwise
    /// run `compute`, store the complete result and return it.
    fn get_or_compute(
        &self,
        key: &CacheKey<'_>,
        compute: &mut dyn FnMut() -> ScoreResult,
    ) -> ScoreResult;
}
