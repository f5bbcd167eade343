//! Rank many locations for one user on a bounded thread pool.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use roost_core::{
    CacheKey, Location, LocationSource, NormalizedPreferences, ScoreCache, ScoreResult,
};
use serde::Serialize;
use thiserror::Error;

use crate::ScoreAggregator;

/// Worker threads used when no limit is configured.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Tunables for [`BatchScorer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Upper bound on worker threads scoring locations at once.
    pub max_concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Errors raised while constructing a [`BatchScorer`].
#[derive(Debug, Error)]
pub enum BatchError {
    /// The configured concurrency was zero.
    #[error("max_concurrency must be at least 1")]
    ZeroConcurrency,
    /// The worker pool could not be created.
    #[error("failed to build the scoring thread pool")]
    ThreadPool {
        /// Underlying error from rayon.
        #[source]
        source: rayon::ThreadPoolBuildError,
    },
}

/// Shared flag that lets a caller abandon a batch.
///
/// Locations not yet started when the token is cancelled are skipped.
/// Results already computed are kept and remain valid.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every batch observing this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Window of ranked results to return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    /// Number of top-ranked results to skip.
    pub offset: usize,
    /// Maximum results to return; `None` returns the rest.
    pub limit: Option<usize>,
}

/// One user's ranking request.
#[derive(Debug, Clone, Copy)]
pub struct BatchRequest<'a> {
    /// User owning the preferences; results are cached only when set.
    pub user_id: Option<&'a str>,
    /// Normalized preferences to score against.
    pub preferences: &'a NormalizedPreferences,
    /// Result window.
    pub page: Page,
}

/// A scored location in ranking order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedLocation {
    /// Location identifier.
    pub location_id: String,
    /// Display name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Compatibility result.
    #[serde(flatten)]
    pub result: ScoreResult,
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ranking {
    /// Number of locations scored before paging.
    pub total: usize,
    /// Locations skipped because the batch was cancelled.
    pub skipped: usize,
    /// The requested page, best match first.
    pub locations: Vec<RankedLocation>,
}

/// Scores locations in parallel and ranks them.
///
/// Results are ordered by `match_score` descending, then by location
/// identifier, so rankings are deterministic whatever the thread count.
pub struct BatchScorer {
    aggregator: ScoreAggregator,
    pool: ThreadPool,
    cache: Option<Arc<dyn ScoreCache>>,
}

impl std::fmt::Debug for BatchScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScorer")
            .field("aggregator", &self.aggregator)
            .field("threads", &self.pool.current_num_threads())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl BatchScorer {
    /// Create a batch scorer with its own worker pool.
    ///
    /// # Errors
    /// Returns [`BatchError::ZeroConcurrency`] when `max_concurrency` is zero
    /// and [`BatchError::ThreadPool`] when the pool cannot be created.
    pub fn new(aggregator: ScoreAggregator, config: BatchConfig) -> Result<Self, BatchError> {
        if config.max_concurrency == 0 {
            return Err(BatchError::ZeroConcurrency);
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.max_concurrency)
            .thread_name(|index| format!("roost-score-{index}"))
            .build()
            .map_err(|source| BatchError::ThreadPool { source })?;
        Ok(Self {
            aggregator,
            pool,
            cache: None,
        })
    }

    /// Memoize results in `cache`.
    ///
    /// Entries are keyed on the preferences and the aggregator's rules. An
    /// aggregator with replaced scorers has no rules and always recomputes.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn ScoreCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// The aggregator used for each location.
    #[must_use]
    pub const fn aggregator(&self) -> &ScoreAggregator {
        &self.aggregator
    }

    /// Score and rank `locations`.
    #[must_use]
    pub fn rank(
        &self,
        request: &BatchRequest<'_>,
        locations: &[Location],
        token: &CancellationToken,
    ) -> Ranking {
        let preferences_hash = self.cache.as_ref().and_then(|cache| {
            let rules = self.aggregator.rules()?;
            cache.preferences_hash(request.preferences, &rules)
        });
        let scored: Vec<Option<RankedLocation>> = self.pool.install(|| {
            locations
                .par_iter()
                .map(|location| {
                    if token.is_cancelled() {
                        return None;
                    }
                    Some(RankedLocation {
                        location_id: location.id.clone(),
                        name: location.name.clone(),
                        result: self.score_one(request, preferences_hash.as_deref(), location),
                    })
                })
                .collect()
        });

        let skipped = scored.iter().filter(|entry| entry.is_none()).count();
        let mut ranked: Vec<RankedLocation> = scored.into_iter().flatten().collect();
        ranked.sort_by(|a, b| {
            b.result
                .match_score
                .cmp(&a.result.match_score)
                .then_with(|| a.location_id.cmp(&b.location_id))
        });
        let total = ranked.len();
        debug!("ranked {total} locations, skipped {skipped}");
        Ranking {
            total,
            skipped,
            locations: ranked
                .into_iter()
                .skip(request.page.offset)
                .take(request.page.limit.unwrap_or(usize::MAX))
                .collect(),
        }
    }

    /// Rank every location `source` yields.
    #[must_use]
    pub fn rank_source(
        &self,
        request: &BatchRequest<'_>,
        source: &dyn LocationSource,
        token: &CancellationToken,
    ) -> Ranking {
        let locations: Vec<Location> = source.locations().collect();
        self.rank(request, &locations, token)
    }

    fn score_one(
        &self,
        request: &BatchRequest<'_>,
        preferences_hash: Option<&str>,
        location: &Location,
    ) -> ScoreResult {
        let mut compute = || self.aggregator.score(request.preferences, location);
        match (self.cache.as_deref(), request.user_id, preferences_hash) {
            (Some(cache), Some(user_id), Some(hash)) => cache.get_or_compute(
                &CacheKey {
                    user_id,
                    location_id: &location.id,
                    preferences_hash: hash,
                },
                &mut compute,
            ),
            _ => compute(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::AggregatorConfig;
    use roost_core::test_support::FixedScorer;
    use roost_core::{Category, ScoringContext, ScoringRules, UserPreferences};
    use rstest::{fixture, rstest};

    fn town(id: &str, cost: f64) -> Location {
        let mut location = Location::new(id);
        location.cost_of_living_usd = Some(cost);
        location
    }

    #[fixture]
    fn towns() -> Vec<Location> {
        vec![
            town("expensive", 6000.0),
            town("cheap", 1000.0),
            town("middling", 2400.0),
            town("also-cheap", 900.0),
        ]
    }

    #[fixture]
    fn scorer() -> BatchScorer {
        BatchScorer::new(ScoreAggregator::default(), BatchConfig { max_concurrency: 2 })
            .expect("build batch scorer")
    }

    fn budget_preferences(scorer: &BatchScorer) -> NormalizedPreferences {
        let mut raw = UserPreferences::default();
        raw.budget.total_monthly_budget = Some(2500.0);
        scorer.aggregator().normalize(&raw)
    }

    #[rstest]
    fn ranks_by_score_then_identifier(scorer: BatchScorer, towns: Vec<Location>) {
        let preferences = budget_preferences(&scorer);
        let request = BatchRequest {
            user_id: None,
            preferences: &preferences,
            page: Page::default(),
        };
        let ranking = scorer.rank(&request, &towns, &CancellationToken::new());
        let order: Vec<&str> = ranking
            .locations
            .iter()
            .map(|entry| entry.location_id.as_str())
            .collect();
        assert_eq!(order, ["also-cheap", "cheap", "middling", "expensive"]);
        assert_eq!(ranking.total, 4);
    }

    #[rstest]
    fn pages_after_sorting(scorer: BatchScorer, towns: Vec<Location>) {
        let preferences = budget_preferences(&scorer);
        let request = BatchRequest {
            user_id: None,
            preferences: &preferences,
            page: Page {
                offset: 1,
                limit: Some(2),
            },
        };
        let ranking = scorer.rank(&request, &towns, &CancellationToken::new());
        let order: Vec<&str> = ranking
            .locations
            .iter()
            .map(|entry| entry.location_id.as_str())
            .collect();
        assert_eq!(order, ["cheap", "middling"]);
    }

    #[rstest]
    fn cancelled_batches_skip_pending_locations(scorer: BatchScorer, towns: Vec<Location>) {
        let preferences = budget_preferences(&scorer);
        let request = BatchRequest {
            user_id: None,
            preferences: &preferences,
            page: Page::default(),
        };
        let token = CancellationToken::new();
        token.cancel();
        let ranking = scorer.rank(&request, &towns, &token);
        assert_eq!(ranking.skipped, 4);
        assert!(ranking.locations.is_empty());
    }

    #[rstest]
    fn zero_concurrency_is_rejected() {
        let result = BatchScorer::new(ScoreAggregator::default(), BatchConfig { max_concurrency: 0 });
        assert!(matches!(result, Err(BatchError::ZeroConcurrency)));
    }

    #[derive(Default)]
    struct CountingCache {
        entries: Mutex<HashMap<String, ScoreResult>>,
        computed: AtomicUsize,
    }

    impl ScoreCache for CountingCache {
        fn preferences_hash(
            &self,
            _preferences: &NormalizedPreferences,
            rules: &ScoringRules<'_>,
        ) -> Option<String> {
            Some(format!("top-{}", rules.top_factors))
        }

        fn get_or_compute(
            &self,
            key: &CacheKey<'_>,
            compute: &mut dyn FnMut() -> ScoreResult,
        ) -> ScoreResult {
            let id = format!("{}/{}/{}", key.user_id, key.location_id, key.preferences_hash);
            if let Some(hit) = self.entries.lock().expect("cache entries lock").get(&id) {
                return hit.clone();
            }
            self.computed.fetch_add(1, Ordering::Relaxed);
            let result = compute();
            self.entries.lock().expect("cache entries lock").insert(id, result.clone());
            result
        }
    }

    #[rstest]
    fn cached_batches_reuse_results(towns: Vec<Location>) {
        let cache = Arc::new(CountingCache::default());
        let scorer = BatchScorer::new(ScoreAggregator::default(), BatchConfig::default())
            .expect("build batch scorer")
            .with_cache(cache.clone());
        let preferences = budget_preferences(&scorer);
        let request = BatchRequest {
            user_id: Some("user-1"),
            preferences: &preferences,
            page: Page::default(),
        };
        let first = scorer.rank(&request, &towns, &CancellationToken::new());
        let second = scorer.rank(&request, &towns, &CancellationToken::new());
        assert_eq!(first, second);
        assert_eq!(cache.computed.load(Ordering::Relaxed), 4);
    }

    fn cached_rank(
        aggregator: ScoreAggregator,
        cache: &Arc<CountingCache>,
        towns: &[Location],
    ) -> Ranking {
        let scorer = BatchScorer::new(aggregator, BatchConfig::default())
            .expect("build batch scorer")
            .with_cache(cache.clone());
        let preferences = budget_preferences(&scorer);
        let request = BatchRequest {
            user_id: Some("user-1"),
            preferences: &preferences,
            page: Page::default(),
        };
        scorer.rank(&request, towns, &CancellationToken::new())
    }

    #[rstest]
    fn reconfigured_aggregators_miss_the_cache(towns: Vec<Location>) {
        let cache = Arc::new(CountingCache::default());
        let narrow = ScoreAggregator::new(
            ScoringContext::default(),
            AggregatorConfig {
                top_factors: 1,
                ..AggregatorConfig::default()
            },
        );
        let first = cached_rank(ScoreAggregator::default(), &cache, &towns);
        let ranking = cached_rank(narrow, &cache, &towns);
        assert_eq!(first.total, ranking.total);
        assert_eq!(cache.computed.load(Ordering::Relaxed), 8);
        assert!(ranking.locations.iter().all(|ranked| ranked.result.top_factors.len() <= 1));
    }

    #[rstest]
    fn replaced_scorers_bypass_the_cache(towns: Vec<Location>) {
        let cache = Arc::new(CountingCache::default());
        let aggregator = ScoreAggregator::default()
            .with_scorer(Arc::new(FixedScorer::new(Category::Budget, 10)));
        let ranking = cached_rank(aggregator, &cache, &towns);
        assert_eq!(ranking.total, 4);
        assert_eq!(cache.computed.load(Ordering::Relaxed), 0);
    }
}
