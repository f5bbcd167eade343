//! Scoring algorithms for the Roost compatibility engine.
//!
//! The crate turns a user's preferences and a candidate location into a
//! [`ScoreResult`](roost_core::ScoreResult):
//! - [`PreferenceNormalizer`] expands compound option tokens and records
//!   whether each option was chosen explicitly or inferred.
//! - [`OptionAvailabilityInferencer`] derives which gated options a
//!   location supports from its attributes, consulting stored overrides
//!   only for exceptions.
//! - [`GradualMatcher`] awards partial credit for ordinal near-misses.
//! - Six category scorers implement [`CategoryScorer`](roost_core::CategoryScorer).
//! - [`ScoreAggregator`] weights the categories, isolates scorer failures,
//!   and reports the strongest factors.
//! - [`BatchScorer`] ranks many locations on a bounded thread pool.
//!
//! # Examples
//!
//! ```rust
//! use roost_core::{Location, UserPreferences};
//! use roost_scorer::ScoreAggregator;
//!
//! let aggregator = ScoreAggregator::default();
//! let mut preferences = UserPreferences::default();
//! preferences.options.activities = vec!["surfing".to_owned()];
//! let normalized = aggregator.normalize(&preferences);
//!
//! let mut beach = Location::new("beach-town");
//! beach.geographic_features = vec!["coastal".to_owned()];
//! let result = aggregator.score(&normalized, &beach);
//! assert_eq!(result.category_scores.options, 100);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod administration;
mod aggregator;
mod availability;
mod batch;
mod budget;
mod climate;
mod culture;
mod gradual;
mod normalizer;
mod options;
mod region;
mod tally;

pub use administration::AdministrationScorer;
pub use aggregator::{AggregatorConfig, DEFAULT_TOP_FACTORS, ScoreAggregator};
pub use availability::{OptionAvailabilityInferencer, SparsityReport, feature_flags};
pub use batch::{
    BatchConfig, BatchError, BatchRequest, BatchScorer, CancellationToken,
    DEFAULT_MAX_CONCURRENCY, Page, RankedLocation, Ranking,
};
pub use budget::BudgetScorer;
pub use climate::ClimateScorer;
pub use culture::CultureScorer;
pub use gradual::{BestMatch, DEFAULT_ADJACENCY_CREDIT, GradualMatch, GradualMatcher, MatchKind};
pub use normalizer::{OptionInput, OptionSelections, PreferenceNormalizer, Selection};
pub use options::OptionsScorer;
pub use region::RegionScorer;
