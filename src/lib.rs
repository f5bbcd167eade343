//! Facade crate for the Roost compatibility engine.
//!
//! This crate re-exports the core domain types and the scoring pipeline, and
//! exposes the preference-versioned score cache behind feature flags.

#![forbid(unsafe_code)]

pub use roost_core::{
    AdjacencyRules, Category, CategoryScore, CategoryScorer, CategoryScores, CategoryWeights,
    Diagnostic, DiagnosticKind, Factor, Location, LocationSource, MatchQuality,
    NormalizedPreferences, OptionTaxonomy, ParsedPreferences, ScoreCache, ScoreResult,
    ScoringContext, UserPreferences,
};

pub use roost_scorer::{
    AggregatorConfig, BatchConfig, BatchError, BatchRequest, BatchScorer, CancellationToken,
    OptionAvailabilityInferencer, Page, RankedLocation, Ranking, ScoreAggregator,
};

#[cfg(feature = "cache")]
pub use roost_cache::{CacheError, EntryStore, MemoryEntryStore, PreferenceVersionCache};

#[cfg(feature = "cache-sqlite")]
pub use roost_cache::SqliteEntryStore;
