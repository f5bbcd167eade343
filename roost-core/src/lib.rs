//! Core domain types for the Roost compatibility engine.
//!
//! The crate defines the preference schema, the location model, the
//! authored rule tables (option taxonomy and adjacency maps), the result
//! types, and the [`CategoryScorer`] trait that the scoring algorithms in
//! `roost-scorer` implement. Loosely shaped input is validated here, at the
//! boundary, so scorers only ever see well-formed values.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod adjacency;
mod category;
mod diagnostics;
mod error;
mod flag;
mod lenient;
mod location;
mod memo;
mod normalized;
mod preferences;
mod result;
mod scorer;
mod source;
mod taxonomy;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use adjacency::{AdjacencyCredit, AdjacencyMap, AdjacencyRules};
pub use category::{Category, CategoryWeights, CategoryWeightsError};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::RuleTableError;
pub use flag::FeatureFlag;
pub use location::Location;
pub use memo::{CacheKey, ScoreCache, ScoringRules};
pub use normalized::{NormalizedOptions, NormalizedPreferences, Tier};
pub use preferences::{
    AdministrationPreferences, BudgetPreferences, ClimatePreferences, CulturePreferences,
    OptionPreferences, ParsedPreferences, QualityLevel, RegionPreferences, UserPreferences,
};
pub use result::{CategoryScores, Factor, MatchQuality, ScoreResult};
pub use scorer::{CategoryScore, CategoryScorer, ScorerError, ScoringContext, sanitise};
pub use source::LocationSource;
pub use taxonomy::{OptionDefinition, OptionTaxonomy};
