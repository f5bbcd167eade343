//! The category scorer seam.
//!
//! Each of the six categories is scored by a [`CategoryScorer`]. Scorers are
//! pure: they read normalized preferences, one location and the shared rule
//! tables, and return a [`CategoryScore`]. The aggregator isolates scorers
//! from one another, so an implementation may fail without affecting the
//! other categories.

use serde::Serialize;
use thiserror::Error;

use crate::{
    AdjacencyRules, Category, Diagnostic, Factor, Location, NormalizedPreferences,
    OptionTaxonomy,
};

/// Result of scoring one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryScore {
    /// Score within `0..=100`.
    pub score: u8,
    /// Contributing factors, in points.
    pub factors: Vec<Factor>,
    /// Degradation notes.
    pub warnings: Vec<Diagnostic>,
}

impl CategoryScore {
    /// Full marks with a single explanatory factor, used when the user
    /// expressed no preference for the category.
    #[must_use]
    pub fn open(factor: impl Into<String>) -> Self {
        Self {
            score: 100,
            factors: vec![Factor::new(factor, 100)],
            warnings: Vec::new(),
        }
    }

    /// Normalize `earned` out of `available` points to `0..=100`.
    ///
    /// A non-positive or non-finite `available` yields 0.
    ///
    /// # Examples
    /// ```
    /// use roost_core::CategoryScore;
    ///
    /// assert_eq!(CategoryScore::from_points(45.0, 90.0, Vec::new(), Vec::new()).score, 50);
    /// assert_eq!(CategoryScore::from_points(f64::NAN, 90.0, Vec::new(), Vec::new()).score, 0);
    /// ```
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "category points are normalized to a percentage"
    )]
    pub fn from_points(
        earned: f64,
        available: f64,
        factors: Vec<Factor>,
        warnings: Vec<Diagnostic>,
    ) -> Self {
        let percentage = if available.is_finite() && available > 0.0 {
            earned / available * 100.0
        } else {
            0.0
        };
        Self {
            score: sanitise(percentage),
            factors,
            warnings,
        }
    }
}

/// Clamp and round a raw score into `0..=100`.
///
/// Returns `0` for non-finite values.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is rounded and clamped to 0..=100 before the cast"
)]
pub fn sanitise(score: f64) -> u8 {
    if !score.is_finite() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u8
}

/// Errors a scorer may report instead of a score.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScorerError {
    /// The scorer could not evaluate the location.
    #[error("{category} scorer failed: {reason}")]
    Evaluation {
        /// Category being scored.
        category: Category,
        /// What went wrong.
        reason: String,
    },
}

/// Rule tables shared by every scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoringContext {
    /// Canonical options and compound shorthands.
    pub taxonomy: OptionTaxonomy,
    /// Ordinal adjacency tables.
    pub adjacency: AdjacencyRules,
}

impl ScoringContext {
    /// Bundle rule tables into a context.
    #[must_use]
    pub const fn new(taxonomy: OptionTaxonomy, adjacency: AdjacencyRules) -> Self {
        Self {
            taxonomy,
            adjacency,
        }
    }
}

/// Score one category of a location against normalized preferences.
///
/// Implementations must be thread-safe (`Send` + `Sync`) so locations can be
/// scored in parallel. They must award full points to sub-factors the user
/// left unset and must never panic on missing or malformed location data;
/// degrade and record a [`Diagnostic`] instead.
///
/// # Examples
///
/// ```rust
/// use roost_core::{
///     Category, CategoryScore, CategoryScorer, Location, NormalizedPreferences,
///     ScorerError, ScoringContext,
/// };
///
/// struct Indifferent;
///
/// impl CategoryScorer for Indifferent {
///     fn category(&self) -> Category {
///         Category::Culture
///     }
///
///     fn score(
///         &self,
///         _preferences: &NormalizedPreferences,
///         _location: &Location,
///         _context: &ScoringContext,
///     ) -> Result<CategoryScore, ScorerError> {
///         Ok(CategoryScore::open("Open to any culture"))
///     }
/// }
///
/// let result = Indifferent
///     .score(
///         &NormalizedPreferences::default(),
///         &Location::new("x"),
///         &ScoringContext::default(),
///     )
///     .expect("indifferent scorer never fails");
/// assert_eq!(result.score, 100);
/// ```
pub trait CategoryScorer: Send + Sync {
    /// Category this scorer evaluates.
    fn category(&self) -> Category;

    /// Score `location` against `preferences`.
    ///
    /// # Errors
    /// Implementations return [`ScorerError`] when they cannot produce a
    /// score; the aggregator then scores the category as zero.
    fn score(
        &self,
        preferences: &NormalizedPreferences,
        location: &Location,
        context: &ScoringContext,
    ) -> Result<CategoryScore, ScorerError>;
}
