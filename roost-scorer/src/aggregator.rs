//! Combine the six category scores into one `ScoreResult`.
//!
//! The aggregator is the failure boundary of the engine: a scorer that
//! returns an error or panics costs its own category, never the result.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use log::warn;
use roost_core::{
    Category, CategoryScore, CategoryScorer, CategoryScores, CategoryWeights, Diagnostic, Factor,
    Location, MatchQuality, NormalizedPreferences, ParsedPreferences, ScoreResult, ScoringContext,
    ScoringRules, UserPreferences, sanitise,
};

use crate::{
    AdministrationScorer, BudgetScorer, ClimateScorer, CultureScorer, OptionsScorer,
    PreferenceNormalizer, RegionScorer,
};

/// Number of factors kept in a result unless configured otherwise.
pub const DEFAULT_TOP_FACTORS: usize = 5;

/// Tunables for [`ScoreAggregator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Category weights applied to the overall score.
    pub weights: CategoryWeights,
    /// Maximum number of factors reported in `top_factors`.
    pub top_factors: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            top_factors: DEFAULT_TOP_FACTORS,
        }
    }
}

/// Runs every category scorer and folds the outcomes into a [`ScoreResult`].
///
/// Scorers are held per category and can be replaced, which is how tests
/// inject failing doubles and how callers supply alternative rules.
///
/// # Examples
///
/// ```rust
/// use roost_core::{Location, UserPreferences};
/// use roost_scorer::ScoreAggregator;
///
/// let aggregator = ScoreAggregator::default();
/// let preferences = aggregator.normalize(&UserPreferences::default());
/// let result = aggregator.score(&preferences, &Location::new("anywhere"));
/// assert_eq!(result.match_score, 100);
/// ```
#[derive(Clone)]
pub struct ScoreAggregator {
    context: Arc<ScoringContext>,
    config: AggregatorConfig,
    scorers: Vec<Arc<dyn CategoryScorer>>,
    builtin_scorers: bool,
}

impl fmt::Debug for ScoreAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreAggregator")
            .field("config", &self.config)
            .field(
                "scorers",
                &self.scorers.iter().map(|s| s.category()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self::new(ScoringContext::default(), AggregatorConfig::default())
    }
}

impl ScoreAggregator {
    /// Build an aggregator with the built-in scorer for every category.
    #[must_use]
    pub fn new(context: ScoringContext, config: AggregatorConfig) -> Self {
        Self {
            context: Arc::new(context),
            config,
            scorers: vec![
                Arc::new(RegionScorer),
                Arc::new(ClimateScorer),
                Arc::new(CultureScorer),
                Arc::new(OptionsScorer),
                Arc::new(AdministrationScorer),
                Arc::new(BudgetScorer),
            ],
            builtin_scorers: true,
        }
    }

    /// Replace the scorer for the category `scorer` reports.
    #[must_use]
    pub fn with_scorer(mut self, scorer: Arc<dyn CategoryScorer>) -> Self {
        let category = scorer.category();
        self.scorers.retain(|existing| existing.category() != category);
        self.scorers.push(scorer);
        self.builtin_scorers = false;
        self
    }

    /// Rule tables shared by every scorer.
    #[must_use]
    pub fn context(&self) -> &ScoringContext {
        &self.context
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// The rules results depend on besides the preferences.
    ///
    /// `None` once a scorer has been replaced, because a custom scorer's
    /// behaviour cannot be fingerprinted; such results are never cached.
    #[must_use]
    pub fn rules(&self) -> Option<ScoringRules<'_>> {
        self.builtin_scorers.then_some(ScoringRules {
            context: &self.context,
            weights: self.config.weights,
            top_factors: self.config.top_factors,
        })
    }

    /// Normalize raw preferences against this aggregator's taxonomy.
    #[must_use]
    pub fn normalize(&self, preferences: &UserPreferences) -> NormalizedPreferences {
        PreferenceNormalizer::new(&self.context.taxonomy).normalize_preferences(preferences)
    }

    /// Normalize parsed preferences, keeping the warnings found while parsing.
    #[must_use]
    pub fn normalize_parsed(&self, parsed: &ParsedPreferences) -> NormalizedPreferences {
        PreferenceNormalizer::new(&self.context.taxonomy).preferences(parsed)
    }

    /// Score one location. Never fails; degradations surface as warnings.
    #[must_use]
    pub fn score(&self, preferences: &NormalizedPreferences, location: &Location) -> ScoreResult {
        let mut category_scores = CategoryScores::default();
        let mut factors = Vec::new();
        let mut diagnostics: Vec<Diagnostic> = preferences.warnings.clone();

        for category in Category::ALL {
            let outcome = self.run(category, preferences, location);
            category_scores.set(category, outcome.score);
            factors.extend(outcome.factors);
            diagnostics.extend(outcome.warnings);
        }

        let match_score = self.weighted(&category_scores);
        ScoreResult {
            match_score,
            match_quality: MatchQuality::from_score(match_score),
            category_scores,
            top_factors: top_factors(factors, self.config.top_factors),
            warnings: diagnostics.iter().map(ToString::to_string).collect(),
        }
    }

    fn run(
        &self,
        category: Category,
        preferences: &NormalizedPreferences,
        location: &Location,
    ) -> CategoryScore {
        let Some(scorer) = self.scorers.iter().find(|s| s.category() == category) else {
            return failed(category, &location.id, "no scorer registered");
        };
        let attempt = catch_unwind(AssertUnwindSafe(|| {
            scorer.score(preferences, location, &self.context)
        }));
        match attempt {
            Ok(Ok(score)) => score,
            Ok(Err(error)) => failed(category, &location.id, &error.to_string()),
            Err(payload) => failed(category, &location.id, &panic_message(payload.as_ref())),
        }
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "weighted mean of category scores"
    )]
    fn weighted(&self, scores: &CategoryScores) -> u8 {
        let weights = &self.config.weights;
        let total = Category::ALL.iter().fold(0.0, |sum, &category| {
            sum + f64::from(scores.get(category)) * f64::from(weights.weight(category))
        });
        sanitise(total / f64::from(weights.total()))
    }
}

fn failed(category: Category, location_id: &str, reason: &str) -> CategoryScore {
    warn!("{category} scorer failed for location {location_id}: {reason}");
    CategoryScore {
        score: 0,
        factors: Vec::new(),
        warnings: vec![Diagnostic::scorer_failure(
            category,
            format!("category scored 0 ({reason})"),
        )],
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "scorer panicked".to_owned())
}

/// Highest-scoring factors first; equal scores keep label order.
fn top_factors(mut factors: Vec<Factor>, limit: usize) -> Vec<Factor> {
    factors.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.factor.cmp(&b.factor)));
    factors.truncate(limit);
    factors
}
