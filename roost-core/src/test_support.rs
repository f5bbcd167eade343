//! Test doubles shared by unit and behaviour tests.

use std::collections::BTreeMap;

use crate::{
    Category, CategoryScore, CategoryScorer, Factor, Location, LocationSource,
    NormalizedPreferences, ScorerError, ScoringContext,
};

/// In-memory `LocationSource` keyed by identifier.
///
/// Iteration follows identifier order.
#[derive(Default, Debug, Clone)]
pub struct MemoryLocationSource {
    locations: BTreeMap<String, Location>,
}

impl MemoryLocationSource {
    /// Create a source from a collection of locations.
    ///
    /// Later entries replace earlier ones with the same identifier.
    #[must_use]
    pub fn with_locations<I>(locations: I) -> Self
    where
        I: IntoIterator<Item = Location>,
    {
        Self {
            locations: locations
                .into_iter()
                .map(|location| (location.id.clone(), location))
                .collect(),
        }
    }
}

impl LocationSource for MemoryLocationSource {
    fn location(&self, id: &str) -> Option<Location> {
        self.locations.get(id).cloned()
    }

    fn locations(&self) -> Box<dyn Iterator<Item = Location> + Send + '_> {
        Box::new(self.locations.values().cloned())
    }
}

/// Scorer returning a constant score for one category.
#[derive(Debug, Clone, Copy)]
pub struct FixedScorer {
    category: Category,
    score: u8,
}

impl FixedScorer {
    /// Create a scorer that always returns `score` for `category`.
    #[must_use]
    pub const fn new(category: Category, score: u8) -> Self {
        Self { category, score }
    }
}

impl CategoryScorer for FixedScorer {
    fn category(&self) -> Category {
        self.category
    }

    fn score(
        &self,
        _preferences: &NormalizedPreferences,
        _location: &Location,
        _context: &ScoringContext,
    ) -> Result<CategoryScore, ScorerError> {
        Ok(CategoryScore {
            score: self.score,
            factors: vec![Factor::new(format!("Fixed {}", self.category), i32::from(self.score))],
            warnings: Vec::new(),
        })
    }
}

/// Scorer that always reports an error.
#[derive(Debug, Clone, Copy)]
pub struct FailingScorer(pub Category);

impl CategoryScorer for FailingScorer {
    fn category(&self) -> Category {
        self.0
    }

    fn score(
        &self,
        _preferences: &NormalizedPreferences,
        _location: &Location,
        _context: &ScoringContext,
    ) -> Result<CategoryScore, ScorerError> {
        Err(ScorerError::Evaluation {
            category: self.0,
            reason: "simulated failure".to_owned(),
        })
    }
}

/// Scorer that panics while scoring.
#[derive(Debug, Clone, Copy)]
pub struct PanickingScorer(pub Category);

impl CategoryScorer for PanickingScorer {
    fn category(&self) -> Category {
        self.0
    }

    #[expect(clippy::panic, reason = "exercises panic isolation in the aggregator")]
    fn score(
        &self,
        _preferences: &NormalizedPreferences,
        _location: &Location,
        _context: &ScoringContext,
    ) -> Result<CategoryScore, ScorerError> {
        panic!("simulated {} scorer panic", self.0);
    }
}
