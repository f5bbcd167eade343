//! Score results returned to callers.

use serde::{Deserialize, Serialize};

use crate::Category;

/// A labelled contribution to a score, in points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factor {
    /// Human-readable description.
    pub factor: String,
    /// Points contributed.
    pub score: i32,
}

impl Factor {
    /// Construct a factor.
    #[must_use]
    pub fn new(factor: impl Into<String>, score: i32) -> Self {
        Self {
            factor: factor.into(),
            score,
        }
    }
}

/// Coarse band for an overall score.
///
/// # Examples
/// ```
/// use roost_core::MatchQuality;
///
/// assert_eq!(MatchQuality::from_score(85), MatchQuality::Excellent);
/// assert_eq!(MatchQuality::from_score(54), MatchQuality::Poor);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchQuality {
    /// 85 and above.
    Excellent,
    /// 70 to 84.
    Good,
    /// 55 to 69.
    Fair,
    /// Below 55.
    Poor,
}

impl MatchQuality {
    /// Band for `score`.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            85.. => Self::Excellent,
            70..=84 => Self::Good,
            55..=69 => Self::Fair,
            _ => Self::Poor,
        }
    }

    /// Return the band as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl std::fmt::Display for MatchQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category scores, each within `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScores {
    /// Region score.
    pub region: u8,
    /// Climate score.
    pub climate: u8,
    /// Culture score.
    pub culture: u8,
    /// Options score.
    pub options: u8,
    /// Administration score.
    pub administration: u8,
    /// Budget score.
    pub budget: u8,
}

impl CategoryScores {
    /// Score recorded for `category`.
    #[must_use]
    pub const fn get(&self, category: Category) -> u8 {
        match category {
            Category::Region => self.region,
            Category::Climate => self.climate,
            Category::Culture => self.culture,
            Category::Options => self.options,
            Category::Administration => self.administration,
            Category::Budget => self.budget,
        }
    }

    /// Record the score for `category`, clamped to 100.
    pub const fn set(&mut self, category: Category, score: u8) {
        let bounded = if score > 100 { 100 } else { score };
        match category {
            Category::Region => self.region = bounded,
            Category::Climate => self.climate = bounded,
            Category::Culture => self.culture = bounded,
            Category::Options => self.options = bounded,
            Category::Administration => self.administration = bounded,
            Category::Budget => self.budget = bounded,
        }
    }
}

/// Outcome of scoring one location for one user.
///
/// Built once per evaluation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Weighted overall score, `0..=100`.
    pub match_score: u8,
    /// Band for `match_score`.
    pub match_quality: MatchQuality,
    /// Score per category.
    pub category_scores: CategoryScores,
    /// Highest-scoring factors across all categories.
    pub top_factors: Vec<Factor>,
    /// Degradation notes.
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100, MatchQuality::Excellent)]
    #[case(85, MatchQuality::Excellent)]
    #[case(84, MatchQuality::Good)]
    #[case(70, MatchQuality::Good)]
    #[case(69, MatchQuality::Fair)]
    #[case(55, MatchQuality::Fair)]
    #[case(54, MatchQuality::Poor)]
    #[case(0, MatchQuality::Poor)]
    fn quality_bands(#[case] score: u8, #[case] expected: MatchQuality) {
        assert_eq!(MatchQuality::from_score(score), expected);
    }

    #[rstest]
    fn set_clamps_to_one_hundred() {
        let mut scores = CategoryScores::default();
        scores.set(Category::Culture, 250);
        assert_eq!(scores.get(Category::Culture), 100);
    }

    #[rstest]
    fn quality_serializes_lowercase() {
        let json = serde_json::to_string(&MatchQuality::Fair).expect("serialize quality");
        assert_eq!(json, "\"fair\"");
    }
}
