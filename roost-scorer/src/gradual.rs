//! Ordinal matching with partial credit.
//!
//! Ordinal preferences (humidity, pace of life, ...) should not be all or
//! nothing. An exact match earns full points, a value listed as adjacent in
//! the authored [`AdjacencyMap`] earns a fixed fraction, anything else earns
//! nothing.

use roost_core::AdjacencyMap;

/// Credit awarded for adjacent values when none is configured.
pub const DEFAULT_ADJACENCY_CREDIT: f64 = 0.7;

/// How a preference related to the location's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Values were equal.
    Exact,
    /// The location's value is adjacent to the preference.
    Adjacent,
    /// Values were unrelated.
    Mismatch,
    /// Either side was blank.
    Empty,
}

/// Outcome of matching one preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradualMatch {
    /// Points earned.
    pub points: u32,
    /// How the values related.
    pub kind: MatchKind,
    /// Explanation; `None` when either input was blank.
    pub description: Option<String>,
}

/// Outcome of matching the best of several preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMatch {
    /// Points earned by the best preference.
    pub points: u32,
    /// How the best preference related.
    pub kind: MatchKind,
    /// The preference that produced `points`.
    pub preference: Option<String>,
    /// Explanation; `None` when nothing could be compared.
    pub description: Option<String>,
}

/// Scores ordinal preferences with adjacency credit.
///
/// # Examples
/// ```
/// use roost_core::AdjacencyRules;
/// use roost_scorer::GradualMatcher;
///
/// let rules = AdjacencyRules::builtin();
/// let matcher = GradualMatcher::default();
/// assert_eq!(matcher.score("dry", "dry", 20, &rules.humidity).points, 20);
/// assert_eq!(matcher.score("dry", "balanced", 20, &rules.humidity).points, 14);
/// assert_eq!(matcher.score("dry", "humid", 20, &rules.humidity).points, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradualMatcher {
    credit: f64,
}

impl Default for GradualMatcher {
    fn default() -> Self {
        Self {
            credit: DEFAULT_ADJACENCY_CREDIT,
        }
    }
}

impl GradualMatcher {
    /// Create a matcher awarding `credit` of the points for adjacent values.
    ///
    /// The credit is clamped to `0.0..=1.0`; a non-finite credit becomes 0.
    #[must_use]
    pub fn with_credit(credit: f64) -> Self {
        let bounded = if credit.is_finite() {
            credit.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { credit: bounded }
    }

    /// Adjacency credit in use.
    #[must_use]
    pub const fn credit(&self) -> f64 {
        self.credit
    }

    /// Match one preference against the location's value.
    ///
    /// Both sides are trimmed and lowercased before comparison.
    #[must_use]
    pub fn score(
        &self,
        preference: &str,
        actual: &str,
        max_points: u32,
        map: &AdjacencyMap,
    ) -> GradualMatch {
        let wanted = preference.trim().to_lowercase();
        let found = actual.trim().to_lowercase();
        if wanted.is_empty() || found.is_empty() {
            return GradualMatch {
                points: 0,
                kind: MatchKind::Empty,
                description: None,
            };
        }
        if wanted == found {
            return GradualMatch {
                points: max_points,
                kind: MatchKind::Exact,
                description: Some(format!("Perfect match: {found}")),
            };
        }
        if map.is_adjacent(&wanted, &found) {
            return GradualMatch {
                points: self.adjacent_points(max_points),
                kind: MatchKind::Adjacent,
                description: Some(format!(
                    "Good compatibility: prefers {wanted}, location is {found}"
                )),
            };
        }
        GradualMatch {
            points: 0,
            kind: MatchKind::Mismatch,
            description: Some(format!(
                "Preference mismatch: prefers {wanted}, location is {found}"
            )),
        }
    }

    /// Match the best of several preferences.
    ///
    /// The first preference reaching the highest score wins ties.
    #[must_use]
    pub fn best_of(
        &self,
        preferences: &[String],
        actual: &str,
        max_points: u32,
        map: &AdjacencyMap,
    ) -> BestMatch {
        let mut best = BestMatch {
            points: 0,
            kind: MatchKind::Empty,
            preference: None,
            description: None,
        };
        for preference in preferences {
            let candidate = self.score(preference, actual, max_points, map);
            let improves = candidate.points > best.points
                || (best.kind == MatchKind::Empty && candidate.kind != MatchKind::Empty);
            if improves {
                best = BestMatch {
                    points: candidate.points,
                    kind: candidate.kind,
                    preference: Some(preference.trim().to_lowercase()),
                    description: candidate.description,
                };
            }
            if best.kind == MatchKind::Exact {
                break;
            }
        }
        best
    }

    /// Points awarded for an adjacent match out of `max_points`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "credit is within 0..=1, so the rounded product fits in u32"
    )]
    pub fn adjacent_points(&self, max_points: u32) -> u32 {
        (f64::from(max_points) * self.credit).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roost_core::AdjacencyRules;
    use rstest::{fixture, rstest};

    #[fixture]
    fn rules() -> AdjacencyRules {
        AdjacencyRules::builtin()
    }

    #[rstest]
    #[case("dry", "dry", 20, MatchKind::Exact)]
    #[case("dry", "balanced", 14, MatchKind::Adjacent)]
    #[case("dry", "humid", 0, MatchKind::Mismatch)]
    #[case(" DRY ", "Balanced", 14, MatchKind::Adjacent)]
    fn humidity_examples(
        rules: AdjacencyRules,
        #[case] preference: &str,
        #[case] actual: &str,
        #[case] points: u32,
        #[case] kind: MatchKind,
    ) {
        let matched = GradualMatcher::default().score(preference, actual, 20, &rules.humidity);
        assert_eq!(matched.points, points);
        assert_eq!(matched.kind, kind);
        assert!(matched.description.is_some());
    }

    #[rstest]
    #[case("", "dry")]
    #[case("dry", "  ")]
    fn blank_inputs_score_zero_without_description(
        rules: AdjacencyRules,
        #[case] preference: &str,
        #[case] actual: &str,
    ) {
        let matched = GradualMatcher::default().score(preference, actual, 20, &rules.humidity);
        assert_eq!(matched.points, 0);
        assert_eq!(matched.description, None);
    }

    #[rstest]
    fn best_of_reports_winning_preference(rules: AdjacencyRules) {
        let preferences = vec!["humid".to_owned(), "dry".to_owned()];
        let best = GradualMatcher::default().best_of(&preferences, "balanced", 20, &rules.humidity);
        assert_eq!(best.points, 14);
        assert_eq!(best.preference.as_deref(), Some("humid"));
    }

    #[rstest]
    fn best_of_empty_preferences_is_empty(rules: AdjacencyRules) {
        let best = GradualMatcher::default().best_of(&[], "balanced", 20, &rules.humidity);
        assert_eq!(best.kind, MatchKind::Empty);
        assert_eq!(best.points, 0);
    }

    #[rstest]
    #[case(0.5, 10, 5)]
    #[case(2.0, 10, 10)]
    #[case(f64::NAN, 10, 0)]
    fn credit_is_bounded(#[case] credit: f64, #[case] max: u32, #[case] expected: u32) {
        assert_eq!(GradualMatcher::with_credit(credit).adjacent_points(max), expected);
    }
}
