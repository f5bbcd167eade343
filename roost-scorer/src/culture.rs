//! Culture compatibility: lifestyle, language and amenities.

use roost_core::{
    AdjacencyMap, Category, CategoryScore, CategoryScorer, CulturePreferences, Location,
    NormalizedPreferences, ScorerError, ScoringContext,
};

use crate::gradual::{GradualMatcher, MatchKind};
use crate::tally::{NEUTRAL_FRACTION, Tally, fraction_of, usable};

const URBAN_RURAL_POINTS: u32 = 15;
const PACE_POINTS: u32 = 15;
const LANGUAGE_POINTS: u32 = 15;
const EXPAT_POINTS: u32 = 10;
const SOCIAL_POINTS: u32 = 10;
const LEANING_POINTS: u32 = 5;
const DINING_POINTS: u32 = 10;
const EVENTS_POINTS: u32 = 10;
const MUSEUMS_POINTS: u32 = 10;

/// Culture data is often patchy; a missing label still earns most of the
/// sub-factor.
const MISSING_FRACTION: f64 = 0.6;

/// Scores lifestyle and cultural fit.
///
/// Points: urban/rural 15, pace of life 15, language 15, expat community 10,
/// social atmosphere 10, traditional-progressive lean 5, dining 10, cultural
/// events 10, museums 10.
#[derive(Debug, Clone, Copy, Default)]
pub struct CultureScorer;

impl CategoryScorer for CultureScorer {
    fn category(&self) -> Category {
        Category::Culture
    }

    fn score(
        &self,
        preferences: &NormalizedPreferences,
        location: &Location,
        context: &ScoringContext,
    ) -> Result<CategoryScore, ScorerError> {
        let wanted = &preferences.culture;
        if !wanted.has_any() {
            return Ok(CategoryScore::open("Open to any culture"));
        }
        let rules = &context.adjacency;
        let matcher = GradualMatcher::with_credit(rules.credit.culture);
        let mut tally = Tally::new(Category::Culture);

        let labelled: [(&str, u32, &[String], Option<&str>, &str, &AdjacencyMap); 5] = [
            (
                "Living environment",
                URBAN_RURAL_POINTS,
                wanted.urban_rural.as_slice(),
                location.urban_rural_character.as_deref(),
                "urban_rural_character",
                &rules.urban_rural,
            ),
            (
                "Pace of life",
                PACE_POINTS,
                wanted.pace_of_life.as_slice(),
                location.pace_of_life.as_deref(),
                "pace_of_life",
                &rules.pace_of_life,
            ),
            (
                "Expat community",
                EXPAT_POINTS,
                wanted.expat_community.as_slice(),
                location.expat_community_size.as_deref(),
                "expat_community_size",
                &rules.expat_community,
            ),
            (
                "Social atmosphere",
                SOCIAL_POINTS,
                wanted.social_atmosphere.as_slice(),
                location.social_atmosphere.as_deref(),
                "social_atmosphere",
                &rules.social_atmosphere,
            ),
            (
                "Cultural lean",
                LEANING_POINTS,
                wanted.traditional_progressive.as_slice(),
                location.traditional_progressive_lean.as_deref(),
                "traditional_progressive_lean",
                &rules.traditional_progressive,
            ),
        ];
        for (name, max, preferred, label, field, map) in labelled {
            score_label(&mut tally, &matcher, name, max, preferred, label, field, map);
        }

        score_language(&mut tally, wanted, location);

        let dining = average_rating(&[location.restaurants_rating, location.nightlife_rating]);
        score_amenity(
            &mut tally,
            "Dining and nightlife",
            DINING_POINTS,
            wanted.dining_importance,
            dining,
            "restaurants_rating",
        );
        score_amenity(
            &mut tally,
            "Cultural events",
            EVENTS_POINTS,
            wanted.cultural_events_importance,
            location.cultural_events_rating.and_then(usable),
            "cultural_events_rating",
        );
        score_amenity(
            &mut tally,
            "Museums",
            MUSEUMS_POINTS,
            wanted.museums_importance,
            location.museums_rating.and_then(usable),
            "museums_rating",
        );
        Ok(tally.finish())
    }
}

#[expect(clippy::too_many_arguments, reason = "one row of the labelled sub-factor table")]
fn score_label(
    tally: &mut Tally,
    matcher: &GradualMatcher,
    name: &str,
    max: u32,
    preferred: &[String],
    label: Option<&str>,
    field: &str,
    map: &AdjacencyMap,
) {
    if preferred.is_empty() {
        tally.open(max, format!("Flexible on {}", name.to_lowercase()));
        return;
    }
    let Some(actual) = label else {
        tally.missing(max, MISSING_FRACTION, field);
        return;
    };
    let best = matcher.best_of(preferred, actual, max, map);
    let factor = match best.kind {
        MatchKind::Exact => format!("{name}: {}", actual.trim().to_lowercase()),
        MatchKind::Adjacent => format!(
            "{name}: {} is close to {}",
            actual.trim().to_lowercase(),
            best.preference.as_deref().unwrap_or_default()
        ),
        MatchKind::Mismatch | MatchKind::Empty => {
            format!("{name}: {} differs from preference", actual.trim().to_lowercase())
        }
    };
    tally.award(max, best.points, factor);
}

fn score_language(tally: &mut Tally, wanted: &CulturePreferences, location: &Location) {
    if wanted.language_comfort.is_empty() && wanted.languages_spoken.is_empty() {
        tally.open(LANGUAGE_POINTS, "Flexible on language");
        return;
    }
    let primary = location
        .primary_language
        .as_deref()
        .map(|language| language.trim().to_lowercase());
    if let Some(language) = primary.as_ref() {
        if wanted.languages_spoken.contains(language) {
            tally.award(
                LANGUAGE_POINTS,
                LANGUAGE_POINTS,
                format!("Already speaks {language}"),
            );
            return;
        }
    }
    let comfort = |value: &str| wanted.language_comfort.iter().any(|c| c == value);
    if comfort("english_only") {
        if primary.as_deref() == Some("english") {
            tally.award(LANGUAGE_POINTS, LANGUAGE_POINTS, "English is the primary language");
            return;
        }
        let proficiency = location
            .english_proficiency
            .as_deref()
            .map(|level| level.trim().to_lowercase());
        let points = match proficiency.as_deref() {
            Some("native") => Some(15),
            Some("high") => Some(11),
            Some("moderate") => Some(8),
            Some("low") => Some(4),
            Some(_) | None => None,
        };
        match points {
            Some(awarded) => tally.award(
                LANGUAGE_POINTS,
                awarded,
                format!(
                    "English proficiency: {}",
                    proficiency.as_deref().unwrap_or_default()
                ),
            ),
            None if primary.is_none() => {
                tally.missing(LANGUAGE_POINTS, MISSING_FRACTION, "english_proficiency");
            }
            None => tally.award(LANGUAGE_POINTS, 4, "Little English spoken"),
        }
        return;
    }
    let Some(language) = primary else {
        tally.missing(LANGUAGE_POINTS, MISSING_FRACTION, "primary_language");
        return;
    };
    if comfort("willing_to_learn") || comfort("comfortable") {
        tally.award(LANGUAGE_POINTS, 8, format!("Willing to learn {language}"));
    } else {
        tally.award(LANGUAGE_POINTS, 4, format!("Does not speak {language}"));
    }
}

/// Map a 0-10 rating to the 1-5 importance scale.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "rating is clamped to 1..=5 before the cast"
)]
fn rating_level(rating: f64) -> u8 {
    (rating / 2.0).ceil().clamp(1.0, 5.0) as u8
}

#[expect(clippy::float_arithmetic, reason = "mean of amenity ratings")]
fn average_rating(ratings: &[Option<f64>]) -> Option<f64> {
    let usable_ratings: Vec<f64> = ratings.iter().filter_map(|r| r.and_then(usable)).collect();
    if usable_ratings.is_empty() {
        return None;
    }
    let count = u32::try_from(usable_ratings.len()).unwrap_or(u32::MAX);
    Some(usable_ratings.iter().sum::<f64>() / f64::from(count))
}

/// Importance 1 (or unset) means the user is flexible. Otherwise the
/// location's level must reach the importance; each level of shortfall costs
/// points.
fn score_amenity(
    tally: &mut Tally,
    name: &str,
    max: u32,
    importance: Option<u8>,
    rating: Option<f64>,
    field: &str,
) {
    let Some(required) = importance.filter(|level| *level > 1) else {
        tally.open(max, format!("Flexible on {}", name.to_lowercase()));
        return;
    };
    let Some(found) = rating else {
        tally.missing(max, NEUTRAL_FRACTION, field);
        return;
    };
    let shortfall = required.saturating_sub(rating_level(found));
    let points = match shortfall {
        0 => max,
        1 => fraction_of(max, 0.7),
        2 => fraction_of(max, 0.4),
        _ => 0,
    };
    tally.award(max, points, format!("{name}: importance {required}, rated {found:.1}/10"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use roost_core::{Diagnostic, UserPreferences};
    use rstest::{fixture, rstest};

    use crate::PreferenceNormalizer;

    #[fixture]
    fn context() -> ScoringContext {
        ScoringContext::default()
    }

    fn normalize(context: &ScoringContext, preferences: &UserPreferences) -> NormalizedPreferences {
        PreferenceNormalizer::new(&context.taxonomy).normalize_preferences(preferences)
    }

    fn lisbon() -> Location {
        let mut location = Location::new("lisbon-pt");
        location.urban_rural_character = Some("urban".to_owned());
        location.pace_of_life = Some("moderate".to_owned());
        location.expat_community_size = Some("large".to_owned());
        location.social_atmosphere = Some("vibrant".to_owned());
        location.traditional_progressive_lean = Some("balanced".to_owned());
        location.primary_language = Some("Portuguese".to_owned());
        location.english_proficiency = Some("high".to_owned());
        location.restaurants_rating = Some(9.0);
        location.nightlife_rating = Some(8.0);
        location.cultural_events_rating = Some(8.0);
        location.museums_rating = Some(7.0);
        location
    }

    #[rstest]
    #[case(0.0, 1)]
    #[case(3.0, 2)]
    #[case(7.0, 4)]
    #[case(10.0, 5)]
    #[case(14.0, 5)]
    fn ratings_map_to_importance_levels(#[case] rating: f64, #[case] level: u8) {
        assert_eq!(rating_level(rating), level);
    }

    #[rstest]
    fn no_preferences_is_open(context: ScoringContext) {
        let score = CultureScorer
            .score(&normalize(&context, &UserPreferences::default()), &lisbon(), &context)
            .expect("culture scoring succeeds");
        assert_eq!(score.score, 100);
    }

    #[rstest]
    fn matching_lifestyle_scores_full(context: ScoringContext) {
        let mut raw = UserPreferences::default();
        raw.culture.urban_rural = vec!["urban".to_owned()];
        raw.culture.pace_of_life = vec!["moderate".to_owned()];
        raw.culture.languages_spoken = vec!["portuguese".to_owned()];
        raw.culture.dining_importance = Some(5);
        raw.culture.museums_importance = Some(4);
        let score = CultureScorer
            .score(&normalize(&context, &raw), &lisbon(), &context)
            .expect("culture scoring succeeds");
        assert_eq!(score.score, 100);
    }

    #[rstest]
    fn adjacent_pace_earns_half(context: ScoringContext) {
        let mut raw = UserPreferences::default();
        raw.culture.pace_of_life = vec!["relaxed".to_owned()];
        let score = CultureScorer
            .score(&normalize(&context, &raw), &lisbon(), &context)
            .expect("culture scoring succeeds");
        // 85 open + round(15 * 0.5).
        assert_eq!(score.score, 93);
    }

    #[rstest]
    #[case("english_only", 96)]
    #[case("willing_to_learn", 93)]
    fn language_comfort(context: ScoringContext, #[case] comfort: &str, #[case] expected: u8) {
        let mut raw = UserPreferences::default();
        raw.culture.language_comfort = vec![comfort.to_owned()];
        let score = CultureScorer
            .score(&normalize(&context, &raw), &lisbon(), &context)
            .expect("culture scoring succeeds");
        assert_eq!(score.score, expected);
    }

    #[rstest]
    fn missing_labels_earn_most_points_with_warnings(context: ScoringContext) {
        let mut raw = UserPreferences::default();
        raw.culture.urban_rural = vec!["rural".to_owned()];
        raw.culture.expat_community = vec!["small".to_owned()];
        let score = CultureScorer
            .score(&normalize(&context, &raw), &Location::new("blank"), &context)
            .expect("culture scoring succeeds");
        // 75 open + 9 + 6.
        assert_eq!(score.score, 90);
        assert_eq!(score.warnings.len(), 2);
    }

    #[rstest]
    fn amenity_shortfall_costs_points(context: ScoringContext) {
        let mut raw = UserPreferences::default();
        raw.culture.museums_importance = Some(5);
        let mut location = lisbon();
        location.museums_rating = Some(4.5);
        let score = CultureScorer
            .score(&normalize(&context, &raw), &location, &context)
            .expect("culture scoring succeeds");
        // Level 3 against importance 5: 90 open + 4.
        assert_eq!(score.score, 94);
    }

    #[rstest]
    fn flexible_importance_is_open(context: ScoringContext) {
        let mut raw = UserPreferences::default();
        raw.culture.museums_importance = Some(1);
        let score = CultureScorer
            .score(&normalize(&context, &raw), &Location::new("blank"), &context)
            .expect("culture scoring succeeds");
        assert_eq!(score.score, 100);
        assert!(score.warnings.is_empty());
    }

    #[rstest]
    fn invalid_rating_is_treated_as_missing(context: ScoringContext) {
        let mut raw = UserPreferences::default();
        raw.culture.cultural_events_importance = Some(3);
        let mut location = lisbon();
        location.cultural_events_rating = Some(f64::NAN);
        let score = CultureScorer
            .score(&normalize(&context, &raw), &location, &context)
            .expect("culture scoring succeeds");
        assert_eq!(score.score, 95);
        assert_eq!(
            score.warnings.first().map(|w| w.kind),
            Some(roost_core::DiagnosticKind::MissingLocationAttribute)
        );
    }

    #[rstest]
    fn diagnostics_name_the_category(context: ScoringContext) {
        let mut raw = UserPreferences::default();
        raw.culture.pace_of_life = vec!["fast".to_owned()];
        let score = CultureScorer
            .score(&normalize(&context, &raw), &Location::new("blank"), &context)
            .expect("culture scoring succeeds");
        let expected = Diagnostic::missing(Category::Culture, "pace_of_life");
        assert_eq!(score.warnings, vec![expected]);
    }
}
