//! Options compatibility: can the location support the user's activities?
//!
//! Each selected option counts with its tier weight (explicit 2, inferred
//! 1). The activity sub-factor is the weighted share of options available
//! at the location. A smaller travel sub-factor rewards airport access for
//! users who travel often.

use roost_core::{
    Category, CategoryScore, CategoryScorer, Location, NormalizedPreferences, ScorerError,
    ScoringContext,
};

use crate::availability::OptionAvailabilityInferencer;
use crate::tally::{NEUTRAL_FRACTION, Tally, fraction_of, usable};

const ACTIVITY_POINTS: u32 = 85;
const TRAVEL_POINTS: u32 = 15;
/// Missing options listed in the explanation.
const LISTED_GAPS: usize = 3;

/// Scores activities and travel access.
///
/// Points: weighted activity availability 85, airport access 15.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionsScorer;

impl CategoryScorer for OptionsScorer {
    fn category(&self) -> Category {
        Category::Options
    }

    fn score(
        &self,
        preferences: &NormalizedPreferences,
        location: &Location,
        context: &ScoringContext,
    ) -> Result<CategoryScore, ScorerError> {
        if !preferences.has_option_preferences() {
            return Ok(CategoryScore::open("Open to any activities"));
        }
        let mut tally = Tally::new(Category::Options);
        score_activities(&mut tally, preferences, location, context);
        score_travel(&mut tally, preferences.travel_frequency.as_deref(), location);
        Ok(tally.finish())
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "weighted match ratio of selected options"
)]
fn score_activities(
    tally: &mut Tally,
    preferences: &NormalizedPreferences,
    location: &Location,
    context: &ScoringContext,
) {
    let options = &preferences.options;
    if options.is_empty() {
        tally.open(ACTIVITY_POINTS, "Open to any activities");
        return;
    }
    let inferencer = OptionAvailabilityInferencer::new(&context.taxonomy);
    let mut matched_weight = 0_u32;
    let mut matched = 0_usize;
    let mut gaps = Vec::new();
    for (token, tier) in options.iter() {
        if inferencer.is_available(location, token) {
            matched_weight = matched_weight.saturating_add(tier.weight());
            matched += 1;
        } else {
            gaps.push(token);
        }
    }
    let total_weight = options.total_weight();
    let ratio = if total_weight == 0 {
        0.0
    } else {
        f64::from(matched_weight) / f64::from(total_weight)
    };
    let mut factor = format!(
        "Activities available: {matched} of {}",
        options.tokens.len()
    );
    if !gaps.is_empty() {
        let listed: Vec<&str> = gaps.iter().take(LISTED_GAPS).copied().collect();
        factor.push_str(&format!(" (missing {})", listed.join(", ")));
    }
    tally.award(ACTIVITY_POINTS, fraction_of(ACTIVITY_POINTS, ratio), factor);
}

fn score_travel(tally: &mut Tally, travel_frequency: Option<&str>, location: &Location) {
    let Some(frequency) = travel_frequency else {
        tally.open(TRAVEL_POINTS, "Flexible on airport access");
        return;
    };
    if frequency == "rare" {
        tally.open(TRAVEL_POINTS, "Rare travel, airport distance not needed");
        return;
    }
    let Some(distance) = location.airport_distance_km.and_then(usable) else {
        tally.missing(TRAVEL_POINTS, NEUTRAL_FRACTION, "airport_distance_km");
        return;
    };
    let fraction = match (frequency, distance) {
        ("frequent", d) if d <= 50.0 => 1.0,
        ("frequent", d) if d <= 100.0 => 0.67,
        ("frequent", _) => 0.0,
        (_, d) if d <= 100.0 => 1.0,
        _ => 0.5,
    };
    tally.award(
        TRAVEL_POINTS,
        fraction_of(TRAVEL_POINTS, fraction),
        format!("Airport {distance:.0} km away"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use roost_core::UserPreferences;
    use rstest::{fixture, rstest};

    use crate::PreferenceNormalizer;

    #[fixture]
    fn context() -> ScoringContext {
        ScoringContext::default()
    }

    fn with_activities(context: &ScoringContext, activities: &[&str]) -> NormalizedPreferences {
        let mut raw = UserPreferences::default();
        raw.options.activities = activities.iter().map(|a| (*a).to_owned()).collect();
        PreferenceNormalizer::new(&context.taxonomy).normalize_preferences(&raw)
    }

    fn golf_town() -> Location {
        let mut location = Location::new("golf-town");
        location.golf_courses_count = Some(4.0);
        location
    }

    #[rstest]
    fn no_preferences_is_open(context: ScoringContext) {
        let score = OptionsScorer
            .score(&with_activities(&context, &[]), &Location::new("x"), &context)
            .expect("options scoring succeeds");
        assert_eq!(score.score, 100);
    }

    #[rstest]
    fn universal_options_are_always_available(context: ScoringContext) {
        let score = OptionsScorer
            .score(&with_activities(&context, &["walking", "reading"]), &Location::new("x"), &context)
            .expect("options scoring succeeds");
        assert_eq!(score.score, 100);
    }

    #[rstest]
    fn explicit_choice_outscores_compound_when_available(context: ScoringContext) {
        let specific = OptionsScorer
            .score(&with_activities(&context, &["golf"]), &golf_town(), &context)
            .expect("options scoring succeeds");
        let generic = OptionsScorer
            .score(&with_activities(&context, &["golf_tennis"]), &golf_town(), &context)
            .expect("options scoring succeeds");
        assert_eq!(specific.score, 100);
        // One of four inferred options: round(85 / 4) + 15.
        assert_eq!(generic.score, 36);
        assert!(specific.score >= generic.score);
    }

    #[rstest]
    fn explicit_options_weigh_double(context: ScoringContext) {
        // golf explicit (2, available) and tennis, pickleball, badminton inferred (3, missing).
        let score = OptionsScorer
            .score(&with_activities(&context, &["golf_tennis", "golf"]), &golf_town(), &context)
            .expect("options scoring succeeds");
        // round(85 * 2 / 5) + 15.
        assert_eq!(score.score, 49);
    }

    #[rstest]
    #[case("frequent", Some(30.0), 100)]
    #[case("frequent", Some(80.0), 95)]
    #[case("frequent", Some(400.0), 85)]
    #[case("occasional", Some(400.0), 93)]
    #[case("rare", None, 100)]
    #[case("frequent", None, 93)]
    fn travel_access(
        context: ScoringContext,
        #[case] frequency: &str,
        #[case] airport_km: Option<f64>,
        #[case] expected: u8,
    ) {
        let mut raw = UserPreferences::default();
        raw.options.travel_frequency = Some(frequency.to_owned());
        let preferences = PreferenceNormalizer::new(&context.taxonomy).normalize_preferences(&raw);
        let mut location = Location::new("x");
        location.airport_distance_km = airport_km;
        let score = OptionsScorer.score(&preferences, &location, &context).expect("options scoring succeeds");
        assert_eq!(score.score, expected);
    }
}
