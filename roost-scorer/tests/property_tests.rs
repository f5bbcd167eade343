//! Property-based tests for score ranges and normalization.

use proptest::prelude::*;
use roost_core::{Category, Location, OptionTaxonomy, QualityLevel, UserPreferences};
use roost_scorer::{PreferenceNormalizer, ScoreAggregator};

const LABELS: &[&str] = &[
    "dry", "balanced", "humid", "hot", "warm", "mild", "cool", "cold", "urban", "rural",
    "suburban", "relaxed", "moderate", "fast", "coastal", "mountain", "forest", "",
];

const OPTIONS: &[&str] = &[
    "golf", "golf_tennis", "surfing", "skiing", "walking_cycling", "water_sports", "museums",
    "reading", "unheard_of_hobby", "Golf ", "",
];

fn label() -> impl Strategy<Value = String> {
    prop::sample::select(LABELS).prop_map(str::to_owned)
}

fn labels() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(label(), 0..3)
}

fn options() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(OPTIONS).prop_map(str::to_owned), 0..5)
}

fn figure() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(prop_oneof![
        any::<f64>(),
        -100.0_f64..100.0,
        0.0_f64..10_000.0,
        Just(0.0),
        Just(f64::MAX),
    ])
}

fn quality() -> impl Strategy<Value = Option<QualityLevel>> {
    prop::option::of(prop_oneof![
        Just(QualityLevel::Basic),
        Just(QualityLevel::Functional),
        Just(QualityLevel::Good),
    ])
}

prop_compose! {
    fn preferences()(
        countries in labels(),
        features in labels(),
        summer in labels(),
        humidity in labels(),
        pace in labels(),
        activities in options(),
        healthcare in quality(),
        safety in quality(),
        budget in figure(),
        rent in figure(),
        tax_sensitive in any::<bool>(),
    ) -> UserPreferences {
        let mut raw = UserPreferences::default();
        raw.region.countries = countries;
        raw.region.geographic_features = features;
        raw.climate.summer = summer;
        raw.climate.humidity = humidity;
        raw.culture.pace_of_life = pace;
        raw.options.activities = activities;
        raw.administration.healthcare = healthcare;
        raw.administration.safety = safety;
        raw.budget.total_monthly_budget = budget;
        raw.budget.max_monthly_rent = rent;
        raw.budget.income_tax_sensitive = tax_sensitive;
        raw
    }
}

prop_compose! {
    fn location()(
        country in prop::option::of(label()),
        features in labels(),
        humidity in prop::option::of(label()),
        pace in prop::option::of(label()),
        summer_temp in figure(),
        distance in figure(),
        healthcare in figure(),
        safety in figure(),
        cost in figure(),
        rent in figure(),
        income_tax in figure(),
        airport in figure(),
    ) -> Location {
        let mut location = Location::new("generated");
        location.country = country;
        location.geographic_features = features;
        location.humidity_level = humidity;
        location.pace_of_life = pace;
        location.avg_temp_summer = summer_temp;
        location.distance_to_ocean_km = distance;
        location.healthcare_score = healthcare;
        location.safety_score = safety;
        location.cost_of_living_usd = cost;
        location.typical_rent_1bed = rent;
        location.income_tax_rate_pct = income_tax;
        location.airport_distance_km = airport;
        location
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn scores_stay_within_bounds(raw in preferences(), candidate in location()) {
        let aggregator = ScoreAggregator::default();
        let normalized = aggregator.normalize(&raw);
        let result = aggregator.score(&normalized, &candidate);
        prop_assert!(result.match_score <= 100);
        for category in Category::ALL {
            prop_assert!(result.category_scores.get(category) <= 100);
        }
        prop_assert!(!result.warnings.iter().any(|w| w.contains("scorer failure")));
    }

    #[test]
    fn open_preferences_earn_full_points_everywhere(candidate in location()) {
        let aggregator = ScoreAggregator::default();
        let normalized = aggregator.normalize(&UserPreferences::default());
        let result = aggregator.score(&normalized, &candidate);
        for category in Category::ALL {
            prop_assert_eq!(result.category_scores.get(category), 100);
        }
    }

    #[test]
    fn normalization_is_idempotent(raw in options()) {
        let taxonomy = OptionTaxonomy::builtin();
        let normalizer = PreferenceNormalizer::new(&taxonomy);
        let once = normalizer.normalize(&raw);
        let twice = normalizer.normalize(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn scoring_is_deterministic(raw in preferences(), candidate in location()) {
        let aggregator = ScoreAggregator::default();
        let normalized = aggregator.normalize(&raw);
        prop_assert_eq!(
            aggregator.score(&normalized, &candidate),
            aggregator.score(&normalized, &candidate)
        );
    }
}
