//! Region compatibility: country, landscape and vegetation.

use roost_core::{
    AdjacencyMap, Category, CategoryScore, CategoryScorer, Location, NormalizedPreferences,
    RegionPreferences, ScorerError, ScoringContext,
};

use crate::gradual::{GradualMatcher, MatchKind};
use crate::tally::{NEUTRAL_FRACTION, Tally};

const COUNTRY_POINTS: u32 = 40;
const REGION_ONLY_POINTS: u32 = 30;
const GEOGRAPHY_POINTS: u32 = 30;
const VEGETATION_POINTS: u32 = 20;

/// Words in a region tag that imply the location is on a coast.
const COASTAL_MARKERS: [&str; 8] = [
    "gulf",
    "ocean",
    "coast",
    "beach",
    "sea",
    "atlantic",
    "pacific",
    "mediterranean",
];

/// Scores where a location is against where the user wants to be.
///
/// Points: country or state match 40 (region-tag match 30), geographic
/// features 30, vegetation 20; normalized over 90.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionScorer;

impl CategoryScorer for RegionScorer {
    fn category(&self) -> Category {
        Category::Region
    }

    fn score(
        &self,
        preferences: &NormalizedPreferences,
        location: &Location,
        context: &ScoringContext,
    ) -> Result<CategoryScore, ScorerError> {
        let wanted = &preferences.region;
        if !wanted.has_any() {
            return Ok(CategoryScore::open("Open to any location"));
        }
        let matcher = GradualMatcher::with_credit(context.adjacency.credit.region);
        let mut tally = Tally::new(Category::Region);
        score_place(&mut tally, wanted, location);
        score_geography(
            &mut tally,
            &matcher,
            &wanted.geographic_features,
            location,
            &context.adjacency.geographic_features,
        );
        score_vegetation(
            &mut tally,
            &matcher,
            &wanted.vegetation_types,
            location,
            &context.adjacency.vegetation,
        );
        Ok(tally.finish())
    }
}

fn score_place(tally: &mut Tally, wanted: &RegionPreferences, location: &Location) {
    if wanted.countries.is_empty() && wanted.regions.is_empty() {
        tally.open(COUNTRY_POINTS, "Open to any country/region");
        return;
    }
    let country = location.country.as_deref().map(|c| c.trim().to_lowercase());
    let subdivision = location.region.as_deref().map(|r| r.trim().to_lowercase());
    if let Some(found) = country.as_ref().filter(|c| wanted.countries.contains(c)) {
        tally.award(
            COUNTRY_POINTS,
            COUNTRY_POINTS,
            format!("Country match: {}", display(location.country.as_deref(), found)),
        );
        return;
    }
    if let Some(found) = subdivision.as_ref().filter(|s| wanted.countries.contains(s)) {
        tally.award(
            COUNTRY_POINTS,
            COUNTRY_POINTS,
            format!("State match: {}", display(location.region.as_deref(), found)),
        );
        return;
    }
    let tagged = location
        .regions
        .iter()
        .chain(location.region.iter())
        .find(|tag| wanted.regions.contains(&tag.trim().to_lowercase()));
    if let Some(tag) = tagged {
        tally.award(
            COUNTRY_POINTS,
            REGION_ONLY_POINTS,
            format!("Region match: {}", tag.trim()),
        );
        return;
    }
    if country.is_none() && location.regions.is_empty() && subdivision.is_none() {
        tally.missing(COUNTRY_POINTS, NEUTRAL_FRACTION, "country");
        return;
    }
    tally.award(COUNTRY_POINTS, 0, "Outside preferred countries and regions");
}

fn score_geography(
    tally: &mut Tally,
    matcher: &GradualMatcher,
    wanted: &[String],
    location: &Location,
    map: &AdjacencyMap,
) {
    if wanted.is_empty() {
        tally.open(GEOGRAPHY_POINTS, "Open to any geography");
        return;
    }
    let coastal_by_region = wanted.iter().any(|w| w == "coastal")
        && location.regions.iter().any(|tag| {
            let lowered = tag.to_lowercase();
            COASTAL_MARKERS.iter().any(|marker| lowered.contains(marker))
        });
    if location.geographic_features.is_empty() && !coastal_by_region {
        tally.missing(GEOGRAPHY_POINTS, NEUTRAL_FRACTION, "geographic_features");
        return;
    }
    let best = best_set_match(matcher, wanted, &location.geographic_features, GEOGRAPHY_POINTS, map);
    match best {
        Some((MatchKind::Exact, points, feature)) => {
            tally.award(GEOGRAPHY_POINTS, points, format!("Geographic feature: {feature}"));
        }
        _ if coastal_by_region => {
            tally.award(GEOGRAPHY_POINTS, GEOGRAPHY_POINTS, "Coastal region");
        }
        Some((MatchKind::Adjacent, points, feature)) => {
            tally.award(GEOGRAPHY_POINTS, points, format!("Similar landscape: {feature}"));
        }
        _ => tally.award(GEOGRAPHY_POINTS, 0, "Landscape differs from preference"),
    }
}

fn score_vegetation(
    tally: &mut Tally,
    matcher: &GradualMatcher,
    wanted: &[String],
    location: &Location,
    map: &AdjacencyMap,
) {
    if wanted.is_empty() {
        tally.open(VEGETATION_POINTS, "Open to any vegetation");
        return;
    }
    if location.vegetation_types.is_empty() {
        tally.missing(VEGETATION_POINTS, NEUTRAL_FRACTION, "vegetation_types");
        return;
    }
    match best_set_match(matcher, wanted, &location.vegetation_types, VEGETATION_POINTS, map) {
        Some((MatchKind::Exact, points, found)) => {
            tally.award(VEGETATION_POINTS, points, format!("Vegetation: {found}"));
        }
        Some((MatchKind::Adjacent, points, found)) => {
            tally.award(VEGETATION_POINTS, points, format!("Similar vegetation: {found}"));
        }
        _ => tally.award(VEGETATION_POINTS, 0, "Vegetation differs from preference"),
    }
}

/// Best match of any wanted value against any of the location's values.
fn best_set_match(
    matcher: &GradualMatcher,
    wanted: &[String],
    actual: &[String],
    max: u32,
    map: &AdjacencyMap,
) -> Option<(MatchKind, u32, String)> {
    actual
        .iter()
        .map(|value| (matcher.best_of(wanted, value, max, map), value))
        .filter(|(best, _)| best.kind != MatchKind::Empty)
        .max_by_key(|(best, _)| best.points)
        .map(|(best, value)| (best.kind, best.points, value.trim().to_lowercase()))
}

fn display<'a>(original: Option<&'a str>, fallback: &'a str) -> &'a str {
    original.map_or(fallback, str::trim)
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

    fn normalize(context: &ScoringContext, preferences: &UserPreferences) -> NormalizedPreferences {
        PreferenceNormalizer::new(&context.taxonomy).normalize_preferences(preferences)
    }

    fn faro() -> Location {
        let mut location = Location::new("faro-pt");
        location.country = Some("Portugal".to_owned());
        location.regions = vec!["Southern Europe".to_owned(), "Atlantic Coast".to_owned()];
        location.geographic_features = vec!["coastal".to_owned()];
        location.vegetation_types = vec!["mediterranean".to_owned()];
        location
    }

    #[rstest]
    fn no_preferences_is_open(context: ScoringContext) {
        let preferences = normalize(&context, &UserPreferences::default());
        let score = RegionScorer.score(&preferences, &faro(), &context).expect("region scoring succeeds");
        assert_eq!(score.score, 100);
        assert_eq!(score.factors[0].factor, "Open to any location");
    }

    #[rstest]
    fn full_match_scores_one_hundred(context: ScoringContext) {
        let mut raw = UserPreferences::default();
        raw.region.countries = vec!["Portugal".to_owned()];
        raw.region.geographic_features = vec!["Coastal".to_owned()];
        raw.region.vegetation_types = vec!["mediterranean".to_owned()];
        let score = RegionScorer
            .score(&normalize(&context, &raw), &faro(), &context)
            .expect("region scoring succeeds");
        assert_eq!(score.score, 100);
        assert!(score.warnings.is_empty());
    }

    #[rstest]
    fn region_tag_match_earns_partial_credit(context: ScoringContext) {
        let mut raw = UserPreferences::default();
        raw.region.countries = vec!["Spain".to_owned()];
        raw.region.regions = vec!["southern europe".to_owned()];
        let score = RegionScorer
            .score(&normalize(&context, &raw), &faro(), &context)
            .expect("region scoring succeeds");
        // 30 + 30 + 20 out of 90.
        assert_eq!(score.score, 89);
    }

    #[rstest]
    fn us_state_counts_as_country_match(context: ScoringContext) {
        let mut raw = UserPreferences::default();
        raw.region.countries = vec!["Florida".to_owned()];
        let mut location = Location::new("naples-fl");
        location.country = Some("United States".to_owned());
        location.region = Some("Florida".to_owned());
        let score = RegionScorer
            .score(&normalize(&context, &raw), &location, &context)
            .expect("region scoring succeeds");
        assert_eq!(score.score, 100);
        assert!(score.factors[0].factor.starts_with("State match"));
    }

    #[rstest]
    fn adjacent_features_earn_half(context: ScoringContext) {
        let mut raw = UserPreferences::default();
        raw.region.geographic_features = vec!["lake".to_owned()];
        let mut location = faro();
        location.regions.clear();
        let score = RegionScorer
            .score(&normalize(&context, &raw), &location, &context)
            .expect("region scoring succeeds");
        // 40 open + 15 adjacent + 20 open out of 90.
        assert_eq!(score.score, 83);
    }

    #[rstest]
    fn coastal_region_tag_stands_in_for_missing_features(context: ScoringContext) {
        let mut raw = UserPreferences::default();
        raw.region.geographic_features = vec!["coastal".to_owned()];
        let mut location = faro();
        location.geographic_features.clear();
        let score = RegionScorer
            .score(&normalize(&context, &raw), &location, &context)
            .expect("region scoring succeeds");
        assert_eq!(score.score, 100);
    }

    #[rstest]
    fn missing_location_data_is_neutral_with_warnings(context: ScoringContext) {
        let mut raw = UserPreferences::default();
        raw.region.countries = vec!["Portugal".to_owned()];
        raw.region.vegetation_types = vec!["tropical".to_owned()];
        let score = RegionScorer
            .score(&normalize(&context, &raw), &Location::new("blank"), &context)
            .expect("region scoring succeeds");
        // 20 + 30 open + 10 out of 90.
        assert_eq!(score.score, 67);
        assert_eq!(score.warnings.len(), 2);
    }

    #[rstest]
    fn padded_country_still_matches(context: ScoringContext) {
        let mut raw = UserPreferences::default();
        raw.region.countries = vec!["Spain".to_owned()];
        let mut location = Location::new("valencia-es");
        location.country = Some(" Spain".to_owned());
        location.region = Some("Valencia ".to_owned());
        let score = RegionScorer
            .score(&normalize(&context, &raw), &location, &context)
            .expect("region scoring succeeds");
        assert_eq!(score.score, 100);
        assert_eq!(score.factors[0].factor, "Country match: Spain");
    }

    #[rstest]
    fn unset_sub_factors_are_reported_at_full_points(context: ScoringContext) {
        let mut raw = UserPreferences::default();
        raw.region.vegetation_types = vec!["mediterranean".to_owned()];
        let score = RegionScorer
            .score(&normalize(&context, &raw), &faro(), &context)
            .expect("region scoring succeeds");
        let factors: Vec<(&str, i32)> = score
            .factors
            .iter()
            .map(|f| (f.factor.as_str(), f.score))
            .collect();
        assert_eq!(
            factors,
            [
                ("Open to any country/region", 40),
                ("Open to any geography", 30),
                ("Vegetation: mediterranean", 20),
            ]
        );
    }
}
