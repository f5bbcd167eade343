//! Derive which options a location can support.
//!
//! Availability is computed, not stored. Boolean [`FeatureFlag`]s are read
//! off a location's attributes and every option unlocked by a true flag is
//! available. The few exceptions that attributes cannot capture live in the
//! location's `option_overrides`. Universal options are available everywhere
//! and are never materialized per location.

use std::collections::BTreeSet;

use roost_core::{FeatureFlag, Location, OptionTaxonomy};
use serde::Serialize;

/// Elevation above which a location counts as mountainous, in metres.
const MOUNTAIN_ELEVATION_M: f64 = 800.0;
/// Distance within which a location counts as coastal, in kilometres.
const COASTAL_DISTANCE_KM: f64 = 1.0;
/// Winter average at or below which winters count as cold, in °C.
const COLD_WINTER_C: f64 = 5.0;
/// Summer average at or above which summers count as hot, in °C.
const HOT_SUMMER_C: f64 = 28.0;
/// Population at or above which a location offers urban amenities.
const URBAN_POPULATION: f64 = 100_000.0;

/// Read the true feature flags off a location's attributes.
///
/// Non-finite or missing values never set a flag.
#[must_use]
pub fn feature_flags(location: &Location) -> BTreeSet<FeatureFlag> {
    let features = &location.geographic_features;
    let mut flags: BTreeSet<FeatureFlag> = [
        FeatureFlag::Coastal,
        FeatureFlag::Island,
        FeatureFlag::Lake,
        FeatureFlag::River,
        FeatureFlag::Mountain,
        FeatureFlag::Valley,
        FeatureFlag::Desert,
        FeatureFlag::Forest,
        FeatureFlag::Plains,
    ]
    .into_iter()
    .filter(|flag| Location::has_tag(features, flag.as_str()))
    .collect();

    let derived = [
        (
            FeatureFlag::Coastal,
            location
                .distance_to_ocean_km
                .is_some_and(|km| (0.0..COASTAL_DISTANCE_KM).contains(&km)),
        ),
        (
            FeatureFlag::Mountain,
            location
                .elevation_meters
                .is_some_and(|m| m > MOUNTAIN_ELEVATION_M),
        ),
        (
            FeatureFlag::Forest,
            Location::has_tag(&location.vegetation_types, "forest"),
        ),
        (
            FeatureFlag::ColdClimate,
            label_is(location.winter_climate.as_deref(), "cold")
                || location.avg_temp_winter.is_some_and(|t| t <= COLD_WINTER_C),
        ),
        (
            FeatureFlag::HotClimate,
            label_is(location.summer_climate.as_deref(), "hot")
                || location.avg_temp_summer.is_some_and(|t| t >= HOT_SUMMER_C),
        ),
        (
            FeatureFlag::Urban,
            label_is(location.urban_rural_character.as_deref(), "urban")
                || location.population.is_some_and(|p| p >= URBAN_POPULATION),
        ),
        (FeatureFlag::GolfCourses, positive(location.golf_courses_count)),
        (FeatureFlag::TennisCourts, positive(location.tennis_courts_count)),
        (FeatureFlag::SkiResorts, positive(location.ski_resorts_within_100km)),
        (FeatureFlag::Marina, positive(location.marinas_count)),
        (FeatureFlag::HikingTrails, positive(location.hiking_trails_km)),
    ];
    flags.extend(
        derived
            .into_iter()
            .filter_map(|(flag, set)| set.then_some(flag)),
    );
    flags
}

fn label_is(label: Option<&str>, expected: &str) -> bool {
    label.is_some_and(|value| value.trim().eq_ignore_ascii_case(expected))
}

fn positive(value: Option<f64>) -> bool {
    value.is_some_and(|count| count > 0.0)
}

/// Storage comparison between materializing every location-option pair and
/// deriving availability with sparse overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SparsityReport {
    /// Locations inspected.
    pub locations: usize,
    /// Location-gated (non-universal) options in the taxonomy.
    pub gated_options: usize,
    /// Pairs a fully materialized table would hold.
    pub possible_pairs: usize,
    /// Pairs derived from feature flags.
    pub derived_pairs: usize,
    /// Override rows actually stored.
    pub stored_overrides: usize,
}

impl SparsityReport {
    /// Fraction of `possible_pairs` that must be stored as overrides.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "report ratios are approximate by nature"
    )]
    pub fn stored_fraction(&self) -> f64 {
        if self.possible_pairs == 0 {
            return 0.0;
        }
        self.stored_overrides as f64 / self.possible_pairs as f64
    }
}

/// Answers availability questions for locations against a taxonomy.
///
/// # Examples
/// ```
/// use roost_core::{Location, OptionTaxonomy};
/// use roost_scorer::OptionAvailabilityInferencer;
///
/// let taxonomy = OptionTaxonomy::builtin();
/// let inferencer = OptionAvailabilityInferencer::new(&taxonomy);
/// let mut town = Location::new("tavira-pt");
/// town.geographic_features = vec!["coastal".to_owned()];
///
/// assert!(inferencer.available_options(&town).contains("surfing"));
/// assert!(inferencer.is_available(&town, "reading"));
/// assert!(!inferencer.is_available(&town, "skiing"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OptionAvailabilityInferencer<'a> {
    taxonomy: &'a OptionTaxonomy,
}

impl<'a> OptionAvailabilityInferencer<'a> {
    /// Create an inferencer for `taxonomy`.
    #[must_use]
    pub const fn new(taxonomy: &'a OptionTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Location-specific options: those unlocked by the location's flags
    /// plus its overrides. Universal options are excluded.
    #[must_use]
    pub fn available_options(&self, location: &Location) -> BTreeSet<String> {
        let mut options = self.derived_options(location);
        options.extend(self.overrides(location));
        options
    }

    /// Every option available at `location`, universal ones included.
    #[must_use]
    pub fn all_available(&self, location: &Location) -> BTreeSet<String> {
        let mut options = self.available_options(location);
        options.extend(self.taxonomy.universal_options().iter().cloned());
        options
    }

    /// Whether `option` is available at `location`.
    ///
    /// True when the option is universal, when one of its unlocking flags is
    /// set, or when the location lists it as an override.
    #[must_use]
    pub fn is_available(&self, location: &Location, option: &str) -> bool {
        let wanted = option.trim().to_lowercase();
        if self.taxonomy.is_universal(&wanted) {
            return true;
        }
        let unlocked = self.taxonomy.option(&wanted).is_some_and(|definition| {
            let flags = feature_flags(location);
            definition
                .unlocking_flags
                .iter()
                .any(|flag| flags.contains(flag))
        });
        unlocked
            || location
                .option_overrides
                .iter()
                .any(|entry| entry.trim().eq_ignore_ascii_case(&wanted))
    }

    /// Summarize how much storage sparse derivation saves over `locations`.
    #[must_use]
    pub fn sparsity_report(&self, locations: &[Location]) -> SparsityReport {
        let gated_options = self.taxonomy.len() - self.taxonomy.universal_options().len();
        let mut report = SparsityReport {
            locations: locations.len(),
            gated_options,
            possible_pairs: locations.len().saturating_mul(gated_options),
            ..SparsityReport::default()
        };
        for location in locations {
            let derived = self.derived_options(location);
            report.derived_pairs += derived.len();
            report.stored_overrides += self
                .overrides(location)
                .filter(|option| !derived.contains(option))
                .count();
        }
        report
    }

    fn derived_options(&self, location: &Location) -> BTreeSet<String> {
        feature_flags(location)
            .into_iter()
            .flat_map(|flag| self.taxonomy.options_for_flag(flag).iter().cloned())
            .collect()
    }

    fn overrides<'l>(&self, location: &'l Location) -> impl Iterator<Item = String> + use<'a, 'l> {
        let taxonomy = self.taxonomy;
        location
            .option_overrides
            .iter()
            .map(|entry| entry.trim().to_lowercase())
            .filter(move |entry| !entry.is_empty() && !taxonomy.is_universal(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn taxonomy() -> OptionTaxonomy {
        OptionTaxonomy::builtin()
    }

    fn coastal() -> Location {
        let mut location = Location::new("coastal");
        location.geographic_features = vec!["Coastal".to_owned()];
        location
    }

    #[rstest]
    fn coastal_location_offers_surfing_without_overrides(taxonomy: OptionTaxonomy) {
        let inferencer = OptionAvailabilityInferencer::new(&taxonomy);
        let available = inferencer.available_options(&coastal());
        assert!(available.contains("surfing"));
        assert!(!available.contains("walking"));
    }

    #[rstest]
    fn flagless_location_offers_only_universal_options(taxonomy: OptionTaxonomy) {
        let inferencer = OptionAvailabilityInferencer::new(&taxonomy);
        let bare = Location::new("bare");
        assert!(inferencer.available_options(&bare).is_empty());
        assert_eq!(
            &inferencer.all_available(&bare),
            taxonomy.universal_options()
        );
    }

    #[rstest]
    fn overrides_add_options(taxonomy: OptionTaxonomy) {
        let inferencer = OptionAvailabilityInferencer::new(&taxonomy);
        let mut location = Location::new("indoor-slope");
        location.option_overrides = vec!["Skiing".to_owned(), "reading".to_owned()];
        let available = inferencer.available_options(&location);
        assert_eq!(available.into_iter().collect::<Vec<_>>(), vec!["skiing"]);
        assert!(inferencer.is_available(&location, "skiing"));
    }

    #[rstest]
    #[case::ocean_distance(|l: &mut Location| l.distance_to_ocean_km = Some(0.0), FeatureFlag::Coastal)]
    #[case::elevation(|l: &mut Location| l.elevation_meters = Some(1200.0), FeatureFlag::Mountain)]
    #[case::cold(|l: &mut Location| l.avg_temp_winter = Some(-3.0), FeatureFlag::ColdClimate)]
    #[case::hot(|l: &mut Location| l.summer_climate = Some("Hot".to_owned()), FeatureFlag::HotClimate)]
    #[case::city(|l: &mut Location| l.population = Some(250_000.0), FeatureFlag::Urban)]
    #[case::golf(|l: &mut Location| l.golf_courses_count = Some(3.0), FeatureFlag::GolfCourses)]
    #[case::forest(|l: &mut Location| l.vegetation_types = vec!["forest".to_owned()], FeatureFlag::Forest)]
    fn derives_flags_from_attributes(#[case] apply: fn(&mut Location), #[case] flag: FeatureFlag) {
        let mut location = Location::new("x");
        apply(&mut location);
        assert!(feature_flags(&location).contains(&flag));
    }

    #[rstest]
    fn nan_attributes_set_no_flags() {
        let mut location = Location::new("x");
        location.elevation_meters = Some(f64::NAN);
        location.golf_courses_count = Some(f64::NAN);
        location.avg_temp_winter = Some(f64::NAN);
        assert!(feature_flags(&location).is_empty());
    }

    #[rstest]
    fn adding_flags_never_removes_options(taxonomy: OptionTaxonomy) {
        let inferencer = OptionAvailabilityInferencer::new(&taxonomy);
        let before = inferencer.available_options(&coastal());
        let mut richer = coastal();
        richer.geographic_features.push("mountain".to_owned());
        let after = inferencer.available_options(&richer);
        assert!(before.is_subset(&after));
    }

    #[rstest]
    fn sparsity_report_counts_only_extra_overrides(taxonomy: OptionTaxonomy) {
        let inferencer = OptionAvailabilityInferencer::new(&taxonomy);
        let mut location = coastal();
        location.option_overrides = vec!["surfing".to_owned(), "skiing".to_owned()];
        let report = inferencer.sparsity_report(&[location, Location::new("bare")]);
        assert_eq!(report.locations, 2);
        assert_eq!(report.stored_overrides, 1);
        assert_eq!(report.possible_pairs, 2 * report.gated_options);
        assert!(report.stored_fraction() < 0.1);
    }
}
