//! Candidate locations and their attributes.
//!
//! Attribute names mirror the preference schema. Every attribute is optional;
//! scorers treat missing values as unknown, never as zero. Numeric attributes
//! deserialize leniently from numbers, numeric strings or null.

use serde::{Deserialize, Serialize};

use crate::lenient;

/// A town or city that can be scored against user preferences.
///
/// # Examples
/// ```
/// use roost_core::Location;
///
/// let location: Location = serde_json::from_str(
///     r#"{ "id": "lagos-pt", "country": "Portugal", "cost_of_living_usd": "1850" }"#,
/// )?;
/// assert_eq!(location.cost_of_living_usd, Some(1850.0));
/// assert!(location.geographic_features.is_empty());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    #[serde(deserialize_with = "lenient::text")]
    pub name: Option<String>,
    /// Country name.
    #[serde(deserialize_with = "lenient::text")]
    pub country: Option<String>,
    /// State, province or other first-level subdivision.
    #[serde(deserialize_with = "lenient::text")]
    pub region: Option<String>,
    /// Broad region tags such as "Mediterranean" or "Gulf Coast".
    #[serde(deserialize_with = "lenient::list")]
    pub regions: Vec<String>,
    /// Landscape features such as "coastal" or "mountain".
    #[serde(deserialize_with = "lenient::list")]
    pub geographic_features: Vec<String>,
    /// Vegetation types such as "mediterranean" or "forest".
    #[serde(deserialize_with = "lenient::list")]
    pub vegetation_types: Vec<String>,
    /// Resident population.
    #[serde(deserialize_with = "lenient::number")]
    pub population: Option<f64>,
    /// Elevation above sea level in metres.
    #[serde(deserialize_with = "lenient::number")]
    pub elevation_meters: Option<f64>,
    /// Distance to the nearest ocean in kilometres.
    #[serde(deserialize_with = "lenient::number")]
    pub distance_to_ocean_km: Option<f64>,

    /// Average summer temperature in °C.
    #[serde(deserialize_with = "lenient::number")]
    pub avg_temp_summer: Option<f64>,
    /// Average winter temperature in °C.
    #[serde(deserialize_with = "lenient::number")]
    pub avg_temp_winter: Option<f64>,
    /// Summer band: `mild`, `warm` or `hot`.
    #[serde(deserialize_with = "lenient::text")]
    pub summer_climate: Option<String>,
    /// Winter band: `cold`, `cool` or `mild`.
    #[serde(deserialize_with = "lenient::text")]
    pub winter_climate: Option<String>,
    /// Humidity band.
    #[serde(deserialize_with = "lenient::text")]
    pub humidity_level: Option<String>,
    /// Sunshine band.
    #[serde(deserialize_with = "lenient::text")]
    pub sunshine_level: Option<String>,
    /// Precipitation band.
    #[serde(deserialize_with = "lenient::text")]
    pub precipitation_level: Option<String>,

    /// `urban`, `suburban` or `rural`.
    #[serde(deserialize_with = "lenient::text")]
    pub urban_rural_character: Option<String>,
    /// `fast`, `moderate` or `relaxed`.
    #[serde(deserialize_with = "lenient::text")]
    pub pace_of_life: Option<String>,
    /// `small`, `moderate` or `large`.
    #[serde(deserialize_with = "lenient::text")]
    pub expat_community_size: Option<String>,
    /// `quiet`, `friendly` or `vibrant`.
    #[serde(deserialize_with = "lenient::text")]
    pub social_atmosphere: Option<String>,
    /// `traditional`, `balanced` or `progressive`.
    #[serde(deserialize_with = "lenient::text")]
    pub traditional_progressive_lean: Option<String>,
    /// Main local language.
    #[serde(deserialize_with = "lenient::text")]
    pub primary_language: Option<String>,
    /// How widely English is spoken: `native`, `high`, `moderate` or `low`.
    #[serde(deserialize_with = "lenient::text")]
    pub english_proficiency: Option<String>,
    /// Restaurant scene rating, 0-10.
    #[serde(deserialize_with = "lenient::number")]
    pub restaurants_rating: Option<f64>,
    /// Nightlife rating, 0-10.
    #[serde(deserialize_with = "lenient::number")]
    pub nightlife_rating: Option<f64>,
    /// Cultural events rating, 0-10.
    #[serde(deserialize_with = "lenient::number")]
    pub cultural_events_rating: Option<f64>,
    /// Museums rating, 0-10.
    #[serde(deserialize_with = "lenient::number")]
    pub museums_rating: Option<f64>,

    /// Healthcare quality, 0-10.
    #[serde(deserialize_with = "lenient::number")]
    pub healthcare_score: Option<f64>,
    /// Safety, 0-10.
    #[serde(deserialize_with = "lenient::number")]
    pub safety_score: Option<f64>,
    /// Government efficiency, 0-100.
    #[serde(deserialize_with = "lenient::number")]
    pub government_efficiency_rating: Option<f64>,
    /// Political stability, 0-100.
    #[serde(deserialize_with = "lenient::number")]
    pub political_stability_rating: Option<f64>,
    /// Air quality index; lower is cleaner.
    #[serde(deserialize_with = "lenient::number")]
    pub air_quality_index: Option<f64>,
    /// Citizenships granted a visa on arrival.
    #[serde(deserialize_with = "lenient::list")]
    pub visa_on_arrival_countries: Vec<String>,
    /// Whether a retirement visa programme exists.
    #[serde(deserialize_with = "lenient::flag")]
    pub retirement_visa_available: Option<bool>,

    /// Monthly cost of living for one person, USD.
    #[serde(deserialize_with = "lenient::number")]
    pub cost_of_living_usd: Option<f64>,
    /// Typical one-bedroom rent, USD per month.
    #[serde(deserialize_with = "lenient::number")]
    pub typical_rent_1bed: Option<f64>,
    /// Typical monthly healthcare cost, USD.
    #[serde(deserialize_with = "lenient::number")]
    pub healthcare_cost_monthly: Option<f64>,
    /// Top income tax rate, percent.
    #[serde(deserialize_with = "lenient::number")]
    pub income_tax_rate_pct: Option<f64>,
    /// Property tax rate, percent.
    #[serde(deserialize_with = "lenient::number")]
    pub property_tax_rate_pct: Option<f64>,
    /// Sales tax or VAT rate, percent.
    #[serde(deserialize_with = "lenient::number")]
    pub sales_tax_rate_pct: Option<f64>,
    /// Whether the jurisdiction is a tax haven.
    #[serde(deserialize_with = "lenient::flag")]
    pub tax_haven_status: Option<bool>,
    /// Whether foreign income is taxed locally.
    #[serde(deserialize_with = "lenient::flag")]
    pub foreign_income_taxed: Option<bool>,

    /// Distance to the nearest international airport in kilometres.
    #[serde(deserialize_with = "lenient::number")]
    pub airport_distance_km: Option<f64>,
    /// Number of golf courses.
    #[serde(deserialize_with = "lenient::number")]
    pub golf_courses_count: Option<f64>,
    /// Number of public tennis courts.
    #[serde(deserialize_with = "lenient::number")]
    pub tennis_courts_count: Option<f64>,
    /// Ski resorts within 100 km.
    #[serde(deserialize_with = "lenient::number")]
    pub ski_resorts_within_100km: Option<f64>,
    /// Number of marinas.
    #[serde(deserialize_with = "lenient::number")]
    pub marinas_count: Option<f64>,
    /// Kilometres of maintained hiking trails.
    #[serde(deserialize_with = "lenient::number")]
    pub hiking_trails_km: Option<f64>,

    /// Options explicitly available here even though no attribute implies
    /// them.
    #[serde(deserialize_with = "lenient::list")]
    pub option_overrides: Vec<String>,
}

impl Location {
    /// Create a location with only an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Display label: the name when present, the identifier otherwise.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Whether any of `needles` appears in `haystack`, ignoring case.
    #[must_use]
    pub fn has_tag(haystack: &[String], needle: &str) -> bool {
        haystack
            .iter()
            .any(|candidate| candidate.trim().eq_ignore_ascii_case(needle))
    }
}
