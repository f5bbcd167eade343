//! Structured user preferences.
//!
//! Each category has an explicit schema with named optional fields. An empty
//! list, `None` or `false` means the user expressed no preference, which the
//! scorers treat as "open to anything" and award full credit for.
//!
//! Preferences arriving from loosely typed sources should go through
//! [`UserPreferences::from_json`], which tolerates scalar-or-array values,
//! string-typed numbers and placeholder selections.

mod parse;

use serde::{Deserialize, Serialize};

pub use parse::ParsedPreferences;

/// Minimum acceptable quality for an administrative service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    /// Any functioning service will do.
    Basic,
    /// Service quality should scale with the location's rating.
    Functional,
    /// Only well-rated services are acceptable.
    Good,
}

impl QualityLevel {
    /// Return the level as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Functional => "functional",
            Self::Good => "good",
        }
    }
}

impl std::fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QualityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "functional" => Ok(Self::Functional),
            "good" => Ok(Self::Good),
            _ => Err(format!("unknown quality level '{s}'")),
        }
    }
}

/// Where the user would like to live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionPreferences {
    /// Preferred countries (or US states).
    pub countries: Vec<String>,
    /// Preferred broad regions such as "southern europe".
    pub regions: Vec<String>,
    /// Preferred landscape features such as "coastal" or "mountain".
    pub geographic_features: Vec<String>,
    /// Preferred vegetation such as "mediterranean".
    pub vegetation_types: Vec<String>,
}

/// Preferred weather.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimatePreferences {
    /// Summer bands: `mild`, `warm`, `hot`.
    pub summer: Vec<String>,
    /// Winter bands: `cold`, `cool`, `mild`.
    pub winter: Vec<String>,
    /// Humidity bands: `dry`, `balanced`, `humid`.
    pub humidity: Vec<String>,
    /// Sunshine bands such as `often_sunny` or `less_sunny`.
    pub sunshine: Vec<String>,
    /// Precipitation bands such as `mostly_dry` or `wet`.
    pub precipitation: Vec<String>,
    /// Seasonal emphasis such as `warm_all_year` or `all_seasons`.
    pub seasonal: Option<String>,
}

/// Lifestyle and cultural preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CulturePreferences {
    /// `urban`, `suburban` or `rural`.
    pub urban_rural: Vec<String>,
    /// `fast`, `moderate` or `relaxed`.
    pub pace_of_life: Vec<String>,
    /// `small`, `moderate` or `large`.
    pub expat_community: Vec<String>,
    /// `quiet`, `friendly` or `vibrant`.
    pub social_atmosphere: Vec<String>,
    /// `traditional`, `balanced` or `progressive`.
    pub traditional_progressive: Vec<String>,
    /// `english_only`, `willing_to_learn` or `comfortable`.
    pub language_comfort: Vec<String>,
    /// Languages the user already speaks.
    pub languages_spoken: Vec<String>,
    /// Importance of dining and nightlife on a 1-5 scale.
    pub dining_importance: Option<u8>,
    /// Importance of cultural events on a 1-5 scale.
    pub cultural_events_importance: Option<u8>,
    /// Importance of museums on a 1-5 scale.
    pub museums_importance: Option<u8>,
}

/// Activities and interests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionPreferences {
    /// Activity selections, possibly compound tokens such as `golf_tennis`.
    pub activities: Vec<String>,
    /// Interest selections.
    pub interests: Vec<String>,
    /// `rare`, `occasional` or `frequent`.
    pub travel_frequency: Option<String>,
}

/// Services and legal requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdministrationPreferences {
    /// Minimum healthcare quality.
    pub healthcare: Option<QualityLevel>,
    /// Minimum safety.
    pub safety: Option<QualityLevel>,
    /// Minimum government efficiency.
    pub government_efficiency: Option<QualityLevel>,
    /// Minimum political stability.
    pub political_stability: Option<QualityLevel>,
    /// Citizenship used to assess visa access.
    pub citizenship: Option<String>,
    /// Whether air quality matters for the user's health.
    pub environmental_health_sensitive: bool,
}

/// Money matters. Amounts are monthly, in USD.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetPreferences {
    /// Total monthly budget.
    pub total_monthly_budget: Option<f64>,
    /// Maximum monthly rent.
    pub max_monthly_rent: Option<f64>,
    /// Monthly healthcare budget.
    pub monthly_healthcare_budget: Option<f64>,
    /// Whether income tax rates matter.
    pub income_tax_sensitive: bool,
    /// Whether property tax rates matter.
    pub property_tax_sensitive: bool,
    /// Whether sales tax rates matter.
    pub sales_tax_sensitive: bool,
}

/// A user's complete preference set.
///
/// # Examples
/// ```
/// use roost_core::UserPreferences;
///
/// let mut preferences = UserPreferences::default();
/// preferences.climate.humidity = vec!["dry".to_owned()];
/// assert!(preferences.climate.has_any());
/// assert!(!preferences.budget.has_any());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    /// Region preferences.
    pub region: RegionPreferences,
    /// Climate preferences.
    pub climate: ClimatePreferences,
    /// Culture preferences.
    pub culture: CulturePreferences,
    /// Activity and interest preferences.
    pub options: OptionPreferences,
    /// Administration preferences.
    pub administration: AdministrationPreferences,
    /// Budget preferences.
    pub budget: BudgetPreferences,
}

impl RegionPreferences {
    /// Whether any region preference is set.
    #[must_use]
    pub fn has_any(&self) -> bool {
        !(self.countries.is_empty()
            && self.regions.is_empty()
            && self.geographic_features.is_empty()
            && self.vegetation_types.is_empty())
    }
}

impl ClimatePreferences {
    /// Whether any climate preference is set.
    #[must_use]
    pub fn has_any(&self) -> bool {
        !(self.summer.is_empty()
            && self.winter.is_empty()
            && self.humidity.is_empty()
            && self.sunshine.is_empty()
            && self.precipitation.is_empty()
            && self.seasonal.is_none())
    }
}

impl CulturePreferences {
    /// Whether any culture preference is set.
    #[must_use]
    pub fn has_any(&self) -> bool {
        !(self.urban_rural.is_empty()
            && self.pace_of_life.is_empty()
            && self.expat_community.is_empty()
            && self.social_atmosphere.is_empty()
            && self.traditional_progressive.is_empty()
            && self.language_comfort.is_empty()
            && self.languages_spoken.is_empty()
            && self.dining_importance.is_none()
            && self.cultural_events_importance.is_none()
            && self.museums_importance.is_none())
    }
}

impl OptionPreferences {
    /// Whether any activity, interest or travel preference is set.
    #[must_use]
    pub fn has_any(&self) -> bool {
        !(self.activities.is_empty() && self.interests.is_empty() && self.travel_frequency.is_none())
    }
}

impl AdministrationPreferences {
    /// Whether any administration preference is set.
    #[must_use]
    pub const fn has_any(&self) -> bool {
        self.healthcare.is_some()
            || self.safety.is_some()
            || self.government_efficiency.is_some()
            || self.political_stability.is_some()
            || self.citizenship.is_some()
            || self.environmental_health_sensitive
    }
}

impl BudgetPreferences {
    /// Whether any budget preference is set.
    #[must_use]
    pub const fn has_any(&self) -> bool {
        self.total_monthly_budget.is_some()
            || self.max_monthly_rent.is_some()
            || self.monthly_healthcare_budget.is_some()
            || self.is_tax_sensitive()
    }

    /// Whether any tax sensitivity flag is set.
    #[must_use]
    pub const fn is_tax_sensitive(&self) -> bool {
        self.income_tax_sensitive || self.property_tax_sensitive || self.sales_tax_sensitive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    fn default_preferences_express_nothing() {
        let preferences = UserPreferences::default();
        assert!(!preferences.region.has_any());
        assert!(!preferences.climate.has_any());
        assert!(!preferences.culture.has_any());
        assert!(!preferences.options.has_any());
        assert!(!preferences.administration.has_any());
        assert!(!preferences.budget.has_any());
    }

    #[rstest]
    #[case("good", QualityLevel::Good)]
    #[case(" Functional ", QualityLevel::Functional)]
    #[case("BASIC", QualityLevel::Basic)]
    fn parses_quality_levels(#[case] raw: &str, #[case] expected: QualityLevel) {
        assert_eq!(QualityLevel::from_str(raw), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_quality_level() {
        let err = QualityLevel::from_str("excellent").unwrap_err();
        assert!(err.contains("unknown quality level"));
    }

    #[rstest]
    fn tax_sensitivity_counts_as_budget_preference() {
        let budget = BudgetPreferences {
            sales_tax_sensitive: true,
            ..BudgetPreferences::default()
        };
        assert!(budget.has_any());
    }
}
