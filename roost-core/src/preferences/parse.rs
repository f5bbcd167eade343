//! Boundary validation for loosely shaped preference documents.

use serde_json::{Map, Value};

use super::{
    AdministrationPreferences, BudgetPreferences, ClimatePreferences, CulturePreferences,
    OptionPreferences, QualityLevel, RegionPreferences, UserPreferences,
};
use crate::{Category, Diagnostic};

/// Selections that carry no information and are dropped on input.
const PLACEHOLDERS: [&str; 4] = ["optional", "select preference", "select_preference", "none"];

/// Preferences recovered from a JSON document, plus notes about every field
/// that had to be dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPreferences {
    /// The validated preferences.
    pub preferences: UserPreferences,
    /// One entry per malformed field.
    pub warnings: Vec<Diagnostic>,
}

impl UserPreferences {
    /// Validate a JSON preference document.
    ///
    /// Malformed fields are treated as absent and reported in
    /// [`ParsedPreferences::warnings`]; this function never fails. Legacy
    /// section names (`region_preferences`, `hobbies`, `costs`, ...) are
    /// accepted alongside the canonical ones.
    ///
    /// # Examples
    /// ```
    /// use roost_core::UserPreferences;
    /// use serde_json::json;
    ///
    /// let parsed = UserPreferences::from_json(&json!({
    ///     "climate": { "humidity": "dry" },
    ///     "budget": { "total_monthly_budget": [1500, "2500"] },
    /// }));
    /// assert_eq!(parsed.preferences.climate.humidity, vec!["dry"]);
    /// assert_eq!(parsed.preferences.budget.total_monthly_budget, Some(2500.0));
    /// assert!(parsed.warnings.is_empty());
    /// ```
    #[must_use]
    pub fn from_json(value: &Value) -> ParsedPreferences {
        let mut warnings = Vec::new();
        let Some(root) = value.as_object() else {
            if !value.is_null() {
                warnings.push(Diagnostic::invalid_preference(
                    None,
                    "preference document is not an object",
                ));
            }
            return ParsedPreferences {
                preferences: Self::default(),
                warnings,
            };
        };

        let region = read_region(&mut Section::open(
            root,
            Category::Region,
            &["region", "region_preferences"],
            &mut warnings,
        ));
        let climate = read_climate(&mut Section::open(
            root,
            Category::Climate,
            &["climate", "climate_preferences"],
            &mut warnings,
        ));
        let culture = read_culture(&mut Section::open(
            root,
            Category::Culture,
            &["culture", "culture_preferences"],
            &mut warnings,
        ));
        let options = read_options(&mut Section::open(
            root,
            Category::Options,
            &["options", "hobbies"],
            &mut warnings,
        ));
        let administration = read_administration(&mut Section::open(
            root,
            Category::Administration,
            &["administration", "admin"],
            &mut warnings,
        ));
        let budget = read_budget(&mut Section::open(
            root,
            Category::Budget,
            &["budget", "costs"],
            &mut warnings,
        ));
        let preferences = Self {
            region,
            climate,
            culture,
            options,
            administration,
            budget,
        };
        ParsedPreferences {
            preferences,
            warnings,
        }
    }

    /// Parse and validate a JSON preference document from text.
    ///
    /// # Errors
    /// Returns the underlying [`serde_json::Error`] when `raw` is not JSON.
    pub fn from_json_str(raw: &str) -> Result<ParsedPreferences, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;
        Ok(Self::from_json(&value))
    }
}

fn read_region(section: &mut Section<'_>) -> RegionPreferences {
    RegionPreferences {
        countries: section.strings(&["countries", "country"]),
        regions: section.strings(&["regions"]),
        geographic_features: section.strings(&["geographic_features"]),
        vegetation_types: section.strings(&["vegetation_types"]),
    }
}

fn read_climate(section: &mut Section<'_>) -> ClimatePreferences {
    ClimatePreferences {
        summer: section.strings(&["summer", "summer_climate_preference"]),
        winter: section.strings(&["winter", "winter_climate_preference"]),
        humidity: section.strings(&["humidity", "humidity_level"]),
        sunshine: section.strings(&["sunshine"]),
        precipitation: section.strings(&["precipitation"]),
        seasonal: section.string(&["seasonal", "seasonal_preference"]),
    }
}

fn read_culture(section: &mut Section<'_>) -> CulturePreferences {
    CulturePreferences {
        urban_rural: section.strings(&["urban_rural", "urban_rural_preference"]),
        pace_of_life: section.strings(&["pace_of_life", "pace_of_life_preference"]),
        expat_community: section.strings(&["expat_community", "expat_community_preference"]),
        social_atmosphere: section.strings(&["social_atmosphere"]),
        traditional_progressive: section.strings(&["traditional_progressive"]),
        language_comfort: section.strings(&["language_comfort"]),
        languages_spoken: section.strings(&["languages_spoken"]),
        dining_importance: section.importance(&["dining_importance", "dining_nightlife"]),
        cultural_events_importance: section.importance(&["cultural_events_importance", "cultural_events"]),
        museums_importance: section.importance(&["museums_importance", "museums"]),
    }
}

fn read_options(section: &mut Section<'_>) -> OptionPreferences {
    OptionPreferences {
        activities: section.strings(&["activities"]),
        interests: section.strings(&["interests"]),
        travel_frequency: section.string(&["travel_frequency"]),
    }
}

fn read_administration(section: &mut Section<'_>) -> AdministrationPreferences {
    AdministrationPreferences {
        healthcare: section.quality(&["healthcare", "healthcare_quality"]),
        safety: section.quality(&["safety", "safety_importance"]),
        government_efficiency: section.quality(&["government_efficiency"]),
        political_stability: section.quality(&["political_stability"]),
        citizenship: section.string(&["citizenship"]),
        environmental_health_sensitive: section
            .flag(&["environmental_health_sensitive", "environmental_health"]),
    }
}

fn read_budget(section: &mut Section<'_>) -> BudgetPreferences {
    BudgetPreferences {
        total_monthly_budget: section.amount(&["total_monthly_budget"]),
        max_monthly_rent: section.amount(&["max_monthly_rent"]),
        monthly_healthcare_budget: section.amount(&["monthly_healthcare_budget"]),
        income_tax_sensitive: section.flag(&["income_tax_sensitive"]),
        property_tax_sensitive: section.flag(&["property_tax_sensitive"]),
        sales_tax_sensitive: section.flag(&["sales_tax_sensitive"]),
    }
}

/// Reads fields of one category section, recording a warning for every
/// field whose shape it cannot use.
struct Section<'a> {
    category: Category,
    fields: Option<&'a Map<String, Value>>,
    warnings: &'a mut Vec<Diagnostic>,
}

impl<'a> Section<'a> {
    fn open(
        root: &'a Map<String, Value>,
        category: Category,
        names: &[&str],
        warnings: &'a mut Vec<Diagnostic>,
    ) -> Self {
        let value = names.iter().find_map(|name| root.get(*name));
        let fields = match value {
            Some(Value::Object(fields)) => Some(fields),
            Some(Value::Null) | None => None,
            Some(_) => {
                warnings.push(Diagnostic::invalid_preference(
                    Some(category),
                    "section is not an object; treated as absent",
                ));
                None
            }
        };
        Self {
            category,
            fields,
            warnings,
        }
    }

    fn field(&self, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
        let fields = self.fields?;
        keys.iter()
            .find_map(|key| fields.get(*key).map(|value| (*key, value)))
    }

    fn reject(&mut self, key: &str) {
        self.warnings.push(Diagnostic::invalid_preference(
            Some(self.category),
            format!("{key} has an unsupported shape; treated as absent"),
        ));
    }

    fn strings(&mut self, keys: &[&'static str]) -> Vec<String> {
        let Some((key, value)) = self.field(keys) else {
            return Vec::new();
        };
        match value {
            Value::Null => Vec::new(),
            Value::String(text) => clean(text).into_iter().collect(),
            Value::Array(items) => {
                let mut selections = Vec::with_capacity(items.len());
                let mut rejected = false;
                for item in items {
                    match item {
                        Value::String(text) => selections.extend(clean(text)),
                        Value::Null => {}
                        _ => rejected = true,
                    }
                }
                if rejected {
                    self.reject(key);
                }
                selections
            }
            _ => {
                self.reject(key);
                Vec::new()
            }
        }
    }

    fn string(&mut self, keys: &[&'static str]) -> Option<String> {
        let (key, value) = self.field(keys)?;
        match value {
            Value::Null => None,
            Value::String(text) => clean(text),
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .find_map(clean),
            _ => {
                self.reject(key);
                None
            }
        }
    }

    fn amount(&mut self, keys: &[&'static str]) -> Option<f64> {
        let (key, value) = self.field(keys)?;
        let amount = match value {
            Value::Null => return None,
            Value::Array(items) => items
                .iter()
                .filter_map(number_like)
                .fold(None, |best: Option<f64>, next| {
                    Some(best.map_or(next, |current| current.max(next)))
                }),
            other => number_like(other),
        };
        match amount {
            Some(found) if found > 0.0 => Some(found),
            _ => {
                self.reject(key);
                None
            }
        }
    }

    fn flag(&mut self, keys: &[&'static str]) -> bool {
        let Some((key, value)) = self.field(keys) else {
            return false;
        };
        match value {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
            Value::String(text) => match text.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" => true,
                "false" | "no" | "0" | "" => false,
                _ => {
                    self.reject(key);
                    false
                }
            },
            _ => {
                self.reject(key);
                false
            }
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "importance is rounded and clamped to 1..=5 before the cast"
    )]
    fn importance(&mut self, keys: &[&'static str]) -> Option<u8> {
        let (key, value) = self.field(keys)?;
        if value.is_null() {
            return None;
        }
        let Some(raw) = number_like(value) else {
            self.reject(key);
            return None;
        };
        let rounded = raw.round();
        if !(1.0..=5.0).contains(&rounded) {
            self.warnings.push(Diagnostic::invalid_preference(
                Some(self.category),
                format!("{key} outside 1-5; clamped"),
            ));
        }
        Some(rounded.clamp(1.0, 5.0) as u8)
    }

    fn quality(&mut self, keys: &[&'static str]) -> Option<QualityLevel> {
        let (key, _) = self.field(keys)?;
        let label = self.string(&[key])?;
        if let Ok(level) = label.parse() {
            Some(level)
        } else {
            self.reject(key);
            None
        }
    }
}

fn clean(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let lowered = trimmed.to_lowercase();
    if trimmed.is_empty() || PLACEHOLDERS.contains(&lowered.as_str()) {
        return None;
    }
    Some(trimmed.to_owned())
}

fn number_like(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let digits: String = text
                .trim()
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | ' '))
                .collect();
            digits.parse::<f64>().ok()
        }
        _ => None,
    }?;
    number.is_finite().then_some(number)
}
