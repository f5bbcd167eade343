//! Authored ordinal adjacency tables.
//!
//! Adjacency is directional and never symmetrised: `balanced` lists `dry`
//! as a neighbour independently of whether `dry` lists `balanced`.

use std::collections::{BTreeMap, BTreeSet};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::RuleTableError;

/// Neighbouring values for one ordinal dimension.
///
/// # Examples
/// ```
/// use roost_core::AdjacencyMap;
///
/// let map = AdjacencyMap::from_pairs(&[("dry", &["balanced"]), ("balanced", &["dry", "humid"])]);
/// assert!(map.is_adjacent("dry", "balanced"));
/// assert!(!map.is_adjacent("dry", "humid"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjacencyMap {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl AdjacencyMap {
    /// Build a map from `(value, neighbours)` pairs.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, &[&str])]) -> Self {
        let entries = pairs
            .iter()
            .map(|(value, neighbours)| {
                (
                    (*value).to_owned(),
                    neighbours.iter().map(|n| (*n).to_owned()).collect(),
                )
            })
            .collect();
        Self { entries }
    }

    /// Whether `to` is listed as a neighbour of `from`.
    ///
    /// Both values are expected in canonical (trimmed, lowercase) form.
    #[must_use]
    pub fn is_adjacent(&self, from: &str, to: &str) -> bool {
        self.entries
            .get(from)
            .is_some_and(|neighbours| neighbours.contains(to))
    }

    /// Neighbours listed for `value`.
    pub fn neighbours(&self, value: &str) -> impl Iterator<Item = &str> {
        self.entries
            .get(value)
            .into_iter()
            .flat_map(|neighbours| neighbours.iter().map(String::as_str))
    }

    /// Neighbours that have no entry of their own.
    pub fn dangling(&self) -> impl Iterator<Item = &str> {
        self.entries
            .values()
            .flatten()
            .map(String::as_str)
            .filter(|neighbour| !self.entries.contains_key(*neighbour))
    }
}

/// Fraction of a sub-factor's points awarded for an adjacent match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjacencyCredit {
    /// Climate dimensions.
    pub climate: f64,
    /// Culture dimensions.
    pub culture: f64,
    /// Region dimensions.
    pub region: f64,
}

impl Default for AdjacencyCredit {
    fn default() -> Self {
        Self {
            climate: 0.7,
            culture: 0.5,
            region: 0.5,
        }
    }
}

impl AdjacencyCredit {
    fn validate(&self) -> Result<(), RuleTableError> {
        for (dimension, credit) in [
            ("climate", self.climate),
            ("culture", self.culture),
            ("region", self.region),
        ] {
            if !(0.0..=1.0).contains(&credit) {
                return Err(RuleTableError::InvalidCredit { dimension, credit });
            }
        }
        Ok(())
    }
}

/// Every adjacency table the scorers consult.
///
/// Missing tables in a JSON document fall back to the built-in ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjacencyRules {
    /// Humidity bands.
    pub humidity: AdjacencyMap,
    /// Sunshine bands.
    pub sunshine: AdjacencyMap,
    /// Precipitation bands.
    pub precipitation: AdjacencyMap,
    /// Summer temperature bands.
    pub summer: AdjacencyMap,
    /// Winter temperature bands.
    pub winter: AdjacencyMap,
    /// Urban, suburban, rural.
    pub urban_rural: AdjacencyMap,
    /// Pace of life.
    pub pace_of_life: AdjacencyMap,
    /// Expat community size.
    pub expat_community: AdjacencyMap,
    /// Social atmosphere.
    pub social_atmosphere: AdjacencyMap,
    /// Traditional versus progressive lean.
    pub traditional_progressive: AdjacencyMap,
    /// Geographic features.
    pub geographic_features: AdjacencyMap,
    /// Vegetation types.
    pub vegetation: AdjacencyMap,
    /// Partial credit per category.
    pub credit: AdjacencyCredit,
}

impl Default for AdjacencyRules {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AdjacencyRules {
    /// Parse rules from JSON, filling omitted tables from the built-in set.
    ///
    /// # Errors
    /// Returns [`RuleTableError::Parse`] for malformed JSON and
    /// [`RuleTableError::InvalidCredit`] when a credit is outside
    /// `0.0..=1.0`.
    pub fn from_json_str(raw: &str) -> Result<Self, RuleTableError> {
        let rules: Self =
            serde_json::from_str(raw).map_err(|source| RuleTableError::Parse { source })?;
        rules.credit.validate()?;
        for (table, map) in rules.tables() {
            for neighbour in map.dangling() {
                warn!("adjacency table {table} lists '{neighbour}' without an entry for it");
            }
        }
        Ok(rules)
    }

    fn tables(&self) -> [(&'static str, &AdjacencyMap); 12] {
        [
            ("humidity", &self.humidity),
            ("sunshine", &self.sunshine),
            ("precipitation", &self.precipitation),
            ("summer", &self.summer),
            ("winter", &self.winter),
            ("urban_rural", &self.urban_rural),
            ("pace_of_life", &self.pace_of_life),
            ("expat_community", &self.expat_community),
            ("social_atmosphere", &self.social_atmosphere),
            ("traditional_progressive", &self.traditional_progressive),
            ("geographic_features", &self.geographic_features),
            ("vegetation", &self.vegetation),
        ]
    }

    /// The adjacency tables shipped with the engine.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            humidity: AdjacencyMap::from_pairs(&[
                ("dry", &["balanced"]),
                ("balanced", &["dry", "humid"]),
                ("humid", &["balanced"]),
            ]),
            sunshine: AdjacencyMap::from_pairs(&[
                ("often_sunny", &["balanced", "mostly_sunny", "sunny", "abundant"]),
                (
                    "balanced",
                    &[
                        "often_sunny",
                        "mostly_sunny",
                        "sunny",
                        "abundant",
                        "less_sunny",
                        "partly_sunny",
                        "often_cloudy",
                    ],
                ),
                ("less_sunny", &["balanced", "partly_sunny", "often_cloudy"]),
                ("sunny", &["often_sunny", "balanced"]),
                ("abundant", &["often_sunny", "balanced"]),
                ("mostly_sunny", &["often_sunny", "balanced"]),
                ("partly_sunny", &["balanced", "less_sunny"]),
                ("often_cloudy", &["balanced", "less_sunny"]),
            ]),
            precipitation: AdjacencyMap::from_pairs(&[
                ("mostly_dry", &["balanced"]),
                ("dry", &["balanced"]),
                ("balanced", &["mostly_dry", "dry", "less_dry", "wet"]),
                ("less_dry", &["balanced"]),
                ("wet", &["balanced"]),
            ]),
            summer: AdjacencyMap::from_pairs(&[
                ("mild", &["warm"]),
                ("warm", &["mild", "hot"]),
                ("hot", &["warm"]),
            ]),
            winter: AdjacencyMap::from_pairs(&[
                ("cold", &["cool"]),
                ("cool", &["cold", "mild"]),
                ("mild", &["cool"]),
            ]),
            urban_rural: AdjacencyMap::from_pairs(&[
                ("urban", &["suburban"]),
                ("suburban", &["urban", "rural"]),
                ("rural", &["suburban"]),
            ]),
            pace_of_life: AdjacencyMap::from_pairs(&[
                ("fast", &["moderate"]),
                ("moderate", &["fast", "relaxed"]),
                ("relaxed", &["moderate"]),
            ]),
            expat_community: AdjacencyMap::from_pairs(&[
                ("large", &["moderate"]),
                ("moderate", &["large", "small"]),
                ("small", &["moderate"]),
            ]),
            social_atmosphere: AdjacencyMap::from_pairs(&[
                ("quiet", &["friendly"]),
                ("friendly", &["quiet", "vibrant"]),
                ("vibrant", &["friendly"]),
            ]),
            traditional_progressive: AdjacencyMap::from_pairs(&[
                ("traditional", &["balanced"]),
                ("balanced", &["traditional", "progressive"]),
                ("progressive", &["balanced"]),
            ]),
            geographic_features: AdjacencyMap::from_pairs(&[
                ("coastal", &["island", "lake", "river"]),
                ("island", &["coastal"]),
                ("lake", &["coastal", "river"]),
                ("river", &["lake", "coastal"]),
                ("mountain", &["valley", "forest"]),
                ("valley", &["mountain", "river"]),
                ("forest", &["mountain", "valley"]),
                ("plains", &["valley"]),
                ("desert", &[]),
            ]),
            vegetation: AdjacencyMap::from_pairs(&[
                ("mediterranean", &["subtropical"]),
                ("subtropical", &["mediterranean", "tropical"]),
                ("tropical", &["subtropical"]),
                ("forest", &["grassland"]),
                ("grassland", &["forest"]),
            ]),
            credit: AdjacencyCredit::default(),
        }
    }
}
