//! Boolean location features that unlock options.
//!
//! # Examples
//! ```
//! use roost_core::FeatureFlag;
//!
//! assert_eq!(FeatureFlag::SkiResorts.as_str(), "ski_resorts");
//! assert_eq!("coastal".parse::<FeatureFlag>(), Ok(FeatureFlag::Coastal));
//! ```

use serde::{Deserialize, Serialize};

/// A derived boolean attribute of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureFlag {
    /// On or near an ocean coast.
    Coastal,
    /// On an island.
    Island,
    /// On a lake.
    Lake,
    /// On a river.
    River,
    /// In or near mountains.
    Mountain,
    /// In a valley.
    Valley,
    /// In or near desert.
    Desert,
    /// Surrounded by forest.
    Forest,
    /// On open plains.
    Plains,
    /// Winters are cold.
    ColdClimate,
    /// Summers are hot.
    HotClimate,
    /// A city with urban amenities.
    Urban,
    /// Has golf courses.
    GolfCourses,
    /// Has tennis courts.
    TennisCourts,
    /// Has ski resorts nearby.
    SkiResorts,
    /// Has a marina.
    Marina,
    /// Has maintained hiking trails.
    HikingTrails,
}

impl FeatureFlag {
    /// Every flag.
    pub const ALL: [Self; 17] = [
        Self::Coastal,
        Self::Island,
        Self::Lake,
        Self::River,
        Self::Mountain,
        Self::Valley,
        Self::Desert,
        Self::Forest,
        Self::Plains,
        Self::ColdClimate,
        Self::HotClimate,
        Self::Urban,
        Self::GolfCourses,
        Self::TennisCourts,
        Self::SkiResorts,
        Self::Marina,
        Self::HikingTrails,
    ];

    /// Return the flag as a snake-case `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Coastal => "coastal",
            Self::Island => "island",
            Self::Lake => "lake",
            Self::River => "river",
            Self::Mountain => "mountain",
            Self::Valley => "valley",
            Self::Desert => "desert",
            Self::Forest => "forest",
            Self::Plains => "plains",
            Self::ColdClimate => "cold_climate",
            Self::HotClimate => "hot_climate",
            Self::Urban => "urban",
            Self::GolfCourses => "golf_courses",
            Self::TennisCourts => "tennis_courts",
            Self::SkiResorts => "ski_resorts",
            Self::Marina => "marina",
            Self::HikingTrails => "hiking_trails",
        }
    }
}

impl std::fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeatureFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|flag| flag.as_str() == wanted)
            .ok_or_else(|| format!("unknown feature flag '{s}'"))
    }
}
