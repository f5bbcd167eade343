//! The six scoring categories and their fixed weights.
//!
//! # Examples
//! ```
//! use roost_core::{Category, CategoryWeights};
//!
//! assert_eq!(Category::Administration.as_str(), "administration");
//! assert_eq!(CategoryWeights::default().weight(Category::Options), 10);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A scoring category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Countries, regions, landscape and vegetation.
    Region,
    /// Temperatures, humidity, sunshine and rainfall.
    Climate,
    /// Lifestyle, language and cultural amenities.
    Culture,
    /// Activities and interests the location can support.
    Options,
    /// Healthcare, safety, governance and visas.
    Administration,
    /// Cost of living, rent, healthcare costs and tax.
    Budget,
}

impl Category {
    /// Every category in evaluation order.
    pub const ALL: [Self; 6] = [
        Self::Region,
        Self::Climate,
        Self::Culture,
        Self::Options,
        Self::Administration,
        Self::Budget,
    ];

    /// Return the category as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Climate => "climate",
            Self::Culture => "culture",
            Self::Options => "options",
            Self::Administration => "administration",
            Self::Budget => "budget",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "region" => Ok(Self::Region),
            "climate" => Ok(Self::Climate),
            "culture" => Ok(Self::Culture),
            "options" | "hobbies" => Ok(Self::Options),
            "administration" | "admin" => Ok(Self::Administration),
            "budget" | "cost" => Ok(Self::Budget),
            _ => Err(format!("unknown category '{s}'")),
        }
    }
}

/// Errors returned by [`CategoryWeights::new`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryWeightsError {
    /// The weights did not add up to 100.
    #[error("category weights must sum to 100, got {total}")]
    InvalidTotal {
        /// Sum of the supplied weights.
        total: u32,
    },
}

/// Percentage weights applied to each category score.
///
/// The default weights are region 20, climate 15, culture 15, options 10,
/// administration 20 and budget 20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryWeights {
    region: u8,
    climate: u8,
    culture: u8,
    options: u8,
    administration: u8,
    budget: u8,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            region: 20,
            climate: 15,
            culture: 15,
            options: 10,
            administration: 20,
            budget: 20,
        }
    }
}

impl CategoryWeights {
    /// Validate and construct a weight table from per-category percentages.
    ///
    /// # Errors
    /// Returns [`CategoryWeightsError::InvalidTotal`] when the weights do not
    /// sum to exactly 100.
    pub fn new(weights: [(Category, u8); 6]) -> Result<Self, CategoryWeightsError> {
        let mut table = Self {
            region: 0,
            climate: 0,
            culture: 0,
            options: 0,
            administration: 0,
            budget: 0,
        };
        for (category, weight) in weights {
            *table.slot(category) = weight;
        }
        let total = table.total();
        if total != 100 {
            return Err(CategoryWeightsError::InvalidTotal { total });
        }
        Ok(table)
    }

    /// Weight assigned to `category`.
    #[must_use]
    pub const fn weight(&self, category: Category) -> u8 {
        match category {
            Category::Region => self.region,
            Category::Climate => self.climate,
            Category::Culture => self.culture,
            Category::Options => self.options,
            Category::Administration => self.administration,
            Category::Budget => self.budget,
        }
    }

    /// Sum of every weight.
    #[must_use]
    pub fn total(&self) -> u32 {
        Category::ALL
            .iter()
            .map(|category| u32::from(self.weight(*category)))
            .sum()
    }

    const fn slot(&mut self, category: Category) -> &mut u8 {
        match category {
            Category::Region => &mut self.region,
            Category::Climate => &mut self.climate,
            Category::Culture => &mut self.culture,
            Category::Options => &mut self.options,
            Category::Administration => &mut self.administration,
            Category::Budget => &mut self.budget,
        }
    }
}
