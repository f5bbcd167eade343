//! Canonical, scorer-ready preferences.
//!
//! A [`NormalizedPreferences`] value is produced once at the boundary and is
//! the only preference type scorers and the cache see. Its serialization is
//! canonical: set-like lists are sorted and deduplicated and map keys are
//! ordered, so equal preferences always serialize identically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    AdministrationPreferences, BudgetPreferences, ClimatePreferences, CulturePreferences,
    Diagnostic, RegionPreferences,
};

/// How an option entered the user's selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Implied by a compound shorthand, or an unknown token passed through.
    Inferred,
    /// Selected directly by the user.
    Explicit,
}

impl Tier {
    /// Numeric tier: 1 for inferred, 2 for explicit.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Inferred => 1,
            Self::Explicit => 2,
        }
    }

    /// Weight the tier carries in option match ratios.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::Inferred => 1,
            Self::Explicit => 2,
        }
    }
}

/// Canonical option tokens with their tiers.
///
/// `tokens` keeps first-appearance order; `tiers` holds one entry per token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedOptions {
    /// Canonical tokens in first-appearance order, without duplicates.
    #[serde(skip)]
    pub tokens: Vec<String>,
    /// Tier per token.
    pub tiers: BTreeMap<String, Tier>,
    /// Notes about tokens the taxonomy did not recognise.
    #[serde(skip)]
    pub warnings: Vec<String>,
}

impl NormalizedOptions {
    /// Tier recorded for `token`.
    #[must_use]
    pub fn tier(&self, token: &str) -> Option<Tier> {
        self.tiers.get(token).copied()
    }

    /// Whether no option was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate over `(token, tier)` pairs in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Tier)> {
        self.tokens
            .iter()
            .filter_map(|token| self.tier(token).map(|tier| (token.as_str(), tier)))
    }

    /// Sum of every token's tier weight.
    #[must_use]
    pub fn total_weight(&self) -> u32 {
        self.tiers.values().map(|tier| tier.weight()).sum()
    }
}

/// Preferences after boundary validation and canonicalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedPreferences {
    /// Region preferences, lowercased and sorted.
    pub region: RegionPreferences,
    /// Climate preferences, lowercased and sorted.
    pub climate: ClimatePreferences,
    /// Culture preferences, lowercased and sorted.
    pub culture: CulturePreferences,
    /// Activities and interests as canonical option tokens.
    pub options: NormalizedOptions,
    /// Travel frequency, lowercased.
    pub travel_frequency: Option<String>,
    /// Administration preferences.
    pub administration: AdministrationPreferences,
    /// Budget preferences.
    pub budget: BudgetPreferences,
    /// Notes gathered while validating and normalizing.
    #[serde(skip)]
    pub warnings: Vec<Diagnostic>,
}

impl NormalizedPreferences {
    /// Whether the options category carries any preference.
    #[must_use]
    pub fn has_option_preferences(&self) -> bool {
        !self.options.tokens.is_empty() || self.travel_frequency.is_some()
    }
}
