//! Canonicalize preferences before scoring.
//!
//! Option selections arrive as a mix of canonical option identifiers and
//! compound shorthands (`golf_tennis`, `water_sports`, ...). The normalizer
//! expands compounds into their constituents at [`Tier::Inferred`] and keeps
//! directly selected options at [`Tier::Explicit`]; an explicit selection
//! always wins over an inferred one. Feeding a normalized value back in is a
//! no-op.

use std::collections::BTreeMap;

use roost_core::{
    BudgetPreferences, Category, Diagnostic, NormalizedOptions, NormalizedPreferences, OptionTaxonomy,
    ParsedPreferences, Tier, UserPreferences,
};

/// One entry handed to [`PreferenceNormalizer::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    /// A raw user selection that may be a compound token.
    Raw(&'a str),
    /// An already canonical token with a known tier.
    Normalized(&'a str, Tier),
}

/// Anything that can be normalized into [`NormalizedOptions`].
pub trait OptionInput {
    /// Selections in input order.
    fn selections(&self) -> Vec<Selection<'_>>;
}

impl OptionInput for [String] {
    fn selections(&self) -> Vec<Selection<'_>> {
        self.iter().map(|raw| Selection::Raw(raw)).collect()
    }
}

impl OptionInput for Vec<String> {
    fn selections(&self) -> Vec<Selection<'_>> {
        self.as_slice().selections()
    }
}

impl OptionInput for [&str] {
    fn selections(&self) -> Vec<Selection<'_>> {
        self.iter().map(|raw| Selection::Raw(raw)).collect()
    }
}

impl<const N: usize> OptionInput for [&str; N] {
    fn selections(&self) -> Vec<Selection<'_>> {
        self.as_slice().selections()
    }
}

impl OptionInput for NormalizedOptions {
    fn selections(&self) -> Vec<Selection<'_>> {
        self.iter()
            .map(|(token, tier)| Selection::Normalized(token, tier))
            .collect()
    }
}

/// Expands and canonicalizes preferences against an [`OptionTaxonomy`].
///
/// # Examples
/// ```
/// use roost_core::{OptionTaxonomy, Tier};
/// use roost_scorer::PreferenceNormalizer;
///
/// let taxonomy = OptionTaxonomy::builtin();
/// let normalizer = PreferenceNormalizer::new(&taxonomy);
/// let options = normalizer.normalize(&["golf_tennis", "golf"]);
/// assert_eq!(options.tokens, ["golf", "tennis", "pickleball", "badminton"]);
/// assert_eq!(options.tier("golf"), Some(Tier::Explicit));
/// assert_eq!(options.tier("tennis"), Some(Tier::Inferred));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PreferenceNormalizer<'a> {
    taxonomy: &'a OptionTaxonomy,
}

impl<'a> PreferenceNormalizer<'a> {
    /// Create a normalizer for `taxonomy`.
    #[must_use]
    pub const fn new(taxonomy: &'a OptionTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Constituents of a compound token, or `None` if `token` is not one.
    #[must_use]
    pub fn expand(&self, token: &str) -> Option<&'a [String]> {
        self.taxonomy.compound(&canonical(token))
    }

    /// Normalize option selections.
    ///
    /// Blank entries are skipped. Unknown tokens pass through at
    /// [`Tier::Inferred`] with a warning.
    #[must_use]
    pub fn normalize<I>(&self, input: &I) -> NormalizedOptions
    where
        I: OptionInput + ?Sized,
    {
        let mut builder = OptionsBuilder::default();
        for selection in input.selections() {
            match selection {
                Selection::Raw(raw) => self.push_raw(&mut builder, &canonical(raw)),
                Selection::Normalized(token, tier) => {
                    let known = self.taxonomy.contains(token);
                    builder.record(token, tier, known);
                }
            }
        }
        builder.finish()
    }

    fn push_raw(&self, builder: &mut OptionsBuilder, token: &str) {
        if token.is_empty() {
            return;
        }
        if let Some(expansion) = self.taxonomy.compound(token) {
            for option in expansion {
                builder.record(option, Tier::Inferred, true);
            }
        } else if self.taxonomy.contains(token) {
            builder.record(token, Tier::Explicit, true);
        } else {
            builder.record(token, Tier::Inferred, false);
        }
    }

    /// Canonicalize a validated preference document.
    ///
    /// Labels are trimmed and lowercased, set-like lists are sorted and
    /// deduplicated, and activities and interests become canonical option
    /// tokens. Validation warnings carry over.
    #[must_use]
    pub fn preferences(&self, parsed: &ParsedPreferences) -> NormalizedPreferences {
        let mut normalized = self.normalize_preferences(&parsed.preferences);
        let mut warnings = parsed.warnings.clone();
        warnings.append(&mut normalized.warnings);
        normalized.warnings = warnings;
        normalized
    }

    /// Canonicalize preferences that did not pass through JSON validation.
    #[must_use]
    pub fn normalize_preferences(&self, preferences: &UserPreferences) -> NormalizedPreferences {
        let mut region = preferences.region.clone();
        for list in [
            &mut region.countries,
            &mut region.regions,
            &mut region.geographic_features,
            &mut region.vegetation_types,
        ] {
            canonical_set(list);
        }

        let mut climate = preferences.climate.clone();
        for list in [
            &mut climate.summer,
            &mut climate.winter,
            &mut climate.humidity,
            &mut climate.sunshine,
            &mut climate.precipitation,
        ] {
            canonical_set(list);
        }
        climate.seasonal = canonical_label(climate.seasonal.as_deref());

        let mut culture = preferences.culture.clone();
        for list in [
            &mut culture.urban_rural,
            &mut culture.pace_of_life,
            &mut culture.expat_community,
            &mut culture.social_atmosphere,
            &mut culture.traditional_progressive,
            &mut culture.language_comfort,
            &mut culture.languages_spoken,
        ] {
            canonical_set(list);
        }

        let mut administration = preferences.administration.clone();
        administration.citizenship = canonical_label(administration.citizenship.as_deref());

        let selections: Vec<&str> = preferences
            .options
            .activities
            .iter()
            .chain(&preferences.options.interests)
            .map(String::as_str)
            .collect();
        let options = self.normalize(selections.as_slice());
        let mut warnings: Vec<Diagnostic> = options
            .warnings
            .iter()
            .map(|warning| Diagnostic::invalid_preference(Some(Category::Options), warning.clone()))
            .collect();
        let budget = canonical_budget(&preferences.budget, &mut warnings);

        NormalizedPreferences {
            region,
            climate,
            culture,
            options,
            travel_frequency: canonical_label(preferences.options.travel_frequency.as_deref()),
            administration,
            budget,
            warnings,
        }
    }
}

/// Drop amounts that are not finite and positive.
fn canonical_budget(raw: &BudgetPreferences, warnings: &mut Vec<Diagnostic>) -> BudgetPreferences {
    let mut budget = raw.clone();
    for (name, amount) in [
        ("total_monthly_budget", &mut budget.total_monthly_budget),
        ("max_monthly_rent", &mut budget.max_monthly_rent),
        ("monthly_healthcare_budget", &mut budget.monthly_healthcare_budget),
    ] {
        if amount.is_some_and(|value| !value.is_finite() || value <= 0.0) {
            *amount = None;
            warnings.push(Diagnostic::invalid_preference(
                Some(Category::Budget),
                format!("{name} is not a positive amount"),
            ));
        }
    }
    budget
}

/// The raw entries a user has toggled on, for incremental editing.
///
/// Removing a compound entry only removes that entry; the normalized view is
/// recomputed from what remains, so an option still contributed by another
/// entry stays selected.
///
/// # Examples
/// ```
/// use roost_core::{OptionTaxonomy, Tier};
/// use roost_scorer::{OptionSelections, PreferenceNormalizer};
///
/// let taxonomy = OptionTaxonomy::builtin();
/// let normalizer = PreferenceNormalizer::new(&taxonomy);
/// let mut selections = OptionSelections::default();
/// selections.select("golf_tennis");
/// selections.select("tennis");
/// selections.deselect("golf_tennis");
/// let options = normalizer.normalize(&selections);
/// assert_eq!(options.tokens, ["tennis"]);
/// assert_eq!(options.tier("tennis"), Some(Tier::Explicit));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSelections {
    entries: Vec<String>,
}

impl OptionSelections {
    /// Add an entry. Returns `false` if it was already selected.
    pub fn select(&mut self, token: &str) -> bool {
        let entry = canonical(token);
        if entry.is_empty() || self.entries.contains(&entry) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Remove an entry. Returns `false` if it was not selected.
    pub fn deselect(&mut self, token: &str) -> bool {
        let entry = canonical(token);
        let before = self.entries.len();
        self.entries.retain(|existing| existing != &entry);
        self.entries.len() != before
    }

    /// Raw entries in selection order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl OptionInput for OptionSelections {
    fn selections(&self) -> Vec<Selection<'_>> {
        self.entries.selections()
    }
}

#[derive(Default)]
struct OptionsBuilder {
    tokens: Vec<String>,
    tiers: BTreeMap<String, Tier>,
    warnings: Vec<String>,
}

impl OptionsBuilder {
    fn record(&mut self, token: &str, tier: Tier, known: bool) {
        if let Some(existing) = self.tiers.get_mut(token) {
            *existing = (*existing).max(tier);
            return;
        }
        if !known {
            self.warnings
                .push(format!("unknown option '{token}' kept at tier 1"));
        }
        self.tokens.push(token.to_owned());
        self.tiers.insert(token.to_owned(), tier);
    }

    fn finish(self) -> NormalizedOptions {
        NormalizedOptions {
            tokens: self.tokens,
            tiers: self.tiers,
            warnings: self.warnings,
        }
    }
}

fn canonical(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn canonical_label(raw: Option<&str>) -> Option<String> {
    raw.map(canonical).filter(|label| !label.is_empty())
}

fn canonical_set(list: &mut Vec<String>) {
    let mut canonicalized: Vec<String> = list
        .iter()
        .map(|item| canonical(item))
        .filter(|item| !item.is_empty())
        .collect();
    canonicalized.sort_unstable();
    canonicalized.dedup();
    *list = canonicalized;
}
