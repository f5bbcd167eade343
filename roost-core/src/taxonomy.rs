//! The authored table of canonical options.
//!
//! Every activity or interest a user can select is a canonical option. An
//! option is either universal (available everywhere) or unlocked by one or
//! more [`FeatureFlag`]s. Compound tokens are UI shorthands that expand to
//! several canonical options.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{FeatureFlag, RuleTableError};

/// A canonical option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDefinition {
    /// Canonical identifier, lowercase snake case.
    pub id: String,
    /// Whether the option is available at every location.
    #[serde(default)]
    pub is_universal: bool,
    /// Flags of which any one unlocks the option.
    #[serde(default)]
    pub unlocking_flags: BTreeSet<FeatureFlag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaxonomyDocument {
    options: Vec<OptionDefinition>,
    #[serde(default)]
    compounds: BTreeMap<String, Vec<String>>,
}

/// Validated option taxonomy with a flag-to-options reverse index.
///
/// # Examples
/// ```
/// use roost_core::{FeatureFlag, OptionTaxonomy};
///
/// let taxonomy = OptionTaxonomy::builtin();
/// assert!(taxonomy.is_universal("walking"));
/// assert!(taxonomy.options_for_flag(FeatureFlag::Coastal).contains("surfing"));
/// assert_eq!(
///     taxonomy.compound("golf_tennis"),
///     Some(["golf", "tennis", "pickleball", "badminton"].map(String::from).as_slice())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaxonomyDocument", into = "TaxonomyDocument")]
pub struct OptionTaxonomy {
    options: BTreeMap<String, OptionDefinition>,
    compounds: BTreeMap<String, Vec<String>>,
    universal: BTreeSet<String>,
    by_flag: BTreeMap<FeatureFlag, BTreeSet<String>>,
}

impl OptionTaxonomy {
    /// Validate and index a taxonomy.
    ///
    /// Identifiers are trimmed and lowercased.
    ///
    /// # Errors
    /// Returns [`RuleTableError`] when an option is defined twice, when a
    /// compound expands to an undefined option, or when a compound shares a
    /// name with an option.
    pub fn new(
        options: Vec<OptionDefinition>,
        compounds: BTreeMap<String, Vec<String>>,
    ) -> Result<Self, RuleTableError> {
        let mut seen = BTreeSet::new();
        for option in &options {
            let id = canonical(&option.id);
            if !seen.insert(id.clone()) {
                return Err(RuleTableError::DuplicateOption { option: id });
            }
        }
        for (compound, targets) in &compounds {
            let token = canonical(compound);
            if seen.contains(&token) {
                return Err(RuleTableError::CompoundShadowsOption { compound: token });
            }
            if let Some(missing) = targets.iter().map(|t| canonical(t)).find(|t| !seen.contains(t)) {
                return Err(RuleTableError::UnknownCompoundTarget {
                    compound: token,
                    option: missing,
                });
            }
        }
        Ok(Self::assemble(options, compounds))
    }

    /// Parse a taxonomy from a JSON document of the form
    /// `{"options": [...], "compounds": {"token": ["option", ...]}}`.
    ///
    /// # Errors
    /// Returns [`RuleTableError::Parse`] for malformed JSON and the
    /// validation errors of [`OptionTaxonomy::new`].
    pub fn from_json_str(raw: &str) -> Result<Self, RuleTableError> {
        let document: TaxonomyDocument =
            serde_json::from_str(raw).map_err(|source| RuleTableError::Parse { source })?;
        Self::try_from(document)
    }

    fn assemble(options: Vec<OptionDefinition>, compounds: BTreeMap<String, Vec<String>>) -> Self {
        let mut indexed = BTreeMap::new();
        let mut universal = BTreeSet::new();
        let mut by_flag: BTreeMap<FeatureFlag, BTreeSet<String>> = BTreeMap::new();
        for option in options {
            let id = canonical(&option.id);
            if option.is_universal {
                universal.insert(id.clone());
            } else {
                for flag in &option.unlocking_flags {
                    by_flag.entry(*flag).or_default().insert(id.clone());
                }
            }
            indexed.insert(
                id.clone(),
                OptionDefinition {
                    id,
                    ..option
                },
            );
        }
        let expanded_compounds = compounds
            .into_iter()
            .map(|(token, targets)| {
                let mut expanded: Vec<String> = Vec::with_capacity(targets.len());
                for target in targets.iter().map(|t| canonical(t)) {
                    if !expanded.contains(&target) {
                        expanded.push(target);
                    }
                }
                (canonical(&token), expanded)
            })
            .collect();
        Self {
            options: indexed,
            compounds: expanded_compounds,
            universal,
            by_flag,
        }
    }

    /// Look up a canonical option.
    #[must_use]
    pub fn option(&self, id: &str) -> Option<&OptionDefinition> {
        self.options.get(id)
    }

    /// Whether `id` names a canonical option.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.options.contains_key(id)
    }

    /// Whether `id` is a universal option.
    #[must_use]
    pub fn is_universal(&self, id: &str) -> bool {
        self.universal.contains(id)
    }

    /// All universal options.
    #[must_use]
    pub const fn universal_options(&self) -> &BTreeSet<String> {
        &self.universal
    }

    /// Non-universal options unlocked by `flag`.
    #[must_use]
    pub fn options_for_flag(&self, flag: FeatureFlag) -> &BTreeSet<String> {
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.by_flag.get(&flag).unwrap_or(&EMPTY)
    }

    /// Expansion of a compound token, if `token` is one.
    #[must_use]
    pub fn compound(&self, token: &str) -> Option<&[String]> {
        self.compounds.get(token).map(Vec::as_slice)
    }

    /// Iterate over every canonical option.
    pub fn options(&self) -> impl Iterator<Item = &OptionDefinition> {
        self.options.values()
    }

    /// Number of canonical options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether the taxonomy defines no options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// The taxonomy shipped with the engine.
    #[must_use]
    pub fn builtin() -> Self {
        use FeatureFlag::{
            Coastal, ColdClimate, Desert, Forest, GolfCourses, HikingTrails, Island, Lake,
            Marina, Mountain, Plains, River, SkiResorts, TennisCourts, Urban, Valley,
        };

        let gated: [(&str, &[FeatureFlag]); 34] = [
            ("surfing", &[Coastal]),
            ("swimming_ocean", &[Coastal, Island]),
            ("snorkeling", &[Coastal, Island]),
            ("scuba_diving", &[Coastal, Island]),
            ("beach_volleyball", &[Coastal, Island]),
            ("paddleboarding", &[Coastal, Lake]),
            ("sailing", &[Coastal, Island, Lake, Marina]),
            ("boating", &[Coastal, Lake, Marina]),
            ("kayaking", &[Coastal, Lake, River]),
            ("canoeing", &[Lake, River]),
            ("fishing", &[Coastal, Lake, River]),
            ("skiing", &[SkiResorts, Mountain]),
            ("snowboarding", &[SkiResorts]),
            ("snowshoeing", &[ColdClimate, Mountain]),
            ("ice_skating", &[ColdClimate]),
            ("hiking", &[Mountain, Valley, Forest, HikingTrails]),
            ("mountain_biking", &[Mountain, Forest, HikingTrails]),
            ("rock_climbing", &[Mountain, Desert]),
            ("birdwatching", &[Forest, Lake, River, Plains]),
            ("horseback_riding", &[Plains, Valley, Desert]),
            ("stargazing", &[Desert, Plains, Mountain]),
            ("wine_tasting", &[Valley]),
            ("golf", &[GolfCourses]),
            ("tennis", &[TennisCourts]),
            ("pickleball", &[TennisCourts]),
            ("badminton", &[TennisCourts, Urban]),
            ("museums", &[Urban]),
            ("theater", &[Urban]),
            ("cultural_events", &[Urban]),
            ("fine_dining", &[Urban]),
            ("nightlife", &[Urban]),
            ("shopping", &[Urban]),
            ("live_music", &[Urban]),
            ("farmers_markets", &[Plains, Valley]),
        ];
        let universal = [
            "walking",
            "cycling",
            "swimming",
            "cooking",
            "gardening",
            "reading",
            "photography",
            "yoga",
            "fitness",
            "volunteering",
            "arts_crafts",
            "board_games",
            "music",
        ];
        let compounds: [(&str, &[&str]); 7] = [
            ("walking_cycling", &["walking", "cycling", "hiking", "mountain_biking"]),
            ("golf_tennis", &["golf", "tennis", "pickleball", "badminton"]),
            (
                "water_sports",
                &["swimming_ocean", "surfing", "snorkeling", "scuba_diving", "paddleboarding", "beach_volleyball"],
            ),
            ("water_crafts", &["sailing", "boating", "kayaking", "canoeing", "fishing"]),
            ("winter_sports", &["skiing", "snowboarding", "snowshoeing", "ice_skating"]),
            ("culture_arts", &["museums", "theater", "cultural_events", "arts_crafts"]),
            ("nature", &["hiking", "birdwatching", "gardening", "stargazing"]),
        ];

        let options = gated
            .iter()
            .map(|(id, flags)| OptionDefinition {
                id: (*id).to_owned(),
                is_universal: false,
                unlocking_flags: flags.iter().copied().collect(),
            })
            .chain(universal.iter().map(|id| OptionDefinition {
                id: (*id).to_owned(),
                is_universal: true,
                unlocking_flags: BTreeSet::new(),
            }))
            .collect();
        let compound_table = compounds
            .iter()
            .map(|(token, targets)| {
                (
                    (*token).to_owned(),
                    targets.iter().map(|t| (*t).to_owned()).collect(),
                )
            })
            .collect();
        Self::assemble(options, compound_table)
    }
}

impl Default for OptionTaxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<TaxonomyDocument> for OptionTaxonomy {
    type Error = RuleTableError;

    fn try_from(document: TaxonomyDocument) -> Result<Self, Self::Error> {
        Self::new(document.options, document.compounds)
    }
}

impl From<OptionTaxonomy> for TaxonomyDocument {
    fn from(taxonomy: OptionTaxonomy) -> Self {
        Self {
            options: taxonomy.options.into_values().collect(),
            compounds: taxonomy.compounds,
        }
    }
}

fn canonical(raw: &str) -> String {
    raw.trim().to_lowercase()
}
