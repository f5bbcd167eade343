//! Errors raised while loading authored rule tables.

use thiserror::Error;

/// Errors returned when an [`OptionTaxonomy`](crate::OptionTaxonomy) or
/// [`AdjacencyRules`](crate::AdjacencyRules) document is invalid.
#[derive(Debug, Error)]
pub enum RuleTableError {
    /// The document was not valid JSON for the expected shape.
    #[error("failed to parse rule table")]
    Parse {
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The same option identifier was defined twice.
    #[error("option '{option}' is defined more than once")]
    DuplicateOption {
        /// Offending option identifier.
        option: String,
    },
    /// A compound token expands to an option the taxonomy does not define.
    #[error("compound '{compound}' expands to unknown option '{option}'")]
    UnknownCompoundTarget {
        /// Compound token.
        compound: String,
        /// Missing option identifier.
        option: String,
    },
    /// A compound token shares its name with a canonical option.
    #[error("compound '{compound}' shadows a canonical option")]
    CompoundShadowsOption {
        /// Compound token.
        compound: String,
    },
    /// An adjacency credit was outside `0.0..=1.0`.
    #[error("adjacency credit for {dimension} must be within 0.0..=1.0, got {credit}")]
    InvalidCredit {
        /// Which credit was invalid.
        dimension: &'static str,
        /// Supplied value.
        credit: f64,
    },
}
