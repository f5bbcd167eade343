//! Degradation notes attached to scores.
//!
//! Scoring never fails outright. When input is malformed or incomplete the
//! engine degrades the affected sub-factor and records a [`Diagnostic`] that
//! ends up in [`ScoreResult::warnings`](crate::ScoreResult::warnings).

use crate::Category;

/// Classification of a degradation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A preference field had an unexpected shape and was treated as absent.
    InvalidPreferenceShape,
    /// A location attribute needed for a sub-factor was missing or null.
    MissingLocationAttribute,
    /// A numeric attribute was NaN, infinite, negative or zero where a
    /// divisor was needed.
    ArithmeticHazard,
    /// A category scorer returned an error or panicked.
    ScorerFailure,
}

impl DiagnosticKind {
    /// Short label used when rendering the diagnostic.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidPreferenceShape => "invalid preference",
            Self::MissingLocationAttribute => "missing data",
            Self::ArithmeticHazard => "unusable value",
            Self::ScorerFailure => "scorer failure",
        }
    }
}

/// A single degradation note.
///
/// # Examples
/// ```
/// use roost_core::{Category, Diagnostic};
///
/// let note = Diagnostic::missing(Category::Budget, "cost_of_living_usd");
/// assert_eq!(
///     note.to_string(),
///     "budget: missing data: cost_of_living_usd"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What kind of degradation occurred.
    pub kind: DiagnosticKind,
    /// Category the note belongs to, when known.
    pub category: Option<Category>,
    /// Human-readable detail.
    pub message: String,
}

impl Diagnostic {
    /// Construct a diagnostic.
    #[must_use]
    pub fn new(kind: DiagnosticKind, category: Option<Category>, message: impl Into<String>) -> Self {
        Self {
            kind,
            category,
            message: message.into(),
        }
    }

    /// A location attribute is missing.
    #[must_use]
    pub fn missing(category: Category, attribute: impl Into<String>) -> Self {
        Self::new(
            DiagnosticKind::MissingLocationAttribute,
            Some(category),
            attribute,
        )
    }

    /// A numeric value could not be used safely.
    #[must_use]
    pub fn hazard(category: Category, detail: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::ArithmeticHazard, Some(category), detail)
    }

    /// A preference field was malformed.
    #[must_use]
    pub fn invalid_preference(category: Option<Category>, detail: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::InvalidPreferenceShape, category, detail)
    }

    /// A scorer failed and its category was scored as zero.
    #[must_use]
    pub fn scorer_failure(category: Category, detail: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::ScorerFailure, Some(category), detail)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.category {
            Some(category) => write!(f, "{category}: {}: {}", self.kind.as_str(), self.message),
            None => write!(f, "{}: {}", self.kind.as_str(), self.message),
        }
    }
}
