//! Points ledger shared by the category scorers.

use roost_core::{Category, CategoryScore, Diagnostic, Factor};

/// Fraction of a sub-factor awarded when the location lacks the data needed
/// to judge it.
pub(crate) const NEUTRAL_FRACTION: f64 = 0.5;

/// Accumulates earned and available points for one category.
///
/// Every sub-factor adds its full point value to `available`, whatever the
/// outcome, so the normalized score always divides by the category total.
pub(crate) struct Tally {
    category: Category,
    earned: u32,
    available: u32,
    factors: Vec<Factor>,
    warnings: Vec<Diagnostic>,
}

impl Tally {
    pub(crate) const fn new(category: Category) -> Self {
        Self {
            category,
            earned: 0,
            available: 0,
            factors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Full points for a sub-factor the user left unset.
    pub(crate) fn open(&mut self, max: u32, factor: impl Into<String>) {
        self.award(max, max, factor);
    }

    /// Record an evaluated sub-factor.
    pub(crate) fn award(&mut self, max: u32, points: u32, factor: impl Into<String>) {
        let bounded = points.min(max);
        self.earned = self.earned.saturating_add(bounded);
        self.available = self.available.saturating_add(max);
        self.factors
            .push(Factor::new(factor, i32::try_from(bounded).unwrap_or(i32::MAX)));
    }

    /// Record a sub-factor the location has no data for.
    pub(crate) fn missing(&mut self, max: u32, fraction: f64, attribute: &str) {
        self.partial(max, fraction);
        self.warnings.push(Diagnostic::missing(self.category, attribute));
    }

    /// Record a sub-factor whose data was present but unusable.
    pub(crate) fn hazard(&mut self, max: u32, fraction: f64, detail: impl Into<String>) {
        self.partial(max, fraction);
        self.warnings.push(Diagnostic::hazard(self.category, detail));
    }

    /// Attach a note without changing points.
    pub(crate) fn note(&mut self, diagnostic: Diagnostic) {
        self.warnings.push(diagnostic);
    }

    fn partial(&mut self, max: u32, fraction: f64) {
        self.earned = self.earned.saturating_add(fraction_of(max, fraction));
        self.available = self.available.saturating_add(max);
    }

    pub(crate) fn finish(self) -> CategoryScore {
        CategoryScore::from_points(
            f64::from(self.earned),
            f64::from(self.available),
            self.factors,
            self.warnings,
        )
    }
}

/// `fraction` of `max` points, rounded. Fractions are clamped to `0..=1`
/// and non-finite fractions award nothing.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the clamped product never exceeds max"
)]
pub(crate) fn fraction_of(max: u32, fraction: f64) -> u32 {
    if !fraction.is_finite() {
        return 0;
    }
    (f64::from(max) * fraction.clamp(0.0, 1.0)).round() as u32
}

/// A usable non-negative measurement, or `None` for NaN, infinite or
/// negative values.
pub(crate) fn usable(value: f64) -> Option<f64> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// A plausible air temperature in °C, or `None` for non-finite values.
pub(crate) fn usable_temperature(value: f64) -> Option<f64> {
    (value.is_finite() && (-90.0..=60.0).contains(&value)).then_some(value)
}
