//! Budget compatibility: living costs, rent, healthcare costs and taxes.
//!
//! Every figure is checked before use. Zero, negative, non-finite and
//! absent figures degrade to neutral credit with a warning; the scorer
//! never fails on bad numbers.

use roost_core::{
    BudgetPreferences, Category, CategoryScore, CategoryScorer, Location, NormalizedPreferences,
    ScorerError, ScoringContext,
};

use crate::tally::{NEUTRAL_FRACTION, Tally, fraction_of, usable};

const FIT_POINTS: u32 = 55;
const RENT_POINTS: u32 = 15;
const HEALTHCARE_POINTS: u32 = 10;
const TAX_POINTS: u32 = 20;
/// Neutral share of the budget-fit sub-factor (16 of 55 points).
const FIT_NEUTRAL_FRACTION: f64 = 0.29;
/// Points for a tax haven or untaxed foreign income.
const TAX_BONUS: u32 = 2;

/// Budget-to-cost ratio bands and the points each earns.
const FIT_BANDS: [(f64, u32); 7] = [
    (2.0, 55),
    (1.5, 51),
    (1.2, 47),
    (1.0, 43),
    (0.9, 35),
    (0.8, 24),
    (0.7, 12),
];
const FIT_FLOOR: u32 = 4;

/// Rate thresholds (percent) for 5, 4, 3 and 2 out of 5; anything above the
/// last threshold rates 1.
const INCOME_TAX_BANDS: [f64; 4] = [10.0, 20.0, 30.0, 40.0];
const PROPERTY_TAX_BANDS: [f64; 4] = [1.0, 2.0, 3.0, 4.0];
const SALES_TAX_BANDS: [f64; 4] = [10.0, 17.0, 22.0, 27.0];

/// Scores affordability.
///
/// Points: monthly budget fit 55, rent 15, healthcare costs 10, taxes 20.
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetScorer;

impl CategoryScorer for BudgetScorer {
    fn category(&self) -> Category {
        Category::Budget
    }

    fn score(
        &self,
        preferences: &NormalizedPreferences,
        location: &Location,
        _context: &ScoringContext,
    ) -> Result<CategoryScore, ScorerError> {
        let wanted = &preferences.budget;
        if !wanted.has_any() {
            return Ok(CategoryScore::open("Open to any budget"));
        }
        let mut tally = Tally::new(Category::Budget);
        score_fit(&mut tally, wanted.total_monthly_budget, location);
        score_cap(
            &mut tally,
            Cap {
                name: "Rent",
                max: RENT_POINTS,
                field: "typical_rent_1bed",
            },
            wanted.max_monthly_rent,
            location.typical_rent_1bed,
        );
        score_cap(
            &mut tally,
            Cap {
                name: "Healthcare cost",
                max: HEALTHCARE_POINTS,
                field: "healthcare_cost_monthly",
            },
            wanted.monthly_healthcare_budget,
            location.healthcare_cost_monthly,
        );
        score_taxes(&mut tally, wanted, location);
        Ok(tally.finish())
    }
}

fn fit_points(ratio: f64) -> u32 {
    FIT_BANDS
        .iter()
        .find(|(threshold, _)| ratio >= *threshold)
        .map_or(FIT_FLOOR, |(_, points)| *points)
}

#[expect(clippy::float_arithmetic, reason = "budget-to-cost ratio")]
fn score_fit(tally: &mut Tally, wanted: Option<f64>, location: &Location) {
    let Some(raw_budget) = wanted else {
        tally.open(FIT_POINTS, "Flexible on overall budget");
        return;
    };
    let Some(budget) = usable(raw_budget).filter(|value| *value > 0.0) else {
        tally.hazard(
            FIT_POINTS,
            FIT_NEUTRAL_FRACTION,
            "total_monthly_budget is not a usable amount",
        );
        return;
    };
    let Some(raw_cost) = location.cost_of_living_usd else {
        tally.missing(FIT_POINTS, FIT_NEUTRAL_FRACTION, "cost_of_living_usd");
        return;
    };
    let Some(cost) = usable(raw_cost).filter(|value| *value > 0.0) else {
        tally.hazard(
            FIT_POINTS,
            FIT_NEUTRAL_FRACTION,
            "cost_of_living_usd is zero or not a usable amount",
        );
        return;
    };
    let ratio = budget / cost;
    if !ratio.is_finite() {
        tally.hazard(FIT_POINTS, FIT_NEUTRAL_FRACTION, "budget ratio overflowed");
        return;
    }
    tally.award(
        FIT_POINTS,
        fit_points(ratio),
        format!("Budget ${budget:.0} against cost of living ${cost:.0}"),
    );
}

#[derive(Clone, Copy)]
struct Cap {
    name: &'static str,
    max: u32,
    field: &'static str,
}

#[expect(clippy::float_arithmetic, reason = "80% tolerance on spending caps")]
fn score_cap(tally: &mut Tally, cap: Cap, wanted: Option<f64>, observed: Option<f64>) {
    let Some(raw_limit) = wanted else {
        tally.open(cap.max, format!("Flexible on {}", cap.name.to_lowercase()));
        return;
    };
    let Some(limit) = usable(raw_limit).filter(|value| *value > 0.0) else {
        tally.hazard(
            cap.max,
            NEUTRAL_FRACTION,
            format!("{} limit is not a usable amount", cap.name.to_lowercase()),
        );
        return;
    };
    let Some(raw_actual) = observed else {
        tally.missing(cap.max, NEUTRAL_FRACTION, cap.field);
        return;
    };
    let Some(actual) = usable(raw_actual) else {
        tally.hazard(
            cap.max,
            NEUTRAL_FRACTION,
            format!("{} is not a usable amount", cap.field),
        );
        return;
    };
    let fraction = if limit >= actual {
        1.0
    } else if limit >= actual * 0.8 {
        0.5
    } else {
        0.0
    };
    tally.award(
        cap.max,
        fraction_of(cap.max, fraction),
        format!("{} ${actual:.0} against limit ${limit:.0}", cap.name),
    );
}

/// Rate a tax percentage from 5 (low) to 1 (high).
fn tax_rating(rate: f64, bands: &[f64; 4]) -> u32 {
    let above = bands.iter().filter(|threshold| rate > **threshold).count();
    5_u32.saturating_sub(u32::try_from(above).unwrap_or(4))
}

#[expect(clippy::float_arithmetic, reason = "average of tax ratings")]
fn score_taxes(tally: &mut Tally, wanted: &BudgetPreferences, location: &Location) {
    if !wanted.is_tax_sensitive() {
        tally.open(TAX_POINTS, "Flexible on taxes");
        return;
    }
    let checks = [
        (
            wanted.income_tax_sensitive,
            location.income_tax_rate_pct,
            &INCOME_TAX_BANDS,
        ),
        (
            wanted.property_tax_sensitive,
            location.property_tax_rate_pct,
            &PROPERTY_TAX_BANDS,
        ),
        (
            wanted.sales_tax_sensitive,
            location.sales_tax_rate_pct,
            &SALES_TAX_BANDS,
        ),
    ];
    let ratings: Vec<u32> = checks
        .into_iter()
        .filter(|(sensitive, _, _)| *sensitive)
        .filter_map(|(_, rate, bands)| rate.and_then(usable).map(|r| tax_rating(r, bands)))
        .collect();
    if ratings.is_empty() {
        tally.missing(TAX_POINTS, NEUTRAL_FRACTION, "tax rates");
        return;
    }
    let total: u32 = ratings.iter().sum();
    let average = f64::from(total) / f64::from(u32::try_from(ratings.len()).unwrap_or(1));
    let mut points = fraction_of(16, average / 5.0);
    if location.tax_haven_status == Some(true) {
        points = points.saturating_add(TAX_BONUS);
    }
    if location.foreign_income_taxed == Some(false) {
        points = points.saturating_add(TAX_BONUS);
    }
    tally.award(
        TAX_POINTS,
        points,
        format!("Tax burden rated {average:.1}/5"),
    );
}
