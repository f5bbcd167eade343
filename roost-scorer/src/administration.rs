//! Administration compatibility: healthcare, safety, governance, visas and
//! environmental health.
//!
//! Service preferences are minimum quality levels. `good` demands a high
//! rating and falls off steeply below it, `basic` is satisfied early, and
//! `functional` scales with the rating.

use roost_core::{
    AdministrationPreferences, Category, CategoryScore, CategoryScorer, Location,
    NormalizedPreferences, QualityLevel, ScorerError, ScoringContext,
};

use crate::tally::{NEUTRAL_FRACTION, Tally, fraction_of, usable};

const HEALTHCARE_POINTS: u32 = 30;
const SAFETY_POINTS: u32 = 25;
const GOVERNMENT_POINTS: u32 = 15;
const STABILITY_POINTS: u32 = 10;
const VISA_POINTS: u32 = 10;
const ENVIRONMENT_POINTS: u32 = 10;

/// Fraction of a service sub-factor earned for `level` given a 0-10 rating.
#[expect(clippy::float_arithmetic, reason = "proportional credit for functional services")]
fn service_fraction(level: QualityLevel, rating: f64) -> f64 {
    let bounded = rating.clamp(0.0, 10.0);
    match level {
        QualityLevel::Good => match bounded {
            r if r >= 7.0 => 1.0,
            r if r >= 6.0 => 0.85,
            r if r >= 5.0 => 0.65,
            r if r >= 4.0 => 0.4,
            _ => 0.15,
        },
        QualityLevel::Functional => bounded / 10.0,
        QualityLevel::Basic => match bounded {
            r if r >= 4.0 => 1.0,
            r if r >= 3.0 => 0.7,
            r if r >= 2.0 => 0.4,
            _ => 0.15,
        },
    }
}

/// Scores public services and legal access.
///
/// Points: healthcare 30, safety 25, government efficiency 15, political
/// stability 10, visa access 10, environmental health 10.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdministrationScorer;

impl CategoryScorer for AdministrationScorer {
    fn category(&self) -> Category {
        Category::Administration
    }

    fn score(
        &self,
        preferences: &NormalizedPreferences,
        location: &Location,
        _context: &ScoringContext,
    ) -> Result<CategoryScore, ScorerError> {
        let wanted = &preferences.administration;
        if !wanted.has_any() {
            return Ok(CategoryScore::open("Open to any administration"));
        }
        let mut tally = Tally::new(Category::Administration);
        let services = [
            (
                "Healthcare",
                HEALTHCARE_POINTS,
                wanted.healthcare,
                location.healthcare_score.map(Rating::OutOfTen),
                "healthcare_score",
            ),
            (
                "Safety",
                SAFETY_POINTS,
                wanted.safety,
                location.safety_score.map(Rating::OutOfTen),
                "safety_score",
            ),
            (
                "Government efficiency",
                GOVERNMENT_POINTS,
                wanted.government_efficiency,
                location
                    .government_efficiency_rating
                    .map(Rating::OutOfHundred),
                "government_efficiency_rating",
            ),
            (
                "Political stability",
                STABILITY_POINTS,
                wanted.political_stability,
                location.political_stability_rating.map(Rating::OutOfHundred),
                "political_stability_rating",
            ),
        ];
        for (name, max, level, rating, field) in services {
            score_service(&mut tally, name, max, level, rating, field);
        }
        score_visa(&mut tally, wanted, location);
        score_environment(&mut tally, wanted, location);
        Ok(tally.finish())
    }
}

#[derive(Debug, Clone, Copy)]
enum Rating {
    OutOfTen(f64),
    OutOfHundred(f64),
}

impl Rating {
    #[expect(clippy::float_arithmetic, reason = "rescale 0-100 ratings to 0-10")]
    fn out_of_ten(self) -> Option<f64> {
        match self {
            Self::OutOfTen(value) => usable(value),
            Self::OutOfHundred(value) => usable(value).map(|v| v / 10.0),
        }
    }
}

fn score_service(
    tally: &mut Tally,
    name: &str,
    max: u32,
    required: Option<QualityLevel>,
    rating: Option<Rating>,
    field: &str,
) {
    let Some(level) = required else {
        tally.open(max, format!("Flexible on {}", name.to_lowercase()));
        return;
    };
    let Some(raw) = rating else {
        tally.missing(max, NEUTRAL_FRACTION, field);
        return;
    };
    let Some(score) = raw.out_of_ten() else {
        tally.hazard(max, NEUTRAL_FRACTION, format!("{field} is not a usable rating"));
        return;
    };
    tally.award(
        max,
        fraction_of(max, service_fraction(level, score)),
        format!("{name} {score:.1}/10 against {level} requirement"),
    );
}

fn score_visa(tally: &mut Tally, wanted: &AdministrationPreferences, location: &Location) {
    let Some(citizenship) = wanted.citizenship.as_deref() else {
        tally.open(VISA_POINTS, "Flexible on visa access");
        return;
    };
    if location
        .country
        .as_deref()
        .is_some_and(|country| country.trim().eq_ignore_ascii_case(citizenship))
    {
        tally.award(VISA_POINTS, VISA_POINTS, "No visa needed for citizens");
        return;
    }
    if Location::has_tag(&location.visa_on_arrival_countries, citizenship) {
        tally.award(VISA_POINTS, VISA_POINTS, "Visa on arrival");
        return;
    }
    match location.retirement_visa_available {
        Some(true) => tally.award(VISA_POINTS, 7, "Retirement visa available"),
        Some(false) => tally.award(VISA_POINTS, 2, "No retirement visa route"),
        None if location.visa_on_arrival_countries.is_empty() => {
            tally.missing(VISA_POINTS, NEUTRAL_FRACTION, "retirement_visa_available");
        }
        None => tally.award(VISA_POINTS, 2, "No visa on arrival"),
    }
}

fn score_environment(tally: &mut Tally, wanted: &AdministrationPreferences, location: &Location) {
    if !wanted.environmental_health_sensitive {
        tally.open(ENVIRONMENT_POINTS, "Flexible on air quality");
        return;
    }
    let Some(raw) = location.air_quality_index else {
        tally.missing(ENVIRONMENT_POINTS, NEUTRAL_FRACTION, "air_quality_index");
        return;
    };
    let Some(index) = usable(raw) else {
        tally.hazard(
            ENVIRONMENT_POINTS,
            NEUTRAL_FRACTION,
            "air_quality_index is not a usable value",
        );
        return;
    };
    let fraction = match index {
        i if i <= 50.0 => 1.0,
        i if i <= 100.0 => 0.6,
        i if i <= 150.0 => 0.3,
        _ => 0.0,
    };
    tally.award(
        ENVIRONMENT_POINTS,
        fraction_of(ENVIRONMENT_POINTS, fraction),
        format!("Air quality index {index:.0}"),
    );
}
