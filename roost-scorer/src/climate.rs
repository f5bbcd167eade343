//! Climate compatibility: temperatures, humidity, sunshine, rainfall and
//! seasonal emphasis.
//!
//! Summer and winter prefer measured averages. A preference band maps to a
//! temperature range and the score falls off with distance outside it. When
//! no average is recorded, the location's band label is matched gradually
//! instead.

use roost_core::{
    AdjacencyMap, Category, CategoryScore, CategoryScorer, Diagnostic, Location,
    NormalizedPreferences, ScorerError, ScoringContext,
};

use crate::gradual::{GradualMatcher, MatchKind};
use crate::tally::{NEUTRAL_FRACTION, Tally, fraction_of, usable_temperature};

const SUMMER_POINTS: u32 = 20;
const WINTER_POINTS: u32 = 20;
const HUMIDITY_POINTS: u32 = 15;
const SUNSHINE_POINTS: u32 = 15;
const PRECIPITATION_POINTS: u32 = 15;
const SEASONAL_POINTS: u32 = 15;
const FLEXIBLE_SEASONS: &str = "Flexible on seasonal preferences";

/// Inclusive temperature band in °C; `None` leaves a side unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TemperatureRange {
    min: Option<f64>,
    max: Option<f64>,
}

const fn range(min: Option<f64>, max: Option<f64>) -> TemperatureRange {
    TemperatureRange { min, max }
}

fn summer_range(band: &str) -> Option<TemperatureRange> {
    match band {
        "mild" => Some(range(Some(15.0), Some(24.0))),
        "warm" => Some(range(Some(22.0), Some(32.0))),
        "hot" => Some(range(Some(28.0), None)),
        _ => None,
    }
}

fn winter_range(band: &str) -> Option<TemperatureRange> {
    match band {
        "cold" => Some(range(None, Some(5.0))),
        "cool" => Some(range(Some(3.0), Some(15.0))),
        "mild" => Some(range(Some(12.0), None)),
        _ => None,
    }
}

/// Fraction of points for a temperature relative to a preferred range.
///
/// Inside the range earns everything; beyond it the credit steps down at
/// 2, 5 and 10 degrees.
#[expect(clippy::float_arithmetic, reason = "distance outside a temperature range")]
fn temperature_fit(temperature: f64, range: TemperatureRange) -> f64 {
    let below = range.min.map_or(0.0, |min| (min - temperature).max(0.0));
    let above = range.max.map_or(0.0, |max| (temperature - max).max(0.0));
    let distance = below.max(above);
    match distance {
        d if d <= 0.0 => 1.0,
        d if d <= 2.0 => 0.8,
        d if d <= 5.0 => 0.5,
        d if d <= 10.0 => 0.2,
        _ => 0.0,
    }
}

/// Scores weather against climate preferences.
///
/// Points: summer 20, winter 20, humidity 15, sunshine 15, precipitation 15,
/// seasonal emphasis 15.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClimateScorer;

impl CategoryScorer for ClimateScorer {
    fn category(&self) -> Category {
        Category::Climate
    }

    fn score(
        &self,
        preferences: &NormalizedPreferences,
        location: &Location,
        context: &ScoringContext,
    ) -> Result<CategoryScore, ScorerError> {
        let wanted = &preferences.climate;
        if !wanted.has_any() {
            return Ok(CategoryScore::open("Open to any climate"));
        }
        let rules = &context.adjacency;
        let matcher = GradualMatcher::with_credit(rules.credit.climate);
        let mut tally = Tally::new(Category::Climate);

        score_season(
            &mut tally,
            &matcher,
            Season {
                name: "Summer",
                max: SUMMER_POINTS,
                wanted: &wanted.summer,
                temperature: location.avg_temp_summer,
                temperature_field: "avg_temp_summer",
                label: location.summer_climate.as_deref(),
                ranges: summer_range,
                map: &rules.summer,
            },
        );
        score_season(
            &mut tally,
            &matcher,
            Season {
                name: "Winter",
                max: WINTER_POINTS,
                wanted: &wanted.winter,
                temperature: location.avg_temp_winter,
                temperature_field: "avg_temp_winter",
                label: location.winter_climate.as_deref(),
                ranges: winter_range,
                map: &rules.winter,
            },
        );
        score_band(
            &mut tally,
            &matcher,
            Band {
                name: "Humidity",
                max: HUMIDITY_POINTS,
                wanted: &wanted.humidity,
                label: location.humidity_level.as_deref(),
                field: "humidity_level",
                map: &rules.humidity,
            },
        );
        score_band(
            &mut tally,
            &matcher,
            Band {
                name: "Sunshine",
                max: SUNSHINE_POINTS,
                wanted: &wanted.sunshine,
                label: location.sunshine_level.as_deref(),
                field: "sunshine_level",
                map: &rules.sunshine,
            },
        );
        score_band(
            &mut tally,
            &matcher,
            Band {
                name: "Precipitation",
                max: PRECIPITATION_POINTS,
                wanted: &wanted.precipitation,
                label: location.precipitation_level.as_deref(),
                field: "precipitation_level",
                map: &rules.precipitation,
            },
        );
        score_seasonal(&mut tally, wanted.seasonal.as_deref(), location);
        Ok(tally.finish())
    }
}

struct Season<'a> {
    name: &'static str,
    max: u32,
    wanted: &'a [String],
    temperature: Option<f64>,
    temperature_field: &'static str,
    label: Option<&'a str>,
    ranges: fn(&str) -> Option<TemperatureRange>,
    map: &'a AdjacencyMap,
}

struct Band<'a> {
    name: &'static str,
    max: u32,
    wanted: &'a [String],
    label: Option<&'a str>,
    field: &'static str,
    map: &'a AdjacencyMap,
}

fn score_season(tally: &mut Tally, matcher: &GradualMatcher, season: Season<'_>) {
    if season.wanted.is_empty() {
        tally.open(season.max, format!("Flexible on {}", season.name.to_lowercase()));
        return;
    }
    let measured = match season.temperature {
        Some(raw) => {
            let usable = usable_temperature(raw);
            if usable.is_none() {
                tally.note(Diagnostic::hazard(
                    Category::Climate,
                    format!("{} is not a finite temperature", season.temperature_field),
                ));
            }
            usable
        }
        None => None,
    };
    if let Some(temperature) = measured {
        let best = season
            .wanted
            .iter()
            .filter_map(|band| (season.ranges)(band).map(|r| (band, temperature_fit(temperature, r))))
            .max_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((band, fit)) = best {
            let points = fraction_of(season.max, fit);
            tally.award(
                season.max,
                points,
                format!("{} average {temperature:.0}°C vs {band} preference", season.name),
            );
            return;
        }
    }
    if let Some(label) = season.label {
        award_gradual(tally, matcher, season.name, season.max, season.wanted, label, season.map);
        return;
    }
    tally.missing(season.max, NEUTRAL_FRACTION, season.temperature_field);
}

fn score_band(tally: &mut Tally, matcher: &GradualMatcher, band: Band<'_>) {
    if band.wanted.is_empty() {
        tally.open(band.max, format!("Flexible on {}", band.name.to_lowercase()));
        return;
    }
    match band.label {
        Some(label) => award_gradual(tally, matcher, band.name, band.max, band.wanted, label, band.map),
        None => tally.missing(band.max, NEUTRAL_FRACTION, band.field),
    }
}

fn award_gradual(
    tally: &mut Tally,
    matcher: &GradualMatcher,
    name: &str,
    max: u32,
    wanted: &[String],
    label: &str,
    map: &AdjacencyMap,
) {
    let best = matcher.best_of(wanted, label, max, map);
    let factor = match (best.kind, best.description) {
        (MatchKind::Empty, _) | (_, None) => format!("{name}: no comparable data"),
        (_, Some(description)) => format!("{name}: {description}"),
    };
    tally.award(max, best.points, factor);
}

fn score_seasonal(tally: &mut Tally, seasonal: Option<&str>, location: &Location) {
    let Some(preference) = seasonal else {
        tally.open(SEASONAL_POINTS, FLEXIBLE_SEASONS);
        return;
    };
    let fits = match preference {
        "no_specific_preference" | "flexible" | "any" => {
            tally.open(SEASONAL_POINTS, FLEXIBLE_SEASONS);
            return;
        }
        "warm_all_year" => both(warm_summer(location), mild_winter(location)),
        "summer_focused" => warm_summer(location),
        "winter_focused" | "cool_seasons" => cool_winter(location),
        "all_seasons" => distinct_seasons(location),
        unknown => {
            tally.open(SEASONAL_POINTS, FLEXIBLE_SEASONS);
            tally.note(Diagnostic::invalid_preference(
                Some(Category::Climate),
                format!("unknown seasonal preference '{unknown}' ignored"),
            ));
            return;
        }
    };
    match fits {
        Some(true) => tally.award(
            SEASONAL_POINTS,
            SEASONAL_POINTS,
            format!("Seasonal preference met: {preference}"),
        ),
        Some(false) => tally.award(
            SEASONAL_POINTS,
            0,
            format!("Seasonal preference not met: {preference}"),
        ),
        None => tally.missing(SEASONAL_POINTS, NEUTRAL_FRACTION, "seasonal temperatures"),
    }
}

fn both(first: Option<bool>, second: Option<bool>) -> Option<bool> {
    Some(first? && second?)
}

fn label_in(label: Option<&str>, accepted: &[&str]) -> Option<bool> {
    label.map(|value| accepted.contains(&value.trim().to_lowercase().as_str()))
}

fn warm_summer(location: &Location) -> Option<bool> {
    location
        .avg_temp_summer
        .and_then(usable_temperature)
        .map(|t| t >= 22.0)
        .or_else(|| label_in(location.summer_climate.as_deref(), &["warm", "hot"]))
}

fn mild_winter(location: &Location) -> Option<bool> {
    location
        .avg_temp_winter
        .and_then(usable_temperature)
        .map(|t| t >= 12.0)
        .or_else(|| label_in(location.winter_climate.as_deref(), &["mild"]))
}

fn cool_winter(location: &Location) -> Option<bool> {
    location
        .avg_temp_winter
        .and_then(usable_temperature)
        .map(|t| t <= 15.0)
        .or_else(|| label_in(location.winter_climate.as_deref(), &["cold", "cool"]))
}

#[expect(clippy::float_arithmetic, reason = "seasonal temperature swing")]
fn distinct_seasons(location: &Location) -> Option<bool> {
    let summer = location.avg_temp_summer.and_then(usable_temperature);
    let winter = location.avg_temp_winter.and_then(usable_temperature);
    if let (Some(hot), Some(cold)) = (summer, winter) {
        return Some(hot - cold >= 10.0);
    }
    both(
        label_in(location.summer_climate.as_deref(), &["warm", "hot"]),
        label_in(location.winter_climate.as_deref(), &["cold", "cool"]),
    )
}
