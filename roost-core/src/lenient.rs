//! Forgiving `serde` adapters for location attributes.
//!
//! Location records come from hand-maintained tables where numbers are
//! sometimes strings and lists are sometimes scalars. These adapters coerce
//! what they can and fall back to "absent" for everything else.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberLike {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextLike {
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListLike {
    Many(Vec<TextLike>),
    One(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagLike {
    Flag(bool),
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Deserialize an optional number from a number, numeric string or null.
pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberLike>::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberLike::Number(value)) => Some(value),
        Some(NumberLike::Text(text)) => parse_number(&text),
        Some(NumberLike::Other(_)) | None => None,
    })
}

/// Deserialize an optional, non-blank string.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<TextLike>::deserialize(deserializer)?;
    Ok(match raw {
        Some(TextLike::Text(value)) => non_blank(&value),
        Some(TextLike::Other(_)) | None => None,
    })
}

/// Deserialize a list of strings from an array, a single string or null.
///
/// Single strings containing commas are split, matching how region tags are
/// stored in flat tables.
pub(crate) fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<ListLike>::deserialize(deserializer)?;
    Ok(match raw {
        Some(ListLike::Many(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                TextLike::Text(value) => non_blank(&value),
                TextLike::Other(_) => None,
            })
            .collect(),
        Some(ListLike::One(value)) => value.split(',').filter_map(non_blank).collect(),
        Some(ListLike::Other(_)) | None => Vec::new(),
    })
}

/// Deserialize an optional boolean from a bool, 0/1 or yes/no text.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<FlagLike>::deserialize(deserializer)?;
    Ok(match raw {
        Some(FlagLike::Flag(value)) => Some(value),
        Some(FlagLike::Number(value)) => Some(value != 0.0),
        Some(FlagLike::Text(value)) => match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        Some(FlagLike::Other(_)) | None => None,
    })
}

fn parse_number(text: &str) -> Option<f64> {
    let digits: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' ' | '%'))
        .collect();
    digits.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
