//! Canonical hashing of normalized preferences and scoring rules.

use roost_core::{NormalizedPreferences, ScoringRules};
use serde::Serialize;
use xxhash_rust::xxh64::Xxh64;

use crate::CacheError;

/// Hash `preferences` and the `rules` they are scored under into a
/// 16-digit hex string.
///
/// Inputs are serialized through `serde_json::Value`, whose maps keep keys
/// sorted, so the digest does not depend on field order. Normalized lists
/// are already sorted and deduplicated. Normalization warnings are folded
/// in because they appear in the scored result. The rules cover the
/// taxonomy, adjacency tables, category weights and factor count, so a
/// result is only reused under the exact configuration that produced it.
///
/// # Errors
/// Returns [`CacheError::Hash`] when either input cannot be serialized.
///
/// # Examples
/// ```
/// use roost_cache::validity_hash;
/// use roost_core::NormalizedPreferences;
/// use roost_scorer::ScoreAggregator;
///
/// let aggregator = ScoreAggregator::default();
/// let rules = aggregator.rules().expect("built-in scorers");
/// let hash = validity_hash(&NormalizedPreferences::default(), &rules).expect("hash");
/// assert_eq!(hash.len(), 16);
/// ```
pub fn validity_hash(
    preferences: &NormalizedPreferences,
    rules: &ScoringRules<'_>,
) -> Result<String, CacheError> {
    let mut hasher = Xxh64::new(0);
    hasher.update(&canonical_json(preferences)?);
    for warning in &preferences.warnings {
        hasher.update(b"\n");
        hasher.update(warning.to_string().as_bytes());
    }
    hasher.update(b"\0");
    hasher.update(&canonical_json(rules)?);
    Ok(format!("{:016x}", hasher.digest()))
}

fn canonical_json(input: &impl Serialize) -> Result<Vec<u8>, CacheError> {
    let value = serde_json::to_value(input).map_err(|source| CacheError::Hash { source })?;
    serde_json::to_vec(&value).map_err(|source| CacheError::Hash { source })
}
