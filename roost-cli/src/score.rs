//! Score command implementation for the Roost CLI.

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use log::warn;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roost_cache::{PreferenceVersionCache, SqliteEntryStore};
use roost_scorer::{
    AggregatorConfig, BatchConfig, BatchRequest, BatchScorer, CancellationToken,
    DEFAULT_MAX_CONCURRENCY, Page, Ranking, ScoreAggregator,
};
use serde::{Deserialize, Serialize};

use crate::inputs::{load_context, load_locations, load_preferences, require_existing, write_json};
use crate::{
    ARG_ADJACENCY, ARG_CACHE_DB, ARG_LIMIT, ARG_LOCATIONS, ARG_MAX_CONCURRENCY, ARG_OFFSET,
    ARG_PREFERENCES, ARG_TAXONOMY, ARG_USER_ID, CliError, ENV_LOCATIONS, ENV_PREFERENCES,
    ENV_USER_ID,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score every location in a JSON array against a preferences \
                 document and print the ranking as JSON. Rule tables default \
                 to the built-in taxonomy and adjacency rules. Passing \
                 --cache-db together with --user-id memoizes results in SQLite.",
    about = "Rank locations for a preferences document"
)]
#[ortho_config(prefix = "ROOST")]
pub(crate) struct ScoreArgs {
    /// Path to a JSON preferences document.
    #[arg(long = ARG_PREFERENCES, value_name = "path")]
    #[serde(default)]
    pub(crate) preferences: Option<Utf8PathBuf>,
    /// Path to a JSON array of locations.
    #[arg(long = ARG_LOCATIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) locations: Option<Utf8PathBuf>,
    /// Override the option taxonomy.
    #[arg(long = ARG_TAXONOMY, value_name = "path")]
    #[serde(default)]
    pub(crate) taxonomy: Option<Utf8PathBuf>,
    /// Override the adjacency rules.
    #[arg(long = ARG_ADJACENCY, value_name = "path")]
    #[serde(default)]
    pub(crate) adjacency: Option<Utf8PathBuf>,
    /// SQLite database used to memoize scores.
    #[arg(long = ARG_CACHE_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) cache_db: Option<Utf8PathBuf>,
    /// User the cached scores belong to.
    #[arg(long = ARG_USER_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) user_id: Option<String>,
    /// Number of scoring threads.
    #[arg(long = ARG_MAX_CONCURRENCY, value_name = "n")]
    #[serde(default)]
    pub(crate) max_concurrency: Option<usize>,
    /// Maximum number of ranked locations to print.
    #[arg(long = ARG_LIMIT, value_name = "n")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Number of ranked locations to skip.
    #[arg(long = ARG_OFFSET, value_name = "n")]
    #[serde(default)]
    pub(crate) offset: Option<usize>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Where memoized scores live and whom they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CacheConfig {
    /// SQLite database path.
    pub(crate) path: Utf8PathBuf,
    /// Owner of the cached entries.
    pub(crate) user_id: String,
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoreConfig {
    /// Preferences document.
    pub(crate) preferences: Utf8PathBuf,
    /// Locations array.
    pub(crate) locations: Utf8PathBuf,
    /// Optional taxonomy override.
    pub(crate) taxonomy: Option<Utf8PathBuf>,
    /// Optional adjacency override.
    pub(crate) adjacency: Option<Utf8PathBuf>,
    /// Score cache, when enabled.
    pub(crate) cache: Option<CacheConfig>,
    /// Scoring threads.
    pub(crate) max_concurrency: usize,
    /// Slice of the ranking to print.
    pub(crate) page: Page,
}

impl ScoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.preferences, ARG_PREFERENCES)?;
        require_existing(&self.locations, ARG_LOCATIONS)?;
        if let Some(path) = &self.taxonomy {
            require_existing(path, ARG_TAXONOMY)?;
        }
        if let Some(path) = &self.adjacency {
            require_existing(path, ARG_ADJACENCY)?;
        }
        Ok(())
    }
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let preferences = args.preferences.ok_or(CliError::MissingArgument {
            field: ARG_PREFERENCES,
            env: ENV_PREFERENCES,
        })?;
        let locations = args.locations.ok_or(CliError::MissingArgument {
            field: ARG_LOCATIONS,
            env: ENV_LOCATIONS,
        })?;
        let cache = match (args.cache_db, args.user_id) {
            (Some(path), Some(user_id)) => Some(CacheConfig { path, user_id }),
            (Some(_), None) => {
                return Err(CliError::MissingArgument {
                    field: ARG_USER_ID,
                    env: ENV_USER_ID,
                });
            }
            (None, _) => None,
        };

        Ok(Self {
            preferences,
            locations,
            taxonomy: args.taxonomy,
            adjacency: args.adjacency,
            cache,
            max_concurrency: args.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY),
            page: Page {
                offset: args.offset.unwrap_or_default(),
                limit: args.limit,
            },
        })
    }
}

/// JSON document printed by `roost score`.
#[derive(Debug, Serialize)]
struct ScoreOutput<'a> {
    /// Problems found in the preferences document.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    preference_warnings: Vec<String>,
    #[serde(flatten)]
    ranking: &'a Ranking,
}

pub(super) fn run_score(args: ScoreArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_score_with(args, &mut stdout)
}

pub(super) fn run_score_with(args: ScoreArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let (ranking, preference_warnings) = execute_score(&config)?;
    write_json(
        writer,
        &ScoreOutput {
            preference_warnings,
            ranking: &ranking,
        },
    )
}

fn execute_score(config: &ScoreConfig) -> Result<(Ranking, Vec<String>), CliError> {
    let context = load_context(config.taxonomy.as_deref(), config.adjacency.as_deref())?;
    let parsed = load_preferences(&config.preferences)?;
    let locations = load_locations(&config.locations)?;

    let aggregator = ScoreAggregator::new(context, AggregatorConfig::default());
    let preferences = aggregator.normalize_parsed(&parsed);
    let preference_warnings: Vec<String> = preferences
        .warnings
        .iter()
        .map(ToString::to_string)
        .collect();
    for note in &preference_warnings {
        warn!("{note}");
    }

    let mut scorer = BatchScorer::new(
        aggregator,
        BatchConfig {
            max_concurrency: config.max_concurrency,
        },
    )?;
    if let Some(cache) = &config.cache {
        let store = SqliteEntryStore::open(&cache.path).map_err(CliError::OpenCache)?;
        scorer = scorer.with_cache(Arc::new(PreferenceVersionCache::new(store)));
    }

    let request = BatchRequest {
        user_id: config.cache.as_ref().map(|cache| cache.user_id.as_str()),
        preferences: &preferences,
        page: config.page,
    };
    let ranking = scorer.rank(&request, &locations, &CancellationToken::new());
    Ok((ranking, preference_warnings))
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ScoreConfig, CliError> {
    let merged = ScoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ScoreConfig::try_from(merged)
}
