//! Sparsity command: compare derived availability against a full table.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roost_scorer::{OptionAvailabilityInferencer, SparsityReport};
use serde::{Deserialize, Serialize};

use crate::inputs::{load_context, load_locations, require_existing, write_json};
use crate::{ARG_LOCATIONS, ARG_TAXONOMY, CliError, ENV_SPARSITY_LOCATIONS};

/// CLI arguments for the `sparsity` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Report option availability storage for a set of locations")]
#[ortho_config(prefix = "ROOST")]
pub(crate) struct SparsityArgs {
    /// Path to a JSON array of locations.
    #[arg(long = ARG_LOCATIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) locations: Option<Utf8PathBuf>,
    /// Override the option taxonomy.
    #[arg(long = ARG_TAXONOMY, value_name = "path")]
    #[serde(default)]
    pub(crate) taxonomy: Option<Utf8PathBuf>,
}

/// Printed by `roost sparsity`.
#[derive(Debug, Serialize)]
struct SparsityOutput {
    #[serde(flatten)]
    report: SparsityReport,
    stored_fraction: f64,
}

pub(super) fn run_sparsity(args: SparsityArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_sparsity_with(args, &mut stdout)
}

pub(super) fn run_sparsity_with(
    args: SparsityArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let locations_path = merged.locations.ok_or(CliError::MissingArgument {
        field: ARG_LOCATIONS,
        env: ENV_SPARSITY_LOCATIONS,
    })?;
    require_existing(&locations_path, ARG_LOCATIONS)?;
    if let Some(path) = &merged.taxonomy {
        require_existing(path, ARG_TAXONOMY)?;
    }

    let context = load_context(merged.taxonomy.as_deref(), None)?;
    let locations = load_locations(&locations_path)?;
    let report = OptionAvailabilityInferencer::new(&context.taxonomy).sparsity_report(&locations);
    write_json(
        writer,
        &SparsityOutput {
            report,
            stored_fraction: report.stored_fraction(),
        },
    )
}
