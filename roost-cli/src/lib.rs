//! Command-line interface for ranking locations with the Roost engine.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod inputs;
mod score;
mod sparsity;

pub use error::CliError;

use score::{ScoreArgs, run_score};
use sparsity::{SparsityArgs, run_sparsity};

const ARG_PREFERENCES: &str = "preferences";
const ARG_LOCATIONS: &str = "locations";
const ARG_TAXONOMY: &str = "taxonomy";
const ARG_ADJACENCY: &str = "adjacency";
const ARG_CACHE_DB: &str = "cache-db";
const ARG_USER_ID: &str = "user-id";
const ARG_MAX_CONCURRENCY: &str = "max-concurrency";
const ARG_LIMIT: &str = "limit";
const ARG_OFFSET: &str = "offset";
const ENV_PREFERENCES: &str = "ROOST_CMDS_SCORE_PREFERENCES";
const ENV_LOCATIONS: &str = "ROOST_CMDS_SCORE_LOCATIONS";
const ENV_USER_ID: &str = "ROOST_CMDS_SCORE_USER_ID";
const ENV_SPARSITY_LOCATIONS: &str = "ROOST_CMDS_SPARSITY_LOCATIONS";

/// Run the Roost CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration, or inputs are
/// invalid, or when output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Score(args) => run_score(args),
        Command::Sparsity(args) => run_sparsity(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "roost",
    about = "Rank candidate towns against a user's retirement preferences",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score and rank locations for one set of preferences.
    Score(ScoreArgs),
    /// Report how many option availabilities are derived versus stored.
    Sparsity(SparsityArgs),
}

#[cfg(test)]
mod tests;
