//! Loading and validating the files named on the command line.

use camino::Utf8Path;
use roost_core::{
    AdjacencyRules, Location, OptionTaxonomy, ParsedPreferences, ScoringContext, UserPreferences,
};
use roost_fs::{file_is_file, read_utf8};

use crate::{ARG_ADJACENCY, ARG_LOCATIONS, ARG_PREFERENCES, ARG_TAXONOMY, CliError};

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) if path.exists() => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn read(path: &Utf8Path, field: &'static str) -> Result<String, CliError> {
    read_utf8(path).map_err(|source| CliError::ReadInput {
        field,
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate a preferences document.
///
/// Malformed fields become warnings; only unparseable JSON is an error.
pub(crate) fn load_preferences(path: &Utf8Path) -> Result<ParsedPreferences, CliError> {
    let raw = read(path, ARG_PREFERENCES)?;
    UserPreferences::from_json_str(&raw).map_err(|source| CliError::ParseInput {
        field: ARG_PREFERENCES,
        path: path.to_path_buf(),
        source,
    })
}

/// Load a JSON array of locations.
pub(crate) fn load_locations(path: &Utf8Path) -> Result<Vec<Location>, CliError> {
    let raw = read(path, ARG_LOCATIONS)?;
    serde_json::from_str(&raw).map_err(|source| CliError::ParseInput {
        field: ARG_LOCATIONS,
        path: path.to_path_buf(),
        source,
    })
}

/// Build the rule tables, falling back to the built-in ones.
pub(crate) fn load_context(
    taxonomy: Option<&Utf8Path>,
    adjacency: Option<&Utf8Path>,
) -> Result<ScoringContext, CliError> {
    let options = match taxonomy {
        Some(path) => OptionTaxonomy::from_json_str(&read(path, ARG_TAXONOMY)?).map_err(
            |source| CliError::InvalidRuleTable {
                path: path.to_path_buf(),
                source,
            },
        )?,
        None => OptionTaxonomy::builtin(),
    };
    let rules = match adjacency {
        Some(path) => AdjacencyRules::from_json_str(&read(path, ARG_ADJACENCY)?).map_err(
            |source| CliError::InvalidRuleTable {
                path: path.to_path_buf(),
                source,
            },
        )?,
        None => AdjacencyRules::builtin(),
    };
    Ok(ScoringContext::new(options, rules))
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: serde::Serialize>(
    writer: &mut dyn std::io::Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
