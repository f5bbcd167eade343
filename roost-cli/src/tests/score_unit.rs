//! Focused unit tests covering score CLI configuration and execution.

use super::helpers::{Workspace, output_field, write_utf8};
use super::*;
use crate::score::{ScoreConfig, config_from_layers_for_test, run_score_with};
use camino::Utf8PathBuf;
use ortho_config::MergeComposer;
use roost_scorer::{DEFAULT_MAX_CONCURRENCY, Page};
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn workspace() -> Workspace {
    Workspace::new().with_default_inputs()
}

fn args_for(workspace: &Workspace) -> ScoreArgs {
    ScoreArgs {
        preferences: Some(workspace.preferences.clone()),
        locations: Some(workspace.locations.clone()),
        ..ScoreArgs::default()
    }
}

#[rstest]
#[case::preferences(ARG_PREFERENCES, ENV_PREFERENCES)]
#[case::locations(ARG_LOCATIONS, ENV_LOCATIONS)]
fn converting_score_without_inputs_errors(
    workspace: Workspace,
    #[case] expected_field: &'static str,
    #[case] expected_env: &'static str,
) {
    let mut args = args_for(&workspace);
    if expected_field == ARG_PREFERENCES {
        args.preferences = None;
    } else {
        args.locations = None;
    }

    let err = ScoreConfig::try_from(args).expect_err("missing input should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, expected_field);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn score_config_applies_defaults(workspace: Workspace) {
    let config = ScoreConfig::try_from(args_for(&workspace)).expect("config should build");
    assert_eq!(config.max_concurrency, DEFAULT_MAX_CONCURRENCY);
    assert_eq!(config.page, Page::default());
    assert!(config.cache.is_none());
    assert!(config.taxonomy.is_none());
}

#[rstest]
fn cache_db_requires_user_id(workspace: Workspace) {
    let args = ScoreArgs {
        cache_db: Some(workspace.root.join("scores.db")),
        ..args_for(&workspace)
    };

    let err = ScoreConfig::try_from(args).expect_err("cache without user should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_USER_ID);
            assert_eq!(env, ENV_USER_ID);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_missing_taxonomy(workspace: Workspace) {
    let taxonomy = workspace.root.join("taxonomy.json");
    let config = ScoreConfig {
        taxonomy: Some(taxonomy.clone()),
        ..ScoreConfig::try_from(args_for(&workspace)).expect("config should build")
    };

    let err = config.validate_sources().expect_err("expected failure");
    match err {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_TAXONOMY);
            assert_eq!(path, taxonomy);
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_not_file(workspace: Workspace) {
    let locations = workspace.root.join("locations.d");
    std::fs::create_dir(&locations).expect("locations directory");
    let config = ScoreConfig {
        locations: locations.clone(),
        ..ScoreConfig::try_from(args_for(&workspace)).expect("config should build")
    };

    let err = config
        .validate_sources()
        .expect_err("expected directory path to fail validation");
    match err {
        CliError::SourcePathNotFile { field, path } => {
            assert_eq!(field, ARG_LOCATIONS);
            assert_eq!(path, locations);
        }
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn score_ranks_coastal_town_first(workspace: Workspace) {
    let mut stdout = Vec::new();
    run_score_with(args_for(&workspace), &mut stdout).expect("score should succeed");

    assert_eq!(output_field(&stdout, "/total"), json!(2));
    assert_eq!(
        output_field(&stdout, "/locations/0/location_id"),
        json!("tavira")
    );
    assert_eq!(
        output_field(&stdout, "/locations/0/category_scores/options"),
        json!(100)
    );
}

#[rstest]
fn score_pages_the_ranking(workspace: Workspace) {
    let args = ScoreArgs {
        offset: Some(1),
        limit: Some(5),
        ..args_for(&workspace)
    };
    let mut stdout = Vec::new();
    run_score_with(args, &mut stdout).expect("score should succeed");

    assert_eq!(output_field(&stdout, "/total"), json!(2));
    let page = output_field(&stdout, "/locations");
    assert_eq!(page.as_array().map_or(0, Vec::len), 1);
    assert_eq!(
        output_field(&stdout, "/locations/0/location_id"),
        json!("vila-do-bispo")
    );
}

#[rstest]
fn score_reports_preference_warnings(workspace: Workspace) {
    workspace.write_preferences(&json!({
        "budget": { "total_monthly_budget": -20 },
        "climate": { "summer": 7 }
    }));
    let mut stdout = Vec::new();
    run_score_with(args_for(&workspace), &mut stdout).expect("malformed fields degrade");

    let warnings = output_field(&stdout, "/preference_warnings");
    let count = warnings.as_array().map_or(0, Vec::len);
    assert_eq!(count, 2, "unexpected warnings: {warnings}");
}

#[rstest]
fn score_rejects_invalid_locations_json(workspace: Workspace) {
    write_utf8(&workspace.locations, b"{ not valid json");

    let err = run_score_with(args_for(&workspace), &mut Vec::new())
        .expect_err("invalid json should error");
    match err {
        CliError::ParseInput { field, path, .. } => {
            assert_eq!(field, ARG_LOCATIONS);
            assert_eq!(path, workspace.locations);
        }
        other => panic!("expected ParseInput, found {other:?}"),
    }
}

#[rstest]
fn score_rejects_invalid_taxonomy(workspace: Workspace) {
    let taxonomy = workspace.root.join("taxonomy.json");
    write_utf8(&taxonomy, b"[1, 2, 3]");
    let args = ScoreArgs {
        taxonomy: Some(taxonomy.clone()),
        ..args_for(&workspace)
    };

    let err = run_score_with(args, &mut Vec::new()).expect_err("bad taxonomy should error");
    match err {
        CliError::InvalidRuleTable { path, .. } => assert_eq!(path, taxonomy),
        other => panic!("expected InvalidRuleTable, found {other:?}"),
    }
}

#[rstest]
fn cached_and_uncached_runs_print_the_same_ranking(workspace: Workspace) {
    let mut uncached = Vec::new();
    run_score_with(args_for(&workspace), &mut uncached).expect("uncached run");

    let cached_args = ScoreArgs {
        cache_db: Some(workspace.root.join("cache").join("scores.db")),
        user_id: Some("user-7".to_owned()),
        ..args_for(&workspace)
    };
    let mut first = Vec::new();
    run_score_with(cached_args.clone(), &mut first).expect("cold cache run");
    let mut second = Vec::new();
    run_score_with(cached_args, &mut second).expect("warm cache run");

    assert_eq!(first, uncached);
    assert_eq!(second, uncached);
}

#[rstest]
fn zero_concurrency_is_rejected(workspace: Workspace) {
    let args = ScoreArgs {
        max_concurrency: Some(0),
        ..args_for(&workspace)
    };

    let err = run_score_with(args, &mut Vec::new()).expect_err("zero threads should error");
    assert!(
        matches!(err, CliError::BuildScorer(_)),
        "expected BuildScorer, found {err:?}"
    );
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "preferences": 42 }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    let root = Utf8PathBuf::from("/srv/roost");
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "preferences": root.join("from-file.json").as_str(),
            "locations": root.join("towns.json").as_str(),
            "max_concurrency": 2,
            "limit": 10,
        }),
        None,
    );
    composer.push_environment(json!({
        "preferences": root.join("from-env.json").as_str(),
        "limit": 20,
    }));
    composer.push_cli(json!({ "limit": 3 }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.preferences, root.join("from-env.json"));
    assert_eq!(config.locations, root.join("towns.json"));
    assert_eq!(config.max_concurrency, 2);
    assert_eq!(
        config.page,
        Page {
            offset: 0,
            limit: Some(3),
        }
    );
}
