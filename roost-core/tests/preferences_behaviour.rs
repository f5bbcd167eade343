#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for boundary validation of preferences and rule
//! tables.

use std::cell::RefCell;

use roost_core::{OptionTaxonomy, ParsedPreferences, RuleTableError, UserPreferences};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// State shared across the steps of one scenario.
pub struct TestContext {
    document: RefCell<String>,
    parsed: RefCell<Option<ParsedPreferences>>,
    taxonomy: RefCell<Option<Result<OptionTaxonomy, RuleTableError>>>,
}

#[fixture]
/// Build a fresh `TestContext` for each scenario run.
pub fn context() -> TestContext {
    TestContext {
        document: RefCell::new(String::new()),
        parsed: RefCell::new(None),
        taxonomy: RefCell::new(None),
    }
}

fn parsed(context: &TestContext) -> std::cell::Ref<'_, ParsedPreferences> {
    std::cell::Ref::map(context.parsed.borrow(), |parsed| {
        parsed.as_ref().expect("document parsed")
    })
}

#[given("a preference document using legacy section names")]
fn legacy_document(context: &TestContext) {
    *context.document.borrow_mut() = r#"{
        "hobbies": { "activities": ["Golf"] },
        "costs": { "total_monthly_budget": 2000 }
    }"#
    .to_owned();
}

#[given("a preference document whose climate section is a string")]
fn malformed_climate(context: &TestContext) {
    *context.document.borrow_mut() = r#"{ "climate": "warm" }"#.to_owned();
}

#[given("a taxonomy that defines {option} twice")]
fn duplicate_taxonomy(context: &TestContext, option: String) {
    let id = option.trim_matches('"');
    *context.document.borrow_mut() = format!(
        r#"{{ "options": [ {{ "id": "{id}" }}, {{ "id": " {} " }} ] }}"#,
        id.to_uppercase()
    );
}

#[when("I parse the document")]
fn parse_document(context: &TestContext) {
    let parsed = UserPreferences::from_json_str(&context.document.borrow())
        .expect("document is valid JSON");
    *context.parsed.borrow_mut() = Some(parsed);
}

#[when("I load the taxonomy")]
fn load_taxonomy(context: &TestContext) {
    let loaded = OptionTaxonomy::from_json_str(&context.document.borrow());
    *context.taxonomy.borrow_mut() = Some(loaded);
}

#[then("the activities include {option}")]
fn activities_include(context: &TestContext, option: String) {
    let wanted = option.trim_matches('"');
    let activities = &parsed(context).preferences.options.activities;
    assert!(
        activities.iter().any(|activity| activity.eq_ignore_ascii_case(wanted)),
        "{activities:?}"
    );
}

#[then("no warnings are reported")]
fn no_warnings(context: &TestContext) {
    assert!(parsed(context).warnings.is_empty());
}

#[then("{count} warning is reported")]
fn warning_count(context: &TestContext, count: usize) {
    assert_eq!(parsed(context).warnings.len(), count);
}

#[then("no climate preference is set")]
fn no_climate(context: &TestContext) {
    assert!(!parsed(context).preferences.climate.has_any());
}

#[then("loading fails with a duplicate option error")]
fn duplicate_rejected(context: &TestContext) {
    let outcome = context.taxonomy.borrow();
    let result = outcome.as_ref().expect("taxonomy loaded");
    assert!(
        matches!(result, Err(RuleTableError::DuplicateOption { option }) if option == "golf"),
        "{result:?}"
    );
}

#[scenario(path = "tests/features/preferences.feature", index = 0)]
fn legacy_sections(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/preferences.feature", index = 1)]
fn malformed_section(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/preferences.feature", index = 2)]
fn duplicate_option(context: TestContext) {
    let _ = context;
}
