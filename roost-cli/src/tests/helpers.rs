//! Fixture files shared by the CLI tests.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write fixture file");
}

/// A temporary directory holding preferences and locations documents.
pub(super) struct Workspace {
    _dir: TempDir,
    pub(super) root: Utf8PathBuf,
    pub(super) preferences: Utf8PathBuf,
    pub(super) locations: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        let preferences = root.join("preferences.json");
        let locations = root.join("locations.json");
        Self {
            _dir: dir,
            root,
            preferences,
            locations,
        }
    }

    pub(super) fn write_preferences(&self, value: &Value) {
        write_json(&self.preferences, value);
    }

    pub(super) fn write_locations(&self, value: &Value) {
        write_json(&self.locations, value);
    }

    /// Surfing enthusiast on a modest budget.
    pub(super) fn with_default_inputs(self) -> Self {
        self.write_preferences(&surfer_preferences());
        self.write_locations(&two_towns());
        self
    }
}

fn write_json(path: &Utf8Path, value: &Value) {
    let payload = serde_json::to_vec_pretty(value).expect("serialize fixture");
    write_utf8(path, &payload);
}

pub(super) fn surfer_preferences() -> Value {
    json!({
        "options": { "activities": ["surfing"] },
        "budget": { "total_monthly_budget": 2500 }
    })
}

/// A coastal town and an otherwise identical inland one.
pub(super) fn two_towns() -> Value {
    json!([
        {
            "id": "vila-do-bispo",
            "name": "Vila do Bispo",
            "country": "Portugal",
            "cost_of_living_usd": 2000
        },
        {
            "id": "tavira",
            "name": "Tavira",
            "country": "Portugal",
            "cost_of_living_usd": 2000,
            "geographic_features": ["coastal"]
        }
    ])
}

/// Look up a JSON pointer in captured command output.
pub(super) fn output_field(stdout: &[u8], pointer: &str) -> Value {
    let document: Value = serde_json::from_slice(stdout).expect("output should be JSON");
    document
        .pointer(pointer)
        .cloned()
        .unwrap_or_else(|| panic!("output has no {pointer}: {document}"))
}
