use std::fs;

use dashboard_core::{DashboardConfig, ViewState};
use dashboard_records::{dashboard_for, detail_for, load_collection_str};
use serde_json::Value;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn config() -> DashboardConfig {
    DashboardConfig {
        active_patient: Some("Jessica Taylor".to_string()),
        ..DashboardConfig::default()
    }
}

#[test]
fn jessica_dashboard_matches_golden() {
    let collection = fs::read_to_string(fixture_path("patient_collection.json"))
        .expect("Could not read patient collection fixture");

    let snapshot = load_collection_str(&collection, &config()).expect("Could not load collection");
    assert_eq!(snapshot.patients().len(), 2);
    assert_eq!(snapshot.dropped, 1);

    let view = dashboard_for(&snapshot, &config()).expect("Could not assemble dashboard");
    let actual = serde_json::to_value(view).expect("Could not serialize dashboard");

    let expected = fs::read_to_string(fixture_path("jessica_dashboard.json"))
        .expect("Could not read golden dashboard");
    let expected: Value = serde_json::from_str(&expected).expect("Golden dashboard is invalid");

    assert_eq!(actual, expected);
}

#[test]
fn patient_without_history_shows_empty_states() {
    let collection = fs::read_to_string(fixture_path("patient_collection.json"))
        .expect("Could not read patient collection fixture");
    let snapshot = load_collection_str(&collection, &config()).expect("Could not load collection");

    let state = ViewState::from_result(detail_for(&snapshot, "Emily Williams", &config()));
    let detail = match state {
        ViewState::Ready(detail) => detail,
        other => panic!("Expected a ready detail view, got {other:?}"),
    };

    assert_eq!(detail.record.insurance_type, "Premier Auto Corporation");
    assert!(!detail.blood_pressure.has_data());
    assert!(detail.lab_results.is_empty());
    assert!(detail.diagnostics.is_empty());
}
