//! Patient collection JSON to dashboard view models.
//!
//! Records arrive loosely typed; everything downstream of
//! [`load_collection_value`] works on normalized [`PatientRecord`]s held in an
//! immutable [`PatientSnapshot`].

mod assemble;
mod history;
mod labs;
mod normalize;

use dashboard_core::{
    DashboardConfig, DashboardError, DashboardView, DetailView, PatientRecord, PatientSnapshot,
    PatientSummary,
};
use serde_json::Value;

pub use assemble::{assemble_dashboard, assemble_detail, patient_summary};
pub use dashboard_core::classify;
pub use history::{order_history, select_recent_blood_pressure, DatedEntry, OrderedHistory};
pub use labs::format_lab_results;
pub use normalize::{normalize, normalize_record};

/// Load a patient collection from a JSON string.
pub fn load_collection_str(
    collection_json: &str,
    config: &DashboardConfig,
) -> Result<PatientSnapshot, DashboardError> {
    let value: Value = serde_json::from_str(collection_json)
        .map_err(|err| DashboardError::Parse(err.to_string()))?;
    load_collection_value(&value, config)
}

/// Load a patient collection from a `serde_json::Value`.
///
/// Records lacking both an id and a name are dropped; the rest load.
pub fn load_collection_value(
    collection: &Value,
    config: &DashboardConfig,
) -> Result<PatientSnapshot, DashboardError> {
    let entries: &[Value] = match collection {
        Value::Array(entries) => entries,
        Value::Null => &[],
        other => {
            return Err(DashboardError::Parse(format!(
                "Expected an array of patients, received {}",
                json_kind(other)
            )))
        }
    };

    let mut patients = Vec::with_capacity(entries.len());
    let mut dropped = 0;

    for (index, raw) in entries.iter().enumerate() {
        match normalize_record(raw, &config.defaults) {
            Ok(record) => patients.push(record),
            Err(err) => {
                log::warn!("Dropping patient record {index}: {err}");
                dropped += 1;
            }
        }
    }

    log::debug!(
        "Loaded {} patient records ({dropped} dropped)",
        patients.len()
    );
    Ok(PatientSnapshot::new(patients, dropped))
}

/// Look a patient up by id, then by name.
pub fn find_patient<'a>(
    snapshot: &'a PatientSnapshot,
    requested: &str,
) -> Result<&'a PatientRecord, DashboardError> {
    let patients = snapshot.patients();
    patients
        .iter()
        .find(|record| record.has_id(requested))
        .or_else(|| patients.iter().find(|record| record.has_name(requested)))
        .ok_or_else(|| DashboardError::PatientNotFound(requested.to_string()))
}

/// The patient the dashboard shows: the configured one, or the first.
pub fn select_active_patient<'a>(
    snapshot: &'a PatientSnapshot,
    config: &DashboardConfig,
) -> Result<&'a PatientRecord, DashboardError> {
    match config.active_patient.as_deref() {
        Some(requested) => find_patient(snapshot, requested),
        None => snapshot
            .patients()
            .first()
            .ok_or_else(|| DashboardError::PatientNotFound("no patients loaded".to_string())),
    }
}

pub fn dashboard_for(
    snapshot: &PatientSnapshot,
    config: &DashboardConfig,
) -> Result<DashboardView, DashboardError> {
    let record = select_active_patient(snapshot, config)?;
    Ok(assemble_dashboard(record, config))
}

pub fn detail_for(
    snapshot: &PatientSnapshot,
    requested: &str,
    config: &DashboardConfig,
) -> Result<DetailView, DashboardError> {
    let record = find_patient(snapshot, requested)?;
    Ok(assemble_detail(record, config))
}

/// Entries for the patient list, in collection order.
pub fn patient_list(snapshot: &PatientSnapshot, config: &DashboardConfig) -> Vec<PatientSummary> {
    snapshot
        .patients()
        .iter()
        .map(|record| patient_summary(record, &config.defaults))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::ViewState;
    use serde_json::json;

    fn collection() -> Value {
        json!([
            { "id": 1, "name": "Emily Williams", "gender": "Female", "age": 18 },
            { "gender": "Male", "age": 40 },
            { "id": 2, "name": "Jessica Taylor", "gender": "Female", "age": 28 },
            { "name": "Ryan Johnson" }
        ])
    }

    #[test]
    fn malformed_record_is_dropped_and_rest_load() {
        let snapshot = load_collection_value(&collection(), &DashboardConfig::default()).unwrap();

        assert_eq!(snapshot.dropped, 1);
        let names: Vec<_> = snapshot
            .patients()
            .iter()
            .map(|record| record.name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["Emily Williams", "Jessica Taylor", "Ryan Johnson"]);
    }

    #[test]
    fn null_body_is_empty_collection_and_object_is_rejected() {
        let config = DashboardConfig::default();
        assert!(load_collection_value(&Value::Null, &config).unwrap().is_empty());
        assert!(matches!(
            load_collection_value(&json!({ "patients": [] }), &config),
            Err(DashboardError::Parse(_))
        ));
        assert!(matches!(
            load_collection_str("{not json", &config),
            Err(DashboardError::Parse(_))
        ));
    }

    #[test]
    fn lookup_prefers_id_then_name() {
        let snapshot = load_collection_value(&collection(), &DashboardConfig::default()).unwrap();

        assert_eq!(
            find_patient(&snapshot, "2").unwrap().name.as_deref(),
            Some("Jessica Taylor")
        );
        assert_eq!(
            find_patient(&snapshot, "Ryan Johnson").unwrap().id,
            None
        );
        assert_eq!(
            find_patient(&snapshot, "99"),
            Err(DashboardError::PatientNotFound("99".to_string()))
        );
    }

    #[test]
    fn active_patient_defaults_to_first_record() {
        let snapshot = load_collection_value(&collection(), &DashboardConfig::default()).unwrap();
        let view = dashboard_for(&snapshot, &DashboardConfig::default()).unwrap();
        assert_eq!(view.patient.name, "Emily Williams");

        let config = DashboardConfig {
            active_patient: Some("Jessica Taylor".to_string()),
            ..DashboardConfig::default()
        };
        let view = dashboard_for(&snapshot, &config).unwrap();
        assert_eq!(view.patient.key, "2");
    }

    #[test]
    fn unknown_detail_is_not_found_state() {
        let config = DashboardConfig::default();
        let snapshot = load_collection_value(&collection(), &config).unwrap();

        let state = ViewState::from_result(detail_for(&snapshot, "404", &config));
        assert!(matches!(state, ViewState::NotFound(_)));

        let empty = load_collection_value(&json!([]), &config).unwrap();
        let state = ViewState::from_result(dashboard_for(&empty, &config));
        assert!(matches!(state, ViewState::NotFound(_)));
    }

    #[test]
    fn patient_list_uses_route_keys() {
        let config = DashboardConfig::default();
        let snapshot = load_collection_value(&collection(), &config).unwrap();
        let keys: Vec<String> = patient_list(&snapshot, &config)
            .into_iter()
            .map(|summary| summary.key)
            .collect();
        assert_eq!(keys, vec!["1", "2", "Ryan Johnson"]);
    }
}
