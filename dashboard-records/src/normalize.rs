//! Raw JSON record to `PatientRecord`.

use dashboard_core::{
    BloodPressure, DashboardError, DiagnosisEntry, DiagnosticItem, LabResults, PatientRecord,
    Reading, RecordDefaults,
};
use serde_json::Value;

/// Normalize a raw record using the stock placeholders.
pub fn normalize(raw: &Value) -> Result<PatientRecord, DashboardError> {
    normalize_record(raw, &RecordDefaults::default())
}

/// Normalize a raw record, filling missing display fields from `defaults`.
///
/// Fails only when the record has neither an `id` nor a `name`.
pub fn normalize_record(
    raw: &Value,
    defaults: &RecordDefaults,
) -> Result<PatientRecord, DashboardError> {
    if !raw.is_object() {
        return Err(DashboardError::MalformedRecord);
    }

    let id = field(raw, &["id"]).and_then(scalar_text);
    let name = field(raw, &["name"]).and_then(non_empty_text);
    if id.is_none() && name.is_none() {
        return Err(DashboardError::MalformedRecord);
    }

    Ok(PatientRecord {
        id,
        name,
        gender: text_or(raw, &["gender"], &defaults.gender),
        age: field(raw, &["age"])
            .and_then(scalar_text)
            .unwrap_or_else(|| defaults.age.clone()),
        date_of_birth: text_or(raw, &["date_of_birth", "dateOfBirth", "dob"], &defaults.date_of_birth),
        phone_number: text_or(raw, &["phone_number", "phoneNumber"], &defaults.phone_number),
        emergency_contact: text_or(
            raw,
            &["emergency_contact", "emergencyContact"],
            &defaults.emergency_contact,
        ),
        insurance_type: text_or(
            raw,
            &["insurance_type", "insuranceType"],
            &defaults.insurance_type,
        ),
        profile_picture: field(raw, &["profile_picture", "profilePicture", "profilePic"])
            .and_then(non_empty_text),
        diagnosis_history: field(raw, &["diagnosis_history", "diagnosisHistory"])
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(diagnosis_entry).collect())
            .unwrap_or_default(),
        lab_results: field(raw, &["lab_results", "labResults"])
            .map(lab_results)
            .unwrap_or_default(),
        diagnostic_list: field(raw, &["diagnostic_list", "diagnosticList", "diagnostics"])
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(diagnostic_item).collect())
            .unwrap_or_default(),
    })
}

fn diagnosis_entry(value: &Value) -> Option<DiagnosisEntry> {
    if !value.is_object() {
        log::warn!("Ignoring diagnosis history entry that is not an object");
        return None;
    }

    Some(DiagnosisEntry {
        month: field(value, &["month"])
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        year: field(value, &["year"]).and_then(year),
        blood_pressure: field(value, &["blood_pressure", "bloodPressure"]).map(|bp| {
            BloodPressure {
                systolic: field(bp, &["systolic"]).and_then(reading),
                diastolic: field(bp, &["diastolic"]).and_then(reading),
            }
        }),
        heart_rate: field(value, &["heart_rate", "heartRate"]).and_then(reading),
        respiratory_rate: field(value, &["respiratory_rate", "respiratoryRate"]).and_then(reading),
        temperature: field(value, &["temperature"]).and_then(reading),
    })
}

fn diagnostic_item(value: &Value) -> Option<DiagnosticItem> {
    if !value.is_object() {
        log::warn!("Ignoring diagnostic list item that is not an object");
        return None;
    }

    Some(DiagnosticItem {
        name: text_or(value, &["name", "problem"], ""),
        description: text_or(value, &["description"], ""),
        status: text_or(value, &["status"], ""),
    })
}

fn lab_results(value: &Value) -> LabResults {
    let mut results = LabResults::new();
    match value {
        Value::Object(map) => {
            for (key, entry) in map {
                push_lab_result(&mut results, key.clone(), entry);
            }
        }
        Value::Array(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                push_lab_result(&mut results, index.to_string(), entry);
            }
        }
        Value::Null => {}
        other => log::warn!("Ignoring lab results of unexpected shape: {other}"),
    }
    results
}

fn push_lab_result(results: &mut LabResults, key: String, entry: &Value) {
    let label = match entry {
        Value::String(label) => Some(label.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Object(_) => field(entry, &["name", "test"])
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    };

    match label {
        Some(label) => results.insert(key, label),
        None => log::warn!("Ignoring lab result {key}: no usable label"),
    }
}

/// A reading is either a bare number or `{ "value": n, "levels": "..." }`.
fn reading(value: &Value) -> Option<Reading> {
    match value {
        Value::Number(number) => finite(number.as_f64()?).map(|value| Reading { value, level: None }),
        Value::Object(_) => {
            let value_field = field(value, &["value"])?.as_f64().and_then(finite)?;
            let level = field(value, &["levels", "level"])
                .and_then(Value::as_str)
                .map(str::to_string);
            Some(Reading {
                value: value_field,
                level,
            })
        }
        _ => None,
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(number) => number.as_i64().and_then(|year| i32::try_from(year).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// First non-null field among `names`.
fn field<'a>(value: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| value.get(name))
        .find(|candidate| !candidate.is_null())
}

fn non_empty_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(number) => Some(number.to_string()),
        other => non_empty_text(other),
    }
}

fn text_or(value: &Value, names: &[&str], fallback: &str) -> String {
    field(value, names)
        .and_then(non_empty_text)
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_optional_fields_take_defaults() {
        let record = normalize(&json!({ "name": "Emily Williams" })).unwrap();
        let defaults = RecordDefaults::default();

        assert_eq!(record.id, None);
        assert_eq!(record.name.as_deref(), Some("Emily Williams"));
        assert_eq!(record.gender, defaults.gender);
        assert_eq!(record.age, defaults.age);
        assert_eq!(record.date_of_birth, defaults.date_of_birth);
        assert_eq!(record.phone_number, defaults.phone_number);
        assert_eq!(record.emergency_contact, defaults.emergency_contact);
        assert_eq!(record.insurance_type, defaults.insurance_type);
        assert!(record.lab_results.is_empty());
        assert!(record.diagnosis_history.is_empty());
        assert!(record.diagnostic_list.is_empty());
    }

    #[test]
    fn custom_defaults_are_used() {
        let defaults = RecordDefaults {
            gender: "Not specified".to_string(),
            ..RecordDefaults::default()
        };
        let record = normalize_record(&json!({ "id": 3 }), &defaults).unwrap();
        assert_eq!(record.id.as_deref(), Some("3"));
        assert_eq!(record.gender, "Not specified");
    }

    #[test]
    fn record_without_identity_is_malformed() {
        assert_eq!(
            normalize(&json!({ "gender": "Male" })),
            Err(DashboardError::MalformedRecord)
        );
        assert_eq!(
            normalize(&json!({ "name": "  ", "id": null })),
            Err(DashboardError::MalformedRecord)
        );
        assert_eq!(normalize(&json!("Jessica")), Err(DashboardError::MalformedRecord));
    }

    #[test]
    fn normalize_is_idempotent() {
        let raw = json!({
            "name": "Jessica Taylor",
            "age": 28,
            "diagnosis_history": [
                { "month": "March", "year": 2024, "blood_pressure": { "systolic": { "value": 160, "levels": "Higher than Average" }, "diastolic": { "value": 78, "levels": "Lower than Average" } } }
            ],
            "lab_results": ["Blood Tests", "CT Scans"]
        });
        assert_eq!(normalize(&raw).unwrap(), normalize(&raw).unwrap());
    }

    #[test]
    fn readings_accept_numbers_and_level_objects() {
        let record = normalize(&json!({
            "id": "p-1",
            "diagnosisHistory": [
                { "month": "Jan", "year": "2024", "bloodPressure": { "systolic": 130, "diastolic": "85" } },
                { "month": "February", "year": 2024, "heart_rate": { "value": 78, "levels": "Lower than Average" } }
            ]
        }))
        .unwrap();

        let first = &record.diagnosis_history[0];
        assert_eq!(first.year, Some(2024));
        let bp = first.blood_pressure.as_ref().unwrap();
        assert_eq!(bp.systolic.as_ref().map(|r| r.value), Some(130.0));
        assert_eq!(bp.diastolic, None);

        let second = &record.diagnosis_history[1];
        let heart_rate = second.heart_rate.as_ref().unwrap();
        assert_eq!(heart_rate.value, 78.0);
        assert_eq!(heart_rate.level.as_deref(), Some("Lower than Average"));
    }

    #[test]
    fn lab_results_keep_source_order() {
        let record = normalize(&json!({
            "id": 1,
            "labResults": { "b": "WBC", "a": "Hemoglobin", "c": 5 }
        }))
        .unwrap();

        let labels: Vec<&str> = record
            .lab_results
            .iter()
            .map(|entry| entry.label.as_str())
            .collect();
        assert_eq!(labels, vec!["WBC", "Hemoglobin", "5"]);
    }

    #[test]
    fn scalar_lab_values_keep_one_row_per_key() {
        let record = normalize(&json!({
            "id": 1,
            "lab_results": { "1": "Hemoglobin", "2": 13.5, "3": true, "4": null, "5": {} }
        }))
        .unwrap();

        let entries: Vec<(&str, &str)> = record
            .lab_results
            .iter()
            .map(|entry| (entry.key.as_str(), entry.label.as_str()))
            .collect();
        assert_eq!(
            entries,
            vec![("1", "Hemoglobin"), ("2", "13.5"), ("3", "true")]
        );
    }

    #[test]
    fn diagnostic_items_accept_problem_alias() {
        let record = normalize(&json!({
            "id": 1,
            "diagnostics": [ { "problem": "Asthma", "status": "Inactive" } ]
        }))
        .unwrap();
        assert_eq!(
            record.diagnostic_list,
            vec![DiagnosticItem {
                name: "Asthma".to_string(),
                description: String::new(),
                status: "Inactive".to_string(),
            }]
        );
    }
}
