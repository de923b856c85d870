//! Straight field mapping from a normalized record to the two screens.

use dashboard_core::{
    BloodPressureSummary, DashboardConfig, DashboardView, DetailView, DiagnosticRow,
    PatientRecord, PatientSummary, ProfileField, ProfileFieldKind, Reading, RecordDefaults,
    VitalCard, VitalKind,
};

use crate::history::{order_history, select_recent_blood_pressure, DatedEntry};
use crate::labs::format_lab_results;

/// Shown when no history entry carries the vital.
const VITAL_PLACEHOLDERS: [(VitalKind, &str, &str); 3] = [
    (VitalKind::RespiratoryRate, "20 bpm", "Normal"),
    (VitalKind::Temperature, "98.6°F", "Normal"),
    (VitalKind::HeartRate, "78 bpm", "Lower than Average"),
];

pub fn assemble_dashboard(record: &PatientRecord, config: &DashboardConfig) -> DashboardView {
    let ordered = order_history(&record.diagnosis_history);
    let window_start = ordered.entries.len().saturating_sub(config.history_window);
    let window = &ordered.entries[window_start..];

    DashboardView {
        patient: patient_summary(record, &config.defaults),
        profile: profile_fields(record),
        vitals: vital_cards(&ordered.entries),
        blood_pressure: select_recent_blood_pressure(
            &record.diagnosis_history,
            config.history_window,
        ),
        latest_blood_pressure: latest_blood_pressure(window),
        lab_results: format_lab_results(&record.lab_results),
        diagnostics: diagnostic_rows(record),
    }
}

pub fn assemble_detail(record: &PatientRecord, config: &DashboardConfig) -> DetailView {
    DetailView {
        record: record.clone(),
        display_name: record.display_name(&config.defaults).to_string(),
        blood_pressure: select_recent_blood_pressure(
            &record.diagnosis_history,
            config.history_window,
        ),
        lab_results: format_lab_results(&record.lab_results),
        diagnostics: diagnostic_rows(record),
    }
}

pub fn patient_summary(record: &PatientRecord, defaults: &RecordDefaults) -> PatientSummary {
    PatientSummary {
        key: record.route_key().to_string(),
        name: record.display_name(defaults).to_string(),
        subtitle: format!("{}, {}", record.gender, record.age),
        profile_picture: record.profile_picture.clone(),
    }
}

fn profile_fields(record: &PatientRecord) -> Vec<ProfileField> {
    [
        (ProfileFieldKind::DateOfBirth, "Date Of Birth", &record.date_of_birth),
        (ProfileFieldKind::Gender, "Gender", &record.gender),
        (ProfileFieldKind::ContactInfo, "Contact Info", &record.phone_number),
        (
            ProfileFieldKind::EmergencyContact,
            "Emergency Contacts",
            &record.emergency_contact,
        ),
        (
            ProfileFieldKind::Insurance,
            "Insurance Provider",
            &record.insurance_type,
        ),
    ]
    .into_iter()
    .map(|(kind, label, value)| ProfileField {
        kind,
        label: label.to_string(),
        value: value.clone(),
    })
    .collect()
}

fn diagnostic_rows(record: &PatientRecord) -> Vec<DiagnosticRow> {
    record
        .diagnostic_list
        .iter()
        .map(|item| DiagnosticRow {
            name: item.name.clone(),
            description: item.description.clone(),
            status: item.status.clone(),
            style: item.style(),
        })
        .collect()
}

fn vital_cards(entries: &[DatedEntry<'_>]) -> Vec<VitalCard> {
    VITAL_PLACEHOLDERS
        .iter()
        .map(|&(kind, placeholder_value, placeholder_level)| {
            let latest = entries
                .iter()
                .rev()
                .find_map(|dated| vital_reading(dated, kind));

            match latest {
                Some(reading) => VitalCard {
                    kind,
                    title: kind.title().to_string(),
                    value: format_vital(kind, reading.value),
                    level: reading.level.clone().unwrap_or_default(),
                    placeholder: false,
                },
                None => VitalCard {
                    kind,
                    title: kind.title().to_string(),
                    value: placeholder_value.to_string(),
                    level: placeholder_level.to_string(),
                    placeholder: true,
                },
            }
        })
        .collect()
}

fn vital_reading<'a>(dated: &DatedEntry<'a>, kind: VitalKind) -> Option<&'a Reading> {
    match kind {
        VitalKind::RespiratoryRate => dated.entry.respiratory_rate.as_ref(),
        VitalKind::Temperature => dated.entry.temperature.as_ref(),
        VitalKind::HeartRate => dated.entry.heart_rate.as_ref(),
    }
}

fn latest_blood_pressure(window: &[DatedEntry<'_>]) -> BloodPressureSummary {
    let pressures = || {
        window
            .iter()
            .rev()
            .filter_map(|dated| dated.entry.blood_pressure.as_ref())
    };

    BloodPressureSummary {
        systolic: pressures().find_map(|bp| bp.systolic.clone()),
        diastolic: pressures().find_map(|bp| bp.diastolic.clone()),
    }
}

fn format_vital(kind: VitalKind, value: f64) -> String {
    match kind {
        VitalKind::Temperature => format!("{}°F", format_numeric(value)),
        VitalKind::RespiratoryRate | VitalKind::HeartRate => {
            format!("{} bpm", format_numeric(value))
        }
    }
}

fn format_numeric(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;
    use dashboard_core::StyleTag;
    use serde_json::json;

    fn record() -> PatientRecord {
        normalize(&json!({
            "id": 11,
            "name": "Jessica Taylor",
            "gender": "Female",
            "age": 28,
            "diagnosis_history": [
                {
                    "month": "March", "year": 2024,
                    "blood_pressure": {
                        "systolic": { "value": 160, "levels": "Higher than Average" },
                        "diastolic": { "value": 78, "levels": "Lower than Average" }
                    },
                    "heart_rate": { "value": 78, "levels": "Lower than Average" },
                    "respiratory_rate": { "value": 20, "levels": "Normal" },
                    "temperature": { "value": 98.6, "levels": "Normal" }
                },
                {
                    "month": "February", "year": 2024,
                    "blood_pressure": { "systolic": 117, "diastolic": 65 },
                    "heart_rate": { "value": 66, "levels": "Normal" }
                }
            ],
            "diagnostic_list": [
                { "name": "Hypertension", "description": "Chronic high blood pressure", "status": "Under Observation" },
                { "name": "Asthma", "description": "Recurrent episodes", "status": "Cured" },
                { "name": "Migraine", "description": "Headaches", "status": "Untreated" }
            ],
            "lab_results": ["Blood Tests", "CT Scans"]
        }))
        .unwrap()
    }

    #[test]
    fn dashboard_maps_profile_and_rows() {
        let view = assemble_dashboard(&record(), &DashboardConfig::default());

        assert_eq!(view.patient.key, "11");
        assert_eq!(view.patient.subtitle, "Female, 28");
        assert_eq!(view.profile[1].label, "Gender");
        assert_eq!(view.profile[4].value, "Sunrise Health Assurance");
        assert_eq!(view.lab_results.len(), 2);

        let styles: Vec<StyleTag> = view.diagnostics.iter().map(|row| row.style).collect();
        assert_eq!(
            styles,
            vec![StyleTag::Caution, StyleTag::Cured, StyleTag::Unknown]
        );
    }

    #[test]
    fn vitals_use_latest_reading_or_placeholder() {
        let view = assemble_dashboard(&record(), &DashboardConfig::default());

        let respiratory = &view.vitals[0];
        assert_eq!(respiratory.value, "20 bpm");
        assert!(!respiratory.placeholder);

        let temperature = &view.vitals[1];
        assert_eq!(temperature.value, "98.6°F");

        let heart = &view.vitals[2];
        assert_eq!(heart.value, "78 bpm");
        assert_eq!(heart.level, "Lower than Average");

        let empty = normalize(&json!({ "name": "New Patient" })).unwrap();
        let view = assemble_dashboard(&empty, &DashboardConfig::default());
        assert!(view.vitals.iter().all(|card| card.placeholder));
        assert!(!view.blood_pressure.has_data());
    }

    #[test]
    fn latest_blood_pressure_comes_from_most_recent_entry() {
        let view = assemble_dashboard(&record(), &DashboardConfig::default());

        let systolic = view.latest_blood_pressure.systolic.unwrap();
        assert_eq!(systolic.value, 160.0);
        assert_eq!(systolic.level.as_deref(), Some("Higher than Average"));
        assert_eq!(view.blood_pressure.labels(), vec!["Feb, 2024", "Mar, 2024"]);
    }

    #[test]
    fn detail_carries_full_record() {
        let record = record();
        let view = assemble_detail(&record, &DashboardConfig::default());

        assert_eq!(view.record, record);
        assert_eq!(view.display_name, "Jessica Taylor");
        assert_eq!(view.blood_pressure.points.len(), 2);
        assert_eq!(view.diagnostics.len(), 3);
    }
}
