//! Core types shared by the patient dashboard: normalized records,
//! configuration, status classification and error kinds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod view;

pub use view::{
    BloodPressurePoint, BloodPressureSeries, BloodPressureSummary, DashboardView, DetailView,
    DiagnosticRow, LabResultRow, LoadSlot, LoadTicket, PatientSummary, ProfileField,
    ProfileFieldKind, Route, SkipReason, SkippedEntry, ViewState, VitalCard, VitalKind,
};

pub const DEFAULT_ENDPOINT: &str = "https://fedskillstest.coalitiontechnologies.workers.dev";

/// Runtime configuration for loading and presenting patients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// URL the patient collection is fetched from.
    pub endpoint: String,
    /// Number of most recent diagnosis entries charted.
    pub history_window: usize,
    /// Patient shown on the dashboard, matched by id then name.
    /// `None` selects the first record of the collection.
    pub active_patient: Option<String>,
    pub defaults: RecordDefaults,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            history_window: 6,
            active_patient: None,
            defaults: RecordDefaults::default(),
        }
    }
}

/// Placeholder text substituted for optional fields a record leaves out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecordDefaults {
    pub display_name: String,
    pub gender: String,
    pub age: String,
    pub date_of_birth: String,
    pub phone_number: String,
    pub emergency_contact: String,
    pub insurance_type: String,
}

impl Default for RecordDefaults {
    fn default() -> Self {
        Self {
            display_name: "Jessica Taylor".to_string(),
            gender: "Female".to_string(),
            age: "Unknown".to_string(),
            date_of_birth: "August 23, 1996".to_string(),
            phone_number: "(415) 555-1234".to_string(),
            emergency_contact: "(415) 555-5678".to_string(),
            insurance_type: "Sunrise Health Assurance".to_string(),
        }
    }
}

/// A patient record after normalization.
///
/// At least one of `id` and `name` is always present; every other display
/// field has already been filled from [`RecordDefaults`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub gender: String,
    pub age: String,
    pub date_of_birth: String,
    pub phone_number: String,
    pub emergency_contact: String,
    pub insurance_type: String,
    pub profile_picture: Option<String>,
    pub diagnosis_history: Vec<DiagnosisEntry>,
    pub lab_results: LabResults,
    pub diagnostic_list: Vec<DiagnosticItem>,
}

impl PatientRecord {
    /// Name shown in headers, falling back to the configured placeholder.
    pub fn display_name<'a>(&'a self, defaults: &'a RecordDefaults) -> &'a str {
        self.name.as_deref().unwrap_or(&defaults.display_name)
    }

    /// Key used in navigation paths: the id when present, else the name.
    pub fn route_key(&self) -> &str {
        self.id
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    pub fn has_id(&self, requested: &str) -> bool {
        self.id.as_deref() == Some(requested)
    }

    pub fn has_name(&self, requested: &str) -> bool {
        self.name.as_deref() == Some(requested)
    }
}

/// One monthly entry of the diagnosis history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DiagnosisEntry {
    /// Month name as received; parsed only when the history is ordered.
    pub month: String,
    pub year: Option<i32>,
    pub blood_pressure: Option<BloodPressure>,
    pub heart_rate: Option<Reading>,
    pub respiratory_rate: Option<Reading>,
    pub temperature: Option<Reading>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BloodPressure {
    pub systolic: Option<Reading>,
    pub diastolic: Option<Reading>,
}

/// A finite measured value with the source's qualitative level, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reading {
    pub value: f64,
    pub level: Option<String>,
}

/// One row of the diagnostic list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DiagnosticItem {
    pub name: String,
    pub description: String,
    pub status: String,
}

impl DiagnosticItem {
    pub fn style(&self) -> StyleTag {
        StyleTag::classify(&self.status)
    }
}

/// Single entry of a lab results mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabResultEntry {
    pub key: String,
    pub label: String,
}

/// Lab results keyed by an arbitrary string, kept in source iteration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct LabResults(Vec<LabResultEntry>);

impl LabResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, label: impl Into<String>) {
        self.0.push(LabResultEntry {
            key: key.into(),
            label: label.into(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabResultEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LabResults {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut results = Self::new();
        for (key, label) in iter {
            results.insert(key, label);
        }
        results
    }
}

/// Presentation style of a diagnostic status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StyleTag {
    Critical,
    Caution,
    Resolved,
    Cured,
    Unknown,
}

impl StyleTag {
    /// Exact, case-sensitive match on the four recognized statuses.
    pub fn classify(status: &str) -> Self {
        match status {
            "Active" => StyleTag::Critical,
            "Under Observation" => StyleTag::Caution,
            "Inactive" => StyleTag::Resolved,
            "Cured" => StyleTag::Cured,
            _ => StyleTag::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StyleTag::Critical => "critical",
            StyleTag::Caution => "caution",
            StyleTag::Resolved => "resolved",
            StyleTag::Cured => "cured",
            StyleTag::Unknown => "unknown",
        }
    }
}

pub fn classify(status: &str) -> StyleTag {
    StyleTag::classify(status)
}

/// Immutable result of one collection load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientSnapshot {
    pub loaded_at: DateTime<Utc>,
    pub patients: Vec<PatientRecord>,
    /// Records discarded because they carried neither id nor name.
    pub dropped: usize,
}

impl PatientSnapshot {
    pub fn new(patients: Vec<PatientRecord>, dropped: usize) -> Self {
        Self {
            loaded_at: Utc::now(),
            patients,
            dropped,
        }
    }

    pub fn patients(&self) -> &[PatientRecord] {
        &self.patients
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    #[error("Failed to fetch patient data: {0}")]
    FetchFailed(String),
    #[error("Record has neither an id nor a name")]
    MalformedRecord,
    #[error("Patient not found: {0}")]
    PatientNotFound(String),
    #[error("Could not read data: {0}")]
    Parse(String),
}

impl DashboardError {
    /// Message shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::FetchFailed(_) => {
                "Failed to fetch patient data. Please check your connection and try again."
                    .to_string()
            }
            DashboardError::PatientNotFound(_) => "Patient not found".to_string(),
            other => other.to_string(),
        }
    }
}
