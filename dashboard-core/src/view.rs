//! Read-only view models handed to the presentation layer, plus the
//! load-state plumbing that guards them.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

use crate::{DashboardError, PatientRecord, Reading, StyleTag};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BloodPressurePoint {
    /// `"<Mon>, <year>"`, e.g. `"Jan, 2024"`.
    pub label: String,
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnknownMonth,
    MissingYear,
}

/// History entry left out of the chart because it cannot be ordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkippedEntry {
    pub index: usize,
    pub month: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BloodPressureSeries {
    pub points: Vec<BloodPressurePoint>,
    pub skipped: Vec<SkippedEntry>,
}

impl BloodPressureSeries {
    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|point| point.label.as_str()).collect()
    }

    pub fn systolic(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|point| point.systolic).collect()
    }

    pub fn diastolic(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|point| point.diastolic).collect()
    }

    /// False when neither series has a single value; the chart then shows
    /// its "no data" state instead of empty axes.
    pub fn has_data(&self) -> bool {
        self.points
            .iter()
            .any(|point| point.systolic.is_some() || point.diastolic.is_some())
    }
}

/// Most recent systolic and diastolic readings inside the charted window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BloodPressureSummary {
    pub systolic: Option<Reading>,
    pub diastolic: Option<Reading>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabResultRow {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticRow {
    pub name: String,
    pub description: String,
    pub status: String,
    pub style: StyleTag,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VitalKind {
    RespiratoryRate,
    Temperature,
    HeartRate,
}

impl VitalKind {
    pub fn title(self) -> &'static str {
        match self {
            VitalKind::RespiratoryRate => "Respiratory Rate",
            VitalKind::Temperature => "Temperature",
            VitalKind::HeartRate => "Heart Rate",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VitalCard {
    pub kind: VitalKind,
    pub title: String,
    pub value: String,
    pub level: String,
    /// True when the tile shows a placeholder rather than a recorded value.
    pub placeholder: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProfileFieldKind {
    DateOfBirth,
    Gender,
    ContactInfo,
    EmergencyContact,
    Insurance,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileField {
    pub kind: ProfileFieldKind,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientSummary {
    pub key: String,
    pub name: String,
    /// `"<gender>, <age>"`.
    pub subtitle: String,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardView {
    pub patient: PatientSummary,
    pub profile: Vec<ProfileField>,
    pub vitals: Vec<VitalCard>,
    pub blood_pressure: BloodPressureSeries,
    pub latest_blood_pressure: BloodPressureSummary,
    pub lab_results: Vec<LabResultRow>,
    pub diagnostics: Vec<DiagnosticRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailView {
    pub record: PatientRecord,
    pub display_name: String,
    pub blood_pressure: BloodPressureSeries,
    pub lab_results: Vec<LabResultRow>,
    pub diagnostics: Vec<DiagnosticRow>,
}

/// What a screen currently shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    NotFound(String),
    Failed(String),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Loading
    }
}

impl<T> ViewState<T> {
    pub fn from_result(result: Result<T, DashboardError>) -> Self {
        match result {
            Ok(view) => ViewState::Ready(view),
            Err(err @ DashboardError::PatientNotFound(_)) => ViewState::NotFound(err.user_message()),
            Err(err) => ViewState::Failed(err.user_message()),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(view) => Some(view),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

/// Identifies one load started through a [`LoadSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Holds the state of a screen across asynchronous loads.
///
/// Only the most recent load of a still-mounted screen may write its result;
/// anything else resolving later is dropped.
#[derive(Debug)]
pub struct LoadSlot<T> {
    generation: u64,
    mounted: bool,
    state: ViewState<T>,
}

impl<T> Default for LoadSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LoadSlot<T> {
    pub fn new() -> Self {
        Self {
            generation: 0,
            mounted: false,
            state: ViewState::Loading,
        }
    }

    /// Starts a new load, superseding any load still in flight.
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        self.mounted = true;
        self.state = ViewState::Loading;
        LoadTicket(self.generation)
    }

    /// Applies `state` if `ticket` belongs to the current load. Returns
    /// whether the state was applied.
    pub fn resolve(&mut self, ticket: LoadTicket, state: ViewState<T>) -> bool {
        if !self.mounted || ticket.0 != self.generation {
            return false;
        }
        self.state = state;
        true
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }
}

/// Bytes escaped in a patient path segment. Non-ASCII is always escaped.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Screen addressed by a navigation path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "screen", content = "id", rename_all = "snake_case")]
pub enum Route {
    Dashboard,
    Detail(String),
    Unknown,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Route::Dashboard;
        }

        match trimmed.strip_prefix("/patient/") {
            Some(id) if !id.is_empty() && !id.contains('/') => Route::Detail(percent_decode(id)),
            _ => Route::Unknown,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Dashboard | Route::Unknown => "/".to_string(),
            Route::Detail(id) => format!("/patient/{}", utf8_percent_encode(id, SEGMENT)),
        }
    }
}

/// Decodes `%XX` escapes; malformed escapes are kept as written.
fn percent_decode(segment: &str) -> String {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}
