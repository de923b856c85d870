//! Framework-neutral WASM <-> JavaScript bridge for the dashboard views.

use dashboard_core::{classify, DashboardConfig, DashboardError, Route};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsDashboardConfig {
    #[serde(default)]
    history_window: Option<usize>,
    #[serde(default)]
    active_patient: Option<String>,
    #[serde(default)]
    endpoint: Option<String>,
}

impl From<JsDashboardConfig> for DashboardConfig {
    fn from(cfg: JsDashboardConfig) -> Self {
        let mut base = DashboardConfig::default();
        if let Some(window) = cfg.history_window {
            base.history_window = window;
        }
        if let Some(patient) = cfg.active_patient {
            base.active_patient = Some(patient);
        }
        if let Some(endpoint) = cfg.endpoint {
            base.endpoint = endpoint;
        }
        base
    }
}

/// Build the dashboard view of the active patient from a JS array of records.
#[wasm_bindgen]
pub fn build_dashboard(collection: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let cfg = read_config(config)?;
    let snapshot = read_collection(collection, &cfg)?;
    let view = dashboard_records::dashboard_for(&snapshot, &cfg)
        .map_err(|err| JsValue::from_str(&format_dashboard_error(err)))?;

    to_value(&view).map_err(|err| JsValue::from_str(&format!("Could not serialize view: {err}")))
}

/// Build the detail view of one patient, addressed by id or name.
#[wasm_bindgen]
pub fn build_detail(
    collection: JsValue,
    patient_id: &str,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let cfg = read_config(config)?;
    let snapshot = read_collection(collection, &cfg)?;
    let view = dashboard_records::detail_for(&snapshot, patient_id, &cfg)
        .map_err(|err| JsValue::from_str(&format_dashboard_error(err)))?;

    to_value(&view).map_err(|err| JsValue::from_str(&format!("Could not serialize view: {err}")))
}

/// Presentation key (`critical`, `caution`, ...) for a diagnostic status.
#[wasm_bindgen]
pub fn classify_status(status: &str) -> String {
    classify(status).as_str().to_string()
}

#[wasm_bindgen]
pub fn parse_route(path: &str) -> Result<JsValue, JsValue> {
    to_value(&Route::parse(path))
        .map_err(|err| JsValue::from_str(&format!("Could not serialize route: {err}")))
}

fn read_config(config: Option<JsValue>) -> Result<DashboardConfig, JsValue> {
    match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsDashboardConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Could not read config: {err}")))?;
            Ok(DashboardConfig::from(cfg))
        }
        _ => Ok(DashboardConfig::default()),
    }
}

fn read_collection(
    collection: JsValue,
    cfg: &DashboardConfig,
) -> Result<dashboard_core::PatientSnapshot, JsValue> {
    let value = from_value::<serde_json::Value>(collection)
        .map_err(|err| JsValue::from_str(&format!("Could not read patient collection: {err}")))?;

    dashboard_records::load_collection_value(&value, cfg)
        .map_err(|err| JsValue::from_str(&format_dashboard_error(err)))
}

fn format_dashboard_error(err: DashboardError) -> String {
    format!("Dashboard error: {err}")
}
