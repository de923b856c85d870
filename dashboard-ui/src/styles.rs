#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-dashboard-ui]";

/// Default CSS for the dashboard with overridable design tokens.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --dashboard-font-family: 'Manrope', system-ui, -apple-system, 'Segoe UI', sans-serif;
  --dashboard-bg: #f6f7f8;
  --dashboard-card-bg: #ffffff;
  --dashboard-radius: 24px;
  --dashboard-text: #072635;
  --dashboard-muted: #707070;
  --dashboard-border: #e0e0e0;
  --dashboard-accent: #01f0d0;
  --dashboard-chart-bg: #f4f0fe;
  --dashboard-systolic: #e83e8c;
  --dashboard-diastolic: #6f42c1;
  --dashboard-grid: rgba(0, 0, 0, 0.05);
  --dashboard-vital-respiratory: #e0f3fa;
  --dashboard-vital-temperature: #ffe6e9;
  --dashboard-vital-heart: #ffe6f1;
  --dashboard-status-critical: #e53935;
  --dashboard-status-caution: #ff9800;
  --dashboard-status-resolved: #4caf50;
  --dashboard-status-cured: #2196f3;
  --dashboard-status-unknown: #9e9e9e;
}

.dashboard-root {
  font-family: var(--dashboard-font-family);
  color: var(--dashboard-text);
  background: var(--dashboard-bg);
  display: grid;
  grid-template-columns: 260px minmax(0, 1fr);
  gap: 24px;
  padding: 24px;
  min-height: 100vh;
  box-sizing: border-box;
}

.dashboard-card {
  background: var(--dashboard-card-bg);
  border-radius: var(--dashboard-radius);
  padding: 20px;
}

.dashboard-status {
  padding: 32px;
  font-size: 14px;
}

.dashboard-status.is-error {
  color: var(--dashboard-status-critical);
}

.patient-list {
  list-style: none;
  margin: 0;
  padding: 0;
}

.patient-list a {
  display: flex;
  align-items: center;
  gap: 12px;
  padding: 10px 4px;
  border-bottom: 1px solid #f0f0f0;
  color: inherit;
  text-decoration: none;
}

.patient-list a.is-active {
  background: #d8fcf7;
  border-radius: 8px;
}

.avatar {
  width: 44px;
  height: 44px;
  border-radius: 50%;
  background: var(--dashboard-border);
  display: inline-flex;
  align-items: center;
  justify-content: center;
  font-weight: 700;
  object-fit: cover;
}

.avatar.is-large {
  width: 180px;
  height: 180px;
  font-size: 48px;
}

.patient-subtitle {
  color: var(--dashboard-muted);
  font-size: 13px;
}

.dashboard-main {
  display: grid;
  grid-template-columns: minmax(0, 2fr) 350px;
  gap: 24px;
}

.dashboard-column {
  display: flex;
  flex-direction: column;
  gap: 24px;
}

.bp-card {
  background: var(--dashboard-chart-bg);
  border-radius: 12px;
  padding: 16px;
  display: grid;
  grid-template-columns: minmax(0, 2fr) minmax(140px, 1fr);
  gap: 16px;
}

.bp-chart {
  width: 100%;
  height: auto;
}

.bp-grid {
  stroke: var(--dashboard-grid);
}

.bp-tick,
.bp-label {
  fill: var(--dashboard-muted);
  font-size: 12px;
}

.bp-line {
  fill: none;
  stroke-width: 3;
  stroke-linejoin: round;
}

.bp-line.systolic,
.bp-marker.systolic {
  stroke: var(--dashboard-systolic);
}

.bp-line.diastolic,
.bp-marker.diastolic {
  stroke: var(--dashboard-diastolic);
}

.bp-marker {
  fill: #ffffff;
  stroke-width: 2;
}

.bp-legend-value {
  font-size: 22px;
  font-weight: 700;
}

.chart-empty,
.section-empty {
  color: var(--dashboard-muted);
  font-size: 14px;
}

.vital-grid {
  display: grid;
  grid-template-columns: repeat(3, minmax(0, 1fr));
  gap: 16px;
}

.vital-card {
  border-radius: 12px;
  padding: 16px;
}

.vital-card[data-kind="respiratory_rate"] {
  background: var(--dashboard-vital-respiratory);
}

.vital-card[data-kind="temperature"] {
  background: var(--dashboard-vital-temperature);
}

.vital-card[data-kind="heart_rate"] {
  background: var(--dashboard-vital-heart);
}

.vital-value {
  font-size: 28px;
  font-weight: 800;
}

.diagnostic-table {
  width: 100%;
  border-collapse: collapse;
  font-size: 14px;
}

.diagnostic-table th,
.diagnostic-table td {
  text-align: left;
  padding: 12px 16px;
  border-bottom: 1px solid #dddddd;
}

.diagnostic-table tr:last-child td {
  border-bottom: none;
}

.status-chip {
  color: #ffffff;
  padding: 4px 8px;
  border-radius: 4px;
  font-size: 12px;
  font-weight: 500;
}

.status-chip[data-style="critical"] { background: var(--dashboard-status-critical); }
.status-chip[data-style="caution"] { background: var(--dashboard-status-caution); }
.status-chip[data-style="resolved"] { background: var(--dashboard-status-resolved); }
.status-chip[data-style="cured"] { background: var(--dashboard-status-cured); }
.status-chip[data-style="unknown"] { background: var(--dashboard-status-unknown); }

.profile-card {
  display: flex;
  flex-direction: column;
  align-items: center;
  gap: 12px;
}

.profile-fields {
  list-style: none;
  width: 100%;
  margin: 0;
  padding: 0;
}

.profile-fields li {
  margin-bottom: 16px;
  font-size: 14px;
}

.profile-label {
  display: block;
  font-weight: 600;
}

.profile-action {
  width: 100%;
  padding: 12px;
  border: none;
  border-radius: 8px;
  background: var(--dashboard-accent);
  color: var(--dashboard-text);
  font-weight: 700;
  cursor: pointer;
}

.lab-list {
  list-style: none;
  margin: 0;
  padding: 0;
}

.lab-list li {
  display: flex;
  justify-content: space-between;
  padding: 8px 0;
  font-size: 14px;
}

.detail-header {
  display: flex;
  gap: 24px;
  align-items: center;
}

.history-table {
  width: 100%;
  border-collapse: collapse;
  font-size: 14px;
}

.history-table th,
.history-table td {
  text-align: left;
  padding: 8px 12px;
  border-bottom: 1px solid #eeeeee;
}

.history-skipped {
  color: var(--dashboard-muted);
  font-size: 12px;
}

@media (max-width: 1100px) {
  .dashboard-root,
  .dashboard-main,
  .bp-card {
    grid-template-columns: 1fr;
  }

  .vital-grid {
    grid-template-columns: 1fr;
  }
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document has no <head> element"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-dashboard-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
