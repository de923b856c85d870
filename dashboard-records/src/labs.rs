use dashboard_core::{LabResultRow, LabResults};

/// One display row per lab result, in mapping order. Rows carry the label,
/// not the key.
pub fn format_lab_results(results: &LabResults) -> Vec<LabResultRow> {
    results
        .iter()
        .map(|entry| LabResultRow {
            name: entry.label.clone(),
        })
        .collect()
}
