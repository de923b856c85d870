//! Chronological ordering of the diagnosis history and the blood-pressure
//! series charted from it.
//!
//! Entries arrive in whatever order the source lists them. Each one is placed
//! on the calendar by `(year, month)`, where the month may be a full English
//! name or its three-letter abbreviation in any case. Entries whose month does
//! not parse, or that have no year, are reported in `skipped` with their
//! source index and never charted.
//!
//! The chart takes the last `count` placed entries. Fewer entries give a
//! shorter series; nothing is padded.

use std::str::FromStr;

use chrono::Month;
use dashboard_core::{
    BloodPressurePoint, BloodPressureSeries, DiagnosisEntry, SkipReason, SkippedEntry,
};

/// History entries in ascending `(year, month)` order, plus the entries that
/// could not be placed on the calendar.
pub struct OrderedHistory<'a> {
    pub entries: Vec<DatedEntry<'a>>,
    pub skipped: Vec<SkippedEntry>,
}

pub struct DatedEntry<'a> {
    pub year: i32,
    pub month: Month,
    pub entry: &'a DiagnosisEntry,
}

impl DatedEntry<'_> {
    /// `"Jan, 2024"` regardless of how the month was spelled in the source.
    pub fn label(&self) -> String {
        format!("{}, {}", &self.month.name()[..3], self.year)
    }
}

/// Sort the history by calendar position; ties keep source order.
pub fn order_history(history: &[DiagnosisEntry]) -> OrderedHistory<'_> {
    let mut entries = Vec::with_capacity(history.len());
    let mut skipped = Vec::new();

    for (index, entry) in history.iter().enumerate() {
        let Ok(month) = Month::from_str(entry.month.trim()) else {
            log::warn!(
                "Skipping diagnosis entry {index}: unrecognized month {:?}",
                entry.month
            );
            skipped.push(SkippedEntry {
                index,
                month: entry.month.clone(),
                reason: SkipReason::UnknownMonth,
            });
            continue;
        };

        let Some(year) = entry.year else {
            log::warn!("Skipping diagnosis entry {index}: missing year");
            skipped.push(SkippedEntry {
                index,
                month: entry.month.clone(),
                reason: SkipReason::MissingYear,
            });
            continue;
        };

        entries.push(DatedEntry { year, month, entry });
    }

    entries.sort_by_key(|dated| (dated.year, dated.month.number_from_month()));
    OrderedHistory { entries, skipped }
}

/// The last `count` orderable entries as chart points, oldest first.
///
/// Never pads: fewer valid entries than `count` yields all of them.
pub fn select_recent_blood_pressure(
    history: &[DiagnosisEntry],
    count: usize,
) -> BloodPressureSeries {
    let ordered = order_history(history);
    let start = ordered.entries.len().saturating_sub(count);

    let points = ordered.entries[start..]
        .iter()
        .map(|dated| {
            let bp = dated.entry.blood_pressure.as_ref();
            BloodPressurePoint {
                label: dated.label(),
                systolic: bp.and_then(|bp| bp.systolic.as_ref()).map(|r| r.value),
                diastolic: bp.and_then(|bp| bp.diastolic.as_ref()).map(|r| r.value),
            }
        })
        .collect();

    BloodPressureSeries {
        points,
        skipped: ordered.skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{BloodPressure, Reading};

    fn entry(month: &str, year: i32, bp: Option<(f64, f64)>) -> DiagnosisEntry {
        DiagnosisEntry {
            month: month.to_string(),
            year: Some(year),
            blood_pressure: bp.map(|(systolic, diastolic)| BloodPressure {
                systolic: Some(Reading {
                    value: systolic,
                    level: None,
                }),
                diastolic: Some(Reading {
                    value: diastolic,
                    level: None,
                }),
            }),
            ..DiagnosisEntry::default()
        }
    }

    #[test]
    fn orders_across_year_boundary() {
        let history = vec![
            entry("Jan", 2024, Some((130.0, 85.0))),
            entry("Oct", 2023, Some((120.0, 80.0))),
        ];

        let series = select_recent_blood_pressure(&history, 6);

        assert_eq!(
            series.points,
            vec![
                BloodPressurePoint {
                    label: "Oct, 2023".to_string(),
                    systolic: Some(120.0),
                    diastolic: Some(80.0),
                },
                BloodPressurePoint {
                    label: "Jan, 2024".to_string(),
                    systolic: Some(130.0),
                    diastolic: Some(85.0),
                },
            ]
        );
        assert!(series.skipped.is_empty());
    }

    #[test]
    fn keeps_only_most_recent_window() {
        let months = [
            "March", "February", "January", "December", "November", "October", "September",
            "August",
        ];
        let history: Vec<DiagnosisEntry> = months
            .iter()
            .enumerate()
            .map(|(i, month)| {
                let year = if i < 3 { 2024 } else { 2023 };
                entry(month, year, Some((110.0 + i as f64, 70.0)))
            })
            .collect();

        let series = select_recent_blood_pressure(&history, 6);

        assert_eq!(
            series.labels(),
            vec![
                "Oct, 2023",
                "Nov, 2023",
                "Dec, 2023",
                "Jan, 2024",
                "Feb, 2024",
                "Mar, 2024"
            ]
        );
    }

    #[test]
    fn short_history_is_not_padded() {
        let history = vec![entry("May", 2022, Some((118.0, 76.0)))];
        let series = select_recent_blood_pressure(&history, 6);
        assert_eq!(series.points.len(), 1);
        assert!(select_recent_blood_pressure(&history, 0).points.is_empty());
    }

    #[test]
    fn unparseable_months_are_reported_and_skipped() {
        let mut no_year = entry("June", 2024, None);
        no_year.year = None;
        let history = vec![
            entry("Smarch", 2024, Some((140.0, 90.0))),
            entry("april", 2024, Some((120.0, 80.0))),
            no_year,
        ];

        let series = select_recent_blood_pressure(&history, 6);

        assert_eq!(series.labels(), vec!["Apr, 2024"]);
        assert_eq!(
            series.skipped,
            vec![
                SkippedEntry {
                    index: 0,
                    month: "Smarch".to_string(),
                    reason: SkipReason::UnknownMonth,
                },
                SkippedEntry {
                    index: 2,
                    month: "June".to_string(),
                    reason: SkipReason::MissingYear,
                },
            ]
        );
    }

    #[test]
    fn missing_readings_become_gaps() {
        let mut partial = entry("Feb", 2024, Some((150.0, 0.0)));
        if let Some(bp) = partial.blood_pressure.as_mut() {
            bp.diastolic = None;
        }
        let history = vec![entry("Jan", 2024, None), partial];

        let series = select_recent_blood_pressure(&history, 6);

        assert_eq!(series.systolic(), vec![None, Some(150.0)]);
        assert_eq!(series.diastolic(), vec![None, None]);
        assert!(series.has_data());
    }

    #[test]
    fn output_is_chronological_and_bounded() {
        let months = ["Dec", "Mar", "Jul", "Jan", "Sep", "Mar", "Nov"];
        let history: Vec<DiagnosisEntry> = months
            .iter()
            .enumerate()
            .map(|(i, month)| entry(month, 2020 + (i as i32 % 3), Some((120.0, 80.0))))
            .collect();

        for count in 0..10 {
            let ordered = order_history(&history);
            let series = select_recent_blood_pressure(&history, count);
            assert_eq!(series.points.len(), count.min(ordered.entries.len()));

            let keys: Vec<(i32, u32)> = ordered
                .entries
                .iter()
                .map(|dated| (dated.year, dated.month.number_from_month()))
                .collect();
            assert!(keys.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }
}
