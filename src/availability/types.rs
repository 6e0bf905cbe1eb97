//! Data types used by the availability pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::availability::notes::Note;

/// A single ingested METAR message, as delivered by the search API.
///
/// Both fields are optional on the wire; records missing either one are
/// dropped during indexing rather than rejected up front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawReport {
    #[serde(default, alias = "cccc")]
    pub station_id: Option<String>,
    #[serde(default, alias = "timestamp_data")]
    pub timestamp: Option<String>,
}

impl RawReport {
    pub fn new(station_id: &str, timestamp: &str) -> Self {
        Self {
            station_id: Some(station_id.to_string()),
            timestamp: Some(timestamp.to_string()),
        }
    }
}

/// How expected and observed counts are derived for a station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CalculationMode {
    /// Respect each station's configured cadence.
    #[default]
    Automatic,
    /// Treat every station as hourly.
    ForceHourly,
}

impl fmt::Display for CalculationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationMode::Automatic => write!(f, "automatic"),
            CalculationMode::ForceHourly => write!(f, "force-hourly"),
        }
    }
}

/// Availability of one station on one day. Serialized as one CSV row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityRecord {
    pub sequence_number: usize,
    pub wmo_id: String,
    pub day: NaiveDate,
    pub station_id: String,
    pub display_name: String,
    pub operating_hours: u32,
    #[serde(rename = "cadence")]
    pub cadence_label: &'static str,
    pub expected_count: u32,
    pub observed_count: u32,
    pub availability_pct: f64,
    #[serde(serialize_with = "join_notes")]
    pub notes: Vec<Note>,
}

impl AvailabilityRecord {
    /// The notes column as it appears in exports.
    pub fn notes_label(&self) -> String {
        self.notes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn has_note(&self, note: &Note) -> bool {
        self.notes.contains(note)
    }
}

fn join_notes<S: Serializer>(notes: &[Note], serializer: S) -> Result<S::Ok, S::Error> {
    let joined = notes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    serializer.serialize_str(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_report_accepts_wire_names() {
        let report: RawReport =
            serde_json::from_str(r#"{"cccc": "WIII", "timestamp_data": "2024-02-01T00:05:00"}"#)
                .unwrap();

        assert_eq!(report, RawReport::new("WIII", "2024-02-01T00:05:00"));
    }

    #[test]
    fn test_raw_report_accepts_plain_names_and_nulls() {
        let report: RawReport =
            serde_json::from_str(r#"{"station_id": null, "timestamp": "2024-02-01T00:05"}"#)
                .unwrap();

        assert_eq!(report.station_id, None);
        assert_eq!(report.timestamp.as_deref(), Some("2024-02-01T00:05"));
    }

    #[test]
    fn test_raw_report_missing_fields_default_to_none() {
        let report: RawReport = serde_json::from_str("{}").unwrap();
        assert_eq!(report, RawReport::default());
    }

    #[test]
    fn test_record_serializes_notes_joined() {
        let record = AvailabilityRecord {
            sequence_number: 1,
            wmo_id: "96749".into(),
            day: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            station_id: "WIII".into(),
            display_name: "Soekarno Hatta".into(),
            operating_hours: 18,
            cadence_label: "1 Jam",
            expected_count: 18,
            observed_count: 0,
            availability_pct: 0.0,
            notes: vec![Note::NoData, Note::RestrictedHours(18)],
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["notes"], record.notes_label());
        assert_eq!(json["cadence"], "1 Jam");
        assert_eq!(json["day"], "2024-02-01");
        assert!(record.has_note(&Note::NoData));
    }
}
