//! Narrowing a computed record set for display or export.
//!
//! Filtering never renumbers records: a filtered row keeps the sequence
//! number it had in the full report.

use crate::availability::types::AvailabilityRecord;
use crate::registry::FULL_DAY_HOURS;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HoursFilter {
    #[default]
    All,
    /// Stations operating around the clock.
    FullDay,
    /// Stations operating fewer than 24 hours.
    Restricted,
}

/// Station kind, inferred from the display name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StationKind {
    #[default]
    All,
    Station,
    Awos,
}

impl StationKind {
    fn needle(self) -> Option<&'static str> {
        match self {
            StationKind::All => None,
            StationKind::Station => Some("stasiun"),
            StationKind::Awos => Some("awos"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub hours: HoursFilter,
    pub kind: StationKind,
    /// When set, only these station identifiers are kept.
    pub stations: Option<BTreeSet<String>>,
}

impl RecordFilter {
    pub fn matches(&self, record: &AvailabilityRecord) -> bool {
        let hours_ok = match self.hours {
            HoursFilter::All => true,
            HoursFilter::FullDay => record.operating_hours == FULL_DAY_HOURS,
            HoursFilter::Restricted => record.operating_hours < FULL_DAY_HOURS,
        };

        let kind_ok = self
            .kind
            .needle()
            .is_none_or(|needle| record.display_name.to_lowercase().contains(needle));

        let station_ok = self
            .stations
            .as_ref()
            .is_none_or(|set| set.contains(&record.station_id));

        hours_ok && kind_ok && station_ok
    }

    pub fn apply(&self, records: Vec<AvailabilityRecord>) -> Vec<AvailabilityRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(seq: usize, station: &str, name: &str, hours: u32) -> AvailabilityRecord {
        AvailabilityRecord {
            sequence_number: seq,
            wmo_id: "-".into(),
            day: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            station_id: station.into(),
            display_name: name.into(),
            operating_hours: hours,
            cadence_label: "1 Jam",
            expected_count: hours,
            observed_count: 0,
            availability_pct: 0.0,
            notes: vec![],
        }
    }

    fn sample() -> Vec<AvailabilityRecord> {
        vec![
            record(1, "WAAA", "Stasiun Meteorologi Sultan Hasanuddin", 24),
            record(2, "WAHL", "AWOS Tunggul Wulung", 12),
            record(3, "WIII", "Stasiun Meteorologi Soekarno Hatta", 18),
        ]
    }

    fn ids(records: &[AvailabilityRecord]) -> Vec<&str> {
        records.iter().map(|r| r.station_id.as_str()).collect()
    }

    #[test]
    fn test_default_keeps_everything() {
        assert_eq!(RecordFilter::default().apply(sample()).len(), 3);
    }

    #[test]
    fn test_hours_filter() {
        let full = RecordFilter {
            hours: HoursFilter::FullDay,
            ..Default::default()
        };
        let restricted = RecordFilter {
            hours: HoursFilter::Restricted,
            ..Default::default()
        };

        assert_eq!(ids(&full.apply(sample())), vec!["WAAA"]);
        assert_eq!(ids(&restricted.apply(sample())), vec!["WAHL", "WIII"]);
    }

    #[test]
    fn test_kind_filter_is_case_insensitive() {
        let awos = RecordFilter {
            kind: StationKind::Awos,
            ..Default::default()
        };
        let stations = RecordFilter {
            kind: StationKind::Station,
            ..Default::default()
        };

        assert_eq!(ids(&awos.apply(sample())), vec!["WAHL"]);
        assert_eq!(ids(&stations.apply(sample())), vec!["WAAA", "WIII"]);
    }

    #[test]
    fn test_station_selection_keeps_sequence_numbers() {
        let filter = RecordFilter {
            stations: Some(["WIII".to_string()].into_iter().collect()),
            ..Default::default()
        };

        let kept = filter.apply(sample());

        assert_eq!(ids(&kept), vec!["WIII"]);
        assert_eq!(kept[0].sequence_number, 3);
    }

    #[test]
    fn test_filters_combine() {
        let filter = RecordFilter {
            hours: HoursFilter::Restricted,
            kind: StationKind::Station,
            stations: None,
        };

        assert_eq!(ids(&filter.apply(sample())), vec!["WIII"]);
    }
}
