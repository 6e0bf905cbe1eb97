use crate::availability::types::AvailabilityRecord;
use crate::availability::utility::{mean, round2};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean availability and report volume for one day across all stations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub day: NaiveDate,
    pub mean_availability_pct: f64,
    pub observed_total: u64,
}

/// Mean availability of one station across the month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSummary {
    pub station_id: String,
    pub mean_availability_pct: f64,
}

/// Month-level roll-up of a (possibly filtered) record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub observed_total: u64,
    pub daily: Vec<DailySummary>,
    pub stations: Vec<StationSummary>,
}

impl MonthlySummary {
    pub fn from_records(records: &[AvailabilityRecord]) -> Self {
        let mut by_day: BTreeMap<NaiveDate, (Vec<f64>, u64)> = BTreeMap::new();
        let mut by_station: BTreeMap<&str, Vec<f64>> = BTreeMap::new();

        for record in records {
            let (pcts, observed) = by_day.entry(record.day).or_default();
            pcts.push(record.availability_pct);
            *observed += record.observed_count as u64;

            by_station
                .entry(record.station_id.as_str())
                .or_default()
                .push(record.availability_pct);
        }

        let daily = by_day
            .into_iter()
            .map(|(day, (pcts, observed_total))| DailySummary {
                day,
                mean_availability_pct: round2(mean(&pcts)),
                observed_total,
            })
            .collect();

        let stations = by_station
            .into_iter()
            .map(|(station_id, pcts)| StationSummary {
                station_id: station_id.to_string(),
                mean_availability_pct: round2(mean(&pcts)),
            })
            .collect();

        Self {
            observed_total: records.iter().map(|r| r.observed_count as u64).sum(),
            daily,
            stations,
        }
    }

    /// Reports observed on `day`, or 0 if the day is outside the record set.
    pub fn observed_on(&self, day: NaiveDate) -> u64 {
        self.daily
            .iter()
            .find(|d| d.day == day)
            .map_or(0, |d| d.observed_total)
    }
}
