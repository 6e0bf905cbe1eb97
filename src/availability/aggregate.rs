use crate::availability::notes::{availability_pct, classify};
use crate::availability::period::MonthPeriod;
use crate::availability::slot::{SlotWidth, parse_timestamp};
use crate::availability::types::{AvailabilityRecord, CalculationMode, RawReport};
use crate::registry::{StationProfile, StationRegistry};
use crate::stats::IngestStats;
use chrono::{NaiveDate, NaiveTime};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Minute-precision report times, grouped by day and station.
///
/// Duplicate minutes collapse on insertion. Times are kept as reported;
/// folding into hour or half-hour slots happens per station at count time.
#[derive(Debug, Default)]
pub struct SlotIndex {
    days: HashMap<NaiveDate, HashMap<String, BTreeSet<NaiveTime>>>,
}

impl SlotIndex {
    /// Indexes every usable report, counting the ones that had to be dropped.
    pub fn build<'a, I>(reports: I) -> (Self, IngestStats)
    where
        I: IntoIterator<Item = &'a RawReport>,
    {
        let mut index = SlotIndex::default();
        let mut stats = IngestStats::default();

        for report in reports {
            stats.total += 1;

            // trimmed the same way as registry identifiers
            let Some(station_id) = report
                .station_id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
            else {
                stats.missing_station += 1;
                continue;
            };
            let Some(timestamp) = report.timestamp.as_deref().filter(|s| !s.is_empty()) else {
                stats.missing_timestamp += 1;
                continue;
            };
            let Some((day, time)) = parse_timestamp(timestamp) else {
                stats.bad_timestamp += 1;
                continue;
            };

            index
                .days
                .entry(day)
                .or_default()
                .entry(station_id.to_string())
                .or_default()
                .insert(time);
            stats.accepted += 1;
        }

        (index, stats)
    }

    pub fn times(&self, day: NaiveDate, station_id: &str) -> Option<&BTreeSet<NaiveTime>> {
        self.days.get(&day).and_then(|stations| stations.get(station_id))
    }
}

/// The slot width used for a station under the given mode.
pub fn slot_width(mode: CalculationMode, profile: &StationProfile) -> SlotWidth {
    match mode {
        CalculationMode::ForceHourly => SlotWidth::Hour,
        CalculationMode::Automatic if profile.reports_half_hourly => SlotWidth::HalfHour,
        CalculationMode::Automatic => SlotWidth::Hour,
    }
}

/// Number of distinct slots the given times fall into.
pub fn count_slots(times: &BTreeSet<NaiveTime>, width: SlotWidth) -> u32 {
    times
        .iter()
        .map(|t| width.canonicalize(*t))
        .collect::<BTreeSet<_>>()
        .len() as u32
}

/// Computes one [`AvailabilityRecord`] per (day, station) for the period.
///
/// Records are ordered day-major, then by station identifier, and numbered
/// from 1 in that order. Stations and days without any report still produce
/// a record. Unusable reports are skipped, never fatal.
pub fn compute<'a, I>(
    reports: I,
    registry: &StationRegistry,
    period: &MonthPeriod,
    mode: CalculationMode,
) -> Vec<AvailabilityRecord>
where
    I: IntoIterator<Item = &'a RawReport>,
{
    compute_with_stats(reports, registry, period, mode).0
}

/// Like [`compute`], also returning the ingest counters.
pub fn compute_with_stats<'a, I>(
    reports: I,
    registry: &StationRegistry,
    period: &MonthPeriod,
    mode: CalculationMode,
) -> (Vec<AvailabilityRecord>, IngestStats)
where
    I: IntoIterator<Item = &'a RawReport>,
{
    let (index, stats) = SlotIndex::build(reports);
    let empty = BTreeSet::new();

    let mut records = Vec::with_capacity(period.num_days() * registry.len());

    for day in period.days() {
        for (station_id, profile) in registry.iter() {
            let times = index.times(day, station_id).unwrap_or(&empty);
            let width = slot_width(mode, profile);

            let observed = count_slots(times, width);
            let expected = profile.operating_hours * width.reports_per_hour();

            records.push(AvailabilityRecord {
                sequence_number: records.len() + 1,
                wmo_id: profile.wmo_id.clone(),
                day,
                station_id: station_id.to_string(),
                display_name: profile.display_name.clone(),
                operating_hours: profile.operating_hours,
                cadence_label: profile.cadence().label(),
                expected_count: expected,
                observed_count: observed,
                availability_pct: availability_pct(observed, expected),
                notes: classify(observed, expected, profile.operating_hours),
            });
        }
    }

    debug!(
        year = period.year(),
        month = period.month(),
        %mode,
        records = records.len(),
        reports = stats.total,
        accepted = stats.accepted,
        dropped = stats.dropped(),
        "Availability computed"
    );

    (records, stats)
}
