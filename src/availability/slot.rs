//! Timestamp parsing and canonical time slots.
//!
//! A report's timestamp is reduced to a calendar day plus a minute-precision
//! time of day. When counting, that time is then folded into the slot the
//! station is expected to fill: the hour, or the half hour for stations that
//! report every 30 minutes.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Formats tried, in order, for timestamps without an offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Fixed fallback used by the upstream message store.
const FALLBACK_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// The granularity a report time is folded into before counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotWidth {
    Hour,
    HalfHour,
}

impl SlotWidth {
    pub fn reports_per_hour(self) -> u32 {
        match self {
            SlotWidth::Hour => 1,
            SlotWidth::HalfHour => 2,
        }
    }

    /// Folds a time into the start of its slot (`HH:00`, or `HH:30` for
    /// half-hour slots when the minute is 30 or later).
    pub fn canonicalize(self, time: NaiveTime) -> NaiveTime {
        let minute = match self {
            SlotWidth::Hour => 0,
            SlotWidth::HalfHour if time.minute() < 30 => 0,
            SlotWidth::HalfHour => 30,
        };
        NaiveTime::from_hms_opt(time.hour(), minute, 0).unwrap_or(time)
    }
}

/// Parses a report timestamp into its day and minute-precision time.
///
/// Offsets are not applied: the wall-clock fields are taken as written.
/// Returns `None` for anything unparseable.
pub fn parse_timestamp(raw: &str) -> Option<(NaiveDate, NaiveTime)> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let datetime = parse_with_offset(raw)
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        })
        .or_else(|| NaiveDateTime::parse_from_str(raw, FALLBACK_FORMAT).ok())
        .or_else(|| parse_date_hour(raw))
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })?;

    Some((datetime.date(), truncate_to_minute(datetime.time())))
}

fn parse_with_offset(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%:z"))
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|dt| dt.naive_local())
        .ok()
}

/// `YYYY-MM-DDTHH` (or with a space separator), which chrono's format
/// parser rejects for lack of minutes.
fn parse_date_hour(raw: &str) -> Option<NaiveDateTime> {
    let (date, hour) = raw.split_once(['T', ' '])?;
    if hour.len() != 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    date.and_hms_opt(hour.parse().ok()?, 0, 0)
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}
