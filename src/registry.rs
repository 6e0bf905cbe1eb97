//! Station registry.
//!
//! [`StationMetadata`] is the loosely typed record the search API returns for
//! each station. [`StationRegistry::from_metadata`] normalizes those records
//! once into fully defaulted [`StationProfile`]s, so the aggregation code never
//! has to deal with missing or malformed fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Operating hours assumed when the metadata carries no usable value.
pub const FULL_DAY_HOURS: u32 = 24;

const UNKNOWN: &str = "-";

/// Raw station metadata as delivered by the search API.
///
/// Fields whose wire type varies between stations are kept as JSON values
/// and only interpreted during normalization.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StationMetadata {
    #[serde(default)]
    pub station_icao: Option<String>,
    #[serde(default)]
    pub station_name: Option<Value>,
    #[serde(default)]
    pub station_operating_hours: Option<Value>,
    #[serde(default)]
    pub station_wmo_id: Option<Value>,
    #[serde(default)]
    pub is_metar_half_hourly: Option<Value>,
}

/// Reporting interval a station is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Hourly,
    HalfHourly,
}

impl Cadence {
    pub fn label(self) -> &'static str {
        match self {
            Cadence::Hourly => "1 Jam",
            Cadence::HalfHourly => "30 Menit",
        }
    }
}

/// Normalized metadata for one station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationProfile {
    pub display_name: String,
    pub wmo_id: String,
    pub operating_hours: u32,
    pub reports_half_hourly: bool,
}

impl Default for StationProfile {
    fn default() -> Self {
        Self {
            display_name: UNKNOWN.to_string(),
            wmo_id: UNKNOWN.to_string(),
            operating_hours: FULL_DAY_HOURS,
            reports_half_hourly: false,
        }
    }
}

impl StationProfile {
    pub fn cadence(&self) -> Cadence {
        if self.reports_half_hourly {
            Cadence::HalfHourly
        } else {
            Cadence::Hourly
        }
    }

    pub fn is_full_day(&self) -> bool {
        self.operating_hours == FULL_DAY_HOURS
    }

    fn from_metadata(item: &StationMetadata) -> Self {
        Self {
            display_name: item
                .station_name
                .as_ref()
                .and_then(value_text)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            wmo_id: item
                .station_wmo_id
                .as_ref()
                .and_then(value_text)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            operating_hours: normalize_operating_hours(item.station_operating_hours.as_ref()),
            reports_half_hourly: item
                .is_metar_half_hourly
                .as_ref()
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }
}

/// Accepts only JSON integers in `1..=24`; everything else becomes a full day.
pub fn normalize_operating_hours(value: Option<&Value>) -> u32 {
    value
        .and_then(Value::as_i64)
        .filter(|h| (1..=FULL_DAY_HOURS as i64).contains(h))
        .map(|h| h as u32)
        .unwrap_or(FULL_DAY_HOURS)
}

/// Renders a scalar as display text. Blank strings, null, arrays and
/// objects have no text.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Station identifier → profile, iterated in identifier order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationRegistry {
    stations: BTreeMap<String, StationProfile>,
}

impl StationRegistry {
    /// Builds the registry from raw metadata.
    ///
    /// Items without a station identifier are skipped. When an identifier
    /// appears more than once, the last item wins.
    pub fn from_metadata<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a StationMetadata>,
    {
        let mut stations = BTreeMap::new();
        let mut skipped = 0usize;

        for item in items {
            let Some(icao) = item
                .station_icao
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
            else {
                skipped += 1;
                continue;
            };

            let profile = StationProfile::from_metadata(item);
            if stations.insert(icao.to_string(), profile).is_some() {
                warn!(station = icao, "Duplicate station identifier, keeping last entry");
            }
        }

        debug!(stations = stations.len(), skipped, "Station registry built");

        Self { stations }
    }

    pub fn insert(&mut self, station_id: impl Into<String>, profile: StationProfile) {
        self.stations.insert(station_id.into(), profile);
    }

    pub fn get(&self, station_id: &str) -> Option<&StationProfile> {
        self.stations.get(station_id)
    }

    /// Iterates `(station_id, profile)` pairs in lexicographic identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StationProfile)> {
        self.stations.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(value: Value) -> StationMetadata {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_record_normalizes() {
        let items = vec![metadata(json!({
            "station_icao": "WIII",
            "station_name": "Stasiun Meteorologi Soekarno Hatta",
            "station_operating_hours": 24,
            "station_wmo_id": "96749",
            "is_metar_half_hourly": true
        }))];

        let registry = StationRegistry::from_metadata(&items);
        let profile = registry.get("WIII").unwrap();

        assert_eq!(profile.display_name, "Stasiun Meteorologi Soekarno Hatta");
        assert_eq!(profile.wmo_id, "96749");
        assert_eq!(profile.operating_hours, 24);
        assert!(profile.reports_half_hourly);
        assert_eq!(profile.cadence(), Cadence::HalfHourly);
        assert_eq!(profile.cadence().label(), "30 Menit");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let items = vec![metadata(json!({ "station_icao": "WAAA" }))];

        let registry = StationRegistry::from_metadata(&items);

        assert_eq!(registry.get("WAAA"), Some(&StationProfile::default()));
        assert_eq!(StationProfile::default().cadence().label(), "1 Jam");
    }

    #[test]
    fn test_items_without_identifier_are_skipped() {
        let items = vec![
            metadata(json!({ "station_name": "No code" })),
            metadata(json!({ "station_icao": null })),
            metadata(json!({ "station_icao": "  " })),
            metadata(json!({ "station_icao": "WADD" })),
        ];

        let registry = StationRegistry::from_metadata(&items);

        assert_eq!(registry.len(), 1);
        assert!(registry.get("WADD").is_some());
    }

    #[test]
    fn test_operating_hours_clamp() {
        assert_eq!(normalize_operating_hours(Some(&json!(8))), 8);
        assert_eq!(normalize_operating_hours(Some(&json!(24))), 24);
        assert_eq!(normalize_operating_hours(Some(&json!(1))), 1);
        assert_eq!(normalize_operating_hours(Some(&json!(0))), 24);
        assert_eq!(normalize_operating_hours(Some(&json!(-3))), 24);
        assert_eq!(normalize_operating_hours(Some(&json!(25))), 24);
        assert_eq!(normalize_operating_hours(Some(&json!(12.5))), 24);
        assert_eq!(normalize_operating_hours(Some(&json!("12"))), 24);
        assert_eq!(normalize_operating_hours(Some(&json!(true))), 24);
        assert_eq!(normalize_operating_hours(Some(&Value::Null)), 24);
        assert_eq!(normalize_operating_hours(None), 24);
    }

    #[test]
    fn test_zero_operating_hours_never_reaches_profile() {
        let items = vec![metadata(json!({
            "station_icao": "WARR",
            "station_operating_hours": 0
        }))];

        let registry = StationRegistry::from_metadata(&items);
        assert_eq!(registry.get("WARR").unwrap().operating_hours, 24);
    }

    #[test]
    fn test_half_hourly_requires_boolean() {
        let items = vec![
            metadata(json!({ "station_icao": "A", "is_metar_half_hourly": "yes" })),
            metadata(json!({ "station_icao": "B", "is_metar_half_hourly": null })),
            metadata(json!({ "station_icao": "C", "is_metar_half_hourly": false })),
        ];

        let registry = StationRegistry::from_metadata(&items);
        assert!(registry.iter().all(|(_, p)| !p.reports_half_hourly));
    }

    #[test]
    fn test_numeric_wmo_id_rendered_as_text() {
        let items = vec![metadata(json!({ "station_icao": "WIII", "station_wmo_id": 96749 }))];

        let registry = StationRegistry::from_metadata(&items);
        assert_eq!(registry.get("WIII").unwrap().wmo_id, "96749");
    }

    #[test]
    fn test_non_string_station_name_keeps_station() {
        let items = vec![
            metadata(json!({ "station_icao": "WAAA", "station_name": 12345 })),
            metadata(json!({ "station_icao": "WBBB", "station_name": false })),
            metadata(json!({ "station_icao": "WCCC", "station_name": ["x"] })),
            metadata(json!({ "station_icao": "WDDD", "station_name": "  " })),
        ];

        let registry = StationRegistry::from_metadata(&items);

        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get("WAAA").unwrap().display_name, "12345");
        assert_eq!(registry.get("WBBB").unwrap().display_name, "false");
        assert_eq!(registry.get("WCCC").unwrap().display_name, "-");
        assert_eq!(registry.get("WDDD").unwrap().display_name, "-");
    }

    #[test]
    fn test_duplicate_identifier_last_wins() {
        let items = vec![
            metadata(json!({ "station_icao": "WIII", "station_operating_hours": 12 })),
            metadata(json!({ "station_icao": "WIII", "station_operating_hours": 18 })),
        ];

        let registry = StationRegistry::from_metadata(&items);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("WIII").unwrap().operating_hours, 18);
    }

    #[test]
    fn test_iteration_is_lexicographic() {
        let items = vec![
            metadata(json!({ "station_icao": "WIII" })),
            metadata(json!({ "station_icao": "WAAA" })),
            metadata(json!({ "station_icao": "WARR" })),
        ];

        let registry = StationRegistry::from_metadata(&items);
        let ids: Vec<_> = registry.iter().map(|(id, _)| id).collect();

        assert_eq!(ids, vec!["WAAA", "WARR", "WIII"]);
    }
}
