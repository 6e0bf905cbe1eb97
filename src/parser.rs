//! JSON payload parsing for search API responses and local dumps.
//!
//! Payloads are either a bare array of items or a search response object
//! carrying them under `items`. Individual items that fail to decode are
//! skipped, so one malformed record never discards a whole page.

use anyhow::{Result, bail};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::availability::RawReport;
use crate::registry::StationMetadata;

/// Extracts the item list from a decoded payload.
///
/// A response object without `items` is treated as an empty page.
///
/// # Errors
///
/// Returns an error if the payload is neither an array nor an object, or if
/// `items` is present but not an array.
pub fn items_from_value(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("items") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => bail!("`items` is not an array: {other}"),
        },
        other => bail!("unexpected payload shape: {other}"),
    }
}

/// Decodes each item into `T`, dropping those that do not fit.
pub fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if decoded.len() < total {
        debug!(total, skipped = total - decoded.len(), "Skipped undecodable items");
    }

    decoded
}

/// Decodes a report payload from raw JSON bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not JSON or the payload shape is wrong.
pub fn parse_reports(bytes: &[u8]) -> Result<Vec<RawReport>> {
    let value: Value = serde_json::from_slice(bytes)?;
    Ok(decode_items(items_from_value(value)?))
}

/// Decodes a station metadata payload from raw JSON bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not JSON or the payload shape is wrong.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<StationMetadata>> {
    let value: Value = serde_json::from_slice(bytes)?;
    Ok(decode_items(items_from_value(value)?))
}
