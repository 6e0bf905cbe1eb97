//! Output formatting and persistence for availability records.
//!
//! Supports pretty-printing, JSON serialization, and CSV export.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::availability::{AvailabilityRecord, MonthPeriod};
use csv::WriterBuilder;

/// Default export file name for a period, e.g. `metar_availability_2024_02.csv`.
pub fn default_file_name(period: &MonthPeriod, extension: &str) -> String {
    format!(
        "metar_availability_{}_{:02}.{}",
        period.year(),
        period.month(),
        extension
    )
}

/// Logs records using Rust's debug pretty-print format.
pub fn print_pretty(records: &[AvailabilityRecord]) {
    debug!("{:#?}", records);
}

/// Writes records as CSV, one header row followed by one row per record.
pub fn write_csv<W: Write>(writer: W, records: &[AvailabilityRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes records as a pretty-printed JSON array.
pub fn write_json<W: Write>(mut writer: W, records: &[AvailabilityRecord]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Exports records to a CSV file at `path`, replacing any existing file.
pub fn export_csv(path: &Path, records: &[AvailabilityRecord]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, records)?;
    info!(path = %path.display(), rows = records.len(), "CSV report written");
    Ok(())
}

/// Exports records to a JSON file at `path`, replacing any existing file.
pub fn export_json(path: &Path, records: &[AvailabilityRecord]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_json(file, records)?;
    info!(path = %path.display(), rows = records.len(), "JSON report written");
    Ok(())
}
