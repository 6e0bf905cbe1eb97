use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use metar_availability::availability::{MonthPeriod, RawReport};
use metar_availability::parser::{parse_reports, parse_stations};
use metar_availability::registry::StationMetadata;

use crate::services::report_source::ReportSource;

/// Reads station metadata and reports from JSON dumps on disk.
///
/// Each file holds either a bare array or a search response object:
/// ```json
/// { "items": [ { "cccc": "WIII", "timestamp_data": "2024-02-01T00:00:00" } ] }
/// ```
pub struct FileSource {
    stations_path: PathBuf,
    reports_path: Option<PathBuf>,
}

impl FileSource {
    pub fn new(stations_path: PathBuf, reports_path: Option<PathBuf>) -> Self {
        Self {
            stations_path,
            reports_path,
        }
    }
}

async fn read(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

#[async_trait]
impl ReportSource for FileSource {
    async fn list_stations(&self) -> Result<Vec<StationMetadata>> {
        let bytes = read(&self.stations_path).await?;
        let stations = parse_stations(&bytes)
            .with_context(|| format!("parsing {}", self.stations_path.display()))?;

        info!(path = %self.stations_path.display(), stations = stations.len(), "Station metadata loaded");
        Ok(stations)
    }

    /// Returns every report in the file; reports outside `period` are left
    /// for the aggregator to ignore.
    async fn fetch_reports(&self, period: &MonthPeriod) -> Result<Vec<RawReport>> {
        let path = self
            .reports_path
            .as_deref()
            .ok_or_else(|| anyhow!("no reports file given"))?;

        let bytes = read(path).await?;
        let reports =
            parse_reports(&bytes).with_context(|| format!("parsing {}", path.display()))?;

        info!(
            path = %path.display(),
            reports = reports.len(),
            year = period.year(),
            month = period.month(),
            "METAR reports loaded"
        );
        Ok(reports)
    }
}
