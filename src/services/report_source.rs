//! Trait for anything that can supply station metadata and METAR reports.

use anyhow::Result;
use metar_availability::availability::{MonthPeriod, RawReport};
use metar_availability::registry::StationMetadata;

/// Abstraction over a report provider (the BMKG search API, or local dumps).
///
/// Implementations return whatever they hold as complete; gaps are reported
/// downstream as missing data, not retried here.
#[async_trait::async_trait]
pub trait ReportSource: Send + Sync {
    /// Returns raw metadata for every known station.
    async fn list_stations(&self) -> Result<Vec<StationMetadata>>;

    /// Returns every METAR report timestamped within `period`.
    async fn fetch_reports(&self, period: &MonthPeriod) -> Result<Vec<RawReport>>;
}
