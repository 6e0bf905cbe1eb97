//! CLI entry point for the METAR availability tool.
//!
//! Provides subcommands for computing a monthly per-station, per-day
//! availability report and for inspecting the normalized station registry.

mod infra;
mod services;

use crate::infra::bmkg::{BmkgClient, BmkgConfig};
use crate::infra::local::FileSource;
use crate::services::report_source::ReportSource;
use anyhow::{Result, bail};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand, ValueEnum};
use metar_availability::availability::filter::{HoursFilter, RecordFilter, StationKind};
use metar_availability::availability::summary::MonthlySummary;
use metar_availability::availability::{CalculationMode, MonthPeriod, compute_with_stats};
use metar_availability::output::{default_file_name, export_csv, export_json, print_pretty};
use metar_availability::registry::StationRegistry;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "metar_availability")]
#[command(about = "Per-station, per-day METAR availability reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute availability for one month and export it
    Analyze {
        /// Year to analyze (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Month to analyze, 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,

        /// How expected and observed counts are derived
        #[arg(long, value_enum, default_value_t = ModeArg::Automatic)]
        mode: ModeArg,

        /// File to write the report to (defaults to metar_availability_YYYY_MM.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format
        #[arg(short, long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,

        /// Read reports from a JSON dump instead of the BMKG API
        #[arg(long, requires = "stations_file")]
        reports_file: Option<PathBuf>,

        /// Read station metadata from a JSON dump instead of the BMKG API
        #[arg(long, requires = "reports_file")]
        stations_file: Option<PathBuf>,

        /// Keep only stations with these operating hours
        #[arg(long, value_enum, default_value_t = HoursArg::All)]
        hours: HoursArg,

        /// Keep only stations of this kind (matched on the station name)
        #[arg(long, value_enum, default_value_t = KindArg::All)]
        kind: KindArg,

        /// Keep only these station identifiers (repeatable)
        #[arg(long = "station", value_name = "ICAO")]
        stations: Vec<String>,
    },
    /// List the normalized station registry
    ListStations {
        /// Read station metadata from a JSON dump instead of the BMKG API
        #[arg(long)]
        stations_file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Respect each station's configured cadence
    Automatic,
    /// Treat every station as hourly
    ForceHourly,
}

impl From<ModeArg> for CalculationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Automatic => CalculationMode::Automatic,
            ModeArg::ForceHourly => CalculationMode::ForceHourly,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum HoursArg {
    All,
    FullDay,
    Restricted,
}

impl From<HoursArg> for HoursFilter {
    fn from(hours: HoursArg) -> Self {
        match hours {
            HoursArg::All => HoursFilter::All,
            HoursArg::FullDay => HoursFilter::FullDay,
            HoursArg::Restricted => HoursFilter::Restricted,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    All,
    Station,
    Awos,
}

impl From<KindArg> for StationKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::All => StationKind::All,
            KindArg::Station => StationKind::Station,
            KindArg::Awos => StationKind::Awos,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/metar_availability.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("metar_availability.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            year,
            month,
            mode,
            output,
            format,
            reports_file,
            stations_file,
            hours,
            kind,
            stations,
        } => {
            let today = Local::now().date_naive();
            let period = MonthPeriod::new(
                year.unwrap_or(today.year()),
                month.unwrap_or(today.month()),
            )?;

            let source = open_source(stations_file, reports_file).await?;
            let filter = RecordFilter {
                hours: hours.into(),
                kind: kind.into(),
                stations: (!stations.is_empty()).then(|| stations.into_iter().collect()),
            };

            analyze(source.as_ref(), period, mode.into(), &filter, output, format).await?;
        }
        Commands::ListStations { stations_file } => {
            let source = open_source(stations_file, None).await?;
            list_stations(source.as_ref()).await?;
        }
    }

    Ok(())
}

/// Uses local dumps when a stations file is given, the BMKG API otherwise.
async fn open_source(
    stations_file: Option<PathBuf>,
    reports_file: Option<PathBuf>,
) -> Result<Box<dyn ReportSource>> {
    match stations_file {
        Some(stations) => Ok(Box::new(FileSource::new(stations, reports_file))),
        None => {
            let config = BmkgConfig::from_env()?;
            debug!(?config, "Using BMKG API");
            Ok(Box::new(BmkgClient::login(config).await?))
        }
    }
}

/// Fetches stations and reports concurrently, computes availability for
/// `period`, and exports the (filtered) records.
#[tracing::instrument(
    skip_all,
    fields(year = period.year(), month = period.month(), %mode)
)]
async fn analyze(
    source: &dyn ReportSource,
    period: MonthPeriod,
    mode: CalculationMode,
    filter: &RecordFilter,
    output: Option<PathBuf>,
    format: FormatArg,
) -> Result<()> {
    let (metadata, reports) =
        tokio::try_join!(source.list_stations(), source.fetch_reports(&period))?;

    let registry = StationRegistry::from_metadata(&metadata);
    if registry.is_empty() {
        bail!("No station metadata available, aborting analysis");
    }

    let (records, stats) = compute_with_stats(&reports, &registry, &period, mode);
    info!(
        reports = stats.total,
        accepted = stats.accepted,
        missing_station = stats.missing_station,
        missing_timestamp = stats.missing_timestamp,
        bad_timestamp = stats.bad_timestamp,
        accepted_pct = stats.accepted_pct(),
        "Reports indexed"
    );
    if stats.dropped() > 0 {
        warn!(dropped = stats.dropped(), "Some reports could not be used");
    }

    let records = filter.apply(records);
    print_pretty(&records);

    let summary = MonthlySummary::from_records(&records);
    info!(
        stations = registry.len(),
        days = period.num_days(),
        rows = records.len(),
        observed_total = summary.observed_total,
        "Availability computed"
    );
    let today = Local::now().date_naive();
    if period.contains(today) {
        info!(day = %today, observed = summary.observed_on(today), "Reports observed today");
    }
    for day in &summary.daily {
        debug!(
            day = %day.day,
            mean_availability_pct = day.mean_availability_pct,
            observed = day.observed_total,
            "Daily availability"
        );
    }
    for station in &summary.stations {
        debug!(
            station = %station.station_id,
            mean_availability_pct = station.mean_availability_pct,
            "Station availability"
        );
    }

    match format {
        FormatArg::Csv => {
            let path = output.unwrap_or_else(|| default_file_name(&period, "csv").into());
            export_csv(&path, &records)?;
        }
        FormatArg::Json => {
            let path = output.unwrap_or_else(|| default_file_name(&period, "json").into());
            export_json(&path, &records)?;
        }
    }

    Ok(())
}

/// Logs every normalized station and a registry summary.
async fn list_stations(source: &dyn ReportSource) -> Result<()> {
    let metadata = source.list_stations().await?;
    let registry = StationRegistry::from_metadata(&metadata);

    for (icao, profile) in registry.iter() {
        info!(
            station = icao,
            name = %profile.display_name,
            wmo_id = %profile.wmo_id,
            operating_hours = profile.operating_hours,
            cadence = profile.cadence().label(),
            "Station"
        );
    }

    let half_hourly = registry
        .iter()
        .filter(|(_, p)| p.reports_half_hourly)
        .count();
    let restricted = registry.iter().filter(|(_, p)| !p.is_full_day()).count();

    info!(
        total = registry.len(),
        skipped = metadata.len().saturating_sub(registry.len()),
        half_hourly,
        restricted,
        "Station registry summary"
    );

    Ok(())
}
