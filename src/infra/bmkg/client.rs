use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::info;

use metar_availability::availability::{MonthPeriod, RawReport};
use metar_availability::fetch::auth::ApiKey;
use metar_availability::fetch::{BasicClient, collect_pages, get_json, post_json};
use metar_availability::parser::{decode_items, items_from_value};
use metar_availability::registry::StationMetadata;

use super::config::BmkgConfig;
use crate::services::report_source::ReportSource;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Station searches are small; one page normally covers every station.
const STATION_PAGE_SIZE: usize = 2_000;

/// `type_message` code for METAR in the message store.
const METAR_MESSAGE_TYPE: &str = "4";

const STATION_FIELDS: &str =
    "station_name,station_operating_hours,station_icao,station_wmo_id,is_metar_half_hourly";
const REPORT_FIELDS: &str = "timestamp_data,cccc,station_wmo_id";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

pub struct BmkgClient {
    config: BmkgConfig,
    http: ApiKey<BasicClient>,
}

impl BmkgClient {
    /// Logs in with the configured credentials and returns a client that
    /// sends the issued token with every search.
    pub async fn login(config: BmkgConfig) -> Result<Self> {
        let token = Self::exchange_token(&config).await?;
        let inner = BasicClient::with_timeouts(config.timeout, CONNECT_TIMEOUT)?;
        let http = ApiKey::bearer(inner, &token)?;

        info!(base_url = %config.base_url, "Logged in to BMKG");
        Ok(Self { config, http })
    }

    async fn exchange_token(config: &BmkgConfig) -> Result<String> {
        let client = BasicClient::with_timeouts(config.timeout, CONNECT_TIMEOUT)?;
        let request = LoginRequest {
            username: &config.username,
            password: &config.password,
        };

        let response = post_json(&client, config.endpoint("@login")?, &request)
            .await
            .context("Login request failed")?;

        token_from_response(&response)
    }

    async fn search_page(
        &self,
        params: &[(&str, String)],
        size: usize,
        offset: usize,
    ) -> Result<Vec<Value>> {
        let url = self.config.search_url(params, size, offset)?;
        let body = get_json(&self.http, url)
            .await
            .with_context(|| format!("Search failed at offset {offset}"))?;
        items_from_value(body)
    }

    async fn search_all(&self, params: &[(&str, String)], size: usize) -> Result<Vec<Value>> {
        collect_pages(move |offset| self.search_page(params, size, offset)).await
    }
}

fn token_from_response(response: &Value) -> Result<String> {
    response["token"]
        .as_str()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Login response did not contain a token"))
}

fn report_params(period: &MonthPeriod) -> Vec<(&'static str, String)> {
    vec![
        ("type_name", "GTSMessage".to_string()),
        ("_metadata", REPORT_FIELDS.to_string()),
        ("type_message", METAR_MESSAGE_TYPE.to_string()),
        (
            "timestamp_data__gte",
            format!("{}T00:00:00", period.first_day().format("%Y-%m-%d")),
        ),
        (
            "timestamp_data__lte",
            format!("{}T23:59:59", period.last_day().format("%Y-%m-%d")),
        ),
    ]
}

fn station_params() -> Vec<(&'static str, String)> {
    vec![
        ("type_name", "BmkgStation".to_string()),
        ("_metadata", STATION_FIELDS.to_string()),
    ]
}

#[async_trait]
impl ReportSource for BmkgClient {
    #[tracing::instrument(skip(self))]
    async fn list_stations(&self) -> Result<Vec<StationMetadata>> {
        let items = self.search_all(&station_params(), STATION_PAGE_SIZE).await?;
        let stations: Vec<StationMetadata> = decode_items(items);

        info!(stations = stations.len(), "Station metadata fetched");
        Ok(stations)
    }

    #[tracing::instrument(skip(self, period), fields(year = period.year(), month = period.month()))]
    async fn fetch_reports(&self, period: &MonthPeriod) -> Result<Vec<RawReport>> {
        let items = self
            .search_all(&report_params(period), self.config.page_size)
            .await?;
        let reports: Vec<RawReport> = decode_items(items);

        info!(reports = reports.len(), "METAR reports fetched");
        Ok(reports)
    }
}
