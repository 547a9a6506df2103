//! HTTP client for the reporting API.
//!
//! This module implements the reporting and catalog service traits of
//! `snapfolio-core` on top of `reqwest`. Every endpoint is a GET; transient
//! failures are retried according to the configured [`RetryPolicy`].

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use snapfolio_core::catalog::{AssetInfo, CatalogServiceTrait, PortfolioRef};
use snapfolio_core::errors::{Error, Result};
use snapfolio_core::pagination::Envelope;
use snapfolio_core::performance::{AssetGroupPerformance, AssetPerformance, PortfolioPerformance};
use snapfolio_core::reports::{ReportQuery, ReportingServiceTrait};
use snapfolio_core::snapshots::{PortfolioSnapshot, SnapshotRecord};

use crate::config::{ReportingClientConfig, RetryPolicy};
use crate::retry::with_retry;

const PORTFOLIO_SNAPSHOTS_PATH: &str = "/snapshots/portfolios";
const ASSET_SNAPSHOTS_PATH: &str = "/snapshots/assets";
const PORTFOLIO_PERFORMANCE_PATH: &str = "/performance/portfolios";
const ASSET_GROUP_PERFORMANCE_PATH: &str = "/performance/asset-groups";
const ASSET_PERFORMANCE_PATH: &str = "/performance/assets";
const ASSETS_PATH: &str = "/assets";
const PORTFOLIOS_PATH: &str = "/portfolios";

// ─────────────────────────────────────────────────────────────────────────────
// API Response Types (internal, for parsing reporting API responses)
// ─────────────────────────────────────────────────────────────────────────────

/// Some endpoints answer with a bare array, others with a pagination envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListOrEnvelope<T> {
    List(Vec<T>),
    Envelope(Envelope<T>),
}

impl<T> ListOrEnvelope<T> {
    fn into_envelope(self) -> Envelope<T> {
        match self {
            ListOrEnvelope::List(data) => Envelope {
                data,
                page: None,
                limit: None,
                total: None,
                total_pages: None,
                has_next: None,
                has_prev: None,
            },
            ListOrEnvelope::Envelope(envelope) => envelope,
        }
    }

    fn into_rows(self) -> Vec<T> {
        match self {
            ListOrEnvelope::List(data) => data,
            ListOrEnvelope::Envelope(envelope) => envelope.data,
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Reporting API Client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP client for the reporting API.
///
/// # Example
///
/// ```ignore
/// let client = ReportingApiClient::new(ReportingClientConfig::new("http://localhost:3000/api"))?;
/// let page = client.get_portfolio_snapshots(&query).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReportingApiClient {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ReportingApiClient {
    /// Create a new reporting API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: ReportingClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request, retrying transient failures, and parse the response.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        with_retry(&self.retry, path, move || self.get_once(path, params)).await
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[ReportingApi] GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Request to {} failed: {}", path, e)))?;

        parse_response(response).await
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &ReportQuery,
    ) -> Result<Envelope<T>> {
        let body: ListOrEnvelope<T> = self.get(path, &query.to_query_params()).await?;
        Ok(body.into_envelope())
    }
}

/// Parse an HTTP response, mapping non-2xx statuses to [`Error::Api`].
async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::Transport(format!("Failed to read response: {}", e)))?;

    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .ok()
            .and_then(|err| err.message.or(err.error))
            .unwrap_or_else(|| body.chars().take(200).collect());
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        Error::Decode(format!(
            "{} - {}",
            e,
            body.chars().take(200).collect::<String>()
        ))
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Service Trait Implementations
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl ReportingServiceTrait for ReportingApiClient {
    async fn get_portfolio_snapshots(
        &self,
        query: &ReportQuery,
    ) -> Result<Envelope<PortfolioSnapshot>> {
        self.get_page(PORTFOLIO_SNAPSHOTS_PATH, query).await
    }

    async fn get_portfolio_performance(
        &self,
        query: &ReportQuery,
    ) -> Result<Envelope<PortfolioPerformance>> {
        self.get_page(PORTFOLIO_PERFORMANCE_PATH, query).await
    }

    async fn get_asset_group_performance(
        &self,
        query: &ReportQuery,
    ) -> Result<Envelope<AssetGroupPerformance>> {
        self.get_page(ASSET_GROUP_PERFORMANCE_PATH, query).await
    }

    async fn get_asset_performance(
        &self,
        query: &ReportQuery,
    ) -> Result<Envelope<AssetPerformance>> {
        self.get_page(ASSET_PERFORMANCE_PATH, query).await
    }

    async fn get_asset_snapshots(&self, query: &ReportQuery) -> Result<Vec<SnapshotRecord>> {
        let body: ListOrEnvelope<SnapshotRecord> = self
            .get(ASSET_SNAPSHOTS_PATH, &query.to_query_params())
            .await?;
        let records = body.into_rows();
        debug!("[ReportingApi] Received {} asset snapshots", records.len());
        Ok(records)
    }
}

#[async_trait]
impl CatalogServiceTrait for ReportingApiClient {
    async fn list_assets(&self) -> Result<Vec<AssetInfo>> {
        let body: ListOrEnvelope<AssetInfo> = self.get(ASSETS_PATH, &[]).await?;
        Ok(body.into_rows())
    }

    async fn list_portfolios(&self) -> Result<Vec<PortfolioRef>> {
        let body: ListOrEnvelope<PortfolioRef> = self.get(PORTFOLIOS_PATH, &[]).await?;
        Ok(body.into_rows())
    }
}
