use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use snapfolio_client::{ReportingClientConfig, RetryPolicy, DEFAULT_REPORTING_API_URL};
use snapfolio_core::constants::DEFAULT_PAGE_LIMIT;
use snapfolio_core::reports::ReportFilters;
use snapfolio_core::snapshots::Granularity;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub api_url: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub retry_attempts: u32,
    pub default_limit: u32,
    pub portfolio_id: Option<String>,
    pub granularity: Granularity,
}

impl Config {
    /// Reads the configuration from the environment after loading `.env`.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, applying defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr: SocketAddr = lookup("SNAPFOLIO_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8088".to_string())
            .parse()
            .context("Invalid SNAPFOLIO_LISTEN_ADDR")?;
        let api_url =
            lookup("SNAPFOLIO_API_URL").unwrap_or_else(|| DEFAULT_REPORTING_API_URL.to_string());
        let cors_allow = lookup("SNAPFOLIO_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = lookup("SNAPFOLIO_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|| "30000".into())
            .parse()
            .unwrap_or(30000);
        let retry_attempts: u32 = lookup("SNAPFOLIO_RETRY_ATTEMPTS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);
        let default_limit = match lookup("SNAPFOLIO_DEFAULT_LIMIT") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|limit| *limit > 0)
                .with_context(|| format!("Invalid SNAPFOLIO_DEFAULT_LIMIT '{}'", raw))?,
            None => DEFAULT_PAGE_LIMIT,
        };
        let portfolio_id = lookup("SNAPFOLIO_PORTFOLIO_ID")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let granularity = match lookup("SNAPFOLIO_GRANULARITY") {
            Some(raw) => raw
                .parse::<Granularity>()
                .context("Invalid SNAPFOLIO_GRANULARITY")?,
            None => Granularity::default(),
        };

        Ok(Self {
            listen_addr,
            api_url,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            retry_attempts,
            default_limit,
            portfolio_id,
            granularity,
        })
    }

    pub fn client_config(&self) -> ReportingClientConfig {
        ReportingClientConfig::new(self.api_url.clone())
            .with_timeout(self.request_timeout)
            .with_retry(RetryPolicy::default().with_max_attempts(self.retry_attempts))
    }

    /// Filters the report screen starts with.
    pub fn initial_filters(&self) -> ReportFilters {
        ReportFilters {
            portfolio_id: self.portfolio_id.clone(),
            granularity: self.granularity,
        }
    }
}
