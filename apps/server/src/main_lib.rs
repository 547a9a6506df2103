use std::sync::Arc;

use crate::config::Config;
use snapfolio_client::ReportingApiClient;
use snapfolio_core::catalog::CatalogServiceTrait;
use snapfolio_core::reports::{ReportingServiceTrait, ReportsController, ReportsCoordinator};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub reports: ReportsController,
}

pub fn init_tracing() {
    let log_format = std::env::var("SNAPFOLIO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Builds the application state backed by the HTTP reporting API client.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let client = Arc::new(ReportingApiClient::new(config.client_config())?);
    tracing::info!("Reporting API: {}", client.base_url());
    let catalog: Arc<dyn CatalogServiceTrait> = client.clone();
    Ok(build_state_with(config, client, Some(catalog)))
}

/// Builds the application state around arbitrary service implementations.
pub fn build_state_with(
    config: &Config,
    service: Arc<dyn ReportingServiceTrait>,
    catalog_service: Option<Arc<dyn CatalogServiceTrait>>,
) -> Arc<AppState> {
    let coordinator = ReportsCoordinator::new(config.initial_filters(), config.default_limit);
    let mut reports = ReportsController::new(coordinator, service);
    if let Some(catalog_service) = catalog_service {
        reports = reports.with_catalog_service(catalog_service);
    }
    Arc::new(AppState { reports })
}

/// Loads reference data and the initially active report in the background.
pub async fn warm_up(state: &AppState) {
    let reports = state.reports.clone();
    tokio::spawn(async move {
        if let Err(e) = reports.load_reference_data().await {
            tracing::warn!("Reference data unavailable: {}", e);
        }
    });

    let active = state.reports.coordinator().lock().await.active();
    if state.reports.activate(active).await.is_some() {
        tracing::info!("Loading initial {} report", active);
    }
}
