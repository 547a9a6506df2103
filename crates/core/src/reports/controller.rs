//! Async driver that runs report loads against the reporting service.

use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::{
    CategoryView, LoadRequest, ReportCategory, ReportFilters, ReportPayload, ReportsCoordinator,
    ReportsOverview, ReportingServiceTrait,
};
use crate::catalog::{AssetCatalog, CatalogServiceTrait};
use crate::errors::Result;
use crate::grouping::GroupKey;

/// Handle of a background load. Awaiting it waits until the response was applied or discarded.
pub type LoadHandle = JoinHandle<()>;

/// Calls the service endpoint matching the request's category.
pub async fn fetch_report(
    service: &dyn ReportingServiceTrait,
    request: &LoadRequest,
) -> Result<ReportPayload> {
    let query = &request.query;
    let payload = match request.category {
        ReportCategory::PortfolioSummary => {
            ReportPayload::PortfolioSummary(service.get_portfolio_snapshots(query).await?)
        }
        ReportCategory::PortfolioPerformance => {
            ReportPayload::PortfolioPerformance(service.get_portfolio_performance(query).await?)
        }
        ReportCategory::AssetGroupPerformance => ReportPayload::AssetGroupPerformance(
            service.get_asset_group_performance(query).await?,
        ),
        ReportCategory::AssetPerformance => {
            ReportPayload::AssetPerformance(service.get_asset_performance(query).await?)
        }
        ReportCategory::RawAssetSnapshots => {
            ReportPayload::RawAssetSnapshots(service.get_asset_snapshots(query).await?)
        }
    };
    Ok(payload)
}

/// Entry points of the report screen.
///
/// Each call runs the coordinator transition under the lock, releases it,
/// and spawns the resulting loads. A spawned load applies its response
/// through the coordinator, which discards it if a newer request for the
/// same category was issued in the meantime.
#[derive(Clone)]
pub struct ReportsController {
    coordinator: Arc<Mutex<ReportsCoordinator>>,
    service: Arc<dyn ReportingServiceTrait>,
    catalog_service: Option<Arc<dyn CatalogServiceTrait>>,
}

impl ReportsController {
    pub fn new(coordinator: ReportsCoordinator, service: Arc<dyn ReportingServiceTrait>) -> Self {
        Self {
            coordinator: Arc::new(Mutex::new(coordinator)),
            service,
            catalog_service: None,
        }
    }

    /// Enables asset type resolution and portfolio cross-checks through `catalog_service`.
    pub fn with_catalog_service(mut self, catalog_service: Arc<dyn CatalogServiceTrait>) -> Self {
        self.catalog_service = Some(catalog_service);
        self
    }

    /// Shared handle to the underlying coordinator.
    pub fn coordinator(&self) -> Arc<Mutex<ReportsCoordinator>> {
        self.coordinator.clone()
    }

    pub async fn view(&self, category: ReportCategory) -> CategoryView {
        self.coordinator.lock().await.view(category)
    }

    pub async fn overview(&self) -> ReportsOverview {
        self.coordinator.lock().await.overview()
    }

    /// Runs `transition` under a single lock, spawns the loads it returns, and
    /// hands back whatever else it produced.
    ///
    /// Reads taken inside `transition` see exactly the state the transition left.
    pub async fn transition<R>(
        &self,
        transition: impl FnOnce(&mut ReportsCoordinator) -> (Vec<LoadRequest>, R),
    ) -> (Vec<LoadHandle>, R) {
        let (requests, output) = {
            let mut coordinator = self.coordinator.lock().await;
            transition(&mut coordinator)
        };
        let handles = requests.into_iter().map(|r| self.dispatch(r)).collect();
        (handles, output)
    }

    pub async fn activate(&self, category: ReportCategory) -> Option<LoadHandle> {
        let request = self.coordinator.lock().await.activate(category);
        request.map(|r| self.dispatch(r))
    }

    pub async fn set_page(&self, category: ReportCategory, page: u32) -> Option<LoadHandle> {
        let request = self.coordinator.lock().await.set_page(category, page);
        request.map(|r| self.dispatch(r))
    }

    pub async fn set_limit(&self, category: ReportCategory, limit: u32) -> Option<LoadHandle> {
        let request = self.coordinator.lock().await.set_limit(category, limit);
        request.map(|r| self.dispatch(r))
    }

    pub async fn set_filters(&self, filters: ReportFilters) -> Option<LoadHandle> {
        let request = self.coordinator.lock().await.set_filters(filters);
        request.map(|r| self.dispatch(r))
    }

    pub async fn refresh_active(&self) -> LoadHandle {
        let request = self.coordinator.lock().await.refresh_active();
        self.dispatch(request)
    }

    pub async fn refresh_all(&self) -> Vec<LoadHandle> {
        let requests = self.coordinator.lock().await.refresh_all();
        requests.into_iter().map(|r| self.dispatch(r)).collect()
    }

    pub async fn toggle_group(&self, key: &GroupKey) -> bool {
        self.coordinator.lock().await.toggle_group(key)
    }

    pub async fn toggle_all_groups(&self) -> bool {
        let mut coordinator = self.coordinator.lock().await;
        coordinator.toggle_all_groups();
        coordinator.all_groups_expanded()
    }

    /// Loads the asset catalog and the portfolio list.
    ///
    /// Both are fetched concurrently. Whatever succeeds is applied; the first
    /// failure is returned afterwards.
    pub async fn load_reference_data(&self) -> Result<()> {
        let Some(catalog_service) = self.catalog_service.as_ref() else {
            return Ok(());
        };

        let (assets, portfolios) = futures::join!(
            catalog_service.list_assets(),
            catalog_service.list_portfolios()
        );

        let mut coordinator = self.coordinator.lock().await;
        let mut first_error = None;

        match assets {
            Ok(assets) => {
                debug!("Loaded {} catalog assets", assets.len());
                coordinator.set_asset_catalog(AssetCatalog::from_assets(&assets));
            }
            Err(err) => {
                warn!("Failed to load asset catalog: {}", err);
                first_error.get_or_insert(err);
            }
        }

        match portfolios {
            Ok(portfolios) => {
                debug!("Loaded {} portfolios", portfolios.len());
                coordinator.set_known_portfolios(&portfolios);
            }
            Err(err) => {
                warn!("Failed to load portfolio list: {}", err);
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn dispatch(&self, request: LoadRequest) -> LoadHandle {
        let service = self.service.clone();
        let coordinator = self.coordinator.clone();
        tokio::spawn(async move {
            let result = fetch_report(service.as_ref(), &request).await;
            let outcome = coordinator
                .lock()
                .await
                .apply(request.category, request.seq, result);
            debug!(
                "{} load #{} finished: {:?}",
                request.category, request.seq, outcome
            );
        })
    }
}
