//! Report screen endpoints.
//!
//! Every mutation runs the transition synchronously, starts any resulting
//! loads in the background, and answers with the post-transition read model.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post, put},
    Json, Router,
};
use snapfolio_core::errors::ValidationError;
use snapfolio_core::grouping::GroupKey;
use snapfolio_core::reports::{CategoryView, ReportCategory, ReportFilters, ReportsOverview};
use snapfolio_core::snapshots::Granularity;

use super::dto::{ExpansionResponse, FiltersBody, GroupKeyBody, LimitBody, PageBody};
use crate::{error::ApiResult, main_lib::AppState};

fn parse_category(raw: &str) -> Result<ReportCategory, ValidationError> {
    raw.parse()
}

fn paginated_category(raw: &str) -> Result<ReportCategory, ValidationError> {
    let category = parse_category(raw)?;
    if !category.is_server_paginated() {
        return Err(ValidationError::NotPaginated(category.to_string()));
    }
    Ok(category)
}

#[utoipa::path(get, path = "/api/v1/reports", responses((status = 200, description = "Every report tab")))]
pub async fn get_reports(State(state): State<Arc<AppState>>) -> ApiResult<Json<ReportsOverview>> {
    Ok(Json(state.reports.overview().await))
}

#[utoipa::path(get, path = "/api/v1/reports/{category}", responses((status = 200, description = "One report tab")))]
pub async fn get_report(
    Path(category): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CategoryView>> {
    let category = parse_category(&category)?;
    Ok(Json(state.reports.view(category).await))
}

#[utoipa::path(post, path = "/api/v1/reports/{category}/activate", responses((status = 200, description = "Activated report tab")))]
pub async fn activate_report(
    Path(category): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CategoryView>> {
    let category = parse_category(&category)?;
    let (handles, view) = state
        .reports
        .transition(|reports| {
            let request = reports.activate(category);
            (request.into_iter().collect(), reports.view(category))
        })
        .await;
    if handles.is_empty() {
        tracing::debug!("{} already loaded, not refetching", category);
    }
    Ok(Json(view))
}

#[utoipa::path(put, path = "/api/v1/reports/{category}/page", responses((status = 200, description = "Report tab after the page change")))]
pub async fn set_report_page(
    Path(category): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Result<Json<PageBody>, JsonRejection>,
) -> ApiResult<Json<CategoryView>> {
    let category = paginated_category(&category)?;
    let Json(body) = body?;
    if body.page == 0 {
        return Err(ValidationError::InvalidPage(body.page).into());
    }
    let (_, view) = state
        .reports
        .transition(|reports| {
            let request = reports.set_page(category, body.page);
            (request.into_iter().collect(), reports.view(category))
        })
        .await;
    Ok(Json(view))
}

#[utoipa::path(put, path = "/api/v1/reports/{category}/limit", responses((status = 200, description = "Report tab after the page size change")))]
pub async fn set_report_limit(
    Path(category): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Result<Json<LimitBody>, JsonRejection>,
) -> ApiResult<Json<CategoryView>> {
    let category = paginated_category(&category)?;
    let Json(body) = body?;
    if body.limit == 0 {
        return Err(ValidationError::InvalidLimit(body.limit).into());
    }
    let (_, view) = state
        .reports
        .transition(|reports| {
            let request = reports.set_limit(category, body.limit);
            (request.into_iter().collect(), reports.view(category))
        })
        .await;
    Ok(Json(view))
}

#[utoipa::path(post, path = "/api/v1/reports/refresh", responses((status = 200, description = "Active report tab")))]
pub async fn refresh_active_report(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CategoryView>> {
    let (_, view) = state
        .reports
        .transition(|reports| {
            let request = reports.refresh_active();
            (vec![request], reports.view(reports.active()))
        })
        .await;
    Ok(Json(view))
}

#[utoipa::path(post, path = "/api/v1/reports/refresh-all", responses((status = 200, description = "Every report tab")))]
pub async fn refresh_all_reports(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ReportsOverview>> {
    let (handles, overview) = state
        .reports
        .transition(|reports| (reports.refresh_all(), reports.overview()))
        .await;
    tracing::debug!("Refreshing {} reports", handles.len());
    Ok(Json(overview))
}

#[utoipa::path(put, path = "/api/v1/reports/filters", responses((status = 200, description = "Every report tab")))]
pub async fn update_filters(
    State(state): State<Arc<AppState>>,
    body: Result<Json<FiltersBody>, JsonRejection>,
) -> ApiResult<Json<ReportsOverview>> {
    let Json(body) = body?;
    let granularity = body
        .granularity
        .as_deref()
        .map(|raw| raw.parse::<Granularity>())
        .transpose()?;
    let portfolio_id = body
        .portfolio_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());

    let (_, overview) = state
        .reports
        .transition(|reports| {
            let filters = ReportFilters {
                portfolio_id,
                granularity: granularity.unwrap_or(reports.filters().granularity),
            };
            let request = reports.set_filters(filters);
            (request.into_iter().collect(), reports.overview())
        })
        .await;
    Ok(Json(overview))
}

#[utoipa::path(post, path = "/api/v1/reports/raw-asset-snapshots/groups/toggle", responses((status = 200, description = "Expansion state of the group")))]
pub async fn toggle_snapshot_group(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GroupKeyBody>, JsonRejection>,
) -> ApiResult<Json<ExpansionResponse>> {
    let Json(body) = body?;
    let key = GroupKey::from(body);
    let (_, response) = state
        .reports
        .transition(|reports| {
            let expanded = reports.toggle_group(&key);
            let response = ExpansionResponse {
                expanded,
                all_expanded: reports.all_groups_expanded(),
            };
            (vec![], response)
        })
        .await;
    Ok(Json(response))
}

#[utoipa::path(post, path = "/api/v1/reports/raw-asset-snapshots/groups/toggle-all", responses((status = 200, description = "Expansion state of every group")))]
pub async fn toggle_all_snapshot_groups(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ExpansionResponse>> {
    let all_expanded = state.reports.toggle_all_groups().await;
    Ok(Json(ExpansionResponse {
        expanded: all_expanded,
        all_expanded,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports", get(get_reports))
        .route("/reports/refresh", post(refresh_active_report))
        .route("/reports/refresh-all", post(refresh_all_reports))
        .route("/reports/filters", put(update_filters))
        .route(
            "/reports/raw-asset-snapshots/groups/toggle",
            post(toggle_snapshot_group),
        )
        .route(
            "/reports/raw-asset-snapshots/groups/toggle-all",
            post(toggle_all_snapshot_groups),
        )
        .route("/reports/{category}", get(get_report))
        .route("/reports/{category}/activate", post(activate_report))
        .route("/reports/{category}/page", put(set_report_page))
        .route("/reports/{category}/limit", put(set_report_limit))
}
