//! Overview table API endpoints
//!
//! Endpoints:
//! - api_transactions: current view (JSON)
//! - api_transactions_refresh: reload every transaction from upstream
//! - api_transactions_filter: merge a partial filter
//! - api_transactions_toggle_status / api_transactions_toggle_school
//! - api_transactions_sort: header-click or explicit sort
//! - api_transactions_page: jump to a page
//! - api_transactions_reset: clear filters, default sort
//! - api_transactions_schools: school ids for the filter dropdown
//! - api_transactions_summary: status counts

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use paydash_core::{FilterPatch, SummaryResponse, ViewSnapshot};
use serde::Serialize;

use crate::routes::view::{self, PageRequest, SchoolToggleRequest, SortRequest, StatusToggleRequest, ViewKind};
use crate::routes::with_session;
use crate::routes::JsonBody;
use crate::{ApiResult, AppState};

const KIND: ViewKind = ViewKind::Overview;

#[derive(Debug, Serialize)]
pub struct SchoolsResponse {
    pub schools: Vec<String>,
}

pub async fn api_transactions(state: State<AppState>, headers: HeaderMap) -> ApiResult<Json<ViewSnapshot>> {
    view::snapshot(&state, &headers, KIND).await.map(Json)
}

pub async fn api_transactions_refresh(state: State<AppState>, headers: HeaderMap) -> ApiResult<Json<ViewSnapshot>> {
    view::refresh(&state, &headers, KIND, None).await.map(Json)
}

pub async fn api_transactions_filter(
    state: State<AppState>,
    headers: HeaderMap,
    JsonBody(patch): JsonBody<FilterPatch>,
) -> ApiResult<Json<ViewSnapshot>> {
    view::filter(&state, &headers, KIND, patch).await.map(Json)
}

pub async fn api_transactions_toggle_status(
    state: State<AppState>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<StatusToggleRequest>,
) -> ApiResult<Json<ViewSnapshot>> {
    view::toggle_status(&state, &headers, KIND, request).await.map(Json)
}

pub async fn api_transactions_toggle_school(
    state: State<AppState>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<SchoolToggleRequest>,
) -> ApiResult<Json<ViewSnapshot>> {
    view::toggle_school(&state, &headers, KIND, request).await.map(Json)
}

pub async fn api_transactions_sort(
    state: State<AppState>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<SortRequest>,
) -> ApiResult<Json<ViewSnapshot>> {
    view::sort(&state, &headers, KIND, request).await.map(Json)
}

pub async fn api_transactions_page(
    state: State<AppState>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<PageRequest>,
) -> ApiResult<Json<ViewSnapshot>> {
    view::page(&state, &headers, KIND, request).await.map(Json)
}

pub async fn api_transactions_reset(state: State<AppState>, headers: HeaderMap) -> ApiResult<Json<ViewSnapshot>> {
    view::reset(&state, &headers, KIND).await.map(Json)
}

/// Unique school ids of the loaded overview, in first-seen order
pub async fn api_transactions_schools(state: State<AppState>, headers: HeaderMap) -> ApiResult<Json<SchoolsResponse>> {
    with_session(&state, &headers, |session| SchoolsResponse {
        schools: session.overview.engine.school_ids(),
    })
    .await
    .map(Json)
}

pub async fn api_transactions_summary(state: State<AppState>, headers: HeaderMap) -> ApiResult<Json<SummaryResponse>> {
    view::summary(&state, &headers, KIND).await.map(Json)
}
