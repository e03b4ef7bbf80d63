//! School table API endpoints
//!
//! `api_school_refresh` selects the school and loads its transactions; the
//! remaining endpoints mirror the overview table on the school view.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use paydash_core::{FilterPatch, SummaryResponse, ViewSnapshot};

use crate::routes::view::{self, not_blank, PageRequest, SchoolToggleRequest, SortRequest, StatusToggleRequest, ViewKind};
use crate::routes::JsonBody;
use crate::{ApiResult, AppState};

const KIND: ViewKind = ViewKind::School;

pub async fn api_school_refresh(
    state: State<AppState>,
    headers: HeaderMap,
    Path(school_id): Path<String>,
) -> ApiResult<Json<ViewSnapshot>> {
    let school_id = not_blank(&school_id, "school_id")?;
    view::refresh(&state, &headers, KIND, Some(school_id)).await.map(Json)
}

pub async fn api_school_view(state: State<AppState>, headers: HeaderMap) -> ApiResult<Json<ViewSnapshot>> {
    view::snapshot(&state, &headers, KIND).await.map(Json)
}

pub async fn api_school_filter(
    state: State<AppState>,
    headers: HeaderMap,
    JsonBody(patch): JsonBody<FilterPatch>,
) -> ApiResult<Json<ViewSnapshot>> {
    view::filter(&state, &headers, KIND, patch).await.map(Json)
}

pub async fn api_school_toggle_status(
    state: State<AppState>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<StatusToggleRequest>,
) -> ApiResult<Json<ViewSnapshot>> {
    view::toggle_status(&state, &headers, KIND, request).await.map(Json)
}

pub async fn api_school_toggle_school(
    state: State<AppState>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<SchoolToggleRequest>,
) -> ApiResult<Json<ViewSnapshot>> {
    view::toggle_school(&state, &headers, KIND, request).await.map(Json)
}

pub async fn api_school_sort(
    state: State<AppState>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<SortRequest>,
) -> ApiResult<Json<ViewSnapshot>> {
    view::sort(&state, &headers, KIND, request).await.map(Json)
}

pub async fn api_school_page(
    state: State<AppState>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<PageRequest>,
) -> ApiResult<Json<ViewSnapshot>> {
    view::page(&state, &headers, KIND, request).await.map(Json)
}

pub async fn api_school_reset(state: State<AppState>, headers: HeaderMap) -> ApiResult<Json<ViewSnapshot>> {
    view::reset(&state, &headers, KIND).await.map(Json)
}

pub async fn api_school_summary(state: State<AppState>, headers: HeaderMap) -> ApiResult<Json<SummaryResponse>> {
    view::summary(&state, &headers, KIND).await.map(Json)
}
