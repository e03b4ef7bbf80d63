//! Table operations shared by the overview and school tables

use axum::http::HeaderMap;
use paydash_core::{
    CoreError, FilterPatch, Session, SortDirection, SortField, SortState, SummaryResponse, TransactionStatus,
    ViewSnapshot, ViewState,
};
use serde::Deserialize;

use super::with_session;
use crate::{ApiError, ApiResult, AppState};

/// Which of the session's two tables a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Overview,
    School,
}

impl ViewKind {
    pub fn view_mut(self, session: &mut Session) -> &mut ViewState {
        match self {
            ViewKind::Overview => &mut session.overview,
            ViewKind::School => &mut session.school,
        }
    }
}

/// `POST .../sort` body
///
/// Without a direction the usual header-click toggle applies.
#[derive(Debug, Clone, Deserialize)]
pub struct SortRequest {
    pub field: String,
    #[serde(default)]
    pub direction: Option<String>,
}

/// `POST .../page` body
#[derive(Debug, Clone, Deserialize)]
pub struct PageRequest {
    pub page: usize,
}

/// `POST .../filter/status` body
#[derive(Debug, Clone, Deserialize)]
pub struct StatusToggleRequest {
    pub status: String,
}

/// `POST .../filter/school` body
#[derive(Debug, Clone, Deserialize)]
pub struct SchoolToggleRequest {
    pub school_id: String,
}

/// Run `f` on one table of the caller's session and return the new view
pub(crate) async fn update(
    state: &AppState,
    headers: &HeaderMap,
    kind: ViewKind,
    f: impl FnOnce(&mut ViewState),
) -> ApiResult<ViewSnapshot> {
    with_session(state, headers, |session| {
        let view = kind.view_mut(session);
        f(view);
        view.snapshot()
    })
    .await
}

pub(crate) async fn snapshot(state: &AppState, headers: &HeaderMap, kind: ViewKind) -> ApiResult<ViewSnapshot> {
    update(state, headers, kind, |_| {}).await
}

/// Fetch records upstream and load them into a table
///
/// The store lock is released while the upstream call is in flight. A failed
/// fetch is reported inside the returned view, not as an HTTP error.
pub(crate) async fn refresh(
    state: &AppState,
    headers: &HeaderMap,
    kind: ViewKind,
    school_id: Option<String>,
) -> ApiResult<ViewSnapshot> {
    let token = with_session(state, headers, |session| session.token.clone()).await?;

    let result = match school_id.as_deref() {
        Some(id) => state.source.school_transactions(&token, id).await,
        None => state.source.list_transactions(&token).await,
    };

    update(state, headers, kind, move |view| {
        if school_id.is_some() {
            view.school_id = school_id;
        }
        view.apply_fetch(result);
    })
    .await
}

pub(crate) async fn filter(
    state: &AppState,
    headers: &HeaderMap,
    kind: ViewKind,
    patch: FilterPatch,
) -> ApiResult<ViewSnapshot> {
    update(state, headers, kind, |view| view.engine.set_filter(patch)).await
}

pub(crate) async fn toggle_status(
    state: &AppState,
    headers: &HeaderMap,
    kind: ViewKind,
    request: StatusToggleRequest,
) -> ApiResult<ViewSnapshot> {
    let status: TransactionStatus = request
        .status
        .parse()
        .map_err(|reason: String| CoreError::invalid_parameter("status", reason))?;
    update(state, headers, kind, |view| view.engine.toggle_status(status)).await
}

pub(crate) async fn toggle_school(
    state: &AppState,
    headers: &HeaderMap,
    kind: ViewKind,
    request: SchoolToggleRequest,
) -> ApiResult<ViewSnapshot> {
    let school_id = not_blank(&request.school_id, "school_id")?;
    update(state, headers, kind, |view| view.engine.toggle_school(&school_id)).await
}

pub(crate) async fn sort(
    state: &AppState,
    headers: &HeaderMap,
    kind: ViewKind,
    request: SortRequest,
) -> ApiResult<ViewSnapshot> {
    let field: SortField = request
        .field
        .parse()
        .map_err(|reason: String| CoreError::invalid_parameter("field", reason))?;
    let direction: Option<SortDirection> = match request.direction.as_deref() {
        Some(direction) => Some(
            direction
                .parse()
                .map_err(|reason: String| CoreError::invalid_parameter("direction", reason))?,
        ),
        None => None,
    };

    update(state, headers, kind, |view| match direction {
        Some(direction) => view.engine.set_sort_state(SortState::new(field, direction)),
        None => view.engine.set_sort(field),
    })
    .await
}

/// Out-of-range pages leave the view unchanged
pub(crate) async fn page(
    state: &AppState,
    headers: &HeaderMap,
    kind: ViewKind,
    request: PageRequest,
) -> ApiResult<ViewSnapshot> {
    update(state, headers, kind, |view| {
        if !view.engine.set_page(request.page) {
            log::debug!("Ignoring out-of-range page {}", request.page);
        }
    })
    .await
}

pub(crate) async fn reset(state: &AppState, headers: &HeaderMap, kind: ViewKind) -> ApiResult<ViewSnapshot> {
    update(state, headers, kind, |view| view.engine.reset()).await
}

pub(crate) async fn summary(state: &AppState, headers: &HeaderMap, kind: ViewKind) -> ApiResult<SummaryResponse> {
    with_session(state, headers, |session| {
        let engine = &kind.view_mut(session).engine;
        SummaryResponse::new(engine.status_summary(), engine.filtered_summary())
    })
    .await
}

pub(crate) fn not_blank(value: &str, name: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CoreError::invalid_parameter(name, "must not be empty").into())
    } else {
        Ok(trimmed.to_string())
    }
}
