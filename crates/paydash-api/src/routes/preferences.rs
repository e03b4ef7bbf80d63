//! Saved preferences: dark mode plus the filter and sort of both tables

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use paydash_core::{PreferencesUpdate, SessionPreferences};

use super::with_session;
use crate::routes::JsonBody;
use crate::{ApiResult, AppState};

pub async fn api_preferences(state: State<AppState>, headers: HeaderMap) -> ApiResult<Json<SessionPreferences>> {
    with_session(&state, &headers, |session| session.saved_preferences())
        .await
        .map(Json)
}

pub async fn api_update_preferences(
    state: State<AppState>,
    headers: HeaderMap,
    JsonBody(update): JsonBody<PreferencesUpdate>,
) -> ApiResult<Json<SessionPreferences>> {
    with_session(&state, &headers, |session| {
        session.apply_preferences(update);
        session.saved_preferences()
    })
    .await
    .map(Json)
}
