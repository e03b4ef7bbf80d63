//! Route modules for the API server
//!
//! - auth: login and logout
//! - transactions: overview table handlers
//! - schools: school table handlers
//! - view: table operations shared by both tables
//! - status: order status lookup
//! - preferences: saved preferences
//!
//! Every route except health and login expects the session id as a bearer
//! token.

pub mod auth;
pub mod preferences;
pub mod schools;
pub mod status;
pub mod transactions;
pub mod view;

use axum::extract::FromRequest;
use axum::http::HeaderMap;
use paydash_core::Session;

use crate::{ApiError, AppState};

/// JSON request body; malformed bodies answer with the API error envelope
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Session id from the `Authorization: Bearer <id>` header
pub(crate) fn bearer_session_id(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(ApiError::Unauthorized)?;

    let header = header.to_str().map_err(|_| ApiError::Unauthorized)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?
        .trim();
    if token.is_empty() {
        return Err(ApiError::Unauthorized);
    }

    Ok(token)
}

/// Run `f` against the caller's session under the store's write lock
pub(crate) async fn with_session<R>(
    state: &AppState,
    headers: &HeaderMap,
    f: impl FnOnce(&mut Session) -> R,
) -> Result<R, ApiError> {
    let id = bearer_session_id(headers)?;
    let mut sessions = state.sessions.write().await;
    let session = sessions.get(id)?;
    Ok(f(session))
}
