//! Login and logout

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use paydash_core::{PreferencesUpdate, SessionPreferences};
use serde::{Deserialize, Serialize};

use super::bearer_session_id;
use crate::routes::view::not_blank;
use crate::routes::JsonBody;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
    /// Preferences saved from an earlier session
    #[serde(default)]
    pub preferences: Option<PreferencesUpdate>,
}

#[derive(Debug, Serialize)]
pub struct LoginReply {
    pub success: bool,
    pub session_id: String,
    pub preferences: SessionPreferences,
}

#[derive(Debug, Serialize)]
pub struct LogoutReply {
    pub success: bool,
}

/// Authenticate upstream and open a session
pub async fn api_login(state: State<AppState>, JsonBody(body): JsonBody<LoginBody>) -> ApiResult<Json<LoginReply>> {
    let email = not_blank(&body.email, "email")?;
    if body.password.is_empty() {
        return Err(ApiError::bad_request("Password is required"));
    }

    let token = state.source.login(&email, &body.password).await?;

    let mut sessions = state.sessions.write().await;
    let session_id = sessions.create(token);
    let session = sessions.get(&session_id)?;
    if let Some(preferences) = body.preferences {
        session.apply_preferences(preferences);
    }
    log::info!("User {} logged in", email);

    Ok(Json(LoginReply {
        success: true,
        preferences: session.saved_preferences(),
        session_id,
    }))
}

/// Close the caller's session; unknown sessions report `success: false`
pub async fn api_logout(state: State<AppState>, headers: HeaderMap) -> ApiResult<Json<LogoutReply>> {
    let id = bearer_session_id(&headers)?;
    let removed = state.sessions.write().await.remove(id);
    Ok(Json(LogoutReply { success: removed }))
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::{app, login, send, PASSWORD};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_and_logout() {
        let app = app();
        let session = login(&app).await;
        assert_eq!(session.len(), 32);

        let (status, body) = send(&app, "POST", "/api/logout", Some(&session), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, _) = send(&app, "GET", "/api/transactions", Some(&session), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, body) = send(&app, "POST", "/api/logout", Some(&session), None).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/login",
            None,
            Some(json!({"email": "admin@school.test", "password": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert!(body["error"]["message"].as_str().unwrap().contains("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_blank_fields_are_bad_requests() {
        let app = app();
        let (status, _) = send(
            &app,
            "POST",
            "/api/login",
            None,
            Some(json!({"email": "  ", "password": PASSWORD})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "POST",
            "/api/login",
            None,
            Some(json!({"email": "a@b.test", "password": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_restores_preferences() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/login",
            None,
            Some(json!({
                "email": "admin@school.test",
                "password": PASSWORD,
                "preferences": {
                    "dark_mode": true,
                    "overview": {"sort": {"field": "gateway", "direction": "asc"}}
                }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["preferences"]["dark_mode"], true);
        assert_eq!(body["preferences"]["overview"]["sort"]["field"], "gateway");
        assert_eq!(body["preferences"]["school"]["sort"]["field"], "payment_time");
    }
}
