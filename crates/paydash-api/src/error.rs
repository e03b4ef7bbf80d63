//! Error types for paydash-api

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use paydash_client::ClientError;
use paydash_core::{CoreError, DefaultErrorLogger, ErrorContext, ErrorLogger};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Missing or malformed bearer token")]
    Unauthorized,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Upstream error: {0}")]
    Upstream(#[from] ClientError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Core(e) => match e {
                CoreError::SessionNotFound | CoreError::SessionExpired => StatusCode::UNAUTHORIZED,
                CoreError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
                CoreError::FetchFailed { .. } => StatusCode::BAD_GATEWAY,
            },
            ApiError::Upstream(e) => match e {
                ClientError::Unauthorized(_) | ClientError::Forbidden(_) => StatusCode::UNAUTHORIZED,
                ClientError::NotFound(_) => StatusCode::NOT_FOUND,
                ClientError::BadRequest(_) | ClientError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                ClientError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }

    /// Stable machine-readable code for the response body
    pub fn code(&self) -> String {
        match self {
            ApiError::BadRequest { .. } => "BAD_REQUEST".to_string(),
            ApiError::Unauthorized => "UNAUTHORIZED".to_string(),
            ApiError::Core(e) => e.code().to_string(),
            ApiError::Upstream(ClientError::NotFound(_)) => "NOT_FOUND".to_string(),
            ApiError::Upstream(e) if e.is_auth() => "UNAUTHORIZED".to_string(),
            ApiError::Upstream(_) => "UPSTREAM_ERROR".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Core(e) => {
                DefaultErrorLogger.log_error(e, &ErrorContext::new("api".to_string()));
                serde_json::to_value(e.to_details()).unwrap_or_else(|_| json!({}))
            }
            _ => {
                if status.is_server_error() {
                    log::warn!("{} -> {}", self, status);
                } else {
                    log::debug!("{} -> {}", self, status);
                }
                json!({
                    "code": self.code(),
                    "message": self.to_string(),
                })
            }
        };

        (status, axum::Json(json!({ "success": false, "error": body }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(CoreError::SessionExpired).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(CoreError::invalid_parameter("page", "not a number")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::from(ClientError::Timeout).status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            ApiError::from(ClientError::Server(500, String::new())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(ClientError::NotFound(String::new())).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(ApiError::from(CoreError::SessionNotFound).code(), "SESSION_NOT_FOUND");
        assert_eq!(
            ApiError::from(ClientError::Unauthorized("x".to_string())).code(),
            "UNAUTHORIZED"
        );
        assert_eq!(ApiError::from(ClientError::Timeout).code(), "UPSTREAM_ERROR");
        assert_eq!(ApiError::bad_request("x").code(), "BAD_REQUEST");
    }
}
