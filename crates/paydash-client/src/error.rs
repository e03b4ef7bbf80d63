//! Error types for paydash-client

use thiserror::Error;

/// Failure talking to the upstream payments API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream server error {0}: {1}")]
    Server(u16, String),

    #[error("Unexpected HTTP status {0}: {1}")]
    Http(u16, String),

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// Map a non-success HTTP status and its body to an error
    ///
    /// JSON bodies with a `message` field contribute that message; anything
    /// else is passed through as text.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());

        match status {
            400 => ClientError::BadRequest(message),
            401 => ClientError::Unauthorized(message),
            403 => ClientError::Forbidden(message),
            404 => ClientError::NotFound(message),
            500..=599 => {
                log::warn!("Upstream server error {}: {}", status, message);
                ClientError::Server(status, message)
            }
            _ => ClientError::Http(status, message),
        }
    }

    /// Whether re-authenticating could fix this error
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_) | ClientError::Forbidden(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ClientError::Timeout
        } else if error.is_decode() {
            ClientError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            ClientError::from_status(status.as_u16(), &error.to_string())
        } else {
            ClientError::Request(error.to_string())
        }
    }
}

/// Result type with ClientError
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ClientError::from_status(401, "nope"), ClientError::Unauthorized("nope".to_string()));
        assert_eq!(ClientError::from_status(404, ""), ClientError::NotFound(String::new()));
        assert!(matches!(ClientError::from_status(503, "down"), ClientError::Server(503, _)));
        assert!(matches!(ClientError::from_status(418, "teapot"), ClientError::Http(418, _)));
    }

    #[test]
    fn test_json_message_is_extracted() {
        let error = ClientError::from_status(400, r#"{"message": "email is required"}"#);
        assert_eq!(error, ClientError::BadRequest("email is required".to_string()));
    }

    #[test]
    fn test_is_auth() {
        assert!(ClientError::Unauthorized(String::new()).is_auth());
        assert!(ClientError::Forbidden(String::new()).is_auth());
        assert!(!ClientError::Timeout.is_auth());
    }
}
