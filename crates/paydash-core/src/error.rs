//! Error types for paydash-core
//!
//! Error codes, severity levels and structured details shared by the
//! session layer and the HTTP API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No session for the given id
    SessionNotFound,
    /// Session idle for longer than the configured ttl
    SessionExpired,
    /// Request parameter could not be interpreted
    InvalidParameter,
    /// Upstream fetch failed
    FetchFailed,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::SessionNotFound => write!(f, "SESSION_NOT_FOUND"),
            ErrorCode::SessionExpired => write!(f, "SESSION_EXPIRED"),
            ErrorCode::InvalidParameter => write!(f, "INVALID_PARAMETER"),
            ErrorCode::FetchFailed => write!(f, "FETCH_FAILED"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    /// Operation may be affected
    Warning,
    /// Operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for paydash-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Session not found")]
    SessionNotFound,

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Failed to fetch transactions: {message}")]
    FetchFailed { message: String },
}

impl CoreError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        CoreError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::SessionNotFound => ErrorCode::SessionNotFound,
            CoreError::SessionExpired => ErrorCode::SessionExpired,
            CoreError::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            CoreError::FetchFailed { .. } => ErrorCode::FetchFailed,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::SessionNotFound => ErrorSeverity::Info,
            CoreError::SessionExpired => ErrorSeverity::Info,
            CoreError::InvalidParameter { .. } => ErrorSeverity::Warning,
            CoreError::FetchFailed { .. } => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::SessionNotFound | CoreError::SessionExpired => {
                details = details.with_suggestion(
                    "Log in again via POST /api/login.".to_string()
                );
            }
            CoreError::InvalidParameter { name, reason } => {
                details = details.with_detail(serde_json::json!({
                    "parameter": name,
                    "reason": reason,
                }));
            }
            CoreError::FetchFailed { message } => {
                details = details.with_detail(serde_json::json!({ "upstream_message": message }));
                details = details.with_suggestion(
                    "Retry the refresh; the previous records were cleared.".to_string()
                );
            }
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    pub data: serde_json::Value,
}

impl ErrorContext {
    pub fn new(operation: String) -> Self {
        Self {
            operation,
            data: serde_json::json!({}),
        }
    }

    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Info => log::info!(
                target: "paydash::error",
                "[{}] {} - Operation: {}",
                error.code(),
                error,
                context.operation
            ),
            ErrorSeverity::Warning => log::warn!(
                target: "paydash::error",
                "[{}] {} - Operation: {} - Data: {}",
                error.code(),
                error,
                context.operation,
                context.data
            ),
            ErrorSeverity::Error => log::error!(
                target: "paydash::error",
                "ERROR [{}] {} - Operation: {} - Data: {}",
                error.code(),
                error.to_details(),
                context.operation,
                context.data
            ),
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::SessionNotFound.to_string(), "SESSION_NOT_FOUND");
        assert_eq!(ErrorCode::FetchFailed.to_string(), "FETCH_FAILED");
        assert_eq!(ErrorCode::InvalidParameter.to_string(), "INVALID_PARAMETER");
    }

    #[test]
    fn test_error_code_serializes_like_display() {
        let json = serde_json::to_string(&ErrorCode::SessionExpired).unwrap();
        assert_eq!(json, "\"SESSION_EXPIRED\"");
    }

    #[test]
    fn test_core_error_code_and_severity() {
        let error = CoreError::FetchFailed { message: "timeout".to_string() };
        assert_eq!(error.code(), ErrorCode::FetchFailed);
        assert_eq!(error.severity(), ErrorSeverity::Error);

        assert_eq!(CoreError::SessionExpired.severity(), ErrorSeverity::Info);
        assert_eq!(error.to_details().details.unwrap()["upstream_message"], "timeout");
    }

    #[test]
    fn test_invalid_parameter_details() {
        let error = CoreError::invalid_parameter("page", "must be a positive integer");
        let details = error.to_details();
        assert_eq!(details.code, ErrorCode::InvalidParameter);
        assert!(details.message.contains("page"));
        assert_eq!(details.details.unwrap()["parameter"], "page");
    }

    #[test]
    fn test_session_errors_suggest_login() {
        let details = CoreError::SessionNotFound.to_details();
        assert_eq!(details.suggestions.len(), 1);
        assert!(details.to_string().starts_with("[SESSION_NOT_FOUND]"));
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("refresh".to_string())
            .with_data("school_id", serde_json::json!("s1"));
        assert_eq!(context.operation, "refresh");
        assert_eq!(context.data["school_id"], "s1");
    }
}
