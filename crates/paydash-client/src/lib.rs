//! Client for the upstream school-payments API
//!
//! [`TransactionSource`] is the seam the HTTP layer talks to;
//! [`PaymentsClient`] implements it over `reqwest`.

pub mod error;
pub mod models;

use async_trait::async_trait;
use paydash_config::UpstreamConfig;
use paydash_core::{records_from_values, TransactionRecord, TransactionStatus};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use std::time::Duration;

pub use error::{ClientError, ClientResult};
use models::{ListResponse, LoginRequest, LoginResponse, StatusResponse};

/// Result of a single status lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCheck {
    pub order_id: String,
    pub status: TransactionStatus,
    /// Status text exactly as the upstream reported it
    pub raw_status: String,
}

/// Source of transaction data
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Exchange credentials for an access token
    async fn login(&self, email: &str, password: &str) -> ClientResult<String>;

    /// Every transaction visible to the token
    async fn list_transactions(&self, token: &str) -> ClientResult<Vec<TransactionRecord>>;

    /// Transactions of one school
    async fn school_transactions(&self, token: &str, school_id: &str) -> ClientResult<Vec<TransactionRecord>>;

    /// Current status of one order
    async fn transaction_status(&self, token: &str, order_id: &str) -> ClientResult<StatusCheck>;
}

/// `reqwest` implementation of [`TransactionSource`]
#[derive(Debug, Clone)]
pub struct PaymentsClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl PaymentsClient {
    pub fn new(config: &UpstreamConfig) -> ClientResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an upstream URL, percent-encoding a trailing path segment
    fn url(&self, path: &str, segment: Option<&str>) -> String {
        match segment {
            Some(segment) => format!("{}{}/{}", self.base_url, path, urlencoding::encode(segment)),
            None => format!("{}{}", self.base_url, path),
        }
    }

    fn headers(token: Option<&str>) -> ClientResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ClientError::InvalidInput(format!("Invalid access token: {}", e)))?;
            headers.insert(AUTHORIZATION, auth_value);
        }
        Ok(headers)
    }

    async fn check(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_status(status.as_u16(), &body))
    }

    async fn get_list(&self, url: String, token: &str) -> ClientResult<Vec<TransactionRecord>> {
        log::debug!("GET {}", url);
        let response = self
            .http_client
            .get(&url)
            .headers(Self::headers(Some(token))?)
            .send()
            .await?;
        let list: ListResponse = Self::check(response).await?.json().await?;
        let records = records_from_values(list.data.unwrap_or_default());
        log::debug!("Fetched {} transactions from {}", records.len(), url);
        Ok(records)
    }
}

#[async_trait]
impl TransactionSource for PaymentsClient {
    async fn login(&self, email: &str, password: &str) -> ClientResult<String> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http_client
            .post(self.url("/auth/login", None))
            .headers(Self::headers(None)?)
            .json(&body)
            .send()
            .await?;
        let login: LoginResponse = Self::check(response).await?.json().await?;
        login_token(login)
    }

    async fn list_transactions(&self, token: &str) -> ClientResult<Vec<TransactionRecord>> {
        self.get_list(self.url("/transactions", None), token).await
    }

    async fn school_transactions(&self, token: &str, school_id: &str) -> ClientResult<Vec<TransactionRecord>> {
        let school_id = non_empty(school_id, "school id")?;
        self.get_list(self.url("/transactions/school", Some(school_id)), token)
            .await
    }

    async fn transaction_status(&self, token: &str, order_id: &str) -> ClientResult<StatusCheck> {
        let order_id = non_empty(order_id, "order id")?;
        let url = self.url("/transaction-status", Some(order_id));
        log::debug!("GET {}", url);
        let response = self
            .http_client
            .get(&url)
            .headers(Self::headers(Some(token))?)
            .send()
            .await?;
        let status: StatusResponse = Self::check(response).await?.json().await?;
        status_check(order_id, status)
    }
}

fn non_empty<'a>(value: &'a str, what: &str) -> ClientResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ClientError::InvalidInput(format!("{} must not be empty", what)))
    } else {
        Ok(trimmed)
    }
}

fn login_token(login: LoginResponse) -> ClientResult<String> {
    match login.access_token {
        Some(token) if login.success && !token.is_empty() => Ok(token),
        _ => Err(ClientError::Unauthorized(
            login.message.unwrap_or_else(|| "Login failed".to_string()),
        )),
    }
}

fn status_check(order_id: &str, response: StatusResponse) -> ClientResult<StatusCheck> {
    if !response.success {
        return Err(ClientError::NotFound("Transaction not found".to_string()));
    }
    let raw_status = match response.status {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    Ok(StatusCheck {
        order_id: order_id.to_string(),
        status: TransactionStatus::parse_lenient(&raw_status),
        raw_status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> PaymentsClient {
        PaymentsClient::new(&UpstreamConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_url_building() {
        let client = client("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url("/transactions", None), "http://localhost:3000/transactions");
        assert_eq!(
            client.url("/transactions/school", Some("a b/c")),
            "http://localhost:3000/transactions/school/a%20b%2Fc"
        );
    }

    #[test]
    fn test_headers_carry_bearer_token() {
        let headers = PaymentsClient::headers(Some("abc")).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert!(PaymentsClient::headers(None).unwrap().get(AUTHORIZATION).is_none());
        assert!(PaymentsClient::headers(Some("bad\ntoken")).is_err());
    }

    #[test]
    fn test_login_token() {
        let ok = LoginResponse {
            success: true,
            access_token: Some("tok".to_string()),
            message: None,
        };
        assert_eq!(login_token(ok).unwrap(), "tok");

        let rejected = LoginResponse {
            success: false,
            access_token: None,
            message: Some("Invalid credentials".to_string()),
        };
        assert_eq!(
            login_token(rejected),
            Err(ClientError::Unauthorized("Invalid credentials".to_string()))
        );

        assert_eq!(
            login_token(LoginResponse::default()),
            Err(ClientError::Unauthorized("Login failed".to_string()))
        );
    }

    #[test]
    fn test_status_check() {
        let found = StatusResponse {
            success: true,
            status: Some(serde_json::json!("SUCCESS")),
        };
        let check = status_check("ORD-1", found).unwrap();
        assert_eq!(check.status, TransactionStatus::Success);
        assert_eq!(check.raw_status, "SUCCESS");

        let missing = StatusResponse {
            success: false,
            status: None,
        };
        assert!(matches!(status_check("ORD-1", missing), Err(ClientError::NotFound(_))));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  s1 ", "school id").unwrap(), "s1");
        assert!(matches!(non_empty("   ", "order id"), Err(ClientError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_blank_school_id_fails_before_request() {
        let client = client("http://127.0.0.1:9");
        let result = client.school_transactions("tok", " ").await;
        assert!(matches!(result, Err(ClientError::InvalidInput(_))));
    }
}
