//! Wire types for the upstream payments API

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `POST /auth/login` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/login` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Transaction list responses: `{ "data": [...] }`
///
/// Rows stay untyped here; normalisation happens in paydash-core.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub data: Option<Vec<Value>>,
}

/// `GET /transaction-status/{order_id}` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_tolerates_missing_data() {
        let list: ListResponse = serde_json::from_str("{}").unwrap();
        assert!(list.data.is_none());
        let list: ListResponse = serde_json::from_str(r#"{"data": [{"collect_id": "a"}, 3]}"#).unwrap();
        assert_eq!(list.data.unwrap().len(), 2);
    }

    #[test]
    fn test_login_response_failure_shape() {
        let res: LoginResponse = serde_json::from_str(r#"{"success": false, "message": "bad password"}"#).unwrap();
        assert!(!res.success);
        assert!(res.access_token.is_none());
        assert_eq!(res.message.as_deref(), Some("bad password"));
    }
}
