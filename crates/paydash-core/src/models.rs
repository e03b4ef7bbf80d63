//! Core data models for the transaction table

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use super::time::{format_timestamp, parse_timestamp};
use super::types::TransactionStatus;

/// One row of the transaction table
///
/// Records are immutable once normalised from the upstream payload. Any
/// field that fails to parse is held as missing (`None`, or an empty string
/// for the identifier columns) instead of raising.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Upstream collect id (unique)
    pub collect_id: String,
    pub school_id: String,
    /// Payment gateway name
    pub gateway: String,
    pub order_amount: Option<Decimal>,
    pub transaction_amount: Option<Decimal>,
    pub status: TransactionStatus,
    pub custom_order_id: Option<String>,
    pub payment_time: Option<DateTime<Utc>>,
    /// Status and payment time exactly as the upstream sent them, searched
    /// alongside the normalised values
    #[serde(skip)]
    pub raw_status: Option<String>,
    #[serde(skip)]
    pub raw_payment_time: Option<String>,
}

impl TransactionRecord {
    /// Create a record with only an identifier set
    pub fn new(collect_id: impl Into<String>) -> Self {
        Self {
            collect_id: collect_id.into(),
            school_id: String::new(),
            gateway: String::new(),
            order_amount: None,
            transaction_amount: None,
            status: TransactionStatus::Unknown,
            custom_order_id: None,
            payment_time: None,
            raw_status: None,
            raw_payment_time: None,
        }
    }

    pub fn with_school(mut self, school_id: impl Into<String>) -> Self {
        self.school_id = school_id.into();
        self
    }

    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = gateway.into();
        self
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_amounts(mut self, order: Option<Decimal>, transaction: Option<Decimal>) -> Self {
        self.order_amount = order;
        self.transaction_amount = transaction;
        self
    }

    pub fn with_custom_order_id(mut self, id: impl Into<String>) -> Self {
        self.custom_order_id = Some(id.into());
        self
    }

    pub fn with_payment_time(mut self, ts: Option<DateTime<Utc>>) -> Self {
        self.payment_time = ts;
        self
    }

    /// String form of one searchable field, `None` when missing
    pub fn search_text(&self, field: SearchField) -> Option<String> {
        match field {
            SearchField::CollectId => non_empty(&self.collect_id),
            SearchField::SchoolId => non_empty(&self.school_id),
            SearchField::Gateway => non_empty(&self.gateway),
            SearchField::OrderAmount => self.order_amount.map(|a| a.to_string()),
            SearchField::TransactionAmount => self.transaction_amount.map(|a| a.to_string()),
            SearchField::Status => Some(self.status.as_str().to_string()),
            SearchField::CustomOrderId => self.custom_order_id.as_deref().and_then(non_empty),
            SearchField::PaymentTime => self.payment_time.as_ref().map(format_timestamp),
        }
    }

    /// True when `needle` (already lowercased) occurs in any searchable field
    pub fn matches_text(&self, needle: &str) -> bool {
        let contains = |text: &str| text.to_lowercase().contains(needle);
        SearchField::ALL
            .iter()
            .any(|field| self.search_text(*field).is_some_and(|text| contains(&text)))
            || self.raw_status.as_deref().is_some_and(contains)
            || self.raw_payment_time.as_deref().is_some_and(contains)
    }

    /// Whether `order_id` names this record by collect id or custom order id
    pub fn is_identified_by(&self, order_id: &str) -> bool {
        self.collect_id == order_id || self.custom_order_id.as_deref() == Some(order_id)
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Fields consulted by the free-text search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    CollectId,
    SchoolId,
    Gateway,
    OrderAmount,
    TransactionAmount,
    Status,
    CustomOrderId,
    PaymentTime,
}

impl SearchField {
    pub const ALL: [SearchField; 8] = [
        SearchField::CollectId,
        SearchField::SchoolId,
        SearchField::Gateway,
        SearchField::OrderAmount,
        SearchField::TransactionAmount,
        SearchField::Status,
        SearchField::CustomOrderId,
        SearchField::PaymentTime,
    ];
}

// ==================== Upstream Payload ====================

/// Transaction as delivered by the payments API
///
/// Every field is kept as an untyped JSON value so that a wrong type on
/// one field never rejects the whole row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub collect_id: Option<Value>,
    /// Document id, used when `collect_id` is absent
    #[serde(default, rename = "_id")]
    pub document_id: Option<Value>,
    #[serde(default)]
    pub school_id: Option<Value>,
    #[serde(default)]
    pub gateway: Option<Value>,
    #[serde(default)]
    pub gateway_name: Option<Value>,
    #[serde(default)]
    pub order_amount: Option<Value>,
    #[serde(default)]
    pub transaction_amount: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub custom_order_id: Option<Value>,
    #[serde(default)]
    pub payment_time: Option<Value>,
    /// Nested order document some endpoints embed
    #[serde(default)]
    pub order: Option<Value>,
}

/// Order fields nested under a transaction
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOrder {
    #[serde(default)]
    pub school_id: Option<Value>,
    #[serde(default)]
    pub gateway_name: Option<Value>,
    #[serde(default)]
    pub custom_order_id: Option<Value>,
}

impl RawTransaction {
    /// Decode one element of an upstream list; non-object rows yield `None`
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}

impl From<RawTransaction> for TransactionRecord {
    fn from(raw: RawTransaction) -> Self {
        let order: RawOrder = raw
            .order
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();

        let school_id = value_text(raw.school_id.as_ref())
            .or_else(|| value_text(order.school_id.as_ref()))
            .unwrap_or_default();
        let gateway = value_text(raw.gateway.as_ref())
            .or_else(|| value_text(raw.gateway_name.as_ref()))
            .or_else(|| value_text(order.gateway_name.as_ref()))
            .unwrap_or_default();
        let custom_order_id = value_text(raw.custom_order_id.as_ref())
            .or_else(|| value_text(order.custom_order_id.as_ref()));
        let raw_status = value_text(raw.status.as_ref());
        let raw_payment_time = value_text(raw.payment_time.as_ref());

        Self {
            collect_id: value_text(raw.collect_id.as_ref())
                .or_else(|| value_text(raw.document_id.as_ref()))
                .unwrap_or_default(),
            school_id,
            gateway,
            order_amount: value_decimal(raw.order_amount.as_ref()),
            transaction_amount: value_decimal(raw.transaction_amount.as_ref()),
            status: raw_status
                .as_deref()
                .map(TransactionStatus::parse_lenient)
                .unwrap_or_default(),
            custom_order_id,
            payment_time: raw_payment_time.as_deref().and_then(parse_timestamp),
            raw_status,
            raw_payment_time,
        }
    }
}

/// Normalise an upstream list, dropping rows that are not objects
pub fn records_from_values(values: Vec<Value>) -> Vec<TransactionRecord> {
    let total = values.len();
    let records: Vec<TransactionRecord> = values
        .into_iter()
        .filter_map(RawTransaction::from_value)
        .map(TransactionRecord::from)
        .collect();
    if records.len() != total {
        log::debug!("Dropped {} non-object transaction rows", total - records.len());
    }
    records
}

fn value_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_decimal(value: Option<&Value>) -> Option<Decimal> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_from_flat_payload() {
        let raw: RawTransaction = serde_json::from_value(json!({
            "collect_id": "c-1",
            "school_id": "s-9",
            "gateway": "PhonePe",
            "order_amount": 2000,
            "transaction_amount": "2200.50",
            "status": "SUCCESS",
            "custom_order_id": "ORD-1",
            "payment_time": "2024-04-01T10:00:00Z"
        }))
        .unwrap();
        let record = TransactionRecord::from(raw);

        assert_eq!(record.collect_id, "c-1");
        assert_eq!(record.school_id, "s-9");
        assert_eq!(record.gateway, "PhonePe");
        assert_eq!(record.order_amount, Some(dec("2000")));
        assert_eq!(record.transaction_amount, Some(dec("2200.50")));
        assert_eq!(record.status, TransactionStatus::Success);
        assert_eq!(record.custom_order_id.as_deref(), Some("ORD-1"));
        assert!(record.payment_time.is_some());
    }

    #[test]
    fn test_from_nested_order_payload() {
        let raw: RawTransaction = serde_json::from_value(json!({
            "_id": "c-2",
            "status": "pending",
            "order": {
                "school_id": "s-1",
                "gateway_name": "Razorpay",
                "custom_order_id": "ORD-2"
            }
        }))
        .unwrap();
        let record = TransactionRecord::from(raw);

        assert_eq!(record.collect_id, "c-2");
        assert_eq!(record.school_id, "s-1");
        assert_eq!(record.gateway, "Razorpay");
        assert_eq!(record.custom_order_id.as_deref(), Some("ORD-2"));
        assert_eq!(record.status, TransactionStatus::Pending);
    }

    #[test]
    fn test_malformed_fields_become_missing() {
        let raw: RawTransaction = serde_json::from_value(json!({
            "collect_id": "c-3",
            "order_amount": "abc",
            "transaction_amount": {"value": 1},
            "status": 42,
            "custom_order_id": "   ",
            "payment_time": "not a date"
        }))
        .unwrap();
        let record = TransactionRecord::from(raw);

        assert_eq!(record.order_amount, None);
        assert_eq!(record.transaction_amount, None);
        assert_eq!(record.status, TransactionStatus::Unknown);
        assert_eq!(record.custom_order_id, None);
        assert_eq!(record.payment_time, None);
    }

    #[test]
    fn test_records_from_values_skips_non_objects() {
        let records = records_from_values(vec![
            json!({"collect_id": "a"}),
            json!("garbage"),
            json!(null),
            json!({"collect_id": "b"}),
        ]);
        let ids: Vec<&str> = records.iter().map(|r| r.collect_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_matches_text_covers_enumerated_fields() {
        let record = TransactionRecord::new("COL-77")
            .with_school("school-north")
            .with_gateway("PayU")
            .with_amounts(Some(dec("1500.25")), None)
            .with_status(TransactionStatus::Failed)
            .with_custom_order_id("INV-900")
            .with_payment_time(parse_timestamp("2024-05-06T07:08:09Z"));

        assert!(record.matches_text("col-77"));
        assert!(record.matches_text("north"));
        assert!(record.matches_text("payu"));
        assert!(record.matches_text("1500.2"));
        assert!(record.matches_text("fail"));
        assert!(record.matches_text("inv-9"));
        assert!(record.matches_text("2024-05-06"));
        assert!(!record.matches_text("razorpay"));
    }

    #[test]
    fn test_search_matches_upstream_text() {
        let raw: RawTransaction = serde_json::from_value(json!({
            "collect_id": "c-4",
            "status": "REFUNDED",
            "payment_time": "2024-01-01 10:00"
        }))
        .unwrap();
        let record = TransactionRecord::from(raw);

        assert_eq!(record.status, TransactionStatus::Unknown);
        assert!(record.matches_text("refunded"));
        assert!(record.matches_text("unknown"));
        assert!(record.matches_text("2024-01-01 10:00"));
        assert!(!serde_json::to_value(&record).unwrap().as_object().unwrap().contains_key("raw_status"));
    }

    #[test]
    fn test_is_identified_by() {
        let record = TransactionRecord::new("c-1").with_custom_order_id("ORD-1");
        assert!(record.is_identified_by("c-1"));
        assert!(record.is_identified_by("ORD-1"));
        assert!(!record.is_identified_by("ORD-2"));
    }
}
