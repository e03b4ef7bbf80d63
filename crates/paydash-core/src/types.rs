//! Basic types for the transaction table

use serde::{Deserialize, Deserializer, Serialize};

pub use paydash_config::{SortDirection, SortField};

/// Transaction status enumeration
///
/// Serialized lowercase; deserialized case-insensitively like [`str::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Payment captured
    Success,
    /// Awaiting confirmation from the gateway
    Pending,
    /// Payment rejected or errored
    Failed,
    /// Payment started but not yet submitted
    Initiated,
    /// Anything the upstream reported that we do not recognise
    Unknown,
}

impl TransactionStatus {
    /// Lenient parse: unrecognised or empty input maps to `Unknown`
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(TransactionStatus::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Success => "success",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Initiated => "initiated",
            TransactionStatus::Unknown => "unknown",
        }
    }

    /// Display tone used by front ends to colour status badges
    pub fn tone(&self) -> StatusTone {
        match self {
            TransactionStatus::Success => StatusTone::Positive,
            TransactionStatus::Pending | TransactionStatus::Initiated => StatusTone::Warning,
            TransactionStatus::Failed => StatusTone::Danger,
            TransactionStatus::Unknown => StatusTone::Neutral,
        }
    }
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::Unknown
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "success" => Ok(TransactionStatus::Success),
            "pending" => Ok(TransactionStatus::Pending),
            "failed" => Ok(TransactionStatus::Failed),
            "initiated" => Ok(TransactionStatus::Initiated),
            "unknown" => Ok(TransactionStatus::Unknown),
            _ => Err(format!("Invalid transaction status: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for TransactionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse status classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Positive,
    Warning,
    Danger,
    Neutral,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_str_is_case_insensitive() {
        assert_eq!("SUCCESS".parse::<TransactionStatus>().unwrap(), TransactionStatus::Success);
        assert_eq!(" Pending ".parse::<TransactionStatus>().unwrap(), TransactionStatus::Pending);
        assert!("refunded".parse::<TransactionStatus>().is_err());
    }

    #[test]
    fn test_status_deserializes_case_insensitively() {
        let statuses: Vec<TransactionStatus> = serde_json::from_str(r#"["SUCCESS", "failed", "Pending"]"#).unwrap();
        assert_eq!(
            statuses,
            vec![TransactionStatus::Success, TransactionStatus::Failed, TransactionStatus::Pending]
        );
        assert!(serde_json::from_str::<TransactionStatus>(r#""refunded""#).is_err());
        assert_eq!(serde_json::to_string(&TransactionStatus::Success).unwrap(), r#""success""#);
    }

    #[test]
    fn test_status_parse_lenient() {
        assert_eq!(TransactionStatus::parse_lenient("Failed"), TransactionStatus::Failed);
        assert_eq!(TransactionStatus::parse_lenient("refunded"), TransactionStatus::Unknown);
        assert_eq!(TransactionStatus::parse_lenient(""), TransactionStatus::Unknown);
    }

    #[test]
    fn test_status_tone() {
        assert_eq!(TransactionStatus::Success.tone(), StatusTone::Positive);
        assert_eq!(TransactionStatus::Initiated.tone(), StatusTone::Warning);
        assert_eq!(TransactionStatus::Pending.tone(), StatusTone::Warning);
        assert_eq!(TransactionStatus::Failed.tone(), StatusTone::Danger);
        assert_eq!(TransactionStatus::Unknown.tone(), StatusTone::Neutral);
    }
}
