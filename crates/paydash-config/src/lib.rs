//! Configuration management for paydash
//!
//! This module handles loading, validation, and management of
//! paydash configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Upstream payments API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the payments API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Records per page for transaction tables
    #[serde(default = "default_records_per_page")]
    pub records_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            records_per_page: default_records_per_page(),
        }
    }
}

fn default_records_per_page() -> usize {
    10
}

/// Session lifecycle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle lifetime of a login session in minutes (0 disables expiry)
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl_minutes(),
        }
    }
}

fn default_ttl_minutes() -> u64 {
    480
}

/// Default table presentation for new sessions
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Start new sessions in dark mode
    #[serde(default)]
    pub dark_mode: bool,
    /// Initial sort column
    #[serde(default)]
    pub default_sort_field: SortField,
    /// Initial sort direction
    #[serde(default)]
    pub default_sort_direction: SortDirection,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Upstream collect id (transaction identifier)
    CollectId,
    SchoolId,
    Gateway,
    OrderAmount,
    TransactionAmount,
    Status,
    CustomOrderId,
    PaymentTime,
}

impl SortField {
    /// Every sortable column, in table order
    pub const ALL: [SortField; 8] = [
        SortField::CollectId,
        SortField::SchoolId,
        SortField::Gateway,
        SortField::OrderAmount,
        SortField::TransactionAmount,
        SortField::Status,
        SortField::CustomOrderId,
        SortField::PaymentTime,
    ];

    /// Wire name of the column
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CollectId => "collect_id",
            SortField::SchoolId => "school_id",
            SortField::Gateway => "gateway",
            SortField::OrderAmount => "order_amount",
            SortField::TransactionAmount => "transaction_amount",
            SortField::Status => "status",
            SortField::CustomOrderId => "custom_order_id",
            SortField::PaymentTime => "payment_time",
        }
    }
}

impl Default for SortField {
    fn default() -> Self {
        SortField::PaymentTime
    }
}

impl std::str::FromStr for SortField {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        SortField::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == needle)
            .ok_or_else(|| format!("Invalid sort field: {}", s))
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort direction enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Desc
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream payments API
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Session settings
    #[serde(default)]
    pub session: SessionConfig,
    /// Table defaults
    #[serde(default)]
    pub ui: UiConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string_lossy().into_owned(),
            },
            _ => ConfigError::IoError,
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        let base_url = self.upstream.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "upstream.base_url".to_string(),
            });
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "upstream.base_url".to_string(),
                reason: "Base URL must start with http:// or https://".to_string(),
            });
        }

        if self.pagination.records_per_page == 0 || self.pagination.records_per_page > 500 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.records_per_page".to_string(),
                reason: "Records per page must be between 1 and 500".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.pagination.records_per_page, 10);
        assert_eq!(config.ui.default_sort_field, SortField::PaymentTime);
        assert_eq!(config.ui.default_sort_direction, SortDirection::Desc);
        assert!(!config.ui.dark_mode);
    }

    #[test]
    fn test_default_template_is_valid() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.upstream.base_url, "http://localhost:3000");
        assert_eq!(config.bind_address(), "0.0.0.0:8081");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let yaml = "pagination:\n  records_per_page: 25\nui:\n  default_sort_field: order_amount\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.pagination.records_per_page, 25);
        assert_eq!(config.ui.default_sort_field, SortField::OrderAmount);
        assert_eq!(config.ui.default_sort_direction, SortDirection::Desc);
        assert_eq!(config.session.ttl_minutes, 480);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("server:\n  port: [\n").unwrap_err();
        match err {
            ConfigError::InvalidYaml { ref message } => assert!(message.contains("line")),
            ref other => panic!("expected InvalidYaml, got {:?}", other),
        }
        assert!(err.to_string().starts_with("Invalid YAML format: "));
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.pagination.records_per_page = 0;
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, "pagination.records_per_page")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.upstream.base_url = "localhost:3000".to_string();
        assert!(config.validate().is_err());

        config.upstream.base_url = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::MissingField { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(PathBuf::from("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_sort_field_from_str() {
        assert_eq!("payment_time".parse::<SortField>().unwrap(), SortField::PaymentTime);
        assert_eq!("Order_Amount".parse::<SortField>().unwrap(), SortField::OrderAmount);
        assert!("payee".parse::<SortField>().is_err());
        for field in SortField::ALL {
            assert_eq!(field.to_string().parse::<SortField>().unwrap(), field);
        }
    }

    #[test]
    fn test_sort_direction() {
        assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!(SortDirection::Asc.flipped(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.flipped().flipped(), SortDirection::Desc);
    }
}
