//! Configuration loading, validation, and management for OrderDesk.
//!
//! Loads configuration from `~/.orderdesk/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use orderdesk_core::MetricSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.orderdesk/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Header names of the required columns
    #[serde(default)]
    pub columns: ColumnConfig,

    /// Status labels that drive aggregation
    #[serde(default)]
    pub statuses: StatusConfig,

    /// Report rendering settings
    #[serde(default)]
    pub report: ReportConfig,
}

fn default_log_level() -> String {
    "info".into()
}

/// Header names for each logical column, matched after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    #[serde(default = "default_customer_id_column")]
    pub customer_id: String,

    #[serde(default = "default_city_column")]
    pub city: String,

    #[serde(default = "default_order_type_column")]
    pub order_type: String,

    #[serde(default = "default_incoterm_column")]
    pub incoterm: String,

    #[serde(default = "default_status_column")]
    pub status_summary: String,

    #[serde(default = "default_quantity_column")]
    pub ordered_quantity: String,
}

fn default_customer_id_column() -> String {
    "SOLDTO".into()
}
fn default_city_column() -> String {
    "City".into()
}
fn default_order_type_column() -> String {
    "Type".into()
}
fn default_incoterm_column() -> String {
    "Incoterm".into()
}
fn default_status_column() -> String {
    "Status Summary".into()
}
fn default_quantity_column() -> String {
    "ORDERED_QUANTITY".into()
}

impl ColumnConfig {
    /// Header names in required-column order.
    pub fn required(&self) -> [&str; 6] {
        [
            self.customer_id.as_str(),
            self.order_type.as_str(),
            self.incoterm.as_str(),
            self.status_summary.as_str(),
            self.ordered_quantity.as_str(),
            self.city.as_str(),
        ]
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            customer_id: default_customer_id_column(),
            city: default_city_column(),
            order_type: default_order_type_column(),
            incoterm: default_incoterm_column(),
            status_summary: default_status_column(),
            ordered_quantity: default_quantity_column(),
        }
    }
}

/// Status values compared after trim + lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusConfig {
    #[serde(default = "default_backlog_status")]
    pub backlog: String,

    #[serde(default = "default_dispatched_status")]
    pub dispatched: String,
}

fn default_backlog_status() -> String {
    "backlog".into()
}
fn default_dispatched_status() -> String {
    "dispatched".into()
}

impl StatusConfig {
    /// Normalized backlog label.
    pub fn backlog_label(&self) -> String {
        self.backlog.trim().to_lowercase()
    }

    /// Normalized dispatched label.
    pub fn dispatched_label(&self) -> String {
        self.dispatched.trim().to_lowercase()
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            backlog: default_backlog_status(),
            dispatched: default_dispatched_status(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Metric used when a question doesn't name one
    #[serde(default)]
    pub default_metric: MetricSet,
}

impl AppConfig {
    /// Load configuration from the default path (~/.orderdesk/config.toml).
    ///
    /// Environment overrides:
    /// - `ORDERDESK_LOG_LEVEL`
    /// - `ORDERDESK_DEFAULT_METRIC`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(level) = std::env::var("ORDERDESK_LOG_LEVEL") {
            config.log_level = level;
        }

        if let Ok(metric) = std::env::var("ORDERDESK_DEFAULT_METRIC") {
            config.report.default_metric = metric.parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "ORDERDESK_DEFAULT_METRIC has unknown metric '{metric}'"
                ))
            })?;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".orderdesk")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        let required = self.columns.required();

        if required.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "column names must not be empty".into(),
            ));
        }

        let distinct: HashSet<String> = required.iter().map(|name| name.trim().to_lowercase()).collect();
        if distinct.len() != required.len() {
            return Err(ConfigError::ValidationError(
                "column names must be distinct".into(),
            ));
        }

        if self.statuses.backlog_label().is_empty() || self.statuses.dispatched_label().is_empty() {
            return Err(ConfigError::ValidationError(
                "status labels must not be empty".into(),
            ));
        }

        if self.statuses.backlog_label() == self.statuses.dispatched_label() {
            return Err(ConfigError::ValidationError(
                "backlog and dispatched statuses must differ".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            columns: ColumnConfig::default(),
            statuses: StatusConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for orderdesk_core::Error {
    fn from(err: ConfigError) -> Self {
        orderdesk_core::Error::Config {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.columns.customer_id, "SOLDTO");
        assert_eq!(config.columns.ordered_quantity, "ORDERED_QUANTITY");
        assert_eq!(config.report.default_metric, MetricSet::BacklogAndMtd);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn required_columns_in_order() {
        let columns = ColumnConfig::default();
        assert_eq!(
            columns.required(),
            ["SOLDTO", "Type", "Incoterm", "Status Summary", "ORDERED_QUANTITY", "City"]
        );
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.columns, config.columns);
        assert_eq!(parsed.statuses, config.statuses);
    }

    #[test]
    fn duplicate_columns_rejected() {
        let config = AppConfig {
            columns: ColumnConfig {
                city: "SOLDTO".into(),
                ..ColumnConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn columns_differing_only_in_case_rejected() {
        let config = AppConfig {
            columns: ColumnConfig {
                city: "soldto".into(),
                ..ColumnConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_error_maps_into_domain_error() {
        let err: orderdesk_core::Error = ConfigError::ValidationError("bad".into()).into();
        assert!(matches!(err, orderdesk_core::Error::Config { ref message } if message.contains("bad")));
    }

    #[test]
    fn identical_statuses_rejected() {
        let config = AppConfig {
            statuses: StatusConfig {
                backlog: "Open".into(),
                dispatched: " open ".into(),
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().log_level, "info");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
log_level = "debug"

[columns]
customer_id = "Customer"

[report]
default_metric = "MTD"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.columns.customer_id, "Customer");
        assert_eq!(config.columns.city, "City");
        assert_eq!(config.report.default_metric, MetricSet::Mtd);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_level = [").unwrap();

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("SOLDTO"));
        assert!(toml_str.contains("Backlog & MTD"));
    }
}
