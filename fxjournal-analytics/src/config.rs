//! Journal configuration, loaded from TOML.
//!
//! Every section is optional; a missing file means all defaults.
//!
//! ```toml
//! [store]
//! trades_path = "journal/trades.csv"
//!
//! [catalog]
//! path = "journal/strategies.json"
//!
//! [analysis]
//! reference_utc_offset_hours = 9
//! period = "monthly"
//! min_reported_streak = 3
//! top_losses = 5
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```

use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use fxjournal_core::domain::{offset_from_hours, DEFAULT_REFERENCE_OFFSET_HOURS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::Period;
use crate::streaks::DEFAULT_MIN_REPORTED_STREAK;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    pub store: StoreConfig,
    pub catalog: CatalogConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub trades_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            trades_path: PathBuf::from("trades.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("strategies.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Hours east of UTC for naive timestamps and hour/weekday grouping.
    pub reference_utc_offset_hours: i32,
    pub period: Period,
    pub min_reported_streak: usize,
    pub top_losses: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            reference_utc_offset_hours: DEFAULT_REFERENCE_OFFSET_HOURS,
            period: Period::default(),
            min_reported_streak: DEFAULT_MIN_REPORTED_STREAK,
            top_losses: 5,
        }
    }
}

impl AnalysisConfig {
    pub fn reference_offset(&self) -> FixedOffset {
        offset_from_hours(self.reference_utc_offset_hours)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` overrides it.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl JournalConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: JournalConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// `from_file` when the file exists, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) if p.exists() => Self::from_file(p),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let hours = self.analysis.reference_utc_offset_hours;
        if !(-23..=23).contains(&hours) {
            return Err(ConfigError::Invalid(format!(
                "reference_utc_offset_hours must be within ±23, got {hours}"
            )));
        }
        if self.analysis.min_reported_streak == 0 {
            return Err(ConfigError::Invalid(
                "min_reported_streak must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_all_defaults() {
        let config = JournalConfig::from_toml("").unwrap();
        assert_eq!(config, JournalConfig::default());
        assert_eq!(config.analysis.reference_offset().local_minus_utc(), 9 * 3600);
        assert_eq!(config.analysis.period, Period::Monthly);
        assert_eq!(config.analysis.min_reported_streak, 3);
        assert_eq!(config.analysis.top_losses, 5);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = JournalConfig::from_toml(
            r#"
            [analysis]
            period = "weekly"
            reference_utc_offset_hours = 0

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.analysis.period, Period::Weekly);
        assert_eq!(config.analysis.reference_offset().local_minus_utc(), 0);
        assert_eq!(config.analysis.top_losses, 5);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.store.trades_path, PathBuf::from("trades.csv"));
    }

    #[test]
    fn rejects_out_of_range_offset() {
        let err = JournalConfig::from_toml("[analysis]\nreference_utc_offset_hours = 30").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_period() {
        let err = JournalConfig::from_toml("[analysis]\nperiod = \"hourly\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert_eq!(
            JournalConfig::load_or_default(Some(&missing)).unwrap(),
            JournalConfig::default()
        );
        assert_eq!(JournalConfig::load_or_default(None).unwrap(), JournalConfig::default());
    }

    #[test]
    fn from_file_reads_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.toml");
        std::fs::write(&path, "[store]\ntrades_path = \"data/t.csv\"\n").unwrap();
        let config = JournalConfig::from_file(&path).unwrap();
        assert_eq!(config.store.trades_path, PathBuf::from("data/t.csv"));
    }
}
