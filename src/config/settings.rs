//! User settings for txn-analyzer
//!
//! Display preferences, the default transaction file and the log level.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::AnalyzerPaths;
use crate::error::AnalyzerError;
use crate::storage::{read_json, write_json_atomic};

/// User settings for txn-analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Transaction file used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_data_file: Option<PathBuf>,

    /// Log filter directive, e.g. "warn" or "txn_analyzer=debug"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Number of merchants listed in summaries
    #[serde(default = "default_top_merchants")]
    pub top_merchants: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_top_merchants() -> usize {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            default_data_file: None,
            log_level: default_log_level(),
            top_merchants: default_top_merchants(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use the defaults if the file doesn't exist
    ///
    /// Nothing is written; the caller decides when to persist.
    pub fn load_or_create(paths: &AnalyzerPaths) -> Result<Self, AnalyzerError> {
        let settings: Settings = read_json(paths.settings_file()).map_err(|e| match e {
            AnalyzerError::Json(msg) => {
                AnalyzerError::Config(format!("Failed to parse settings file: {}", msg))
            }
            other => other,
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(AnalyzerError::Config(format!(
                "Invalid date format in settings: {}",
                self.date_format
            )));
        }

        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AnalyzerPaths) -> Result<(), AnalyzerError> {
        self.validate()?;
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// The transaction file to use when none is given explicitly
    ///
    /// Relative paths in the settings are resolved against the base directory.
    pub fn data_file(&self, paths: &AnalyzerPaths) -> PathBuf {
        match &self.default_data_file {
            Some(file) if file.is_relative() => paths.base_dir().join(file),
            Some(file) => file.clone(),
            None => paths.transactions_file(),
        }
    }
}
