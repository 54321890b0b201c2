//! Path management for txn-analyzer
//!
//! ## Path Resolution Order
//!
//! 1. `TXN_ANALYZER_DATA_DIR` environment variable (if set)
//! 2. The platform config directory joined with `txn-analyzer`
//!    (`$XDG_CONFIG_HOME` or `~/.config` on Linux, `~/Library/Application Support`
//!    on macOS, `%APPDATA%` on Windows)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::AnalyzerError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "TXN_ANALYZER_DATA_DIR";

const APP_DIR_NAME: &str = "txn-analyzer";

/// Manages all paths used by txn-analyzer
#[derive(Debug, Clone)]
pub struct AnalyzerPaths {
    base_dir: PathBuf,
}

impl AnalyzerPaths {
    /// Resolve the base directory from the environment or platform defaults
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, AnalyzerError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create AnalyzerPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the default transaction file (<base>/data/transactions.json)
    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), AnalyzerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| AnalyzerError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| AnalyzerError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, AnalyzerError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| AnalyzerError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join(APP_DIR_NAME))
}
