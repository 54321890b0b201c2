//! Configuration module for txn-analyzer
//!
//! This module provides configuration management including:
//! - Platform-aware path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::AnalyzerPaths;
pub use settings::Settings;
