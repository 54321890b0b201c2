//! CLI command handlers
//!
//! This module contains the command handlers for the CLI interface.
//! Each submodule handles a group of related commands; the clap
//! definitions live next to their handlers.

pub mod query;
pub mod transaction;

use std::io::Write;

use clap::ValueEnum;

use crate::config::Settings;
use crate::export::ExportFormat;

pub use query::{handle_query_command, QueryCommands};
pub use transaction::{handle_add_command, AddArgs};

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables and lines
    #[default]
    Table,
    Csv,
    Json,
    Yaml,
}

impl OutputFormat {
    /// The machine-readable format, or `None` for table output
    pub fn export_format(self) -> Option<ExportFormat> {
        match self {
            Self::Table => None,
            Self::Csv => Some(ExportFormat::Csv),
            Self::Json => Some(ExportFormat::Json),
            Self::Yaml => Some(ExportFormat::Yaml),
        }
    }
}

/// Everything a handler needs besides its own arguments
pub struct Output<'a, W: Write> {
    pub settings: &'a Settings,
    pub format: OutputFormat,
    pub writer: W,
}

impl<'a, W: Write> Output<'a, W> {
    pub fn new(settings: &'a Settings, format: OutputFormat, writer: W) -> Self {
        Self {
            settings,
            format,
            writer,
        }
    }
}
