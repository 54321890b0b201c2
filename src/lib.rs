//! txn-analyzer - query and aggregate financial transactions
//!
//! This library holds an ordered collection of transaction records in
//! memory and answers questions about it: totals, averages, filters by
//! type, merchant, date or amount, month-of-year frequency, and lookups
//! by ID. Records are loaded from JSON or CSV files and results can be
//! printed as tables or exported as CSV, JSON or YAML.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `models`: Core data models (transactions, money, identifiers)
//! - `analyzer`: The transaction collection and its queries
//! - `storage`: Loading and saving transaction files
//! - `export`: CSV, JSON and YAML output
//! - `display`: Terminal formatting
//! - `config`: Configuration and path management
//! - `cli`: Command handlers for the `txn-analyzer` binary
//! - `error`: Custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use txn_analyzer::storage::TransactionFile;
//!
//! let analyzer = TransactionFile::new("transactions.json")?.load_analyzer()?;
//! println!("total: {}", analyzer.total_amount()?);
//! println!("busiest month: {:?}", analyzer.most_transactions_month());
//! ```

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod storage;

pub use analyzer::{AnalysisSummary, TransactionAnalyzer};
pub use error::{AnalyzerError, AnalyzerResult};
pub use models::{Money, Transaction, TransactionId, TransactionType};
