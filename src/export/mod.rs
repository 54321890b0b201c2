//! Export module for txn-analyzer
//!
//! Writes query results in machine-readable formats:
//! - CSV: transaction rows with the same header the loader reads
//! - JSON: a versioned document around the transactions
//! - YAML: the same document, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::analyzer::AnalysisSummary;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::Transaction;

pub use self::csv::{export_transactions_csv, export_values_csv};
pub use self::json::{export_transactions_json, TransactionExport, EXPORT_SCHEMA_VERSION};
pub use self::yaml::export_transactions_yaml;

/// Machine-readable output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Yaml,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Write a list of transactions in the given format
pub fn write_transactions<W: Write>(
    format: ExportFormat,
    transactions: &[&Transaction],
    writer: &mut W,
) -> AnalyzerResult<()> {
    match format {
        ExportFormat::Csv => export_transactions_csv(transactions, writer),
        ExportFormat::Json => export_transactions_json(transactions, writer),
        ExportFormat::Yaml => export_transactions_yaml(transactions, writer),
    }
}

/// Write a summary; CSV has no layout for it
pub fn write_summary<W: Write>(
    format: ExportFormat,
    summary: &AnalysisSummary,
    writer: &mut W,
) -> AnalyzerResult<()> {
    match format {
        ExportFormat::Csv => Err(AnalyzerError::Validation(
            "Summaries can only be exported as JSON or YAML".into(),
        )),
        _ => write_value(format, summary, writer),
    }
}

/// Write any serializable result (a total, a list of types...) as JSON or YAML
///
/// CSV output of arbitrary values is rejected; use [`export_values_csv`]
/// for single-column lists.
pub fn write_value<T, W>(format: ExportFormat, value: &T, writer: &mut W) -> AnalyzerResult<()>
where
    T: Serialize + ?Sized,
    W: Write,
{
    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, value)
                .map_err(|e| AnalyzerError::Export(e.to_string()))?;
            writeln!(writer).map_err(|e| AnalyzerError::Export(e.to_string()))
        }
        ExportFormat::Yaml => {
            serde_yaml::to_writer(writer, value).map_err(|e| AnalyzerError::Export(e.to_string()))
        }
        ExportFormat::Csv => Err(AnalyzerError::Validation(
            "This result cannot be exported as CSV".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::TransactionAnalyzer;
    use crate::models::Money;
    use chrono::NaiveDate;

    fn analyzer() -> TransactionAnalyzer {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        TransactionAnalyzer::new(vec![
            Transaction::with_details("1", date, Money::from_cents(10000), "credit", "Pay", "A"),
            Transaction::with_details("2", date, Money::from_cents(-3000), "debit", "Food", "B"),
        ])
    }

    #[test]
    fn test_write_summary_formats() {
        let summary = analyzer().summary(5).unwrap();

        let mut json = Vec::new();
        write_summary(ExportFormat::Json, &summary, &mut json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["total_amount"], 70.0);

        let mut yaml = Vec::new();
        write_summary(ExportFormat::Yaml, &summary, &mut yaml).unwrap();
        assert!(String::from_utf8(yaml).unwrap().contains("transaction_count: 2"));

        let mut csv = Vec::new();
        let err = write_summary(ExportFormat::Csv, &summary, &mut csv).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_write_value() {
        let types = analyzer().unique_types();

        let mut json = Vec::new();
        write_value(ExportFormat::Json, &types, &mut json).unwrap();
        let parsed: Vec<String> = serde_json::from_slice(&json).unwrap();
        assert_eq!(parsed, vec!["credit", "debit"]);

        let mut csv = Vec::new();
        assert!(write_value(ExportFormat::Csv, &types, &mut csv).is_err());
    }

    #[test]
    fn test_write_transactions_dispatch() {
        let analyzer = analyzer();
        let debits = analyzer.transactions_by_type("debit");

        for format in [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Yaml] {
            let mut out = Vec::new();
            write_transactions(format, &debits, &mut out).unwrap();
            let text = String::from_utf8(out).unwrap();
            assert!(text.contains("Food"), "{} output: {}", format, text);
            assert!(!text.contains("Pay"), "{} output: {}", format, text);
        }
    }
}
