//! JSON Export functionality
//!
//! Wraps exported transactions in a versioned document. The document has a
//! `transactions` array, so an export can be loaded again as a data file.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::Transaction;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Exported transactions with provenance metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub transaction_count: usize,

    pub transactions: Vec<Transaction>,
}

impl TransactionExport {
    /// Build an export of the given transactions
    pub fn new(transactions: &[&Transaction]) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            transaction_count: transactions.len(),
            transactions: transactions.iter().map(|t| (*t).clone()).collect(),
        }
    }

}

/// Export transactions as pretty-printed JSON
pub fn export_transactions_json<W: Write>(
    transactions: &[&Transaction],
    writer: &mut W,
) -> AnalyzerResult<()> {
    let export = TransactionExport::new(transactions);

    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| AnalyzerError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| AnalyzerError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::storage::load_transactions;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample() -> Vec<Transaction> {
        let date = NaiveDate::from_ymd_opt(2024, 7, 4)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        vec![
            Transaction::with_details("a", date, Money::from_cents(500), "credit", "Gift", "Aunt"),
            Transaction::with_details("b", date, Money::from_cents(-250), "debit", "Ice cream", "Kiosk"),
        ]
    }

    #[test]
    fn test_json_export() {
        let transactions = sample();
        let refs: Vec<_> = transactions.iter().collect();

        let mut out = Vec::new();
        export_transactions_json(&refs, &mut out).unwrap();

        let export: TransactionExport = serde_json::from_slice(&out).unwrap();
        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.transaction_count, 2);
        assert_eq!(export.transactions, transactions);
    }

    #[test]
    fn test_export_can_be_reloaded() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("export.json");
        let transactions = sample();
        let refs: Vec<_> = transactions.iter().collect();

        let mut file = std::fs::File::create(&path).unwrap();
        export_transactions_json(&refs, &mut file).unwrap();

        assert_eq!(load_transactions(&path).unwrap(), transactions);
    }
}
