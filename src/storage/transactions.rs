//! Transaction files
//!
//! Loads the records an analyzer is built from, and writes them back.
//! JSON files hold either a bare array of records or an object with a
//! `transactions` array. CSV files have the header
//! `id,date,amount,type,description,merchant`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyzer::TransactionAnalyzer;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::Transaction;

use super::file_io::{write_atomic, write_json_atomic};

/// On-disk encoding of a transaction file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Csv,
}

impl SourceFormat {
    /// Pick the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> AnalyzerResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(AnalyzerError::Validation(format!(
                "Unsupported transaction file {}: expected a .json or .csv extension",
                path.display()
            ))),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Csv => write!(f, "CSV"),
        }
    }
}

/// JSON object layout: `{"transactions": [...]}`
#[derive(Debug, Deserialize)]
struct WrappedTransactions {
    transactions: Vec<Transaction>,
}

/// A transaction file on disk
#[derive(Debug, Clone)]
pub struct TransactionFile {
    path: PathBuf,
    format: SourceFormat,
}

impl TransactionFile {
    /// Refer to a transaction file, inferring its format from the extension
    pub fn new(path: impl Into<PathBuf>) -> AnalyzerResult<Self> {
        let path = path.into();
        let format = SourceFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every record, in file order
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or any record is malformed.
    pub fn load(&self) -> AnalyzerResult<Vec<Transaction>> {
        let transactions = match self.format {
            SourceFormat::Json => self.load_json()?,
            SourceFormat::Csv => self.load_csv()?,
        };

        debug!(
            path = %self.path.display(),
            format = %self.format,
            count = transactions.len(),
            "loaded transactions"
        );

        Ok(transactions)
    }

    /// Read every record and hand them to a new analyzer
    pub fn load_analyzer(&self) -> AnalyzerResult<TransactionAnalyzer> {
        self.load().map(TransactionAnalyzer::new)
    }

    /// Replace the file contents with `transactions`, atomically
    pub fn save(&self, transactions: &[Transaction]) -> AnalyzerResult<()> {
        match self.format {
            SourceFormat::Json => write_json_atomic(&self.path, &transactions)?,
            SourceFormat::Csv => write_atomic(&self.path, |writer| {
                let mut csv_writer = csv::Writer::from_writer(writer);
                for txn in transactions {
                    csv_writer.serialize(CsvRecord::from(txn))?;
                }
                csv_writer.flush()?;
                Ok(())
            })?,
        }

        debug!(
            path = %self.path.display(),
            count = transactions.len(),
            "saved transactions"
        );

        Ok(())
    }

    fn load_json(&self) -> AnalyzerResult<Vec<Transaction>> {
        self.ensure_exists()?;

        let text = fs::read_to_string(&self.path).map_err(|e| {
            AnalyzerError::Storage(format!("Failed to open {}: {}", self.path.display(), e))
        })?;

        // The layout is picked up front so record errors keep their detail
        let parsed = if text.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<Transaction>>(&text)
        } else {
            serde_json::from_str::<WrappedTransactions>(&text).map(|w| w.transactions)
        };

        parsed.map_err(|e| {
            AnalyzerError::Json(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn load_csv(&self) -> AnalyzerResult<Vec<Transaction>> {
        self.ensure_exists()?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| {
                AnalyzerError::Storage(format!("Failed to open {}: {}", self.path.display(), e))
            })?;

        reader
            .deserialize::<Transaction>()
            .enumerate()
            .map(|(row, record)| {
                record.map_err(|e| {
                    AnalyzerError::Csv(format!(
                        "Failed to parse {} at record {}: {}",
                        self.path.display(),
                        row + 1,
                        e
                    ))
                })
            })
            .collect()
    }

    fn ensure_exists(&self) -> AnalyzerResult<()> {
        if self.path.exists() {
            Ok(())
        } else {
            Err(AnalyzerError::Storage(format!(
                "File not found: {}",
                self.path.display()
            )))
        }
    }
}

/// Flat row layout used when writing CSV
#[derive(Serialize)]
pub(crate) struct CsvRecord<'a> {
    id: &'a str,
    date: String,
    amount: String,
    #[serde(rename = "type")]
    kind: &'a str,
    description: &'a str,
    merchant: &'a str,
}

impl<'a> From<&'a Transaction> for CsvRecord<'a> {
    fn from(txn: &'a Transaction) -> Self {
        Self {
            id: txn.id.as_str(),
            date: txn
                .date
                .format(crate::models::transaction::timestamp::FORMAT)
                .to_string(),
            amount: txn.amount.to_string(),
            kind: txn.kind.as_str(),
            description: &txn.description,
            merchant: &txn.merchant,
        }
    }
}

/// Load transactions from `path`, inferring the format from its extension
pub fn load_transactions(path: impl AsRef<Path>) -> AnalyzerResult<Vec<Transaction>> {
    TransactionFile::new(path.as_ref())?.load()
}

/// Write transactions to `path`, inferring the format from its extension
pub fn save_transactions(path: impl AsRef<Path>, transactions: &[Transaction]) -> AnalyzerResult<()> {
    TransactionFile::new(path.as_ref())?.save(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    const JSON_RECORDS: &str = r#"[
        {"id": "1", "date": "2024-01-05", "amount": 100, "type": "credit",
         "description": "Salary", "merchant": "A"},
        {"id": "2", "date": "2024-01-05T18:30:00", "amount": -30.25, "type": "debit",
         "description": "Lunch", "merchant": "B"},
        {"id": "3", "date": "2024-01-06", "amount": -7.125, "type": "debit",
         "description": "Snack", "merchant": "C"},
        {"id": "4", "date": "2024-01-07", "amount": "3.336", "type": "refund",
         "description": "Return", "merchant": "C"}
    ]"#;

    const CSV_RECORDS: &str = "id,date,amount,type,description,merchant\n\
        1,2024-01-05,100,credit,Salary,A\n\
        2,2024-01-05T18:30:00,-30.25,debit,Lunch,B\n\
        3,2024-01-06,-7.125,debit,Snack,C\n\
        4,2024-01-07,3.336,refund,Return,C\n";

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            SourceFormat::from_path(Path::new("a/b.JSON")).unwrap(),
            SourceFormat::Json
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("data.csv")).unwrap(),
            SourceFormat::Csv
        );
        assert!(SourceFormat::from_path(Path::new("data.txt"))
            .unwrap_err()
            .is_validation());
        assert!(SourceFormat::from_path(Path::new("data")).is_err());
    }

    #[test]
    fn test_load_json_array() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "t.json", JSON_RECORDS);

        let transactions = load_transactions(&path).unwrap();
        assert_eq!(transactions.len(), 4);
        assert_eq!(transactions[0].amount, Money::from_cents(10000));
        assert_eq!(transactions[1].amount, Money::from_cents(-3025));
        assert_eq!(
            transactions[1].day(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
    }

    #[test]
    fn test_load_wrapped_json() {
        let temp_dir = TempDir::new().unwrap();
        let wrapped = format!("{{\"transactions\": {}}}", JSON_RECORDS);
        let path = write(&temp_dir, "t.json", &wrapped);

        assert_eq!(load_transactions(&path).unwrap().len(), 4);
    }

    #[test]
    fn test_csv_and_json_agree() {
        let temp_dir = TempDir::new().unwrap();
        let json = load_transactions(write(&temp_dir, "t.json", JSON_RECORDS)).unwrap();
        let csv = load_transactions(write(&temp_dir, "t.csv", CSV_RECORDS)).unwrap();

        assert_eq!(json, csv);
        assert_eq!(csv[2].amount, Money::from_cents(-713));
        assert_eq!(csv[3].amount, Money::from_cents(334));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();

        for name in ["missing.json", "missing.csv"] {
            let err = load_transactions(temp_dir.path().join(name)).unwrap_err();
            assert!(matches!(err, AnalyzerError::Storage(_)));
        }
    }

    #[test]
    fn test_malformed_record_fails_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            "bad.csv",
            "id,date,amount,type,description,merchant\n1,yesterday,5,debit,x,y\n",
        );

        let err = load_transactions(&path).unwrap_err();
        assert!(matches!(err, AnalyzerError::Csv(_)));
        assert!(err.to_string().contains("record 1"));

        let path = write(&temp_dir, "bad.json", r#"[{"id": "1"}]"#);
        let err = load_transactions(&path).unwrap_err();
        assert!(matches!(err, AnalyzerError::Json(_)));
        assert!(err.to_string().contains("missing field `date`"), "{}", err);

        let path = write(
            &temp_dir,
            "bad_wrapped.json",
            r#"{"transactions": [{"id": "1", "date": "2024-01-05", "amount": "x", "type": "debit"}]}"#,
        );
        let err = load_transactions(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid money format"), "{}", err);
    }

    #[test]
    fn test_unrepresentable_amount_fails_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            "huge.json",
            r#"[{"id": "1", "date": "2024-01-05", "amount": 1e20, "type": "credit"}]"#,
        );

        let err = load_transactions(&path).unwrap_err();
        assert!(matches!(err, AnalyzerError::Json(_)));
        assert!(err.to_string().contains("out of range"), "{}", err);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let original = load_transactions(write(&temp_dir, "t.json", JSON_RECORDS)).unwrap();

        for name in ["out.json", "out.csv"] {
            let path = temp_dir.path().join(name);
            save_transactions(&path, &original).unwrap();
            assert_eq!(load_transactions(&path).unwrap(), original);
        }
    }

    #[test]
    fn test_load_analyzer() {
        let temp_dir = TempDir::new().unwrap();
        let file = TransactionFile::new(write(&temp_dir, "t.csv", CSV_RECORDS)).unwrap();

        let analyzer = file.load_analyzer().unwrap();
        assert_eq!(analyzer.total_amount().unwrap(), Money::from_cents(6975 - 713 + 334));
        assert_eq!(file.format(), SourceFormat::Csv);
    }
}
