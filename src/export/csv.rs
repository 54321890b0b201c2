//! CSV Export functionality
//!
//! Writes transactions with the header the loader reads back
//! (`id,date,amount,type,description,merchant`), and single-column lists.

use std::fmt::Display;
use std::io::Write;

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::Transaction;
use crate::storage::transactions::CsvRecord;

/// Export transactions to CSV
pub fn export_transactions_csv<W: Write>(
    transactions: &[&Transaction],
    writer: &mut W,
) -> AnalyzerResult<()> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);

    if transactions.is_empty() {
        // serialize() only emits the header alongside the first row
        csv_writer
            .write_record(["id", "date", "amount", "type", "description", "merchant"])
            .map_err(|e| AnalyzerError::Export(e.to_string()))?;
    }

    for txn in transactions {
        csv_writer
            .serialize(CsvRecord::from(*txn))
            .map_err(|e| AnalyzerError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| AnalyzerError::Export(e.to_string()))
}

/// Export a list of values as a single CSV column under `header`
pub fn export_values_csv<T, W>(header: &str, values: &[T], writer: &mut W) -> AnalyzerResult<()>
where
    T: Display,
    W: Write,
{
    let mut csv_writer = ::csv::Writer::from_writer(writer);

    csv_writer
        .write_record([header])
        .map_err(|e| AnalyzerError::Export(e.to_string()))?;

    for value in values {
        csv_writer
            .write_record([value.to_string()])
            .map_err(|e| AnalyzerError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| AnalyzerError::Export(e.to_string()))
}
