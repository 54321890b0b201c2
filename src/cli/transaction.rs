//! Transaction CLI commands
//!
//! Appends a record to a transaction file.

use std::io::Write;

use chrono::{Local, Timelike};
use clap::Args;
use tracing::{info, warn};

use super::query::{parse_amount_arg, parse_date_arg};
use super::Output;
use crate::analyzer::TransactionAnalyzer;
use crate::display::format_transaction_details;
use crate::error::AnalyzerResult;
use crate::export::write_transactions;
use crate::models::{Transaction, TransactionId, TransactionType};
use crate::storage::TransactionFile;

/// Arguments of `add`
#[derive(Args, Debug, Clone, PartialEq)]
pub struct AddArgs {
    /// Amount (e.g., "-50.00" for a debit, "100.00" for a credit)
    #[arg(allow_negative_numbers = true)]
    pub amount: String,

    /// Type tag, e.g. "debit" or "credit"
    pub kind: String,

    /// Transaction date (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS), defaults to now
    #[arg(long)]
    pub date: Option<String>,

    /// Transaction ID, generated when omitted
    #[arg(long)]
    pub id: Option<String>,

    /// Merchant name
    #[arg(short, long, default_value = "")]
    pub merchant: String,

    /// Free-text description
    #[arg(long, default_value = "")]
    pub description: String,
}

impl AddArgs {
    /// Validate the arguments and build the record they describe
    pub fn to_transaction(&self) -> AnalyzerResult<Transaction> {
        let amount = parse_amount_arg(&self.amount)?;

        let date = match &self.date {
            Some(date) => parse_date_arg(date)?,
            None => {
                let now = Local::now().naive_local();
                now.with_nanosecond(0).unwrap_or(now)
            }
        };

        let id = match &self.id {
            Some(id) => TransactionId::new(id.trim()),
            None => TransactionId::generate(),
        };

        Ok(Transaction::with_details(
            id,
            date,
            amount,
            TransactionType::new(self.kind.trim()),
            self.description.clone(),
            self.merchant.clone(),
        ))
    }
}

/// Handle `add`: append one transaction and write the file back
///
/// A missing file is created.
pub fn handle_add_command<W: Write>(
    file: &TransactionFile,
    args: AddArgs,
    out: &mut Output<'_, W>,
) -> AnalyzerResult<Transaction> {
    let txn = args.to_transaction()?;

    let mut analyzer = if file.exists() {
        file.load_analyzer()?
    } else {
        warn!(path = %file.path().display(), "transaction file missing, creating it");
        TransactionAnalyzer::default()
    };

    if analyzer.find_by_id(txn.id.as_str()).is_some() {
        warn!(id = %txn.id, "a transaction with this ID already exists");
    }

    analyzer.append(txn.clone());
    file.save(analyzer.all())?;

    info!(id = %txn.id, path = %file.path().display(), "added transaction");

    match out.format.export_format() {
        None => {
            writeln!(out.writer, "Added transaction to {}", file.path().display())?;
            write!(out.writer, "{}", format_transaction_details(&txn, out.settings))?;
        }
        Some(format) => write_transactions(format, &[&txn], &mut out.writer)?,
    }

    Ok(txn)
}
