//! Transaction display formatting
//!
//! Tables of transactions and single-record detail views.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::{Money, Transaction};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Merchant")]
    merchant: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl TransactionRow {
    fn new(txn: &Transaction, settings: &Settings) -> Self {
        Self {
            id: txn.id.to_string(),
            date: txn.date.format(&settings.date_format).to_string(),
            kind: txn.kind.to_string(),
            merchant: truncate(&txn.merchant, 24),
            description: truncate(&txn.description, 32),
            amount: format_amount(txn.amount, settings),
        }
    }
}

/// Format an amount with the configured currency symbol
pub fn format_amount(amount: Money, settings: &Settings) -> String {
    amount.format_with_symbol(&settings.currency_symbol)
}

/// Format a list of transactions as a table
pub fn format_transaction_table(transactions: &[&Transaction], settings: &Settings) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows: Vec<_> = transactions
        .iter()
        .map(|t| TransactionRow::new(t, settings))
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::sharp())
        .modify(Columns::last(), Alignment::right());

    format!("{}\n{} transaction(s)\n", table, transactions.len())
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d %H:%M:%S")));
    output.push_str(&format!("Amount:      {}\n", format_amount(txn.amount, settings)));
    output.push_str(&format!("Type:        {}\n", txn.kind));

    if !txn.merchant.is_empty() {
        output.push_str(&format!("Merchant:    {}\n", txn.merchant));
    }

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
