//! Analysis Summary
//!
//! One-shot overview of an analyzer: totals, average, date span, type
//! frequencies, busiest months and the largest merchants.

use chrono::NaiveDate;
use serde::Serialize;

use super::{sum_amounts, TransactionAnalyzer};
use crate::error::AnalyzerResult;
use crate::models::{Money, TransactionType};

/// Occurrences of one type tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub count: usize,
}

/// Net amount moved with one merchant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MerchantTotal {
    pub merchant: String,
    pub total: Money,
    pub transaction_count: usize,
}

/// Summary of all transactions held by an analyzer
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub transaction_count: usize,
    pub total_amount: Money,
    /// Sum over transactions tagged "debit"
    pub debit_total: Money,
    /// Sum over transactions tagged "credit"
    pub credit_total: Money,
    /// `None` when there are no transactions
    pub average_amount: Option<f64>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub unique_types: Vec<TransactionType>,
    /// Most frequent first
    pub types_by_count: Vec<TypeCount>,
    /// Month of year, January = 0
    pub busiest_month: Option<u32>,
    /// Month of year, January = 0, counting debits only
    pub busiest_debit_month: Option<u32>,
    /// Largest absolute totals first
    pub top_merchants: Vec<MerchantTotal>,
}

impl AnalysisSummary {
    /// Generate a summary, keeping at most `top_merchants` merchants
    ///
    /// # Errors
    ///
    /// Fails if any of the totals is out of range.
    pub fn generate(analyzer: &TransactionAnalyzer, top_merchants: usize) -> AnalyzerResult<Self> {
        let transactions = analyzer.all();

        let credit_total = sum_amounts(transactions.iter().filter(|t| t.is_credit()), "credit total")?;

        let first_date = transactions.iter().map(|t| t.day()).min();
        let last_date = transactions.iter().map(|t| t.day()).max();

        let types_by_count = analyzer
            .type_counts_ranked()
            .into_iter()
            .map(|(kind, count)| TypeCount { kind, count })
            .collect();

        Ok(Self {
            transaction_count: analyzer.len(),
            total_amount: analyzer.total_amount()?,
            debit_total: analyzer.total_debit_amount()?,
            credit_total,
            average_amount: analyzer.average_amount().ok(),
            first_date,
            last_date,
            unique_types: analyzer.unique_types(),
            types_by_count,
            busiest_month: analyzer.most_transactions_month(),
            busiest_debit_month: analyzer.most_debit_transactions_month(),
            top_merchants: top_merchants_of(analyzer, top_merchants)?,
        })
    }

    /// Check whether the summary covers no transactions
    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }
}

fn top_merchants_of(
    analyzer: &TransactionAnalyzer,
    limit: usize,
) -> AnalyzerResult<Vec<MerchantTotal>> {
    let mut merchants: Vec<MerchantTotal> = analyzer
        .totals_by_merchant()?
        .into_iter()
        .map(|(merchant, total)| MerchantTotal {
            transaction_count: analyzer.transactions_by_merchant(&merchant).len(),
            merchant,
            total,
        })
        .collect();

    // Biggest movers first; the map already yields names in order for ties
    merchants.sort_by(|a, b| b.total.abs().cmp(&a.total.abs()));
    merchants.truncate(limit);
    Ok(merchants)
}
