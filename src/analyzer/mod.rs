//! Transaction analysis
//!
//! [`TransactionAnalyzer`] owns an ordered list of transactions and answers
//! queries over it: filters that return matching records in stored order,
//! sums and averages, and groupings by month, type, merchant and day.
//!
//! Every query is a scan of the in-memory list. Only [`TransactionAnalyzer::append`]
//! mutates it.

pub mod summary;

pub use summary::{AnalysisSummary, MerchantTotal, TypeCount};

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::{Money, Transaction, TransactionType};

/// Query and aggregation over an owned, ordered list of transactions
///
/// Construction takes ownership of the list; the analyzer is its only
/// writer afterwards. Insertion order (construction order, then append
/// order) is preserved by every query that returns transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionAnalyzer {
    transactions: Vec<Transaction>,
}

impl TransactionAnalyzer {
    /// Create an analyzer over the given transactions
    pub fn new(transactions: Vec<Transaction>) -> Self {
        debug!(count = transactions.len(), "creating transaction analyzer");
        Self { transactions }
    }

    /// Append a transaction to the end of the list
    pub fn append(&mut self, transaction: Transaction) {
        debug!(id = %transaction.id, "appending transaction");
        self.transactions.push(transaction);
    }

    /// All transactions in stored order
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    /// Give the transactions back, in stored order
    pub fn into_transactions(self) -> Vec<Transaction> {
        self.transactions
    }

    /// Distinct type tags in ascending lexicographic order
    pub fn unique_types(&self) -> Vec<TransactionType> {
        self.transactions
            .iter()
            .map(|t| &t.kind)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Sum of all amounts; zero when there are no transactions
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Overflow`] if the sum is not representable.
    pub fn total_amount(&self) -> AnalyzerResult<Money> {
        sum_amounts(&self.transactions, "total amount")
    }

    /// Sum of the amounts dated within one calendar day
    ///
    /// `month` is 1-based. The window is `[day 00:00, next day 00:00)`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the date does not exist.
    pub fn total_amount_on_date(&self, year: i32, month: u32, day: u32) -> AnalyzerResult<Money> {
        let start = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| {
                AnalyzerError::Validation(format!("Invalid date: {}-{}-{}", year, month, day))
            })?;
        let end = start.checked_add_days(Days::new(1)).ok_or_else(|| {
            AnalyzerError::Validation(format!("Date out of range: {}-{}-{}", year, month, day))
        })?;

        sum_amounts(
            self.transactions
                .iter()
                .filter(|t| t.date >= start && t.date < end),
            "total amount on date",
        )
    }

    /// Transactions whose type tag equals `kind` exactly
    pub fn transactions_by_type(&self, kind: &str) -> Vec<&Transaction> {
        self.filter(|t| t.kind == kind)
    }

    /// Transactions dated in `[start, end)`
    pub fn transactions_in_date_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Vec<&Transaction> {
        self.filter(|t| t.date >= start && t.date < end)
    }

    /// Transactions whose merchant equals `merchant` exactly
    pub fn transactions_by_merchant(&self, merchant: &str) -> Vec<&Transaction> {
        self.filter(|t| t.merchant == merchant)
    }

    /// Mean amount, in currency units
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::EmptyCollection`] when there are no
    /// transactions; the mean is undefined rather than NaN.
    pub fn average_amount(&self) -> AnalyzerResult<f64> {
        if self.transactions.is_empty() {
            return Err(AnalyzerError::EmptyCollection {
                operation: "average amount",
            });
        }

        // Widened so the mean exists even when the total does not fit
        let cents: i128 = self
            .transactions
            .iter()
            .map(|t| i128::from(t.amount.cents()))
            .sum();

        Ok(cents as f64 / 100.0 / self.transactions.len() as f64)
    }

    /// Transactions with `min <= amount <= max`
    pub fn transactions_by_amount_range(&self, min: Money, max: Money) -> Vec<&Transaction> {
        self.filter(|t| t.amount >= min && t.amount <= max)
    }

    /// Sum of the amounts of transactions tagged exactly "debit"
    pub fn total_debit_amount(&self) -> AnalyzerResult<Money> {
        sum_amounts(
            self.transactions.iter().filter(|t| t.is_debit()),
            "debit total",
        )
    }

    /// Month of year (January = 0) with the most transactions
    ///
    /// Years are not distinguished. Ties go to the earliest month. Returns
    /// `None` when there are no transactions.
    pub fn most_transactions_month(&self) -> Option<u32> {
        busiest(&self.month_counts(|_| true))
    }

    /// Month of year (January = 0) with the most debit transactions
    ///
    /// Same rules as [`Self::most_transactions_month`], counting only
    /// transactions tagged "debit". Returns `None` when there are none.
    pub fn most_debit_transactions_month(&self) -> Option<u32> {
        busiest(&self.month_counts(Transaction::is_debit))
    }

    /// Distinct type tags, most frequent first, ties in lexicographic order
    pub fn transaction_types_by_count(&self) -> Vec<TransactionType> {
        self.type_counts_ranked()
            .into_iter()
            .map(|(kind, _)| kind)
            .collect()
    }

    /// Transactions dated strictly before `date`
    pub fn transactions_before(&self, date: NaiveDateTime) -> Vec<&Transaction> {
        self.filter(|t| t.date < date)
    }

    /// First transaction in stored order with the given id
    pub fn find_by_id(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == *id)
    }

    /// Descriptions of all transactions, in stored order
    pub fn descriptions(&self) -> Vec<&str> {
        self.transactions
            .iter()
            .map(|t| t.description.as_str())
            .collect()
    }

    /// Number of transactions per month of year (January = 0) among those
    /// matching `include`
    pub fn month_counts<F>(&self, include: F) -> BTreeMap<u32, usize>
    where
        F: Fn(&Transaction) -> bool,
    {
        let mut counts = BTreeMap::new();
        for txn in self.transactions.iter().filter(|t| include(*t)) {
            *counts.entry(txn.month0()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of transactions per type tag
    pub fn type_counts(&self) -> BTreeMap<TransactionType, usize> {
        let mut counts = BTreeMap::new();
        for txn in &self.transactions {
            *counts.entry(txn.kind.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Type tags with their counts, most frequent first
    pub fn type_counts_ranked(&self) -> Vec<(TransactionType, usize)> {
        let mut ranked: Vec<_> = self.type_counts().into_iter().collect();
        // Stable sort over an already lexicographic list keeps ties in order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Sum of amounts per merchant
    pub fn totals_by_merchant(&self) -> AnalyzerResult<BTreeMap<String, Money>> {
        self.totals_by(|t| t.merchant.clone(), "merchant totals")
    }

    /// Sum of amounts per calendar day
    pub fn totals_by_date(&self) -> AnalyzerResult<BTreeMap<NaiveDate, Money>> {
        self.totals_by(Transaction::day, "daily totals")
    }

    /// Summarize the whole list, listing up to `top_merchants` merchants
    pub fn summary(&self, top_merchants: usize) -> AnalyzerResult<AnalysisSummary> {
        AnalysisSummary::generate(self, top_merchants)
    }

    fn totals_by<K, F>(&self, key: F, operation: &'static str) -> AnalyzerResult<BTreeMap<K, Money>>
    where
        K: Ord,
        F: Fn(&Transaction) -> K,
    {
        let mut totals: BTreeMap<K, Money> = BTreeMap::new();
        for txn in &self.transactions {
            let total = totals.entry(key(txn)).or_default();
            *total = total
                .checked_add(txn.amount)
                .ok_or(AnalyzerError::Overflow { operation })?;
        }
        Ok(totals)
    }

    fn filter<F>(&self, predicate: F) -> Vec<&Transaction>
    where
        F: Fn(&Transaction) -> bool,
    {
        self.transactions.iter().filter(|t| predicate(*t)).collect()
    }
}

/// Checked sum of the amounts of `transactions`
pub(crate) fn sum_amounts<'a, I>(transactions: I, operation: &'static str) -> AnalyzerResult<Money>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    Money::checked_sum(transactions.into_iter().map(|t| t.amount))
        .ok_or(AnalyzerError::Overflow { operation })
}

/// Key with the highest count; the smallest key wins ties
fn busiest(counts: &BTreeMap<u32, usize>) -> Option<u32> {
    let mut best: Option<(u32, usize)> = None;
    for (&month, &count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((month, count));
        }
    }
    best.map(|(month, _)| month)
}

impl From<Vec<Transaction>> for TransactionAnalyzer {
    fn from(transactions: Vec<Transaction>) -> Self {
        Self::new(transactions)
    }
}

impl FromIterator<Transaction> for TransactionAnalyzer {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Extend<Transaction> for TransactionAnalyzer {
    fn extend<I: IntoIterator<Item = Transaction>>(&mut self, iter: I) {
        for txn in iter {
            self.append(txn);
        }
    }
}

impl<'a> IntoIterator for &'a TransactionAnalyzer {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}
