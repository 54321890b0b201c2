//! Transaction model
//!
//! A transaction record as supplied by a data file: id, timestamp, signed
//! amount, an open-ended type tag, a description and a merchant.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::TransactionId;
use super::money::Money;

/// Type tag of a transaction
///
/// `"debit"` and `"credit"` are the conventional tags, but any string is
/// accepted and carried verbatim. Tags order lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionType(String);

impl TransactionType {
    pub const DEBIT: &'static str = "debit";
    pub const CREDIT: &'static str = "credit";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn debit() -> Self {
        Self::new(Self::DEBIT)
    }

    pub fn credit() -> Self {
        Self::new(Self::CREDIT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact, case-sensitive match on "debit"
    pub fn is_debit(&self) -> bool {
        self.0 == Self::DEBIT
    }

    /// Exact, case-sensitive match on "credit"
    pub fn is_credit(&self) -> bool {
        self.0 == Self::CREDIT
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for TransactionType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TransactionType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Identifier (not guaranteed unique)
    pub id: TransactionId,

    /// When the transaction happened, without a time zone
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,

    /// Amount (sign is kept as given)
    pub amount: Money,

    /// Type tag, e.g. "debit" or "credit"
    #[serde(rename = "type")]
    pub kind: TransactionType,

    #[serde(default)]
    pub description: String,

    /// Counterparty name
    #[serde(default)]
    pub merchant: String,
}

impl Transaction {
    /// Create a new transaction with an empty description and merchant
    pub fn new(
        id: impl Into<TransactionId>,
        date: NaiveDateTime,
        amount: Money,
        kind: impl Into<TransactionType>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            amount,
            kind: kind.into(),
            description: String::new(),
            merchant: String::new(),
        }
    }

    /// Create a transaction with all fields
    pub fn with_details(
        id: impl Into<TransactionId>,
        date: NaiveDateTime,
        amount: Money,
        kind: impl Into<TransactionType>,
        description: impl Into<String>,
        merchant: impl Into<String>,
    ) -> Self {
        let mut txn = Self::new(id, date, amount, kind);
        txn.description = description.into();
        txn.merchant = merchant.into();
        txn
    }

    pub fn is_debit(&self) -> bool {
        self.kind.is_debit()
    }

    pub fn is_credit(&self) -> bool {
        self.kind.is_credit()
    }

    /// The calendar day of the transaction
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    /// Month of year, January = 0
    pub fn month0(&self) -> u32 {
        self.date.month0()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.id,
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.merchant,
            self.amount
        )
    }
}

/// Parse a timestamp in any of the accepted input formats
///
/// Accepts `YYYY-MM-DD` (midnight), `YYYY-MM-DDTHH:MM:SS[.fff]`,
/// `YYYY-MM-DD HH:MM:SS[.fff]` and RFC 3339 with an offset (converted to UTC).
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Serde adapter for [`Transaction::date`]
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid date: {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_new_transaction() {
        let txn = Transaction::new("1", at(2024, 1, 5), Money::from_cents(-3000), "debit");
        assert_eq!(txn.id, TransactionId::from("1"));
        assert!(txn.is_debit());
        assert!(!txn.is_credit());
        assert!(txn.description.is_empty());
        assert_eq!(txn.month0(), 0);
    }

    #[test]
    fn test_type_matching_is_exact() {
        assert!(TransactionType::from("debit").is_debit());
        assert!(!TransactionType::from("Debit").is_debit());
        assert!(!TransactionType::from("debit ").is_debit());
        assert!(TransactionType::credit().is_credit());
    }

    #[test]
    fn test_type_ordering_is_lexicographic() {
        let mut tags = vec![
            TransactionType::from("debit"),
            TransactionType::from("Zelle"),
            TransactionType::from("credit"),
        ];
        tags.sort();
        assert_eq!(tags, vec!["Zelle", "credit", "debit"]);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2024-01-05"), Some(at(2024, 1, 5)));

        let expected = at(2024, 1, 5) + chrono::Duration::hours(13);
        assert_eq!(parse_timestamp("2024-01-05T13:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-05 13:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-05T15:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-05T13:00:00.000Z"), Some(expected));

        assert_eq!(parse_timestamp("05/01/2024"), None);
        assert_eq!(parse_timestamp("2024-02-30"), None);
    }

    #[test]
    fn test_deserialize_record() {
        let json = r#"{
            "id": "7",
            "date": "2024-03-10",
            "amount": 42.5,
            "type": "credit",
            "description": "Refund",
            "merchant": "Store"
        }"#;

        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.id, TransactionId::from("7"));
        assert_eq!(txn.date, at(2024, 3, 10));
        assert_eq!(txn.amount.cents(), 4250);
        assert_eq!(txn.kind, "credit");
        assert_eq!(txn.merchant, "Store");
    }

    #[test]
    fn test_missing_optional_text_fields_default() {
        let json = r#"{"id": "1", "date": "2024-03-10", "amount": 1, "type": "fee"}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert!(txn.description.is_empty());
        assert!(txn.merchant.is_empty());
    }

    #[test]
    fn test_serialization() {
        let txn = Transaction::with_details(
            "9",
            at(2024, 6, 1),
            Money::from_cents(-1999),
            "debit",
            "Groceries",
            "Market",
        );

        let json = serde_json::to_string(&txn).unwrap();
        assert!(json.contains("\"date\":\"2024-06-01T00:00:00\""));
        assert!(json.contains("\"type\":\"debit\""));

        let deserialized: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(txn, deserialized);
    }

    #[test]
    fn test_display() {
        let txn = Transaction::with_details(
            "9",
            at(2024, 6, 1),
            Money::from_cents(-5000),
            "debit",
            "",
            "Test Store",
        );

        assert_eq!(txn.to_string(), "9 2024-06-01 debit Test Store -50.00");
    }
}
