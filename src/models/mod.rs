//! Core data models for txn-analyzer
//!
//! This module contains the value types the analyzer operates on:
//! transactions, their ids and type tags, and money amounts.

pub mod ids;
pub mod money;
pub mod transaction;

pub use ids::TransactionId;
pub use money::{Money, MoneyParseError};
pub use transaction::{parse_timestamp, Transaction, TransactionType};
