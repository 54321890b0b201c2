//! Storage layer for txn-analyzer
//!
//! Reads transaction files into memory and writes them back atomically.
//! The analyzer itself never touches the filesystem.

pub mod file_io;
pub mod transactions;

pub use file_io::{read_json, read_json_required, write_atomic, write_json_atomic};
pub use transactions::{load_transactions, save_transactions, SourceFormat, TransactionFile};
