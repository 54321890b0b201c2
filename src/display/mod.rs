//! Display formatting for terminal output
//!
//! Renders transactions, summaries and scalar results for humans. Anything
//! meant for other programs goes through [`crate::export`] instead.

pub mod summary;
pub mod transaction;

pub use summary::format_summary;
pub use transaction::{format_amount, format_transaction_details, format_transaction_table};

use std::fmt::Display;

use chrono::Month;

/// Name of a month of year given as January = 0
pub fn format_month(month0: u32) -> String {
    u8::try_from(month0 + 1)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| format!("{} ({})", m.name(), month0))
        .unwrap_or_else(|| format!("month {}", month0))
}

/// One item per line; "(none)" for an empty list
pub fn format_list<T: Display>(items: &[T]) -> String {
    if items.is_empty() {
        return "(none)\n".to_string();
    }

    let mut output = String::new();
    for item in items {
        output.push_str(&item.to_string());
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_month() {
        assert_eq!(format_month(0), "January (0)");
        assert_eq!(format_month(11), "December (11)");
        assert_eq!(format_month(12), "month 12");
    }

    #[test]
    fn test_format_list() {
        assert_eq!(format_list::<String>(&[]), "(none)\n");
        assert_eq!(format_list(&["credit", "debit"]), "credit\ndebit\n");
    }
}
