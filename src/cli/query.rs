//! Query CLI commands
//!
//! Read-only commands answered by a [`TransactionAnalyzer`].

use std::io::Write;

use chrono::NaiveDateTime;
use clap::Subcommand;
use tracing::info;

use super::Output;
use crate::analyzer::{TransactionAnalyzer, TypeCount};
use crate::display::{
    format_amount, format_list, format_month, format_summary, format_transaction_details,
    format_transaction_table,
};
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::export::{export_values_csv, write_summary, write_transactions, write_value, ExportFormat};
use crate::models::{parse_timestamp, Money, Transaction};

/// Query subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum QueryCommands {
    /// List every transaction in file order
    List,

    /// List the distinct transaction types
    Types,

    /// Sum of all amounts, or of one calendar day
    Total {
        /// Only count transactions on this day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Mean amount over all transactions
    Average,

    /// Transactions with exactly this type tag
    ByType {
        /// Type tag, e.g. "debit"
        kind: String,
    },

    /// Transactions with exactly this merchant
    ByMerchant {
        /// Merchant name
        merchant: String,
    },

    /// Transactions dated from START up to, not including, END
    Between {
        /// Range start (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
        start: String,
        /// Range end, exclusive (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
        end: String,
    },

    /// Transactions whose amount lies within an inclusive range
    AmountRange {
        /// Lowest amount (e.g. "-50.00")
        #[arg(allow_negative_numbers = true)]
        min: String,
        /// Highest amount
        #[arg(allow_negative_numbers = true)]
        max: String,
    },

    /// Sum of the amounts of debit transactions
    DebitTotal,

    /// Month of year (January = 0) with the most transactions
    BusiestMonth {
        /// Only count debit transactions
        #[arg(long)]
        debit: bool,
    },

    /// Transaction types, most frequent first
    TypesByCount,

    /// Transactions strictly before a moment
    Before {
        /// Cut-off (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
        date: String,
    },

    /// Show the first transaction with this ID
    Find {
        /// Transaction ID
        id: String,
    },

    /// List every description in file order
    Descriptions,

    /// Overview of totals, busiest months and top merchants
    Summary {
        /// Number of merchants to list (defaults to the configured value)
        #[arg(short, long)]
        top: Option<usize>,
    },
}

impl QueryCommands {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Types => "types",
            Self::Total { .. } => "total",
            Self::Average => "average",
            Self::ByType { .. } => "by-type",
            Self::ByMerchant { .. } => "by-merchant",
            Self::Between { .. } => "between",
            Self::AmountRange { .. } => "amount-range",
            Self::DebitTotal => "debit-total",
            Self::BusiestMonth { .. } => "busiest-month",
            Self::TypesByCount => "types-by-count",
            Self::Before { .. } => "before",
            Self::Find { .. } => "find",
            Self::Descriptions => "descriptions",
            Self::Summary { .. } => "summary",
        }
    }
}

/// Handle a query command
pub fn handle_query_command<W: Write>(
    analyzer: &TransactionAnalyzer,
    cmd: QueryCommands,
    out: &mut Output<'_, W>,
) -> AnalyzerResult<()> {
    info!(command = cmd.name(), transactions = analyzer.len(), "running query");

    match cmd {
        QueryCommands::List => {
            let all: Vec<&Transaction> = analyzer.iter().collect();
            emit_transactions(out, &all)
        }

        QueryCommands::Types => {
            let types = analyzer.unique_types();
            emit_list(out, "type", &types)
        }

        QueryCommands::Total { date } => {
            let total = match date {
                Some(date) => {
                    let (year, month, day) = parse_ymd(&date)?;
                    analyzer.total_amount_on_date(year, month, day)?
                }
                None => analyzer.total_amount()?,
            };
            emit_amount(out, "total", total)
        }

        QueryCommands::Average => {
            let average = analyzer.average_amount()?;
            match out.format.export_format() {
                None => {
                    let text = format_amount(Money::from_f64(average), out.settings);
                    writeln!(out.writer, "{}", text)?;
                    Ok(())
                }
                Some(ExportFormat::Csv) => export_values_csv("average", &[average], &mut out.writer),
                Some(format) => write_value(format, &average, &mut out.writer),
            }
        }

        QueryCommands::ByType { kind } => {
            let matches = analyzer.transactions_by_type(&kind);
            emit_transactions(out, &matches)
        }

        QueryCommands::ByMerchant { merchant } => {
            let matches = analyzer.transactions_by_merchant(&merchant);
            emit_transactions(out, &matches)
        }

        QueryCommands::Between { start, end } => {
            let start = parse_date_arg(&start)?;
            let end = parse_date_arg(&end)?;
            let matches = analyzer.transactions_in_date_range(start, end);
            emit_transactions(out, &matches)
        }

        QueryCommands::AmountRange { min, max } => {
            let min = parse_amount_arg(&min)?;
            let max = parse_amount_arg(&max)?;
            let matches = analyzer.transactions_by_amount_range(min, max);
            emit_transactions(out, &matches)
        }

        QueryCommands::DebitTotal => {
            emit_amount(out, "debit_total", analyzer.total_debit_amount()?)
        }

        QueryCommands::BusiestMonth { debit } => {
            let month = if debit {
                analyzer.most_debit_transactions_month()
            } else {
                analyzer.most_transactions_month()
            };

            match out.format.export_format() {
                None => {
                    match month {
                        Some(m) => writeln!(out.writer, "{}", format_month(m))?,
                        None => writeln!(out.writer, "No matching transactions.")?,
                    }
                    Ok(())
                }
                Some(ExportFormat::Csv) => {
                    let values: Vec<u32> = month.into_iter().collect();
                    export_values_csv("month", &values, &mut out.writer)
                }
                Some(format) => write_value(format, &month, &mut out.writer),
            }
        }

        QueryCommands::TypesByCount => {
            let ranked = analyzer.type_counts_ranked();
            match out.format.export_format() {
                None => {
                    if ranked.is_empty() {
                        writeln!(out.writer, "(none)")?;
                    }
                    let width = ranked.iter().map(|(k, _)| k.as_str().len()).max().unwrap_or(0);
                    for (kind, count) in &ranked {
                        writeln!(out.writer, "{:<width$}  {}", kind.as_str(), count, width = width)?;
                    }
                    Ok(())
                }
                Some(ExportFormat::Csv) => {
                    let types: Vec<_> = ranked.into_iter().map(|(kind, _)| kind).collect();
                    export_values_csv("type", &types, &mut out.writer)
                }
                Some(format) => {
                    let counts: Vec<TypeCount> = ranked
                        .into_iter()
                        .map(|(kind, count)| TypeCount { kind, count })
                        .collect();
                    write_value(format, &counts, &mut out.writer)
                }
            }
        }

        QueryCommands::Before { date } => {
            let cutoff = parse_date_arg(&date)?;
            let matches = analyzer.transactions_before(cutoff);
            emit_transactions(out, &matches)
        }

        QueryCommands::Find { id } => {
            let txn = analyzer
                .find_by_id(&id)
                .ok_or_else(|| AnalyzerError::transaction_not_found(&id))?;

            match out.format.export_format() {
                None => {
                    let text = format_transaction_details(txn, out.settings);
                    write!(out.writer, "{}", text)?;
                    Ok(())
                }
                Some(format) => write_transactions(format, &[txn], &mut out.writer),
            }
        }

        QueryCommands::Descriptions => {
            let descriptions = analyzer.descriptions();
            emit_list(out, "description", &descriptions)
        }

        QueryCommands::Summary { top } => {
            let summary = analyzer.summary(top.unwrap_or(out.settings.top_merchants))?;
            match out.format.export_format() {
                None => {
                    let text = format_summary(&summary, out.settings);
                    write!(out.writer, "{}", text)?;
                    Ok(())
                }
                Some(format) => write_summary(format, &summary, &mut out.writer),
            }
        }
    }
}

fn emit_transactions<W: Write>(
    out: &mut Output<'_, W>,
    transactions: &[&Transaction],
) -> AnalyzerResult<()> {
    match out.format.export_format() {
        None => {
            let table = format_transaction_table(transactions, out.settings);
            write!(out.writer, "{}", table)?;
            Ok(())
        }
        Some(format) => write_transactions(format, transactions, &mut out.writer),
    }
}

fn emit_amount<W: Write>(out: &mut Output<'_, W>, label: &str, amount: Money) -> AnalyzerResult<()> {
    match out.format.export_format() {
        None => {
            let text = format_amount(amount, out.settings);
            writeln!(out.writer, "{}", text)?;
            Ok(())
        }
        Some(ExportFormat::Csv) => export_values_csv(label, &[amount], &mut out.writer),
        Some(format) => write_value(format, &amount, &mut out.writer),
    }
}

fn emit_list<T, W>(out: &mut Output<'_, W>, header: &str, items: &[T]) -> AnalyzerResult<()>
where
    T: std::fmt::Display + serde::Serialize,
    W: Write,
{
    match out.format.export_format() {
        None => {
            let text = format_list(items);
            write!(out.writer, "{}", text)?;
            Ok(())
        }
        Some(ExportFormat::Csv) => export_values_csv(header, items, &mut out.writer),
        Some(format) => write_value(format, items, &mut out.writer),
    }
}

/// Parse a date or date-time argument
pub fn parse_date_arg(s: &str) -> AnalyzerResult<NaiveDateTime> {
    parse_timestamp(s).ok_or_else(|| {
        AnalyzerError::Validation(format!(
            "Invalid date: {}. Use YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS",
            s
        ))
    })
}

/// Parse an amount argument such as "12.50" or "-3"
pub fn parse_amount_arg(s: &str) -> AnalyzerResult<Money> {
    Money::parse(s).map_err(|e| AnalyzerError::Validation(format!("Invalid amount: {}", e)))
}

/// Split "YYYY-MM-DD" into its components without checking the calendar
///
/// Whether the day actually exists is decided by the analyzer.
fn parse_ymd(s: &str) -> AnalyzerResult<(i32, u32, u32)> {
    let invalid = || AnalyzerError::Validation(format!("Invalid date: {}. Use YYYY-MM-DD", s));

    let mut parts = s.trim().splitn(3, '-');
    let year = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
    let month = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
    let day = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;

    Ok((year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::config::Settings;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn analyzer() -> TransactionAnalyzer {
        TransactionAnalyzer::new(vec![
            Transaction::with_details("1", at(2024, 1, 5), Money::from_cents(100000), "credit", "Salary", "Acme"),
            Transaction::with_details("2", at(2024, 1, 5), Money::from_cents(-4550), "debit", "Groceries", "Market"),
            Transaction::with_details("3", at(2024, 2, 10), Money::from_cents(-1200), "debit", "Lunch", "Cafe"),
            Transaction::with_details("4", at(2024, 3, 1), Money::from_cents(2500), "refund", "Return", "Market"),
        ])
    }

    fn run(cmd: QueryCommands, format: OutputFormat) -> AnalyzerResult<String> {
        let settings = Settings::default();
        let mut out = Output::new(&settings, format, Vec::new());
        handle_query_command(&analyzer(), cmd, &mut out)?;
        Ok(String::from_utf8(out.writer).unwrap())
    }

    #[test]
    fn test_total_and_total_on_date() {
        assert_eq!(run(QueryCommands::Total { date: None }, OutputFormat::Table).unwrap(), "$967.50\n");

        let on_day = QueryCommands::Total {
            date: Some("2024-01-05".into()),
        };
        assert_eq!(run(on_day, OutputFormat::Table).unwrap(), "$954.50\n");

        let json = run(QueryCommands::Total { date: None }, OutputFormat::Json).unwrap();
        assert_eq!(json.trim(), "967.5");
    }

    #[test]
    fn test_total_on_impossible_date() {
        let cmd = QueryCommands::Total {
            date: Some("2024-02-30".into()),
        };
        assert!(run(cmd, OutputFormat::Table).unwrap_err().is_validation());

        let cmd = QueryCommands::Total {
            date: Some("Jan 5".into()),
        };
        assert!(run(cmd, OutputFormat::Table).unwrap_err().is_validation());
    }

    #[test]
    fn test_by_type_table_and_csv() {
        let table = run(QueryCommands::ByType { kind: "debit".into() }, OutputFormat::Table).unwrap();
        assert!(table.contains("Groceries"));
        assert!(table.contains("Lunch"));
        assert!(!table.contains("Salary"));

        let csv = run(QueryCommands::ByType { kind: "debit".into() }, OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,date,amount,type,description,merchant");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_find_miss_is_not_found() {
        let err = run(QueryCommands::Find { id: "nope".into() }, OutputFormat::Table).unwrap_err();
        assert!(err.is_not_found());

        let hit = run(QueryCommands::Find { id: "3".into() }, OutputFormat::Table).unwrap();
        assert!(hit.contains("Lunch"));
    }

    #[test]
    fn test_busiest_month_output() {
        let table = run(QueryCommands::BusiestMonth { debit: false }, OutputFormat::Table).unwrap();
        assert_eq!(table, "January (0)\n");

        let json = run(QueryCommands::BusiestMonth { debit: true }, OutputFormat::Json).unwrap();
        assert_eq!(json.trim(), "0");
    }

    #[test]
    fn test_types_by_count_formats() {
        let table = run(QueryCommands::TypesByCount, OutputFormat::Table).unwrap();
        let first = table.lines().next().unwrap();
        assert!(first.starts_with("debit"));
        assert!(first.ends_with('2'));

        let json = run(QueryCommands::TypesByCount, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["type"], "debit");
        assert_eq!(value[0]["count"], 2);
        assert_eq!(value[1]["type"], "credit");
    }

    #[test]
    fn test_amount_range_and_bad_amount() {
        let cmd = QueryCommands::AmountRange {
            min: "-50".into(),
            max: "0".into(),
        };
        let csv = run(cmd, OutputFormat::Csv).unwrap();
        assert_eq!(csv.lines().count(), 3);

        let cmd = QueryCommands::AmountRange {
            min: "cheap".into(),
            max: "0".into(),
        };
        assert!(run(cmd, OutputFormat::Table).unwrap_err().is_validation());
    }

    #[test]
    fn test_average_on_empty_collection() {
        let settings = Settings::default();
        let mut out = Output::new(&settings, OutputFormat::Table, Vec::new());
        let err = handle_query_command(&TransactionAnalyzer::default(), QueryCommands::Average, &mut out)
            .unwrap_err();
        assert!(err.is_empty_collection());
    }

    #[test]
    fn test_summary_csv_rejected() {
        let err = run(QueryCommands::Summary { top: None }, OutputFormat::Csv).unwrap_err();
        assert!(err.is_validation());

        let yaml = run(QueryCommands::Summary { top: Some(1) }, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("transaction_count: 4"));
    }

    #[test]
    fn test_parse_ymd() {
        assert_eq!(parse_ymd("2024-01-05").unwrap(), (2024, 1, 5));
        assert_eq!(parse_ymd("2023-02-29").unwrap(), (2023, 2, 29));
        assert!(parse_ymd("2024-01").is_err());
    }
}
