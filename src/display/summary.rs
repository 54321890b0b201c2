//! Summary display formatting

use crate::analyzer::AnalysisSummary;
use crate::config::Settings;
use crate::models::Money;

use super::{format_amount, format_month};

/// Format a summary for terminal display
pub fn format_summary(summary: &AnalysisSummary, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str("Transaction Summary\n");
    output.push_str(&"=".repeat(60));
    output.push('\n');

    if summary.is_empty() {
        output.push_str("No transactions.\n");
        return output;
    }

    let money = |m| format_amount(m, settings);

    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        output.push_str(&format!(
            "Period:             {} to {}\n",
            first.format(&settings.date_format),
            last.format(&settings.date_format)
        ));
    }
    output.push_str(&format!("Transactions:       {}\n", summary.transaction_count));
    output.push_str(&format!("Total:              {}\n", money(summary.total_amount)));
    output.push_str(&format!("Credits:            {}\n", money(summary.credit_total)));
    output.push_str(&format!("Debits:             {}\n", money(summary.debit_total)));
    if let Some(average) = summary.average_amount {
        output.push_str(&format!(
            "Average:            {}\n",
            money(Money::from_f64(average))
        ));
    }

    let month_or_dash = |m: Option<u32>| m.map(format_month).unwrap_or_else(|| "-".into());
    output.push_str(&format!(
        "Busiest month:      {}\n",
        month_or_dash(summary.busiest_month)
    ));
    output.push_str(&format!(
        "Busiest debit month: {}\n",
        month_or_dash(summary.busiest_debit_month)
    ));

    output.push_str("\nTypes by count\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    for entry in &summary.types_by_count {
        output.push_str(&format!("  {:<40} {:>8}\n", entry.kind.as_str(), entry.count));
    }

    if !summary.top_merchants.is_empty() {
        output.push_str("\nTop merchants\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for merchant in &summary.top_merchants {
            let name = if merchant.merchant.is_empty() {
                "(no merchant)"
            } else {
                merchant.merchant.as_str()
            };
            output.push_str(&format!(
                "  {:<34} {:>14} {:>8}\n",
                name,
                money(merchant.total),
                merchant.transaction_count
            ));
        }
    }

    output
}
