//! Formatted terminal output: run summary, ranking table, narrative.
//!
//! We keep formatting code in one place so:
//! - the scoring code stays clean and testable
//! - output changes are localized

use crate::domain::{RunConfig, fmt_money};
use crate::io::ingest::LoadedBook;
use crate::report::{Dashboard, DashboardRow};

/// Format the run summary (source, sheets, weight split, load counts).
pub fn format_run_summary(book: &LoadedBook, dashboard: &Dashboard, config: &RunConfig) -> String {
    let mut out = String::new();

    out.push_str("=== freight - carrier efficiency score ===\n");
    out.push_str(&format!("Source: {}\n", book.source.display()));
    out.push_str(&format!(
        "Sheets: values='{}' | lead time='{}'\n",
        book.values_sheet, book.lead_time_sheet
    ));
    out.push_str(&format!(
        "Priority: cost importance {}% / lead-time importance {}%\n",
        dashboard.price_weight.percent(),
        100 - dashboard.price_weight.percent(),
    ));

    let r = &book.report;
    out.push_str(&format!(
        "Rows: values {}/{} kept | lead times {}/{} kept | carriers scored {}\n",
        r.values_kept,
        r.values_rows,
        r.lead_times_kept,
        r.lead_time_rows,
        dashboard.rows.len(),
    ));
    if config.source.min_price > 0.0 {
        out.push_str(&format!(
            "Price filter: > {}\n",
            fmt_money(config.source.min_price, &config.currency_symbol)
        ));
    }
    if !r.unmatched.is_empty() {
        out.push_str(&format!("Unmatched (dropped): {}\n", r.unmatched.join(", ")));
    }
    if !r.duplicates.is_empty() {
        out.push_str(&format!("Duplicates (first kept): {}\n", r.duplicates.join(", ")));
    }

    out
}

/// Format the champion banner, ranking table and narrative.
pub fn format_ranking(dashboard: &Dashboard, currency_symbol: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("Best choice: {}\n\n", dashboard.champion));
    out.push_str(&format_table(&dashboard.rows, currency_symbol));
    out.push('\n');
    out.push_str(&dashboard.narrative.to_string());
    out.push('\n');

    out
}

fn format_table(rows: &[DashboardRow], currency_symbol: &str) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<3} {:<24} {:>16} {:>10} {:<18} {:>7}\n",
            "#", "carrier", "price", "lead time", "payment", "score"
        )
        .trim_end(),
    );
    out.push('\n');

    out.push_str(
        format!(
            "{:-<3} {:-<24} {:-<16} {:-<10} {:-<18} {:-<7}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for row in rows {
        let rank = if row.is_champion {
            format!("{}*", row.rank)
        } else {
            row.rank.to_string()
        };
        out.push_str(
            format!(
                "{:<3} {:<24} {:>16} {:>10} {:<18} {:>7.1}\n",
                rank,
                truncate(&row.carrier_name, 24),
                fmt_money(row.price, currency_symbol),
                fmt_days(row.lead_time_days),
                truncate(&row.payment_terms, 18),
                row.final_score,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Lead times are whole days in practice; fractional inputs are truncated for display.
pub fn fmt_days(days: f64) -> String {
    format!("{} days", days.trunc() as i64)
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
