//! Payment-terms resolution.
//!
//! Both strategies are total: every quote leaves with non-empty terms.

use tracing::debug;

use crate::domain::{PaymentConfig, PaymentStrategy, ResolvedQuote};
use crate::io::ingest::LoadedBook;

/// Attach payment terms to every joined quote, preserving order.
pub fn resolve_terms(book: &LoadedBook, config: &PaymentConfig) -> Vec<ResolvedQuote> {
    match config.strategy {
        PaymentStrategy::Auto => resolve_from_column(book, config),
        PaymentStrategy::Lookup => resolve_from_lookup(book, config),
    }
}

fn resolve_from_column(book: &LoadedBook, config: &PaymentConfig) -> Vec<ResolvedQuote> {
    let column = detect_payment_column(
        &book.values_columns,
        &[book.carrier_column, book.price_column],
        &config.tokens,
    );
    match column {
        Some(idx) => debug!(column = %book.values_columns[idx], "payment column detected"),
        None => debug!("no payment column detected; using placeholder terms"),
    }

    book.quotes
        .iter()
        .map(|q| {
            let terms = column
                .and_then(|idx| q.values_row.get(idx))
                .and_then(|cell| cell.as_text())
                .unwrap_or_else(|| non_empty_or(&config.missing, "-"));
            ResolvedQuote {
                carrier_name: q.carrier_name.clone(),
                price: q.price,
                lead_time_days: q.lead_time_days,
                payment_terms: terms,
            }
        })
        .collect()
}

fn resolve_from_lookup(book: &LoadedBook, config: &PaymentConfig) -> Vec<ResolvedQuote> {
    book.quotes
        .iter()
        .map(|q| {
            let terms = lookup_terms(config, &q.carrier_name)
                .unwrap_or_else(|| non_empty_or(&config.lookup_default, "to be arranged"));
            ResolvedQuote {
                carrier_name: q.carrier_name.clone(),
                price: q.price,
                lead_time_days: q.lead_time_days,
                payment_terms: terms,
            }
        })
        .collect()
}

/// Exact carrier-name match first, then case-insensitive. Blank entries count as absent.
fn lookup_terms(config: &PaymentConfig, carrier: &str) -> Option<String> {
    config
        .lookup
        .get(carrier)
        .or_else(|| {
            config
                .lookup
                .iter()
                .find(|(name, _)| name.trim().eq_ignore_ascii_case(carrier))
                .map(|(_, terms)| terms)
        })
        .map(|terms| terms.trim().to_string())
        .filter(|terms| !terms.is_empty())
}

/// First column (in header order) whose name contains one of `tokens`, ignoring case.
///
/// Columns listed in `skip` (carrier and price) are never candidates.
pub fn detect_payment_column(columns: &[String], skip: &[usize], tokens: &[String]) -> Option<usize> {
    let tokens: Vec<String> = tokens
        .iter()
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect();

    columns.iter().enumerate().find_map(|(idx, name)| {
        if skip.contains(&idx) {
            return None;
        }
        let upper = name.to_uppercase();
        tokens.iter().any(|t| upper.contains(t.as_str())).then_some(idx)
    })
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
