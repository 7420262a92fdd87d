//! Carrier scoring: min-ratio normalization and a weighted blend.
//!
//! For each carrier:
//!
//! - `price_score = (min_price / price) * 100`
//! - `time_score  = (min_lead_time / lead_time_days) * 100`
//! - `final_score = price_score * w + time_score * (1 - w)`
//!
//! Scores are left unrounded; rounding is a presentation concern.

use std::cmp::Ordering;

use crate::domain::{PriceWeight, ResolvedQuote, ScoredQuote};

/// Scored carriers, best first.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    quotes: Vec<ScoredQuote>,
    weight: PriceWeight,
    min_price: f64,
    min_lead_time: f64,
}

impl Ranking {
    /// The carrier with the highest `final_score`.
    pub fn champion(&self) -> &ScoredQuote {
        // Non-empty by construction (see `score`).
        &self.quotes[0]
    }

    pub fn quotes(&self) -> &[ScoredQuote] {
        &self.quotes
    }

    pub fn weight(&self) -> PriceWeight {
        self.weight
    }

    pub fn min_price(&self) -> f64 {
        self.min_price
    }

    pub fn min_lead_time(&self) -> f64 {
        self.min_lead_time
    }

    pub fn mean_price(&self) -> f64 {
        mean(self.quotes.iter().map(|q| q.quote.price))
    }

    pub fn mean_lead_time(&self) -> f64 {
        mean(self.quotes.iter().map(|q| q.quote.lead_time_days))
    }
}

/// Score and rank `quotes` under `weight`.
///
/// Returns `None` when there is nothing to rank. Ties on `final_score` keep
/// their input order.
pub fn score(quotes: &[ResolvedQuote], weight: PriceWeight) -> Option<Ranking> {
    if quotes.is_empty() {
        return None;
    }

    let min_price = guard_zero(quotes.iter().map(|q| q.price).fold(f64::INFINITY, f64::min));
    let min_lead_time = guard_zero(
        quotes
            .iter()
            .map(|q| q.lead_time_days)
            .fold(f64::INFINITY, f64::min),
    );

    let w = weight.value();
    let mut scored: Vec<ScoredQuote> = quotes
        .iter()
        .map(|q| {
            let price_score = (min_price / q.price) * 100.0;
            let time_score = (min_lead_time / q.lead_time_days) * 100.0;
            ScoredQuote {
                quote: q.clone(),
                price_score,
                time_score,
                final_score: price_score * w + time_score * weight.complement(),
            }
        })
        .collect();

    // `sort_by` is stable.
    scored.sort_by(|a, b| b.final_score.partial_cmp(&a.final_score).unwrap_or(Ordering::Equal));

    Some(Ranking {
        quotes: scored,
        weight,
        min_price,
        min_lead_time,
    })
}

/// A zero market minimum would divide by zero; upstream filtering should make this unreachable.
fn guard_zero(min: f64) -> f64 {
    if min == 0.0 { 1.0 } else { min }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}
