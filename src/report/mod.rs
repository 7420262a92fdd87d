//! Reporting: the dashboard output surface and formatted terminal output.

pub mod format;

pub use format::*;

use serde::Serialize;

use crate::domain::PriceWeight;
use crate::narrative::Narrative;
use crate::scoring::Ranking;

/// One ranked carrier as presented to charts, tables and exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardRow {
    pub rank: usize,
    pub carrier_name: String,
    pub price: f64,
    pub lead_time_days: f64,
    pub payment_terms: String,
    pub price_score: f64,
    pub time_score: f64,
    pub final_score: f64,
    /// Drives the highlight color.
    pub is_champion: bool,
}

/// Everything a front-end needs to render one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub price_weight: PriceWeight,
    pub champion: String,
    pub narrative: Narrative,
    pub rows: Vec<DashboardRow>,
}

impl Dashboard {
    pub fn build(ranking: &Ranking, narrative: &Narrative) -> Self {
        let rows = ranking
            .quotes()
            .iter()
            .enumerate()
            .map(|(idx, q)| DashboardRow {
                rank: idx + 1,
                carrier_name: q.quote.carrier_name.clone(),
                price: q.quote.price,
                lead_time_days: q.quote.lead_time_days,
                payment_terms: q.quote.payment_terms.clone(),
                price_score: q.price_score,
                time_score: q.time_score,
                final_score: q.final_score,
                is_champion: idx == 0,
            })
            .collect();

        Self {
            price_weight: ranking.weight(),
            champion: ranking.champion().quote.carrier_name.clone(),
            narrative: narrative.clone(),
            rows,
        }
    }
}
