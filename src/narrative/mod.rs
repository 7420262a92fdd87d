//! Plain-language explanation of the champion pick.

use std::fmt;

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

use crate::domain::{PriceWeight, fmt_money};
use crate::scoring::Ranking;

/// At or above this price weight the explanation is about cost.
pub const COST_FOCUS_MIN: f64 = 0.6;
/// At or below this price weight the explanation is about speed.
pub const SPEED_FOCUS_MAX: f64 = 0.4;

/// Which factor dominates the weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    Cost,
    Speed,
    Balanced,
}

impl Focus {
    pub fn for_weight(weight: PriceWeight) -> Self {
        let w = weight.value();
        if w >= COST_FOCUS_MIN {
            Focus::Cost
        } else if w <= SPEED_FOCUS_MAX {
            Focus::Speed
        } else {
            Focus::Balanced
        }
    }

    fn reason(self) -> &'static str {
        match self {
            Focus::Cost => "Reason: focus on cost reduction.",
            Focus::Speed => "Reason: focus on speed.",
            Focus::Balanced => "Reason: best cost-benefit (balanced priorities).",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Narrative {
    pub champion: String,
    pub final_score: f64,
    pub focus: Focus,
    /// Numeric comparison against the market average, when the champion beats it.
    pub detail: Option<String>,
}

impl Narrative {
    pub fn headline(&self) -> String {
        format!(
            "Decision analysis: {} is the recommendation (efficiency {:.1}).",
            self.champion, self.final_score
        )
    }

    pub fn rationale(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{} {detail}", self.focus.reason()),
            None => self.focus.reason().to_string(),
        }
    }
}

/// Exports carry the rendered sentences alongside the structured fields.
impl Serialize for Narrative {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Narrative", 6)?;
        state.serialize_field("champion", &self.champion)?;
        state.serialize_field("final_score", &self.final_score)?;
        state.serialize_field("focus", &self.focus)?;
        state.serialize_field("detail", &self.detail)?;
        state.serialize_field("headline", &self.headline())?;
        state.serialize_field("rationale", &self.rationale())?;
        state.end()
    }
}

impl fmt::Display for Narrative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.headline(), self.rationale())
    }
}

/// Explain why `ranking`'s champion won under its weight.
pub fn explain(ranking: &Ranking, currency_symbol: &str) -> Narrative {
    let champion = ranking.champion();
    let focus = Focus::for_weight(ranking.weight());

    let detail = match focus {
        Focus::Cost => {
            let savings = ranking.mean_price() - champion.quote.price;
            (savings > 0.0).then(|| format!("Saves {} vs the average quote.", fmt_money(savings, currency_symbol)))
        }
        Focus::Speed => {
            let faster = ranking.mean_lead_time() - champion.quote.lead_time_days;
            (faster > 0.0).then(|| {
                let days = faster.trunc() as i64;
                let unit = if days == 1 { "day" } else { "days" };
                format!("Delivers {days} {unit} faster than the average.")
            })
        }
        Focus::Balanced => None,
    };

    Narrative {
        champion: champion.quote.carrier_name.clone(),
        final_score: champion.final_score,
        focus,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResolvedQuote;
    use crate::scoring::score;

    fn quote(name: &str, price: f64, lead: f64) -> ResolvedQuote {
        ResolvedQuote {
            carrier_name: name.to_string(),
            price,
            lead_time_days: lead,
            payment_terms: "-".to_string(),
        }
    }

    fn market() -> Vec<ResolvedQuote> {
        vec![
            quote("Barato", 1000.0, 10.0),
            quote("Veloz", 4000.0, 2.0),
            quote("Meio", 2500.0, 6.5),
        ]
    }

    #[test]
    fn boundaries_hit_exactly_one_branch() {
        assert_eq!(Focus::for_weight(PriceWeight::from_percent(60)), Focus::Cost);
        assert_eq!(Focus::for_weight(PriceWeight::from_percent(40)), Focus::Speed);
        assert_eq!(Focus::for_weight(PriceWeight::from_percent(50)), Focus::Balanced);
        assert_eq!(Focus::for_weight(PriceWeight::from_percent(100)), Focus::Cost);
        assert_eq!(Focus::for_weight(PriceWeight::from_percent(0)), Focus::Speed);
    }

    #[test]
    fn cost_focus_reports_savings_vs_average() {
        let ranking = score(&market(), PriceWeight::from_percent(100)).unwrap();
        let n = explain(&ranking, "R$");

        assert_eq!(n.champion, "Barato");
        assert_eq!(n.focus, Focus::Cost);
        assert_eq!(n.detail.as_deref(), Some("Saves R$ 1,500.00 vs the average quote."));
        assert_eq!(
            n.headline(),
            "Decision analysis: Barato is the recommendation (efficiency 100.0)."
        );
    }

    #[test]
    fn speed_focus_reports_truncated_days() {
        let ranking = score(&market(), PriceWeight::from_percent(0)).unwrap();
        let n = explain(&ranking, "R$");

        assert_eq!(n.champion, "Veloz");
        assert_eq!(n.focus, Focus::Speed);
        // mean = 6.1667, champion = 2 -> 4.1667 days -> 4
        assert_eq!(n.detail.as_deref(), Some("Delivers 4 days faster than the average."));
    }

    #[test]
    fn balanced_focus_has_no_numbers() {
        let ranking = score(&market(), PriceWeight::from_percent(50)).unwrap();
        let n = explain(&ranking, "R$");
        assert_eq!(n.focus, Focus::Balanced);
        assert_eq!(n.detail, None);
        assert!(n.to_string().ends_with("best cost-benefit (balanced priorities)."));
    }

    #[test]
    fn no_detail_when_champion_is_not_better_than_average() {
        // Single carrier: champion equals the average.
        let ranking = score(&[quote("Solo", 100.0, 3.0)], PriceWeight::from_percent(80)).unwrap();
        let n = explain(&ranking, "R$");
        assert_eq!(n.focus, Focus::Cost);
        assert_eq!(n.detail, None);
        assert_eq!(n.rationale(), "Reason: focus on cost reduction.");
    }

    #[test]
    fn serialized_form_includes_rendered_text() {
        let ranking = score(&market(), PriceWeight::from_percent(100)).unwrap();
        let n = explain(&ranking, "R$");

        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["focus"], "cost");
        assert_eq!(json["headline"], n.headline());
        assert_eq!(
            json["rationale"],
            "Reason: focus on cost reduction. Saves R$ 1,500.00 vs the average quote."
        );
    }

    #[test]
    fn singular_day() {
        let quotes = vec![quote("A", 100.0, 3.0), quote("B", 100.0, 5.0)];
        let ranking = score(&quotes, PriceWeight::from_percent(20)).unwrap();
        let n = explain(&ranking, "R$");
        assert_eq!(n.detail.as_deref(), Some("Delivers 1 day faster than the average."));
    }
}
