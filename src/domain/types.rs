//! Shared domain types.
//!
//! A quote moves through the pipeline in three shapes, one per stage:
//!
//! - `JoinedQuote`: loader output (price + lead time joined by carrier name)
//! - `ResolvedQuote`: payment terms attached
//! - `ScoredQuote`: normalized scores and the blended ranking score
//!
//! Each stage builds a fresh value; nothing is mutated after handoff.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A single worksheet cell, reduced to what the loader needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Numeric coercion: numbers pass through, text is parsed after trimming.
    ///
    /// Anything that does not produce a finite number is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            Cell::Number(v) => *v,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Empty => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Trimmed text rendering; `None` for empty or blank cells.
    ///
    /// Integral numbers render without a fractional part (`30`, not `30.0`),
    /// which matters for carrier names and payment terms typed as numbers.
    pub fn as_text(&self) -> Option<String> {
        let s = match self {
            Cell::Empty => return None,
            Cell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{v:.0}"),
            Cell::Number(v) => v.to_string(),
            Cell::Text(s) => s.trim().to_string(),
        };
        (!s.is_empty()).then_some(s)
    }
}

/// One carrier after the values and lead-time tables were joined.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedQuote {
    pub carrier_name: String,
    pub price: f64,
    pub lead_time_days: f64,
    /// The carrier's full row from the values sheet (header order).
    pub values_row: Vec<Cell>,
}

/// A joined quote with its payment terms resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedQuote {
    pub carrier_name: String,
    pub price: f64,
    pub lead_time_days: f64,
    pub payment_terms: String,
}

/// A resolved quote annotated by the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredQuote {
    #[serde(flatten)]
    pub quote: ResolvedQuote,
    /// `(min_price / price) * 100`; exactly 100 for the cheapest carrier.
    pub price_score: f64,
    /// `(min_lead_time / lead_time_days) * 100`; exactly 100 for the fastest carrier.
    pub time_score: f64,
    /// Convex blend of the two scores under the run's price weight.
    pub final_score: f64,
}

/// Fraction of the blended score attributed to cost; the complement goes to lead time.
///
/// Always finite and within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PriceWeight(f64);

impl PriceWeight {
    /// Slider granularity, in percentage points.
    pub const STEP_PERCENT: u8 = 10;
    pub const DEFAULT_PERCENT: u8 = 50;

    /// Build from a slider percentage; values above 100 clamp to 100.
    pub fn from_percent(percent: u8) -> Self {
        Self(f64::from(percent.min(100)) / 100.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Weight given to lead time: `1 - price_weight`.
    pub fn complement(self) -> f64 {
        1.0 - self.0
    }

    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }

    /// Move the slider by `steps` increments of `STEP_PERCENT`, clamped to 0..=100.
    pub fn stepped(self, steps: i32) -> Self {
        let next = i32::from(self.percent()) + steps * i32::from(Self::STEP_PERCENT);
        Self::from_percent(next.clamp(0, 100) as u8)
    }
}

impl Default for PriceWeight {
    fn default() -> Self {
        Self::from_percent(Self::DEFAULT_PERCENT)
    }
}

impl fmt::Display for PriceWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cost {}% / lead time {}%", self.percent(), 100 - self.percent())
    }
}

/// How each carrier's payment terms are determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStrategy {
    /// Detect a payment/condition column in the values sheet by name.
    #[default]
    Auto,
    /// Use the configured carrier -> terms table.
    Lookup,
}

/// Color scheme for chart bars and table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    /// Green champion, blue field.
    #[default]
    Classic,
    /// Amber champion, gray field.
    Dark,
}

impl Palette {
    pub fn champion_bar(self) -> (u8, u8, u8) {
        match self {
            Palette::Classic => (0x00, 0xC8, 0x51),
            Palette::Dark => (0xFF, 0xBB, 0x33),
        }
    }

    pub fn other_bar(self) -> (u8, u8, u8) {
        match self {
            Palette::Classic => (0x1F, 0x77, 0xB4),
            Palette::Dark => (0x88, 0x88, 0x88),
        }
    }

    pub fn champion_row(self) -> (u8, u8, u8) {
        (0x1C, 0x4D, 0x32)
    }

    pub fn other_row(self) -> (u8, u8, u8) {
        (0x2C, 0x2C, 0x2C)
    }

    pub fn next(self) -> Self {
        match self {
            Palette::Classic => Palette::Dark,
            Palette::Dark => Palette::Classic,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Palette::Classic => "classic",
            Palette::Dark => "dark",
        }
    }
}

/// Where the quotes come from and how the two sheets are read.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSpec {
    pub primary_path: PathBuf,
    pub fallback_path: Option<PathBuf>,
    pub values_sheet: String,
    pub lead_time_sheet: String,
    pub carrier_column: String,
    pub price_column: String,
    /// Rows with `price <= min_price` are dropped.
    pub min_price: f64,
}

impl Default for SourceSpec {
    fn default() -> Self {
        Self {
            primary_path: PathBuf::from(DEFAULT_PRIMARY_SOURCE),
            fallback_path: Some(PathBuf::from(DEFAULT_FALLBACK_SOURCE)),
            values_sheet: DEFAULT_VALUES_SHEET.to_string(),
            lead_time_sheet: DEFAULT_LEAD_TIME_SHEET.to_string(),
            carrier_column: DEFAULT_CARRIER_COLUMN.to_string(),
            price_column: DEFAULT_PRICE_COLUMN.to_string(),
            min_price: 0.0,
        }
    }
}

pub const DEFAULT_PRIMARY_SOURCE: &str = "dados.xlsx";
pub const DEFAULT_FALLBACK_SOURCE: &str = "COTAÇÃO DE FRETE.xlsx";
pub const DEFAULT_VALUES_SHEET: &str = "DADOS 1";
pub const DEFAULT_LEAD_TIME_SHEET: &str = "DADOS 3";
pub const DEFAULT_CARRIER_COLUMN: &str = "TRANSPORTADORA";
pub const DEFAULT_PRICE_COLUMN: &str = "VALOR";

/// Payment-terms resolution settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentConfig {
    pub strategy: PaymentStrategy,
    /// Case-insensitive substrings that identify a payment column.
    pub tokens: Vec<String>,
    /// Used by `Auto` when no column matches or a cell is blank.
    pub missing: String,
    /// Carrier name -> literal terms, used by `Lookup`.
    pub lookup: BTreeMap<String, String>,
    /// Used by `Lookup` for carriers absent from the table.
    pub lookup_default: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            strategy: PaymentStrategy::Auto,
            tokens: vec!["PAG".to_string(), "COND".to_string()],
            missing: "-".to_string(),
            lookup: BTreeMap::new(),
            lookup_default: "to be arranged".to_string(),
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, the optional settings file, and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub source: SourceSpec,
    pub payment: PaymentConfig,
    pub weight: PriceWeight,
    pub currency_symbol: String,
    pub palette: Palette,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            source: SourceSpec::default(),
            payment: PaymentConfig::default(),
            weight: PriceWeight::default(),
            currency_symbol: "R$".to_string(),
            palette: Palette::default(),
        }
    }
}
