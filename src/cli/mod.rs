//! Command-line parsing for the freight-quote scorer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the loading/scoring code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::parse_weight_percent;
use crate::domain::{Palette, PaymentStrategy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "freight", version, about = "Freight quote carrier efficiency scorer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score carriers and print summary, ranking table, bar charts and narrative.
    Rank(RankArgs),
    /// Launch the interactive dashboard.
    ///
    /// This uses the same scoring pipeline as `freight rank`, but renders results
    /// in a terminal UI using Ratatui; the price weight is adjustable live.
    Tui(TuiArgs),
}

/// Options shared by every subcommand: source, scoring and logging.
///
/// Unset options fall back to the settings file, then to built-in defaults.
#[derive(Debug, Args, Clone, Default)]
pub struct SourceArgs {
    /// Primary workbook (default: dados.xlsx).
    #[arg(short = 'f', long, env = "FREIGHT_SOURCE", value_name = "XLSX")]
    pub file: Option<PathBuf>,

    /// Workbook tried when the primary is missing (default: "COTAÇÃO DE FRETE.xlsx").
    #[arg(long, value_name = "XLSX")]
    pub fallback: Option<PathBuf>,

    /// Do not try a fallback workbook.
    #[arg(long, conflicts_with = "fallback")]
    pub no_fallback: bool,

    /// Price importance in percent (0-100, steps of 10; default 50).
    #[arg(short = 'w', long, value_parser = parse_weight_percent, value_name = "PERCENT")]
    pub weight: Option<u8>,

    /// Keep only quotes priced strictly above this value (default 0).
    #[arg(long, value_name = "AMOUNT")]
    pub min_price: Option<f64>,

    /// How payment terms are found.
    #[arg(long, value_enum)]
    pub payment: Option<PaymentStrategy>,

    /// Sheet holding carrier, price and payment columns (default: "DADOS 1").
    #[arg(long, value_name = "SHEET")]
    pub values_sheet: Option<String>,

    /// Sheet holding carrier and lead time, headerless (default: "DADOS 3").
    #[arg(long, value_name = "SHEET")]
    pub lead_time_sheet: Option<String>,

    /// Carrier column header in the values sheet (default: TRANSPORTADORA).
    #[arg(long, value_name = "HEADER")]
    pub carrier_column: Option<String>,

    /// Price column header in the values sheet (default: VALOR).
    #[arg(long, value_name = "HEADER")]
    pub price_column: Option<String>,

    /// Settings file (default: ./freight.toml when present).
    #[arg(long, env = "FREIGHT_CONFIG", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Chart and table colors.
    #[arg(long, value_enum)]
    pub palette: Option<Palette>,

    /// Log filter, e.g. `debug` or `freight_score=trace`.
    #[arg(long = "log", env = "FREIGHT_LOG", value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Raise the default log level to debug.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[derive(Debug, Args, Clone)]
pub struct RankArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the dashboard as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Disable the terminal bar charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Bar chart width (columns).
    #[arg(long, default_value_t = 40)]
    pub width: usize,

    /// Export ranked rows to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the full dashboard to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Log file for the dashboard session.
    #[arg(long, default_value = crate::telemetry::DEFAULT_TUI_LOG_FILE, value_name = "PATH")]
    pub log_file: PathBuf,
}
