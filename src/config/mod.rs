//! Settings file (`freight.toml`) and the merge into a `RunConfig`.
//!
//! Precedence: CLI flag (or its environment variable) > settings file > built-in default.
//!
//! ```toml
//! [source]
//! primary = "dados.xlsx"
//! fallback = "COTAÇÃO DE FRETE.xlsx"
//! values_sheet = "DADOS 1"
//! lead_time_sheet = "DADOS 3"
//! carrier_column = "TRANSPORTADORA"
//! price_column = "VALOR"
//! min_price = 0.0
//!
//! [payment]
//! strategy = "lookup"
//! default = "to be arranged"
//!
//! [payment.terms]
//! "Rapido Sul" = "30 days"
//!
//! [display]
//! weight_percent = 50
//! currency_symbol = "R$"
//! palette = "classic"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::SourceArgs;
use crate::domain::{Palette, PaymentStrategy, PriceWeight, RunConfig};
use crate::error::AppError;

pub const DEFAULT_SETTINGS_FILE: &str = "freight.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub source: SourceSettings,
    pub payment: PaymentSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSettings {
    pub primary: Option<PathBuf>,
    pub fallback: Option<PathBuf>,
    pub values_sheet: Option<String>,
    pub lead_time_sheet: Option<String>,
    pub carrier_column: Option<String>,
    pub price_column: Option<String>,
    pub min_price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaymentSettings {
    pub strategy: Option<PaymentStrategy>,
    pub tokens: Option<Vec<String>>,
    /// Placeholder when no payment column exists (auto strategy).
    pub missing: Option<String>,
    /// Placeholder for carriers absent from `terms` (lookup strategy).
    pub default: Option<String>,
    pub terms: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySettings {
    pub weight_percent: Option<u8>,
    pub currency_symbol: Option<String>,
    pub palette: Option<Palette>,
}

/// Load settings.
///
/// An explicit path must exist. Without one, `freight.toml` in the working
/// directory is used when present, otherwise defaults apply.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, AppError> {
    match explicit {
        Some(path) => read_settings(path),
        None => {
            let path = Path::new(DEFAULT_SETTINGS_FILE);
            if path.is_file() {
                read_settings(path)
            } else {
                Ok(Settings::default())
            }
        }
    }
}

fn read_settings(path: &Path) -> Result<Settings, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to read settings '{}': {e}", path.display())))?;
    toml::from_str(&content)
        .map_err(|e| AppError::new(2, format!("Invalid settings '{}': {e}", path.display())))
}

/// Merge CLI arguments over settings over defaults.
pub fn run_config(args: &SourceArgs, settings: &Settings) -> Result<RunConfig, AppError> {
    let mut config = RunConfig::default();
    let src = &settings.source;

    if let Some(primary) = args.file.clone().or_else(|| src.primary.clone()) {
        config.source.primary_path = primary;
    }
    if let Some(fallback) = args.fallback.clone().or_else(|| src.fallback.clone()) {
        config.source.fallback_path = Some(fallback);
    }
    if args.no_fallback {
        config.source.fallback_path = None;
    }
    if let Some(sheet) = args.values_sheet.clone().or_else(|| src.values_sheet.clone()) {
        config.source.values_sheet = sheet;
    }
    if let Some(sheet) = args.lead_time_sheet.clone().or_else(|| src.lead_time_sheet.clone()) {
        config.source.lead_time_sheet = sheet;
    }
    if let Some(col) = args.carrier_column.clone().or_else(|| src.carrier_column.clone()) {
        config.source.carrier_column = col;
    }
    if let Some(col) = args.price_column.clone().or_else(|| src.price_column.clone()) {
        config.source.price_column = col;
    }
    if let Some(min_price) = args.min_price.or(src.min_price) {
        if !min_price.is_finite() || min_price < 0.0 {
            return Err(AppError::new(2, format!("Invalid min price {min_price}: must be finite and >= 0.")));
        }
        config.source.min_price = min_price;
    }

    let pay = &settings.payment;
    if let Some(strategy) = args.payment.or(pay.strategy) {
        config.payment.strategy = strategy;
    }
    if let Some(tokens) = &pay.tokens {
        config.payment.tokens = tokens.clone();
    }
    if let Some(missing) = &pay.missing {
        config.payment.missing = missing.clone();
    }
    if let Some(default) = &pay.default {
        config.payment.lookup_default = default.clone();
    }
    config.payment.lookup = pay.terms.clone();

    let display = &settings.display;
    if let Some(percent) = args.weight.or(display.weight_percent) {
        config.weight = PriceWeight::from_percent(check_weight_percent(percent)?);
    }
    if let Some(symbol) = &display.currency_symbol {
        config.currency_symbol = symbol.clone();
    }
    if let Some(palette) = args.palette.or(display.palette) {
        config.palette = palette;
    }

    Ok(config)
}

/// Slider values are 0..=100 in steps of 10.
pub fn check_weight_percent(percent: u8) -> Result<u8, AppError> {
    if percent > 100 || percent % PriceWeight::STEP_PERCENT != 0 {
        return Err(AppError::new(
            2,
            format!(
                "Invalid price weight {percent}%: expected 0-100 in steps of {}.",
                PriceWeight::STEP_PERCENT
            ),
        ));
    }
    Ok(percent)
}

/// clap value parser for `--weight`.
pub fn parse_weight_percent(s: &str) -> Result<u8, String> {
    let percent: u8 = s
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| format!("'{s}' is not a whole percentage"))?;
    check_weight_percent(percent).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args() -> SourceArgs {
        SourceArgs::default()
    }

    #[test]
    fn defaults_without_args_or_settings() {
        let config = run_config(&args(), &Settings::default()).unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.source.primary_path, PathBuf::from("dados.xlsx"));
        assert_eq!(config.weight.percent(), 50);
    }

    #[test]
    fn settings_file_fills_in_and_cli_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("freight.toml");
        fs::write(
            &path,
            r#"
[source]
primary = "cotacao.xlsx"
min_price = 10.0

[payment]
strategy = "lookup"
default = "a combinar"

[payment.terms]
"Rapido Sul" = "30 dias"

[display]
weight_percent = 70
palette = "dark"
"#,
        )
        .unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        let mut cli = args();
        cli.weight = Some(20);
        cli.payment = Some(PaymentStrategy::Auto);
        let config = run_config(&cli, &settings).unwrap();

        assert_eq!(config.source.primary_path, PathBuf::from("cotacao.xlsx"));
        assert_eq!(config.source.min_price, 10.0);
        assert_eq!(config.payment.strategy, PaymentStrategy::Auto);
        assert_eq!(config.payment.lookup_default, "a combinar");
        assert_eq!(config.payment.lookup.get("Rapido Sul").map(String::as_str), Some("30 dias"));
        assert_eq!(config.weight.percent(), 20);
        assert_eq!(config.palette, Palette::Dark);
    }

    #[test]
    fn explicit_settings_file_must_exist() {
        let dir = TempDir::new().unwrap();
        let err = load_settings(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("freight.toml");
        fs::write(&path, "[source]\nprimry = \"x.xlsx\"\n").unwrap();
        let err = load_settings(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Invalid settings"));
    }

    #[test]
    fn no_fallback_flag_clears_fallback() {
        let mut cli = args();
        cli.no_fallback = true;
        let config = run_config(&cli, &Settings::default()).unwrap();
        assert_eq!(config.source.fallback_path, None);
    }

    #[test]
    fn weight_must_follow_slider_steps() {
        assert_eq!(parse_weight_percent("70"), Ok(70));
        assert_eq!(parse_weight_percent("40%"), Ok(40));
        assert!(parse_weight_percent("55").is_err());
        assert!(parse_weight_percent("110").is_err());
        assert!(parse_weight_percent("abc").is_err());

        let settings = Settings {
            display: DisplaySettings {
                weight_percent: Some(45),
                ..DisplaySettings::default()
            },
            ..Settings::default()
        };
        assert!(run_config(&args(), &settings).is_err());
    }

    #[test]
    fn negative_min_price_is_rejected() {
        let mut cli = args();
        cli.min_price = Some(-1.0);
        assert!(run_config(&cli, &Settings::default()).is_err());
    }
}
