//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - merges settings into a run configuration
//! - sets up logging
//! - runs the scoring pipeline
//! - prints reports/charts or starts the dashboard
//! - writes optional exports

use clap::Parser;
use tracing::debug;

use crate::cli::{Command, RankArgs, SourceArgs, TuiArgs};
use crate::config::{load_settings, run_config};
use crate::domain::RunConfig;
use crate::error::AppError;
use crate::io::cache::QuoteCache;
use crate::telemetry::{LogSettings, LogSink};

pub mod pipeline;

/// Entry point for the `freight` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // We want `freight` and `freight -w 70` to behave like `freight tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Rank(args) => handle_rank(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn resolve_config(args: &SourceArgs) -> Result<RunConfig, AppError> {
    let settings = load_settings(args.config.as_deref())?;
    let config = run_config(args, &settings)?;
    debug!(?config, "resolved run configuration");
    Ok(config)
}

fn handle_rank(args: RankArgs) -> Result<(), AppError> {
    crate::telemetry::init(&LogSettings::new(
        args.source.log_filter.clone(),
        args.source.verbose,
        false,
    ))?;
    let config = resolve_config(&args.source)?;

    let mut cache = QuoteCache::new();
    let run = pipeline::run_pipeline(&mut cache, &config)?;

    if args.json {
        let json = serde_json::to_string_pretty(&run.dashboard)
            .map_err(|e| AppError::new(2, format!("Failed to serialize dashboard: {e}")))?;
        println!("{json}");
    } else {
        println!(
            "{}",
            crate::report::format_run_summary(&run.book, &run.dashboard, &config)
        );
        if !args.no_plot {
            println!(
                "{}",
                crate::plot::render_bar_charts(&run.dashboard, &config.currency_symbol, args.width)
            );
        }
        print!(
            "{}",
            crate::report::format_ranking(&run.dashboard, &config.currency_symbol)
        );
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::export::write_ranking_csv(path, &run.dashboard)?;
    }
    if let Some(path) = &args.export_json {
        crate::io::export::write_dashboard_json(path, &run.book.source, &run.dashboard)?;
    }

    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    crate::telemetry::init(
        &LogSettings::new(args.source.log_filter.clone(), args.source.verbose, true)
            .with_sink(LogSink::File(args.log_file.clone())),
    )?;
    let config = resolve_config(&args.source)?;
    crate::tui::run(config)
}

/// Rewrite argv so `freight` defaults to `freight tui`.
///
/// Rules:
/// - `freight`                      -> `freight tui`
/// - `freight -w 70 ...`            -> `freight tui -w 70 ...`
/// - `freight --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "rank" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_binary_opens_dashboard() {
        assert_eq!(rewrite_args(argv(&["freight"])), argv(&["freight", "tui"]));
    }

    #[test]
    fn leading_flags_go_to_dashboard() {
        assert_eq!(
            rewrite_args(argv(&["freight", "-w", "70"])),
            argv(&["freight", "tui", "-w", "70"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            argv(&["freight", "rank", "-w", "70"]),
            argv(&["freight", "tui"]),
            argv(&["freight", "--help"]),
            argv(&["freight", "-V"]),
            argv(&["freight", "bogus"]),
        ] {
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }
}
