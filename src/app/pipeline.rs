//! Shared scoring pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load (cached) -> payment terms -> scoring -> narrative -> dashboard
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::rc::Rc;

use tracing::info;

use crate::domain::RunConfig;
use crate::error::{AppError, LoadError};
use crate::io::cache::QuoteCache;
use crate::io::ingest::LoadedBook;
use crate::narrative::{Narrative, explain};
use crate::report::Dashboard;
use crate::scoring::{Ranking, score};
use crate::terms::resolve_terms;

/// All computed outputs of a single scoring run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub book: Rc<LoadedBook>,
    pub ranking: Ranking,
    pub narrative: Narrative,
    pub dashboard: Dashboard,
}

/// Execute the full pipeline, loading the workbook through `cache`.
pub fn run_pipeline(cache: &mut QuoteCache, config: &RunConfig) -> Result<RunOutput, AppError> {
    let book = cache.get_or_load(&config.source)?;
    run_with_book(book, config)
}

/// Execute the pipeline on an already-loaded workbook.
///
/// This is what the TUI calls on every slider move.
pub fn run_with_book(book: Rc<LoadedBook>, config: &RunConfig) -> Result<RunOutput, AppError> {
    let resolved = resolve_terms(&book, &config.payment);

    let ranking = score(&resolved, config.weight).ok_or_else(|| LoadError::EmptyAfterFiltering {
        path: book.source.clone(),
        values_kept: book.report.values_kept,
        lead_times_kept: book.report.lead_times_kept,
    })?;

    let narrative = explain(&ranking, &config.currency_symbol);
    let dashboard = Dashboard::build(&ranking, &narrative);

    let champion = ranking.champion();
    info!(
        champion = %champion.quote.carrier_name,
        final_score = champion.final_score,
        price_weight = config.weight.value(),
        carriers = ranking.quotes().len(),
        "scored carriers"
    );

    Ok(RunOutput {
        book,
        ranking,
        narrative,
        dashboard,
    })
}
