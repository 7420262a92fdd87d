//! Export ranked results to CSV and the full dashboard to JSON.
//!
//! Both files are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use chrono::Local;
use serde::Serialize;

use crate::error::AppError;
use crate::report::Dashboard;

/// JSON envelope written by `--export-json`.
#[derive(Debug, Serialize)]
struct DashboardFile<'a> {
    tool: &'static str,
    generated_at: String,
    source: String,
    #[serde(flatten)]
    dashboard: &'a Dashboard,
}

/// Write one CSV row per ranked carrier, champion first.
pub fn write_ranking_csv(path: &Path, dashboard: &Dashboard) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for row in &dashboard.rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV '{}': {e}", path.display())))?;
    Ok(())
}

/// Write the dashboard (weight, champion, narrative, rows) as pretty JSON.
pub fn write_dashboard_json(path: &Path, source: &Path, dashboard: &Dashboard) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export JSON '{}': {e}", path.display())))?;

    let envelope = DashboardFile {
        tool: "freight",
        generated_at: Local::now().to_rfc3339(),
        source: source.display().to_string(),
        dashboard,
    };

    serde_json::to_writer_pretty(file, &envelope)
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;

    Ok(())
}
