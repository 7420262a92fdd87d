//! Horizontal ASCII bar charts for terminal output.
//!
//! Deterministic, fixed-width rendering (helpful for golden tests).
//!
//! Bar elements:
//! - champion: `█`
//! - other carriers: `░`
//! - average marker: `|` (drawn only where no bar covers it)

use crate::domain::fmt_money;
use crate::report::{Dashboard, DashboardRow, fmt_days, truncate};

pub const CHAMPION_GLYPH: char = '█';
pub const OTHER_GLYPH: char = '░';
pub const AVERAGE_GLYPH: char = '|';

const LABEL_WIDTH: usize = 18;

/// Render the cost chart followed by the lead-time chart.
pub fn render_bar_charts(dashboard: &Dashboard, currency_symbol: &str, width: usize) -> String {
    let mut out = String::new();
    out.push_str(&render_bar_chart(
        "Cost per carrier",
        &dashboard.rows,
        |r| r.price,
        |v| fmt_money(v, currency_symbol),
        width,
    ));
    out.push('\n');
    out.push_str(&render_bar_chart(
        "Lead time per carrier",
        &dashboard.rows,
        |r| r.lead_time_days,
        fmt_days,
        width,
    ));
    out
}

fn render_bar_chart(
    title: &str,
    rows: &[DashboardRow],
    value: impl Fn(&DashboardRow) -> f64,
    label: impl Fn(f64) -> String,
    width: usize,
) -> String {
    let width = width.max(10);
    let max = rows.iter().map(&value).fold(0.0_f64, f64::max);
    let mean = if rows.is_empty() {
        0.0
    } else {
        rows.iter().map(&value).sum::<f64>() / rows.len() as f64
    };
    let mean_col = scale(mean, max, width);

    let mut out = String::new();
    out.push_str(&format!("{title} (avg {}, {AVERAGE_GLYPH} marks avg)\n", label(mean)));

    for row in rows {
        let v = value(row);
        let filled = scale(v, max, width);
        let glyph = if row.is_champion { CHAMPION_GLYPH } else { OTHER_GLYPH };

        let mut bar: Vec<char> = vec![' '; width];
        for cell in bar.iter_mut().take(filled) {
            *cell = glyph;
        }
        if mean_col > 0 && mean_col <= width && bar[mean_col - 1] == ' ' {
            bar[mean_col - 1] = AVERAGE_GLYPH;
        }
        let bar: String = bar.into_iter().collect();

        out.push_str(
            format!(
                "{:<width$} {} {}\n",
                truncate(&row.carrier_name, LABEL_WIDTH),
                bar,
                label(v),
                width = LABEL_WIDTH,
            )
            .as_str(),
        );
    }

    out
}

/// Number of columns for `v` on a `0..=max` scale. Positive values get at least one column.
fn scale(v: f64, max: f64, width: usize) -> usize {
    if !(v.is_finite() && max.is_finite()) || max <= 0.0 || v <= 0.0 {
        return 0;
    }
    let cols = ((v / max) * width as f64).round() as usize;
    cols.clamp(1, width)
}
