//! Ratatui-based terminal UI.
//!
//! The dashboard shows the champion and narrative, a price-weight slider, cost
//! and lead-time bar charts, and the ranked table. Moving the slider re-scores
//! the cached workbook; `r` reloads it from disk when it changed. The table
//! scrolls with the up and down arrows when it has more rows than fit.

use std::io;
use std::rc::Rc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState},
};
use tracing::{info, warn};

use crate::app::pipeline::{RunOutput, run_pipeline, run_with_book};
use crate::domain::{Palette, RunConfig, fmt_money};
use crate::error::AppError;
use crate::io::cache::QuoteCache;
use crate::report::{DashboardRow, fmt_days, truncate};

mod plotters_chart;

use plotters_chart::BarPlottersChart;

/// Start the TUI.
///
/// The first load happens before the terminal is taken over, so a missing or
/// unreadable source aborts with a plain error message.
pub fn run(config: RunConfig) -> Result<(), AppError> {
    let mut app = App::new(config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: RunConfig,
    cache: QuoteCache,
    /// Last good run; a failed reload leaves it in place.
    run: RunOutput,
    status: String,
    /// First table row shown.
    table_offset: usize,
}

impl App {
    fn new(config: RunConfig) -> Result<Self, AppError> {
        let mut cache = QuoteCache::new();
        let run = run_pipeline(&mut cache, &config)?;
        let status = format!("Loaded {}", run.book.source.display());
        Ok(Self::from_run(config, cache, run, status))
    }

    fn from_run(config: RunConfig, cache: QuoteCache, run: RunOutput, status: String) -> Self {
        Self {
            config,
            cache,
            run,
            status,
            table_offset: 0,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Left => self.step_weight(-1),
            KeyCode::Right => self.step_weight(1),
            KeyCode::Up => self.table_offset = self.table_offset.saturating_sub(1),
            KeyCode::Down => {
                let last = self.run.dashboard.rows.len().saturating_sub(1);
                self.table_offset = (self.table_offset + 1).min(last);
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('p') => {
                self.config.palette = self.config.palette.next();
                self.status = format!("palette: {}", self.config.palette.display_name());
            }
            _ => {}
        }

        Ok(false)
    }

    fn step_weight(&mut self, steps: i32) {
        let next = self.config.weight.stepped(steps);
        if next == self.config.weight {
            return;
        }
        self.config.weight = next;

        match run_with_book(Rc::clone(&self.run.book), &self.config) {
            Ok(run) => {
                self.run = run;
                self.status = next.to_string();
            }
            Err(err) => {
                warn!(error = %err, "re-scoring failed");
                self.status = err.to_string();
            }
        }
    }

    fn reload(&mut self) {
        let before = self.cache.loads();
        match run_pipeline(&mut self.cache, &self.config) {
            Ok(run) => {
                self.status = if self.cache.loads() > before {
                    format!("Reloaded {}", run.book.source.display())
                } else {
                    "Source unchanged.".to_string()
                };
                info!(source = %run.book.source.display(), "dashboard refreshed");
                self.run = run;
            }
            Err(err) => {
                warn!(error = %err, "reload failed; keeping previous dashboard");
                self.status = err.to_string();
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let table_height = table_height(self.run.dashboard.rows.len(), size.height);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(table_height),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_slider(frame, chunks[1]);
        self.draw_charts(frame, chunks[2]);
        self.draw_table(frame, chunks[3]);
        self.draw_footer(frame, chunks[4]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let narrative = &self.run.narrative;
        let (r, g, b) = self.config.palette.champion_bar();

        let lines = vec![
            Line::from(vec![
                Span::styled("freight", Style::default().fg(Color::Cyan)),
                Span::raw(" | carrier efficiency score | "),
                Span::styled(
                    self.run.book.source.display().to_string(),
                    Style::default().fg(Color::Gray),
                ),
            ]),
            Line::from(vec![
                Span::raw("Best choice: "),
                Span::styled(
                    narrative.champion.clone(),
                    Style::default().fg(Color::Rgb(r, g, b)).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" (efficiency {:.1})", narrative.final_score),
                    Style::default().fg(Color::Gray),
                ),
            ]),
            Line::from(Span::raw(narrative.rationale())),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_slider(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let weight = self.config.weight;
        let gauge = Gauge::default()
            .block(Block::default().title("Priority (←/→)").borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
            .percent(u16::from(weight.percent()))
            .label(weight.to_string());
        frame.render_widget(gauge, area);
    }

    fn draw_charts(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let names: Vec<String> = self.run.dashboard.rows.iter().map(|r| r.carrier_name.clone()).collect();
        let [cost, lead_time] = self.bar_series();
        self.draw_bar_chart(frame, chunks[0], &cost, &names);
        self.draw_bar_chart(frame, chunks[1], &lead_time, &names);
    }

    /// Cost and lead-time series, in ranking order.
    fn bar_series(&self) -> [BarSeries; 2] {
        let rows = &self.run.dashboard.rows;
        [
            BarSeries {
                title: "Cost",
                values: rows.iter().map(|r| r.price).collect(),
                average: self.run.ranking.mean_price(),
                y_label: "price",
                fmt_y: fmt_axis_money,
            },
            BarSeries {
                title: "Lead time",
                values: rows.iter().map(|r| r.lead_time_days).collect(),
                average: self.run.ranking.mean_lead_time(),
                y_label: "days",
                fmt_y: fmt_axis_days,
            },
        ]
    }

    fn draw_bar_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect, series: &BarSeries, names: &[String]) {
        let block = Block::default()
            .title(format!("{} (line = average)", series.title))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let palette = self.config.palette;
        let widget = BarPlottersChart {
            values: &series.values,
            labels: names,
            champion: self.run.dashboard.rows.iter().position(|r| r.is_champion),
            champion_color: palette.champion_bar(),
            other_color: palette.other_bar(),
            average: Some(series.average),
            y_label: series.y_label,
            fmt_y: series.fmt_y,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let header = Row::new(
            ["#", "carrier", "price", "lead time", "payment", "cost pts", "time pts", "score"]
                .into_iter()
                .map(|h| Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))),
        );

        let total = self.run.dashboard.rows.len();
        // borders (2) and the header row (1)
        let visible = usize::from(area.height.saturating_sub(3));
        let offset = self.table_offset.min(total.saturating_sub(visible));
        let rows = self
            .run
            .dashboard
            .rows
            .iter()
            .map(|row| table_row(row, self.config.palette, &self.config.currency_symbol));

        let widths = [
            Constraint::Length(3),
            Constraint::Min(16),
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Min(12),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(7),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().title(table_title(offset, visible, total)).borders(Borders::ALL));
        let mut state = TableState::default().with_offset(offset);
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ weight  ↑/↓ scroll  r reload  p palette  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// One bar chart's data and axis formatting.
struct BarSeries {
    title: &'static str,
    values: Vec<f64>,
    average: f64,
    y_label: &'static str,
    fmt_y: fn(f64) -> String,
}

/// Table rows plus borders and header, capped at a third of the screen.
fn table_height(rows: usize, screen_height: u16) -> u16 {
    let wanted = u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(3);
    wanted.min((screen_height / 3).max(6))
}

fn table_title(offset: usize, visible: usize, total: usize) -> String {
    if total <= visible {
        return "Ranking".to_string();
    }
    let last = (offset + visible).min(total);
    format!("Ranking (rows {}-{last} of {total}, ↑/↓ to scroll)", offset + 1)
}

fn table_row<'a>(row: &DashboardRow, palette: Palette, currency_symbol: &str) -> Row<'a> {
    let (r, g, b) = if row.is_champion {
        palette.champion_row()
    } else {
        palette.other_row()
    };
    let mut style = Style::default().bg(Color::Rgb(r, g, b));
    if row.is_champion {
        style = style.add_modifier(Modifier::BOLD);
    }

    Row::new(vec![
        Cell::from(row.rank.to_string()),
        Cell::from(truncate(&row.carrier_name, 24)),
        Cell::from(fmt_money(row.price, currency_symbol)),
        Cell::from(fmt_days(row.lead_time_days)),
        Cell::from(truncate(&row.payment_terms, 18)),
        Cell::from(format!("{:.1}", row.price_score)),
        Cell::from(format!("{:.1}", row.time_score)),
        Cell::from(format!("{:.1}", row.final_score)),
    ])
    .style(style)
}

fn fmt_axis_money(v: f64) -> String {
    if v >= 1000.0 {
        format!("{:.1}k", v / 1000.0)
    } else {
        format!("{v:.0}")
    }
}

fn fmt_axis_days(v: f64) -> String {
    format!("{v:.0}")
}
