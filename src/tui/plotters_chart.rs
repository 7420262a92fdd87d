//! Plotters-powered bar chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `BarChart` widget?
//! - real value axis with tick labels
//! - an average line overlaid on the bars
//! - per-bar RGB colors from the active palette
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color as TermColor, Style},
    widgets::Widget,
};

use crate::report::truncate;

/// Narrower bar slots fall back to rank labels.
const MIN_NAME_CHARS: usize = 3;

/// A render-only bar chart description.
///
/// All values and colors are computed outside the render call.
pub struct BarPlottersChart<'a> {
    /// One value per carrier, in ranking order.
    pub values: &'a [f64],
    /// Carrier names, parallel to `values`.
    pub labels: &'a [String],
    /// Index into `values` drawn in `champion_color`.
    pub champion: Option<usize>,
    pub champion_color: (u8, u8, u8),
    pub other_color: (u8, u8, u8),
    /// Drawn as a horizontal line when set.
    pub average: Option<f64>,
    pub y_label: &'a str,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> BarPlottersChart<'a> {
    fn y_max(&self) -> f64 {
        let max = self
            .values
            .iter()
            .copied()
            .chain(self.average)
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        if max > 0.0 { max * 1.1 } else { 1.0 }
    }

    /// Characters available under each bar, leaving a gap between neighbours.
    fn label_chars(&self, width: u16) -> usize {
        if self.values.is_empty() {
            return 0;
        }
        // margin (1 + 1) and the left label area (8)
        let plot_width = usize::from(width).saturating_sub(10);
        (plot_width / self.values.len()).saturating_sub(1)
    }
}

impl<'a> Widget for BarPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(TermColor::Yellow),
            );
            return;
        }
        if self.values.is_empty() {
            return;
        }

        let n = self.values.len();
        let x0 = -0.5_f64;
        let x1 = n as f64 - 0.5;
        let y1 = self.y_max();
        let max_chars = self.label_chars(area.width);

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, 0.0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .y_desc(self.y_label)
                .x_labels(n)
                .y_labels(4)
                .x_label_formatter(&|v| bar_label(*v, self.labels, max_chars))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let (r, g, b) = self.champion_color;
            let champion_color = RGBColor(r, g, b);
            let (r, g, b) = self.other_color;
            let other_color = RGBColor(r, g, b);

            chart.draw_series(self.values.iter().enumerate().map(|(i, &v)| {
                let x = i as f64;
                let color = if Some(i) == self.champion { champion_color } else { other_color };
                Rectangle::new([(x - 0.35, 0.0), (x + 0.35, v.max(0.0))], color.filled())
            }))?;

            if let Some(avg) = self.average.filter(|v| v.is_finite()) {
                chart.draw_series(LineSeries::new([(x0, avg), (x1, avg)], &WHITE))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// X ticks sit on bar centers; label them with the carrier name, or the
/// 1-based rank when the name would not fit.
fn bar_label(v: f64, labels: &[String], max_chars: usize) -> String {
    let idx = v.round();
    if (v - idx).abs() > 1e-6 || idx < 0.0 || idx as usize >= labels.len() {
        return String::new();
    }
    let idx = idx as usize;
    if max_chars < MIN_NAME_CHARS {
        return format!("#{}", idx + 1);
    }
    truncate(&labels[idx], max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn chart<'a>(values: &'a [f64], labels: &'a [String], average: Option<f64>) -> BarPlottersChart<'a> {
        BarPlottersChart {
            values,
            labels,
            champion: Some(0),
            champion_color: (0, 200, 81),
            other_color: (31, 119, 180),
            average,
            y_label: "price",
            fmt_y: |v| format!("{v:.0}"),
        }
    }

    #[test]
    fn bars_are_labelled_with_carrier_names() {
        let labels = names(&["Rapido Sul", "Expresso Norte", "Translog"]);
        assert_eq!(bar_label(0.0, &labels, 12), "Rapido Sul");
        assert_eq!(bar_label(1.0, &labels, 12), "Expresso No.");
        assert_eq!(bar_label(2.0, &labels, 12), "Translog");
    }

    #[test]
    fn labels_only_on_bar_centers() {
        let labels = names(&["A", "B", "C"]);
        assert_eq!(bar_label(0.5, &labels, 12), "");
        assert_eq!(bar_label(3.0, &labels, 12), "");
        assert_eq!(bar_label(-0.4, &labels, 12), "");
    }

    #[test]
    fn crowded_bars_fall_back_to_rank() {
        let labels = names(&["Rapido Sul", "Expresso Norte"]);
        assert_eq!(bar_label(0.0, &labels, 2), "#1");
        assert_eq!(bar_label(1.0, &labels, 0), "#2");
    }

    #[test]
    fn label_width_shrinks_with_bar_count() {
        let labels = names(&["A", "B"]);
        let two = [1.0, 2.0];
        // (50 - 10) / 2 - 1
        assert_eq!(chart(&two, &labels, None).label_chars(50), 19);
        let many = [1.0; 20];
        assert!(chart(&many, &labels, None).label_chars(50) < MIN_NAME_CHARS);
    }

    #[test]
    fn headroom_above_tallest_value() {
        let labels = names(&["A", "B"]);
        assert!((chart(&[100.0, 50.0], &labels, None).y_max() - 110.0).abs() < 1e-9);
        assert!((chart(&[100.0], &labels, Some(200.0)).y_max() - 220.0).abs() < 1e-9);
        assert_eq!(chart(&[0.0], &labels, None).y_max(), 1.0);
    }

    #[test]
    fn tiny_area_shows_hint() {
        let labels = names(&["A", "B"]);
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        chart(&[1.0, 2.0], &labels, None).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "C");
    }
}
