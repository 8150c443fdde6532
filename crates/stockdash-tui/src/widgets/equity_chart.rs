//! Equity chart: Braille line over a half-block area fill.
//!
//! Points are plotted by position, not by time, so gaps in the feed do not
//! stretch the line. The x-axis shows the time part of the first, middle,
//! and last labels.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph};

use stockdash_core::ChartPoint;
use stockdash_core::format::{fmt_currency, tick_label};

use crate::theme;

/// `(index, equity)` pairs, skipping non-finite values.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn line_data(points: &[ChartPoint]) -> Vec<(f64, f64)> {
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.equity.is_finite())
        .map(|(i, p)| (i as f64, p.equity))
        .collect()
}

/// Y bounds with 5% headroom on each side. A flat series gets a ±1 band so
/// the line sits mid-chart instead of on the border.
pub fn y_bounds(data: &[(f64, f64)]) -> [f64; 2] {
    let (min, max) = data
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
            (lo.min(y), hi.max(y))
        });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let span = max - min;
    if span < f64::EPSILON {
        return [min - 1.0, max + 1.0];
    }
    let pad = span * 0.05;
    [min - pad, max + pad]
}

/// Linearly interpolate `data` to roughly `target_density` points so the
/// bar-style fill has no gaps between columns.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn interpolate_fill(data: &[(f64, f64)], target_density: usize) -> Vec<(f64, f64)> {
    if data.len() < 2 || target_density == 0 {
        return data.to_vec();
    }
    let x_min = data.first().map_or(0.0, |&(x, _)| x);
    let x_max = data.last().map_or(1.0, |&(x, _)| x);
    let step = (x_max - x_min).max(1.0) / target_density as f64;

    let mut out = Vec::with_capacity(target_density + 1);
    let mut idx = 0;
    let mut x = x_min;
    while x <= x_max + step * 0.5 {
        while idx + 2 < data.len() && data[idx + 1].0 < x {
            idx += 1;
        }
        let (x0, y0) = data[idx];
        let (x1, y1) = data[idx + 1];
        let dx = x1 - x0;
        let y = if dx.abs() < f64::EPSILON {
            y0
        } else {
            y0 + (y1 - y0) * ((x - x0) / dx).clamp(0.0, 1.0)
        };
        out.push((x, y));
        x += step;
    }
    out
}

/// First, middle and last tick labels (fewer for short series).
pub fn x_labels(points: &[ChartPoint]) -> Vec<String> {
    match points.len() {
        0 => Vec::new(),
        1 => vec![tick_label(&points[0].label).to_owned()],
        n => {
            let mut picks = vec![0, n / 2, n - 1];
            picks.dedup();
            picks
                .into_iter()
                .map(|i| tick_label(&points[i].label).to_owned())
                .collect()
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, points: &[ChartPoint]) {
    let latest = points
        .last()
        .map_or_else(|| "—".to_owned(), |p| fmt_currency(p.equity));
    let title = Line::from(vec![
        Span::styled(" Equity ", theme::title_style()),
        Span::styled("── ", theme::key_hint()),
        Span::styled(latest, Style::default().fg(theme::ACCENT)),
        Span::styled(format!("  {} pts ", points.len()), theme::key_hint()),
    ]);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());

    let line = line_data(points);
    if line.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new("  No history yet.").style(theme::key_hint()),
            inner,
        );
        return;
    }

    let [y_min, y_max] = y_bounds(&line);
    let x_max = line.last().map_or(1.0, |&(x, _)| x.max(1.0));
    let density = (usize::from(area.width.saturating_sub(12)) * 3).max(120);
    let fill = interpolate_fill(&line, density);

    let fill_set = Dataset::default()
        .marker(Marker::HalfBlock)
        .graph_type(GraphType::Bar)
        .style(Style::default().fg(theme::EQUITY_FILL))
        .data(&fill);
    let line_set = Dataset::default()
        .name("Equity")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme::ACCENT))
        .data(&line);

    let axis_style = Style::default().fg(theme::MUTED);
    let y_labels = [y_min, (y_min + y_max) / 2.0, y_max]
        .into_iter()
        .map(|v| Span::styled(fmt_currency(v), axis_style))
        .collect::<Vec<_>>();
    let x_labels = x_labels(points)
        .into_iter()
        .map(|l| Span::styled(l, axis_style))
        .collect::<Vec<_>>();

    let chart = Chart::new(vec![fill_set, line_set])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(x_labels)
                .style(axis_style),
        )
        .y_axis(
            Axis::default()
                .bounds([y_min, y_max])
                .labels(y_labels)
                .style(axis_style),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    fn point(label: &str, equity: f64) -> ChartPoint {
        ChartPoint {
            timestamp: Some(Utc.with_ymd_and_hms(2024, 2, 3, 14, 5, 9).unwrap()),
            label: label.to_owned(),
            tick_label: tick_label(label).to_owned(),
            equity,
        }
    }

    #[test]
    fn line_data_skips_non_finite_values() {
        let points = [
            point("a", 1.0),
            point("b", f64::NAN),
            point("c", 3.0),
        ];
        assert_eq!(line_data(&points), vec![(0.0, 1.0), (2.0, 3.0)]);
    }

    #[test]
    fn flat_series_gets_a_band() {
        assert_eq!(y_bounds(&[(0.0, 5.0), (1.0, 5.0)]), [4.0, 6.0]);
        assert_eq!(y_bounds(&[]), [0.0, 1.0]);
    }

    #[test]
    fn bounds_pad_five_percent() {
        let [lo, hi] = y_bounds(&[(0.0, 100.0), (1.0, 200.0)]);
        assert!((lo - 95.0).abs() < 1e-9);
        assert!((hi - 205.0).abs() < 1e-9);
    }

    #[test]
    fn interpolation_hits_both_ends() {
        let data = [(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)];
        let fill = interpolate_fill(&data, 4);
        assert_eq!(fill.first(), Some(&(0.0, 0.0)));
        let &(x, y) = fill.last().unwrap();
        assert!((x - 2.0).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
        let mid = fill.iter().find(|(x, _)| (x - 1.0).abs() < 1e-9).unwrap();
        assert!((mid.1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn interpolation_leaves_short_series_alone() {
        assert_eq!(interpolate_fill(&[(0.0, 3.0)], 50), vec![(0.0, 3.0)]);
    }

    #[test]
    fn x_labels_use_time_part() {
        let points = [
            point("01/02/2024, 09:00:00", 1.0),
            point("01/02/2024, 12:00:00", 2.0),
            point("01/02/2024, 15:30:00", 3.0),
        ];
        assert_eq!(x_labels(&points), ["09:00:00", "12:00:00", "15:30:00"]);
        assert_eq!(x_labels(&points[..2]), ["09:00:00", "12:00:00"]);
        assert!(x_labels(&[]).is_empty());
    }
}
