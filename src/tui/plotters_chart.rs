//! Plotters-powered time-current chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.
//!
//! Log axes are handled by the caller: coordinates arrive already transformed
//! (`log10`) and the tick formatters map them back to physical values.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// High-contrast palette for terminal rendering; series cycle through it.
pub const SERIES_COLORS: [RGBColor; 6] = [
    RGBColor(0, 255, 255), // cyan
    RGBColor(255, 255, 0), // yellow
    RGBColor(0, 255, 0),   // green
    RGBColor(255, 0, 255), // magenta
    RGBColor(100, 149, 237),
    RGBColor(255, 165, 0),
];
const OPERATING_COLOR: RGBColor = RGBColor(255, 0, 0);

/// One curve, split into contiguous segments (undefined points split a curve).
pub struct ChartSeries {
    pub segments: Vec<Vec<(f64, f64)>>,
    pub color: RGBColor,
}

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call, which keeps
/// `render()` focused on drawing.
pub struct TccPlottersChart<'a> {
    pub series: &'a [ChartSeries],
    /// Highlighted operating point, if it has a defined time.
    pub operating_point: Option<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Axis labels (kept simple for terminal rendering).
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for TccPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for s in self.series {
                for segment in &s.segments {
                    chart.draw_series(LineSeries::new(segment.iter().copied(), &s.color))?;
                }
            }

            // A `Pixel` rather than a `Circle`: the backend scales circle radii
            // into canvas units and draws them far too large.
            if let Some(point) = self.operating_point {
                chart.draw_series(std::iter::once(Pixel::new(point, OPERATING_COLOR)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
