//! Plotters-powered Gaussian fit chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Series colors, shared with the legend panel.
pub const DATA_COLOR: RGBColor = RGBColor(80, 160, 255);
pub const FIT_COLOR: RGBColor = RGBColor(255, 80, 80);
pub const CURVE_COLOR: RGBColor = RGBColor(255, 170, 170);

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call.
pub struct FitPlottersChart<'a> {
    /// Fitted curve on a dense grid.
    pub curve: &'a [(f64, f64)],
    /// Observed samples.
    pub points: &'a [(f64, f64)],
    /// Fitted values at the sample x-values.
    pub fitted: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl<'a> Widget for FitPlottersChart<'a> {
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
                .set_label_area_size(LabelAreaPosition::Left, 6)
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
                .x_label_formatter(&|v| format!("{v:.1}"))
                .y_label_formatter(&|v| crate::report::fmt_sig(*v, 3))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // Dense fitted curve and the data polyline, then markers on top.
            chart.draw_series(LineSeries::new(self.curve.iter().copied(), &CURVE_COLOR))?;
            chart.draw_series(LineSeries::new(self.points.iter().copied(), &DATA_COLOR))?;

            // `Circle` markers are mis-scaled by the backend; single pixels read
            // cleanly in a terminal.
            chart.draw_series(self.fitted.iter().map(|&(x, y)| Pixel::new((x, y), FIT_COLOR)))?;
            chart.draw_series(self.points.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
