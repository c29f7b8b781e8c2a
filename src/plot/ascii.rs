//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed samples: `+`
//! - fitted values at the sample x-values: `o`, joined by a dotted `:` line
//! - parameter annotation in the top-left corner
//! - legend and axis labels below the grid

use crate::domain::{CurveFile, GaussianParams, Sample};
use crate::models::gaussian;
use crate::report::format_annotation;

pub const DATA_MARK: char = '+';
pub const FIT_MARK: char = 'o';
pub const FIT_LINE: char = ':';

const X_LABEL: &str = "Sample value";
const Y_LABEL: &str = "# samples";

/// Render samples and the fitted curve evaluated at the sample x-values.
pub fn render_ascii_plot(
    samples: &[Sample],
    params: &GaussianParams,
    width: usize,
    height: usize,
    title: &str,
) -> String {
    let data: Vec<(f64, f64)> = samples.iter().map(|s| (s.x, s.y)).collect();
    let mut fit: Vec<(f64, f64)> = samples.iter().map(|s| (s.x, gaussian(s.x, params))).collect();
    fit.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let plot = PlotData {
        data: &data,
        fit_marks: &fit,
        fit_line: &fit,
        annotation: format_annotation(params),
    };
    render_plot(&plot, width, height, title)
}

/// Render a saved curve file: grid line plus the stored samples.
pub fn render_curve_file(curve: &CurveFile, width: usize, height: usize) -> String {
    let data: Vec<(f64, f64)> = curve.samples.iter().map(|s| (s.x, s.y)).collect();
    let line: Vec<(f64, f64)> = curve
        .grid
        .x
        .iter()
        .zip(curve.grid.y.iter())
        .map(|(&x, &y)| (x, y))
        .collect();

    let plot = PlotData {
        data: &data,
        fit_marks: &[],
        fit_line: &line,
        annotation: format_annotation(&curve.params),
    };
    render_plot(&plot, width, height, &curve.source)
}

struct PlotData<'a> {
    data: &'a [(f64, f64)],
    fit_marks: &'a [(f64, f64)],
    fit_line: &'a [(f64, f64)],
    annotation: Vec<String>,
}

fn render_plot(plot: &PlotData<'_>, width: usize, height: usize, title: &str) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let all = || plot.data.iter().chain(plot.fit_marks).chain(plot.fit_line);
    let (x_min, x_max) = range(all().map(|p| p.0)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = range(all().map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let to_cell = |&(x, y): &(f64, f64)| (map_x(x, x_min, x_max, width), map_y(y, y_min, y_max, height));

    // Curve first so markers overlay it.
    let mut prev = None;
    for cell in plot.fit_line.iter().map(to_cell) {
        match prev {
            Some(p) => draw_line(&mut grid, p, cell, FIT_LINE),
            None => grid[cell.1][cell.0] = FIT_LINE,
        }
        prev = Some(cell);
    }
    for (x, y) in plot.fit_marks.iter().map(to_cell) {
        grid[y][x] = FIT_MARK;
    }
    for (x, y) in plot.data.iter().map(to_cell) {
        grid[y][x] = DATA_MARK;
    }

    // Annotation box in the top-left corner (like a text label on the axes).
    for (row, text) in plot.annotation.iter().enumerate() {
        let r = row + 1;
        if r >= height {
            break;
        }
        for (col, ch) in text.chars().enumerate() {
            let c = col + 1;
            if c >= width {
                break;
            }
            grid[r][c] = ch;
        }
    }

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&format!("{Y_LABEL}: [{y_min:.4}, {y_max:.4}]\n"));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out.push_str(&format!("{X_LABEL}: [{x_min}, {x_max}]\n"));
    out.push_str(&format!("legend: {DATA_MARK} data   {FIT_MARK}{FIT_LINE} fit\n"));
    out
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    if max > min {
        Some((min, max))
    } else {
        Some((min - 0.5, max + 0.5))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    let u = if u.is_nan() { 0.0 } else { u };
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    let u = if u.is_nan() { 0.0 } else { u };
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only fills empty cells.
fn draw_line(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize), ch: char) {
    let (mut x0, mut y0) = (from.0 as isize, from.1 as isize);
    let (x1, y1) = (to.0 as isize, to.1 as isize);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
