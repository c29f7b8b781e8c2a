//! Ratatui-based terminal UI.
//!
//! Shows the samples and the fitted Gaussian in a full-screen chart with a
//! side panel holding the legend, fitted parameters, uncertainties and the
//! tail probability. `q` or `Esc` quits.

use std::io;
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
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::domain::{FitSummary, GaussianParams, Sample};
use crate::error::{AppError, EXIT_TERMINAL};
use crate::io::curve::build_grid;
use crate::models::gaussian;
use crate::report::{fmt_sig, format_annotation};

mod plotters_chart;

use plotters_chart::{CURVE_COLOR, DATA_COLOR, FIT_COLOR, FitPlottersChart};

/// Number of points on the dense curve drawn in the chart.
const CURVE_POINTS: usize = 400;

/// Everything the viewer displays.
#[derive(Debug, Clone)]
pub struct FitView {
    pub title: String,
    pub samples: Vec<Sample>,
    pub summary: FitSummary,
}

/// Start the TUI and block until the user quits.
pub fn run(view: FitView) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_TERMINAL, format!("Failed to initialize terminal: {e}")))?;

    let app = App::new(view);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(EXIT_TERMINAL, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                EXIT_TERMINAL,
                format!("Failed to enter alternate screen: {e}"),
            ));
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
    view: FitView,
    series: ChartSeries,
}

/// Precomputed chart data.
#[derive(Debug, Clone, PartialEq)]
struct ChartSeries {
    curve: Vec<(f64, f64)>,
    points: Vec<(f64, f64)>,
    fitted: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl App {
    fn new(view: FitView) -> Self {
        let series = chart_series(&view.samples, &view.summary.fit.params);
        Self { view, series }
    }

    fn event_loop<B: ratatui::backend::Backend>(&self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_TERMINAL, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_TERMINAL, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_TERMINAL, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                        break;
                    }
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(36)])
            .split(chunks[0]);

        self.draw_chart(frame, body[0]);
        self.draw_panel(frame, body[1]);
        self.draw_footer(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(self.view.title.as_str())
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let s = &self.series;
        let widget = FitPlottersChart {
            curve: &s.curve,
            points: &s.points,
            fitted: &s.fitted,
            x_bounds: s.x_bounds,
            y_bounds: s.y_bounds,
            x_label: "Sample value",
            y_label: "# samples",
        };
        frame.render_widget(widget, inner);
    }

    fn draw_panel(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let summary = &self.view.summary;
        let se = summary.fit.std_errors();
        let gray = Style::default().fg(Color::Gray);

        let mut lines: Vec<Line> = vec![
            Line::from(vec![
                Span::styled("+  ", Style::default().fg(to_color(DATA_COLOR))),
                Span::raw("data"),
            ]),
            Line::from(vec![
                Span::styled("•  ", Style::default().fg(to_color(FIT_COLOR))),
                Span::raw("fit"),
            ]),
            Line::from(vec![
                Span::styled("━━ ", Style::default().fg(to_color(CURVE_COLOR))),
                Span::raw("fitted curve"),
            ]),
            Line::raw(""),
        ];
        lines.extend(format_annotation(&summary.fit.params).into_iter().map(Line::raw));
        lines.push(Line::raw(""));
        lines.push(Line::styled(format!("±x0    {}", fmt_sig(se[0], 3)), gray));
        lines.push(Line::styled(format!("±a     {}", fmt_sig(se[1], 3)), gray));
        lines.push(Line::styled(format!("±sigma {}", fmt_sig(se[2], 3)), gray));
        lines.push(Line::raw(""));
        lines.push(Line::raw(format!(
            "erfc({}) = {}",
            summary.x_max,
            fmt_sig(summary.tail_probability, 4)
        )));
        lines.push(Line::styled(
            format!("n={} iter={}", summary.fit.n, summary.fit.iterations),
            gray,
        ));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().title("Fit").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let p = Paragraph::new(Line::from(vec![
            Span::styled("q", Style::default().fg(Color::Cyan)),
            Span::raw("/"),
            Span::styled("Esc", Style::default().fg(Color::Cyan)),
            Span::raw(": quit"),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn chart_series(samples: &[Sample], params: &GaussianParams) -> ChartSeries {
    let mut points: Vec<(f64, f64)> = samples.iter().map(|s| (s.x, s.y)).collect();
    points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    let fitted: Vec<(f64, f64)> = points.iter().map(|&(x, _)| (x, gaussian(x, params))).collect();

    let x_min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let x_max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let grid = build_grid(params, x_min, x_max, CURVE_POINTS);
    let curve: Vec<(f64, f64)> = grid.x.into_iter().zip(grid.y).collect();

    let x_bounds = [
        grid_bound(curve.first().map(|p| p.0), 0.0),
        grid_bound(curve.last().map(|p| p.0), 1.0),
    ];

    let ys = points.iter().chain(&fitted).chain(&curve).map(|p| p.1).filter(|v| v.is_finite());
    let (mut y_lo, mut y_hi) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !(y_lo.is_finite() && y_hi.is_finite()) || y_hi <= y_lo {
        y_lo = 0.0;
        y_hi = 1.0;
    }
    let pad = (y_hi - y_lo) * 0.05;

    ChartSeries {
        curve,
        points,
        fitted,
        x_bounds,
        y_bounds: [y_lo - pad, y_hi + pad],
    }
}

fn grid_bound(v: Option<f64>, fallback: f64) -> f64 {
    v.filter(|v| v.is_finite()).unwrap_or(fallback)
}

fn to_color(c: plotters::style::RGBColor) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}
