//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing a curve, time-dial setting,
//! pickup current, overcurrent and overlay curves, then renders the
//! time-current chart on log-log axes with the operating point highlighted.

use std::io;
use std::path::PathBuf;
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
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::{CurveRun, run_curves};
use crate::curves::CurveCatalog;
use crate::domain::{GridKind, OperatingTime, PlotConfig, TDS_MAX, TDS_MIN, TDS_STEP};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::{ChartSeries, SERIES_COLORS, TccPlottersChart};

/// Current step (A) for the pickup and overcurrent fields.
const CURRENT_STEP: f64 = 0.5;
/// Smallest pickup current offered.
const PICKUP_MIN: f64 = 0.5;

const FIELD_CURVE: usize = 0;
const FIELD_TDS: usize = 1;
const FIELD_PICKUP: usize = 2;
const FIELD_OVERCURRENT: usize = 3;
const FIELD_OVERLAY: usize = 4;
const FIELD_COUNT: usize = 5;

/// Start the TUI.
pub fn run(config: PlotConfig, catalog: CurveCatalog) -> Result<(), AppError> {
    let mut app = App::new(config, catalog)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
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
    config: PlotConfig,
    catalog: CurveCatalog,
    /// Index of the primary curve in the catalog.
    curve_idx: usize,
    /// Catalog index under the overlay cursor.
    overlay_cursor: usize,
    selected_field: usize,
    editing_current: bool,
    current_input: String,
    status: String,
    run: Option<CurveRun>,
}

impl App {
    fn new(mut config: PlotConfig, catalog: CurveCatalog) -> Result<Self, AppError> {
        let name = catalog.resolve(&config.curve)?.name.clone();
        let curve_idx = catalog.index_of(&name).unwrap_or(0);
        config.curve = name;
        config.tds = config.tds.clamp(TDS_MIN, TDS_MAX);
        config.pickup_amps = config.pickup_amps.max(PICKUP_MIN);
        if config.overcurrent_amps.is_none() {
            config.overcurrent_amps = Some(config.pickup_amps * 5.0);
        }

        let mut app = Self {
            config,
            catalog,
            curve_idx,
            overlay_cursor: 0,
            selected_field: FIELD_CURVE,
            editing_current: false,
            current_input: String::new(),
            status: String::new(),
            run: None,
        };
        app.recompute()?;
        app.status = "Ready.".to_string();
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
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

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        if self.editing_current {
            return self.handle_current_edit(code);
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < FIELD_COUNT {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1)?,
            KeyCode::Right => self.adjust_field(1)?,
            KeyCode::Enter => {
                if self.selected_field == FIELD_OVERCURRENT {
                    self.editing_current = true;
                    self.current_input.clear();
                    self.status = "Editing overcurrent (A). Enter to apply, Esc to cancel.".to_string();
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('o') => {
                self.toggle_overlay(self.overlay_cursor)?;
            }
            KeyCode::Char('c') => {
                self.config.overlays.clear();
                self.recompute()?;
                self.status = "Overlays cleared.".to_string();
            }
            KeyCode::Char('g') => {
                self.config.grid.kind = match self.config.grid.kind {
                    GridKind::Log => GridKind::Linear,
                    GridKind::Linear => GridKind::Log,
                };
                self.config.grid.min = match self.config.grid.kind {
                    GridKind::Log => 1.05,
                    GridKind::Linear => 1.0,
                };
                self.recompute()?;
                self.status = format!("grid: {:?}", self.config.grid.kind);
            }
            KeyCode::Char('e') => {
                self.status = match self.export_json() {
                    Ok(path) => format!("Wrote {}", path.display()),
                    Err(err) => format!("Export failed: {err}"),
                };
            }
            _ => {}
        }

        Ok(false)
    }

    fn handle_current_edit(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Esc => {
                self.editing_current = false;
                self.status = "Overcurrent edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_current = false;
                self.apply_current_input()?;
            }
            KeyCode::Backspace => {
                self.current_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '.' {
                    self.current_input.push(c);
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn adjust_field(&mut self, delta: i32) -> Result<(), AppError> {
        let sign = if delta >= 0 { 1.0 } else { -1.0 };
        match self.selected_field {
            FIELD_CURVE => {
                let n = self.catalog.len();
                self.curve_idx = if delta >= 0 {
                    (self.curve_idx + 1) % n
                } else {
                    (self.curve_idx + n - 1) % n
                };
                let name = self.catalog.entries()[self.curve_idx].name.clone();
                self.config.overlays.retain(|o| o != &name);
                self.config.curve = name;
                self.recompute()?;
                self.status = format!("curve: {}", self.config.curve);
            }
            FIELD_TDS => {
                self.config.tds = (self.config.tds + sign * TDS_STEP).clamp(TDS_MIN, TDS_MAX);
                self.recompute()?;
                self.status = format!("TDS: {}", self.config.tds);
            }
            FIELD_PICKUP => {
                self.config.pickup_amps = (self.config.pickup_amps + sign * CURRENT_STEP).max(PICKUP_MIN);
                self.recompute()?;
                self.status = format!("pickup: {} A", self.config.pickup_amps);
            }
            FIELD_OVERCURRENT => {
                let current = self.config.overcurrent_amps.unwrap_or(self.config.pickup_amps);
                self.config.overcurrent_amps = Some((current + sign * CURRENT_STEP).max(0.0));
                self.recompute()?;
            }
            FIELD_OVERLAY => {
                let n = self.catalog.len();
                self.overlay_cursor = if delta >= 0 {
                    (self.overlay_cursor + 1) % n
                } else {
                    (self.overlay_cursor + n - 1) % n
                };
                let entry = &self.catalog.entries()[self.overlay_cursor];
                self.status = format!("overlay cursor: {} (space to toggle)", entry.name);
            }
            _ => {}
        }
        Ok(())
    }

    fn toggle_overlay(&mut self, idx: usize) -> Result<(), AppError> {
        if idx == self.curve_idx {
            self.status = "That is the primary curve.".to_string();
            return Ok(());
        }
        let name = self.catalog.entries()[idx].name.clone();
        if let Some(pos) = self.config.overlays.iter().position(|o| o == &name) {
            self.config.overlays.remove(pos);
            self.status = format!("overlay off: {name}");
        } else {
            self.config.overlays.push(name.clone());
            self.status = format!("overlay on: {name}");
        }
        self.recompute()
    }

    fn apply_current_input(&mut self) -> Result<(), AppError> {
        let trimmed = self.current_input.trim();
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => {
                self.config.overcurrent_amps = Some(v);
                self.recompute()
            }
            _ => {
                self.status = format!("Invalid current '{trimmed}'.");
                Ok(())
            }
        }
    }

    fn recompute(&mut self) -> Result<(), AppError> {
        let run = run_curves(&self.config, &self.catalog)?;
        if let Some(op) = &run.operating_point {
            // Keep the field in sync with what is actually plotted.
            self.config.overcurrent_amps = Some(op.current_amps);
            self.status = match op.time {
                OperatingTime::Time(t) if op.clamped => {
                    format!("Overcurrent below pickup; using pickup. t={t:.3}s")
                }
                OperatingTime::Time(t) => format!("I={:.2}A M={:.3} t={t:.3}s", op.current_amps, op.multiple),
                OperatingTime::Undefined if op.clamped => {
                    "Overcurrent must be at least the pickup current; set to pickup (time undefined).".to_string()
                }
                OperatingTime::Undefined => "At pickup: operating time undefined.".to_string(),
            };
        }
        self.run = Some(run);
        Ok(())
    }

    fn export_json(&self) -> Result<PathBuf, AppError> {
        let Some(run) = &self.run else {
            return Err(AppError::runtime("Nothing to export yet."));
        };
        let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = PathBuf::from(format!("tcc_curves_{ts}.json"));
        crate::io::curve::write_curve_json(&path, run)?;
        Ok(path)
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("tcc", Style::default().fg(Color::Cyan)),
            Span::raw(" - inverse-time overcurrent relay curves"),
        ]));

        let mut legend = Vec::new();
        if let Some(run) = &self.run {
            for (i, s) in run.series.iter().enumerate() {
                legend.push(Span::styled(
                    format!("■ {}  ", s.curve.short_label()),
                    Style::default().fg(series_color(i)),
                ));
            }
            if run.operating_point.is_some_and(|op| op.time.is_defined()) {
                legend.push(Span::styled("● operating point", Style::default().fg(Color::Red)));
            }
        }
        lines.push(Line::from(legend));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(38)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(format!("{} (TDS {})", self.config.curve, self.config.tds))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("No curves evaluated.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let Some(data) = chart_data(run) else {
            let msg = Paragraph::new("Nothing to plot in this range.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let widget = TccPlottersChart {
            series: &data.series,
            operating_point: data.operating_point,
            x_bounds: data.x_bounds,
            y_bounds: data.y_bounds,
            x_label: "multiple of pickup",
            y_label: "time (s)",
            fmt_x: fmt_log_tick,
            fmt_y: fmt_log_tick,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let overcurrent = if self.editing_current {
            format!("{}_", self.current_input)
        } else {
            self.config
                .overcurrent_amps
                .map(|v| format!("{v:.2} A"))
                .unwrap_or_else(|| "-".to_string())
        };
        let cursor = &self.catalog.entries()[self.overlay_cursor];
        let cursor_on = self.config.overlays.iter().any(|o| o == &cursor.name);

        let mut items = Vec::new();
        items.push(ListItem::new(format!("Curve: {}", self.config.curve)));
        items.push(ListItem::new(format!("TDS: {:.1}", self.config.tds)));
        items.push(ListItem::new(format!("Pickup: {:.2} A", self.config.pickup_amps)));
        items.push(ListItem::new(format!("Overcurrent: {overcurrent}")));
        items.push(ListItem::new(format!(
            "Overlay: [{}] {}",
            if cursor_on { "x" } else { " " },
            cursor.short_label()
        )));

        let mut info = vec![
            ListItem::new(""),
            ListItem::new(format!("Grid: {:?}", self.config.grid.kind)),
        ];
        if let Some(op) = self.run.as_ref().and_then(|r| r.operating_point) {
            info.push(ListItem::new(format!("Multiple: {:.3}", op.multiple)));
            info.push(ListItem::new(format!("Time: {:.3} s", op.time)));
        }
        items.extend(info);

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing_current {
            let hint = Paragraph::new("Editing overcurrent…")
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit current  space overlay  c clear  g grid  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Ratatui color matching the chart color of series `idx`.
fn series_color(idx: usize) -> Color {
    let plotters::style::RGBColor(r, g, b) = SERIES_COLORS[idx % SERIES_COLORS.len()];
    Color::Rgb(r, g, b)
}

/// Chart inputs in `log10` space.
struct ChartData {
    series: Vec<ChartSeries>,
    operating_point: Option<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Build log-log chart series; undefined or non-positive points split segments.
fn chart_data(run: &CurveRun) -> Option<ChartData> {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);

    let mut series = Vec::with_capacity(run.series.len());
    for (i, s) in run.series.iter().enumerate() {
        let mut segments = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();
        for p in &s.points {
            match p.time.seconds() {
                Some(t) if t > 0.0 && t.is_finite() && p.multiple > 0.0 => {
                    let (x, y) = (p.multiple.log10(), t.log10());
                    x_min = x_min.min(x);
                    x_max = x_max.max(x);
                    y_min = y_min.min(y);
                    y_max = y_max.max(y);
                    current.push((x, y));
                }
                _ => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        series.push(ChartSeries {
            segments,
            color: SERIES_COLORS[i % SERIES_COLORS.len()],
        });
    }

    if !(x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite()) || x_max <= x_min {
        return None;
    }
    if y_max <= y_min {
        y_min -= 0.5;
        y_max += 0.5;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

    let operating_point = run.operating_point.and_then(|op| {
        let t = op.time.seconds()?;
        (t > 0.0 && t.is_finite() && op.multiple > 0.0).then(|| (op.multiple.log10(), t.log10()))
    });

    Some(ChartData {
        series,
        operating_point,
        x_bounds: [x_min, x_max],
        y_bounds: [y_min - pad, y_max + pad],
    })
}

/// Tick label for a `log10` coordinate.
fn fmt_log_tick(v: f64) -> String {
    let value = 10f64.powf(v);
    if value >= 100.0 {
        format!("{value:.0}")
    } else if value >= 1.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurvePoint, GridSpec};

    #[test]
    fn chart_data_splits_segments_at_undefined_points() {
        let config = PlotConfig {
            curve: "C1".to_string(),
            grid: GridSpec {
                kind: GridKind::Linear,
                min: 0.5,
                max: 5.0,
                points: 0,
                step: 0.5,
            },
            ..PlotConfig::default()
        };
        let run = run_curves(&config, CurveCatalog::standard()).unwrap();
        let data = chart_data(&run).unwrap();

        // 0.5 (reset) | 1.0 undefined | 1.5..4.5 (trip)
        let segments = &data.series[0].segments;
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 1);
        assert_eq!(segments[1].len(), 7);
        assert!(data.operating_point.is_none());
    }

    #[test]
    fn chart_data_is_none_without_plottable_points() {
        let mut run = run_curves(&PlotConfig::default(), CurveCatalog::standard()).unwrap();
        run.series[0].points = vec![CurvePoint {
            multiple: 1.0,
            time: OperatingTime::Undefined,
        }];
        assert!(chart_data(&run).is_none());
    }

    #[test]
    fn non_finite_operating_time_gets_no_marker() {
        let config = PlotConfig {
            overcurrent_amps: Some(4.0),
            ..PlotConfig::default()
        };
        let mut run = run_curves(&config, CurveCatalog::standard()).unwrap();
        assert!(chart_data(&run).unwrap().operating_point.is_some());

        if let Some(op) = run.operating_point.as_mut() {
            op.time = OperatingTime::Time(f64::INFINITY);
        }
        let data = chart_data(&run).unwrap();
        assert!(data.operating_point.is_none());
        assert!(data.y_bounds.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn log_ticks_show_physical_values() {
        assert_eq!(fmt_log_tick(0.0), "1.0");
        assert_eq!(fmt_log_tick(2.0), "100");
        assert_eq!(fmt_log_tick(-1.0), "0.10");
    }

    #[test]
    fn app_clamps_settings_and_tracks_overlays() {
        let config = PlotConfig {
            curve: "U2".to_string(),
            tds: 40.0,
            pickup_amps: 2.0,
            ..PlotConfig::default()
        };
        let mut app = App::new(config, CurveCatalog::standard().clone()).unwrap();
        assert_eq!(app.config.tds, TDS_MAX);
        assert_eq!(app.config.overcurrent_amps, Some(10.0));

        app.toggle_overlay(app.curve_idx).unwrap();
        assert!(app.config.overlays.is_empty());

        app.toggle_overlay(5).unwrap();
        assert_eq!(app.config.overlays, vec!["IEC Standard Inverse".to_string()]);
        assert_eq!(app.run.as_ref().unwrap().series.len(), 2);

        app.selected_field = FIELD_OVERCURRENT;
        app.config.overcurrent_amps = Some(0.5);
        app.recompute().unwrap();
        assert_eq!(app.config.overcurrent_amps, Some(2.0));
        assert!(app.status.contains("pickup"));
    }
}
