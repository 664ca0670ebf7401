//! Interactive terminal view of the combined figure
//!
//! Uses ratatui with the crossterm backend. The view is a snapshot of the data it was
//! given: it redraws on resize and exits on `q`, `Esc` or `Ctrl+C`. Refreshing with new
//! data means invoking it again.

use super::{ChartData, BAR_TITLE, BAR_X_TITLE, BAR_Y_TITLE, LINE_TITLE, LINE_Y_TITLE};
use crate::error::ReportError;
use crate::models::Level;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::Line,
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::debug;

/// How long to wait for a key before redrawing (milliseconds)
const POLL_INTERVAL_MS: u64 = 250;

type TerminalBackend = CrosstermBackend<Stdout>;

/// Style constants for consistent theming
pub struct AppTheme {
    pub primary: Style,
    pub secondary: Style,
    pub muted: Style,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self {
            primary: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            secondary: Style::default().fg(Color::Cyan),
            muted: Style::default().fg(Color::DarkGray),
        }
    }
}

pub fn level_color(level: Level) -> Color {
    let [r, g, b] = level.rgb();
    Color::Rgb(r, g, b)
}

/// Show `chart` until the user quits.
pub fn show(chart: &ChartData, title: &str) -> Result<(), ReportError> {
    let mut terminal = TerminalGuard::new()?;
    let theme = AppTheme::default();
    let series = LineData::from_chart(chart);

    loop {
        terminal
            .terminal
            .draw(|frame| render(frame, chart, &series, title, &theme))?;

        if event::poll(Duration::from_millis(POLL_INTERVAL_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    _ => {}
                }
            }
        }
    }

    debug!("Closed interactive view");
    Ok(())
}

/// Owned `(x, y)` points per level, in the shape ratatui datasets borrow from.
struct LineData {
    series: Vec<(Level, Vec<(f64, f64)>)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl LineData {
    fn from_chart(chart: &ChartData) -> Self {
        let series = chart
            .lines
            .iter()
            .map(|line| {
                let points = line
                    .points
                    .iter()
                    .map(|p| (p.x as f64, p.value as f64))
                    .collect();
                (line.level, points)
            })
            .collect();

        let (x_min, x_max) = chart.x_range();
        let (y_min, y_max) = chart.y_range();
        Self {
            series,
            x_bounds: widen(x_min, x_max),
            y_bounds: widen(y_min, y_max),
        }
    }
}

/// Bounds for an axis; a flat range is padded so the data sits in the middle.
fn widen(lo: i64, hi: i64) -> [f64; 2] {
    if lo == hi {
        [lo as f64 - 1.0, hi as f64 + 1.0]
    } else {
        [lo as f64, hi as f64]
    }
}

fn render(frame: &mut Frame, chart: &ChartData, series: &LineData, title: &str, theme: &AppTheme) {
    let outer = Block::default()
        .title(title.to_string())
        .title_style(theme.primary)
        .borders(Borders::ALL)
        .border_style(theme.secondary);
    let inner = outer.inner(frame.area());
    frame.render_widget(outer, frame.area());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(inner);

    render_bars(frame, chart, rows[0], theme);
    render_lines(frame, chart, series, rows[1], theme);

    let footer = Paragraph::new("q / Esc to exit")
        .style(theme.muted)
        .alignment(Alignment::Right);
    frame.render_widget(footer, rows[2]);
}

fn render_bars(frame: &mut Frame, chart: &ChartData, area: Rect, theme: &AppTheme) {
    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .map(|bar| {
            Bar::default()
                .value(bar.count as u64)
                .label(Line::from(bar.level.as_str()))
                .style(Style::default().fg(level_color(bar.level)))
                .value_style(theme.primary)
        })
        .collect();

    let block = Block::default()
        .title(format!("{BAR_TITLE} ({BAR_Y_TITLE} by {BAR_X_TITLE})"))
        .title_style(theme.primary)
        .borders(Borders::ALL)
        .border_style(theme.muted);

    let widget = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(2);

    frame.render_widget(widget, area);
}

fn render_lines(frame: &mut Frame, chart: &ChartData, series: &LineData, area: Rect, theme: &AppTheme) {
    let datasets: Vec<Dataset> = series
        .series
        .iter()
        .map(|(level, points)| {
            Dataset::default()
                .name(level.as_str())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(level_color(*level)))
                .data(points)
        })
        .collect();

    let (first, last) = chart.x_labels().unwrap_or(("", ""));
    let x_axis = Axis::default()
        .title(chart.axis.title())
        .style(theme.muted)
        .bounds(series.x_bounds)
        .labels(vec![first.to_string(), last.to_string()]);

    let y_axis = Axis::default()
        .title(LINE_Y_TITLE)
        .style(theme.muted)
        .bounds(series.y_bounds)
        .labels(vec![
            format!("{}", series.y_bounds[0]),
            format!("{}", series.y_bounds[1]),
        ]);

    let block = Block::default()
        .title(LINE_TITLE)
        .title_style(theme.primary)
        .borders(Borders::ALL)
        .border_style(theme.muted);

    let widget = Chart::new(datasets).block(block).x_axis(x_axis).y_axis(y_axis);
    frame.render_widget(widget, area);
}

/// Raw-mode alternate screen that is restored when dropped, on every exit path.
struct TerminalGuard {
    terminal: Terminal<TerminalBackend>,
}

impl TerminalGuard {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
