//! Time-series chart dashboard: four panels over a two-minute trailing
//! window, refreshed every five seconds.
//!
//! Each tick reloads the full series, takes the window, and does a complete
//! clear-and-redraw of every panel — no incremental diffing of chart
//! primitives, which is fine at this cadence. The temperature panel plots
//! one line per sensor label found in the windowed records; labels come and
//! go with the data.

use crate::aggregate::Metric;
use crate::error::Result;
use crate::record::TelemetryRecord;
use crate::series::{self, Store};
use crate::settings::Settings;
use crate::theme::Theme;
use crate::widgets::chart::{metric_points, sensor_points, y_bounds};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::{Frame, Terminal};
use std::io::stdout;
use std::time::{Duration, Instant};

/// Chart refresh cadence.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Trailing window shown by every panel.
#[must_use]
pub fn window_duration() -> chrono::Duration {
    chrono::Duration::minutes(2)
}

/// Line colors per fixed panel, echoing the original dashboard.
const PANEL_COLORS: [(Metric, Color); 3] = [
    (Metric::Cpu, Color::Red),
    (Metric::Memory, Color::Blue),
    (Metric::Disk, Color::Green),
];

/// Rotating colors for the dynamic temperature series.
const SENSOR_COLORS: [Color; 6] = [
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::LightRed,
    Color::LightGreen,
    Color::LightBlue,
];

/// The chart dashboard application.
pub struct ChartApp {
    theme: Theme,
    store: Store,
    window: Vec<TelemetryRecord>,
    should_quit: bool,
}

impl ChartApp {
    /// Creates the app from settings; the store reads the configured log.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let theme = Theme::from_palette(&settings.colors);
        let store = Store::new(&settings.log_file);
        Self { theme, store, window: Vec::new(), should_quit: false }
    }

    /// Runs the application main loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup or rendering fails.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        stdout().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        let mut next_refresh = Instant::now();

        while !self.should_quit {
            if Instant::now() >= next_refresh {
                next_refresh = Instant::now() + REFRESH_INTERVAL;
                self.reload();
                terminal.draw(|frame| self.render(frame))?;
            }

            let wait = next_refresh.saturating_duration_since(Instant::now());
            if event::poll(wait.min(Duration::from_millis(250)))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }
        }

        Ok(())
    }

    /// Reloads the series and recomputes the trailing window.
    fn reload(&mut self) {
        let series = match self.store.load() {
            Ok(series) => series,
            // Keep the previous window on a transient read failure.
            Err(e) => {
                log::warn!("refresh skipped: {e}");
                return;
            }
        };
        let now = chrono::Local::now().naive_local();
        self.window = series::window(&series, now, window_duration()).to_vec();
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    /// Full clear-and-redraw of all four panels.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(self.theme.bg)), area);

        if self.window.is_empty() {
            frame.render_widget(
                Paragraph::new("waiting for data...")
                    .style(Style::default().fg(self.theme.fg).bg(self.theme.bg))
                    .centered(),
                area,
            );
            return;
        }

        let panels = quadrants(area);
        for ((metric, color), panel) in PANEL_COLORS.iter().zip(panels.iter()) {
            self.render_metric_panel(frame, *panel, *metric, *color);
        }
        self.render_temperature_panel(frame, panels[3]);
    }

    fn render_metric_panel(&self, frame: &mut Frame, area: Rect, metric: Metric, color: Color) {
        let points = metric_points(&self.window, metric);
        let datasets = vec![Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color))
            .data(&points)];

        let title = format!(" {} Usage (%) ", metric.label());
        let chart = self.chart(datasets, title, y_bounds(&[&points]), x_span(&points));
        frame.render_widget(chart, area);
    }

    fn render_temperature_panel(&self, frame: &mut Frame, area: Rect) {
        let series = sensor_points(&self.window);

        // Dataset::name doubles as the legend entry.
        let datasets: Vec<Dataset> = series
            .iter()
            .enumerate()
            .map(|(i, (label, points))| {
                Dataset::default()
                    .name(label.clone())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(SENSOR_COLORS[i % SENSOR_COLORS.len()]))
                    .data(points)
            })
            .collect();

        let all: Vec<&[(f64, f64)]> = series.iter().map(|(_, p)| p.as_slice()).collect();
        let span = series.iter().map(|(_, p)| x_span(p)).fold(0.0_f64, f64::max);

        let chart =
            self.chart(datasets, " CPU Temps ".to_string(), y_bounds(&all), span);
        frame.render_widget(chart, area);
    }

    fn chart<'a>(
        &self,
        datasets: Vec<Dataset<'a>>,
        title: String,
        y: [f64; 2],
        x_max: f64,
    ) -> Chart<'a> {
        let x_upper = x_max.max(1.0);
        Chart::new(datasets)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.fg)),
            )
            .style(Style::default().bg(self.theme.bg))
            .x_axis(
                Axis::default()
                    .title("seconds")
                    .style(Style::default().fg(self.theme.fg))
                    .bounds([0.0, x_upper])
                    .labels(vec![
                        "0".to_string(),
                        format!("{:.0}", x_upper / 2.0),
                        format!("{:.0}", x_upper),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(self.theme.fg))
                    .bounds(y)
                    .labels(vec![
                        format!("{:.0}", y[0]),
                        format!("{:.0}", (y[0] + y[1]) / 2.0),
                        format!("{:.0}", y[1]),
                    ]),
            )
    }

    /// Whether the app has been asked to quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Splits the area into a 2x2 grid: CPU, Memory / Disk, Temps.
fn quadrants(area: Rect) -> [Rect; 4] {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    [top[0], top[1], bottom[0], bottom[1]]
}

/// Largest x coordinate in a point series, 0 for empty input.
fn x_span(points: &[(f64, f64)]) -> f64 {
    points.last().map_or(0.0, |&(x, _)| x)
}
