//! Analog gauge dashboard: one dial per enabled metric, refreshed every
//! second with an animated needle transition.
//!
//! Each refresh runs the whole pipeline to completion before the next tick
//! is considered: reload the log, take the trailing window, summarize each
//! enabled metric, then play one interpolation sequence per gauge — roughly
//! ten frames, 50 ms apart — redrawing the full dial at every frame. The
//! previously displayed value is owned per-gauge in [`GaugeState`], so a new
//! target always animates from wherever the needle currently points, even if
//! it interrupts an earlier transition.

use crate::aggregate::{self, Metric, MetricSummary};
use crate::animate::{Interpolation, FRAME_COUNT, FRAME_INTERVAL};
use crate::error::Result;
use crate::record::TelemetryRecord;
use crate::series::{self, Store};
use crate::settings::Settings;
use crate::theme::Theme;
use crate::widgets::Dial;

use chrono::NaiveDateTime;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use std::collections::HashMap;
use std::io::stdout;
use std::time::{Duration, Instant};

/// How often a new target value is observed.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Trailing window the summaries are taken over.
#[must_use]
pub fn window_duration() -> chrono::Duration {
    chrono::Duration::minutes(2)
}

/// Displayed needle position of one gauge, persisted across refreshes.
///
/// Created the first time its gauge is drawn and updated at every
/// interpolation frame; this is the continuity state that lets a new target
/// supersede an in-flight animation without a visual jump.
#[derive(Debug, Clone, Copy)]
pub struct GaugeState {
    /// Currently displayed value (0-100 scale).
    pub displayed: f64,
}

/// One gauge's plan for a refresh: the new summary plus the frame sequence
/// from the previously displayed value to the new current value.
#[derive(Debug)]
pub struct GaugePlan {
    /// Metric this plan animates.
    pub metric: Metric,
    /// Fresh window summary (min/max feed the dial footer).
    pub summary: MetricSummary,
    /// Interpolation frames toward `summary.current`.
    pub frames: Interpolation,
}

/// The gauge dashboard application.
pub struct GaugeApp {
    settings: Settings,
    theme: Theme,
    store: Store,
    states: HashMap<Metric, GaugeState>,
    should_quit: bool,
}

impl GaugeApp {
    /// Creates the app from settings; the store reads the configured log.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let theme = Theme::from_palette(&settings.colors);
        let store = Store::new(&settings.log_file);
        Self { settings, theme, store, states: HashMap::new(), should_quit: false }
    }

    /// Plans one refresh from a freshly loaded series.
    ///
    /// Returns `None` when the window is empty — the caller draws a waiting
    /// frame and tries again next tick instead of aggregating nothing.
    /// A gauge seen for the first time starts at its target (no sweep-in
    /// from zero), matching the window-summary value exactly.
    #[must_use]
    pub fn plan_refresh(
        &self,
        series: &[TelemetryRecord],
        now: NaiveDateTime,
    ) -> Option<Vec<GaugePlan>> {
        let window = series::window(series, now, window_duration());
        if window.is_empty() {
            return None;
        }

        let plans = self
            .settings
            .enabled_metrics()
            .into_iter()
            .map(|metric| {
                let summary = aggregate::summarize(window, metric);
                let start = self
                    .states
                    .get(&metric)
                    .map_or(summary.current, |s| s.displayed);
                GaugePlan {
                    metric,
                    summary,
                    frames: Interpolation::new(start, summary.current, FRAME_COUNT),
                }
            })
            .collect();
        Some(plans)
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
                self.refresh(terminal)?;
            }

            let wait = next_refresh.saturating_duration_since(Instant::now());
            self.poll_input(wait.min(REFRESH_INTERVAL))?;
        }

        Ok(())
    }

    /// One refresh: reload, plan, and play the animation burst to completion.
    fn refresh(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        let series = match self.store.load() {
            Ok(series) => series,
            // Keep the previous frame on a transient read failure.
            Err(e) => {
                log::warn!("refresh skipped: {e}");
                return Ok(());
            }
        };

        let now = chrono::Local::now().naive_local();
        let Some(mut plans) = self.plan_refresh(&series, now) else {
            terminal.draw(|frame| self.render_waiting(frame))?;
            return Ok(());
        };

        // All sequences are the same length; step them in lockstep so every
        // dial redraws once per frame.
        loop {
            let mut advanced = false;
            for plan in &mut plans {
                if let Some(value) = plan.frames.next() {
                    self.states.insert(plan.metric, GaugeState { displayed: value });
                    advanced = true;
                }
            }
            if !advanced {
                break;
            }

            let summaries: Vec<(Metric, MetricSummary)> =
                plans.iter().map(|p| (p.metric, p.summary)).collect();
            terminal.draw(|frame| self.render_dials(frame, &summaries))?;

            self.poll_input(FRAME_INTERVAL)?;
            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Polls for key events for up to `timeout`, handling quit keys.
    fn poll_input(&mut self, timeout: Duration) -> Result<()> {
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code, key.modifiers);
                }
            }
        }
        Ok(())
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

    /// Draws the "no data yet" frame shown until the producer writes records.
    fn render_waiting(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(
            Paragraph::new("waiting for data...")
                .style(Style::default().fg(self.theme.fg).bg(self.theme.bg))
                .centered(),
            area,
        );
    }

    /// Full clear-and-redraw of every enabled dial at the displayed values.
    fn render_dials(&self, frame: &mut Frame, summaries: &[(Metric, MetricSummary)]) {
        let area = frame.area();
        frame.render_widget(
            ratatui::widgets::Block::default().style(Style::default().bg(self.theme.bg)),
            area,
        );

        if summaries.is_empty() {
            return;
        }

        let columns = columns(area, summaries.len());
        for ((metric, summary), column) in summaries.iter().zip(columns.iter()) {
            let displayed = self.states.get(metric).map_or(summary.current, |s| s.displayed);
            let dial = Dial::new(displayed)
                .label(metric.label())
                .range(summary.min, summary.max)
                .colors(self.theme.fg, self.theme.bg, self.theme.needle);
            frame.render_widget(dial, *column);
        }
    }

    /// Whether the app has been asked to quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Splits the area into equal side-by-side columns, one per gauge.
fn columns(area: Rect, count: usize) -> Vec<Rect> {
    let constraints =
        vec![Constraint::Ratio(1, count.max(1) as u32); count.max(1)];
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
        .to_vec()
}
