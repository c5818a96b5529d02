//! Analog dial widget: a circular gauge drawn on a braille canvas.
//!
//! Dial anatomy: an outline circle, 13 tick marks (one every 1/12 of full
//! scale, with a longer tick and a percent label every third mark), a needle,
//! a centered numeric readout, a title above and the window's observed
//! min/max below. The needle angle is a linear map of the *displayed* value —
//! the animated one, not the raw target — from 0% at the top through one full
//! clockwise revolution at 100%.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine};
use ratatui::widgets::Widget;
use std::f64::consts::TAU;

const DIAL_RADIUS: f64 = 70.0;
const NEEDLE_LENGTH: f64 = DIAL_RADIUS * 0.75;
const TICK_COUNT: u32 = 12;

/// A circular analog gauge for one metric.
#[derive(Debug, Clone)]
pub struct Dial<'a> {
    /// Displayed value, 0-100 scale.
    value: f64,
    /// Title above the dial.
    label: &'a str,
    /// Window minimum for the footer.
    min: f64,
    /// Window maximum for the footer.
    max: f64,
    /// Dial and text color.
    fg: Color,
    /// Canvas background.
    bg: Color,
    /// Needle color.
    needle: Color,
}

impl<'a> Dial<'a> {
    /// Creates a dial showing the given displayed value.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value: value.clamp(0.0, 100.0),
            label: "",
            min: 0.0,
            max: 0.0,
            fg: Color::White,
            bg: Color::Black,
            needle: Color::Red,
        }
    }

    /// Sets the title label.
    #[must_use]
    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    /// Sets the min/max footer values.
    #[must_use]
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Sets dial, background, and needle colors.
    #[must_use]
    pub fn colors(mut self, fg: Color, bg: Color, needle: Color) -> Self {
        self.fg = fg;
        self.bg = bg;
        self.needle = needle;
        self
    }

    /// Canvas position of a scale fraction: 0.0 at the top, increasing
    /// clockwise through one full revolution.
    fn point_at(fraction: f64, radius: f64) -> (f64, f64) {
        let angle = fraction * TAU;
        (radius * angle.sin(), radius * angle.cos())
    }

    fn paint(&self, ctx: &mut Context) {
        ctx.draw(&Circle { x: 0.0, y: 0.0, radius: DIAL_RADIUS, color: self.fg });

        for i in 0..=TICK_COUNT {
            let fraction = f64::from(i) / f64::from(TICK_COUNT);
            let length = if i % 3 == 0 { 10.0 } else { 5.0 };
            let (x1, y1) = Self::point_at(fraction, DIAL_RADIUS - length);
            let (x2, y2) = Self::point_at(fraction, DIAL_RADIUS);
            ctx.draw(&CanvasLine { x1, y1, x2, y2, color: self.fg });
        }

        let (nx, ny) = Self::point_at(self.value / 100.0, NEEDLE_LENGTH);
        ctx.draw(&CanvasLine { x1: 0.0, y1: 0.0, x2: nx, y2: ny, color: self.needle });

        // Text layer paints over the braille shapes.
        for i in (0..=TICK_COUNT).step_by(3) {
            let fraction = f64::from(i) / f64::from(TICK_COUNT);
            let pct = (fraction * 100.0).round() as u32;
            let (lx, ly) = Self::point_at(fraction, DIAL_RADIUS + 18.0);
            ctx.print(lx, ly, Span::styled(format!("{pct}%"), Style::default().fg(self.fg)));
        }

        ctx.print(
            0.0,
            0.0,
            Span::styled(format!("{:.1}%", self.value), Style::default().fg(self.fg)),
        );
        ctx.print(
            0.0,
            -(DIAL_RADIUS + 25.0),
            Span::styled(
                format!("↓ {:.1}%  ↑ {:.1}%", self.min, self.max),
                Style::default().fg(self.fg),
            ),
        );
    }

    /// Single-line fallback when the area is too small for a dial.
    fn render_compact(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let text = format!("{} {:.1}%", self.label, self.value);
        buf.set_string(area.x, area.y, text, Style::default().fg(self.fg));
    }
}

impl Widget for Dial<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 11 || area.height < 7 {
            self.render_compact(area, buf);
            return;
        }

        let canvas = Canvas::default()
            .background_color(self.bg)
            .marker(Marker::Braille)
            .x_bounds([-100.0, 100.0])
            .y_bounds([-100.0, 100.0])
            .paint(|ctx| self.paint(ctx));

        canvas.render(area, buf);

        // Title row above the dial body.
        let title = Line::styled(self.label.to_string(), Style::default().fg(self.fg));
        let title_x = area.x + (area.width.saturating_sub(self.label.len() as u16)) / 2;
        buf.set_line(title_x, area.y, &title, area.width);
    }
}
