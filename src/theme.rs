//! Display theme resolved from settings colors.

use crate::settings::Palette;
use ratatui::style::Color;

/// Resolved foreground/background colors for the dashboards.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Background color.
    pub bg: Color,
    /// Foreground color.
    pub fg: Color,
    /// Needle color for the analog gauges.
    pub needle: Color,
}

impl Theme {
    /// Resolves a theme from the settings palette.
    #[must_use]
    pub fn from_palette(palette: &Palette) -> Self {
        Self {
            bg: parse_color(&palette.bg),
            fg: parse_color(&palette.fg),
            needle: Color::Red,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_palette(&Palette::default())
    }
}

/// Parses a `#RRGGBB` color, falling back to white.
#[must_use]
pub fn parse_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');

    if hex.len() != 6 || !hex.is_ascii() {
        return Color::White;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_valid() {
        assert_eq!(parse_color("#000000"), Color::Rgb(0, 0, 0));
        assert_eq!(parse_color("#FF8000"), Color::Rgb(255, 128, 0));
        assert_eq!(parse_color("c0caf5"), Color::Rgb(192, 202, 245));
    }

    #[test]
    fn test_parse_color_invalid_falls_back_to_white() {
        assert_eq!(parse_color("#FFF"), Color::White);
        assert_eq!(parse_color(""), Color::White);
        assert_eq!(parse_color("#GGGGGG"), Color::Rgb(255, 255, 255));
    }

    #[test]
    fn test_theme_from_palette() {
        let theme = Theme::from_palette(&Palette {
            bg: "#101010".to_string(),
            fg: "#EEEEEE".to_string(),
        });

        assert_eq!(theme.bg, Color::Rgb(16, 16, 16));
        assert_eq!(theme.fg, Color::Rgb(238, 238, 238));
        assert_eq!(theme.needle, Color::Red);
    }
}
