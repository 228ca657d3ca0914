use ratatui::style::{Color as RatatuiColor, Modifier, Style as RatatuiStyle};

/// RGB color. Construct with `Color::new(r, g, b)` or use the named constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const GRAY: Color = Color::new(128, 128, 128);
    pub const DARK_GRAY: Color = Color::new(100, 100, 100);
    pub const GOLD: Color = Color::new(255, 215, 0);
    pub const SKY_BLUE: Color = Color::new(135, 206, 235);

    pub const BACKGROUND: Color = Color::new(0, 0, 0);
    pub const SELECTION_BG: Color = Color::new(60, 100, 180);
    pub const CORRECT: Color = Color::new(80, 220, 100);
    pub const INCORRECT: Color = Color::new(255, 80, 80);
    pub const MUTE_COLOR: Color = Color::new(255, 100, 100);

    // countdown gauge
    pub const METER_LOW: Color = Color::new(80, 220, 100);
    pub const METER_MID: Color = Color::new(255, 220, 50);
    pub const METER_HIGH: Color = Color::new(255, 80, 80);
}

/// Create style with conditional selection background.
pub fn selected_style(is_selected: bool, fg: Color) -> Style {
    if is_selected {
        Style::new().fg(fg).bg(Color::SELECTION_BG).bold()
    } else {
        Style::new().fg(fg)
    }
}

/// Gauge color for the share of time left.
pub fn countdown_color(fraction: f64) -> Color {
    if fraction > 0.5 {
        Color::METER_LOW
    } else if fraction > 0.2 {
        Color::METER_MID
    } else {
        Color::METER_HIGH
    }
}

/// Text style with foreground, background, and attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub underline: bool,
}

impl Style {
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
            underline: false,
        }
    }

    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }
}

// --- Conversions to ratatui types ---

impl From<Color> for RatatuiColor {
    fn from(c: Color) -> Self {
        RatatuiColor::Rgb(c.r, c.g, c.b)
    }
}

impl From<Style> for RatatuiStyle {
    fn from(s: Style) -> Self {
        let mut rs = RatatuiStyle::default();
        if let Some(fg) = s.fg {
            rs = rs.fg(RatatuiColor::from(fg));
        }
        if let Some(bg) = s.bg {
            rs = rs.bg(RatatuiColor::from(bg));
        }
        if s.bold {
            rs = rs.add_modifier(Modifier::BOLD);
        }
        if s.underline {
            rs = rs.add_modifier(Modifier::UNDERLINED);
        }
        rs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_goes_red_near_the_end() {
        assert_eq!(countdown_color(1.0), Color::METER_LOW);
        assert_eq!(countdown_color(0.4), Color::METER_MID);
        assert_eq!(countdown_color(0.1), Color::METER_HIGH);
    }

    #[test]
    fn style_converts_to_ratatui() {
        let rs = RatatuiStyle::from(Style::new().fg(Color::GOLD).bold());
        assert_eq!(rs.fg, Some(RatatuiColor::Rgb(255, 215, 0)));
        assert!(rs.add_modifier.contains(Modifier::BOLD));
    }
}
