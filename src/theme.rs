//! Color theme system.
//!
//! Dark is the default; the saved preference stores the theme name, absent
//! meaning dark. `t` cycles through the schemes at runtime.

use ratatui::style::Color;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Default dark scheme.
    Dark,
    /// Light scheme for bright terminals.
    Light,
    /// Amber CRT - retro terminal orange on black.
    AmberCrt,
    /// Green Phosphor - classic green screen.
    GreenPhosphor,
}

impl Theme {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            "amber" | "ambercrt" | "amber-crt" => Ok(Theme::AmberCrt),
            "green" | "greenphosphor" | "green-phosphor" => Ok(Theme::GreenPhosphor),
            _ => Err(format!(
                "Unknown theme '{}'. Available: dark, light, amber-crt, green-phosphor",
                s
            )),
        }
    }

    /// Next theme in the cycle order.
    pub fn next(&self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::AmberCrt,
            Theme::AmberCrt => Theme::GreenPhosphor,
            Theme::GreenPhosphor => Theme::Dark,
        }
    }

    pub fn colors(&self) -> ColorScheme {
        match self {
            Theme::Dark => ColorScheme::dark(),
            Theme::Light => ColorScheme::light(),
            Theme::AmberCrt => ColorScheme::amber_crt(),
            Theme::GreenPhosphor => ColorScheme::green_phosphor(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Dark
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
            Theme::AmberCrt => write!(f, "amber-crt"),
            Theme::GreenPhosphor => write!(f, "green-phosphor"),
        }
    }
}

/// Color scheme for a theme.
#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    pub background: Color,
    /// Primary text color
    pub text: Color,
    /// Dimmed text (secondary info, placeholders, skeleton lines)
    pub text_dim: Color,
    /// Border color for the focused element
    pub focus_border: Color,
    /// Border color for unfocused elements
    pub unfocused_border: Color,
    /// Badge and feature-pill color
    pub badge: Color,
    /// Selected feature pill
    pub selection_bg: Color,
    pub selection_fg: Color,
    /// Error card text and shake cue
    pub error: Color,
    /// Toast success color
    pub toast_success: Color,
}

impl ColorScheme {
    pub fn dark() -> Self {
        Self {
            background: Color::Black,
            text: Color::White,
            text_dim: Color::Gray,
            focus_border: Color::Yellow,
            unfocused_border: Color::Gray,
            badge: Color::Cyan,
            selection_bg: Color::Yellow,
            selection_fg: Color::Black,
            error: Color::Red,
            toast_success: Color::Green,
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::White,
            text: Color::Black,
            text_dim: Color::DarkGray,
            focus_border: Color::Blue,
            unfocused_border: Color::DarkGray,
            badge: Color::Blue,
            selection_bg: Color::Blue,
            selection_fg: Color::White,
            error: Color::Red,
            toast_success: Color::Rgb(0, 130, 0),
        }
    }

    pub fn amber_crt() -> Self {
        let amber = Color::Rgb(255, 176, 0);
        let amber_bright = Color::Rgb(255, 200, 100);
        let amber_dim = Color::Rgb(180, 120, 0);
        Self {
            background: Color::Black,
            text: amber,
            text_dim: amber_dim,
            focus_border: amber_bright,
            unfocused_border: amber_dim,
            badge: amber_bright,
            selection_bg: amber,
            selection_fg: Color::Black,
            error: Color::Red,
            toast_success: Color::Rgb(100, 255, 100),
        }
    }

    pub fn green_phosphor() -> Self {
        let green = Color::Rgb(0, 255, 0);
        let green_dim = Color::Rgb(0, 180, 0);
        let green_bright = Color::Rgb(100, 255, 100);
        Self {
            background: Color::Black,
            text: green,
            text_dim: green_dim,
            focus_border: green_bright,
            unfocused_border: green_dim,
            badge: green_bright,
            selection_bg: green,
            selection_fg: Color::Black,
            error: Color::Red,
            toast_success: green_bright,
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::dark()
    }
}
