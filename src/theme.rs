//! Theme system for the TUI.
//!
//! `Theme` is the persisted light/dark preference; `ColorPalette` maps every
//! semantic UI role to a ratatui `Style` for the active theme.

use ratatui::style::{Color, Modifier, Style};
use std::fmt;

// ============================================================================
// Theme
// ============================================================================

/// Available themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Parse a theme name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// Persisted name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Build the `ColorPalette` for this theme.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read the terminal's dark-background signal from `COLORFGBG`.
///
/// The variable holds `fg;bg` (sometimes `fg;extra;bg`) ANSI colour indexes.
/// Backgrounds 0-6 and 8 are dark. Returns `None` when unset or unparseable.
pub fn terminal_prefers_dark() -> Option<bool> {
    let value = std::env::var("COLORFGBG").ok()?;
    prefers_dark_from_colorfgbg(&value)
}

pub(crate) fn prefers_dark_from_colorfgbg(value: &str) -> Option<bool> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(matches!(bg, 0..=6 | 8))
}

// ============================================================================
// Color Palette
// ============================================================================

/// Every semantic UI role mapped to a `Style`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    // -- Header --
    pub header_title: Style,
    pub tab_normal: Style,
    pub tab_selected: Style,
    pub summary: Style,

    // -- Article list --
    pub article_title: Style,
    pub article_selected: Style,
    pub article_meta: Style,
    pub article_description: Style,
    pub bookmark_marker: Style,

    // -- Reader --
    pub reader_heading: Style,
    pub reader_body: Style,
    pub reader_metadata: Style,
    pub reader_link: Style,

    // -- States --
    pub loading: Style,
    pub error: Style,
    pub empty: Style,

    // -- Pagination --
    pub page_current: Style,
    pub page_normal: Style,
    pub page_disabled: Style,

    // -- Chrome --
    pub search_input: Style,
    pub status_bar: Style,
    pub notice: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            header_title: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            tab_normal: Style::default().fg(Color::Gray),
            tab_selected: Style::default()
                .bg(Color::Red)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            summary: Style::default().fg(Color::DarkGray),

            article_title: Style::default().add_modifier(Modifier::BOLD),
            article_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            article_meta: Style::default().fg(Color::DarkGray),
            article_description: Style::default().fg(Color::Gray),
            bookmark_marker: Style::default().fg(Color::Yellow),

            reader_heading: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            reader_body: Style::default(),
            reader_metadata: Style::default().fg(Color::DarkGray),
            reader_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),

            loading: Style::default().fg(Color::Cyan),
            error: Style::default().fg(Color::Red),
            empty: Style::default().fg(Color::Gray),

            page_current: Style::default()
                .bg(Color::Red)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            page_normal: Style::default(),
            page_disabled: Style::default().fg(Color::DarkGray),

            search_input: Style::default().fg(Color::Yellow),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            notice: Style::default().bg(Color::Red).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Red),
        }
    }

    fn light() -> Self {
        Self {
            header_title: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            tab_normal: Style::default().fg(Color::Black),
            tab_selected: Style::default()
                .bg(Color::Red)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            summary: Style::default().fg(Color::DarkGray),

            article_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            article_selected: Style::default().bg(Color::Blue).fg(Color::White),
            article_meta: Style::default().fg(Color::DarkGray),
            article_description: Style::default().fg(Color::Black),
            bookmark_marker: Style::default().fg(Color::Magenta),

            reader_heading: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            reader_body: Style::default().fg(Color::Black),
            reader_metadata: Style::default().fg(Color::DarkGray),
            reader_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),

            loading: Style::default().fg(Color::Blue),
            error: Style::default().fg(Color::Red),
            empty: Style::default().fg(Color::DarkGray),

            page_current: Style::default()
                .bg(Color::Red)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            page_normal: Style::default().fg(Color::Black),
            page_disabled: Style::default().fg(Color::Gray),

            search_input: Style::default().fg(Color::Magenta),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            notice: Style::default().bg(Color::Red).fg(Color::White),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Red),
        }
    }
}
