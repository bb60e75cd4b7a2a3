//! Color theme and styling definitions using ratatui colors
//!
//! Styles are stored as ratatui values directly; the layout code applies them without any
//! intermediate abstraction.

use crate::config::ThemeName;
use ratatui::style::{Color, Modifier, Style};

/// Color theme for chat bubbles and the status line
#[derive(Debug, Clone)]
pub struct ColorTheme {
    /// Plain paragraph text
    pub normal_text: Style,

    /// `# Heading` lines
    pub heading: Style,

    /// `**bold**` runs
    pub bold: Style,

    /// Link text
    pub link: Style,

    /// Link target shown after the link text
    pub link_url: Style,

    /// Horizontal rules
    pub rule: Style,

    /// Typing cursor painted while a reply is still being revealed
    pub cursor: Style,

    /// Header of user bubbles
    pub user_label: Style,

    /// Header of assistant bubbles
    pub bot_label: Style,

    /// Body of user bubbles
    pub user_text: Style,

    /// Clock shown under a bubble
    pub timestamp: Style,

    /// Status line background
    pub status_bg: Color,

    /// Status line text
    pub status_fg: Color,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            normal_text: Style::default(),
            heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            bold: Style::default().add_modifier(Modifier::BOLD),
            link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            link_url: Style::default().fg(Color::DarkGray),
            rule: Style::default().fg(Color::DarkGray),
            cursor: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::SLOW_BLINK),
            user_label: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            bot_label: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            user_text: Style::default().fg(Color::White),
            timestamp: Style::default().fg(Color::DarkGray),
            status_bg: Color::Blue,
            status_fg: Color::White,
        }
    }
}

impl ColorTheme {
    /// Create a monochrome theme for terminals without color support
    pub fn monochrome() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Self {
            normal_text: Style::default(),
            heading: bold.add_modifier(Modifier::UNDERLINED),
            bold,
            link: Style::default().add_modifier(Modifier::UNDERLINED),
            link_url: Style::default().add_modifier(Modifier::DIM),
            rule: Style::default().add_modifier(Modifier::DIM),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            user_label: bold,
            bot_label: bold,
            user_text: Style::default(),
            timestamp: Style::default().add_modifier(Modifier::DIM),
            status_bg: Color::Black,
            status_fg: Color::White,
        }
    }

    /// Create a high-contrast theme for accessibility
    pub fn high_contrast() -> Self {
        Self {
            normal_text: Style::default().fg(Color::White),
            heading: Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            link: Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::UNDERLINED),
            link_url: Style::default().fg(Color::LightCyan),
            rule: Style::default().fg(Color::White),
            cursor: Style::default().fg(Color::Black).bg(Color::LightYellow),
            user_label: Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD),
            bot_label: Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
            user_text: Style::default().fg(Color::White),
            timestamp: Style::default().fg(Color::Gray),
            status_bg: Color::White,
            status_fg: Color::Black,
        }
    }
}

impl From<ThemeName> for ColorTheme {
    fn from(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self::default(),
            ThemeName::Monochrome => Self::monochrome(),
            ThemeName::HighContrast => Self::high_contrast(),
        }
    }
}
