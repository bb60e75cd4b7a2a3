//! Terminal UI implementation using ratatui
//!
//! Concrete `UIRenderer` drawing the conversation with the crossterm backend. Input is handled
//! separately by the input service; this type only paints.

use crate::error::{BubbleError, Result};
use crate::render::ui::layout;
use crate::render::ui::renderer::UIRenderer;
use crate::render::ui::state::ChatView;
use crate::render::ui::theme::ColorTheme;
use ratatui::crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{self, Stdout};

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Terminal UI implementation with ratatui backend
pub struct TerminalUI {
    terminal: Option<CrosstermTerminal>,
    theme: ColorTheme,
}

impl TerminalUI {
    /// Create a new terminal UI instance with the default theme
    pub fn new() -> Result<Self> {
        Self::with_theme(ColorTheme::default())
    }

    /// Create terminal UI with custom theme
    pub fn with_theme(theme: ColorTheme) -> Result<Self> {
        Ok(Self {
            terminal: None,
            theme,
        })
    }

    pub fn theme(&self) -> &ColorTheme {
        &self.theme
    }

    fn draw(frame: &mut Frame, view: &ChatView, theme: &ColorTheme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
            .split(frame.size());

        Self::render_conversation(frame, chunks[0], view, theme);
        Self::render_status(frame, chunks[1], view, theme);
    }

    fn render_conversation(frame: &mut Frame, area: Rect, view: &ChatView, theme: &ColorTheme) {
        if view.bubbles.is_empty() {
            let top = area.height.saturating_sub(3) / 2;
            let placeholder = Rect {
                y: area.y + top,
                height: area.height - top,
                ..area
            };
            frame.render_widget(Paragraph::new(layout::empty_state_lines(theme)), placeholder);
            return;
        }

        // Only the visible slice is handed to ratatui; its scroll offset is a u16 row count.
        let (lines, skip) = layout::visible_lines(view, theme, usize::from(area.height));
        let skip = u16::try_from(skip)
            .unwrap_or(u16::MAX)
            .min(u16::MAX - area.height);
        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((skip, 0));
        frame.render_widget(paragraph, area);
    }

    fn render_status(frame: &mut Frame, area: Rect, view: &ChatView, theme: &ColorTheme) {
        let status_style = Style::default().bg(theme.status_bg).fg(theme.status_fg);
        let paragraph = Paragraph::new(status_text(view)).style(status_style);
        frame.render_widget(paragraph, area);
    }
}

/// Text of the status line: title, message count, position, then notice or typing hint.
pub fn status_text(view: &ChatView) -> String {
    let mut text = format!(
        "{} | {} messages | {}",
        view.title,
        view.bubbles.len(),
        view.position_summary()
    );
    if let Some(message) = &view.status_line.message {
        text.push_str(" | ");
        text.push_str(message);
    } else if view.revealing_count() > 0 {
        text.push_str(" | typing... (s to skip)");
    }
    text
}

impl UIRenderer for TerminalUI {
    fn render(&mut self, view: &ChatView) -> Result<()> {
        if let Some(ref mut terminal) = self.terminal {
            let theme = &self.theme;
            terminal.draw(|frame| Self::draw(frame, view, theme))?;
        }
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        enable_raw_mode().map_err(|e| BubbleError::ui(format!("enable raw mode: {e}")))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        self.terminal = Some(terminal);

        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.terminal.is_some() {
            disable_raw_mode()?;
            execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
            self.terminal = None;
        }
        Ok(())
    }

    fn get_terminal_size(&self) -> Result<(u16, u16)> {
        let (cols, rows) = ratatui::crossterm::terminal::size()?;
        Ok((cols, rows))
    }
}

impl Drop for TerminalUI {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use crate::render::ui::state::Bubble;
    use crate::session::RenderSession;
    use ratatui::backend::TestBackend;
    use ratatui::style::Color;

    /// Draw `view` on an in-memory terminal and return its rows as text.
    fn draw_rows(view: &ChatView, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let theme = ColorTheme::default();
        terminal
            .draw(|frame| TerminalUI::draw(frame, view, &theme))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .chunks(usize::from(width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }

    fn bot_bubble(text: String) -> Bubble {
        let message = Message::bot(text);
        let session = RenderSession::start(1, Some(&message.text), message.sender, false);
        Bubble::new(message, session)
    }

    #[test]
    fn test_terminal_ui_creation() {
        let ui = TerminalUI::new().unwrap();
        assert!(ui.terminal.is_none());
        assert_eq!(ui.theme().status_bg, Color::Blue);

        let ui_with_theme = TerminalUI::with_theme(ColorTheme::monochrome()).unwrap();
        assert_eq!(ui_with_theme.theme().status_bg, Color::Black);
    }

    #[test]
    fn test_render_without_terminal_is_noop() {
        let mut ui = TerminalUI::new().unwrap();
        let view = ChatView::new("chat.json", 80, 24, true);
        assert!(ui.render(&view).is_ok());
        assert!(ui.cleanup().is_ok());
    }

    #[test]
    fn test_status_text_reports_typing() {
        let mut view = ChatView::new("chat.json", 80, 24, true);
        assert_eq!(status_text(&view), "chat.json | 0 messages | (empty)");

        let message = Message::bot("thinking").animated();
        let session = RenderSession::start(1, Some("thinking"), message.sender, true);
        view.push_bubble(Bubble::new(message, session));
        assert!(status_text(&view).ends_with("typing... (s to skip)"));

        view.status_line.set_message("Replaying last reply");
        assert!(status_text(&view).ends_with("Replaying last reply"));
    }

    #[test]
    fn test_draw_beyond_u16_rows() {
        let body = (0..70_000)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut view = ChatView::new("big.json", 40, 10, false);
        view.push_bubble(bot_bubble(body));
        view.go_to_end();
        assert!(view.scroll_top > usize::from(u16::MAX));
        assert_eq!(view.position_summary(), "(END)");

        let rows = draw_rows(&view, 40, 10);
        assert_eq!(rows[0].trim_end(), "line 69991");
        assert_eq!(rows[8].trim_end(), "line 69999");
        assert!(rows[9].starts_with("big.json | 1 messages | (END)"));

        view.scroll_by(-35_000);
        let rows = draw_rows(&view, 40, 10);
        assert_eq!(rows[0].trim_end(), format!("line {}", view.scroll_top - 1));
    }

    #[test]
    fn test_draw_empty_conversation_shows_placeholder() {
        let view = ChatView::new("empty.json", 50, 12, false);
        let rows = draw_rows(&view, 50, 12);
        assert!(rows.iter().any(|row| row.contains("Welcome!")));
        assert!(rows
            .iter()
            .any(|row| row.contains("This conversation has no messages yet.")));
        assert!(rows[11].contains("(empty)"));
    }
}
