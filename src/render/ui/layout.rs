//! Turns bubbles into styled terminal lines.
//!
//! Assistant bubbles are built from the session's display blocks; user bubbles show their raw
//! text, right-aligned, with no markdown applied. Every bubble gets a header with the sender
//! label and, when known, a `HH:MM` clock underneath.

use crate::markdown::{DisplayBlock, InlineSpan};
use crate::render::ui::state::{Bubble, ChatView};
use crate::render::ui::theme::ColorTheme;
use crate::session::SessionId;
use chrono::{DateTime, Local, TimeZone, Utc};
use ratatui::layout::Alignment;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use std::fmt::Display;

/// Glyph painted after the revealed text while a reply is still typing.
pub const CURSOR_GLYPH: &str = "▌";

const RULE_GLYPH: &str = "─";
const MIN_RULE_WIDTH: usize = 3;

/// Lines for a sequence of display blocks, one line per block.
pub fn block_lines(blocks: &[DisplayBlock], theme: &ColorTheme, width: u16) -> Vec<Line<'static>> {
    blocks
        .iter()
        .map(|block| match block {
            DisplayBlock::Heading(title) => Line::from(Span::styled(title.clone(), theme.heading)),
            DisplayBlock::Rule => Line::from(Span::styled(
                RULE_GLYPH.repeat(rule_width(width)),
                theme.rule,
            )),
            DisplayBlock::Paragraph(spans) => Line::from(inline_spans(spans, theme)),
            DisplayBlock::BlankLine => Line::default(),
        })
        .collect()
}

fn inline_spans(spans: &[InlineSpan], theme: &ColorTheme) -> Vec<Span<'static>> {
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        match span {
            InlineSpan::PlainText(text) => out.push(Span::styled(text.clone(), theme.normal_text)),
            InlineSpan::Bold(text) => out.push(Span::styled(text.clone(), theme.bold)),
            InlineSpan::Link { text, url } => {
                out.push(Span::styled(text.clone(), theme.link));
                out.push(Span::styled(format!(" <{url}>"), theme.link_url));
            }
        }
    }
    out
}

/// Rules span most of a bubble, like the chat UI's 70% max bubble width.
fn rule_width(width: u16) -> usize {
    (usize::from(width) * 7 / 10).max(MIN_RULE_WIDTH)
}

/// All lines making up one bubble.
pub fn bubble_lines(
    bubble: &Bubble,
    theme: &ColorTheme,
    width: u16,
    show_timestamps: bool,
) -> Vec<Line<'static>> {
    let sender = bubble.message.sender;
    let session = &bubble.session;

    let label_style = if sender.is_bot() {
        theme.bot_label
    } else {
        theme.user_label
    };
    let mut lines = vec![Line::from(Span::styled(sender.label(), label_style))];

    let mut body = if sender.is_bot() {
        block_lines(&session.blocks(), theme, width)
    } else {
        session
            .revealed_text()
            .split('\n')
            .map(|line| Line::from(Span::styled(line.to_string(), theme.user_text)))
            .collect()
    };
    if body.is_empty() {
        body.push(Line::default());
    }
    if session.shows_cursor() {
        if let Some(last) = body.last_mut() {
            last.spans.push(Span::styled(CURSOR_GLYPH, theme.cursor));
        }
    }
    lines.extend(body);

    if show_timestamps {
        if let Some(created_at) = bubble.message.created_at {
            lines.push(Line::from(Span::styled(
                local_clock(&created_at),
                theme.timestamp,
            )));
        }
    }

    if !sender.is_bot() {
        lines = lines
            .into_iter()
            .map(|line| line.alignment(Alignment::Right))
            .collect();
    }
    lines
}

/// Rows a single line occupies once wrapped to `width`.
fn wrapped_rows(line: &Line<'static>, width: u16) -> usize {
    if width == 0 {
        return 1;
    }
    Paragraph::new(line.clone())
        .wrap(Wrap { trim: false })
        .line_count(width)
        .max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LayoutKey {
    session: SessionId,
    revealed: usize,
    complete: bool,
    width: u16,
    show_timestamps: bool,
}

impl LayoutKey {
    fn of(bubble: &Bubble, width: u16, show_timestamps: bool) -> Self {
        Self {
            session: bubble.session.id(),
            revealed: bubble.session.revealed_length(),
            complete: bubble.session.is_complete(),
            width,
            show_timestamps,
        }
    }
}

/// Wrapped row count of every line of one bubble.
///
/// Valid only for the session state and width it was measured with; [`ChatView`] re-measures a
/// bubble once its session ticks, is replaced or the viewport width changes.
#[derive(Debug, Clone)]
pub struct BubbleLayout {
    key: LayoutKey,
    line_rows: Vec<usize>,
    height: usize,
}

impl BubbleLayout {
    pub fn measure(bubble: &Bubble, width: u16, show_timestamps: bool) -> Self {
        // Styling does not affect wrapping, so any theme gives the same counts.
        let line_rows: Vec<usize> =
            bubble_lines(bubble, &ColorTheme::default(), width, show_timestamps)
                .iter()
                .map(|line| wrapped_rows(line, width))
                .collect();
        Self {
            key: LayoutKey::of(bubble, width, show_timestamps),
            height: line_rows.iter().sum(),
            line_rows,
        }
    }

    pub fn is_current(&self, bubble: &Bubble, width: u16, show_timestamps: bool) -> bool {
        self.key == LayoutKey::of(bubble, width, show_timestamps)
    }

    /// Total rows of the bubble.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Rows taken by each line, in [`bubble_lines`] order.
    pub fn line_rows(&self) -> &[usize] {
        &self.line_rows
    }
}

/// Lines covering `rows` content rows starting at the view's scroll position.
///
/// Only bubbles that intersect the viewport are laid out. The second value is how many rows of
/// the first returned line lie above the viewport; it is non-zero only when that line wraps.
pub fn visible_lines(
    view: &ChatView,
    theme: &ColorTheme,
    rows: usize,
) -> (Vec<Line<'static>>, usize) {
    let top = view.scroll_top;
    let bottom = top.saturating_add(rows);
    let width = view.viewport_width;

    let mut lines = Vec::new();
    let mut skip = 0;
    let mut row = 0;

    for (idx, bubble) in view.bubbles.iter().enumerate() {
        if row >= bottom {
            break;
        }
        if idx > 0 {
            if row >= top {
                lines.push(Line::default());
            }
            row += 1;
        }

        let measured;
        let layout = match view.bubble_layout(idx) {
            Some(layout) => layout,
            None => {
                measured = BubbleLayout::measure(bubble, width, view.show_timestamps);
                &measured
            }
        };
        if row + layout.height() <= top {
            row += layout.height();
            continue;
        }

        let rendered = bubble_lines(bubble, theme, width, view.show_timestamps);
        for (line, &count) in rendered.into_iter().zip(layout.line_rows()) {
            if row >= bottom {
                break;
            }
            if row + count > top {
                if lines.is_empty() {
                    skip = top.saturating_sub(row);
                }
                lines.push(line);
            }
            row += count;
        }
    }

    (lines, skip)
}

/// Placeholder shown when the transcript has no messages.
pub fn empty_state_lines(theme: &ColorTheme) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled("Welcome! 👋", theme.heading)).alignment(Alignment::Center),
        Line::default(),
        Line::from(Span::styled(
            "This conversation has no messages yet.",
            theme.normal_text,
        ))
        .alignment(Alignment::Center),
    ]
}

/// Format a timestamp as a 24-hour `HH:MM` clock in its own time zone.
pub fn format_clock<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.format("%H:%M").to_string()
}

/// Format a UTC timestamp in the local time zone.
pub fn local_clock(timestamp: &DateTime<Utc>) -> String {
    format_clock(&timestamp.with_timezone(&Local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Message, Sender};
    use crate::session::RenderSession;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn bubble(message: Message, animate: bool) -> Bubble {
        let session = RenderSession::start(1, Some(&message.text), message.sender, animate);
        Bubble::new(message, session)
    }

    #[test]
    fn bot_bubble_renders_markdown() {
        let theme = ColorTheme::default();
        let b = bubble(
            Message::bot("# Budget\n---\nSave **more** via [apps](https://x.io)"),
            false,
        );
        let lines = bubble_lines(&b, &theme, 20, true);

        assert_eq!(text_of(&lines[0]), "Assistant");
        assert_eq!(text_of(&lines[1]), "Budget");
        assert_eq!(lines[1].spans[0].style, theme.heading);
        assert_eq!(text_of(&lines[2]), "─".repeat(14));
        // Bold lines keep link markup literal.
        assert_eq!(text_of(&lines[3]), "Save more via [apps](https://x.io)");
        assert_eq!(lines[3].spans[1].style, theme.bold);
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn links_show_target() {
        let theme = ColorTheme::default();
        let lines = block_lines(&crate::markdown::render("See [docs](https://x.io)"), &theme, 40);
        assert_eq!(text_of(&lines[0]), "See docs <https://x.io>");
        assert_eq!(lines[0].spans[1].style, theme.link);
    }

    #[test]
    fn user_bubble_is_raw_and_right_aligned() {
        let theme = ColorTheme::default();
        let b = bubble(Message::user("is **this** bold?\nno"), false);
        let lines = bubble_lines(&b, &theme, 40, true);

        assert_eq!(text_of(&lines[0]), "You");
        assert_eq!(text_of(&lines[1]), "is **this** bold?");
        assert_eq!(text_of(&lines[2]), "no");
        assert!(lines
            .iter()
            .all(|line| line.alignment == Some(Alignment::Right)));
    }

    #[test]
    fn revealing_bot_bubble_shows_cursor() {
        let theme = ColorTheme::default();
        let mut b = bubble(Message::bot("Hello"), true);

        let lines = bubble_lines(&b, &theme, 40, false);
        assert_eq!(lines.len(), 2);
        assert_eq!(text_of(&lines[1]), CURSOR_GLYPH);

        b.session.tick();
        b.session.tick();
        let lines = bubble_lines(&b, &theme, 40, false);
        assert_eq!(text_of(&lines[1]), format!("He{CURSOR_GLYPH}"));

        b.session.skip();
        let lines = bubble_lines(&b, &theme, 40, false);
        assert_eq!(text_of(&lines[1]), "Hello");
    }

    #[test]
    fn timestamp_line_is_optional() {
        let theme = ColorTheme::default();
        let when = Utc::now();
        let b = bubble(Message::bot("hi").with_timestamp(when), false);

        assert_eq!(bubble_lines(&b, &theme, 40, true).len(), 3);
        assert_eq!(bubble_lines(&b, &theme, 40, false).len(), 2);
    }

    #[test]
    fn format_clock_uses_24_hour_minutes() {
        let when = Utc.with_ymd_and_hms(2024, 3, 1, 17, 5, 59).unwrap();
        assert_eq!(format_clock(&when), "17:05");
    }

    fn view_with(bubbles: Vec<Bubble>, width: u16, height: u16) -> ChatView {
        let mut view = ChatView::new("chat.json", width, height, false);
        for b in bubbles {
            view.push_bubble(b);
        }
        view
    }

    #[test]
    fn conversation_separates_bubbles() {
        let theme = ColorTheme::default();
        let view = view_with(
            vec![
                bubble(Message::user("q"), false),
                bubble(Message::bot("a"), false),
            ],
            40,
            10,
        );
        let (lines, skip) = visible_lines(&view, &theme, 9);
        assert_eq!(skip, 0);
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts, vec!["You", "q", "", "Assistant", "a"]);
        assert_eq!(view.content_height(), 5);
    }

    #[test]
    fn layout_counts_wrapped_rows() {
        let b = bubble(Message::bot("x".repeat(25)), false);
        let layout = BubbleLayout::measure(&b, 10, false);
        assert_eq!(layout.line_rows(), &[1, 3]);
        assert_eq!(layout.height(), 4);
        assert_eq!(BubbleLayout::measure(&b, 0, false).height(), 2);
    }

    #[test]
    fn layout_goes_stale_when_session_ticks() {
        let mut b = bubble(Message::bot("Hello").animated(), true);
        let layout = BubbleLayout::measure(&b, 40, false);
        assert!(layout.is_current(&b, 40, false));
        assert!(!layout.is_current(&b, 30, false));
        assert!(!layout.is_current(&b, 40, true));

        b.session.tick();
        assert!(!layout.is_current(&b, 40, false));
    }

    #[test]
    fn visible_lines_start_at_scroll_position() {
        let theme = ColorTheme::default();
        let body = (0..50).map(|i| format!("row {i}")).collect::<Vec<_>>().join("\n");
        let mut view = view_with(
            vec![bubble(Message::user("first"), false), bubble(Message::bot(body), false)],
            40,
            6,
        );
        view.go_to_start();
        view.scroll_by(10);

        let (lines, skip) = visible_lines(&view, &theme, 5);
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        // Rows: "You", "first", separator, "Assistant", then "row 0" at row 4.
        assert_eq!(texts, vec!["row 6", "row 7", "row 8", "row 9", "row 10"]);
        assert_eq!(skip, 0);
    }

    #[test]
    fn visible_lines_report_partially_scrolled_line() {
        let theme = ColorTheme::default();
        let mut view = view_with(vec![bubble(Message::bot("y".repeat(30)), false)], 10, 3);
        view.go_to_start();
        view.scroll_by(2);

        let (lines, skip) = visible_lines(&view, &theme, 2);
        assert_eq!(lines.len(), 1);
        assert_eq!(skip, 1);
    }

    #[test]
    fn empty_state_has_welcome_line() {
        let lines = empty_state_lines(&ColorTheme::default());
        assert!(text_of(&lines[0]).starts_with("Welcome"));
        assert!(lines.iter().all(|line| line.alignment != Some(Alignment::Right)));
    }
}
