//! Conversation view state.
//!
//! `ChatView` owns the bubbles currently on screen and the scroll position. Rendering reads it;
//! only the render coordinator mutates it.

use crate::message::Message;
use crate::render::ui::layout::BubbleLayout;
use crate::reveal::BubbleId;
use crate::session::RenderSession;

/// Rows reserved for the status line at the bottom of the screen.
const STATUS_ROWS: u16 = 1;

/// One message on screen together with its reveal session.
#[derive(Debug, Clone)]
pub struct Bubble {
    pub message: Message,
    pub session: RenderSession,
}

impl Bubble {
    pub fn new(message: Message, session: RenderSession) -> Self {
        Self { message, session }
    }

    pub fn is_revealing(&self) -> bool {
        !self.session.is_complete()
    }
}

/// Status line content.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    /// Transient message (errors, notices) replacing the position info
    pub message: Option<String>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self { message: None }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn clear(&mut self) {
        self.message = None;
    }
}

/// Viewport over the conversation.
#[derive(Debug)]
pub struct ChatView {
    /// Title shown in the status line (usually the transcript file name)
    pub title: String,

    pub bubbles: Vec<Bubble>,

    /// First content row currently visible (after wrapping)
    pub scroll_top: usize,

    /// Keep the newest content in view while replies are being revealed
    pub follow_tail: bool,

    pub show_timestamps: bool,

    pub status_line: StatusLine,

    pub viewport_width: u16,
    pub viewport_height: u16,

    /// Wrapped row counts per bubble, refreshed by [`ChatView::refresh_layout`]
    layouts: Vec<BubbleLayout>,
    /// Sum of bubble heights plus separator rows
    total_rows: usize,
}

impl ChatView {
    pub fn new(
        title: impl Into<String>,
        viewport_width: u16,
        viewport_height: u16,
        show_timestamps: bool,
    ) -> Self {
        Self {
            title: title.into(),
            bubbles: Vec::new(),
            scroll_top: 0,
            follow_tail: true,
            show_timestamps,
            status_line: StatusLine::new(),
            viewport_width,
            viewport_height,
            layouts: Vec::new(),
            total_rows: 0,
        }
    }

    pub fn push_bubble(&mut self, bubble: Bubble) -> BubbleId {
        self.bubbles.push(bubble);
        self.refresh_layout();
        self.bubbles.len() - 1
    }

    /// Re-measure bubbles whose session or the viewport changed since they were last measured.
    ///
    /// Returns the number of bubbles measured again.
    pub fn refresh_layout(&mut self) -> usize {
        let width = self.viewport_width;
        let show_timestamps = self.show_timestamps;
        self.layouts.truncate(self.bubbles.len());

        let mut measured = 0;
        for (idx, bubble) in self.bubbles.iter().enumerate() {
            match self.layouts.get_mut(idx) {
                Some(layout) if layout.is_current(bubble, width, show_timestamps) => {}
                Some(layout) => {
                    *layout = BubbleLayout::measure(bubble, width, show_timestamps);
                    measured += 1;
                }
                None => {
                    self.layouts
                        .push(BubbleLayout::measure(bubble, width, show_timestamps));
                    measured += 1;
                }
            }
        }

        let separators = self.bubbles.len().saturating_sub(1);
        self.total_rows = self.layouts.iter().map(BubbleLayout::height).sum::<usize>() + separators;
        measured
    }

    /// Cached layout of a bubble, if it is still valid for the current viewport.
    pub fn bubble_layout(&self, id: BubbleId) -> Option<&BubbleLayout> {
        let bubble = self.bubbles.get(id)?;
        self.layouts
            .get(id)
            .filter(|layout| layout.is_current(bubble, self.viewport_width, self.show_timestamps))
    }

    pub fn bubble(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.get(id)
    }

    pub fn bubble_mut(&mut self, id: BubbleId) -> Option<&mut Bubble> {
        self.bubbles.get_mut(id)
    }

    /// Most recent assistant bubble.
    pub fn last_bot_bubble(&self) -> Option<BubbleId> {
        self.bubbles
            .iter()
            .rposition(|bubble| bubble.message.sender.is_bot())
    }

    /// Number of bubbles still revealing text.
    pub fn revealing_count(&self) -> usize {
        self.bubbles.iter().filter(|b| b.is_revealing()).count()
    }

    /// Rows available for conversation content.
    pub fn lines_per_page(&self) -> usize {
        self.viewport_height.saturating_sub(STATUS_ROWS).max(1) as usize
    }

    /// Total content rows after wrapping to the viewport width, as of the last refresh.
    pub fn content_height(&self) -> usize {
        self.total_rows
    }

    /// Largest useful scroll position.
    pub fn max_scroll(&self) -> usize {
        self.content_height().saturating_sub(self.lines_per_page())
    }

    /// Update terminal size, returning true if it changed.
    pub fn update_terminal_size(&mut self, width: u16, height: u16) -> bool {
        if self.viewport_width == width && self.viewport_height == height {
            return false;
        }
        self.viewport_width = width;
        self.viewport_height = height;
        self.refresh_layout();
        self.clamp_scroll();
        true
    }

    /// Scroll by a signed number of rows. Scrolling up detaches from the tail.
    pub fn scroll_by(&mut self, delta: i64) {
        let max = self.max_scroll();
        let target = if delta < 0 {
            self.scroll_top.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.scroll_top.saturating_add(delta as usize)
        };
        self.scroll_top = target.min(max);
        self.follow_tail = self.scroll_top >= max;
    }

    pub fn go_to_start(&mut self) {
        self.scroll_top = 0;
        self.follow_tail = self.max_scroll() == 0;
    }

    pub fn go_to_end(&mut self) {
        self.scroll_top = self.max_scroll();
        self.follow_tail = true;
    }

    /// Re-measure changed bubbles and re-apply the tail-follow policy.
    pub fn content_changed(&mut self) {
        self.refresh_layout();
        if self.follow_tail {
            self.scroll_top = self.max_scroll();
        } else {
            self.clamp_scroll();
        }
    }

    /// Whether the last content row is visible.
    pub fn at_end(&self) -> bool {
        self.scroll_top >= self.max_scroll()
    }

    /// Position summary for the status line, e.g. `rows 1-23/80` or `(END)`.
    pub fn position_summary(&self) -> String {
        let total = self.content_height();
        if total == 0 {
            return "(empty)".to_string();
        }
        if self.at_end() {
            return "(END)".to_string();
        }
        let last = (self.scroll_top + self.lines_per_page()).min(total);
        format!("rows {}-{}/{}", self.scroll_top + 1, last, total)
    }

    fn clamp_scroll(&mut self) {
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;

    fn bubble(sender: Sender, text: &str) -> Bubble {
        let message = Message::new(sender, text);
        let session = RenderSession::start(0, Some(text), sender, false);
        Bubble::new(message, session)
    }

    fn tall_view() -> ChatView {
        let mut view = ChatView::new("chat.json", 40, 6, false);
        let body = (0..20)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        view.push_bubble(bubble(Sender::Bot, &body));
        view
    }

    #[test]
    fn lines_per_page_reserves_status_row() {
        let view = ChatView::new("t", 80, 24, true);
        assert_eq!(view.lines_per_page(), 23);
        let tiny = ChatView::new("t", 80, 0, true);
        assert_eq!(tiny.lines_per_page(), 1);
    }

    #[test]
    fn last_bot_bubble_skips_user_messages() {
        let mut view = ChatView::new("t", 80, 24, true);
        assert_eq!(view.last_bot_bubble(), None);
        view.push_bubble(bubble(Sender::Bot, "hello"));
        view.push_bubble(bubble(Sender::User, "thanks"));
        assert_eq!(view.last_bot_bubble(), Some(0));
    }

    #[test]
    fn scrolling_is_clamped_and_tracks_tail() {
        let mut view = tall_view();
        let max = view.max_scroll();
        assert!(max > 0);

        view.go_to_start();
        assert_eq!(view.scroll_top, 0);
        assert!(!view.follow_tail);

        view.scroll_by(-5);
        assert_eq!(view.scroll_top, 0);

        view.scroll_by(1_000);
        assert_eq!(view.scroll_top, max);
        assert!(view.follow_tail);
        assert_eq!(view.position_summary(), "(END)");

        view.scroll_by(-1);
        assert!(!view.follow_tail);
        assert!(view.position_summary().starts_with("rows "));
    }

    #[test]
    fn resize_reports_change_and_clamps() {
        let mut view = tall_view();
        view.go_to_end();
        assert!(!view.update_terminal_size(40, 6));
        assert!(view.update_terminal_size(40, 200));
        assert_eq!(view.scroll_top, 0);
    }

    #[test]
    fn status_line_messages() {
        let mut status = StatusLine::new();
        status.set_message("Replaying");
        assert_eq!(status.message.as_deref(), Some("Replaying"));
        status.clear();
        assert!(status.message.is_none());
    }

    #[test]
    fn tick_remeasures_only_the_changed_bubble() {
        let mut view = ChatView::new("t", 40, 10, false);
        for i in 0..3_000 {
            view.push_bubble(bubble(Sender::Bot, &format!("**reply** {i}")));
        }
        let message = Message::bot("typing").animated();
        let session = RenderSession::start(9, Some("typing"), Sender::Bot, true);
        let id = view.push_bubble(Bubble::new(message, session));
        assert_eq!(view.refresh_layout(), 0);

        let before = view.content_height();
        view.bubbles[id].session.tick();
        assert!(view.bubble_layout(id).is_none());
        assert_eq!(view.refresh_layout(), 1);
        assert_eq!(view.content_height(), before);
        assert!(view.bubble_layout(id).is_some());

        assert!(view.update_terminal_size(20, 10));
        assert_eq!(view.refresh_layout(), 0);
    }

    #[test]
    fn content_height_is_tracked_past_u16_rows() {
        let mut view = ChatView::new("t", 40, 10, false);
        let body = (0..70_000)
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        view.push_bubble(bubble(Sender::Bot, &body));

        assert_eq!(view.content_height(), 70_001);
        view.go_to_end();
        assert_eq!(view.scroll_top, 70_001 - 9);
        assert!(view.at_end());
    }
}
