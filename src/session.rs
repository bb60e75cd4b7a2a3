//! Per-bubble reveal state machine.
//!
//! A [`RenderSession`] tracks how much of one message is currently visible. It is a plain value:
//! nothing in here knows about timers. The [`reveal`](crate::reveal) module drives sessions on a
//! tokio interval and is responsible for dropping ticks that belong to a replaced session.
//!
//! Progress is measured in extended grapheme clusters so that an emoji or an accented letter
//! written with combining marks appears in a single step.

use crate::markdown::{self, DisplayBlock};
use crate::message::Sender;
use unicode_segmentation::UnicodeSegmentation;

/// Identifier distinguishing successive sessions, so late ticks can be recognised as stale.
pub type SessionId = u64;

/// Result of applying one tick to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// One more unit became visible; the session is still revealing.
    Advanced { revealed: usize },
    /// This tick revealed the final unit.
    Completed,
    /// Nothing changed (the session was already complete, or the tick was stale).
    Idle,
}

/// Reveal progress for one displayed message.
#[derive(Debug, Clone)]
pub struct RenderSession {
    id: SessionId,
    sender: Sender,
    source: String,
    /// Byte offset at which each grapheme ends.
    boundaries: Vec<usize>,
    revealed: usize,
    complete: bool,
}

impl RenderSession {
    /// Start a session for a message.
    ///
    /// Only bot messages with `animate` set start revealing from zero; everything else is shown
    /// in full immediately. An absent message is treated as empty, and an empty message is
    /// complete from the start.
    pub fn start(id: SessionId, message: Option<&str>, sender: Sender, animate: bool) -> Self {
        let source = message.unwrap_or_default().to_string();
        let boundaries: Vec<usize> = source
            .grapheme_indices(true)
            .map(|(offset, grapheme)| offset + grapheme.len())
            .collect();
        let total = boundaries.len();

        let animating = sender.is_bot() && animate && total > 0;
        Self {
            id,
            sender,
            source,
            boundaries,
            revealed: if animating { 0 } else { total },
            complete: !animating,
        }
    }

    /// Advance by exactly one unit.
    pub fn tick(&mut self) -> TickOutcome {
        if self.complete {
            return TickOutcome::Idle;
        }

        if self.revealed < self.boundaries.len() {
            self.revealed += 1;
        }

        if self.revealed >= self.boundaries.len() {
            self.complete = true;
            TickOutcome::Completed
        } else {
            TickOutcome::Advanced {
                revealed: self.revealed,
            }
        }
    }

    /// Reveal everything at once. Returns `true` if the session was still revealing.
    pub fn skip(&mut self) -> bool {
        if self.complete {
            return false;
        }
        self.revealed = self.boundaries.len();
        self.complete = true;
        true
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn source_text(&self) -> &str {
        &self.source
    }

    /// Total number of reveal units in the message.
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    pub fn revealed_length(&self) -> usize {
        self.revealed
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Whether a typing cursor should be painted after the text.
    pub fn shows_cursor(&self) -> bool {
        self.sender.is_bot() && !self.complete
    }

    /// The currently visible prefix of the message.
    pub fn revealed_text(&self) -> &str {
        match self.revealed {
            0 => "",
            n => &self.source[..self.boundaries[n - 1]],
        }
    }

    /// Display blocks for the visible prefix. Nothing visible means no blocks at all.
    pub fn blocks(&self) -> Vec<DisplayBlock> {
        let visible = self.revealed_text();
        if visible.is_empty() {
            return Vec::new();
        }
        markdown::render(visible)
    }
}
