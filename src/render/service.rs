//! Render coordination.
//!
//! `RenderLoopState` is the single writer of the conversation view. It turns input actions
//! and reveal ticks into view updates and reports whether anything needs redrawing.

use crate::input::{InputAction, ScrollDirection};
use crate::message::Message;
use crate::render::ui::state::{Bubble, ChatView};
use crate::reveal::{BubbleId, RevealDriver, RevealTick};
use crate::session::TickOutcome;
use log::debug;

/// What the render loop should do after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Draw the view again.
    Redraw,
    /// Nothing visible changed.
    Unchanged,
    /// Leave the loop.
    Quit,
}

/// Tracks render-related state that must persist across input actions and reveal ticks.
pub struct RenderLoopState {
    driver: RevealDriver,
    animate: bool,
}

impl RenderLoopState {
    /// `animate` gates the per-message typing flag; when false every message appears at once.
    pub fn new(driver: RevealDriver, animate: bool) -> Self {
        Self { driver, animate }
    }

    pub fn driver(&self) -> &RevealDriver {
        &self.driver
    }

    /// Append a message as a new bubble, starting its reveal session.
    pub fn push_message(&mut self, view: &mut ChatView, message: Message) -> BubbleId {
        let bubble = view.bubbles.len();
        let animate = self.animate && message.animate;
        let session = self
            .driver
            .start(bubble, Some(&message.text), message.sender, animate);
        let id = view.push_bubble(Bubble::new(message, session));
        view.content_changed();
        id
    }

    pub fn load_messages(&mut self, view: &mut ChatView, messages: Vec<Message>) {
        for message in messages {
            self.push_message(view, message);
        }
    }

    /// Replace the message shown in a bubble. Any reveal in progress for it is abandoned.
    pub fn replace_message(
        &mut self,
        view: &mut ChatView,
        bubble: BubbleId,
        message: Message,
        animate: bool,
    ) -> bool {
        let Some(slot) = view.bubble_mut(bubble) else {
            return false;
        };
        let session = self
            .driver
            .start(bubble, Some(&message.text), message.sender, animate);
        *slot = Bubble::new(message, session);
        view.content_changed();
        true
    }

    pub fn process_action(&mut self, action: InputAction, view: &mut ChatView) -> LoopControl {
        match action {
            InputAction::Quit => LoopControl::Quit,
            InputAction::Scroll { direction, lines } => {
                let lines = i64::try_from(lines).unwrap_or(i64::MAX);
                let delta = match direction {
                    ScrollDirection::Up => -lines,
                    ScrollDirection::Down => lines,
                };
                view.scroll_by(delta);
                LoopControl::Redraw
            }
            InputAction::PageUp => {
                view.scroll_by(-(view.lines_per_page() as i64));
                LoopControl::Redraw
            }
            InputAction::PageDown => {
                view.scroll_by(view.lines_per_page() as i64);
                LoopControl::Redraw
            }
            InputAction::GoToStart => {
                view.go_to_start();
                LoopControl::Redraw
            }
            InputAction::GoToEnd => {
                view.go_to_end();
                LoopControl::Redraw
            }
            InputAction::SkipAnimation => {
                let mut skipped = 0;
                for (id, bubble) in view.bubbles.iter_mut().enumerate() {
                    if self.driver.skip(id, &mut bubble.session) {
                        skipped += 1;
                    }
                }
                if skipped == 0 {
                    return LoopControl::Unchanged;
                }
                view.status_line.clear();
                view.content_changed();
                LoopControl::Redraw
            }
            InputAction::ReplayLast => {
                let Some(id) = view.last_bot_bubble() else {
                    view.status_line.set_message("No assistant reply to replay");
                    return LoopControl::Redraw;
                };
                let message = view.bubbles[id].message.clone();
                self.replace_message(view, id, message, true);
                view.follow_tail = true;
                view.content_changed();
                view.status_line.clear();
                debug!("replaying bubble {id}");
                LoopControl::Redraw
            }
            InputAction::Resize { width, height } => {
                if view.update_terminal_size(width, height) {
                    view.content_changed();
                    LoopControl::Redraw
                } else {
                    LoopControl::Unchanged
                }
            }
            InputAction::NoAction | InputAction::InvalidInput => LoopControl::Unchanged,
        }
    }

    /// Apply a reveal tick to the bubble it targets.
    pub fn handle_tick(&mut self, tick: RevealTick, view: &mut ChatView) -> LoopControl {
        let Some(bubble) = view.bubble_mut(tick.bubble) else {
            // Bubble vanished; make sure nothing keeps ticking for it.
            self.driver.cancel(tick.bubble);
            return LoopControl::Unchanged;
        };

        match self.driver.apply(tick, &mut bubble.session) {
            TickOutcome::Idle => LoopControl::Unchanged,
            TickOutcome::Advanced { .. } => {
                view.content_changed();
                LoopControl::Redraw
            }
            TickOutcome::Completed => {
                debug!("bubble {}: reveal complete", tick.bubble);
                view.content_changed();
                LoopControl::Redraw
            }
        }
    }

    /// Stop all reveal tickers.
    pub fn shutdown(&mut self) {
        self.driver.shutdown();
    }
}
