//! Keyboard state machine and polling service.
//!
//! Bindings follow `less`: `j`/`k` scroll, space and `b` page, `g`/`G` jump. A numeric prefix
//! repeats line scrolls (`5j` scrolls five lines). Two keys are specific to the chat viewer:
//! `s` skips running typing animations and `r` replays the last assistant reply.

use crate::error::Result;
use log::warn;
use ratatui::crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Number of lines produced by a single mouse wheel tick.
const MOUSE_SCROLL_LINES: u64 = 3;
/// Largest accepted numeric prefix.
const MAX_COUNT_PREFIX: u64 = 9_999;

/// Direction for scroll actions emitted by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// High-level input actions consumed by the render coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Scroll {
        direction: ScrollDirection,
        lines: u64,
    },
    PageUp,
    PageDown,
    GoToStart,
    GoToEnd,
    /// Finish every running typing animation.
    SkipAnimation,
    /// Restart the typing animation of the most recent assistant reply.
    ReplayLast,
    Quit,
    Resize {
        width: u16,
        height: u16,
    },
    NoAction,
    InvalidInput,
}

/// Translates key presses into actions, tracking an optional numeric prefix.
#[derive(Debug, Default)]
pub struct InputStateMachine {
    count_prefix: Option<u64>,
}

impl InputStateMachine {
    pub fn new() -> Self {
        Self { count_prefix: None }
    }

    pub fn pending_count(&self) -> Option<u64> {
        self.count_prefix
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> InputAction {
        if key_event.kind != KeyEventKind::Press {
            return InputAction::NoAction;
        }

        let modifiers = key_event.modifiers;
        if modifiers.contains(KeyModifiers::CONTROL) {
            self.count_prefix = None;
            return match key_event.code {
                KeyCode::Char('c') => InputAction::Quit,
                KeyCode::Char('d') => InputAction::PageDown,
                KeyCode::Char('u') => InputAction::PageUp,
                _ => InputAction::InvalidInput,
            };
        }
        if modifiers.contains(KeyModifiers::ALT) {
            self.count_prefix = None;
            return InputAction::InvalidInput;
        }

        if let KeyCode::Char(digit @ '0'..='9') = key_event.code {
            // A leading zero is not a count.
            if digit != '0' || self.count_prefix.is_some() {
                let value = u64::from(digit as u8 - b'0');
                let count = self
                    .count_prefix
                    .unwrap_or(0)
                    .saturating_mul(10)
                    .saturating_add(value)
                    .min(MAX_COUNT_PREFIX);
                self.count_prefix = Some(count);
                return InputAction::NoAction;
            }
        }

        let count = self.count_prefix.take().unwrap_or(1);
        match key_event.code {
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Enter => InputAction::Scroll {
                direction: ScrollDirection::Down,
                lines: count,
            },
            KeyCode::Char('k') | KeyCode::Up => InputAction::Scroll {
                direction: ScrollDirection::Up,
                lines: count,
            },
            KeyCode::Char(' ') | KeyCode::Char('f') | KeyCode::PageDown => InputAction::PageDown,
            KeyCode::Char('b') | KeyCode::PageUp => InputAction::PageUp,
            KeyCode::Char('g') | KeyCode::Home => InputAction::GoToStart,
            KeyCode::Char('G') | KeyCode::End => InputAction::GoToEnd,
            KeyCode::Char('s') => InputAction::SkipAnimation,
            KeyCode::Char('r') => InputAction::ReplayLast,
            KeyCode::Char('q') | KeyCode::Esc => InputAction::Quit,
            _ => InputAction::InvalidInput,
        }
    }
}

/// Service responsible for producing high-level `InputAction`s from terminal events.
#[derive(Debug, Default)]
pub struct InputService {
    state_machine: InputStateMachine,
}

impl InputService {
    pub fn new() -> Self {
        Self {
            state_machine: InputStateMachine::new(),
        }
    }

    /// Wait up to `timeout` for the next terminal event and translate it.
    pub fn poll_action(&mut self, timeout: Duration) -> Result<Option<InputAction>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let event = event::read()?;
        Ok(self.process_event(event))
    }

    /// Translate one terminal event, dropping events that map to nothing.
    pub fn process_event(&mut self, event: Event) -> Option<InputAction> {
        let action = match event {
            Event::Key(key_event) => self.state_machine.handle_key_event(key_event),
            Event::Resize(width, height) => InputAction::Resize { width, height },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => InputAction::Scroll {
                    direction: ScrollDirection::Down,
                    lines: MOUSE_SCROLL_LINES,
                },
                MouseEventKind::ScrollUp => InputAction::Scroll {
                    direction: ScrollDirection::Up,
                    lines: MOUSE_SCROLL_LINES,
                },
                _ => InputAction::NoAction,
            },
            _ => InputAction::NoAction,
        };

        match action {
            InputAction::NoAction | InputAction::InvalidInput => None,
            _ => Some(action),
        }
    }
}

/// Spawn a blocking thread that polls for terminal events and forwards actions to the render loop.
pub fn spawn_input_thread(
    tx: UnboundedSender<InputAction>,
    shutdown: Arc<AtomicBool>,
    poll_interval: Duration,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut service = InputService::new();
        while !shutdown.load(Ordering::SeqCst) {
            match service.poll_action(poll_interval) {
                Ok(Some(action)) => {
                    if tx.send(action).is_err() {
                        return;
                    }
                }
                Ok(None) => continue,
                Err(err) => {
                    warn!("input thread stopped: {}", err);
                    break;
                }
            }
        }
    })
}
