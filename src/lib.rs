//! # chatbubble - Terminal Chat Transcript Viewer
//!
//! Renders chat transcripts in the terminal the way a chat bubble UI does: bot replies are
//! revealed one grapheme at a time to simulate typing, and their text is formatted with a small
//! markdown dialect (headings, rules, bold runs and links).
//!
//! ## Architecture
//!
//! The library is split so that pure computation stays apart from scheduled side effects:
//!
//! - [`markdown`] - Pure line-based markdown parser producing display blocks
//! - [`session`] - Per-bubble reveal state machine (start / tick / skip)
//! - [`reveal`] - Timer adapter driving sessions on a tokio interval
//! - [`transcript`] - Chat history loading from JSON files
//! - [`render`] - Display surfaces (terminal UI and plain text) and the render coordinator
//! - [`input`] - Keyboard handling for the interactive viewer
//! - [`app`] - Application event loop wiring everything together

// Core modules
pub mod error;
pub mod markdown;
pub mod message;
pub mod session;

// Scheduling and IO
pub mod config;
pub mod reveal;
pub mod transcript;

// Interactive surface
pub mod app;
pub mod input;
pub mod render;

// Re-export commonly used types for convenience
pub use error::{BubbleError, Result};

// Public API surface for external usage
pub use app::Application;
pub use config::Config;
pub use markdown::{render, DisplayBlock, InlineSpan};
pub use message::{Message, Sender};
pub use reveal::RevealDriver;
pub use session::{RenderSession, SessionId, TickOutcome};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
