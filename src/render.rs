//! Rendering subsystem.
//!
//! `service` owns the conversation view and applies input actions and reveal ticks to it,
//! `ui` draws that view in the terminal, and `plain` flattens a transcript to text for
//! non-interactive output.

pub mod plain;
pub mod service;
pub mod ui;

pub use service::{LoopControl, RenderLoopState};
