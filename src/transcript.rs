//! Chat transcript loading.
//!
//! A transcript is a JSON array of message records in the shape returned by the chat history
//! API: `message`, `sender`, `createdAt`, plus the optional `isTyping` and `sentiment` fields.
//! An object wrapping the array under a `messages` key is accepted too.

pub mod validation;

pub use validation::{validate_transcript_path, MAX_TRANSCRIPT_SIZE};

use crate::error::Result;
use crate::message::Message;
use log::info;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
struct WrappedTranscript {
    messages: Vec<Message>,
}

/// Parse transcript JSON held in memory.
pub fn parse_transcript(contents: &str) -> Result<Vec<Message>> {
    let value: serde_json::Value = serde_json::from_str(contents)?;
    let messages = match value {
        serde_json::Value::Array(_) => Vec::<Message>::deserialize(value)?,
        other => WrappedTranscript::deserialize(other)?.messages,
    };
    Ok(messages)
}

/// Validate, read and parse a transcript file.
pub fn load_transcript(path: &Path) -> Result<Vec<Message>> {
    let size = validate_transcript_path(path)?;
    let contents = std::fs::read_to_string(path)?;
    let messages = parse_transcript(&contents)?;
    info!(
        "loaded {} messages ({} bytes) from {}",
        messages.len(),
        size,
        path.display()
    );
    Ok(messages)
}
