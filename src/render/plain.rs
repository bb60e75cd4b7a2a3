//! Plain-text surface.
//!
//! Used when output is not an interactive terminal (`--plain`): every message is printed in
//! full, with markdown flattened into readable text.

use crate::markdown::{self, DisplayBlock, InlineSpan};
use crate::message::{Message, Sender};
use crate::render::ui::layout::local_clock;
use std::fmt::Write;
use unicode_segmentation::UnicodeSegmentation;

const RULE_WIDTH: usize = 40;

/// Flatten display blocks into text, one output line per block.
///
/// Headings are underlined with `=`, rules become a dash line, bold runs keep their text and
/// links are written as `text <url>`.
pub fn render_blocks(blocks: &[DisplayBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            DisplayBlock::Heading(title) => {
                out.push_str(title);
                out.push('\n');
                out.push_str(&"=".repeat(title.graphemes(true).count().max(1)));
            }
            DisplayBlock::Rule => out.push_str(&"-".repeat(RULE_WIDTH)),
            DisplayBlock::Paragraph(spans) => {
                for span in spans {
                    match span {
                        InlineSpan::PlainText(text) | InlineSpan::Bold(text) => out.push_str(text),
                        InlineSpan::Link { text, url } => {
                            let _ = write!(out, "{text} <{url}>");
                        }
                    }
                }
            }
            DisplayBlock::BlankLine => {}
        }
        out.push('\n');
    }
    out
}

/// Render a whole transcript. Assistant replies are formatted, user text is printed verbatim.
pub fn render_transcript(messages: &[Message], show_timestamps: bool) -> String {
    let mut out = String::new();
    for (idx, message) in messages.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }

        out.push_str(message.sender.label());
        if show_timestamps {
            if let Some(created_at) = &message.created_at {
                let _ = write!(out, " [{}]", local_clock(created_at));
            }
        }
        out.push_str(":\n");

        match message.sender {
            Sender::Bot if !message.text.is_empty() => {
                out.push_str(&render_blocks(&markdown::render(&message.text)));
            }
            _ => {
                out.push_str(&message.text);
                out.push('\n');
            }
        }
    }
    out
}
