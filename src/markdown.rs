//! Lightweight markdown formatting for chat bubbles.
//!
//! Bot replies use a tiny markdown dialect. Every input line maps to exactly one
//! [`DisplayBlock`]:
//!
//! - `# Title` becomes a heading (only a single hash followed by a space)
//! - a line that trims to `---` becomes a horizontal rule
//! - a line that trims to nothing becomes a blank line
//! - anything else becomes a paragraph of [`InlineSpan`]s
//!
//! Inside a paragraph, `**bold**` runs are resolved first. Links of the form `[text](url)` are
//! only recognised on lines that contain no bold run, so a line mixing both keeps its link
//! markup as literal text. Unmatched delimiters are never an error; they stay in the output
//! verbatim.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*.*?\*\*").expect("bold regex pattern is valid"));

static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link regex pattern is valid")
});

/// Marker that opens a heading line.
const HEADING_PREFIX: &str = "# ";
/// Content of a horizontal rule line once surrounding whitespace is trimmed.
const RULE_MARKER: &str = "---";
/// Length of the `**` delimiter.
const BOLD_DELIMITER_LEN: usize = 2;

/// One formatted run of text within a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineSpan {
    PlainText(String),
    Bold(String),
    Link { text: String, url: String },
}

/// One structural unit of rendered output, derived from exactly one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayBlock {
    Heading(String),
    Rule,
    Paragraph(Vec<InlineSpan>),
    BlankLine,
}

/// Render text into display blocks, one per `\n`-separated line.
///
/// The function is pure: the same input always yields the same blocks.
pub fn render(text: &str) -> Vec<DisplayBlock> {
    text.split('\n').map(render_line).collect()
}

/// Classify a single line.
pub fn render_line(line: &str) -> DisplayBlock {
    if let Some(title) = line.strip_prefix(HEADING_PREFIX) {
        return DisplayBlock::Heading(title.to_string());
    }

    let trimmed = line.trim();
    if trimmed == RULE_MARKER {
        return DisplayBlock::Rule;
    }
    if trimmed.is_empty() {
        return DisplayBlock::BlankLine;
    }

    DisplayBlock::Paragraph(inline_spans(line))
}

/// Split a paragraph line into inline spans.
pub fn inline_spans(line: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for found in BOLD_RE.find_iter(line) {
        push_plain(&mut spans, &line[cursor..found.start()]);
        let inner = &line[found.start() + BOLD_DELIMITER_LEN..found.end() - BOLD_DELIMITER_LEN];
        spans.push(InlineSpan::Bold(inner.to_string()));
        cursor = found.end();
    }

    // Link detection only runs while the line is still flat text.
    if cursor == 0 {
        return link_spans(line);
    }

    push_plain(&mut spans, &line[cursor..]);
    spans
}

fn link_spans(line: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for caps in LINK_RE.captures_iter(line) {
        let (Some(whole), Some(text), Some(url)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        push_plain(&mut spans, &line[cursor..whole.start()]);
        spans.push(InlineSpan::Link {
            text: text.as_str().to_string(),
            url: url.as_str().to_string(),
        });
        cursor = whole.end();
    }

    push_plain(&mut spans, &line[cursor..]);
    spans
}

fn push_plain(spans: &mut Vec<InlineSpan>, text: &str) {
    if !text.is_empty() {
        spans.push(InlineSpan::PlainText(text.to_string()));
    }
}
