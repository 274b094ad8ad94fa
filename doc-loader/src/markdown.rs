//! Plain-text extraction from Markdown.

use pulldown_cmark::{Event, Parser};

/// Strip Markdown structure from `source`, returning the readable text.
///
/// Headings, emphasis, links, and list markers are dropped; inline and
/// fenced code are kept as text. Block boundaries collapse to single spaces
/// so the result is one flat string suitable as embedding input.
pub fn extract_plain_text(source: &str) -> String {
    let mut text = String::with_capacity(source.len());

    for event in Parser::new(source) {
        match event {
            Event::Text(t) | Event::Code(t) => {
                text.push_str(&t);
                text.push(' ');
            }
            Event::SoftBreak | Event::HardBreak => {
                text.push(' ');
            }
            _ => {}
        }
    }

    let trimmed: Vec<&str> = text.split_whitespace().collect();
    trimmed.join(" ")
}
