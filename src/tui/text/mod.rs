//! Terminal rendering of normalized Markdown: segmentation, inline styling, wrapping.

mod markdown;
mod segments;

pub(crate) use markdown::parse_markdown_inline;
pub(crate) use segments::{MessageSegment, parse_message_segments};

/// Split a message into display lines respecting message newlines, then wrap to `width`.
/// Uses textwrap for correct UTF-8 handling; width 0 disables wrapping.
pub(crate) fn wrap_message(msg: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in msg.split('\n') {
        if line.is_empty() || width == 0 {
            out.push(line.to_string());
            continue;
        }
        let indent: String = line.chars().take_while(|c| *c == ' ').collect();
        let options = textwrap::Options::new(width).subsequent_indent(&indent);
        out.extend(textwrap::wrap(line, options).into_iter().map(|c| c.into_owned()));
    }
    out
}
