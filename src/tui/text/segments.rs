//! Message segmentation: split content into text and fenced code blocks.

/// Segment of a message: either plain text or a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MessageSegment<'a> {
    Text(&'a str),
    CodeBlock { lang: &'a str, code: &'a str },
}

/// Parse message content into text and code block segments.
/// The language is the first word of the fence info string; an unclosed fence
/// runs to the end of the message.
pub(crate) fn parse_message_segments(content: &str) -> Vec<MessageSegment<'_>> {
    let mut segments = Vec::new();
    let mut rest = content;
    loop {
        let Some(idx) = rest.find("```") else {
            if !rest.is_empty() {
                segments.push(MessageSegment::Text(rest));
            }
            break;
        };
        if idx > 0 {
            segments.push(MessageSegment::Text(&rest[..idx]));
        }
        rest = &rest[idx + 3..];
        let info_end = rest.find('\n').unwrap_or(rest.len());
        let lang = rest[..info_end].split_whitespace().next().unwrap_or("");
        rest = rest.get(info_end + 1..).unwrap_or("");
        // Closing fence: "\n```" on its own line, or "```" right after the code.
        let Some(pos) = rest.find("\n```").or_else(|| rest.find("```")) else {
            segments.push(MessageSegment::CodeBlock { lang, code: rest });
            break;
        };
        let fence_len = if rest[pos..].starts_with('\n') { 4 } else { 3 };
        segments.push(MessageSegment::CodeBlock {
            lang,
            code: &rest[..pos],
        });
        rest = &rest[pos + fence_len..];
    }
    segments
}
