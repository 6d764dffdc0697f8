//! Inline Markdown parsing: **bold**, `code`, ~~strike~~, links, <sup> citations,
//! headings, lists, task items, tables.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::tui::constants::ACCENT;

/// Parse one display line of Markdown into styled spans.
pub(crate) fn parse_markdown_inline(s: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let trimmed = s.trim_start();
    // Heading: starts with one or more #
    if trimmed.starts_with('#') {
        let content = trimmed.trim_start_matches('#').trim_start();
        if !content.is_empty() {
            for span in parse_markdown_inline_inner(content) {
                spans.push(Span::styled(
                    span.content,
                    span.style.fg(ACCENT).add_modifier(Modifier::BOLD),
                ));
            }
        }
        return spans;
    }
    // Bullet list: -, * or + at line start, optionally a task checkbox
    if let Some(rest) = ["- ", "* ", "+ "]
        .iter()
        .find_map(|marker| trimmed.strip_prefix(marker))
    {
        let indent = s.len() - trimmed.len();
        if indent > 0 {
            spans.push(Span::raw(" ".repeat(indent)));
        }
        if let Some(task) = rest.strip_prefix("[ ] ") {
            spans.push(Span::styled("☐ ", Style::default().fg(ACCENT)));
            spans.extend(parse_markdown_inline_inner(task));
        } else if let Some(task) = rest
            .strip_prefix("[x] ")
            .or_else(|| rest.strip_prefix("[X] "))
        {
            spans.push(Span::styled("☑ ", Style::default().fg(ACCENT)));
            spans.extend(parse_markdown_inline_inner(task));
        } else {
            spans.push(Span::styled("• ", Style::default().fg(ACCENT)));
            spans.extend(parse_markdown_inline_inner(rest));
        }
        return spans;
    }
    // Table row: | cell1 | cell2 |
    if trimmed.starts_with('|') {
        let cells: Vec<&str> = trimmed
            .trim_end()
            .trim_matches('|')
            .split('|')
            .map(|c| c.trim())
            .collect();
        if cells.iter().all(|c| is_table_rule(c)) {
            let width = trimmed.trim_end().chars().count();
            spans.push(Span::styled(
                "─".repeat(width),
                Style::default().fg(Color::DarkGray),
            ));
            return spans;
        }
        let mut first = true;
        for cell in cells {
            if !first {
                spans.push(Span::styled(" │ ", Style::default().fg(ACCENT)));
            }
            spans.extend(parse_markdown_inline_inner(cell));
            first = false;
        }
        return spans;
    }
    // Numbered list: 1. 2. etc. at line start
    if let Some((num, rest_after)) = parse_numbered_list_prefix(trimmed) {
        spans.push(Span::styled(
            format!("{}. ", num),
            Style::default().fg(ACCENT),
        ));
        spans.extend(parse_markdown_inline_inner(rest_after));
        return spans;
    }
    spans.extend(parse_markdown_inline_inner(s));
    spans
}

/// Cell of a table separator row, e.g. `---`, `:--:`.
fn is_table_rule(cell: &str) -> bool {
    !cell.is_empty() && cell.contains('-') && cell.chars().all(|c| c == '-' || c == ':')
}

/// Parse "N. " or "N) " at start. Returns (number, rest) or None.
fn parse_numbered_list_prefix(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let num = &s[..digits];
    let rest = &s[digits..];
    if rest.starts_with(". ") || rest.starts_with(") ") {
        Some((num, &rest[2..]))
    } else {
        None
    }
}

/// Inline constructs, in the order they are tried when two start at the same byte.
#[derive(Clone, Copy)]
enum Inline {
    Bold,
    Code,
    Strike,
    Link,
    Sup,
}

const SUP_OPEN: &str = "<sup>";
const SUP_CLOSE: &str = "</sup>";

fn next_inline(rest: &str) -> Option<(Inline, usize)> {
    [
        (Inline::Bold, rest.find("**")),
        (Inline::Code, rest.find('`')),
        (Inline::Strike, rest.find("~~")),
        (Inline::Link, rest.find('[')),
        (Inline::Sup, rest.find(SUP_OPEN)),
    ]
    .into_iter()
    .filter_map(|(kind, pos)| pos.map(|p| (kind, p)))
    .min_by_key(|(_, pos)| *pos)
}

/// Parse **bold**, `code`, ~~strike~~, [text](url) and <sup>[n]</sup> in the rest of a line.
fn parse_markdown_inline_inner(s: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut rest = s;
    while !rest.is_empty() {
        let Some((which, pos)) = next_inline(rest) else {
            spans.push(Span::raw(rest.to_string()));
            break;
        };
        if pos > 0 {
            spans.push(Span::raw(rest[..pos].to_string()));
        }
        rest = &rest[pos..];
        match which {
            Inline::Bold => {
                rest = &rest[2..];
                if let Some(end) = rest.find("**") {
                    spans.push(Span::styled(
                        rest[..end].to_string(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ));
                    rest = &rest[end + 2..];
                } else {
                    spans.push(Span::raw("**".to_string()));
                }
            }
            Inline::Strike => {
                rest = &rest[2..];
                if let Some(end) = rest.find("~~") {
                    spans.push(Span::styled(
                        rest[..end].to_string(),
                        Style::default().add_modifier(Modifier::CROSSED_OUT),
                    ));
                    rest = &rest[end + 2..];
                } else {
                    spans.push(Span::raw("~~".to_string()));
                }
            }
            Inline::Code => {
                rest = &rest[1..];
                if let Some(end) = rest.find('`') {
                    spans.push(Span::styled(
                        rest[..end].to_string(),
                        Style::default().fg(ACCENT),
                    ));
                    rest = &rest[end + 1..];
                } else {
                    spans.push(Span::raw("`".to_string()));
                }
            }
            Inline::Sup => {
                rest = &rest[SUP_OPEN.len()..];
                if let Some(end) = rest.find(SUP_CLOSE) {
                    spans.push(Span::styled(
                        rest[..end].to_string(),
                        Style::default().fg(Color::DarkGray),
                    ));
                    rest = &rest[end + SUP_CLOSE.len()..];
                } else {
                    spans.push(Span::raw(SUP_OPEN.to_string()));
                }
            }
            Inline::Link => {
                rest = &rest[1..];
                let Some(end_br) = rest.find(']') else {
                    spans.push(Span::raw("[".to_string()));
                    continue;
                };
                let text = &rest[..end_br];
                let after = &rest[end_br + 1..];
                match after.strip_prefix('(').and_then(|a| a.find(')').map(|e| (a, e))) {
                    Some((a, end_paren)) => {
                        spans.push(Span::styled(
                            text.to_string(),
                            Style::default()
                                .fg(ACCENT)
                                .add_modifier(Modifier::UNDERLINED),
                        ));
                        rest = &a[end_paren + 1..];
                    }
                    None => {
                        spans.push(Span::raw(format!("[{}]", text)));
                        rest = after;
                    }
                }
            }
        }
    }
    spans
}
