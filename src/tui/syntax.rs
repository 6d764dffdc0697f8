//! Terminal syntax highlighting for code blocks: syntect styles to ratatui spans.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::FontStyle;

use crate::core::highlight;

use super::constants::ACCENT_SECONDARY;

/// Convert syntect Color to ratatui Color. Alpha 0 => None (colourless).
fn translate_colour(c: syntect::highlighting::Color) -> Option<Color> {
    let syntect::highlighting::Color { r, g, b, a } = c;
    if a > 0 { Some(Color::Rgb(r, g, b)) } else { None }
}

fn translate_font_style(f: FontStyle) -> Modifier {
    let mut m = Modifier::empty();
    if f.contains(FontStyle::BOLD) {
        m.insert(Modifier::BOLD);
    }
    if f.contains(FontStyle::ITALIC) {
        m.insert(Modifier::ITALIC);
    }
    if f.contains(FontStyle::UNDERLINE) {
        m.insert(Modifier::UNDERLINED);
    }
    m
}

/// Foreground and font style only; the theme background would paint over the bubble.
fn translate_style(s: syntect::highlighting::Style) -> Style {
    let fg = translate_colour(s.foreground).unwrap_or(ACCENT_SECONDARY);
    Style::default()
        .fg(fg)
        .add_modifier(translate_font_style(s.font_style))
}

fn plain(code: &str) -> Vec<Vec<Span<'static>>> {
    code.split('\n')
        .map(|line| {
            vec![Span::styled(
                line.to_string(),
                Style::default().fg(ACCENT_SECONDARY),
            )]
        })
        .collect()
}

/// Highlight a whole code block, one span list per line. The highlighter keeps
/// state across lines so multi-line strings and comments colour correctly.
/// Unknown languages come back as plain accent-coloured lines.
pub(super) fn highlight_code(lang: &str, code: &str) -> Vec<Vec<Span<'static>>> {
    let (Some(syntax), Some(theme)) = (highlight::find_syntax(lang), highlight::theme()) else {
        return plain(code);
    };
    let ps = highlight::syntax_set();
    let mut h = HighlightLines::new(syntax, theme);
    let mut out = Vec::new();
    for line in code.split('\n') {
        let with_ending = format!("{}\n", line);
        match h.highlight_line(&with_ending, ps) {
            Ok(segments) => out.push(
                segments
                    .into_iter()
                    .filter_map(|(style, text)| {
                        let text = text.trim_end_matches('\n');
                        (!text.is_empty()).then(|| Span::styled(text.to_string(), translate_style(style)))
                    })
                    .collect(),
            ),
            Err(e) => {
                log::debug!("Highlighting {} failed: {}", lang, e);
                return plain(code);
            }
        }
    }
    out
}

/// Slice spans to cover only the character range [range_start, range_end).
/// Used when wrapping code lines: each wrap chunk gets the spans for its character slice.
pub(super) fn slice_spans_by_range(
    spans: &[Span<'static>],
    range_start: usize,
    range_end: usize,
) -> Vec<Span<'static>> {
    let mut result = Vec::new();
    let mut pos = 0;
    for span in spans {
        let s = span.content.as_ref();
        let len = s.chars().count();
        let span_end = pos + len;
        if span_end <= range_start || pos >= range_end {
            pos = span_end;
            continue;
        }
        let take_start = range_start.saturating_sub(pos);
        let take_end = (range_end - pos).min(len);
        if take_start < take_end {
            let sliced: String = s
                .chars()
                .skip(take_start)
                .take(take_end - take_start)
                .collect();
            result.push(Span::styled(sliced, span.style));
        }
        pos = span_end;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(spans: &[Span<'_>]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn known_language_keeps_text_per_line() {
        let lines = highlight_code("rust", "fn main() {\n    let x = 1;\n}");
        assert_eq!(lines.len(), 3);
        assert_eq!(text_of(&lines[0]), "fn main() {");
        assert_eq!(text_of(&lines[1]), "    let x = 1;");
        assert!(lines[0].len() > 1, "expected several styled spans");
    }

    #[test]
    fn unknown_language_is_plain() {
        let lines = highlight_code("klingon", "a\nb");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1][0].style.fg, Some(ACCENT_SECONDARY));
    }

    #[test]
    fn slice_spans_crosses_span_boundaries() {
        let spans = vec![Span::raw("abc"), Span::raw("def")];
        let sliced = slice_spans_by_range(&spans, 2, 5);
        assert_eq!(text_of(&sliced), "cde");
        assert_eq!(sliced.len(), 2);
    }
}
