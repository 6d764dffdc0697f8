//! Individual rewrite passes. Each takes the whole text and returns the rewritten text.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Replacement character, BOM and the two non-characters some decoders emit.
const INVALID_MARKERS: &[char] = &['\u{FFFD}', '\u{FEFF}', '\u{FFFE}', '\u{FFFF}'];

static CITATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:【|\[)(\d+)-\d+(?:】|\])").expect("citation regex"));

/// A star run, a span that neither starts nor ends with whitespace, a star run.
/// Runs are captured whole so `**bold**` is seen as a unit and left alone.
static EMPHASIS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\*+)([^*\s](?:[^*\n]*[^*\s])?)(\*+)").expect("emphasis regex")
});

static UNICODE_ESCAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\\u[0-9a-fA-F]{4})+").expect("unicode escape regex"));

/// A list line with content. A number glued to a letter counts, since the
/// marker pass later gives it its space.
static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:(?:[-*+]|\d+\.)[ \t]+\S|\d+\.\p{L})").expect("list item regex")
});

static BARE_MARKER_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*(?:[-*+]|\d+\.)[ \t]*$").expect("bare marker regex"));

static BLANK_LINES_BEFORE_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}(#{1,6}[ \t])").expect("heading regex"));

static BARE_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([ \t]*(?:[-*+]|\d+\.))[ \t]*\n(?:[ \t]*\n)+[ \t]*").expect("marker regex")
});

static MARKER_SPACING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([ \t]*)([-*+]|\d+\.)[ \t]+(\S)").expect("marker spacing regex")
});

static GLUED_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([ \t]*\d+\.)(\p{L})").expect("numbered marker regex"));

static NEWLINE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("newline run regex"));

static FENCE_OPENER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([ \t]*)```[ \t]*([\w+#.-]*)[ \t]*\n+").expect("fence regex")
});

/// Pass 1 and 13: drop U+FFFD and byte-order / invalid-sequence markers.
pub(super) fn strip_invalid_markers(s: &str) -> String {
    s.replace(INVALID_MARKERS, "")
}

/// Pass 2: `【3-7】` or `[3-7]` becomes `<sup>[3]</sup>`.
pub(super) fn rewrite_citations(s: &str) -> String {
    CITATION_RE.replace_all(s, "<sup>[${1}]</sup>").into_owned()
}

/// Pass 3: `*text*` becomes `**text**`. Longer star runs are left untouched.
pub(super) fn single_star_to_bold(s: &str) -> String {
    EMPHASIS_RE
        .replace_all(s, |caps: &Captures| {
            if caps[1].len() == 1 && caps[3].len() == 1 {
                format!("**{}**", &caps[2])
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Pass 4: literal `\n`, `\"` and `\'` become newline, `"` and `'`.
pub(super) fn unescape_sequences(s: &str) -> String {
    s.replace("\\n", "\n")
        .replace("\\\"", "\"")
        .replace("\\'", "'")
}

/// Pass 5: `\uXXXX` escapes become the character they encode.
/// Consecutive escapes are decoded as UTF-16 so surrogate pairs combine;
/// a lone surrogate turns into U+FFFD, which the final sweep removes.
pub(super) fn decode_unicode_escapes(s: &str) -> String {
    UNICODE_ESCAPE_RE
        .replace_all(s, |caps: &Captures| {
            let units: Vec<u16> = caps[0]
                .split("\\u")
                .filter(|hex| !hex.is_empty())
                .filter_map(|hex| u16::from_str_radix(hex, 16).ok())
                .collect();
            char::decode_utf16(units)
                .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect::<String>()
        })
        .into_owned()
}

fn is_list_item(line: &str) -> bool {
    LIST_ITEM_RE.is_match(line)
}

/// Where the previous lines leave us with respect to list items.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ListContext {
    Outside,
    /// After an item; blank lines in between do not count since they get collapsed.
    AfterItem,
    /// After a marker with no content; the next content line becomes its content.
    AfterBareMarker,
}

/// Pass 6: keep a flush line that follows a list item out of that item.
///
/// A whitespace-only line is inserted before the flush line. CommonMark treats
/// it as blank (ending the list), and the newline-collapsing pass leaves it alone.
pub(super) fn separate_list_continuations(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 16);
    let mut ctx = ListContext::Outside;
    for (i, line) in s.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if line.trim().is_empty() {
            if !line.is_empty() && ctx == ListContext::AfterItem {
                ctx = ListContext::Outside;
            }
        } else if is_list_item(line) {
            ctx = ListContext::AfterItem;
        } else if BARE_MARKER_LINE_RE.is_match(line) {
            ctx = ListContext::AfterBareMarker;
        } else if ctx == ListContext::AfterBareMarker {
            ctx = ListContext::AfterItem;
        } else if ctx == ListContext::AfterItem && !line.starts_with([' ', '\t']) {
            out.push_str(" \n");
            ctx = ListContext::Outside;
        } else if ctx != ListContext::AfterItem {
            ctx = ListContext::Outside;
        }
        out.push_str(line);
    }
    out
}

/// Pass 7: two or more blank lines before a heading become exactly one.
pub(super) fn collapse_blank_lines_before_headings(s: &str) -> String {
    BLANK_LINES_BEFORE_HEADING_RE
        .replace_all(s, "\n\n${1}")
        .into_owned()
}

/// Pass 8: one space after list markers, no blank lines after a bare marker.
/// A bare marker is not joined onto a line that starts with a marker itself.
pub(super) fn normalize_list_markers(s: &str) -> String {
    let joined = BARE_MARKER_RE.replace_all(s, |caps: &Captures| {
        let end = caps.get(0).map_or(s.len(), |m| m.end());
        let next = s[end..].split('\n').next().unwrap_or_default();
        if is_list_item(next) || BARE_MARKER_LINE_RE.is_match(next) {
            caps[0].to_string()
        } else {
            format!("{} ", &caps[1])
        }
    });
    let spaced = MARKER_SPACING_RE.replace_all(&joined, "${1}${2} ${3}");
    GLUED_NUMBER_RE
        .replace_all(&spaced, "${1} ${2}")
        .into_owned()
}

/// Pass 9: any run of newlines becomes a single newline.
pub(super) fn collapse_newlines(s: &str) -> String {
    NEWLINE_RUN_RE.replace_all(s, "\n").into_owned()
}

/// Pass 10: a fence opener is "```lang" followed by exactly one newline.
pub(super) fn normalize_code_fences(s: &str) -> String {
    FENCE_OPENER_RE
        .replace_all(s, "${1}```${2}\n")
        .into_owned()
}

/// Pass 11: decode `&lt;`, `&gt;` and `&amp;`. `&amp;` goes last so
/// `&amp;lt;` decodes once, to `&lt;`.
pub(super) fn decode_html_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Pass 12.
pub(super) fn trim(s: &str) -> String {
    s.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_invalid_markers_removes_replacement_and_bom() {
        assert_eq!(strip_invalid_markers("\u{FEFF}a\u{FFFD}b\u{FFFE}"), "ab");
    }

    #[test]
    fn citations_full_width_and_ascii_brackets() {
        assert_eq!(rewrite_citations("see 【3-7】"), "see <sup>[3]</sup>");
        assert_eq!(rewrite_citations("see [12-1]"), "see <sup>[12]</sup>");
    }

    #[test]
    fn citations_leave_plain_brackets_alone() {
        assert_eq!(rewrite_citations("[1] and [a-b]"), "[1] and [a-b]");
    }

    #[test]
    fn single_star_becomes_bold() {
        assert_eq!(single_star_to_bold("an *important* word"), "an **important** word");
    }

    #[test]
    fn single_star_leaves_existing_bold_alone() {
        assert_eq!(single_star_to_bold("**bold** and *x*"), "**bold** and **x**");
    }

    #[test]
    fn single_star_ignores_bullets_and_spaced_operators() {
        assert_eq!(single_star_to_bold("* item"), "* item");
        assert_eq!(single_star_to_bold("a * b * c"), "a * b * c");
    }

    #[test]
    fn single_star_does_not_cross_lines() {
        assert_eq!(single_star_to_bold("*a\nb*"), "*a\nb*");
    }

    #[test]
    fn unescape_quotes_and_newlines() {
        assert_eq!(unescape_sequences(r#"say \"hi\"\nit\'s"#), "say \"hi\"\nit's");
    }

    #[test]
    fn unicode_escapes_decode() {
        assert_eq!(decode_unicode_escapes(r"\u0130stanbul"), "İstanbul");
    }

    #[test]
    fn unicode_surrogate_pair_combines() {
        assert_eq!(decode_unicode_escapes(r"smile \ud83d\ude00"), "smile \u{1F600}");
    }

    #[test]
    fn unicode_lone_surrogate_becomes_replacement() {
        assert_eq!(decode_unicode_escapes(r"x\ud83dy"), "x\u{FFFD}y");
    }

    #[test]
    fn list_continuation_gets_separator() {
        assert_eq!(
            separate_list_continuations("- one\nafter"),
            "- one\n \nafter"
        );
    }

    #[test]
    fn list_continuation_looks_past_blank_lines() {
        assert_eq!(
            separate_list_continuations("- a\n\nText"),
            "- a\n\n \nText"
        );
    }

    #[test]
    fn list_continuation_after_bare_marker_content() {
        assert_eq!(
            separate_list_continuations("1.\n\nFirst\nText"),
            "1.\n\nFirst\n \nText"
        );
    }

    #[test]
    fn list_continuation_respects_existing_separator() {
        let s = "- a\n \nText";
        assert_eq!(separate_list_continuations(s), s);
    }

    #[test]
    fn list_continuation_keeps_consecutive_items() {
        let s = "1. one\n2. two\n   indented";
        assert_eq!(separate_list_continuations(s), s);
    }

    #[test]
    fn headings_keep_one_blank_line() {
        assert_eq!(
            collapse_blank_lines_before_headings("text\n\n\n\n## Title"),
            "text\n\n## Title"
        );
        assert_eq!(
            collapse_blank_lines_before_headings("text\n\n\n\nplain"),
            "text\n\n\n\nplain"
        );
    }

    #[test]
    fn list_marker_spacing_collapses_to_one_space() {
        assert_eq!(normalize_list_markers("-   a\n*\tb\n3.    c"), "- a\n* b\n3. c");
    }

    #[test]
    fn list_marker_glued_number_gets_space() {
        assert_eq!(normalize_list_markers("1.Birinci"), "1. Birinci");
        assert_eq!(normalize_list_markers("1.5 kg"), "1.5 kg");
    }

    #[test]
    fn bare_marker_joins_following_content() {
        assert_eq!(normalize_list_markers("1.\n\n\nFirst"), "1. First");
        assert_eq!(normalize_list_markers("-\n\n  item"), "- item");
    }

    #[test]
    fn bare_marker_not_joined_onto_another_marker() {
        assert_eq!(normalize_list_markers("*\n\n1.\nx"), "*\n\n1.\nx");
        assert_eq!(normalize_list_markers("-\n\n- two"), "-\n\n- two");
        assert_eq!(normalize_list_markers("-\n\n-\n\nthree"), "-\n\n- three");
    }

    #[test]
    fn list_markers_leave_bold_and_rules_alone() {
        let s = "**Bold:** text\n---\n***";
        assert_eq!(normalize_list_markers(s), s);
    }

    #[test]
    fn newline_runs_collapse() {
        assert_eq!(collapse_newlines("a\n\n\nb\n\nc"), "a\nb\nc");
    }

    #[test]
    fn fence_opener_is_canonical() {
        assert_eq!(
            normalize_code_fences("``` rust  \n\nfn main() {}\n```"),
            "```rust\nfn main() {}\n```"
        );
    }

    #[test]
    fn html_entities_decode_once() {
        assert_eq!(decode_html_entities("&lt;b&gt; &amp;lt;"), "<b> &lt;");
    }
}
