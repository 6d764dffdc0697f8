use super::{render_message, to_html};

#[test]
fn turkish_reply_renders_greeting_bold_line_and_list() {
    let raw = "Merhaba! \\n\\n**Cevap:**\\n1. Birinci\\n2. İkinci";
    let html = render_message(raw);
    assert!(html.contains("Merhaba!"), "{html}");
    assert!(html.contains("<br />"), "{html}");
    assert!(html.contains("<strong>Cevap:</strong>"), "{html}");
    assert!(html.contains("<ol>"), "{html}");
    assert_eq!(html.matches("<li>").count(), 2, "{html}");
    assert!(html.contains("<li>İkinci</li>"), "{html}");
    assert!(!html.contains('\\'), "{html}");
}

#[test]
fn links_open_in_new_tab() {
    let html = to_html("See [the docs](https://example.com/a?b=1&c=2).");
    assert!(
        html.contains(
            r#"<a href="https://example.com/a?b=1&amp;c=2" target="_blank" rel="noopener noreferrer">the docs</a>"#
        ),
        "{html}"
    );
}

#[test]
fn autolinks_also_get_target() {
    let html = to_html("<https://example.com>");
    assert!(html.contains(r#"target="_blank""#), "{html}");
    assert!(html.contains(r#"rel="noopener noreferrer""#), "{html}");
}

#[test]
fn citation_superscript_passes_through() {
    let html = render_message("Known fact【3-1】.");
    assert!(html.contains("<sup>[3]</sup>"), "{html}");
}

#[test]
fn tables_strikethrough_and_tasks() {
    let html = to_html("| a | b |\n|---|---|\n| 1 | 2 |");
    assert!(html.contains("<table>"), "{html}");
    assert!(html.contains("<td>1</td>"), "{html}");

    assert!(to_html("~~gone~~").contains("<del>gone</del>"));
    assert!(to_html("- [x] done").contains(r#"type="checkbox""#));
}

#[test]
fn known_language_is_highlighted() {
    let html = to_html("```rust\nfn main() {}\n```");
    assert!(html.contains("<pre style="), "{html}");
    assert!(html.contains("<span style="), "{html}");
    assert!(!html.contains("```"));
}

#[test]
fn unknown_language_is_escaped() {
    let html = to_html("```brainfuck\n<x>&\n```");
    assert!(
        html.contains(r#"<pre><code class="language-brainfuck">&lt;x&gt;&amp;"#),
        "{html}"
    );
}

#[test]
fn single_newlines_are_line_breaks() {
    let html = to_html("one\ntwo");
    assert_eq!(html, "<p>one<br />\ntwo</p>\n");
}

#[test]
fn empty_input_renders_nothing() {
    assert_eq!(render_message(""), "");
}
