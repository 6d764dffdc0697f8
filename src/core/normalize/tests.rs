use super::{PASSES, normalize, normalize_steps};

#[test]
fn empty_input_is_empty_output() {
    assert_eq!(normalize(""), "");
}

#[test]
fn escaped_newline_becomes_real_newline() {
    assert_eq!(normalize("Hello\\nWorld"), "Hello\nWorld");
}

#[test]
fn citation_becomes_superscript_reference() {
    let out = normalize("【1-2】");
    assert!(out.contains("<sup>[1]</sup>"), "got {out:?}");
    assert!(!out.contains('2'));
}

#[test]
fn single_star_renders_bold() {
    assert_eq!(normalize("*bold*"), "**bold**");
}

#[test]
fn blank_line_runs_collapse_to_one_newline() {
    assert_eq!(normalize("Line one\n\n\n\nLine two"), "Line one\nLine two");
}

#[test]
fn whitespace_only_input_trims_to_empty() {
    assert_eq!(normalize("  \n\n\t "), "");
}

#[test]
fn replacement_characters_never_survive() {
    let out = normalize("\u{FEFF}ok\u{FFFD} \\ud800 done");
    assert_eq!(out, "ok  done");
}

#[test]
fn turkish_reply_with_escapes() {
    let raw = "Merhaba! \\n\\n**Cevap:**\\n1. Birinci\\n2. İkinci";
    assert_eq!(
        normalize(raw),
        "Merhaba! \n**Cevap:**\n1. Birinci\n2. İkinci"
    );
}

#[test]
fn escaped_quotes_and_entities() {
    let raw = r#"Use \"x &lt; y\" and it\'s fine &amp; done"#;
    assert_eq!(normalize(raw), r#"Use "x < y" and it's fine & done"#);
}

#[test]
fn list_followed_by_paragraph_is_separated() {
    let out = normalize("- one\n- two\nAfter the list");
    assert_eq!(out, "- one\n- two\n \nAfter the list");
}

#[test]
fn heading_after_many_blank_lines() {
    assert_eq!(normalize("Intro\n\n\n\n## Next"), "Intro\n## Next");
}

#[test]
fn bare_marker_and_wide_spacing() {
    assert_eq!(normalize("1.\n\nFirst\n2.    Second"), "1. First\n2. Second");
}

#[test]
fn code_fence_opener_canonical() {
    let out = normalize("Code:\n\n```python   \n\n\nprint(1)\n```");
    assert_eq!(out, "Code:\n```python\nprint(1)\n```");
}

#[test]
fn passes_apply_inside_code_blocks_too() {
    // No fenced-block exclusion zone: the emphasis rewrite reaches into code.
    let out = normalize("```\nlet p = *ptr*;\n```");
    assert!(out.contains("**ptr**"));
}

#[test]
fn second_pass_changes_nothing() {
    let samples = [
        "# Title\n\nSome *emphasis* and **bold**.\n\n- one\n- two\nafter list",
        "Intro\n\n\n\n## Heading\n1.Item\n2.   Item two\n\n\nText",
        "```rust\n\nfn main() {}\n```\n\n| a | b |\n|---|---|\n| 1 | 2 |",
        "See 【4-1】 and [2-9] for details.\n*  spaced bullet\n+ plus",
        "Plain text with a * star and 2 * 3 = 6",
        "- [ ] task\n- [x] done\n~~gone~~",
        "*\n\n1.\n|#>-b`",
        "-\n\n-\n\nthree\nflush",
    ];
    for raw in samples {
        let once = normalize(raw);
        let twice = normalize(&once);
        assert_eq!(once, twice, "not idempotent for {raw:?}");
    }
}

#[test]
fn pipeline_order_is_fixed() {
    let names: Vec<&str> = PASSES.iter().map(|p| p.name).collect();
    assert_eq!(names.first(), Some(&"strip-invalid-markers"));
    assert_eq!(names.last(), Some(&"final-sweep"));
    assert_eq!(names.len(), 13);
    let pos = |n: &str| names.iter().position(|x| *x == n).unwrap();
    assert!(pos("single-star-bold") < pos("unescape"));
    assert!(pos("list-continuation") < pos("collapse-newlines"));
    assert!(pos("collapse-newlines") < pos("code-fences"));
}

#[test]
fn steps_report_only_changing_passes() {
    let steps = normalize_steps("*a*\\nb");
    let names: Vec<&str> = steps.iter().map(|(n, _)| *n).collect();
    assert_eq!(names, ["single-star-bold", "unescape"]);
    assert_eq!(steps.last().map(|(_, t)| t.as_str()), Some("**a**\nb"));
}
