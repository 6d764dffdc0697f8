//! HTML rendering of chat messages.
//!
//! Normalized markdown goes through `pulldown-cmark` with the GFM extensions a chat
//! bubble needs. Raw HTML passes through (citations arrive as `<sup>`), single
//! newlines become `<br />`, fenced code is highlighted with syntect and every link
//! opens in a new tab.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};

use crate::core::{highlight, normalize};

/// Render a raw completion reply: normalize, then convert to HTML.
pub fn render_message(raw: &str) -> String {
    to_html(&normalize::normalize(raw))
}

/// Convert (already normalized) markdown to an HTML fragment.
pub fn to_html(markdown: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut events: Vec<Event<'_>> = Vec::new();
    // (language, collected source) while inside a code block
    let mut code: Option<(String, String)> = None;

    for event in Parser::new_ext(markdown, opts) {
        if let Some((lang, source)) = &mut code {
            match event {
                Event::Text(text) => source.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    events.push(Event::Html(CowStr::from(code_block_html(lang, source))));
                    code = None;
                }
                _ => {}
            }
            continue;
        }
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().unwrap_or("").to_string()
                    }
                    CodeBlockKind::Indented => String::new(),
                };
                code = Some((lang, String::new()));
            }
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) => {
                let title_attr = if title.is_empty() {
                    String::new()
                } else {
                    format!(r#" title="{}""#, escape_html(&title))
                };
                events.push(Event::InlineHtml(CowStr::from(format!(
                    r#"<a href="{}"{} target="_blank" rel="noopener noreferrer">"#,
                    escape_html(&dest_url),
                    title_attr
                ))));
            }
            Event::End(TagEnd::Link) => events.push(Event::InlineHtml(CowStr::from("</a>"))),
            Event::SoftBreak => events.push(Event::HardBreak),
            other => events.push(other),
        }
    }

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Highlighted `<pre>` for known languages, escaped `<pre><code>` otherwise.
fn code_block_html(lang: &str, source: &str) -> String {
    if let Some(syntax) = highlight::find_syntax(lang)
        && let Some(theme) = highlight::theme()
    {
        match syntect::html::highlighted_html_for_string(
            source,
            highlight::syntax_set(),
            syntax,
            theme,
        ) {
            Ok(html) => return html,
            Err(e) => log::debug!("Highlighting {lang} block failed: {e}"),
        }
    }
    let class = if lang.is_empty() {
        String::new()
    } else {
        format!(r#" class="language-{}""#, escape_html(lang))
    };
    format!("<pre><code{}>{}</code></pre>\n", class, escape_html(source))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests;
