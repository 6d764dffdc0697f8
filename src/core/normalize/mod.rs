//! Markdown normalization for completion replies.
//!
//! The completion endpoint returns text with literal escape sequences, HTML
//! entities, citation markers and loose list/heading spacing. [`normalize`]
//! rewrites it into the canonical form the renderers expect by running a
//! fixed sequence of substring passes. Order matters: later passes assume
//! the earlier ones already ran.
//!
//! The passes are textual, not structural. A construct inside a fenced code
//! block that matches a pattern is rewritten like any other text.
//!
//! Content policy: single-star emphasis (`*text*`) is promoted to bold
//! (`**text**`). This deliberately departs from CommonMark, where single
//! stars mean italics, to match how the upstream models use them.

mod passes;

/// One named rewrite step of the pipeline.
pub struct Pass {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

/// The pipeline, in application order.
pub const PASSES: [Pass; 13] = [
    Pass {
        name: "strip-invalid-markers",
        apply: passes::strip_invalid_markers,
    },
    Pass {
        name: "citations",
        apply: passes::rewrite_citations,
    },
    Pass {
        name: "single-star-bold",
        apply: passes::single_star_to_bold,
    },
    Pass {
        name: "unescape",
        apply: passes::unescape_sequences,
    },
    Pass {
        name: "unicode-escapes",
        apply: passes::decode_unicode_escapes,
    },
    Pass {
        name: "list-continuation",
        apply: passes::separate_list_continuations,
    },
    Pass {
        name: "heading-spacing",
        apply: passes::collapse_blank_lines_before_headings,
    },
    Pass {
        name: "list-markers",
        apply: passes::normalize_list_markers,
    },
    Pass {
        name: "collapse-newlines",
        apply: passes::collapse_newlines,
    },
    Pass {
        name: "code-fences",
        apply: passes::normalize_code_fences,
    },
    Pass {
        name: "html-entities",
        apply: passes::decode_html_entities,
    },
    Pass {
        name: "trim",
        apply: passes::trim,
    },
    Pass {
        name: "final-sweep",
        apply: passes::strip_invalid_markers,
    },
];

/// Normalize raw completion text into canonical markdown. Never fails.
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let mut text = raw.to_string();
    for pass in &PASSES {
        let next = (pass.apply)(&text);
        if next != text {
            log::trace!("normalize: pass '{}' rewrote text", pass.name);
        }
        text = next;
    }
    text
}

/// Run the pipeline and keep the text after every pass that changed it.
/// Used by `normalize --steps` to show where a reply was rewritten.
pub fn normalize_steps(raw: &str) -> Vec<(&'static str, String)> {
    let mut steps = Vec::new();
    let mut text = raw.to_string();
    for pass in &PASSES {
        let next = (pass.apply)(&text);
        if next != text {
            steps.push((pass.name, next.clone()));
        }
        text = next;
    }
    steps
}

#[cfg(test)]
mod tests;
