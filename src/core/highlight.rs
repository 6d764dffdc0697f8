//! Shared syntect state for code-block highlighting (terminal and HTML).

use std::sync::OnceLock;

use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

/// Theme used for every highlighted block.
pub const THEME_NAME: &str = "base16-ocean.dark";

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

pub fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

/// The highlighting theme, or `None` if syntect ships no themes at all.
pub fn theme() -> Option<&'static Theme> {
    let ts = theme_set();
    ts.themes
        .get(THEME_NAME)
        .or_else(|| ts.themes.values().next())
}

/// Map a fence language tag (e.g. "rust", "python") to a syntect extension.
fn lang_to_extension(lang: &str) -> Option<&'static str> {
    let ext = match lang.trim().to_lowercase().as_str() {
        "rs" | "rust" => "rs",
        "py" | "python" => "py",
        "js" | "javascript" | "jsx" => "js",
        "ts" | "typescript" => "ts",
        "go" | "golang" => "go",
        "rb" | "ruby" => "rb",
        "sh" | "bash" | "zsh" | "shell" => "sh",
        "sql" => "sql",
        "json" => "json",
        "yaml" | "yml" => "yml",
        "toml" => "toml",
        "md" | "markdown" => "md",
        "html" => "html",
        "css" => "css",
        "c" | "h" => "c",
        "cpp" | "c++" | "cc" | "cxx" | "hpp" => "cpp",
        "java" => "java",
        "cs" | "csharp" | "c#" => "cs",
        "php" => "php",
        _ => return None,
    };
    Some(ext)
}

/// Syntax definition for a fence language tag; `None` for empty or unknown tags.
pub fn find_syntax(lang: &str) -> Option<&'static SyntaxReference> {
    syntax_set().find_syntax_by_extension(lang_to_extension(lang)?)
}
