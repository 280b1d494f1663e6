//! Server-side syntax highlighting for code blocks.

use once_cell::sync::Lazy;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;
use tracing::{debug, warn};

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    fn theme_name(self) -> &'static str {
        match self {
            Self::Dark => "base16-ocean.dark",
            Self::Light => "InspiredGitHub",
        }
    }
}

/// Canonical highlighter language for a user-facing id or common alias.
fn canonical_language(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let canonical = match lowered.as_str() {
        "js" => "javascript",
        "ts" => "typescript",
        "py" => "python",
        "rb" => "ruby",
        "sh" | "shell" | "shell-bash" => "bash",
        "c" | "c++" | "c-plus-plus" => "cpp",
        "c#" | "cs" | "c-sharp" => "csharp",
        "yml" => "yaml",
        "md" => "markdown",
        "ps1" => "powershell",
        "other" | "text" => "plaintext",
        _ => return lowered,
    };
    canonical.to_string()
}

/// Token understood by `SyntaxSet::find_syntax_by_token`. Languages without a
/// bundled grammar map to `None`.
fn syntax_token(canonical: &str) -> Option<&'static str> {
    let token = match canonical {
        "javascript" | "typescript" => "js",
        "python" => "py",
        "java" => "java",
        "cpp" => "cpp",
        "csharp" => "cs",
        "go" => "go",
        "rust" => "rs",
        "ruby" => "rb",
        "php" => "php",
        "html" => "html",
        "css" => "css",
        "sql" => "sql",
        "json" => "json",
        "yaml" => "yaml",
        "markdown" => "md",
        "bash" => "sh",
        "plaintext" => "txt",
        _ => return None,
    };
    Some(token)
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn plain_html(content: &str) -> String {
    format!("<pre><code>{}</code></pre>", escape_html(content))
}

/// Renders `content` as highlighted HTML. Unknown languages and highlighter
/// failures fall back to an escaped `<pre><code>` block.
pub fn highlight(content: &str, language: &str, theme: Theme) -> String {
    let canonical = canonical_language(language);
    let syntax = syntax_token(&canonical).and_then(|token| SYNTAX_SET.find_syntax_by_token(token));
    let theme_data = THEME_SET.themes.get(theme.theme_name());
    let (Some(syntax), Some(theme_data)) = (syntax, theme_data) else {
        debug!(language, canonical = %canonical, "no grammar for language, using plain text");
        return plain_html(content);
    };

    match highlighted_html_for_string(content, &SYNTAX_SET, syntax, theme_data) {
        Ok(html) => html,
        Err(error) => {
            warn!(language, error = %error, "highlighting failed, using plain text");
            plain_html(content)
        }
    }
}
