//! Syntax highlighting of fenced code via syntect.
//!
//! Output uses CSS classes rather than inline colours so the page theme
//! decides the palette.

use std::fmt::Write;
use std::sync::LazyLock;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::backend::RenderBackend;
use crate::code_block::{CodeBlockProcessor, ProcessResult};
use crate::html::HtmlBackend;
use crate::state::escape_html;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Fence languages without a bundled grammar, mapped to the closest one.
const ALIASES: &[(&str, &str)] = &[
    ("ts", "js"),
    ("typescript", "js"),
    ("tsx", "js"),
    ("jsx", "js"),
    ("json5", "json"),
    ("shell", "sh"),
    ("console", "sh"),
];

fn find_syntax(language: &str) -> Option<&'static SyntaxReference> {
    let lower = language.to_ascii_lowercase();
    let token = ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map_or(lower.as_str(), |(_, target)| target);
    SYNTAXES.find_syntax_by_token(token)
}

/// Highlight `source` as `language`.
///
/// Returns `Ok(None)` when no grammar is known for the language.
pub fn highlight(language: &str, source: &str) -> Result<Option<String>, syntect::Error> {
    let Some(syntax) = find_syntax(language) else {
        return Ok(None);
    };

    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAXES, ClassStyle::Spaced);
    for line in LinesWithEndings::from(source) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }

    let mut out = String::with_capacity(source.len() * 2);
    write!(
        out,
        r#"<pre class="highlight"><code class="language-{}">{}</code></pre>"#,
        escape_html(language),
        generator.finalize()
    )
    .unwrap();
    Ok(Some(out))
}

/// Highlight `source`, falling back to a plain code block on any failure.
#[must_use]
pub fn highlight_or_plain(language: &str, source: &str) -> String {
    match highlight(language, source) {
        Ok(Some(html)) => html,
        Ok(None) => plain(language, source),
        Err(err) => {
            tracing::warn!(language, error = %err, "Highlighting failed, using plain code block");
            plain(language, source)
        }
    }
}

fn plain(language: &str, source: &str) -> String {
    let mut out = String::new();
    HtmlBackend::code_block(Some(language), source, &mut out);
    out
}

/// Code block processor that highlights every language syntect knows.
#[derive(Default)]
pub struct SyntaxHighlighter {
    warnings: Vec<String>,
}

impl SyntaxHighlighter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodeBlockProcessor for SyntaxHighlighter {
    fn process(&mut self, language: &str, source: &str) -> ProcessResult {
        match highlight(language, source) {
            Ok(Some(html)) => ProcessResult::Inline(html),
            Ok(None) => ProcessResult::PassThrough,
            Err(err) => {
                self.warnings
                    .push(format!("failed to highlight {language} block: {err}"));
                ProcessResult::PassThrough
            }
        }
    }

    fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_language_is_highlighted() {
        let html = highlight("js", "const a = 1;\n").unwrap().unwrap();
        assert!(html.starts_with(r#"<pre class="highlight"><code class="language-js">"#));
        assert!(html.contains("<span class=\""));
        assert!(html.contains("const"));
    }

    #[test]
    fn test_alias_resolves() {
        assert!(highlight("typescript", "let x = 1;\n").unwrap().is_some());
    }

    #[test]
    fn test_unknown_language_is_none() {
        assert_eq!(highlight("no-such-language", "x").unwrap(), None);
    }

    #[test]
    fn test_highlight_or_plain_fallback() {
        assert_eq!(
            highlight_or_plain("no-such-language", "a < b"),
            r#"<pre><code class="language-no-such-language">a &lt; b</code></pre>"#
        );
    }

    #[test]
    fn test_processor_pass_through() {
        let mut processor = SyntaxHighlighter::new();
        let result = processor.process("no-such-language", "x");
        assert_eq!(result, ProcessResult::PassThrough);
        assert!(processor.warnings().is_empty());
    }
}
