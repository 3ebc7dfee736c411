//! HTML backend for markdown rendering.

use std::borrow::Cow;
use std::fmt::Write;

use crate::backend::{CalloutKind, RenderBackend};
use crate::state::escape_html;

/// HTML render backend.
///
/// Produces HTML5 with bordered tables and `callout` boxes.
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        if let Some(lang) = lang {
            write!(
                out,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(content)
            )
            .unwrap();
        } else {
            write!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap();
        }
    }

    fn blockquote_start(out: &mut String) {
        out.push_str("<blockquote>");
    }

    fn blockquote_end(out: &mut String) {
        out.push_str("</blockquote>");
    }

    fn callout_start(kind: CalloutKind) -> Cow<'static, str> {
        Cow::Owned(format!(
            r#"<div class="callout callout-{}">"#,
            kind.class_name()
        ))
    }

    fn callout_end(_kind: CalloutKind, out: &mut String) {
        out.push_str("</div>");
    }

    fn image(src: &str, alt: &str, title: &str, out: &mut String) {
        let title_attr = if title.is_empty() {
            String::new()
        } else {
            format!(r#" title="{}""#, escape_html(title))
        };
        write!(
            out,
            r#"<img src="{}"{title_attr} alt="{}">"#,
            escape_html(src),
            escape_html(alt)
        )
        .unwrap();
    }

    fn table_start(out: &mut String) {
        out.push_str(r#"<table class="table table-bordered">"#);
    }

    fn empty_table_head() -> &'static str {
        r#"<thead class="no-header">"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_block_with_language() {
        let mut out = String::new();
        HtmlBackend::code_block(Some("rust"), "fn main() {}", &mut out);
        assert_eq!(
            out,
            r#"<pre><code class="language-rust">fn main() {}</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_without_language() {
        let mut out = String::new();
        HtmlBackend::code_block(None, "a < b", &mut out);
        assert_eq!(out, "<pre><code>a &lt; b</code></pre>");
    }

    #[test]
    fn test_callout() {
        let mut out = HtmlBackend::callout_start(CalloutKind::Deprecated).into_owned();
        out.push_str("gone");
        HtmlBackend::callout_end(CalloutKind::Deprecated, &mut out);
        assert_eq!(
            out,
            r#"<div class="callout callout-deprecated">gone</div>"#
        );
    }

    #[test]
    fn test_image_with_title() {
        let mut out = String::new();
        HtmlBackend::image("a.png", "Alt", "Title", &mut out);
        assert_eq!(out, r#"<img src="a.png" title="Title" alt="Alt">"#);
    }
}
