//! Render backend trait for format-specific rendering.

use std::borrow::Cow;

/// Kind of callout box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CalloutKind {
    Warning,
    Info,
    Deprecated,
}

const VARIATION_SELECTOR: char = '\u{FE0F}';

impl CalloutKind {
    /// Marker glyph that introduces this callout in a blockquote.
    #[must_use]
    pub fn marker(self) -> char {
        match self {
            Self::Warning => '\u{26A0}',
            Self::Info => '\u{1F4A1}',
            Self::Deprecated => '\u{1F44E}',
        }
    }

    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Deprecated => "deprecated",
        }
    }

    /// Split a leading marker glyph off `text`.
    ///
    /// Leading whitespace, the emoji variation selector and the whitespace
    /// following the glyph are removed along with it.
    #[must_use]
    pub fn strip_marker(text: &str) -> Option<(Self, &str)> {
        let trimmed = text.trim_start();
        let first = trimmed.chars().next()?;
        let kind = [Self::Warning, Self::Info, Self::Deprecated]
            .into_iter()
            .find(|kind| kind.marker() == first)?;
        let rest = &trimmed[first.len_utf8()..];
        let rest = rest.strip_prefix(VARIATION_SELECTOR).unwrap_or(rest);
        Some((kind, rest.trim_start()))
    }
}

impl From<pulldown_cmark::BlockQuoteKind> for CalloutKind {
    fn from(kind: pulldown_cmark::BlockQuoteKind) -> Self {
        use pulldown_cmark::BlockQuoteKind;
        match kind {
            BlockQuoteKind::Note | BlockQuoteKind::Tip | BlockQuoteKind::Important => Self::Info,
            BlockQuoteKind::Warning | BlockQuoteKind::Caution => Self::Warning,
        }
    }
}

/// Backend trait for format-specific rendering operations.
///
/// The renderer handles document structure and delegates the leaf markup
/// (code blocks, quotes, callouts, images) to the backend.
pub trait RenderBackend {
    /// Render a code block that no processor claimed.
    fn code_block(lang: Option<&str>, content: &str, out: &mut String);

    fn blockquote_start(out: &mut String);

    fn blockquote_end(out: &mut String);

    /// Opening markup of a callout box.
    ///
    /// Returned as a string because a blockquote may be turned into a callout
    /// after its opening tag was already written.
    fn callout_start(kind: CalloutKind) -> Cow<'static, str>;

    fn callout_end(kind: CalloutKind, out: &mut String);

    fn image(src: &str, alt: &str, title: &str, out: &mut String);

    /// Opening `<table>` tag.
    fn table_start(out: &mut String) {
        out.push_str("<table>");
    }

    /// Replacement for `<thead>` when every header cell is empty.
    fn empty_table_head() -> &'static str {
        "<thead>"
    }

    fn hard_break(out: &mut String) {
        out.push_str("<br>");
    }

    fn horizontal_rule(out: &mut String) {
        out.push_str("<hr>");
    }

    fn task_list_marker(checked: bool, out: &mut String) {
        if checked {
            out.push_str(r#"<input type="checkbox" checked disabled> "#);
        } else {
            out.push_str(r#"<input type="checkbox" disabled> "#);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_marker_with_variation_selector() {
        assert_eq!(
            CalloutKind::strip_marker("\u{26A0}\u{FE0F} Careful"),
            Some((CalloutKind::Warning, "Careful"))
        );
    }

    #[test]
    fn test_strip_marker_bare_glyph() {
        assert_eq!(
            CalloutKind::strip_marker("  \u{1F44E}Old API"),
            Some((CalloutKind::Deprecated, "Old API"))
        );
    }

    #[test]
    fn test_strip_marker_absent() {
        assert_eq!(CalloutKind::strip_marker("Plain text \u{1F4A1}"), None);
        assert_eq!(CalloutKind::strip_marker(""), None);
    }

    #[test]
    fn test_gfm_alert_mapping() {
        use pulldown_cmark::BlockQuoteKind;
        assert_eq!(CalloutKind::from(BlockQuoteKind::Note), CalloutKind::Info);
        assert_eq!(CalloutKind::from(BlockQuoteKind::Caution), CalloutKind::Warning);
    }
}
