//! Code lines with semantic spans.
//!
//! Declaration lines are built as plain text plus a list of highlighted
//! spans. Keeping the text separate lets the signature wrapper reformat
//! whitespace without touching markup, after which [`CodeLine::to_html`]
//! emits the final `<pre>` block.

use std::fmt::Write;

use dv_renderer::escape_html;

use crate::model::DeclId;
use crate::wrap::{Edit, apply_edits};

/// Target of a cross-reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Xref {
    Id(DeclId),
    Name(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpanKind {
    Keyword,
    Name,
    Param,
    Literal,
    Ref(Xref),
}

impl SpanKind {
    fn class_name(&self) -> &'static str {
        match self {
            Self::Keyword => "kw",
            Self::Name => "name",
            Self::Param => "param",
            Self::Literal => "lit",
            Self::Ref(_) => "type",
        }
    }
}

/// Byte range of [`CodeLine::text`] with a meaning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
}

/// A line of declaration code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeLine {
    pub text: String,
    pub spans: Vec<Span>,
}

impl CodeLine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(&mut self, text: &str) -> &mut Self {
        self.text.push_str(text);
        self
    }

    pub fn span(&mut self, kind: SpanKind, text: &str) -> &mut Self {
        let start = self.text.len();
        self.text.push_str(text);
        if !text.is_empty() {
            self.spans.push(Span {
                start,
                end: self.text.len(),
                kind,
            });
        }
        self
    }

    pub fn keyword(&mut self, text: &str) -> &mut Self {
        self.span(SpanKind::Keyword, text)
    }

    pub fn name(&mut self, text: &str) -> &mut Self {
        self.span(SpanKind::Name, text)
    }

    pub fn param(&mut self, text: &str) -> &mut Self {
        self.span(SpanKind::Param, text)
    }

    pub fn literal(&mut self, text: &str) -> &mut Self {
        self.span(SpanKind::Literal, text)
    }

    pub fn reference(&mut self, target: Xref, text: &str) -> &mut Self {
        self.span(SpanKind::Ref(target), text)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Apply whitespace edits, moving spans along with their text.
    ///
    /// Edits must be sorted, non-overlapping and must not fall inside a
    /// span.
    pub fn apply(&mut self, edits: &[Edit]) {
        if edits.is_empty() {
            return;
        }
        let shift = |pos: usize, inclusive: bool| -> usize {
            let delta: isize = edits
                .iter()
                .filter(|e| if inclusive { e.at <= pos } else { e.at < pos })
                .map(Edit::delta)
                .sum();
            pos.saturating_add_signed(delta)
        };
        for span in &mut self.spans {
            span.start = shift(span.start, true);
            span.end = shift(span.end, false);
        }
        self.text = apply_edits(&self.text, edits);
    }

    /// Render as a highlighted code block.
    ///
    /// `link` produces the opening tag for a reference span, or `None` to
    /// render the reference as a plain type name.
    pub fn to_html(&self, mut link: impl FnMut(&Xref) -> Option<String>) -> String {
        let mut html = String::from(r#"<pre class="highlight declaration"><code>"#);
        let mut pos = 0;
        for span in &self.spans {
            if span.start < pos || span.end > self.text.len() {
                continue;
            }
            html.push_str(&escape_html(&self.text[pos..span.start]));
            let content = escape_html(&self.text[span.start..span.end]);
            let class = span.kind.class_name();
            match &span.kind {
                SpanKind::Ref(target) => match link(target) {
                    Some(open) => {
                        write!(html, r#"{open}<span class="{class}">{content}</span></a>"#)
                            .unwrap();
                    }
                    None => {
                        write!(html, r#"<span class="{class}">{content}</span>"#).unwrap();
                    }
                },
                _ => write!(html, r#"<span class="{class}">{content}</span>"#).unwrap(),
            }
            pos = span.end;
        }
        html.push_str(&escape_html(&self.text[pos..]));
        html.push_str("</code></pre>\n");
        html
    }
}
