//! Rendered pages of a doc set.

use dv_api::ApiPage;
use dv_renderer::{HtmlBackend, MarkdownRenderer, SyntaxHighlighter, TocEntry};
use dv_route::{ContentType, PageId};

use crate::registry::DocSet;
use crate::scrub::scrub;

/// A page ready for display.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RenderedPage {
    /// Page path for docs, module path for API pages.
    pub name: String,
    /// Text of the first H1, if any.
    pub title: Option<String>,
    pub html: String,
    pub toc: Vec<TocEntry>,
    /// Warnings raised while rendering.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub warnings: Vec<String>,
}

impl RenderedPage {
    /// Whether `section` names a heading of this page.
    #[must_use]
    pub fn has_section(&self, section: &str) -> bool {
        self.toc.iter().any(|entry| entry.id == section)
    }

    /// Title to display, falling back to `fallback` for pages without an H1.
    #[must_use]
    pub fn display_title<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(fallback)
    }
}

impl From<ApiPage> for RenderedPage {
    fn from(page: ApiPage) -> Self {
        Self {
            name: page.name,
            title: Some(page.title),
            html: page.html,
            toc: page.toc,
            warnings: Vec::new(),
        }
    }
}

/// Scrub and render one markdown page of `docset`.
#[must_use]
pub fn render_markdown_page(docset: &DocSet, page: &str, markdown: &str) -> RenderedPage {
    let id = PageId::new(docset.id.clone(), ContentType::Docs, page);
    let mut renderer = MarkdownRenderer::<HtmlBackend>::new()
        .with_page(id)
        .with_asset_base(docset.base_content_url())
        .with_title_extraction()
        .with_processor(SyntaxHighlighter::new());
    let result = renderer.render_markdown(&scrub(markdown));

    for warning in &result.warnings {
        tracing::warn!(page, warning = %warning, "Degraded rendering");
    }

    RenderedPage {
        name: page.to_owned(),
        title: result.title,
        html: result.html,
        toc: result.toc,
        warnings: result.warnings,
    }
}
