//! Markdown renderer for documentation pages.
//!
//! [`MarkdownRenderer`] walks pulldown-cmark events and delegates leaf markup
//! to a [`RenderBackend`]. On top of plain HTML it:
//!
//! - gives every heading a unique anchor via [`SlugGenerator`]
//! - rewrites in-page and relative links into router fragments
//! - turns blockquotes opening with a marker glyph into callouts
//! - marks up tables and hides all-empty header rows
//! - highlights fenced code through [`SyntaxHighlighter`]
//!
//! # Example
//!
//! ```
//! use dv_renderer::{HtmlBackend, MarkdownRenderer, SyntaxHighlighter};
//! use dv_route::{ContentType, DocSetId, PageId};
//!
//! let page = PageId::new(DocSetId::new("Intern", "4"), ContentType::Docs, "README.md");
//! let result = MarkdownRenderer::<HtmlBackend>::new()
//!     .with_page(page)
//!     .with_title_extraction()
//!     .with_processor(SyntaxHighlighter::new())
//!     .render_markdown("# Intern\n\nSee [setup](#setup).");
//! assert_eq!(result.title.as_deref(), Some("Intern"));
//! ```

mod backend;
mod code_block;
mod highlight;
mod html;
mod link;
mod renderer;
mod slug;
mod state;

pub use backend::{CalloutKind, RenderBackend};
pub use code_block::{CodeBlockProcessor, ProcessResult};
pub use highlight::{SyntaxHighlighter, highlight, highlight_or_plain};
pub use html::HtmlBackend;
pub use link::{API_SCHEME, LinkResolver, is_absolute_url, page_directory, resolve_page_path};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use slug::{SlugGenerator, slug_base};
pub use state::{TocEntry, escape_html};
