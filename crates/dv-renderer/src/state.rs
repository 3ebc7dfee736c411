//! Per-document state tracked while walking markdown events.

use pulldown_cmark::Alignment;

use crate::backend::CalloutKind;
use crate::slug::SlugGenerator;

/// State for tracking code block rendering.
#[derive(Default)]
pub struct CodeBlockState {
    active: bool,
    language: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    /// Start a new code block with optional language.
    pub fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// End the current code block and return (language, content).
    pub fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn push_newline(&mut self) {
        self.buffer.push('\n');
    }
}

/// State for tracking table rendering.
#[derive(Default)]
pub struct TableState {
    in_head: bool,
    alignments: Vec<Alignment>,
    cell_index: usize,
    head_has_content: bool,
}

impl TableState {
    /// Start a new table with column alignments.
    pub fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
        self.head_has_content = false;
    }

    /// End the header row. Returns `true` when every header cell was empty.
    pub fn end_head(&mut self) -> bool {
        self.in_head = false;
        !self.head_has_content
    }

    pub fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Record content inside the current cell.
    pub fn mark_content(&mut self, content: &str) {
        if self.in_head && !content.trim().is_empty() {
            self.head_has_content = true;
        }
    }

    /// Get the alignment style for the current cell.
    pub fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// State for tracking image alt text capture.
#[derive(Default)]
pub struct ImageState {
    active: bool,
    alt_text: String,
}

impl ImageState {
    pub fn start(&mut self) {
        self.active = true;
        self.alt_text.clear();
    }

    pub fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt_text)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// One open blockquote.
struct QuoteFrame {
    /// Byte range of the opening tag in the output.
    open: (usize, usize),
    kind: Option<CalloutKind>,
    /// Still waiting for the first text run to decide on a callout.
    undecided: bool,
}

/// Tracks open blockquotes and turns marked ones into callouts.
#[derive(Default)]
pub struct BlockquoteState {
    stack: Vec<QuoteFrame>,
}

impl BlockquoteState {
    /// Open a plain blockquote whose opening tag spans `open` in the output.
    pub fn open(&mut self, open: (usize, usize)) {
        self.stack.push(QuoteFrame {
            open,
            kind: None,
            undecided: true,
        });
    }

    /// Open a blockquote that is already known to be a callout.
    pub fn open_callout(&mut self, kind: CalloutKind, open: (usize, usize)) {
        self.stack.push(QuoteFrame {
            open,
            kind: Some(kind),
            undecided: false,
        });
    }

    /// Decide every open blockquote as plain, unless already decided.
    ///
    /// Used when the first content of a quote is not a text run.
    pub fn settle(&mut self) {
        for frame in &mut self.stack {
            frame.undecided = false;
        }
    }

    /// Close the innermost blockquote and return its callout kind, if any.
    pub fn close(&mut self) -> Option<CalloutKind> {
        self.stack.pop().and_then(|frame| frame.kind)
    }

    /// Inspect a text run inside the innermost blockquote.
    ///
    /// The first text run of an undecided blockquote decides whether it is a
    /// callout. On a marker glyph, returns the kind, the opening tag range to
    /// replace and the text with the glyph removed. Every enclosing quote is
    /// decided by the same run.
    pub fn first_text<'a>(
        &mut self,
        text: &'a str,
    ) -> Option<(CalloutKind, (usize, usize), &'a str)> {
        let innermost = self.stack.last()?;
        if !innermost.undecided {
            return None;
        }
        self.settle();

        let (kind, rest) = CalloutKind::strip_marker(text)?;
        let frame = self.stack.last_mut()?;
        frame.kind = Some(kind);
        Some((kind, frame.open, rest))
    }
}

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// State for tracking headings and title extraction.
pub struct HeadingState {
    extract_title: bool,
    title: Option<String>,
    current_level: Option<u8>,
    /// Plain text of the open heading, used for slug and table of contents.
    text: String,
    /// HTML of the open heading, with inline formatting.
    html: String,
    toc: Vec<TocEntry>,
    slugs: SlugGenerator,
}

impl HeadingState {
    pub fn new(extract_title: bool) -> Self {
        Self {
            extract_title,
            title: None,
            current_level: None,
            text: String::new(),
            html: String::new(),
            toc: Vec::new(),
            slugs: SlugGenerator::new(),
        }
    }

    pub fn set_extract_title(&mut self, extract_title: bool) {
        self.extract_title = extract_title;
    }

    pub fn set_slugs(&mut self, slugs: SlugGenerator) {
        self.slugs = slugs;
    }

    pub fn take_slugs(&mut self) -> SlugGenerator {
        std::mem::take(&mut self.slugs)
    }

    pub fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    pub fn start_heading(&mut self, level: u8) {
        self.current_level = Some(level);
        self.text.clear();
        self.html.clear();
    }

    /// Complete heading and record a table of contents entry.
    /// Returns (level, id, html) or None if not in a heading.
    pub fn complete_heading(&mut self) -> Option<(u8, String, String)> {
        let level = self.current_level.take()?;
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);
        let title = text.trim().to_owned();

        let id = self.slugs.slugify(&title);

        if self.extract_title && level == 1 && self.title.is_none() {
            self.title = Some(title.clone());
        }

        self.toc.push(TocEntry {
            level,
            title,
            id: id.clone(),
        });

        Some((level, id, html))
    }

    pub fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub fn html_buffer(&mut self) -> &mut String {
        &mut self.html
    }

    pub fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    pub fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }

    #[test]
    fn test_table_state_empty_head() {
        let mut state = TableState::default();
        state.start(vec![Alignment::None, Alignment::None]);
        state.start_head();
        state.mark_content("  ");
        assert!(state.end_head());

        state.start_head();
        state.mark_content("Name");
        assert!(!state.end_head());
    }

    #[test]
    fn test_table_alignment() {
        let mut state = TableState::default();
        state.start(vec![Alignment::Left, Alignment::Right]);
        state.start_head();
        assert_eq!(state.current_alignment_style(), r#" style="text-align:left""#);
        state.next_cell();
        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align:right""#
        );
        state.next_cell();
        assert_eq!(state.current_alignment_style(), "");
    }

    #[test]
    fn test_blockquote_decides_once() {
        let mut quotes = BlockquoteState::default();
        quotes.open((0, 12));
        assert_eq!(quotes.first_text("plain"), None);
        assert_eq!(quotes.first_text("⚠️ later"), None);
        assert_eq!(quotes.close(), None);
    }

    #[test]
    fn test_blockquote_marker() {
        let mut quotes = BlockquoteState::default();
        quotes.open((3, 15));
        let (kind, range, rest) = quotes.first_text("💡 Tip text").unwrap();
        assert_eq!(kind, CalloutKind::Info);
        assert_eq!(range, (3, 15));
        assert_eq!(rest, "Tip text");
        assert_eq!(quotes.close(), Some(CalloutKind::Info));
    }

    #[test]
    fn test_heading_state_dedupes_ids() {
        let mut state = HeadingState::new(true);
        state.start_heading(1);
        state.push_text("Guide");
        state.complete_heading();
        state.start_heading(2);
        state.push_text("Guide");
        let (level, id, _) = state.complete_heading().unwrap();
        assert_eq!(level, 2);
        assert_eq!(id, "guide-1");
        assert_eq!(state.take_title().as_deref(), Some("Guide"));
        assert_eq!(state.take_toc().len(), 2);
    }
}
