//! Code block processor hook.
//!
//! Processors are registered with the renderer and checked in order when a
//! fenced code block is encountered. The first processor returning a
//! non-`PassThrough` result wins; when none does, the backend renders a plain
//! `<pre><code>` block.

/// Result of processing a code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Replace the code block with this HTML.
    Inline(String),
    /// Not handled; fall through to the next processor or plain rendering.
    PassThrough,
}

/// Trait for processing fenced code blocks.
pub trait CodeBlockProcessor {
    /// Process a code block and return the result.
    ///
    /// # Arguments
    ///
    /// * `language` - Language identifier from the fence info string
    /// * `source` - Raw content of the code block
    fn process(&mut self, language: &str, source: &str) -> ProcessResult;

    /// Warnings collected while processing.
    fn warnings(&self) -> &[String] {
        &[]
    }
}

/// Language of a fence info string: its first word, if any.
///
/// Anything after the first word (`js title=x`) is ignored.
#[must_use]
pub(crate) fn fence_language(info: &str) -> Option<String> {
    info.split_whitespace().next().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_language_only() {
        assert_eq!(fence_language("typescript").as_deref(), Some("typescript"));
    }

    #[test]
    fn test_fence_language_ignores_trailing_words() {
        assert_eq!(
            fence_language("js title='config.js' lines=3").as_deref(),
            Some("js")
        );
    }

    #[test]
    fn test_fence_language_empty() {
        assert_eq!(fence_language("   "), None);
    }
}
