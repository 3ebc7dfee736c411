//! Removal of regions that only make sense on the source host.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Tables of contents maintained by the vim-markdown-toc plugin.
static EDITOR_TOC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--\s*vim-markdown-toc\b[^>]*-->.*?<!--\s*vim-markdown-toc\s*-->").unwrap()
});

/// Content meant for readers browsing the repository on GitHub.
static GITHUB_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--\s*start-github-only\s*-->.*?<!--\s*end-github-only\s*-->").unwrap()
});

/// Strip editor table-of-contents blocks and GitHub-only sections.
///
/// Each region runs from its start marker to the nearest end marker, so
/// several regions in one document are removed independently. Text outside
/// the markers is left untouched.
#[must_use]
pub fn scrub(markdown: &str) -> Cow<'_, str> {
    match EDITOR_TOC.replace_all(markdown, "") {
        Cow::Borrowed(text) => GITHUB_ONLY.replace_all(text, ""),
        Cow::Owned(text) => Cow::Owned(GITHUB_ONLY.replace_all(&text, "").into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_editor_toc_removed() {
        let text = "# Title\n<!-- vim-markdown-toc GFM -->\n* [Setup](#setup)\n<!-- vim-markdown-toc -->\nBody";
        assert_eq!(scrub(text), "# Title\n\nBody");
    }

    #[test]
    fn test_bare_markers_removed() {
        assert_eq!(scrub("<!-- vim-markdown-toc -->anything<!-- vim-markdown-toc -->"), "");
    }

    #[test]
    fn test_two_regions_non_greedy() {
        let text = "a<!-- vim-markdown-toc -->x<!-- vim-markdown-toc -->b\
                    <!-- vim-markdown-toc -->y<!-- vim-markdown-toc -->c";
        assert_eq!(scrub(text), "abc");
    }

    #[test]
    fn test_github_only_removed() {
        let text = "intro\n<!-- start-github-only -->\n[Docs](https://theintern.io)\n<!-- end-github-only -->\nrest";
        assert_eq!(scrub(text), "intro\n\nrest");
    }

    #[test]
    fn test_untouched_without_markers() {
        let text = "# Title\n\n<!-- a comment -->\n";
        assert!(matches!(scrub(text), Cow::Borrowed(_)));
    }

    #[test]
    fn test_unterminated_region_kept() {
        let text = "<!-- start-github-only -->\nno end";
        assert_eq!(scrub(text), text);
    }
}
