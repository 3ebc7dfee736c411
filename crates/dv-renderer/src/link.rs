//! Rewriting of markdown link targets into router fragments.

use std::borrow::Cow;

use dv_route::{ContentType, PageId, encode};
use percent_encoding::percent_decode_str;

/// Pseudo-scheme marking cross-references into API pages.
pub const API_SCHEME: &str = "api:";

/// Resolves link and image targets relative to the page being rendered.
#[derive(Clone, Debug, Default)]
pub struct LinkResolver {
    page: Option<PageId>,
    asset_base: Option<String>,
}

impl LinkResolver {
    #[must_use]
    pub fn new(page: Option<PageId>, asset_base: Option<String>) -> Self {
        Self { page, asset_base }
    }

    /// Rewrite a link target.
    ///
    /// - `#frag` becomes the fragment of the current page at section `frag`.
    /// - A relative path becomes the fragment of that docs page, resolved
    ///   against the directory of the current page. A `#frag` suffix is kept
    ///   as the section.
    /// - Anything with a scheme (including `api:`) or starting with `//` is
    ///   returned unchanged.
    #[must_use]
    pub fn resolve_link<'a>(&self, url: &'a str) -> Cow<'a, str> {
        let Some(page) = &self.page else {
            return Cow::Borrowed(url);
        };
        if url.is_empty() || is_absolute_url(url) {
            return Cow::Borrowed(url);
        }

        if let Some(section) = url.strip_prefix('#') {
            let section = decode(section);
            let section = (!section.is_empty()).then_some(section.as_ref());
            return Cow::Owned(encode(&page.at_section(section)));
        }

        let (path, fragment) = match url.split_once('#') {
            Some((path, fragment)) => (path, Some(fragment)),
            None => (url, None),
        };
        let path = path.split_once('?').map_or(path, |(path, _query)| path);

        let target = resolve_page_path(&page.page, &decode(path));
        let mut id = PageId::new(page.docset.clone(), ContentType::Docs, target);
        if let Some(fragment) = fragment.filter(|f| !f.is_empty()) {
            id.section = Some(decode(fragment).into_owned());
        }
        Cow::Owned(encode(&id))
    }

    /// Rewrite an image source against the content base URL.
    ///
    /// Relative sources are resolved against the current page directory and
    /// prefixed with the asset base. Absolute URLs are returned unchanged.
    #[must_use]
    pub fn resolve_image<'a>(&self, src: &'a str) -> Cow<'a, str> {
        let Some(base) = &self.asset_base else {
            return Cow::Borrowed(src);
        };
        if src.is_empty() || is_absolute_url(src) || src.starts_with('#') {
            return Cow::Borrowed(src);
        }
        let page_path = self.page.as_ref().map_or("", |p| p.page.as_str());
        let resolved = resolve_page_path(page_path, src);
        Cow::Owned(format!("{}/{resolved}", base.trim_end_matches('/')))
    }
}

fn decode(s: &str) -> Cow<'_, str> {
    percent_decode_str(s).decode_utf8_lossy()
}

/// Whether `url` carries a scheme (`https:`, `mailto:`, `api:`) or is
/// protocol-relative.
#[must_use]
pub fn is_absolute_url(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    let Some(end) = url.find([':', '/', '?', '#']) else {
        return false;
    };
    end > 0
        && url.as_bytes()[end] == b':'
        && url[..end]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Directory part of a page path: everything up to the last `/`.
#[must_use]
pub fn page_directory(page: &str) -> &str {
    page.rfind('/').map_or("", |idx| &page[..idx])
}

/// Resolve `target` as seen from the page at `page`.
///
/// A leading `/` makes the target relative to the content root.
#[must_use]
pub fn resolve_page_path(page: &str, target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => resolve_relative_path(absolute, ""),
        None => resolve_relative_path(target, page_directory(page)),
    }
}

/// Resolve a relative path against a base directory.
///
/// Handles `.` (current), `..` (parent), and plain relative paths.
fn resolve_relative_path(relative: &str, base: &str) -> String {
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();

    for component in relative.split('/') {
        match component {
            "" | "." => {}
            // Popping past the root stays at the root.
            ".." => {
                segments.pop();
            }
            _ => segments.push(component),
        }
    }

    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv_route::DocSetId;
    use pretty_assertions::assert_eq;

    fn resolver(page: &str) -> LinkResolver {
        let id = PageId::new(DocSetId::new("Intern", "4"), ContentType::Docs, page);
        LinkResolver::new(
            Some(id),
            Some("https://raw.githubusercontent.com/theintern/intern/4.x/".to_owned()),
        )
    }

    #[test]
    fn test_fragment_link_targets_current_page() {
        assert_eq!(
            resolver("docs/page.md").resolve_link("#setup"),
            "#Intern/4/docs/docs%2Fpage.md/setup"
        );
    }

    #[test]
    fn test_sibling_link_keeps_section() {
        assert_eq!(
            resolver("dir/page.md").resolve_link("./sibling.md#frag"),
            "#Intern/4/docs/dir%2Fsibling.md/frag"
        );
    }

    #[test]
    fn test_parent_link() {
        assert_eq!(
            resolver("docs/deep/page.md").resolve_link("../README.md"),
            "#Intern/4/docs/docs%2FREADME.md"
        );
    }

    #[test]
    fn test_traversal_clamps_at_root() {
        assert_eq!(
            resolver("page.md").resolve_link("../../other.md"),
            "#Intern/4/docs/other.md"
        );
    }

    #[test]
    fn test_root_relative_link() {
        assert_eq!(
            resolver("docs/page.md").resolve_link("/CHANGELOG.md"),
            "#Intern/4/docs/CHANGELOG.md"
        );
    }

    #[test]
    fn test_percent_encoded_target_is_decoded_once() {
        assert_eq!(
            resolver("page.md").resolve_link("my%20page.md"),
            "#Intern/4/docs/my%20page.md"
        );
    }

    #[test]
    fn test_absolute_links_unchanged() {
        let r = resolver("page.md");
        assert_eq!(r.resolve_link("https://example.com/a.md"), "https://example.com/a.md");
        assert_eq!(r.resolve_link("//cdn.example.com/x"), "//cdn.example.com/x");
        assert_eq!(r.resolve_link("mailto:team@example.com"), "mailto:team@example.com");
        assert_eq!(r.resolve_link("api:Task.cancel"), "api:Task.cancel");
    }

    #[test]
    fn test_without_page_links_unchanged() {
        let r = LinkResolver::default();
        assert_eq!(r.resolve_link("./a.md"), "./a.md");
        assert_eq!(r.resolve_link("#x"), "#x");
    }

    #[test]
    fn test_image_resolved_against_asset_base() {
        assert_eq!(
            resolver("docs/page.md").resolve_image("../img/logo.png"),
            "https://raw.githubusercontent.com/theintern/intern/4.x/img/logo.png"
        );
        assert_eq!(
            resolver("docs/page.md").resolve_image("https://example.com/a.png"),
            "https://example.com/a.png"
        );
    }

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url("http://x"));
        assert!(is_absolute_url("api:Name"));
        assert!(!is_absolute_url("dir/file:1.md"));
        assert!(!is_absolute_url("./a.md"));
        assert!(!is_absolute_url(":oops"));
    }

    #[test]
    fn test_page_directory() {
        assert_eq!(page_directory("a/b/c.md"), "a/b");
        assert_eq!(page_directory("c.md"), "");
    }
}
