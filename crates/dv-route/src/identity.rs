//! Identity types for doc sets and pages.

use std::fmt;
use std::str::FromStr;

/// A project and one of its versions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocSetId {
    pub project: String,
    pub version: String,
}

impl DocSetId {
    #[must_use]
    pub fn new(project: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for DocSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project, self.version)
    }
}

/// Kind of content a page belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ContentType {
    /// Markdown documentation pages.
    #[default]
    Docs,
    /// Pages generated from API reflection data.
    Api,
}

impl ContentType {
    /// Fragment segment for this content type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Docs => "docs",
            Self::Api => "api",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "docs" => Ok(Self::Docs),
            "api" => Ok(Self::Api),
            _ => Err(()),
        }
    }
}

/// Fully specified location of a displayed page.
///
/// `page` is a markdown path for [`ContentType::Docs`] and a generated
/// module page name for [`ContentType::Api`]. `section` is a heading slug
/// within the page.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageId {
    pub docset: DocSetId,
    pub content_type: ContentType,
    pub page: String,
    pub section: Option<String>,
}

/// How a navigation target relates to the page currently shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Same doc set, content type and page; at most the section differs.
    SamePage,
    /// Same doc set, different page or content type.
    PageChange,
    /// Different project or version.
    DocSetChange,
}

impl PageId {
    #[must_use]
    pub fn new(docset: DocSetId, content_type: ContentType, page: impl Into<String>) -> Self {
        Self {
            docset,
            content_type,
            page: page.into(),
            section: None,
        }
    }

    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Copy of this identity with the given section (or none).
    #[must_use]
    pub fn at_section(&self, section: Option<&str>) -> Self {
        Self {
            section: section.map(str::to_owned),
            ..self.clone()
        }
    }

    /// Whether both identities name the same page, ignoring the section.
    #[must_use]
    pub fn same_page(&self, other: &PageId) -> bool {
        self.docset == other.docset
            && self.content_type == other.content_type
            && self.page == other.page
    }

    /// Classify a move from `previous` to `self`.
    #[must_use]
    pub fn navigation_from(&self, previous: &PageId) -> Navigation {
        if self.docset != previous.docset {
            Navigation::DocSetChange
        } else if self.same_page(previous) {
            Navigation::SamePage
        } else {
            Navigation::PageChange
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(project: &str, version: &str, page: &str) -> PageId {
        PageId::new(DocSetId::new(project, version), ContentType::Docs, page)
    }

    #[test]
    fn test_content_type_parse() {
        assert_eq!("docs".parse::<ContentType>(), Ok(ContentType::Docs));
        assert_eq!("api".parse::<ContentType>(), Ok(ContentType::Api));
        assert!("Docs".parse::<ContentType>().is_err());
        assert!("".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_same_page_ignores_section() {
        let a = page("Intern", "4", "a.md").with_section("one");
        let b = page("Intern", "4", "a.md").with_section("two");
        assert!(a.same_page(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_navigation_kinds() {
        let current = page("Intern", "4", "a.md");

        let scrolled = current.at_section(Some("setup"));
        assert_eq!(scrolled.navigation_from(&current), Navigation::SamePage);

        let other_page = page("Intern", "4", "b.md");
        assert_eq!(other_page.navigation_from(&current), Navigation::PageChange);

        let mut api = current.clone();
        api.content_type = ContentType::Api;
        assert_eq!(api.navigation_from(&current), Navigation::PageChange);

        let other_version = page("Intern", "3", "a.md");
        assert_eq!(
            other_version.navigation_from(&current),
            Navigation::DocSetChange
        );
    }

    #[test]
    fn test_docset_display() {
        assert_eq!(DocSetId::new("Intern", "4").to_string(), "Intern/4");
    }
}
