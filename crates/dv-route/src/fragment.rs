//! Encoding and lenient decoding of URL fragments.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use crate::identity::{ContentType, DocSetId, PageId};

/// Characters escaped inside a single fragment segment.
///
/// `/` separates segments and `%` introduces escapes, so both must be encoded.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A decoded fragment whose segments may be missing.
///
/// Decoding never fails. Whether the named project, version, page and
/// section actually exist is decided later against the registry and the
/// loaded content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragment {
    pub project: Option<String>,
    pub version: Option<String>,
    /// `None` when the segment is absent or not a known content type.
    pub content_type: Option<ContentType>,
    pub page: Option<String>,
    pub section: Option<String>,
}

impl Fragment {
    /// True when the fragment carried no project.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.project.is_none()
    }

    /// Doc set named by the fragment, if both project and version are present.
    #[must_use]
    pub fn docset(&self) -> Option<DocSetId> {
        Some(DocSetId::new(self.project.clone()?, self.version.clone()?))
    }

    /// Convert into a complete identity when every required segment is present.
    #[must_use]
    pub fn into_page_id(self) -> Option<PageId> {
        Some(PageId {
            docset: DocSetId::new(self.project?, self.version?),
            content_type: self.content_type?,
            page: self.page?,
            section: self.section,
        })
    }
}

impl From<&PageId> for Fragment {
    fn from(id: &PageId) -> Self {
        Self {
            project: Some(id.docset.project.clone()),
            version: Some(id.docset.version.clone()),
            content_type: Some(id.content_type),
            page: Some(id.page.clone()),
            section: id.section.clone(),
        }
    }
}

fn push_segment(out: &mut String, segment: &str) {
    out.push('/');
    out.extend(utf8_percent_encode(segment, SEGMENT));
}

/// Encode a page identity as a fragment, including the leading `#`.
#[must_use]
pub fn encode(id: &PageId) -> String {
    let mut out = encode_docset(&id.docset);
    push_segment(&mut out, id.content_type.as_str());
    push_segment(&mut out, &id.page);
    if let Some(section) = &id.section {
        push_segment(&mut out, section);
    }
    out
}

/// Encode only the doc set part of a fragment (`#project/version`).
#[must_use]
pub fn encode_docset(docset: &DocSetId) -> String {
    let mut out = String::from("#");
    out.extend(utf8_percent_encode(&docset.project, SEGMENT));
    push_segment(&mut out, &docset.version);
    out
}

fn decode_segment(segment: &str) -> Option<String> {
    if segment.is_empty() {
        return None;
    }
    let decoded: Cow<'_, str> = percent_decode_str(segment).decode_utf8_lossy();
    Some(decoded.into_owned())
}

/// Decode a fragment, with or without its leading `#`.
///
/// Empty segments decode as absent. Segments past the section are ignored.
#[must_use]
pub fn decode(fragment: &str) -> Fragment {
    let body = fragment.strip_prefix('#').unwrap_or(fragment);
    if body.is_empty() {
        return Fragment::default();
    }

    let mut segments = body.split('/');
    let mut next = || segments.next().and_then(decode_segment);

    let project = next();
    let version = next();
    let content_type = next().and_then(|s| s.parse().ok());
    let page = next();
    let section = next();

    Fragment {
        project,
        version,
        content_type,
        page,
        section,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn intern(page: &str) -> PageId {
        PageId::new(DocSetId::new("Intern", "4"), ContentType::Docs, page)
    }

    #[test]
    fn test_encode_without_section() {
        assert_eq!(encode(&intern("a.md")), "#Intern/4/docs/a.md");
    }

    #[test]
    fn test_encode_escapes_each_segment() {
        let id = PageId::new(
            DocSetId::new("My Project", "1.0#beta"),
            ContentType::Api,
            "src/lib/Task",
        )
        .with_section("new%20thing");
        assert_eq!(
            encode(&id),
            "#My%20Project/1.0%23beta/api/src%2Flib%2FTask/new%2520thing"
        );
    }

    #[test]
    fn test_round_trip() {
        let ids = [
            intern("a.md"),
            intern("docs/getting started.md").with_section("setup-1"),
            PageId::new(DocSetId::new("Leadfoot", "2.x"), ContentType::Api, "helpers/pollUntil")
                .with_section("polluntil"),
            PageId::new(DocSetId::new("Ünïcode", "1/2"), ContentType::Docs, "?x.md"),
        ];
        for id in ids {
            assert_eq!(decode(&encode(&id)).into_page_id(), Some(id));
        }
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode(""), Fragment::default());
        assert_eq!(decode("#"), Fragment::default());
        assert!(decode("#").is_empty());
    }

    #[test]
    fn test_decode_partial() {
        let fragment = decode("#Intern/4");
        assert_eq!(fragment.docset(), Some(DocSetId::new("Intern", "4")));
        assert_eq!(fragment.content_type, None);
        assert_eq!(fragment.page, None);
        assert_eq!(fragment.into_page_id(), None);
    }

    #[test]
    fn test_decode_without_hash() {
        let fragment = decode("Intern/4/docs/a.md/intro");
        assert_eq!(
            fragment.into_page_id(),
            Some(intern("a.md").with_section("intro"))
        );
    }

    #[test]
    fn test_decode_unknown_content_type() {
        let fragment = decode("#Intern/4/blog/a.md");
        assert_eq!(fragment.content_type, None);
        assert_eq!(fragment.page.as_deref(), Some("a.md"));
    }

    #[test]
    fn test_decode_empty_segments_are_absent() {
        let fragment = decode("#Intern//docs/a.md/");
        assert_eq!(fragment.version, None);
        assert_eq!(fragment.section, None);
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        let fragment = decode("#Intern/%FF");
        assert_eq!(fragment.version.as_deref(), Some("\u{FFFD}"));
    }

    #[test]
    fn test_encode_docset() {
        assert_eq!(encode_docset(&DocSetId::new("Intern", "4")), "#Intern/4");
    }
}
