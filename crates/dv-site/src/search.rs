//! Full-text search over rendered pages.
//!
//! Matching is case-insensitive for ASCII and runs over the decoded text
//! between tags, so markup, attribute values and the spelling of character
//! references never match. Every hit remembers the
//! heading it appears under so results can link straight to that section.

use std::fmt::Write;

use dv_route::{ContentType, DocSetId, PageId, encode};

use crate::page::RenderedPage;

/// Characters of context on each side of a match.
const SNIPPET_CONTEXT: usize = 30;

/// Prefix of the ids given to `<mark>` elements.
pub const MARK_ID_PREFIX: &str = "search-result-";

/// One occurrence of the search term.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SearchHit {
    pub page: String,
    /// Title of the page the hit is on.
    pub page_title: String,
    /// Anchor of the nearest preceding heading.
    pub section: Option<String>,
    pub section_title: Option<String>,
    /// Text around the match.
    pub snippet: String,
    /// Router fragment of the hit's section.
    pub href: String,
    /// Index of the occurrence within its page, matching its `<mark>` id.
    pub occurrence: usize,
}

enum Segment<'a> {
    Tag(&'a str),
    Text(&'a str),
}

fn segments(html: &str) -> impl Iterator<Item = Segment<'_>> {
    let mut rest = html;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        if rest.starts_with('<') {
            let end = rest.find('>').map_or(rest.len(), |i| i + 1);
            let (tag, tail) = rest.split_at(end);
            rest = tail;
            Some(Segment::Tag(tag))
        } else {
            let end = rest.find('<').unwrap_or(rest.len());
            let (text, tail) = rest.split_at(end);
            rest = tail;
            Some(Segment::Text(text))
        }
    })
}

/// Anchor of an opening heading tag such as `<h2 id="setup">`.
fn heading_id(tag: &str) -> Option<&str> {
    let bytes = tag.as_bytes();
    if bytes.len() < 4 || bytes[1] != b'h' || !(b'1'..=b'6').contains(&bytes[2]) {
        return None;
    }
    if !matches!(bytes[3], b' ' | b'>') {
        return None;
    }
    let start = tag.find(r#"id=""#)? + 4;
    let len = tag[start..].find('"')?;
    Some(&tag[start..start + len])
}

fn is_heading_close(tag: &str) -> bool {
    let bytes = tag.as_bytes();
    bytes.len() == 5 && bytes.starts_with(b"</h") && (b'1'..=b'6').contains(&bytes[3])
}

/// A text segment with its character references decoded.
struct PlainText {
    text: String,
    /// Offset in the escaped segment of each byte of `text`, plus one entry
    /// for the end. `None` marks bytes that fall inside a reference, where
    /// no highlight may start or end.
    offsets: Vec<Option<usize>>,
}

impl PlainText {
    fn decode(escaped: &str) -> Self {
        let mut text = String::with_capacity(escaped.len());
        let mut offsets = Vec::with_capacity(escaped.len() + 1);
        let mut pos = 0;
        while let Some(c) = escaped[pos..].chars().next() {
            if c == '&'
                && let Some((len, decoded)) = char_reference(&escaped[pos..])
            {
                let start = text.len();
                match decoded {
                    Some(ch) => text.push(ch),
                    None => text.push_str(&escaped[pos..pos + len]),
                }
                offsets.push(Some(pos));
                offsets.resize(offsets.len() + text.len() - start - 1, None);
                pos += len;
            } else {
                offsets.extend((pos..pos + c.len_utf8()).map(Some));
                text.push(c);
                pos += c.len_utf8();
            }
        }
        offsets.push(Some(escaped.len()));
        Self { text, offsets }
    }

    /// Escaped byte range of the decoded range `start..end`, if both ends
    /// fall on reference boundaries.
    fn escaped_range(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        Some((self.offsets[start]?, self.offsets[end]?))
    }

    /// Decoded ranges of `needle` that can be highlighted in the escaped text.
    fn matches(&self, needle: &str) -> impl Iterator<Item = (usize, usize)> {
        let len = needle.len();
        match_offsets(&self.text, needle)
            .into_iter()
            .map(move |start| (start, start + len))
            .filter(|&(start, end)| self.escaped_range(start, end).is_some())
    }
}

/// Length of the character reference at the start of `s` and the character
/// it stands for. Unknown named references decode to `None` and are kept
/// verbatim.
fn char_reference(s: &str) -> Option<(usize, Option<char>)> {
    let semi = s.get(..12).unwrap_or(s).find(';')?;
    let name = &s[1..semi];
    let decoded = if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        Some(char::from_u32(code)?)
    } else {
        if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        match name {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            _ => None,
        }
    };
    Some((semi + 1, decoded))
}

/// Byte offsets of case-insensitive matches of `needle` in `text`.
fn match_offsets(text: &str, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }
    let haystack = text.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();
    let mut offsets = Vec::new();
    let mut from = 0;
    while let Some(i) = haystack[from..].find(&needle) {
        offsets.push(from + i);
        from += i + needle.len();
    }
    offsets
}

/// Decoded text around `start..end`, with whitespace collapsed.
fn snippet(text: &str, start: usize, end: usize) -> String {
    let before: String = {
        let chars: Vec<char> = text[..start].chars().rev().take(SNIPPET_CONTEXT).collect();
        chars.into_iter().rev().collect()
    };
    let after: String = text[end..].chars().take(SNIPPET_CONTEXT).collect();
    let joined = format!("{before}{}{after}", &text[start..end]);
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Wrap every occurrence of `term` in `html` with a numbered `<mark>`.
///
/// The term is matched against the decoded text, so `a & b` finds
/// `a &amp; b`. A mark never splits a character reference.
///
/// Returns the highlighted HTML and the number of occurrences.
#[must_use]
pub fn mark_occurrences(html: &str, term: &str) -> (String, usize) {
    let term = term.trim();
    let mut out = String::with_capacity(html.len());
    let mut count = 0;
    for segment in segments(html) {
        match segment {
            Segment::Tag(tag) => out.push_str(tag),
            Segment::Text(text) => {
                let plain = PlainText::decode(text);
                let mut pos = 0;
                for (start, end) in plain.matches(term) {
                    let Some((start, end)) = plain.escaped_range(start, end) else {
                        continue;
                    };
                    out.push_str(&text[pos..start]);
                    write!(
                        out,
                        r#"<mark id="{MARK_ID_PREFIX}{count}">{}</mark>"#,
                        &text[start..end]
                    )
                    .unwrap();
                    count += 1;
                    pos = end;
                }
                out.push_str(&text[pos..]);
            }
        }
    }
    (out, count)
}

/// Search `pages` for `term`, returning hits in page order.
///
/// Occurrence numbers restart at zero on each page, in the same order as
/// [`mark_occurrences`] numbers its marks.
#[must_use]
pub fn search_pages(
    docset: &DocSetId,
    content_type: ContentType,
    pages: &[RenderedPage],
    term: &str,
) -> Vec<SearchHit> {
    let term = term.trim();
    let mut hits = Vec::new();
    if term.is_empty() {
        return hits;
    }

    for page in pages {
        let base = PageId::new(docset.clone(), content_type, page.name.as_str());
        let page_title = page.display_title(&page.name).to_owned();
        let mut section: Option<&str> = None;
        let mut section_title: Option<String> = None;
        let mut in_heading = false;
        let mut occurrence = 0;

        for segment in segments(&page.html) {
            match segment {
                Segment::Tag(tag) => {
                    if let Some(id) = heading_id(tag) {
                        section = Some(id);
                        section_title = Some(String::new());
                        in_heading = true;
                    } else if is_heading_close(tag) {
                        in_heading = false;
                    }
                }
                Segment::Text(text) => {
                    let plain = PlainText::decode(text);
                    if in_heading && let Some(title) = &mut section_title {
                        title.push_str(&plain.text);
                    }
                    for (start, end) in plain.matches(term) {
                        let id = base.at_section(section);
                        hits.push(SearchHit {
                            page: page.name.clone(),
                            page_title: page_title.clone(),
                            section: section.map(str::to_owned),
                            section_title: section.and(section_title.clone()),
                            snippet: snippet(&plain.text, start, end),
                            href: encode(&id),
                            occurrence,
                        });
                        occurrence += 1;
                    }
                }
            }
        }
    }

    tracing::debug!(term, hit_count = hits.len(), "Search completed");
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(name: &str, html: &str) -> RenderedPage {
        RenderedPage {
            name: name.to_owned(),
            title: Some("Guide".to_owned()),
            html: html.to_owned(),
            toc: Vec::new(),
            warnings: Vec::new(),
        }
    }

    const HTML: &str = r#"<h1 id="guide">Guide</h1>
<p>Run <code>intern</code> to test.</p>
<h2 id="config">Config</h2>
<p>A <a href="intern.json">config file</a> named intern.json.</p>"#;

    #[test]
    fn test_mark_occurrences() {
        let (html, count) = mark_occurrences(HTML, "Intern");
        assert_eq!(count, 2);
        assert!(html.contains(r#"<code><mark id="search-result-0">intern</mark></code>"#));
        assert!(html.contains(r#"named <mark id="search-result-1">intern</mark>.json"#));
        assert!(html.contains(r#"href="intern.json""#));
    }

    #[test]
    fn test_mark_nothing() {
        let (html, count) = mark_occurrences(HTML, "absent");
        assert_eq!(count, 0);
        assert_eq!(html, HTML);
    }

    #[test]
    fn test_search_sections() {
        let docset = DocSetId::new("Intern", "4");
        let pages = [page("docs/guide.md", HTML)];
        let hits = search_pages(&docset, ContentType::Docs, &pages, "intern");
        assert_eq!(hits.len(), 2);

        assert_eq!(hits[0].section.as_deref(), Some("guide"));
        assert_eq!(hits[0].occurrence, 0);
        assert_eq!(hits[0].snippet, "intern");

        assert_eq!(hits[1].section.as_deref(), Some("config"));
        assert_eq!(hits[1].section_title.as_deref(), Some("Config"));
        assert_eq!(hits[1].snippet, "named intern.json.");
        assert_eq!(hits[1].href, "#Intern/4/docs/docs%2Fguide.md/config");
        assert_eq!(hits[1].page_title, "Guide");
    }

    #[test]
    fn test_search_before_first_heading() {
        let docset = DocSetId::new("Intern", "4");
        let pages = [page("a.md", "<p>intern</p>")];
        let hits = search_pages(&docset, ContentType::Docs, &pages, "INTERN");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].section, None);
        assert_eq!(hits[0].href, "#Intern/4/docs/a.md");
    }

    #[test]
    fn test_empty_term() {
        let docset = DocSetId::new("Intern", "4");
        assert!(search_pages(&docset, ContentType::Docs, &[page("a.md", HTML)], "  ").is_empty());
    }

    #[test]
    fn test_snippet_context() {
        let text = "a".repeat(40) + "needle" + &"b".repeat(40);
        let s = snippet(&text, 40, 46);
        assert_eq!(s, format!("{}needle{}", "a".repeat(30), "b".repeat(30)));
    }

    #[test]
    fn test_mark_skips_reference_names() {
        let (html, count) = mark_occurrences("<p>a &amp; b &quot;lt&quot;</p>", "amp");
        assert_eq!(count, 0);
        assert_eq!(html, "<p>a &amp; b &quot;lt&quot;</p>");

        let (html, count) = mark_occurrences("<p>a &amp; b &quot;lt&quot;</p>", "lt");
        assert_eq!(count, 1);
        assert_eq!(
            html,
            r#"<p>a &amp; b &quot;<mark id="search-result-0">lt</mark>&quot;</p>"#
        );
    }

    #[test]
    fn test_mark_decoded_term() {
        let (html, count) = mark_occurrences("<p>x a &amp; b y</p>", "a & b");
        assert_eq!(count, 1);
        assert_eq!(html, r#"<p>x <mark id="search-result-0">a &amp; b</mark> y</p>"#);

        let (html, count) = mark_occurrences("<p>if a &lt; b</p>", "<");
        assert_eq!(count, 1);
        assert_eq!(html, r#"<p>if a <mark id="search-result-0">&lt;</mark> b</p>"#);
    }

    #[test]
    fn test_mark_keeps_unknown_references_whole() {
        let (html, count) = mark_occurrences("<p>a&copy;b</p>", "copy");
        assert_eq!(count, 0);
        assert_eq!(html, "<p>a&copy;b</p>");
    }

    #[test]
    fn test_search_decoded_snippet() {
        let docset = DocSetId::new("Intern", "4");
        let text = format!("<p>{}&lt;T&gt; &amp; more</p>", "x".repeat(40));
        let pages = [page("a.md", &text)];
        let hits = search_pages(&docset, ContentType::Docs, &pages, "<t>");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].snippet, format!("{}<T> & more", "x".repeat(30)));
        assert!(search_pages(&docset, ContentType::Docs, &pages, "gt").is_empty());
    }

    #[test]
    fn test_decode_offsets() {
        let plain = PlainText::decode("a&amp;b&#39;");
        assert_eq!(plain.text, "a&b'");
        assert_eq!(plain.escaped_range(1, 2), Some((1, 6)));
        assert_eq!(plain.escaped_range(3, 4), Some((7, 12)));
    }

    #[test]
    fn test_heading_id() {
        assert_eq!(heading_id(r#"<h2 id="setup">"#), Some("setup"));
        assert_eq!(heading_id(r#"<hr>"#), None);
        assert_eq!(heading_id(r#"<header id="x">"#), None);
        assert!(is_heading_close("</h3>"));
    }
}
