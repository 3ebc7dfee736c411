//! Navigation menus built from page headings.
//!
//! Each page contributes one tree rooted at its H1. Deeper headings nest
//! under the nearest preceding shallower heading. All trees of one content
//! type form the menu of a doc set.

use std::fmt::Write;

use dv_renderer::escape_html;
use dv_route::{ContentType, DocSetId, PageId, encode};

use crate::page::RenderedPage;

/// One menu entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MenuNode {
    pub level: u8,
    pub title: String,
    /// Router fragment of the page or section.
    pub href: String,
    pub page: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub section: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<MenuNode>,
}

/// Menu of one content type of a doc set.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Menu {
    pub content_type: ContentType,
    /// One root per page, in page order.
    pub items: Vec<MenuNode>,
}

impl Menu {
    /// Build the menu of `pages`, showing headings down to `max_depth`.
    ///
    /// A page without an H1 gets a root titled `fallback_title`.
    #[must_use]
    pub fn build(
        docset: &DocSetId,
        content_type: ContentType,
        pages: &[RenderedPage],
        max_depth: u8,
        fallback_title: &str,
    ) -> Self {
        let items = pages
            .iter()
            .map(|page| {
                let base = PageId::new(docset.clone(), content_type, page.name.as_str());
                page_tree(&base, page, max_depth, fallback_title)
            })
            .collect();
        Self {
            content_type,
            items,
        }
    }

    /// Depth-first iterator over every node.
    pub fn iter(&self) -> impl Iterator<Item = &MenuNode> {
        let mut stack: Vec<&MenuNode> = self.items.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// The node to highlight for `id`: its section if listed, else its page.
    #[must_use]
    pub fn find(&self, id: &PageId) -> Option<&MenuNode> {
        if id.content_type != self.content_type {
            return None;
        }
        let mut page_node = None;
        for node in self.iter().filter(|n| n.page == id.page) {
            if node.section.is_none() {
                page_node = page_node.or(Some(node));
            }
            if id.section.is_some() && node.section == id.section {
                return Some(node);
            }
        }
        page_node
    }

    /// Render as nested `<ul>` lists, marking the node for `active`.
    #[must_use]
    pub fn to_html(&self, active: Option<&PageId>) -> String {
        let active_href = active
            .and_then(|id| self.find(id))
            .map(|node| node.href.as_str());
        let mut html = String::from(r#"<ul class="menu">"#);
        for item in &self.items {
            write_node(&mut html, item, active_href);
        }
        html.push_str("</ul>");
        html
    }
}

fn write_node(html: &mut String, node: &MenuNode, active: Option<&str>) {
    let class = if active == Some(node.href.as_str()) {
        r#" class="active""#
    } else {
        ""
    };
    write!(
        html,
        r#"<li><a href="{}"{class}>{}</a>"#,
        escape_html(&node.href),
        escape_html(&node.title)
    )
    .unwrap();
    if !node.children.is_empty() {
        html.push_str("<ul>");
        for child in &node.children {
            write_node(html, child, active);
        }
        html.push_str("</ul>");
    }
    html.push_str("</li>");
}

fn page_tree(base: &PageId, page: &RenderedPage, max_depth: u8, fallback_title: &str) -> MenuNode {
    let node = |level: u8, title: &str, section: Option<&str>| {
        let id = base.at_section(section);
        MenuNode {
            level,
            title: title.to_owned(),
            href: encode(&id),
            page: base.page.clone(),
            section: section.map(str::to_owned),
            children: Vec::new(),
        }
    };

    let mut root = match page.toc.iter().find(|e| e.level == 1) {
        Some(h1) => node(1, &h1.title, None),
        None => node(1, fallback_title, None),
    };

    // Sibling lists of the open heading levels, shallowest first.
    let mut stack: Vec<(u8, Vec<MenuNode>)> = Vec::new();
    for entry in page.toc.iter().filter(|e| e.level >= 2 && e.level <= max_depth) {
        while let Some((level, _)) = stack.last() {
            if *level <= entry.level {
                break;
            }
            let Some((_, nodes)) = stack.pop() else {
                break;
            };
            match stack.last_mut() {
                Some((parent_level, siblings)) if *parent_level >= entry.level => {
                    if let Some(parent) = siblings.last_mut() {
                        parent.children.extend(nodes);
                    }
                }
                // No heading of the new level is open: promote the orphans.
                _ => stack.push((entry.level, nodes)),
            }
        }

        let item = node(entry.level, &entry.title, Some(&entry.id));
        match stack.last_mut() {
            Some((level, siblings)) if *level == entry.level => siblings.push(item),
            _ => stack.push((entry.level, vec![item])),
        }
    }

    while let Some((_, nodes)) = stack.pop() {
        match stack.last_mut().and_then(|(_, siblings)| siblings.last_mut()) {
            Some(parent) => parent.children.extend(nodes),
            None => root.children.extend(nodes),
        }
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv_renderer::TocEntry;
    use pretty_assertions::assert_eq;

    fn page(name: &str, headings: &[(u8, &str)]) -> RenderedPage {
        RenderedPage {
            name: name.to_owned(),
            title: headings
                .iter()
                .find(|(level, _)| *level == 1)
                .map(|(_, t)| (*t).to_owned()),
            html: String::new(),
            toc: headings
                .iter()
                .map(|(level, title)| TocEntry {
                    level: *level,
                    title: (*title).to_owned(),
                    id: title.to_lowercase(),
                })
                .collect(),
            warnings: Vec::new(),
        }
    }

    fn docset() -> DocSetId {
        DocSetId::new("Intern", "4")
    }

    fn shape(node: &MenuNode) -> String {
        if node.children.is_empty() {
            node.title.clone()
        } else {
            let children: Vec<_> = node.children.iter().map(shape).collect();
            format!("{}[{}]", node.title, children.join(" "))
        }
    }

    #[test]
    fn test_nesting() {
        let pages = [page(
            "README.md",
            &[(1, "Intern"), (2, "A"), (2, "B"), (3, "C"), (2, "D")],
        )];
        let menu = Menu::build(&docset(), ContentType::Docs, &pages, 3, "Intern");
        assert_eq!(shape(&menu.items[0]), "Intern[A B[C] D]");
    }

    #[test]
    fn test_unwinds_deep_levels_at_end() {
        let pages = [page("a.md", &[(1, "T"), (2, "A"), (3, "B"), (4, "C")])];
        let menu = Menu::build(&docset(), ContentType::Docs, &pages, 6, "x");
        assert_eq!(shape(&menu.items[0]), "T[A[B[C]]]");
    }

    #[test]
    fn test_shallower_jump_attaches_to_open_parent() {
        let pages = [page(
            "a.md",
            &[(1, "T"), (2, "A"), (3, "B"), (4, "C"), (2, "D")],
        )];
        let menu = Menu::build(&docset(), ContentType::Docs, &pages, 6, "x");
        assert_eq!(shape(&menu.items[0]), "T[A[B[C]] D]");
    }

    #[test]
    fn test_orphan_headings_promoted() {
        let pages = [page("a.md", &[(1, "T"), (3, "A"), (2, "B")])];
        let menu = Menu::build(&docset(), ContentType::Docs, &pages, 3, "x");
        assert_eq!(shape(&menu.items[0]), "T[A B]");
    }

    #[test]
    fn test_depth_limit() {
        let pages = [page("a.md", &[(1, "T"), (2, "A"), (3, "B")])];
        let menu = Menu::build(&docset(), ContentType::Docs, &pages, 2, "x");
        assert_eq!(shape(&menu.items[0]), "T[A]");
    }

    #[test]
    fn test_missing_h1_uses_fallback_title() {
        let pages = [page("a.md", &[(2, "A")])];
        let menu = Menu::build(&docset(), ContentType::Docs, &pages, 3, "Intern");
        assert_eq!(shape(&menu.items[0]), "Intern[A]");
        assert_eq!(menu.items[0].href, "#Intern/4/docs/a.md");
    }

    #[test]
    fn test_hrefs_and_find() {
        let pages = [
            page("README.md", &[(1, "Intern"), (2, "Setup")]),
            page("docs/api.md", &[(1, "Api")]),
        ];
        let menu = Menu::build(&docset(), ContentType::Docs, &pages, 3, "Intern");
        assert_eq!(menu.items[0].children[0].href, "#Intern/4/docs/README.md/setup");
        assert_eq!(menu.items[1].href, "#Intern/4/docs/docs%2Fapi.md");

        let id = PageId::new(docset(), ContentType::Docs, "README.md");
        assert_eq!(menu.find(&id).unwrap().title, "Intern");
        assert_eq!(
            menu.find(&id.at_section(Some("setup"))).unwrap().title,
            "Setup"
        );
        assert_eq!(
            menu.find(&id.at_section(Some("missing"))).unwrap().title,
            "Intern"
        );
        let api = PageId::new(docset(), ContentType::Api, "README.md");
        assert!(menu.find(&api).is_none());
    }

    #[test]
    fn test_iter_document_order() {
        let pages = [
            page("a.md", &[(1, "A"), (2, "A1")]),
            page("b.md", &[(1, "B")]),
        ];
        let menu = Menu::build(&docset(), ContentType::Docs, &pages, 3, "x");
        let titles: Vec<_> = menu.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["A", "A1", "B"]);
    }

    #[test]
    fn test_to_html_marks_active() {
        let pages = [page("a.md", &[(1, "A"), (2, "Setup")])];
        let menu = Menu::build(&docset(), ContentType::Docs, &pages, 3, "x");
        let active = PageId::new(docset(), ContentType::Docs, "a.md").with_section("setup");
        let html = menu.to_html(Some(&active));
        assert_eq!(
            html,
            "<ul class=\"menu\"><li><a href=\"#Intern/4/docs/a.md\">A</a><ul>\
             <li><a href=\"#Intern/4/docs/a.md/setup\" class=\"active\">Setup</a></li>\
             </ul></li></ul>"
        );
    }
}
