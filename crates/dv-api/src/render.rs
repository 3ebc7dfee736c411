//! API page rendering.
//!
//! Each documented module becomes one page. Rendering happens in two passes:
//! the walk over all modules assigns heading anchors and records every
//! cross-reference as a numbered placeholder, then a final pass rewrites the
//! placeholders once every anchor in the tree is known. A reference from one
//! module to a declaration of a module rendered later still resolves.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::LazyLock;

use dv_renderer::{
    API_SCHEME, CalloutKind, HtmlBackend, MarkdownRenderer, SlugGenerator, SyntaxHighlighter,
    TocEntry, escape_html,
};
use dv_route::{ContentType, DocSetId, PageId, encode};
use regex::{Captures, Regex};

use crate::code::{CodeLine, Xref};
use crate::model::{
    ApiTree, ContainerDecl, DeclId, DeclInfo, Declaration, DocComment, Parameter, Signature,
    TypeExpr,
};
use crate::signature::{
    accessor_lines, callable_lines, class_line, object_literal_line, property_line,
    type_alias_line,
};
use crate::wrap::wrap_signature;

static XREF_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]|]+)(?:\|([^\]]*))?\]\]").unwrap());
static API_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a href="api:([^"]*)">"#).unwrap());
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a data-xref="(\d+)""#).unwrap());

const MAX_LEVEL: u8 = 6;

/// Rendering options.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Width beyond which signatures are wrapped.
    pub signature_width: usize,
    /// URL prefix for "Defined in" links, e.g. `https://github.com/o/r/blob/master`.
    pub source_base: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            signature_width: 60,
            source_base: None,
        }
    }
}

/// One rendered API page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiPage {
    /// Page name, the module path.
    pub name: String,
    pub title: String,
    pub html: String,
    pub toc: Vec<TocEntry>,
}

/// All API pages of a doc set, in module order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiRender {
    pub pages: Vec<ApiPage>,
    /// Number of references that matched no declaration.
    pub unresolved: usize,
}

impl ApiRender {
    #[must_use]
    pub fn page(&self, name: &str) -> Option<&ApiPage> {
        self.pages.iter().find(|p| p.name == name)
    }

    pub fn page_names(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|p| p.name.as_str())
    }
}

/// Render one page per documented module of `tree`.
///
/// Modules with no exported members and no comment are skipped.
#[must_use]
pub fn render_api_pages(docset: &DocSetId, tree: &ApiTree, options: &RenderOptions) -> ApiRender {
    let mut ctx = RenderContext::new(docset, options);

    for module in &tree.modules {
        if module.members.is_empty()
            && module.info.comment.as_ref().is_none_or(DocComment::is_empty)
        {
            tracing::debug!(module = %module.info.name, "Skipping undocumented module");
            continue;
        }
        ctx.render_module(module);
    }

    ctx.finish()
}

#[derive(Debug)]
struct Anchor {
    page: String,
    slug: Option<String>,
}

#[derive(Default)]
struct PageBuffer {
    name: String,
    html: String,
    slugs: SlugGenerator,
    toc: Vec<TocEntry>,
}

struct RenderContext<'a> {
    docset: &'a DocSetId,
    options: &'a RenderOptions,
    current: PageBuffer,
    done: Vec<PageBuffer>,
    anchors: Vec<Anchor>,
    by_id: HashMap<DeclId, usize>,
    by_name: HashMap<String, usize>,
    pending: Vec<Xref>,
}

impl<'a> RenderContext<'a> {
    fn new(docset: &'a DocSetId, options: &'a RenderOptions) -> Self {
        Self {
            docset,
            options,
            current: PageBuffer::default(),
            done: Vec::new(),
            anchors: Vec::new(),
            by_id: HashMap::new(),
            by_name: HashMap::new(),
            pending: Vec::new(),
        }
    }

    fn page_id(&self, page: &str) -> PageId {
        PageId::new(self.docset.clone(), ContentType::Api, page)
    }

    fn render_module(&mut self, module: &ContainerDecl) {
        let previous = std::mem::replace(
            &mut self.current,
            PageBuffer {
                name: module.info.name.clone(),
                ..PageBuffer::default()
            },
        );
        if !previous.name.is_empty() {
            self.done.push(previous);
        }

        self.heading(1, &module.info.name);
        self.register(&module.info, None, None);

        if let Some(comment) = &module.info.comment {
            self.comment(comment);
        }
        self.members(&module.members, 2, Some(&module.info.name));
    }

    /// Render module-like members grouped by kind.
    fn members(&mut self, members: &[Declaration], level: u8, parent: Option<&str>) {
        let mut globals = Vec::new();
        let mut classes = Vec::new();
        let mut interfaces = Vec::new();
        let mut functions = Vec::new();
        let mut objects = Vec::new();

        for member in members {
            match member {
                Declaration::Variable(_) | Declaration::TypeAlias(_) | Declaration::Module(_) => {
                    globals.push(member);
                }
                Declaration::Class(_) => classes.push(member),
                Declaration::Interface(_) => interfaces.push(member),
                Declaration::Function(_) => functions.push(member),
                Declaration::ObjectLiteral(_) => objects.push(member),
                _ => globals.push(member),
            }
        }

        for mut group in [globals, classes, interfaces, functions, objects] {
            group.sort_by(|a, b| a.name().cmp(b.name()));
            for decl in group {
                self.declaration(decl, level, parent);
            }
        }
    }

    /// Render class members: properties and accessors, constructors, then methods.
    fn class_members(&mut self, members: &[Declaration], level: u8, parent: &str) {
        let mut properties = Vec::new();
        let mut constructors = Vec::new();
        let mut methods = Vec::new();
        for member in members {
            match member {
                Declaration::Constructor(_) => constructors.push(member),
                Declaration::Method(_) | Declaration::Function(_) => methods.push(member),
                _ => properties.push(member),
            }
        }
        properties.sort_by(|a, b| a.name().cmp(b.name()));
        methods.sort_by(|a, b| a.name().cmp(b.name()));

        for decl in properties.into_iter().chain(constructors).chain(methods) {
            self.declaration(decl, level, Some(parent));
        }
    }

    fn declaration(&mut self, decl: &Declaration, level: u8, parent: Option<&str>) {
        let info = decl.info();
        let title = match decl {
            Declaration::Constructor(_) => "constructor",
            _ => info.name.as_str(),
        };
        let slug = self.heading(level, title);
        self.register(info, Some(slug), parent);
        let child_level = (level + 1).min(MAX_LEVEL);

        match decl {
            Declaration::Module(namespace) => {
                if let Some(comment) = &info.comment {
                    self.comment(comment);
                }
                self.members(&namespace.members, child_level, Some(&info.name));
            }
            Declaration::Class(class) | Declaration::Interface(class) => {
                let interface = matches!(decl, Declaration::Interface(_));
                self.code(class_line(class, interface));
                self.notes(info);
                self.class_members(&class.members, child_level, &info.name);
            }
            Declaration::Function(function)
            | Declaration::Method(function)
            | Declaration::Constructor(function) => {
                for line in callable_lines(decl, function) {
                    self.code(line);
                }
                self.notes(info);
                for signature in &function.signatures {
                    self.signature_details(signature, info.comment.as_ref());
                }
            }
            Declaration::Property(property) | Declaration::Variable(property) => {
                self.code(property_line(property, matches!(decl, Declaration::Variable(_))));
                self.notes(info);
            }
            Declaration::Accessor(accessor) => {
                let access = match (&accessor.getter, &accessor.setter) {
                    (Some(_), None) => Some("read-only"),
                    (None, Some(_)) => Some("write-only"),
                    _ => None,
                };
                if let Some(access) = access {
                    writeln!(
                        self.current.html,
                        r#"<p class="access"><span class="badge">{access}</span></p>"#
                    )
                    .unwrap();
                }
                for line in accessor_lines(accessor) {
                    self.code(line);
                }
                self.notes(info);
            }
            Declaration::ObjectLiteral(object) => {
                self.code(object_literal_line(object));
                self.notes(info);
            }
            Declaration::TypeAlias(alias) => {
                self.code(type_alias_line(alias));
                self.notes(info);
            }
        }
    }

    /// Comment, inheritance and source location of a declaration.
    fn notes(&mut self, info: &DeclInfo) {
        if let Some(comment) = &info.comment {
            self.comment(comment);
        }
        if let Some(inherited) = &info.inherited_from {
            let (target, label) = match inherited {
                TypeExpr::Reference { name, id, .. } => (
                    id.map_or_else(|| Xref::Name(name.clone()), Xref::Id),
                    name.clone(),
                ),
                other => {
                    let mut line = CodeLine::new();
                    crate::signature::push_type(&mut line, other);
                    (Xref::Name(line.text.clone()), line.text)
                }
            };
            let open = self.placeholder(target);
            writeln!(
                self.current.html,
                r#"<p class="inherited">Inherited from {open}{}</a></p>"#,
                escape_html(&label)
            )
            .unwrap();
        }
        if let Some(source) = info.sources.first() {
            let label = match source.line {
                Some(line) => format!("{}:{line}", source.file),
                None => source.file.clone(),
            };
            match &self.options.source_base {
                Some(base) => {
                    let mut href = format!("{}/{}", base.trim_end_matches('/'), source.file);
                    if let Some(line) = source.line {
                        write!(href, "#L{line}").unwrap();
                    }
                    writeln!(
                        self.current.html,
                        r#"<p class="source">Defined in <a href="{}">{}</a></p>"#,
                        escape_html(&href),
                        escape_html(&label)
                    )
                    .unwrap();
                }
                None => {
                    writeln!(
                        self.current.html,
                        r#"<p class="source">Defined in {}</p>"#,
                        escape_html(&label)
                    )
                    .unwrap();
                }
            }
        }
    }

    fn signature_details(&mut self, signature: &Signature, fallback: Option<&DocComment>) {
        self.parameter_table(&signature.parameters);
        let returns = signature
            .comment
            .as_ref()
            .and_then(|c| c.returns.as_deref())
            .or_else(|| fallback.and_then(|c| c.returns.as_deref()));
        if let Some(returns) = returns {
            let html = self.markdown(&format!("**Returns:** {}", returns.trim()));
            self.current.html.push_str(&html);
        }
    }

    fn parameter_table(&mut self, parameters: &[Parameter]) {
        let rows: Vec<&Parameter> = parameters
            .iter()
            .filter(|p| p.comment.is_some() || p.default_value.is_some())
            .collect();
        if rows.is_empty() {
            return;
        }
        let with_default = rows.iter().any(|p| p.default_value.is_some());

        let mut table = String::from(
            r#"<table class="table table-bordered parameters"><thead><tr><th>Parameter</th><th>Description</th>"#,
        );
        if with_default {
            table.push_str("<th>Default</th>");
        }
        table.push_str("</tr></thead><tbody>");
        for param in rows {
            let description = param
                .comment
                .as_ref()
                .map(|c| unwrap_paragraph(&self.markdown(&c.markdown())))
                .unwrap_or_default();
            write!(
                table,
                "<tr><td>{}</td><td>{description}</td>",
                escape_html(&param.name)
            )
            .unwrap();
            if with_default {
                match &param.default_value {
                    Some(value) => {
                        write!(table, "<td><code>{}</code></td>", escape_html(value.trim()))
                            .unwrap();
                    }
                    None => table.push_str("<td></td>"),
                }
            }
            table.push_str("</tr>");
        }
        table.push_str("</tbody></table>\n");
        self.current.html.push_str(&table);
    }

    fn comment(&mut self, comment: &DocComment) {
        let text = comment.markdown();
        if !text.is_empty() {
            let html = self.markdown(&text);
            self.current.html.push_str(&html);
        }
        if let Some(deprecated) = &comment.deprecated {
            let marker = CalloutKind::Deprecated.marker();
            let html = self.markdown(&format!("> {marker} **Deprecated.** {deprecated}"));
            self.current.html.push_str(&html);
        }
    }

    /// Render comment markdown on the current page.
    ///
    /// Heading anchors continue from the page's generator so ids stay unique.
    fn markdown(&mut self, text: &str) -> String {
        let text = rewrite_xref_markers(text);
        let page = self.page_id(&self.current.name);
        let slugs = std::mem::take(&mut self.current.slugs);
        let mut renderer = MarkdownRenderer::<HtmlBackend>::new()
            .with_page(page)
            .with_slugs(slugs)
            .with_processor(SyntaxHighlighter::new());
        let result = renderer.render_markdown(&text);
        self.current.slugs = renderer.take_slugs();

        API_HREF
            .replace_all(&result.html, |caps: &Captures| {
                let name = html_unescape(&caps[1]);
                self.placeholder(Xref::Name(name))
            })
            .into_owned()
    }

    fn code(&mut self, mut line: CodeLine) {
        let edits = wrap_signature(&line.text, self.options.signature_width);
        line.apply(&edits);
        let html = line.to_html(|target| Some(self.placeholder(target.clone())));
        self.current.html.push_str(&html);
    }

    fn heading(&mut self, level: u8, title: &str) -> String {
        let slug = self.current.slugs.slugify(title);
        writeln!(
            self.current.html,
            r#"<h{level} id="{slug}">{}</h{level}>"#,
            escape_html(title)
        )
        .unwrap();
        self.current.toc.push(TocEntry {
            level,
            title: title.to_owned(),
            id: slug.clone(),
        });
        slug
    }

    fn register(&mut self, info: &DeclInfo, slug: Option<String>, parent: Option<&str>) {
        let index = self.anchors.len();
        self.anchors.push(Anchor {
            page: self.current.name.clone(),
            slug,
        });
        if let Some(id) = info.id {
            self.by_id.entry(id).or_insert(index);
        }
        self.by_name.entry(info.name.clone()).or_insert(index);
        if let Some(parent) = parent {
            self.by_name
                .entry(format!("{parent}.{}", info.name))
                .or_insert(index);
        }
    }

    /// Record a reference and return the opening tag standing in for it.
    fn placeholder(&mut self, target: Xref) -> String {
        self.pending.push(target);
        format!(r#"<a data-xref="{}">"#, self.pending.len() - 1)
    }

    fn resolve(&self, target: &Xref) -> Option<&Anchor> {
        let index = match target {
            Xref::Id(id) => self.by_id.get(id),
            Xref::Name(name) => self.by_name.get(name.as_str()),
        }?;
        self.anchors.get(*index)
    }

    /// Second pass: rewrite every placeholder now that all anchors exist.
    fn finish(mut self) -> ApiRender {
        if !self.current.name.is_empty() {
            let last = std::mem::take(&mut self.current);
            self.done.push(last);
        }

        let mut unresolved = 0;
        let hrefs: Vec<Option<String>> = self
            .pending
            .iter()
            .map(|target| {
                let href = self.resolve(target).map(|anchor| {
                    let id = self.page_id(&anchor.page).at_section(anchor.slug.as_deref());
                    encode(&id)
                });
                if href.is_none() {
                    unresolved += 1;
                    tracing::debug!(?target, "Unresolved API reference");
                }
                href
            })
            .collect();

        let pages = std::mem::take(&mut self.done)
            .into_iter()
            .map(|page| {
                let html = PLACEHOLDER
                    .replace_all(&page.html, |caps: &Captures| {
                        let href = caps[1]
                            .parse::<usize>()
                            .ok()
                            .and_then(|n| hrefs.get(n))
                            .and_then(Option::as_ref);
                        match href {
                            Some(href) => format!(r#"<a href="{}""#, escape_html(href)),
                            None => r#"<a class="xref-unresolved""#.to_owned(),
                        }
                    })
                    .into_owned();
                ApiPage {
                    title: page.name.clone(),
                    name: page.name,
                    html,
                    toc: page.toc,
                }
            })
            .collect();

        ApiRender { pages, unresolved }
    }
}

/// Turn `[[Name]]` and `[[Name|Label]]` into `api:` markdown links.
fn rewrite_xref_markers(text: &str) -> String {
    XREF_MARKER
        .replace_all(text, |caps: &Captures| {
            let name = caps[1].trim();
            let label = caps
                .get(2)
                .map(|m| m.as_str().trim())
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| default_label(name));
            let dest = name.replace('<', r"\<").replace('>', r"\>");
            format!("[{label}](<{API_SCHEME}{dest}>)")
        })
        .into_owned()
}

/// Last dotted or slashed segment of a reference name.
fn default_label(name: &str) -> &str {
    name.rsplit(['.', '/']).next().unwrap_or(name)
}

fn html_unescape(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Strip the paragraph around single-paragraph HTML.
fn unwrap_paragraph(html: &str) -> String {
    let trimmed = html.trim();
    match trimmed
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
    {
        Some(inner) if !inner.contains("<p>") => inner.to_owned(),
        _ => trimmed.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn docset() -> DocSetId {
        DocSetId::new("Intern", "4")
    }

    fn render(json: &str) -> ApiRender {
        let tree = ApiTree::from_json(json).unwrap();
        render_api_pages(&docset(), &tree, &RenderOptions::default())
    }

    const TWO_MODULES: &str = r#"{
        "name": "intern",
        "children": [
            {
                "id": 1,
                "name": "\"lib/executors/Executor\"",
                "kindString": "External module",
                "children": [{
                    "id": 2,
                    "name": "run",
                    "kindString": "Function",
                    "signatures": [{
                        "name": "run",
                        "comment": {"shortText": "Run a [[lib/tasks/Task.Task|task]] now."},
                        "parameters": [{
                            "name": "task",
                            "kindString": "Parameter",
                            "comment": {"text": "The task to run."},
                            "type": {"type": "reference", "name": "Task", "id": 11}
                        }],
                        "type": {"type": "reference", "name": "Result", "id": 99}
                    }]
                }]
            },
            {
                "id": 10,
                "name": "\"lib/tasks/Task\"",
                "kindString": "External module",
                "children": [{
                    "id": 11,
                    "name": "Task",
                    "kindString": "Class",
                    "children": [{
                        "id": 12,
                        "name": "cancel",
                        "kindString": "Method",
                        "signatures": [{"name": "cancel", "type": {"type": "intrinsic", "name": "void"}}]
                    }]
                }]
            },
            {
                "id": 20,
                "name": "\"lib/internal\"",
                "kindString": "External module",
                "children": [{"id": 21, "name": "hidden", "kindString": "Function", "flags": {"isExported": false}}]
            }
        ]
    }"#;

    #[test]
    fn test_reference_resolves_into_later_module() {
        let result = render(TWO_MODULES);
        let executor = result.page("lib/executors/Executor").unwrap();
        let link = concat!(
            r##"<a href="#Intern/4/api/lib%2Ftasks%2FTask/task">"##,
            r#"<span class="type">Task</span></a>"#,
        );
        assert!(executor.html.contains(link), "{}", executor.html);
    }

    #[test]
    fn test_comment_marker_resolves_with_label() {
        let result = render(TWO_MODULES);
        let executor = result.page("lib/executors/Executor").unwrap();
        let link = r##"<a href="#Intern/4/api/lib%2Ftasks%2FTask/task">task</a>"##;
        assert!(executor.html.contains(link));
    }

    #[test]
    fn test_unresolved_reference_is_inert() {
        let result = render(TWO_MODULES);
        let executor = result.page("lib/executors/Executor").unwrap();
        let link = r#"<a class="xref-unresolved"><span class="type">Result</span></a>"#;
        assert!(executor.html.contains(link));
        assert_eq!(result.unresolved, 1);
        assert!(!executor.html.contains("data-xref"));
        assert!(!executor.html.contains("api:"));
    }

    #[test]
    fn test_undocumented_module_skipped() {
        let result = render(TWO_MODULES);
        let names: Vec<_> = result.page_names().collect();
        assert_eq!(names, ["lib/executors/Executor", "lib/tasks/Task"]);
    }

    #[test]
    fn test_class_page_layout() {
        let result = render(TWO_MODULES);
        let task = result.page("lib/tasks/Task").unwrap();
        let toc: Vec<_> = task.toc.iter().map(|e| (e.level, e.id.as_str())).collect();
        assert_eq!(toc, [(1, "libtaskstask"), (2, "task"), (3, "cancel")]);
        let declaration = r#"<span class="kw">class</span> <span class="name">Task</span>"#;
        assert!(task.html.contains(declaration));
    }

    #[test]
    fn test_parameter_table_without_defaults() {
        let result = render(TWO_MODULES);
        let html = &result.page("lib/executors/Executor").unwrap().html;
        assert!(html.contains("<th>Parameter</th><th>Description</th></tr>"));
        assert!(!html.contains("<th>Default</th>"));
        assert!(html.contains("<tr><td>task</td><td>The task to run.</td></tr>"));
    }

    #[test]
    fn test_parameter_table_with_defaults() {
        let json = r#"{"name": "x", "children": [{
            "id": 1, "name": "\"util\"", "kindString": "External module",
            "children": [{
                "id": 2, "name": "retry", "kindString": "Function",
                "signatures": [{
                    "name": "retry",
                    "parameters": [
                        {"name": "times", "defaultValue": "3", "type": {"type": "intrinsic", "name": "number"}},
                        {"name": "label", "comment": {"text": "Log label."}, "type": {"type": "intrinsic", "name": "string"}}
                    ]
                }]
            }]
        }]}"#;
        let html = render(json).pages[0].html.clone();
        assert!(html.contains("<th>Default</th>"));
        assert!(html.contains("<tr><td>times</td><td></td><td><code>3</code></td></tr>"));
        assert!(html.contains("<tr><td>label</td><td>Log label.</td><td></td></tr>"));
    }

    #[test]
    fn test_accessor_badge_and_deprecated() {
        let json = r#"{"name": "x", "children": [{
            "id": 1, "name": "\"Task\"", "kindString": "External module",
            "children": [{
                "id": 2, "name": "Task", "kindString": "Class",
                "children": [{
                    "id": 3, "name": "state", "kindString": "Accessor",
                    "getSignature": [{"name": "__get", "comment": {"shortText": "Current state.", "tags": [{"tag": "deprecated", "text": "Use status."}]}}]
                }]
            }]
        }]}"#;
        let html = render(json).pages[0].html.clone();
        assert!(html.contains(r#"<span class="badge">read-only</span>"#));
        assert!(html.contains(r#"<div class="callout callout-deprecated">"#));
        assert!(html.contains("Use status."));
    }

    #[test]
    fn test_source_links() {
        let tree = ApiTree::from_json(
            r#"{"name": "x", "children": [{
                "id": 1, "name": "\"Task\"", "kindString": "External module",
                "children": [{
                    "id": 2, "name": "VERSION", "kindString": "Variable",
                    "sources": [{"fileName": "src/Task.ts", "line": 12}]
                }]
            }]}"#,
        )
        .unwrap();
        let options = RenderOptions {
            source_base: Some("https://github.com/theintern/intern/blob/master/".to_owned()),
            ..RenderOptions::default()
        };
        let result = render_api_pages(&docset(), &tree, &options);
        let link = concat!(
            r#"Defined in <a href="https://github.com/theintern/intern/blob/master/src/Task.ts#L12">"#,
            "src/Task.ts:12</a>",
        );
        assert!(result.pages[0].html.contains(link));
    }

    #[test]
    fn test_long_signature_wrapped() {
        let json = r#"{"name": "x", "children": [{
            "id": 1, "name": "\"suite\"", "kindString": "External module",
            "children": [{
                "id": 2, "name": "registerSuite", "kindString": "Function",
                "signatures": [{
                    "name": "registerSuite",
                    "parameters": [
                        {"name": "name", "type": {"type": "intrinsic", "name": "string"}},
                        {"name": "factory", "type": {"type": "reference", "name": "SuiteFactory"}},
                        {"name": "options", "type": {"type": "reference", "name": "SuiteOptions"}}
                    ]
                }]
            }]
        }]}"#;
        let html = render(json).pages[0].html.clone();
        assert!(html.contains("(\n    <span class=\"param\">name</span>: string,\n    "));
    }

    #[test]
    fn test_rewrite_xref_markers() {
        assert_eq!(
            rewrite_xref_markers("See [[lib/Task.Task]] and [[Executor|the executor]]."),
            "See [Task](<api:lib/Task.Task>) and [the executor](<api:Executor>)."
        );
        assert_eq!(
            rewrite_xref_markers("[[Some Name]] or [[Map<K>]]"),
            r"[Some Name](<api:Some Name>) or [Map<K>](<api:Map\<K\>>)"
        );
    }

    #[test]
    fn test_reference_with_space_renders_as_link() {
        let json = r#"{"name": "x", "children": [{
            "id": 1, "name": "\"util\"", "kindString": "External module",
            "children": [{
                "id": 2, "name": "VERSION", "kindString": "Variable",
                "comment": {"shortText": "See [[Some Name]]."}
            }]
        }]}"#;
        let html = render(json).pages[0].html.clone();
        assert!(html.contains(r#"See <a class="xref-unresolved">Some Name</a>."#), "{html}");
        assert!(!html.contains("[["));
    }

    #[test]
    fn test_default_label() {
        assert_eq!(default_label("lib/Task.cancel"), "cancel");
        assert_eq!(default_label("lib/Task"), "Task");
        assert_eq!(default_label("Task"), "Task");
    }
}
