//! Typed reflection tree.
//!
//! The raw JSON is converted once into [`Declaration`] values so that
//! rendering can match exhaustively on declaration kinds. Nodes of unknown
//! kinds are dropped during conversion, as are private members and
//! non-exported module members.

use serde_json::Value;

use crate::raw::{RawComment, RawNode, RawType};

/// Identifier of a declaration within one reflection tree.
pub type DeclId = u64;

/// Error reading API reflection data.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid API data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Documentation comment attached to a declaration or signature.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocComment {
    pub summary: String,
    pub body: String,
    pub returns: Option<String>,
    /// Text of a `@deprecated` tag, possibly empty.
    pub deprecated: Option<String>,
}

impl DocComment {
    /// Summary and body joined as one markdown document.
    #[must_use]
    pub fn markdown(&self) -> String {
        match (self.summary.trim(), self.body.trim()) {
            ("", body) => body.to_owned(),
            (summary, "") => summary.to_owned(),
            (summary, body) => format!("{summary}\n\n{body}"),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summary.trim().is_empty()
            && self.body.trim().is_empty()
            && self.returns.is_none()
            && self.deprecated.is_none()
    }
}

/// Location of a declaration in the source repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceRef {
    pub file: String,
    pub line: Option<u32>,
}

/// Fields shared by every declaration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeclInfo {
    pub id: Option<DeclId>,
    pub name: String,
    pub comment: Option<DocComment>,
    pub sources: Vec<SourceRef>,
    pub inherited_from: Option<TypeExpr>,
    pub is_static: bool,
    pub is_protected: bool,
}

/// A type expression.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeExpr {
    Intrinsic(String),
    Reference {
        name: String,
        id: Option<DeclId>,
        args: Vec<TypeExpr>,
    },
    TypeParameter(String),
    Array(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    StringLiteral(String),
    /// Non-string literal, already in source form.
    Literal(String),
    TypeOperator {
        operator: String,
        target: Box<TypeExpr>,
    },
    /// Inline object or function type.
    Reflection(Box<TypeLiteral>),
    Unknown(String),
}

/// Members of an inline type literal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeLiteral {
    pub signatures: Vec<Signature>,
    pub members: Vec<LiteralMember>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LiteralMember {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeParam {
    pub name: String,
    pub constraint: Option<TypeExpr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub comment: Option<DocComment>,
    pub ty: Option<TypeExpr>,
    pub default_value: Option<String>,
    pub optional: bool,
    pub rest: bool,
}

/// One call signature of a function, method or constructor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Signature {
    pub name: String,
    pub comment: Option<DocComment>,
    pub type_parameters: Vec<TypeParam>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeExpr>,
}

/// Module, namespace or object literal: a named group of declarations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContainerDecl {
    pub info: DeclInfo,
    pub members: Vec<Declaration>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassDecl {
    pub info: DeclInfo,
    pub type_parameters: Vec<TypeParam>,
    pub extends: Vec<TypeExpr>,
    pub implements: Vec<TypeExpr>,
    pub members: Vec<Declaration>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FunctionDecl {
    pub info: DeclInfo,
    pub signatures: Vec<Signature>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyDecl {
    pub info: DeclInfo,
    pub ty: Option<TypeExpr>,
    pub default_value: Option<String>,
    pub optional: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccessorDecl {
    pub info: DeclInfo,
    pub getter: Option<Signature>,
    pub setter: Option<Signature>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeAliasDecl {
    pub info: DeclInfo,
    pub type_parameters: Vec<TypeParam>,
    pub ty: Option<TypeExpr>,
}

/// A documented declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum Declaration {
    Module(ContainerDecl),
    Class(ClassDecl),
    Interface(ClassDecl),
    Function(FunctionDecl),
    Method(FunctionDecl),
    Constructor(FunctionDecl),
    Property(PropertyDecl),
    Variable(PropertyDecl),
    Accessor(AccessorDecl),
    ObjectLiteral(ContainerDecl),
    TypeAlias(TypeAliasDecl),
}

impl Declaration {
    #[must_use]
    pub fn info(&self) -> &DeclInfo {
        match self {
            Self::Module(d) | Self::ObjectLiteral(d) => &d.info,
            Self::Class(d) | Self::Interface(d) => &d.info,
            Self::Function(d) | Self::Method(d) | Self::Constructor(d) => &d.info,
            Self::Property(d) | Self::Variable(d) => &d.info,
            Self::Accessor(d) => &d.info,
            Self::TypeAlias(d) => &d.info,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.info().name
    }
}

/// A parsed reflection tree: the top-level modules sorted by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApiTree {
    pub modules: Vec<ContainerDecl>,
}

impl ApiTree {
    /// Parse reflection JSON.
    ///
    /// Top-level declarations that are not modules are gathered into one
    /// module named after the project root.
    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        let root: RawNode = serde_json::from_str(json)?;
        Ok(Self::from_root(root))
    }

    pub(crate) fn from_root(root: RawNode) -> Self {
        let mut modules = Vec::new();
        let mut loose = Vec::new();

        for child in root.children {
            if !is_visible(&child, true) {
                continue;
            }
            match convert(child, true) {
                Some(Declaration::Module(module)) => modules.push(module),
                Some(other) => loose.push(other),
                None => {}
            }
        }

        if !loose.is_empty() {
            modules.push(ContainerDecl {
                info: DeclInfo {
                    id: root.id,
                    name: if root.name.is_empty() {
                        "globals".to_owned()
                    } else {
                        root.name
                    },
                    comment: root.comment.map(doc_comment),
                    ..DeclInfo::default()
                },
                members: loose,
            });
        }

        modules.sort_by(|a, b| a.info.name.cmp(&b.info.name));
        Self { modules }
    }
}

fn is_visible(node: &RawNode, module_level: bool) -> bool {
    !node.flags.is_private && !(module_level && node.flags.is_exported == Some(false))
}

/// Module names of external modules are quoted file paths.
fn module_name(name: &str) -> String {
    name.trim_matches('"').to_owned()
}

fn convert(mut node: RawNode, module_level: bool) -> Option<Declaration> {
    let kind = node.kind_string.take()?;
    let decl = match kind.as_str() {
        "External module" | "Module" | "Namespace" => {
            let mut container = container(node, true);
            container.info.name = module_name(&container.info.name);
            Declaration::Module(container)
        }
        "Object literal" | "Enumeration" => Declaration::ObjectLiteral(container(node, false)),
        "Class" => Declaration::Class(class(node)),
        "Interface" => Declaration::Interface(class(node)),
        "Function" => Declaration::Function(function(node)),
        "Method" => Declaration::Method(function(node)),
        "Constructor" => Declaration::Constructor(function(node)),
        "Property" | "Enumeration member" => Declaration::Property(property(node)),
        "Variable" => Declaration::Variable(property(node)),
        "Accessor" => Declaration::Accessor(accessor(node)),
        "Type alias" => Declaration::TypeAlias(type_alias(node)),
        _ => {
            tracing::trace!(kind = %kind, module_level, "Skipping unsupported reflection kind");
            return None;
        }
    };
    Some(decl)
}

fn info(node: &mut RawNode) -> DeclInfo {
    DeclInfo {
        id: node.id,
        name: std::mem::take(&mut node.name),
        comment: node.comment.take().map(doc_comment),
        sources: std::mem::take(&mut node.sources)
            .into_iter()
            .filter(|s| !s.file_name.is_empty())
            .map(|s| SourceRef {
                file: s.file_name,
                line: s.line,
            })
            .collect(),
        inherited_from: node.inherited_from.take().map(type_expr),
        is_static: node.flags.is_static,
        is_protected: node.flags.is_protected,
    }
}

fn members(children: Vec<RawNode>, module_level: bool) -> Vec<Declaration> {
    children
        .into_iter()
        .filter(|child| is_visible(child, module_level))
        .filter_map(|child| convert(child, module_level))
        .collect()
}

fn container(mut node: RawNode, module_level: bool) -> ContainerDecl {
    ContainerDecl {
        info: info(&mut node),
        members: members(node.children, module_level),
    }
}

fn class(mut node: RawNode) -> ClassDecl {
    ClassDecl {
        info: info(&mut node),
        type_parameters: type_params(std::mem::take(&mut node.type_parameter)),
        extends: node.extended_types.into_iter().map(type_expr).collect(),
        implements: node.implemented_types.into_iter().map(type_expr).collect(),
        members: members(node.children, false),
    }
}

fn function(mut node: RawNode) -> FunctionDecl {
    let mut info = info(&mut node);
    let signatures: Vec<Signature> = node.signatures.into_iter().map(signature).collect();
    if info.comment.is_none() {
        info.comment = signatures.iter().find_map(|s| s.comment.clone());
    }
    FunctionDecl { info, signatures }
}

fn property(mut node: RawNode) -> PropertyDecl {
    PropertyDecl {
        info: info(&mut node),
        ty: node.ty.map(type_expr),
        default_value: node.default_value.filter(|v| !v.trim().is_empty()),
        optional: node.flags.is_optional,
    }
}

fn accessor(mut node: RawNode) -> AccessorDecl {
    let mut info = info(&mut node);
    let getter = node.get_signature.first().map(signature);
    let setter = node.set_signature.first().map(signature);
    if info.comment.is_none() {
        info.comment = getter
            .as_ref()
            .and_then(|s| s.comment.clone())
            .or_else(|| setter.as_ref().and_then(|s| s.comment.clone()));
    }
    AccessorDecl {
        info,
        getter,
        setter,
    }
}

fn type_alias(mut node: RawNode) -> TypeAliasDecl {
    TypeAliasDecl {
        info: info(&mut node),
        type_parameters: type_params(std::mem::take(&mut node.type_parameter)),
        ty: node.ty.map(type_expr),
    }
}

fn signature(node: RawNode) -> Signature {
    Signature {
        name: node.name,
        comment: node.comment.map(doc_comment),
        type_parameters: type_params(node.type_parameter),
        parameters: node.parameters.into_iter().map(parameter).collect(),
        return_type: node.ty.map(type_expr),
    }
}

fn parameter(node: RawNode) -> Parameter {
    Parameter {
        name: node.name,
        comment: node.comment.map(doc_comment).filter(|c| !c.is_empty()),
        ty: node.ty.map(type_expr),
        default_value: node.default_value.filter(|v| !v.trim().is_empty()),
        optional: node.flags.is_optional,
        rest: node.flags.is_rest,
    }
}

fn type_params(nodes: Vec<RawNode>) -> Vec<TypeParam> {
    nodes
        .into_iter()
        .map(|node| TypeParam {
            name: node.name,
            constraint: node.ty.map(type_expr),
        })
        .collect()
}

fn doc_comment(raw: RawComment) -> DocComment {
    let mut summary = raw.short_text.unwrap_or_default();
    if summary.is_empty() && !raw.summary.is_empty() {
        summary = raw.summary.into_iter().map(|part| part.text).collect();
    }

    let mut returns = raw.returns.filter(|r| !r.trim().is_empty());
    let mut deprecated = None;
    for tag in raw.tags {
        match tag.tag.trim_start_matches('@') {
            "deprecated" => deprecated = Some(tag.text.trim().to_owned()),
            "returns" | "return" if returns.is_none() => returns = Some(tag.text),
            _ => {}
        }
    }

    DocComment {
        summary,
        body: raw.text.unwrap_or_default(),
        returns,
        deprecated,
    }
}

fn literal_text(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_owned(),
        Some(Value::String(s)) => format!("\"{s}\""),
        Some(other) => other.to_string(),
    }
}

fn type_expr(raw: RawType) -> TypeExpr {
    let name = raw.name.unwrap_or_default();
    match raw.kind.as_str() {
        "intrinsic" => TypeExpr::Intrinsic(name),
        "reference" => TypeExpr::Reference {
            name,
            id: raw.id,
            args: raw.type_arguments.into_iter().map(type_expr).collect(),
        },
        "typeParameter" => TypeExpr::TypeParameter(name),
        "array" => match raw.element_type {
            Some(element) => TypeExpr::Array(Box::new(type_expr(*element))),
            None => TypeExpr::Unknown(name),
        },
        "union" => TypeExpr::Union(raw.types.into_iter().map(type_expr).collect()),
        "intersection" => TypeExpr::Intersection(raw.types.into_iter().map(type_expr).collect()),
        "tuple" => {
            let elements = if raw.elements.is_empty() {
                raw.types
            } else {
                raw.elements
            };
            TypeExpr::Tuple(elements.into_iter().map(type_expr).collect())
        }
        "stringLiteral" => TypeExpr::StringLiteral(match raw.value {
            Some(Value::String(s)) => s,
            _ => name,
        }),
        "literal" => match raw.value {
            Some(Value::String(s)) => TypeExpr::StringLiteral(s),
            other => TypeExpr::Literal(literal_text(other)),
        },
        "typeOperator" => match raw.target {
            Some(target) => TypeExpr::TypeOperator {
                operator: raw.operator.unwrap_or_default(),
                target: Box::new(type_expr(*target)),
            },
            None => TypeExpr::Unknown(name),
        },
        "reflection" => TypeExpr::Reflection(Box::new(
            raw.declaration.map(|d| type_literal(*d)).unwrap_or_default(),
        )),
        _ => TypeExpr::Unknown(if name.is_empty() { raw.kind } else { name }),
    }
}

fn type_literal(node: RawNode) -> TypeLiteral {
    TypeLiteral {
        signatures: node.signatures.into_iter().map(signature).collect(),
        members: node
            .children
            .into_iter()
            .map(|child| LiteralMember {
                name: child.name,
                optional: child.flags.is_optional,
                ty: child.ty.map(type_expr),
            })
            .collect(),
    }
}
