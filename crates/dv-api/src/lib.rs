//! API reference pages for docview.
//!
//! Reflection JSON (typedoc output) is parsed leniently into an [`ApiTree`]
//! and rendered into one page per module by [`render_api_pages`].
//! Signatures are rendered as highlighted code with linked type names and
//! soft-wrapped when long. Cross-references between declarations, including
//! `[[Name]]` markers in comments, are resolved after every module has been
//! walked.
//!
//! # Example
//!
//! ```
//! use dv_api::{ApiTree, RenderOptions, render_api_pages};
//! use dv_route::DocSetId;
//!
//! let json = r#"{"name": "intern", "children": [{
//!     "id": 1, "name": "\"lib/Task\"", "kindString": "External module",
//!     "comment": {"shortText": "Cancelable promises."}
//! }]}"#;
//! let tree = ApiTree::from_json(json).unwrap();
//! let api = render_api_pages(&DocSetId::new("Intern", "4"), &tree, &RenderOptions::default());
//! assert_eq!(api.page_names().collect::<Vec<_>>(), ["lib/Task"]);
//! ```

mod code;
mod model;
mod raw;
mod render;
mod signature;
mod wrap;

pub use code::{CodeLine, Span, SpanKind, Xref};
pub use model::{
    AccessorDecl, ApiError, ApiTree, ClassDecl, ContainerDecl, DeclId, DeclInfo, Declaration,
    DocComment, FunctionDecl, LiteralMember, Parameter, PropertyDecl, Signature, SourceRef,
    TypeAliasDecl, TypeExpr, TypeLiteral, TypeParam,
};
pub use render::{ApiPage, ApiRender, RenderOptions, render_api_pages};
pub use wrap::{Edit, apply_edits, wrap_signature};
