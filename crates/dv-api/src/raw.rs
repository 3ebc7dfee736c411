//! Serde model of the reflection JSON as produced by typedoc.
//!
//! Every field is optional on the wire. Missing fields deserialize to their
//! defaults so that partial or older output still loads.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RawNode {
    pub id: Option<u64>,
    pub name: String,
    pub kind_string: Option<String>,
    pub flags: RawFlags,
    pub comment: Option<RawComment>,
    pub children: Vec<RawNode>,
    pub signatures: Vec<RawNode>,
    pub parameters: Vec<RawNode>,
    pub type_parameter: Vec<RawNode>,
    pub sources: Vec<RawSource>,
    pub extended_types: Vec<RawType>,
    pub implemented_types: Vec<RawType>,
    pub get_signature: OneOrMany<RawNode>,
    pub set_signature: OneOrMany<RawNode>,
    pub default_value: Option<String>,
    #[serde(rename = "type")]
    pub ty: Option<RawType>,
    pub inherited_from: Option<RawType>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct RawFlags {
    pub is_exported: Option<bool>,
    pub is_optional: bool,
    pub is_private: bool,
    pub is_protected: bool,
    pub is_static: bool,
    pub is_rest: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RawComment {
    pub short_text: Option<String>,
    pub text: Option<String>,
    pub returns: Option<String>,
    pub tags: Vec<RawTag>,
    /// Newer typedoc output stores the comment as text parts.
    pub summary: Vec<RawCommentPart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawTag {
    pub tag: String,
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawCommentPart {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RawSource {
    pub file_name: String,
    pub line: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RawType {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: Option<String>,
    pub id: Option<u64>,
    pub type_arguments: Vec<RawType>,
    pub element_type: Option<Box<RawType>>,
    pub types: Vec<RawType>,
    pub elements: Vec<RawType>,
    pub value: Option<Value>,
    pub operator: Option<String>,
    pub target: Option<Box<RawType>>,
    pub declaration: Option<Box<RawNode>>,
}

/// A field typedoc writes as either a single object or an array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(Box<T>),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    pub fn first(self) -> Option<T> {
        match self {
            Self::Many(items) => items.into_iter().next(),
            Self::One(item) => Some(*item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let node: RawNode = serde_json::from_str(r#"{"name": "Task"}"#).unwrap();
        assert_eq!(node.name, "Task");
        assert!(node.children.is_empty());
        assert_eq!(node.flags.is_exported, None);
        assert!(node.ty.is_none());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let node: RawNode =
            serde_json::from_str(r#"{"name": "x", "groups": [{"title": "Classes"}], "kind": 128}"#)
                .unwrap();
        assert_eq!(node.name, "x");
    }

    #[test]
    fn test_get_signature_one_or_many() {
        let many: RawNode =
            serde_json::from_str(r#"{"getSignature": [{"name": "__get"}]}"#).unwrap();
        assert_eq!(many.get_signature.first().unwrap().name, "__get");

        let one: RawNode = serde_json::from_str(r#"{"getSignature": {"name": "__get"}}"#).unwrap();
        assert_eq!(one.get_signature.first().unwrap().name, "__get");
    }

    #[test]
    fn test_literal_values() {
        let ty: RawType = serde_json::from_str(r#"{"type": "literal", "value": 42}"#).unwrap();
        assert_eq!(ty.value, Some(Value::from(42)));
    }
}
