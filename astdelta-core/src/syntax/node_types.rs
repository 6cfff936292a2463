//! Field layout of JavaScript node kinds.
//!
//! tree-sitter only reports the fields a node actually filled. The grammar's
//! `node-types.json` lists every field a kind can carry, so absent optional
//! children and empty lists still show up as fields and a node's field set
//! depends on its kind alone.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use serde::Deserialize;

/// Layout of every named JavaScript node kind.
pub static JAVASCRIPT: Lazy<NodeTypes> = Lazy::new(|| {
    NodeTypes::parse(tree_sitter_javascript::NODE_TYPES).unwrap_or_else(|e| {
        tracing::warn!("Failed to read JavaScript node types: {}", e);
        NodeTypes::default()
    })
});

#[derive(Deserialize)]
struct NodeTypeEntry {
    #[serde(rename = "type")]
    kind: String,
    named: bool,
    #[serde(default)]
    fields: BTreeMap<String, ChildTypes>,
    #[serde(default)]
    children: Option<ChildTypes>,
    #[serde(default)]
    subtypes: Option<Vec<TypeRef>>,
}

#[derive(Deserialize)]
struct ChildTypes {
    types: Vec<TypeRef>,
}

#[derive(Deserialize)]
struct TypeRef {
    named: bool,
}

/// A field a node kind may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldShape {
    pub name: String,
    /// Only anonymous tokens such as `operator` or `kind` fill this field.
    pub tokens_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindShape {
    /// Declared fields, sorted by name.
    pub fields: Vec<FieldShape>,
    /// Whether the kind has named children outside any field.
    pub has_children: bool,
}

impl KindShape {
    /// Kinds without fields or named children; their text is their content.
    pub fn is_leaf(&self) -> bool {
        self.fields.is_empty() && !self.has_children
    }
}

#[derive(Debug, Default)]
pub struct NodeTypes {
    kinds: HashMap<String, KindShape>,
}

impl NodeTypes {
    /// Read a tree-sitter `node-types.json` document. Anonymous tokens and
    /// supertypes are skipped since they never carry fields of their own.
    pub fn parse(json: &str) -> serde_json::Result<Self> {
        let entries: Vec<NodeTypeEntry> = serde_json::from_str(json)?;
        let kinds = entries
            .into_iter()
            .filter(|entry| entry.named && entry.subtypes.is_none())
            .map(|entry| {
                let fields = entry
                    .fields
                    .into_iter()
                    .map(|(name, types)| FieldShape {
                        tokens_only: types.types.iter().all(|t| !t.named),
                        name,
                    })
                    .collect();
                let shape = KindShape {
                    fields,
                    has_children: entry.children.is_some(),
                };
                (entry.kind, shape)
            })
            .collect();
        Ok(Self { kinds })
    }

    pub fn shape(&self, kind: &str) -> Option<&KindShape> {
        self.kinds.get(kind)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
