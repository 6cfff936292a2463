//! Difference types produced by the comparator.

use serde::{Deserialize, Serialize};

use crate::syntax::SyntaxNode;

/// Which side of the comparison a difference belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifferenceKind {
    /// Content present only in the second tree.
    Addition,
    /// Content present only in the first tree.
    Removal,
}

impl DifferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifferenceKind::Addition => "addition",
            DifferenceKind::Removal => "removal",
        }
    }
}

/// One structural discrepancy between two trees.
///
/// Offsets point into the owning tree's text: the first text for a removal,
/// the second text for an addition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Difference {
    pub kind: DifferenceKind,
    pub start_offset: usize,
    pub end_offset: usize,
    pub node_kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Difference {
    /// A removal of `node` from the first tree.
    pub fn removal(node: &SyntaxNode, description: impl Into<String>) -> Self {
        Self::create(DifferenceKind::Removal, node, description.into())
    }

    /// An addition of `node` in the second tree.
    pub fn addition(node: &SyntaxNode, description: impl Into<String>) -> Self {
        Self::create(DifferenceKind::Addition, node, description.into())
    }

    fn create(kind: DifferenceKind, node: &SyntaxNode, description: String) -> Self {
        Self {
            kind,
            start_offset: node.span.start,
            end_offset: node.span.end,
            node_kind: node.kind.clone(),
            description: Some(description),
        }
    }

    pub fn is_removal(&self) -> bool {
        self.kind == DifferenceKind::Removal
    }

    pub fn is_addition(&self) -> bool {
        self.kind == DifferenceKind::Addition
    }

    /// Key under which a removal and an addition are considered the same
    /// content relocated.
    pub fn move_key(&self) -> (&str, Option<&str>) {
        (self.node_kind.as_str(), self.description.as_deref())
    }
}

/// Counts of the differences in a result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub removals: usize,
    pub additions: usize,
}

impl DiffSummary {
    pub fn from_differences(differences: &[Difference]) -> Self {
        differences
            .iter()
            .fold(Self::default(), |mut summary, d| {
                match d.kind {
                    DifferenceKind::Removal => summary.removals += 1,
                    DifferenceKind::Addition => summary.additions += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.removals + self.additions
    }

    pub fn is_changed(&self) -> bool {
        self.total() > 0
    }
}
