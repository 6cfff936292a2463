//! Syntax tree model shared by every frontend.
//!
//! Frontends convert their parser's output into [`SyntaxNode`] trees. Each
//! node carries its parser-defined `kind`, its [`Span`] in the owning text, a
//! [`NodeClass`] assigned by the frontend, and an ordered list of named
//! fields whose values are one of the four [`FieldValue`] shapes. The
//! comparison engine only ever looks at classes and field shapes, never at
//! kind strings, so teaching it a new node kind is purely a frontend change.

use std::fmt;

pub mod estree;
pub mod javascript;
pub mod node_types;

mod helpers;

/// Byte range of a node within its own source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(end >= start, "span end {} before start {}", end, start);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A non-node primitive field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Canonical JSON rendering of an object that is not a node.
    Record(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => write!(f, "{:?}", s),
            Scalar::Record(json) => f.write_str(json),
        }
    }
}

/// Value held by a named field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Scalar(Scalar),
    Node(Box<SyntaxNode>),
    /// Ordered children; `None` marks a hole (e.g. an array elision).
    NodeList(Vec<Option<SyntaxNode>>),
    ScalarList(Vec<Scalar>),
}

impl FieldValue {
    /// View this value as a sequence of optional nodes.
    ///
    /// An empty primitive sequence qualifies too: it holds no entry that is
    /// not a node.
    pub fn as_node_list(&self) -> Option<&[Option<SyntaxNode>]> {
        match self {
            FieldValue::NodeList(items) => Some(items),
            FieldValue::ScalarList(items) if items.is_empty() => Some(&[]),
            _ => None,
        }
    }

    /// Short rendering used in difference descriptions.
    pub fn summary(&self) -> String {
        match self {
            FieldValue::Scalar(s) => s.to_string(),
            FieldValue::Node(node) => node.kind.clone(),
            FieldValue::NodeList(items) => format!("[{} nodes]", items.len()),
            FieldValue::ScalarList(items) => {
                let parts: Vec<String> = items.iter().map(|s| s.to_string()).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

/// A named field of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

/// Constant value written directly in source.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Text(String),
    /// Source spelling of the number; numeric values are never compared.
    Number(String),
    Boolean(bool),
    Null,
    Pattern { pattern: String, flags: String },
}

/// A literal with its rendered source form.
#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    pub raw: String,
    pub value: LiteralValue,
}

impl Literal {
    /// The textual value, if this literal holds a string.
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            LiteralValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Classification assigned by a frontend.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeClass {
    Identifier { name: String },
    Literal(Literal),
    Function { name: Option<String> },
    Binding { name: Option<String> },
    Call { callee: Option<String> },
    Other,
}

/// A node of a parsed syntax tree.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntaxNode {
    pub kind: String,
    pub span: Span,
    pub class: NodeClass,
    pub fields: Vec<Field>,
}

impl SyntaxNode {
    pub fn new(kind: impl Into<String>, span: Span) -> Self {
        Self {
            kind: kind.into(),
            span,
            class: NodeClass::Other,
            fields: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: NodeClass) -> Self {
        self.class = class;
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.push_field(name, value);
        self
    }

    pub fn push_field(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.push(Field {
            name: name.into(),
            value,
        });
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }

    /// First node held by a field, whether stored as a single child or a list.
    pub fn child(&self, name: &str) -> Option<&SyntaxNode> {
        match self.field(name)? {
            FieldValue::Node(node) => Some(node),
            FieldValue::NodeList(items) => items.iter().flatten().next(),
            _ => None,
        }
    }

    /// Name of the identifier held by a field, if it holds one.
    pub fn child_identifier(&self, name: &str) -> Option<String> {
        match &self.child(name)?.class {
            NodeClass::Identifier { name } => Some(name.clone()),
            _ => None,
        }
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self.class, NodeClass::Identifier { .. })
    }

    /// Nodes held directly by this node's fields, in field order.
    pub fn children(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.fields.iter().flat_map(|f| {
            let (single, list): (Option<&SyntaxNode>, &[Option<SyntaxNode>]) = match &f.value {
                FieldValue::Node(node) => (Some(&**node), &[]),
                FieldValue::NodeList(items) => (None, items),
                _ => (None, &[]),
            };
            single.into_iter().chain(list.iter().flatten())
        })
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }
}

/// Minified bundles nest expressions tens of thousands deep, so subtrees are
/// torn down from a heap stack instead of recursively.
impl Drop for SyntaxNode {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(&mut self.fields, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_children(&mut node.fields, &mut pending);
        }
    }
}

fn detach_children(fields: &mut Vec<Field>, out: &mut Vec<SyntaxNode>) {
    for field in fields.drain(..) {
        match field.value {
            FieldValue::Node(node) => out.push(*node),
            FieldValue::NodeList(items) => out.extend(items.into_iter().flatten()),
            _ => {}
        }
    }
}
