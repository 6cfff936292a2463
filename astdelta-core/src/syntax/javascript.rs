//! JavaScript frontend using tree-sitter.
//!
//! Converts the tree-sitter concrete syntax tree into [`SyntaxNode`]s:
//!
//! - every field the grammar declares for a kind is present, so the field set
//!   only depends on the kind; unfilled node fields are empty lists and
//!   unfilled token fields are null;
//! - named children are grouped by their tree-sitter field name (unnamed ones
//!   under `children`, always present) into node lists, since tree-sitter
//!   does not tell us whether a field can repeat;
//! - anonymous tokens attached to a field (`operator`, `kind`, ...) become
//!   text scalars;
//! - unfielded modifier keywords (`async`, `static`, ...) become boolean
//!   fields that only exist when written;
//! - update expressions record whether the operator comes first;
//! - comments are dropped.
//!
//! The walk keeps its own stack, so nesting depth is bounded by memory only.

use tree_sitter::{Node, Parser};

use super::helpers::{find_error_node, get_node_text, get_start_position, unquote};
use super::node_types::JAVASCRIPT;
use super::{FieldValue, Literal, LiteralValue, NodeClass, Scalar, Span, SyntaxNode};
use crate::error::{DeltaError, Result};

/// Field that collects named children without a tree-sitter field name.
pub const CHILDREN_FIELD: &str = "children";

/// Boolean field of `update_expression`: `++x` is prefix, `x++` is not.
pub const PREFIX_FIELD: &str = "prefix";

const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "property_identifier",
    "shorthand_property_identifier",
    "shorthand_property_identifier_pattern",
    "private_property_identifier",
    "statement_identifier",
];

const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "function_expression",
    "function",
    "generator_function_declaration",
    "generator_function",
    "arrow_function",
    "method_definition",
];

/// Unfielded keyword tokens and the boolean field each one sets.
const MODIFIER_FLAGS: &[(&str, &str)] = &[
    ("async", "async"),
    ("static", "static"),
    ("get", "getter"),
    ("set", "setter"),
    ("*", "star"),
    ("default", "default"),
];

/// Parse JavaScript source into a syntax tree rooted at a `program` node.
///
/// Fails on the first syntax error; tree-sitter's error recovery is not
/// trusted to produce a tree worth comparing.
pub fn parse(source: &str) -> Result<SyntaxNode> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .map_err(|e| DeltaError::Parse {
            line: 1,
            column: 1,
            message: format!("Failed to set language: {}", e),
        })?;

    let tree = parser.parse(source, None).ok_or_else(|| DeltaError::Parse {
        line: 1,
        column: 1,
        message: "Failed to parse source".to_string(),
    })?;
    let root = tree.root_node();

    if let Some(bad) = find_error_node(&root) {
        let (line, column) = get_start_position(&bad);
        let message = if bad.is_missing() {
            format!("missing `{}`", bad.kind())
        } else {
            let snippet: String = get_node_text(&bad, source).chars().take(40).collect();
            format!("unexpected `{}`", snippet)
        };
        return Err(DeltaError::Parse {
            line,
            column,
            message,
        });
    }

    Ok(convert(root, source))
}

/// A node whose named children are still being converted.
struct Frame<'t> {
    node: SyntaxNode,
    /// Field of the parent that receives this node.
    slot: &'static str,
    pending: std::vec::IntoIter<(&'static str, Node<'t>)>,
}

enum Opened<'t> {
    Leaf(SyntaxNode),
    Branch(Frame<'t>),
}

fn convert(root: Node, source: &str) -> SyntaxNode {
    let mut current = match open(root, CHILDREN_FIELD, source) {
        Opened::Leaf(node) => return node,
        Opened::Branch(frame) => frame,
    };
    let mut ancestors: Vec<Frame> = Vec::new();

    loop {
        if let Some((slot, child)) = current.pending.next() {
            match open(child, slot, source) {
                Opened::Leaf(node) => push_child(&mut current.node, slot, node),
                Opened::Branch(frame) => ancestors.push(std::mem::replace(&mut current, frame)),
            }
            continue;
        }

        let Frame { mut node, slot, .. } = current;
        node.class = classify(&node);
        match ancestors.pop() {
            Some(parent) => {
                current = parent;
                push_child(&mut current.node, slot, node);
            }
            None => return node,
        }
    }
}

/// Convert a node's own tokens and queue its named children.
fn open<'t>(node: Node<'t>, slot: &'static str, source: &str) -> Opened<'t> {
    let kind = node.kind();
    let span = Span::new(node.start_byte(), node.end_byte());
    let text = get_node_text(&node, source);

    if IDENTIFIER_KINDS.contains(&kind) {
        return Opened::Leaf(SyntaxNode::new(kind, span).with_class(NodeClass::Identifier {
            name: text.to_string(),
        }));
    }
    if let Some((kind, literal)) = extract_literal(&node, source) {
        return Opened::Leaf(SyntaxNode::new(kind, span).with_class(NodeClass::Literal(literal)));
    }

    let shape = JAVASCRIPT.shape(kind);
    let is_leaf = match shape {
        Some(shape) => shape.is_leaf(),
        None => node.child_count() == 0,
    };
    let mut result = SyntaxNode::new(kind, span);

    if is_leaf {
        // Named leaf such as `this` or `empty_statement`: its text is its content.
        result.push_field("text", FieldValue::Scalar(Scalar::Text(text.to_string())));
        return Opened::Leaf(result);
    }

    for field in shape.map(|s| s.fields.as_slice()).unwrap_or_default() {
        let unfilled = if field.tokens_only {
            FieldValue::Scalar(Scalar::Null)
        } else {
            FieldValue::NodeList(Vec::new())
        };
        result.push_field(field.name.as_str(), unfilled);
    }
    result.push_field(CHILDREN_FIELD, FieldValue::NodeList(Vec::new()));

    let mut pending = Vec::new();
    let mut operator_first = None;
    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            let field_name = cursor.field_name();

            if child.is_extra() {
                // comments
            } else if child.is_named() {
                pending.push((field_name.unwrap_or(CHILDREN_FIELD), child));
            } else if let Some(name) = field_name {
                if name == "operator" && operator_first.is_none() {
                    operator_first = Some(pending.is_empty());
                }
                set_token(&mut result, name, child.kind());
            } else if let Some(flag) = modifier_flag(child.kind()) {
                if result.field(flag).is_none() {
                    result.push_field(flag, FieldValue::Scalar(Scalar::Bool(true)));
                }
            }

            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    if kind == "update_expression" {
        result.push_field(
            PREFIX_FIELD,
            FieldValue::Scalar(Scalar::Bool(operator_first.unwrap_or_default())),
        );
    }

    Opened::Branch(Frame {
        node: result,
        slot,
        pending: pending.into_iter(),
    })
}

fn push_child(node: &mut SyntaxNode, name: &str, child: SyntaxNode) {
    if let Some(field) = node.fields.iter_mut().find(|f| f.name == name) {
        match &mut field.value {
            FieldValue::NodeList(items) => items.push(Some(child)),
            other => *other = FieldValue::NodeList(vec![Some(child)]),
        }
        return;
    }
    node.push_field(name, FieldValue::NodeList(vec![Some(child)]));
}

fn set_token(node: &mut SyntaxNode, name: &str, token: &str) {
    let value = FieldValue::Scalar(Scalar::Text(token.to_string()));
    if let Some(field) = node.fields.iter_mut().find(|f| f.name == name) {
        // `for (;i;)` puts its `;` in the `condition` node field
        if !matches!(field.value, FieldValue::NodeList(_)) {
            field.value = value;
        }
        return;
    }
    node.push_field(name, value);
}

fn modifier_flag(token: &str) -> Option<&'static str> {
    MODIFIER_FLAGS
        .iter()
        .find(|(keyword, _)| *keyword == token)
        .map(|(_, flag)| *flag)
}

fn classify(node: &SyntaxNode) -> NodeClass {
    match node.kind.as_str() {
        k if FUNCTION_KINDS.contains(&k) => NodeClass::Function {
            name: node.child_identifier("name"),
        },
        "variable_declarator" => NodeClass::Binding {
            name: node.child_identifier("name"),
        },
        "call_expression" => NodeClass::Call {
            callee: node.child_identifier("function"),
        },
        "new_expression" => NodeClass::Call {
            callee: node.child_identifier("constructor"),
        },
        _ => NodeClass::Other,
    }
}

/// Literal leaves. `true` and `false` share one kind so that a boolean value
/// change is not mistaken for a change of node category.
fn extract_literal(node: &Node, source: &str) -> Option<(&'static str, Literal)> {
    let text = get_node_text(node, source);
    let (kind, value) = match node.kind() {
        "string" => ("string", LiteralValue::Text(unquote(text).to_string())),
        k @ ("string_fragment" | "escape_sequence") => (k, LiteralValue::Text(text.to_string())),
        "number" => ("number", LiteralValue::Number(text.to_string())),
        "true" => ("boolean", LiteralValue::Boolean(true)),
        "false" => ("boolean", LiteralValue::Boolean(false)),
        "null" => ("null", LiteralValue::Null),
        "regex" => {
            let part = |name: &str| {
                node.child_by_field_name(name)
                    .map(|n| get_node_text(&n, source).to_string())
                    .unwrap_or_default()
            };
            (
                "regex",
                LiteralValue::Pattern {
                    pattern: part("pattern"),
                    flags: part("flags"),
                },
            )
        }
        _ => return None,
    };
    Some((
        kind,
        Literal {
            raw: text.to_string(),
            value,
        },
    ))
}
