//! ESTree JSON frontend.
//!
//! Reads trees serialized by Babel or acorn. Every JSON object with a string
//! `type` is a node; its `start`/`end` offsets are required. All other keys
//! are kept as fields in document order, including the metadata keys
//! (`loc`, `extra`, comments) that the equivalence policy ignores.

use serde_json::{Map, Value};

use super::{FieldValue, Literal, LiteralValue, NodeClass, Scalar, Span, SyntaxNode};
use crate::error::{DeltaError, Result};

const FUNCTION_KINDS: &[&str] = &[
    "FunctionDeclaration",
    "FunctionExpression",
    "ArrowFunctionExpression",
    "ObjectMethod",
    "ClassMethod",
    "ClassPrivateMethod",
    "MethodDefinition",
];

const CALL_KINDS: &[&str] = &["CallExpression", "NewExpression", "OptionalCallExpression"];

/// Parse a serialized tree from JSON text.
pub fn from_str(json: &str) -> Result<SyntaxNode> {
    let value: Value = serde_json::from_str(json)?;
    from_json(&value)
}

/// Convert an already-deserialized JSON tree.
pub fn from_json(value: &Value) -> Result<SyntaxNode> {
    match value {
        Value::Object(map) if is_node(map) => convert(map),
        _ => Err(DeltaError::malformed("root value is not a node object")),
    }
}

fn is_node(map: &Map<String, Value>) -> bool {
    matches!(map.get("type"), Some(Value::String(_)))
}

fn is_node_value(value: &Value) -> bool {
    matches!(value, Value::Object(map) if is_node(map))
}

fn offset(map: &Map<String, Value>, key: &str, kind: &str) -> Result<usize> {
    map.get(key)
        .and_then(Value::as_u64)
        .map(|n| n as usize)
        .ok_or_else(|| DeltaError::malformed(format!("{} node without `{}` offset", kind, key)))
}

fn convert(map: &Map<String, Value>) -> Result<SyntaxNode> {
    let kind = map
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| DeltaError::malformed("node without `type`"))?;
    let start = offset(map, "start", kind)?;
    let end = offset(map, "end", kind)?;
    if end < start {
        return Err(DeltaError::malformed(format!(
            "{} node ends at {} before it starts at {}",
            kind, end, start
        )));
    }

    let mut node = SyntaxNode::new(kind, Span::new(start, end));
    for (key, value) in map {
        if matches!(key.as_str(), "type" | "start" | "end") {
            continue;
        }
        node.push_field(key.as_str(), convert_value(value)?);
    }

    node.class = classify(&node, map);
    Ok(node)
}

fn convert_value(value: &Value) -> Result<FieldValue> {
    Ok(match value {
        Value::Object(map) if is_node(map) => FieldValue::Node(Box::new(convert(map)?)),
        Value::Array(items) if items.iter().all(|v| v.is_null() || is_node_value(v)) => {
            let nodes = items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => convert(map).map(Some),
                    _ => Ok(None),
                })
                .collect::<Result<Vec<_>>>()?;
            FieldValue::NodeList(nodes)
        }
        Value::Array(items) => FieldValue::ScalarList(
            items
                .iter()
                .map(to_scalar)
                .collect::<Result<Vec<_>>>()?,
        ),
        other => FieldValue::Scalar(to_scalar(other)?),
    })
}

fn to_scalar(value: &Value) -> Result<Scalar> {
    Ok(match value {
        Value::Null => Scalar::Null,
        Value::Bool(b) => Scalar::Bool(*b),
        Value::Number(n) => Scalar::Number(n.as_f64().unwrap_or_default()),
        Value::String(s) => Scalar::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => Scalar::Record(serde_json::to_string(value)?),
    })
}

fn classify(node: &SyntaxNode, map: &Map<String, Value>) -> NodeClass {
    let kind = node.kind.as_str();
    match kind {
        "Identifier" | "JSXIdentifier" => NodeClass::Identifier {
            name: map
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        k if FUNCTION_KINDS.contains(&k) => NodeClass::Function {
            name: node
                .child_identifier("id")
                .or_else(|| node.child_identifier("key")),
        },
        "VariableDeclarator" => NodeClass::Binding {
            name: node.child_identifier("id"),
        },
        k if CALL_KINDS.contains(&k) => NodeClass::Call {
            callee: node.child_identifier("callee"),
        },
        _ => match literal_value(kind, map) {
            Some(value) => NodeClass::Literal(Literal {
                raw: raw_text(map, &value),
                value,
            }),
            None => NodeClass::Other,
        },
    }
}

fn literal_value(kind: &str, map: &Map<String, Value>) -> Option<LiteralValue> {
    let value = map.get("value").unwrap_or(&Value::Null);
    let text_of = |v: &Value| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let pattern = |regex: &Map<String, Value>| LiteralValue::Pattern {
        pattern: regex.get("pattern").map(text_of).unwrap_or_default(),
        flags: regex.get("flags").map(text_of).unwrap_or_default(),
    };

    Some(match kind {
        "StringLiteral" => LiteralValue::Text(text_of(value)),
        "NumericLiteral" | "BigIntLiteral" | "DecimalLiteral" => LiteralValue::Number(text_of(value)),
        "BooleanLiteral" => LiteralValue::Boolean(value.as_bool().unwrap_or_default()),
        "NullLiteral" => LiteralValue::Null,
        "RegExpLiteral" => pattern(map),
        // acorn folds every constant into one kind
        "Literal" => match value {
            Value::String(s) => LiteralValue::Text(s.clone()),
            Value::Number(n) => LiteralValue::Number(n.to_string()),
            Value::Bool(b) => LiteralValue::Boolean(*b),
            _ => match map.get("regex") {
                Some(Value::Object(regex)) => pattern(regex),
                _ => match map.get("bigint") {
                    Some(big) => LiteralValue::Number(text_of(big)),
                    None => LiteralValue::Null,
                },
            },
        },
        _ => return None,
    })
}

/// Source spelling of a literal: acorn's `raw`, Babel's `extra.raw`, or a
/// rendering of the value when neither was serialized.
fn raw_text(map: &Map<String, Value>, value: &LiteralValue) -> String {
    let recorded = map.get("raw").or_else(|| map.get("extra")?.get("raw"));
    if let Some(Value::String(raw)) = recorded {
        return raw.clone();
    }
    match value {
        LiteralValue::Text(s) => Value::String(s.clone()).to_string(),
        LiteralValue::Number(n) => n.clone(),
        LiteralValue::Boolean(b) => b.to_string(),
        LiteralValue::Null => "null".to_string(),
        LiteralValue::Pattern { pattern, flags } => format!("/{}/{}", pattern, flags),
    }
}
