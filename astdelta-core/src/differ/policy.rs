//! Equivalence policy: what counts as a meaningful difference.
//!
//! Pure decision rules consulted by the comparator at every node pair, plus
//! the node descriptions that label differences and key move detection.

use std::collections::BTreeSet;

use crate::differ::changes::DifferenceKind;
use crate::syntax::{Field, FieldValue, Literal, NodeClass, SyntaxNode};

/// Field names that never participate in comparison: the kind tag, own
/// offsets, location detail, raw source slices, comment attachments and the
/// parser's extra/metadata bag.
pub const IGNORED_FIELDS: &[&str] = &[
    "type",
    "start",
    "end",
    "loc",
    "range",
    "raw",
    "extra",
    "comments",
    "leadingComments",
    "trailingComments",
    "innerComments",
];

/// Placeholder for a binding whose target is a destructuring pattern.
pub const PATTERN_PLACEHOLDER: &str = "<pattern>";

/// Placeholder for a call whose callee is not a plain identifier.
pub const CALLEE_PLACEHOLDER: &str = "<callee>";

pub fn is_significant(field_name: &str) -> bool {
    !IGNORED_FIELDS.contains(&field_name)
}

/// The node's fields that take part in comparison, in declaration order.
pub fn significant_fields(node: &SyntaxNode) -> Vec<&Field> {
    node.fields
        .iter()
        .filter(|f| is_significant(&f.name))
        .collect()
}

pub fn field_names<'a>(fields: &[&'a Field]) -> BTreeSet<&'a str> {
    fields.iter().map(|f| f.name.as_str()).collect()
}

/// Literals are equivalent unless exactly one holds a string, or both hold
/// different strings. Numbers, booleans, null and patterns are never compared.
pub fn literals_equivalent(a: &Literal, b: &Literal) -> bool {
    match (a.as_text(), b.as_text()) {
        (Some(x), Some(y)) => x == y,
        (None, None) => true,
        _ => false,
    }
}

/// Short label for a node.
pub fn describe(node: &SyntaxNode) -> String {
    match &node.class {
        NodeClass::Identifier { name } => name.clone(),
        NodeClass::Literal(literal) => literal.raw.clone(),
        NodeClass::Function { name: Some(name) } => format!("{} {}", node.kind, name),
        NodeClass::Function { name: None } => node.kind.clone(),
        NodeClass::Binding { name } => name
            .clone()
            .unwrap_or_else(|| PATTERN_PLACEHOLDER.to_string()),
        NodeClass::Call { callee } => {
            format!("{}()", callee.as_deref().unwrap_or(CALLEE_PLACEHOLDER))
        }
        NodeClass::Other => node.kind.clone(),
    }
}

/// Label for a node replaced because its significant field set changed.
pub fn describe_field_set(node: &SyntaxNode, names: &BTreeSet<&str>) -> String {
    let names: Vec<&str> = names.iter().copied().collect();
    format!("{} {{{}}}", describe(node), names.join(", "))
}

/// Label for one side of a direct field mismatch.
///
/// Each side leads with its own value, so the two halves of a pair never share
/// a move key.
pub fn describe_field_change(
    node: &SyntaxNode,
    field: &str,
    side: DifferenceKind,
    own: &FieldValue,
    other: &FieldValue,
) -> String {
    let direction = match side {
        DifferenceKind::Removal => "changed to",
        DifferenceKind::Addition => "changed from",
    };
    format!(
        "{} {}: {} ({} {})",
        describe(node),
        field,
        own.summary(),
        direction,
        other.summary()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{LiteralValue, Scalar, Span};

    fn literal(raw: &str, value: LiteralValue) -> Literal {
        Literal {
            raw: raw.to_string(),
            value,
        }
    }

    fn node(kind: &str, class: NodeClass) -> SyntaxNode {
        SyntaxNode::new(kind, Span::new(0, 1)).with_class(class)
    }

    #[test]
    fn test_ignored_fields() {
        for name in ["loc", "extra", "leadingComments", "range", "raw"] {
            assert!(!is_significant(name), "{} should be ignored", name);
        }
        for name in ["body", "operator", "async", "children"] {
            assert!(is_significant(name), "{} should be significant", name);
        }

        let n = SyntaxNode::new("BinaryExpression", Span::new(0, 5))
            .with_field("loc", FieldValue::Scalar(Scalar::Record("{}".into())))
            .with_field("operator", FieldValue::Scalar(Scalar::Text("+".into())))
            .with_field("extra", FieldValue::Scalar(Scalar::Null));
        let names = field_names(&significant_fields(&n));
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["operator"]);
    }

    #[test]
    fn test_literal_equivalence() {
        let five = literal("5", LiteralValue::Number("5".into()));
        let six = literal("6", LiteralValue::Number("6".into()));
        let yes = literal("true", LiteralValue::Boolean(true));
        let re = literal("/a/", LiteralValue::Pattern { pattern: "a".into(), flags: String::new() });
        let a = literal("\"a\"", LiteralValue::Text("a".into()));
        let a_single = literal("'a'", LiteralValue::Text("a".into()));
        let b = literal("\"b\"", LiteralValue::Text("b".into()));

        assert!(literals_equivalent(&five, &six));
        assert!(literals_equivalent(&five, &yes));
        assert!(literals_equivalent(&re, &five));
        assert!(literals_equivalent(&a, &a_single));
        assert!(!literals_equivalent(&a, &b));
        assert!(!literals_equivalent(&a, &five));
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(&node("identifier", NodeClass::Identifier { name: "foo".into() })), "foo");
        assert_eq!(
            describe(&node("string", NodeClass::Literal(literal("'x'", LiteralValue::Text("x".into()))))),
            "'x'"
        );
        assert_eq!(
            describe(&node("function_declaration", NodeClass::Function { name: Some("f".into()) })),
            "function_declaration f"
        );
        assert_eq!(describe(&node("arrow_function", NodeClass::Function { name: None })), "arrow_function");
        assert_eq!(describe(&node("variable_declarator", NodeClass::Binding { name: Some("x".into()) })), "x");
        assert_eq!(describe(&node("variable_declarator", NodeClass::Binding { name: None })), "<pattern>");
        assert_eq!(describe(&node("call_expression", NodeClass::Call { callee: Some("log".into()) })), "log()");
        assert_eq!(describe(&node("call_expression", NodeClass::Call { callee: None })), "<callee>()");
        assert_eq!(describe(&node("if_statement", NodeClass::Other)), "if_statement");
    }

    #[test]
    fn test_field_change_halves_differ() {
        let n = node("binary_expression", NodeClass::Other);
        let plus = FieldValue::Scalar(Scalar::Text("+".into()));
        let minus = FieldValue::Scalar(Scalar::Text("-".into()));

        let removed = describe_field_change(&n, "operator", DifferenceKind::Removal, &plus, &minus);
        let added = describe_field_change(&n, "operator", DifferenceKind::Addition, &minus, &plus);
        assert_eq!(removed, "binary_expression operator: \"+\" (changed to \"-\")");
        assert_eq!(added, "binary_expression operator: \"-\" (changed from \"+\")");
    }

    #[test]
    fn test_field_set_description() {
        let n = node("function_declaration", NodeClass::Function { name: Some("f".into()) });
        let names: BTreeSet<&str> = ["name", "async", "body"].into_iter().collect();
        assert_eq!(describe_field_set(&n, &names), "function_declaration f {async, body, name}");
    }
}
