//! Comparator logic for diffing syntax trees.
//!
//! Walks two trees in lockstep and applies the equivalence policy at each
//! node pair, in precedence order:
//!
//! 1. one side absent → a single removal or addition;
//! 2. kind mismatch → removal + addition, no recursion;
//! 3. identifiers → always equal;
//! 4. literals → only string-ness and string content matter;
//! 5. significant field names differ → removal + addition, no recursion;
//! 6. field by field: recurse into nodes and node lists; the first primitive
//!    mismatch reports the parent and skips its remaining fields.
//!
//! Every composite frame runs [`reconcile`] over what it accumulated before
//! handing the list to its parent. Frames live on a heap stack, so deeply
//! nested trees such as long concatenation chains cannot overflow the thread.

use crate::differ::changes::{Difference, DifferenceKind};
use crate::differ::moves::reconcile;
use crate::differ::policy::{
    describe, describe_field_change, describe_field_set, field_names, literals_equivalent,
    significant_fields,
};
use crate::syntax::{FieldValue, NodeClass, SyntaxNode};

type NodePair<'t> = (Option<&'t SyntaxNode>, Option<&'t SyntaxNode>);

/// Compare two optional nodes and return their differences.
///
/// Pure and deterministic; neither tree is modified.
pub fn compare(a: Option<&SyntaxNode>, b: Option<&SyntaxNode>) -> Vec<Difference> {
    let mut current = match step(a, b) {
        Step::Settled(differences) => return differences,
        Step::Descend(frame) => frame,
    };
    let mut ancestors: Vec<Frame> = Vec::new();

    loop {
        if let Some((x, y)) = current.pending.next() {
            match step(x, y) {
                Step::Settled(differences) => current.found.extend(differences),
                Step::Descend(frame) => ancestors.push(std::mem::replace(&mut current, frame)),
            }
            continue;
        }

        let differences = current.finish();
        match ancestors.pop() {
            Some(parent) => {
                current = parent;
                current.found.extend(differences);
            }
            None => return differences,
        }
    }
}

/// Compare two tree roots.
pub fn compare_trees(a: &SyntaxNode, b: &SyntaxNode) -> Vec<Difference> {
    compare(Some(a), Some(b))
}

enum Step<'t> {
    /// Decided without looking at children.
    Settled(Vec<Difference>),
    /// Same kind and field set; child pairs still to compare.
    Descend(Frame<'t>),
}

/// A composite node pair being compared child by child.
struct Frame<'t> {
    pending: std::vec::IntoIter<NodePair<'t>>,
    /// Pair reported for the first mismatching primitive field, after the
    /// children of the fields before it.
    trailing: Vec<Difference>,
    found: Vec<Difference>,
}

impl Frame<'_> {
    fn finish(mut self) -> Vec<Difference> {
        self.found.append(&mut self.trailing);
        reconcile(self.found)
    }
}

fn replaced(a: &SyntaxNode, a_label: String, b: &SyntaxNode, b_label: String) -> Vec<Difference> {
    vec![Difference::removal(a, a_label), Difference::addition(b, b_label)]
}

fn step<'t>(a: Option<&'t SyntaxNode>, b: Option<&'t SyntaxNode>) -> Step<'t> {
    let (a, b) = match (a, b) {
        (None, None) => return Step::Settled(Vec::new()),
        (Some(a), None) => return Step::Settled(vec![Difference::removal(a, describe(a))]),
        (None, Some(b)) => return Step::Settled(vec![Difference::addition(b, describe(b))]),
        (Some(a), Some(b)) => (a, b),
    };

    if a.kind != b.kind {
        return Step::Settled(replaced(a, describe(a), b, describe(b)));
    }

    match (&a.class, &b.class) {
        (NodeClass::Identifier { .. }, NodeClass::Identifier { .. }) => {
            return Step::Settled(Vec::new())
        }
        (NodeClass::Literal(x), NodeClass::Literal(y)) => {
            return Step::Settled(if literals_equivalent(x, y) {
                Vec::new()
            } else {
                replaced(a, describe(a), b, describe(b))
            });
        }
        _ => {}
    }

    let fields_a = significant_fields(a);
    let fields_b = significant_fields(b);
    let names_a = field_names(&fields_a);
    let names_b = field_names(&fields_b);
    if names_a != names_b {
        return Step::Settled(replaced(
            a,
            describe_field_set(a, &names_a),
            b,
            describe_field_set(b, &names_b),
        ));
    }

    let mut pending = Vec::new();
    let mut trailing = Vec::new();
    for field in fields_a.iter().copied() {
        let Some(other) = fields_b.iter().copied().find(|f| f.name == field.name) else {
            continue;
        };
        let outcome = queue_field(&field.value, &other.value, &mut pending);
        if outcome == FieldOutcome::Mismatch {
            let (mine, theirs) = (&field.value, &other.value);
            trailing.push(Difference::removal(
                a,
                describe_field_change(a, &field.name, DifferenceKind::Removal, mine, theirs),
            ));
            trailing.push(Difference::addition(
                b,
                describe_field_change(b, &field.name, DifferenceKind::Addition, theirs, mine),
            ));
            break;
        }
    }

    Step::Descend(Frame {
        pending: pending.into_iter(),
        trailing,
        found: Vec::new(),
    })
}

#[derive(Debug, PartialEq, Eq)]
enum FieldOutcome {
    /// Equal, or only child pairs were queued.
    Matched,
    /// A primitive value or primitive sequence differs.
    Mismatch,
}

fn queue_field<'t>(a: &'t FieldValue, b: &'t FieldValue, out: &mut Vec<NodePair<'t>>) -> FieldOutcome {
    match (a, b) {
        (FieldValue::Node(x), FieldValue::Node(y)) => out.push((Some(&**x), Some(&**y))),
        (FieldValue::Node(x), _) => out.push((Some(&**x), None)),
        (_, FieldValue::Node(y)) => out.push((None, Some(&**y))),
        _ => match (a.as_node_list(), b.as_node_list()) {
            (Some(xs), Some(ys)) => {
                for i in 0..xs.len().max(ys.len()) {
                    let x = xs.get(i).and_then(Option::as_ref);
                    let y = ys.get(i).and_then(Option::as_ref);
                    out.push((x, y));
                }
            }
            _ if a != b => return FieldOutcome::Mismatch,
            _ => {}
        },
    }
    FieldOutcome::Matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Literal, LiteralValue, Scalar, Span};

    fn ident(name: &str, at: usize) -> SyntaxNode {
        SyntaxNode::new("Identifier", Span::new(at, at + name.len())).with_class(
            NodeClass::Identifier {
                name: name.to_string(),
            },
        )
    }

    fn string(value: &str, at: usize) -> SyntaxNode {
        let raw = format!("{:?}", value);
        SyntaxNode::new("StringLiteral", Span::new(at, at + raw.len())).with_class(
            NodeClass::Literal(Literal {
                raw,
                value: LiteralValue::Text(value.to_string()),
            }),
        )
    }

    fn number(raw: &str, at: usize) -> SyntaxNode {
        SyntaxNode::new("NumericLiteral", Span::new(at, at + raw.len())).with_class(
            NodeClass::Literal(Literal {
                raw: raw.to_string(),
                value: LiteralValue::Number(raw.to_string()),
            }),
        )
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Scalar(Scalar::Text(s.to_string()))
    }

    fn list(nodes: Vec<SyntaxNode>) -> FieldValue {
        FieldValue::NodeList(nodes.into_iter().map(Some).collect())
    }

    fn binary(op: &str, left: SyntaxNode, right: SyntaxNode) -> SyntaxNode {
        SyntaxNode::new("BinaryExpression", Span::new(0, 5))
            .with_field("left", FieldValue::Node(Box::new(left)))
            .with_field("operator", text(op))
            .with_field("right", FieldValue::Node(Box::new(right)))
    }

    #[test]
    fn test_null_handling() {
        let a = ident("a", 0);
        assert!(compare(None, None).is_empty());

        let removed = compare(Some(&a), None);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].kind, DifferenceKind::Removal);
        assert_eq!(removed[0].description.as_deref(), Some("a"));

        let added = compare(None, Some(&a));
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].kind, DifferenceKind::Addition);
    }

    #[test]
    fn test_identifiers_always_equal() {
        assert!(compare_trees(&ident("alpha", 0), &ident("b", 9)).is_empty());
    }

    #[test]
    fn test_literal_rules() {
        assert!(compare_trees(&number("5", 0), &number("6", 0)).is_empty());

        let diffs = compare_trees(&string("a", 0), &string("b", 0));
        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[0].description.as_deref(), Some("\"a\""));
        assert_eq!(diffs[1].description.as_deref(), Some("\"b\""));
    }

    #[test]
    fn test_kind_mismatch_does_not_recurse() {
        let deep = binary("+", binary("*", ident("a", 0), ident("b", 2)), string("c", 4));
        let diffs = compare_trees(&number("1", 0), &deep);

        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[0].node_kind, "NumericLiteral");
        assert_eq!(diffs[1].node_kind, "BinaryExpression");
    }

    #[test]
    fn test_scalar_mismatch_reports_parent() {
        let a = binary("+", ident("a", 0), ident("b", 4));
        let b = binary("-", ident("x", 0), ident("y", 4));
        let diffs = compare_trees(&a, &b);

        assert_eq!(diffs.len(), 2);
        assert!(diffs[0].is_removal());
        assert_eq!(diffs[0].node_kind, "BinaryExpression");
        assert!(diffs[0].description.as_deref().unwrap().contains("operator"));
        assert!(diffs[1].is_addition());
    }

    #[test]
    fn test_early_return_keeps_earlier_children() {
        let a = binary("+", string("l", 0), ident("b", 4));
        let b = binary("-", string("m", 0), ident("b", 4));
        let diffs = compare_trees(&a, &b);

        // left literal pair first, then the operator pair
        assert_eq!(diffs.len(), 4);
        let kinds: Vec<&str> = diffs.iter().map(|d| d.node_kind.as_str()).collect();
        assert_eq!(
            kinds,
            vec!["StringLiteral", "BinaryExpression", "StringLiteral", "BinaryExpression"]
        );
    }

    #[test]
    fn test_field_set_change_is_atomic() {
        let plain = SyntaxNode::new("FunctionDeclaration", Span::new(0, 10))
            .with_field("body", list(vec![string("x", 2)]));
        let flagged = plain
            .clone()
            .with_field("async", FieldValue::Scalar(Scalar::Bool(true)));
        let mut changed_body = flagged.clone();
        changed_body.fields[0].value = list(vec![string("y", 2)]);

        let diffs = compare_trees(&plain, &changed_body);
        assert_eq!(diffs.len(), 2);
        assert!(diffs[0].description.as_deref().unwrap().contains("{body}"));
        assert!(diffs[1].description.as_deref().unwrap().contains("{async, body}"));
    }

    #[test]
    fn test_node_lists_of_unequal_length() {
        let a = SyntaxNode::new("Program", Span::new(0, 9)).with_field(
            "body",
            FieldValue::NodeList(vec![Some(string("a", 0)), None]),
        );
        let b = SyntaxNode::new("Program", Span::new(0, 9)).with_field(
            "body",
            FieldValue::NodeList(vec![Some(string("a", 0)), None, Some(string("z", 6))]),
        );
        let diffs = compare_trees(&a, &b);
        assert_eq!(diffs.len(), 1);
        assert!(diffs[0].is_addition());
        assert_eq!(diffs[0].description.as_deref(), Some("\"z\""));
    }

    #[test]
    fn test_node_against_null_scalar() {
        let a = SyntaxNode::new("FunctionExpression", Span::new(0, 9))
            .with_field("id", FieldValue::Scalar(Scalar::Null));
        let b = SyntaxNode::new("FunctionExpression", Span::new(0, 9))
            .with_field("id", FieldValue::Node(Box::new(ident("f", 9))));
        let diffs = compare_trees(&a, &b);
        assert_eq!(diffs.len(), 1);
        assert!(diffs[0].is_addition());
        assert_eq!(diffs[0].node_kind, "Identifier");
    }

    #[test]
    fn test_scalar_list_mismatch_stops_parent() {
        let make = |flags: Vec<&str>, tail: &str| {
            SyntaxNode::new("Directive", Span::new(0, 9))
                .with_field(
                    "flags",
                    FieldValue::ScalarList(flags.into_iter().map(|f| Scalar::Text(f.into())).collect()),
                )
                .with_field("value", FieldValue::Node(Box::new(string(tail, 5))))
        };
        let diffs = compare_trees(&make(vec!["a", "b"], "p"), &make(vec!["a", "c"], "q"));

        assert_eq!(diffs.len(), 2);
        assert!(diffs.iter().all(|d| d.node_kind == "Directive"));
        assert!(diffs[0].description.as_deref().unwrap().contains("[\"a\", \"b\"]"));
    }

    #[test]
    fn test_empty_lists_compare_equal_across_shapes() {
        let a = SyntaxNode::new("ArrayExpression", Span::new(0, 2))
            .with_field("elements", FieldValue::NodeList(vec![]));
        let b = SyntaxNode::new("ArrayExpression", Span::new(0, 2))
            .with_field("elements", FieldValue::ScalarList(vec![]));
        assert!(compare_trees(&a, &b).is_empty());
    }

    #[test]
    fn test_deep_chain_compares_without_recursion() {
        let chain = |tail: &str| {
            let mut node = string("s", 0);
            for i in 0..100_000 {
                node = binary("+", node, string(&i.to_string(), 2));
            }
            binary("+", node, string(tail, 4))
        };
        let a = chain("p");
        let b = chain("q");

        assert!(compare_trees(&a, &chain("p")).is_empty());
        let diffs = compare_trees(&a, &b);
        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[0].description.as_deref(), Some("\"p\""));
        assert_eq!(diffs[1].description.as_deref(), Some("\"q\""));
    }

    #[test]
    fn test_reflexive() {
        let tree = binary("*", binary("+", string("s", 0), number("2", 3)), ident("q", 5));
        assert!(compare_trees(&tree, &tree.clone()).is_empty());
    }
}
