//! Helper functions for tree-sitter AST navigation.

use tree_sitter::Node;

/// Get the text content of a node.
pub fn get_node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    let start = node.start_byte();
    let end = node.end_byte();
    if start < source.len() && end <= source.len() && start < end {
        &source[start..end]
    } else {
        ""
    }
}

/// Find the first node (in document order) that is an error or was inserted
/// by error recovery. Subtrees without errors are skipped.
pub fn find_error_node<'a>(node: &Node<'a>) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    loop {
        let current = cursor.node();
        if current.is_error() || current.is_missing() {
            return Some(current);
        }
        if current.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// Get line and column (both 1-indexed) of a node's start.
pub fn get_start_position(node: &Node) -> (usize, usize) {
    let point = node.start_position();
    (point.row + 1, point.column + 1)
}

/// Strip the delimiters of a quoted string literal.
pub fn unquote(text: &str) -> &str {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && matches!(open, '"' | '\'' | '`') => {
            &text[open.len_utf8()..text.len() - close.len_utf8()]
        }
        _ => text,
    }
}
