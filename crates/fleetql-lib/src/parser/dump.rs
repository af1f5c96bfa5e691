//! Indented text rendering of the syntax tree.

use std::fmt::Write;

use rowan::NodeOrToken;

use super::cst::SyntaxNode;

/// One line per node or token; tokens show their text.
pub fn dump_cst(node: &SyntaxNode, with_trivia: bool) -> String {
    let mut out = String::new();
    dump_node(&mut out, node, 0, with_trivia);
    out
}

fn dump_node(out: &mut String, node: &SyntaxNode, depth: usize, with_trivia: bool) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(out, "{indent}{:?}", node.kind());
    for child in node.children_with_tokens() {
        match child {
            NodeOrToken::Node(child) => dump_node(out, &child, depth + 1, with_trivia),
            NodeOrToken::Token(token) => {
                if !with_trivia && token.kind().is_trivia() {
                    continue;
                }
                let _ = writeln!(out, "{indent}  {:?} {:?}", token.kind(), token.text());
            }
        }
    }
}
