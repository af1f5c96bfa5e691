//! Canonical filter text.
//!
//! Printing a bound filter yields one spelling per meaning: canonical field
//! paths and operators, every literal double-quoted, `&&`/`||` connectors and
//! only the parentheses the tree shape needs. The output parses and binds
//! back to an equal tree, so it doubles as a memoization key.

use std::fmt;

use crate::bind::{BoundComparison, BoundNode, BoundOp, BoundValue, format_number};
use crate::parser::Piece;

/// Canonical text of a bound filter.
pub fn print(node: &BoundNode) -> String {
    FilterPrinter::new(node).dump()
}

pub struct FilterPrinter<'a> {
    node: &'a BoundNode,
    tree: bool,
}

impl<'a> FilterPrinter<'a> {
    pub fn new(node: &'a BoundNode) -> Self {
        Self { node, tree: false }
    }

    /// One node per line, indented by depth, instead of filter text.
    pub fn tree(mut self, value: bool) -> Self {
        self.tree = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        if self.tree {
            format_tree(self.node, 0, &mut out);
        } else {
            format_node(self.node, &mut out);
        }
        out
    }
}

impl fmt::Display for FilterPrinter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

fn format_node(node: &BoundNode, out: &mut String) {
    match node {
        BoundNode::Comparison(c) => format_comparison(c, out),
        BoundNode::And(left, right) => {
            format_operand(left, matches!(**left, BoundNode::Or(..)), out);
            out.push_str(" && ");
            format_operand(right, !matches!(**right, BoundNode::Comparison(_)), out);
        }
        BoundNode::Or(left, right) => {
            format_node(left, out);
            out.push_str(" || ");
            format_operand(right, matches!(**right, BoundNode::Or(..)), out);
        }
    }
}

fn format_operand(node: &BoundNode, parens: bool, out: &mut String) {
    if parens {
        out.push('(');
        format_node(node, out);
        out.push(')');
    } else {
        format_node(node, out);
    }
}

fn format_comparison(c: &BoundComparison, out: &mut String) {
    out.push_str(&c.field.path());
    match c.op {
        BoundOp::IsNull => out.push_str("=is=null"),
        BoundOp::IsNotNull => out.push_str("=not=null"),
        BoundOp::In | BoundOp::Out => {
            out.push_str(c.op.as_str());
            out.push('(');
            for (i, value) in c.values.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                format_value(value, out);
            }
            out.push(')');
        }
        op => {
            out.push_str(op.as_str());
            if let Some(value) = c.values.first() {
                format_value(value, out);
            }
        }
    }
}

fn format_value(value: &BoundValue, out: &mut String) {
    out.push('"');
    match value {
        BoundValue::Text(text) | BoundValue::Enum(text) => escape_into(text, out),
        BoundValue::Pattern(pieces) => {
            for piece in pieces {
                match piece {
                    Piece::Text(text) => escape_into(text, out),
                    Piece::Wildcard => out.push('*'),
                }
            }
        }
        BoundValue::Integer(n) => out.push_str(&n.to_string()),
        BoundValue::Number(n) => out.push_str(&format_number(*n)),
        BoundValue::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
    }
    out.push('"');
}

/// Inside quotes `*` is still a wildcard, so a literal one is escaped too.
fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        if matches!(c, '\\' | '"' | '*') {
            out.push('\\');
        }
        out.push(c);
    }
}

fn format_tree(node: &BoundNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match node {
        BoundNode::Comparison(c) => {
            out.push_str(&indent);
            format_comparison(c, out);
            out.push('\n');
        }
        BoundNode::And(left, right) | BoundNode::Or(left, right) => {
            out.push_str(&indent);
            out.push_str(if matches!(node, BoundNode::And(..)) {
                "And\n"
            } else {
                "Or\n"
            });
            format_tree(left, depth + 1, out);
            format_tree(right, depth + 1, out);
        }
    }
}
