//! Lowering from the typed syntax tree into the owned `RawNode`.

use super::ast::{self, Comparison, Expr, Root, Value};
use super::invariants::ensure_lowered;
use super::literal::Literal;
use super::raw::{ComparisonOp, FieldPath, RawComparison, RawNode};

pub fn lower(root: &Root) -> RawNode {
    lower_expr(&ensure_lowered(root.expr(), "expression"))
}

fn lower_expr(expr: &Expr) -> RawNode {
    match expr {
        Expr::Or(node) => RawNode::Or(
            Box::new(lower_expr(&ensure_lowered(node.lhs(), "left operand"))),
            Box::new(lower_expr(&ensure_lowered(node.rhs(), "right operand"))),
        ),
        Expr::And(node) => RawNode::And(
            Box::new(lower_expr(&ensure_lowered(node.lhs(), "left operand"))),
            Box::new(lower_expr(&ensure_lowered(node.rhs(), "right operand"))),
        ),
        Expr::Group(node) => RawNode::Group(Box::new(lower_expr(&ensure_lowered(
            node.inner(),
            "group body",
        )))),
        Expr::Comparison(node) => RawNode::Comparison(lower_comparison(node)),
    }
}

fn lower_comparison(node: &Comparison) -> RawComparison {
    let field = ensure_lowered(node.field().as_ref().and_then(ast::FieldPath::token), "field");
    let op_token = ensure_lowered(node.operator(), "operator");
    let op = ensure_lowered(ComparisonOp::from_token(op_token.text()), "known operator");

    let (values, is_list) = match node.value_list() {
        Some(list) => (list.values().map(|v| lower_value(&v)).collect(), true),
        None => (vec![lower_value(&ensure_lowered(node.value(), "value"))], false),
    };

    RawComparison {
        field: FieldPath::new(field.text(), field.text_range()),
        op,
        op_span: op_token.text_range(),
        values,
        is_list,
        span: node.as_cst().text_range(),
    }
}

fn lower_value(value: &Value) -> Literal {
    let token = ensure_lowered(value.token(), "value token");
    Literal::from_token(token.kind(), token.text(), token.text_range())
}
