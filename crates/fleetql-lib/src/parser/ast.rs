//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Cast is infallible for correct `SyntaxKind` - validation happens elsewhere.

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};
use super::cst::token_sets::VALUE_FIRST;

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(Root, Root);
ast_node!(Or, Or);
ast_node!(And, And);
ast_node!(Group, Group);
ast_node!(Comparison, Comparison);
ast_node!(FieldPath, FieldPath);
ast_node!(ValueList, ValueList);
ast_node!(Value, Value);

/// Expression: anything that evaluates to true or false.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Or(Or),
    And(And),
    Group(Group),
    Comparison(Comparison),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::Or => Or::cast(node).map(Expr::Or),
            SyntaxKind::And => And::cast(node).map(Expr::And),
            SyntaxKind::Group => Group::cast(node).map(Expr::Group),
            SyntaxKind::Comparison => Comparison::cast(node).map(Expr::Comparison),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Expr::Or(n) => n.as_cst(),
            Expr::And(n) => n.as_cst(),
            Expr::Group(n) => n.as_cst(),
            Expr::Comparison(n) => n.as_cst(),
        }
    }
}

fn nth_expr(node: &SyntaxNode, n: usize) -> Option<Expr> {
    node.children().filter_map(Expr::cast).nth(n)
}

impl Root {
    pub fn expr(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }
}

impl Or {
    pub fn lhs(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }

    pub fn rhs(&self) -> Option<Expr> {
        nth_expr(&self.0, 1)
    }
}

impl And {
    pub fn lhs(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }

    pub fn rhs(&self) -> Option<Expr> {
        nth_expr(&self.0, 1)
    }
}

impl Group {
    pub fn inner(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }
}

impl Comparison {
    pub fn field(&self) -> Option<FieldPath> {
        self.0.children().find_map(FieldPath::cast)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind() == SyntaxKind::Comparator)
    }

    /// Single unparenthesized value.
    pub fn value(&self) -> Option<Value> {
        self.0.children().find_map(Value::cast)
    }

    pub fn value_list(&self) -> Option<ValueList> {
        self.0.children().find_map(ValueList::cast)
    }
}

impl FieldPath {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind() == SyntaxKind::Bareword)
    }
}

impl ValueList {
    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        self.0.children().filter_map(Value::cast)
    }
}

impl Value {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| VALUE_FIRST.contains(t.kind()))
    }
}
