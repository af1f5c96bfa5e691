//! Owned parse result, detached from the syntax tree.

use rowan::TextRange;

use super::literal::Literal;

/// Comparison operator as written. Aliases are folded, `=is=`/`=not=` stay
/// distinct because only they accept `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    In,
    Out,
    Is,
    Not,
}

impl ComparisonOp {
    /// Operator spelling is case-insensitive.
    pub fn from_token(text: &str) -> Option<Self> {
        let op = match text.to_ascii_lowercase().as_str() {
            "==" => ComparisonOp::Eq,
            "!=" => ComparisonOp::Ne,
            "=gt=" | ">" => ComparisonOp::Gt,
            "=ge=" | ">=" => ComparisonOp::Ge,
            "=lt=" | "<" => ComparisonOp::Lt,
            "=le=" | "<=" => ComparisonOp::Le,
            "=in=" => ComparisonOp::In,
            "=out=" => ComparisonOp::Out,
            "=is=" | "=eq=" => ComparisonOp::Is,
            "=not=" | "=ne=" => ComparisonOp::Not,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Gt => "=gt=",
            ComparisonOp::Ge => "=ge=",
            ComparisonOp::Lt => "=lt=",
            ComparisonOp::Le => "=le=",
            ComparisonOp::In => "=in=",
            ComparisonOp::Out => "=out=",
            ComparisonOp::Is => "=is=",
            ComparisonOp::Not => "=not=",
        }
    }

    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            ComparisonOp::Gt | ComparisonOp::Ge | ComparisonOp::Lt | ComparisonOp::Le
        )
    }

    pub fn accepts_list(self) -> bool {
        matches!(self, ComparisonOp::In | ComparisonOp::Out)
    }
}

impl std::fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dotted field reference, split into segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    pub segments: Vec<String>,
    pub span: TextRange,
}

impl FieldPath {
    pub fn new(text: &str, span: TextRange) -> Self {
        Self {
            segments: text.split('.').map(str::to_string).collect(),
            span,
        }
    }

    pub fn head(&self) -> &str {
        &self.segments[0]
    }

    pub fn text(&self) -> String {
        self.segments.join(".")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawComparison {
    pub field: FieldPath,
    pub op: ComparisonOp,
    pub op_span: TextRange,
    pub values: Vec<Literal>,
    /// Written with parentheses, even for a single value.
    pub is_list: bool,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawNode {
    Comparison(RawComparison),
    And(Box<RawNode>, Box<RawNode>),
    Or(Box<RawNode>, Box<RawNode>),
    Group(Box<RawNode>),
}

impl RawNode {
    pub fn span(&self) -> TextRange {
        match self {
            RawNode::Comparison(c) => c.span,
            RawNode::And(l, r) | RawNode::Or(l, r) => l.span().cover(r.span()),
            RawNode::Group(inner) => inner.span(),
        }
    }

    /// Comparisons in source order.
    pub fn comparisons(&self) -> Vec<&RawComparison> {
        let mut out = Vec::new();
        self.collect_comparisons(&mut out);
        out
    }

    fn collect_comparisons<'a>(&'a self, out: &mut Vec<&'a RawComparison>) {
        match self {
            RawNode::Comparison(c) => out.push(c),
            RawNode::And(l, r) | RawNode::Or(l, r) => {
                l.collect_comparisons(out);
                r.collect_comparisons(out);
            }
            RawNode::Group(inner) => inner.collect_comparisons(out),
        }
    }
}
