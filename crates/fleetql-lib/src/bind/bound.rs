//! Filter tree after field resolution.
//!
//! Bound nodes carry no source spans: two filters that differ only in
//! spelling, spacing or grouping bind to equal trees.

use std::sync::Arc;

use fleetql_core::{FieldDescriptor, ValueType};

use crate::parser::Piece;

/// Resolved field reference: the descriptor chain from the catalog root down
/// to the leaf (or map), plus the map key when there is one.
#[derive(Debug, Clone)]
pub struct FieldRef {
    chain: Vec<Arc<FieldDescriptor>>,
    sub_key: Option<String>,
}

impl FieldRef {
    pub(crate) fn new(chain: Vec<Arc<FieldDescriptor>>, sub_key: Option<String>) -> Self {
        assert!(!chain.is_empty(), "FieldRef: empty descriptor chain");
        Self { chain, sub_key }
    }

    pub fn chain(&self) -> &[Arc<FieldDescriptor>] {
        &self.chain
    }

    pub fn root(&self) -> &FieldDescriptor {
        &self.chain[0]
    }

    /// Descriptor holding the compared values.
    pub fn leaf(&self) -> &FieldDescriptor {
        &self.chain[self.chain.len() - 1]
    }

    pub fn sub_key(&self) -> Option<&str> {
        self.sub_key.as_deref()
    }

    pub fn value_type(&self) -> ValueType {
        self.leaf().value_type()
    }

    /// Values live in other rows than the filtered entity's own.
    pub fn is_joined(&self) -> bool {
        self.chain.len() > 1 || self.root().is_map()
    }

    /// Canonical dotted path: `NAME`, `ASSIGNEDDS.version`, `METADATA.region`.
    pub fn path(&self) -> String {
        let mut path = self
            .chain
            .iter()
            .map(|d| d.name())
            .collect::<Vec<_>>()
            .join(".");
        if let Some(key) = &self.sub_key {
            path.push('.');
            path.push_str(key);
        }
        path
    }

    /// Path without the map key, used to look up values in a provider.
    pub fn field_path(&self) -> String {
        self.chain
            .iter()
            .map(|d| d.name())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl PartialEq for FieldRef {
    fn eq(&self, other: &Self) -> bool {
        self.sub_key == other.sub_key
            && self.chain.len() == other.chain.len()
            && self
                .chain
                .iter()
                .zip(&other.chain)
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    In,
    Out,
    IsNull,
    IsNotNull,
}

impl BoundOp {
    /// Canonical spelling. Null checks print with their operand.
    pub fn as_str(self) -> &'static str {
        match self {
            BoundOp::Eq => "==",
            BoundOp::Ne => "!=",
            BoundOp::Gt => "=gt=",
            BoundOp::Ge => "=ge=",
            BoundOp::Lt => "=lt=",
            BoundOp::Le => "=le=",
            BoundOp::In => "=in=",
            BoundOp::Out => "=out=",
            BoundOp::IsNull => "=is=",
            BoundOp::IsNotNull => "=not=",
        }
    }

    pub fn is_negated(self) -> bool {
        matches!(self, BoundOp::Ne | BoundOp::Out | BoundOp::IsNotNull)
    }

    /// `!=` → `==`, `=out=` → `=in=`, `=not=null` → `=is=null`.
    pub fn positive(self) -> Self {
        match self {
            BoundOp::Ne => BoundOp::Eq,
            BoundOp::Out => BoundOp::In,
            BoundOp::IsNotNull => BoundOp::IsNull,
            op => op,
        }
    }

    pub fn is_ordering(self) -> bool {
        matches!(self, BoundOp::Gt | BoundOp::Ge | BoundOp::Lt | BoundOp::Le)
    }
}

impl std::fmt::Display for BoundOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal coerced to the field's value type.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Text(String),
    /// Text with at least one wildcard.
    Pattern(Vec<Piece>),
    /// Integral literal, kept exact so 64-bit ids survive.
    Integer(i64),
    Number(f64),
    Boolean(bool),
    /// Canonical spelling of an enumeration value.
    Enum(String),
}

impl BoundValue {
    /// Value as the matcher sees it. Wildcards render as `*`.
    pub fn to_text(&self) -> String {
        match self {
            BoundValue::Text(text) | BoundValue::Enum(text) => text.clone(),
            BoundValue::Pattern(pieces) => pieces
                .iter()
                .map(|p| match p {
                    Piece::Text(text) => text.as_str(),
                    Piece::Wildcard => "*",
                })
                .collect(),
            BoundValue::Integer(n) => n.to_string(),
            BoundValue::Number(n) => format_number(*n),
            BoundValue::Boolean(b) => b.to_string(),
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, BoundValue::Pattern(_))
    }
}

/// Integral values print without a fractional part.
pub fn format_number(n: f64) -> String {
    format!("{n}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundComparison {
    pub field: FieldRef,
    pub op: BoundOp,
    /// Empty for null checks; one value unless `op` is `In`/`Out`.
    pub values: Vec<BoundValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoundNode {
    Comparison(BoundComparison),
    And(Box<BoundNode>, Box<BoundNode>),
    Or(Box<BoundNode>, Box<BoundNode>),
}

impl BoundNode {
    pub fn comparisons(&self) -> Vec<&BoundComparison> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a BoundComparison>) {
        match self {
            BoundNode::Comparison(c) => out.push(c),
            BoundNode::And(l, r) | BoundNode::Or(l, r) => {
                l.collect(out);
                r.collect(out);
            }
        }
    }
}
