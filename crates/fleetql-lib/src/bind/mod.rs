//! Schema binding: resolves field paths against a catalog, checks operators
//! and coerces literals to the field's value type.
//!
//! Binding is pure. It never looks at stored data, only at the catalog.

mod bound;
mod resolve;


use fleetql_core::utils::bracket_list;
use fleetql_core::{FieldCatalog, FieldDescriptor, ValueType};
use rowan::{TextRange, TextSize};

pub use bound::{BoundComparison, BoundNode, BoundOp, BoundValue, FieldRef, format_number};
pub use resolve::{PathError, resolve_path};

use crate::config::EngineConfig;
use crate::parser::{ComparisonOp, FieldPath, Literal, RawComparison, RawNode};
use crate::{DiagnosticKind, FieldError};

/// Bind a parsed filter, returning the first error in source order.
pub fn bind(
    raw: &RawNode,
    catalog: &FieldCatalog,
    config: &EngineConfig,
) -> Result<BoundNode, FieldError> {
    bind_all(raw, catalog, config).map_err(|mut errors| errors.swap_remove(0))
}

/// Bind a parsed filter, collecting every field error.
pub fn bind_all(
    raw: &RawNode,
    catalog: &FieldCatalog,
    config: &EngineConfig,
) -> Result<BoundNode, Vec<FieldError>> {
    let mut binder = Binder {
        catalog,
        config,
        errors: Vec::new(),
    };
    let bound = binder.bind_node(raw);
    match bound {
        Some(node) if binder.errors.is_empty() => {
            tracing::trace!(entity = catalog.entity(), "bound filter");
            Ok(node)
        }
        _ => {
            tracing::debug!(
                entity = catalog.entity(),
                errors = binder.errors.len(),
                "filter rejected by catalog"
            );
            binder.errors.sort_by_key(|e| e.range().start());
            Err(binder.errors)
        }
    }
}

struct Binder<'a> {
    catalog: &'a FieldCatalog,
    config: &'a EngineConfig,
    errors: Vec<FieldError>,
}

impl Binder<'_> {
    fn bind_node(&mut self, raw: &RawNode) -> Option<BoundNode> {
        match raw {
            RawNode::Comparison(c) => self.bind_comparison(c).map(BoundNode::Comparison),
            RawNode::And(l, r) => {
                let (l, r) = (self.bind_node(l), self.bind_node(r));
                Some(BoundNode::And(Box::new(l?), Box::new(r?)))
            }
            RawNode::Or(l, r) => {
                let (l, r) = (self.bind_node(l), self.bind_node(r));
                Some(BoundNode::Or(Box::new(l?), Box::new(r?)))
            }
            RawNode::Group(inner) => self.bind_node(inner),
        }
    }

    fn error(
        &mut self,
        kind: DiagnosticKind,
        detail: Option<&str>,
        range: TextRange,
        fragment: &str,
    ) {
        self.errors.push(FieldError::new(kind, detail, range, fragment));
    }

    fn bind_comparison(&mut self, raw: &RawComparison) -> Option<BoundComparison> {
        let field = match resolve_path(self.catalog, &raw.field.segments) {
            Ok(field) => field,
            Err(err) => {
                let (range, fragment) = segment_tail(&raw.field, err.segment);
                self.error(err.kind, err.detail.as_deref(), range, &fragment);
                return None;
            }
        };

        let values_span = raw.values[0].span.cover(raw.values[raw.values.len() - 1].span);
        let is_null_check = matches!(raw.op, ComparisonOp::Is | ComparisonOp::Not)
            && !raw.is_list
            && raw.values[0].is_null();
        if is_null_check {
            let op = if raw.op == ComparisonOp::Is {
                BoundOp::IsNull
            } else {
                BoundOp::IsNotNull
            };
            return Some(BoundComparison {
                field,
                op,
                values: Vec::new(),
            });
        }

        let op = bound_op(raw.op);
        if raw.is_list && !raw.op.accepts_list() {
            let detail = format!("`{}` got a list", raw.op);
            self.error(
                DiagnosticKind::ListNotAllowed,
                Some(&detail),
                values_span,
                &literal_span_text(&raw.values),
            );
            return None;
        }

        let leaf = field.leaf();
        if op.is_ordering() && !self.supports_ordering(leaf.value_type()) {
            let detail = format!(
                "`{}` cannot be used on {} field `{}`",
                raw.op,
                leaf.value_type(),
                field.path()
            );
            self.error(
                DiagnosticKind::OrderingNotSupported,
                Some(&detail),
                raw.op_span,
                raw.op.as_str(),
            );
            return None;
        }

        let mut values = Vec::with_capacity(raw.values.len());
        let mut ok = true;
        for literal in &raw.values {
            match self.coerce(&field, leaf, op, literal) {
                Some(value) => values.push(value),
                None => ok = false,
            }
        }

        ok.then_some(BoundComparison { field, op, values })
    }

    fn supports_ordering(&self, value_type: ValueType) -> bool {
        value_type.is_ordered() || value_type == ValueType::String && self.config.lexicographic_ordering
    }

    fn coerce(
        &mut self,
        field: &FieldRef,
        leaf: &FieldDescriptor,
        op: BoundOp,
        literal: &Literal,
    ) -> Option<BoundValue> {
        let value_type = leaf.value_type();

        if literal.has_wildcard() {
            let reason = if value_type != ValueType::String {
                Some(format!("`{}` is a {} field", field.path(), value_type))
            } else if op.is_ordering() {
                Some(format!("`{op}` compares whole values"))
            } else if op.positive() == BoundOp::In {
                Some("value lists match whole values".to_string())
            } else {
                None
            };
            if let Some(reason) = reason {
                self.error(
                    DiagnosticKind::WildcardNotSupported,
                    Some(&reason),
                    literal.span,
                    &literal.raw,
                );
                return None;
            }
            return Some(BoundValue::Pattern(literal.pieces.clone()));
        }

        let text = literal.text();
        match value_type {
            ValueType::String => Some(BoundValue::Text(text)),
            ValueType::Number | ValueType::Timestamp => match parse_number(&text) {
                Some(value) => Some(value),
                None => {
                    let detail = format!("`{}` given for `{}`", literal.raw, field.path());
                    self.error(
                        DiagnosticKind::InvalidNumber,
                        Some(&detail),
                        literal.span,
                        &literal.raw,
                    );
                    None
                }
            },
            ValueType::Boolean => {
                if text.eq_ignore_ascii_case("true") {
                    Some(BoundValue::Boolean(true))
                } else if text.eq_ignore_ascii_case("false") {
                    Some(BoundValue::Boolean(false))
                } else {
                    let detail = format!("`{}` given for `{}`", literal.raw, field.path());
                    self.error(
                        DiagnosticKind::InvalidBoolean,
                        Some(&detail),
                        literal.span,
                        &literal.raw,
                    );
                    None
                }
            }
            ValueType::EnumSet => {
                let allowed = leaf.enum_values();
                match allowed.iter().find(|v| v.eq_ignore_ascii_case(&text)) {
                    Some(canonical) => Some(BoundValue::Enum(canonical.clone())),
                    None => {
                        let detail = format!(
                            "`{text}` is not a valid value for `{}`; allowed values: {}",
                            field.path(),
                            bracket_list(allowed.iter().map(String::as_str))
                        );
                        self.error(
                            DiagnosticKind::InvalidEnumValue,
                            Some(&detail),
                            literal.span,
                            &literal.raw,
                        );
                        None
                    }
                }
            }
        }
    }
}

fn bound_op(op: ComparisonOp) -> BoundOp {
    match op {
        ComparisonOp::Eq | ComparisonOp::Is => BoundOp::Eq,
        ComparisonOp::Ne | ComparisonOp::Not => BoundOp::Ne,
        ComparisonOp::Gt => BoundOp::Gt,
        ComparisonOp::Ge => BoundOp::Ge,
        ComparisonOp::Lt => BoundOp::Lt,
        ComparisonOp::Le => BoundOp::Le,
        ComparisonOp::In => BoundOp::In,
        ComparisonOp::Out => BoundOp::Out,
    }
}

/// Range and text of `path` from segment `index` to its end.
fn segment_tail(path: &FieldPath, index: usize) -> (TextRange, String) {
    let skipped: usize = path.segments[..index.min(path.segments.len())]
        .iter()
        .map(|s| s.len() + 1)
        .sum();
    let start = path.span.start() + TextSize::from(skipped as u32);
    let start = start.min(path.span.end());
    let range = TextRange::new(start, path.span.end());
    let fragment = path.segments[index.min(path.segments.len())..].join(".");
    (range, fragment)
}

fn literal_span_text(values: &[Literal]) -> String {
    values
        .iter()
        .map(|v| v.raw.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Integral text stays an `i64`. Anything else must be a finite `f64`.
fn parse_number(text: &str) -> Option<BoundValue> {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return Some(BoundValue::Integer(n));
    }
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(BoundValue::Number(n)),
        _ => None,
    }
}
