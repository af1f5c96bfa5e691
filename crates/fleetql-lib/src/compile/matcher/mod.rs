//! In-memory matcher.
//!
//! Compiles a plan into a closure tree evaluated against a [`FieldValues`]
//! provider. Absent values behave like SQL nulls: they satisfy no test, so
//! `NAME!=x` holds for an entity without a name.

mod values;


use std::cmp::Ordering;

use fleetql_core::ValueType;

pub use values::{FieldValueMap, FieldValues};

use super::plan::{Check, Plan, Quantifier, Test};
use crate::bind::BoundValue;
use crate::parser::Piece;

type Eval = Box<dyn Fn(&dyn FieldValues) -> bool + Send + Sync>;
type ValueTest = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Compiled in-memory predicate.
pub struct Matcher {
    eval: Eval,
}

impl Matcher {
    pub(crate) fn compile(plan: &Plan, fold: bool) -> Self {
        Self {
            eval: compile_plan(plan, fold),
        }
    }

    pub fn matches(&self, values: &dyn FieldValues) -> bool {
        (self.eval)(values)
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher").finish_non_exhaustive()
    }
}

fn compile_plan(plan: &Plan, fold: bool) -> Eval {
    match plan {
        Plan::Check(check) => compile_check(check, fold),
        Plan::And(l, r) => {
            let (l, r) = (compile_plan(l, fold), compile_plan(r, fold));
            Box::new(move |values: &dyn FieldValues| l(values) && r(values))
        }
        Plan::Or(l, r) => {
            let (l, r) = (compile_plan(l, fold), compile_plan(r, fold));
            Box::new(move |values: &dyn FieldValues| l(values) || r(values))
        }
    }
}

fn compile_check(check: &Check, fold: bool) -> Eval {
    let field = check.field.field_path();
    let sub_key = check.field.sub_key().map(str::to_string);
    let test = value_test(&check.test, check.field.value_type(), fold);

    let fetch = move |provider: &dyn FieldValues| provider.values(&field, sub_key.as_deref());
    match check.quantifier {
        Quantifier::Holds | Quantifier::Any => {
            Box::new(move |provider: &dyn FieldValues| fetch(provider).iter().any(|v| test(v)))
        }
        Quantifier::NullOrFails | Quantifier::NoneHold => {
            Box::new(move |provider: &dyn FieldValues| !fetch(provider).iter().any(|v| test(v)))
        }
        Quantifier::EmptyOrAnyFails => Box::new(move |provider: &dyn FieldValues| {
            let values = fetch(provider);
            values.is_empty() || values.iter().any(|v| !test(v))
        }),
    }
}

fn value_test(test: &Test, value_type: ValueType, fold: bool) -> ValueTest {
    let fold = fold && value_type == ValueType::String;
    match test {
        Test::Present => Box::new(|_: &str| true),
        Test::Eq(value) => {
            let expected = Expected::new(value, fold);
            Box::new(move |actual: &str| expected.equals(actual))
        }
        Test::Like(pieces) => {
            let glob = Glob::new(pieces, fold);
            Box::new(move |actual: &str| glob.matches(actual))
        }
        Test::Order(order, value) => {
            let expected = Expected::new(value, fold);
            let order = *order;
            Box::new(move |actual: &str| expected.compare(actual).is_some_and(|o| order.holds(o)))
        }
        Test::In(values) => {
            let expected: Vec<_> = values.iter().map(|v| Expected::new(v, fold)).collect();
            Box::new(move |actual: &str| expected.iter().any(|e| e.equals(actual)))
        }
    }
}

/// Comparison operand, typed the way the field is.
enum Expected {
    Text { text: String, fold: bool },
    Integer(i64),
    Number(f64),
    Boolean(bool),
}

impl Expected {
    fn new(value: &BoundValue, fold: bool) -> Self {
        match value {
            BoundValue::Integer(n) => Expected::Integer(*n),
            BoundValue::Number(n) => Expected::Number(*n),
            BoundValue::Boolean(b) => Expected::Boolean(*b),
            other => {
                let text = other.to_text();
                Expected::Text {
                    text: if fold { text.to_uppercase() } else { text },
                    fold,
                }
            }
        }
    }

    /// Order of `actual` relative to the operand. `None` when `actual` does
    /// not parse as the operand's type.
    fn compare(&self, actual: &str) -> Option<Ordering> {
        match self {
            Expected::Integer(n) => {
                let actual = actual.trim();
                match actual.parse::<i64>() {
                    Ok(a) => Some(a.cmp(n)),
                    Err(_) => actual.parse::<f64>().ok()?.partial_cmp(&(*n as f64)),
                }
            }
            Expected::Number(n) => actual.trim().parse::<f64>().ok()?.partial_cmp(n),
            Expected::Boolean(b) => parse_bool(actual).map(|a| a.cmp(b)),
            Expected::Text { text, fold: true } => Some(actual.to_uppercase().as_str().cmp(text)),
            Expected::Text { text, fold: false } => Some(actual.cmp(text.as_str())),
        }
    }

    fn equals(&self, actual: &str) -> bool {
        self.compare(actual) == Some(Ordering::Equal)
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Wildcard pattern: literal segments separated by `*`.
struct Glob {
    literals: Vec<String>,
    anchored_start: bool,
    anchored_end: bool,
    fold: bool,
}

impl Glob {
    fn new(pieces: &[Piece], fold: bool) -> Self {
        let literals = pieces
            .iter()
            .filter_map(|piece| match piece {
                Piece::Text(text) if fold => Some(text.to_uppercase()),
                Piece::Text(text) => Some(text.clone()),
                Piece::Wildcard => None,
            })
            .collect();
        Self {
            literals,
            anchored_start: !matches!(pieces.first(), Some(Piece::Wildcard)),
            anchored_end: !matches!(pieces.last(), Some(Piece::Wildcard)),
            fold,
        }
    }

    fn matches(&self, actual: &str) -> bool {
        let folded;
        let mut rest = if self.fold {
            folded = actual.to_uppercase();
            folded.as_str()
        } else {
            actual
        };

        let last = self.literals.len().saturating_sub(1);
        for (i, literal) in self.literals.iter().enumerate() {
            if i == 0 && self.anchored_start {
                match rest.strip_prefix(literal.as_str()) {
                    Some(tail) => rest = tail,
                    None => return false,
                }
            } else if i == last && self.anchored_end {
                return rest.ends_with(literal.as_str());
            } else {
                match rest.find(literal.as_str()) {
                    Some(at) => rest = &rest[at + literal.len()..],
                    None => return false,
                }
            }
        }
        !self.anchored_end || rest.is_empty()
    }
}
