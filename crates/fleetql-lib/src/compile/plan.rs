//! Backend-neutral lowering of a bound filter.
//!
//! Every comparison becomes a [`Check`]: a positive test on single values
//! plus a [`Quantifier`] saying how the test combines over the values a field
//! has. Both backends interpret the same plan, which keeps their semantics in
//! lockstep. The compiler generation only affects the quantifier chosen for
//! negations on joined paths.

use super::invariants::ensure_single_value;
use crate::bind::{BoundComparison, BoundNode, BoundOp, BoundValue, FieldRef};
use crate::config::Generation;
use crate::parser::Piece;

#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Check(Check),
    And(Box<Plan>, Box<Plan>),
    Or(Box<Plan>, Box<Plan>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub field: FieldRef,
    pub test: Test,
    pub quantifier: Quantifier,
}

/// Positive test on one value.
#[derive(Debug, Clone, PartialEq)]
pub enum Test {
    /// The value is not null.
    Present,
    Eq(BoundValue),
    Like(Vec<Piece>),
    Order(Order, BoundValue),
    In(Vec<BoundValue>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Gt,
    Ge,
    Lt,
    Le,
}

impl Order {
    /// Complement for non-null operands: `not (a > b)` is `a <= b`.
    pub fn complement(self) -> Self {
        match self {
            Order::Gt => Order::Le,
            Order::Ge => Order::Lt,
            Order::Lt => Order::Ge,
            Order::Le => Order::Gt,
        }
    }

    pub fn holds(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Order::Gt => ordering == Greater,
            Order::Ge => ordering != Less,
            Order::Lt => ordering == Less,
            Order::Le => ordering != Greater,
        }
    }
}

/// How a test combines over the values of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// Own column: the value is present and passes.
    Holds,
    /// Own column: the value is absent, or present and fails.
    NullOrFails,
    /// Joined rows: some row passes.
    Any,
    /// Joined rows: no row passes.
    NoneHold,
    /// Joined rows: there is no row with a value, or some row fails.
    EmptyOrAnyFails,
}

pub fn plan(node: &BoundNode, generation: Generation) -> Plan {
    match node {
        BoundNode::Comparison(c) => plan_comparison(c, generation),
        BoundNode::And(l, r) => Plan::And(
            Box::new(plan(l, generation)),
            Box::new(plan(r, generation)),
        ),
        BoundNode::Or(l, r) => Plan::Or(
            Box::new(plan(l, generation)),
            Box::new(plan(r, generation)),
        ),
    }
}

fn plan_comparison(c: &BoundComparison, generation: Generation) -> Plan {
    // `field==''` means null or empty, `field!=''` neither.
    if let [BoundValue::Text(text)] = c.values.as_slice()
        && text.is_empty()
    {
        let null_check = |op| BoundComparison {
            field: c.field.clone(),
            op,
            values: Vec::new(),
        };
        let empty_check = |op| BoundComparison {
            field: c.field.clone(),
            op,
            values: vec![BoundValue::Text(String::new())],
        };
        match c.op {
            BoundOp::Eq => {
                return Plan::Or(
                    Box::new(check(&null_check(BoundOp::IsNull), generation)),
                    Box::new(check(&empty_check(BoundOp::Eq), generation)),
                );
            }
            BoundOp::Ne => {
                return Plan::And(
                    Box::new(check(&null_check(BoundOp::IsNotNull), generation)),
                    Box::new(check(&empty_check(BoundOp::Ne), generation)),
                );
            }
            _ => {}
        }
    }
    check(c, generation)
}

fn check(c: &BoundComparison, generation: Generation) -> Plan {
    // A null check tests presence: `=is=null` is its negation.
    let negated = match c.op {
        BoundOp::IsNull => true,
        BoundOp::IsNotNull => false,
        op => op.is_negated(),
    };
    let test = match c.op.positive() {
        BoundOp::IsNull => Test::Present,
        BoundOp::Eq => match ensure_single_value(c) {
            BoundValue::Pattern(pieces) => Test::Like(pieces.clone()),
            value => Test::Eq(value.clone()),
        },
        BoundOp::In => Test::In(c.values.clone()),
        BoundOp::Gt => Test::Order(Order::Gt, ensure_single_value(c).clone()),
        BoundOp::Ge => Test::Order(Order::Ge, ensure_single_value(c).clone()),
        BoundOp::Lt => Test::Order(Order::Lt, ensure_single_value(c).clone()),
        _ => Test::Order(Order::Le, ensure_single_value(c).clone()),
    };

    Plan::Check(Check {
        field: c.field.clone(),
        quantifier: quantifier(&c.field, &test, negated, generation),
        test,
    })
}

fn quantifier(field: &FieldRef, test: &Test, negated: bool, generation: Generation) -> Quantifier {
    match (field.is_joined(), negated) {
        (false, false) => Quantifier::Holds,
        (false, true) => Quantifier::NullOrFails,
        (true, false) => Quantifier::Any,
        // Absence is not a "differing value", so null checks ignore the generation.
        (true, true) if *test == Test::Present => Quantifier::NoneHold,
        (true, true) => match generation {
            Generation::Current => Quantifier::NoneHold,
            Generation::Legacy => Quantifier::EmptyOrAnyFails,
        },
    }
}
