use super::*;
use crate::bind::{BoundValue, bind};
use crate::parser::parse;
use crate::test_support::devices;

fn plan_with(text: &str, generation: Generation) -> Plan {
    let catalog = devices();
    let config = EngineConfig::default().with_generation(generation);
    let bound = bind(&parse(text).unwrap(), &catalog, &config).unwrap();
    PredicateCompiler::new(&catalog, &config).plan(&bound)
}

fn check(text: &str, generation: Generation) -> Check {
    match plan_with(text, generation) {
        Plan::Check(check) => check,
        other => panic!("expected a single check, got {other:?}"),
    }
}

fn quantifier(text: &str, generation: Generation) -> Quantifier {
    check(text, generation).quantifier
}

#[test]
fn own_columns() {
    for generation in [Generation::Current, Generation::Legacy] {
        assert_eq!(quantifier("name==a", generation), Quantifier::Holds);
        assert_eq!(quantifier("name!=a", generation), Quantifier::NullOrFails);
        assert_eq!(quantifier("name=out=(a)", generation), Quantifier::NullOrFails);
        assert_eq!(quantifier("name=not=null", generation), Quantifier::Holds);
        assert_eq!(quantifier("name=is=null", generation), Quantifier::NullOrFails);
    }
}

#[test]
fn joined_paths() {
    assert_eq!(quantifier("tag==a", Generation::Current), Quantifier::Any);
    assert_eq!(quantifier("tag==a", Generation::Legacy), Quantifier::Any);
    assert_eq!(quantifier("tag!=a", Generation::Current), Quantifier::NoneHold);
    assert_eq!(quantifier("tag!=a", Generation::Legacy), Quantifier::EmptyOrAnyFails);
    assert_eq!(quantifier("meta.k=out=(a,b)", Generation::Legacy), Quantifier::EmptyOrAnyFails);
    assert_eq!(quantifier("group.name!=a", Generation::Current), Quantifier::NoneHold);
}

#[test]
fn null_checks_on_joined_paths_ignore_generation() {
    for generation in [Generation::Current, Generation::Legacy] {
        assert_eq!(quantifier("tag=is=null", generation), Quantifier::NoneHold);
        assert_eq!(quantifier("tag=not=null", generation), Quantifier::Any);
    }
}

#[test]
fn tests_are_positive() {
    assert_eq!(
        check("name!=a", Generation::Current).test,
        Test::Eq(BoundValue::Text("a".to_string()))
    );
    assert!(matches!(check("name!=a*", Generation::Current).test, Test::Like(_)));
    assert_eq!(
        check("id=lt=3", Generation::Current).test,
        Test::Order(Order::Lt, BoundValue::Integer(3))
    );
    assert_eq!(check("tag=is=null", Generation::Current).test, Test::Present);
}

#[test]
fn empty_string_expands() {
    let Plan::Or(null, empty) = plan_with("name==''", Generation::Current) else {
        panic!("expected a disjunction");
    };
    assert!(matches!(*null, Plan::Check(Check { test: Test::Present, quantifier: Quantifier::NullOrFails, .. })));
    assert!(matches!(*empty, Plan::Check(Check { quantifier: Quantifier::Holds, .. })));

    let Plan::And(present, differs) = plan_with("name!=''", Generation::Current) else {
        panic!("expected a conjunction");
    };
    assert!(matches!(*present, Plan::Check(Check { test: Test::Present, quantifier: Quantifier::Holds, .. })));
    assert!(matches!(*differs, Plan::Check(Check { quantifier: Quantifier::NullOrFails, .. })));

    // Only equality is rewritten.
    let config = EngineConfig::default().with_lexicographic_ordering(true);
    let catalog = devices();
    let bound = bind(&parse("name=gt=''").unwrap(), &catalog, &config).unwrap();
    assert!(matches!(
        PredicateCompiler::new(&catalog, &config).plan(&bound),
        Plan::Check(_)
    ));
}

#[test]
fn order_complement() {
    use std::cmp::Ordering::*;
    for order in [Order::Gt, Order::Ge, Order::Lt, Order::Le] {
        for ordering in [Less, Equal, Greater] {
            assert_ne!(order.holds(ordering), order.complement().holds(ordering));
        }
    }
}
