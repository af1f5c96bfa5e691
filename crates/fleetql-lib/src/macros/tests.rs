use std::collections::HashMap;

use super::*;
use crate::config::PollingConfig;

fn clock() -> FixedClock {
    FixedClock::from_millis(1_700_000_000_000).unwrap()
}

fn timestamps() -> TimestampMacros<FixedClock> {
    let polling = PollingConfig {
        polling_interval_ms: 60_000,
        overdue_interval_ms: 30_000,
    };
    TimestampMacros::with_clock(polling, clock())
}

#[test]
fn expands_known_names() {
    let resolved = resolve("lastControllerRequestAt=lt=${NOW_TS}", &timestamps());
    assert_eq!(resolved, "lastControllerRequestAt=lt=1700000000000");
}

#[test]
fn overdue_subtracts_both_intervals() {
    let resolved = resolve("${OVERDUE_TS}", &timestamps());
    assert_eq!(resolved, "1699999910000");
}

#[test]
fn names_match_case_insensitively() {
    assert_eq!(resolve("${now_ts}", &timestamps()), "1700000000000");

    let mut values = HashMap::new();
    values.insert("Region".to_string(), "eu".to_string());
    assert_eq!(resolve("region==${REGION}", &values), "region==eu");
}

#[test]
fn unknown_names_stay_verbatim() {
    assert_eq!(resolve("a==${MISSING}", &timestamps()), "a==${MISSING}");
    assert_eq!(resolve("a==${NOW_TS}", &NoMacros), "a==${NOW_TS}");
}

#[test]
fn escaped_placeholder_is_unescaped_not_resolved() {
    let resolved = resolve("lastControllerRequestAt=lt=$${NOW_TS}", &timestamps());
    assert_eq!(resolved, "lastControllerRequestAt=lt=${NOW_TS}");
}

#[test]
fn substituted_text_is_not_rescanned() {
    let source = |name: &str| (name == "A").then(|| "${B}".to_string());
    assert_eq!(resolve("${A}", &source), "${B}");
}

#[test]
fn lone_dollars_are_kept() {
    let source = |_: &str| Some("x".to_string());
    assert_eq!(resolve("price==$5", &source), "price==$5");
    assert_eq!(resolve("a==$$", &source), "a==$$");
    assert_eq!(resolve("a==${}", &source), "a==${}");
    assert_eq!(resolve("a==${unclosed", &source), "a==${unclosed");
}

#[test]
fn several_placeholders_in_one_pass() {
    let source = |name: &str| match name {
        "FROM" => Some("1".to_string()),
        "TO" => Some("2".to_string()),
        _ => None,
    };
    let resolved = resolve("a=ge=${from};a=lt=${To};b==$${FROM}", &source);
    assert_eq!(resolved, "a=ge=1;a=lt=2;b==${FROM}");
}

#[test]
fn values_are_read_on_every_call() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let calls = AtomicUsize::new(0);
    let source = |_: &str| Some(calls.fetch_add(1, Ordering::SeqCst).to_string());
    assert_eq!(resolve("${X}", &source), "0");
    assert_eq!(resolve("${X}", &source), "1");
}

#[test]
fn system_clock_is_close_to_now() {
    let macros = TimestampMacros::new(PollingConfig::default());
    let before = chrono::Utc::now().timestamp_millis();
    let now: i64 = macros.lookup(NOW_TS).unwrap().parse().unwrap();
    let after = chrono::Utc::now().timestamp_millis();
    assert!(before <= now && now <= after);
}
