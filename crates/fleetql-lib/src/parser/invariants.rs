//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

/// Lowering only runs on trees the parser accepted without diagnostics.
#[inline]
pub(super) fn ensure_lowered<T>(node: Option<T>, what: &str) -> T {
    node.unwrap_or_else(|| {
        panic!("broken parser invariant: accepted tree has no {what} (lowering requires a clean parse)")
    })
}
