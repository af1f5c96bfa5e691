//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use fleetql_core::{FieldCatalog, FieldDescriptor};

use super::store::Join;
use crate::bind::{BoundComparison, BoundValue};

/// The binder gives every comparison except null checks and lists exactly one value.
pub(super) fn ensure_single_value(c: &BoundComparison) -> &BoundValue {
    match c.values.as_slice() {
        [value] => value,
        values => panic!(
            "broken binder invariant: `{}` on `{}` has {} values, expected one",
            c.op,
            c.field.path(),
            values.len()
        ),
    }
}

/// Fields a path descends through always carry a sub-catalog.
pub(super) fn ensure_sub_catalog(descriptor: &FieldDescriptor) -> &FieldCatalog {
    descriptor.sub_catalog().unwrap_or_else(|| {
        panic!(
            "broken catalog invariant: `{}` is traversed but has no sub-catalog",
            descriptor.name()
        )
    })
}

/// The last field of a bound path is a leaf column or a map.
pub(super) fn ensure_column(descriptor: &FieldDescriptor) -> &str {
    descriptor.column().unwrap_or_else(|| {
        panic!(
            "broken binder invariant: `{}` ends a path but has no column",
            descriptor.name()
        )
    })
}

/// Only sub-entities and collections sit in the middle of a path.
pub(super) fn untraversable(descriptor: &FieldDescriptor) -> ! {
    panic!(
        "broken binder invariant: `{}` sits inside a path but cannot be traversed",
        descriptor.name()
    )
}

/// Row quantifiers only apply to paths that join at least one table.
pub(super) fn ensure_joined(sources: &[Join]) -> (&Join, &[Join]) {
    sources
        .split_first()
        .unwrap_or_else(|| panic!("broken compiler invariant: row quantifier on an own column"))
}
