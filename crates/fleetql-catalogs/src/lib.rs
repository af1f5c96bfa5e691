#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Built-in field catalogs, one per filterable entity type.
//!
//! Each catalog is built on first use and shared for the rest of the
//! process. Entity types are gated behind `entity-*` features.

use std::sync::Arc;

use fleetql_core::FieldCatalog;

pub mod builtin;

#[cfg(test)]
mod lib_tests;

pub use builtin::*;

/// Shared, immutable catalog handle.
pub type Catalog = Arc<FieldCatalog>;
