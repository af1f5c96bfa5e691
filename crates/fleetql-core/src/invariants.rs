//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use std::sync::Arc;

use crate::{FieldCatalog, FieldDescriptor};

impl FieldCatalog {
    /// Lookup of a name the catalog is known to contain, such as a
    /// collection's default field (checked by `CatalogBuilder::build`).
    pub fn ensure_field(&self, name: &str) -> &Arc<FieldDescriptor> {
        self.get(name).unwrap_or_else(|| {
            panic!(
                "FieldCatalog: `{name}` not found in catalog `{}` \
                 (defaults must be validated when the catalog is built)",
                self.entity()
            )
        })
    }
}
