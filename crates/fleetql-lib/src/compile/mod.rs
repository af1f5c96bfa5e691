//! Predicate compilation.
//!
//! A bound filter is first lowered into a backend-neutral [`Plan`], then
//! compiled either into a [`StorePredicate`] for a relational store or into
//! an in-memory [`Matcher`]. The two backends share the lowering, so the
//! compiler [`Generation`] changes both in the same way.

mod invariants;
pub mod matcher;
pub mod plan;
pub mod store;

#[cfg(test)]
mod memdb;
#[cfg(test)]
mod plan_tests;

use fleetql_core::FieldCatalog;

pub use matcher::{FieldValueMap, FieldValues, Matcher};
pub use plan::{Check, Order, Plan, Quantifier, Test};
pub use store::{
    Column, CompareOp, Database, Dialect, Join, Predicate, Source, SqlFragment, SqlValue,
    StorePredicate, Subquery,
};

use crate::bind::BoundNode;
use crate::config::{EngineConfig, Generation};

/// Compiles bound filters for one catalog under one configuration.
#[derive(Debug, Clone, Copy)]
pub struct PredicateCompiler<'a> {
    catalog: &'a FieldCatalog,
    config: &'a EngineConfig,
}

impl<'a> PredicateCompiler<'a> {
    pub fn new(catalog: &'a FieldCatalog, config: &'a EngineConfig) -> Self {
        Self { catalog, config }
    }

    pub fn generation(&self) -> Generation {
        self.config.generation
    }

    pub fn plan(&self, node: &BoundNode) -> Plan {
        plan::plan(node, self.config.generation)
    }

    pub fn compile_store(&self, node: &BoundNode, database: Database) -> StorePredicate {
        let plan = self.plan(node);
        let predicate = store::lower(&plan, self.catalog, self.config.store_folds_case());
        tracing::debug!(
            entity = self.catalog.entity(),
            generation = %self.config.generation,
            database = database.name(),
            "compiled store predicate"
        );
        StorePredicate::new(predicate, database)
    }

    pub fn compile_matcher(&self, node: &BoundNode) -> Matcher {
        let plan = self.plan(node);
        let matcher = Matcher::compile(&plan, self.config.matcher_folds_case());
        tracing::debug!(
            entity = self.catalog.entity(),
            generation = %self.config.generation,
            "compiled matcher"
        );
        matcher
    }
}
