//! Entry points for callers holding filter text.
//!
//! Every operation runs the same pipeline: macro expansion, parsing, binding
//! against a catalog and, for the compile operations, predicate compilation.
//! Error ranges refer to the text after macro expansion.

use fleetql_core::FieldCatalog;

use crate::FilterError;
use crate::bind::{BoundNode, bind};
use crate::compile::{Database, Matcher, PredicateCompiler, StorePredicate};
use crate::config::EngineConfig;
use crate::macros::{MacroSource, NoMacros, TimestampMacros};
use crate::parser::{RawNode, parse_with_config};
use crate::printer::print;

pub use crate::oracle::{ValidationOracleContext, suggest, suggest_with_config};

/// Compile filter text into a predicate for a relational store.
pub fn compile_for_store(
    text: &str,
    catalog: &FieldCatalog,
    macros: &dyn MacroSource,
    database: Database,
    config: &EngineConfig,
) -> Result<StorePredicate, FilterError> {
    let filter = Filter::parse_with_macros(text, macros, config)?;
    Ok(filter.bind(catalog)?.to_store(database))
}

/// Compile filter text into an in-memory matcher.
pub fn compile_matcher(
    text: &str,
    catalog: &FieldCatalog,
    macros: &dyn MacroSource,
    config: &EngineConfig,
) -> Result<Matcher, FilterError> {
    let filter = Filter::parse_with_macros(text, macros, config)?;
    Ok(filter.bind(catalog)?.to_matcher())
}

/// Check filter text against a catalog without compiling it.
///
/// The timestamp macros are expanded from `config.polling`, so filters
/// written against `${NOW_TS}` and `${OVERDUE_TS}` validate as they would
/// compile.
pub fn validate(text: &str, catalog: &FieldCatalog, config: &EngineConfig) -> Result<(), FilterError> {
    let macros = TimestampMacros::new(config.polling);
    Filter::parse_with_macros(text, &macros, config)?.bind(catalog)?;
    Ok(())
}

/// Parsed filter, not yet bound to a catalog.
#[derive(Debug, Clone)]
pub struct Filter {
    text: String,
    raw: RawNode,
    config: EngineConfig,
}

impl Filter {
    /// Parse without macro expansion: `${NAME}` stays literal text.
    pub fn parse(text: &str, config: &EngineConfig) -> Result<Self, FilterError> {
        Self::parse_with_macros(text, &NoMacros, config)
    }

    pub fn parse_with_macros(
        text: &str,
        macros: &dyn MacroSource,
        config: &EngineConfig,
    ) -> Result<Self, FilterError> {
        let text = crate::macros::resolve(text, macros);
        let raw = parse_with_config(&text, config)?;
        Ok(Self {
            text,
            raw,
            config: config.clone(),
        })
    }

    /// Filter text after macro expansion.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn raw(&self) -> &RawNode {
        &self.raw
    }

    pub fn bind<'c>(&self, catalog: &'c FieldCatalog) -> Result<BoundFilter<'c>, FilterError> {
        let node = bind(&self.raw, catalog, &self.config)
            .map_err(|err| FilterError::Field(err.with_source(&self.text)))?;
        Ok(BoundFilter {
            node,
            catalog,
            config: self.config.clone(),
        })
    }
}

/// Filter bound to a catalog, ready to print or compile.
#[derive(Debug, Clone)]
pub struct BoundFilter<'c> {
    node: BoundNode,
    catalog: &'c FieldCatalog,
    config: EngineConfig,
}

impl BoundFilter<'_> {
    pub fn node(&self) -> &BoundNode {
        &self.node
    }

    pub fn catalog(&self) -> &FieldCatalog {
        self.catalog
    }

    pub fn print(&self) -> String {
        print(&self.node)
    }

    /// Memoization key: filters with equal keys compile to equal predicates
    /// for the same catalog and configuration.
    pub fn cache_key(&self) -> String {
        self.print()
    }

    pub fn to_store(&self, database: Database) -> StorePredicate {
        self.compiler().compile_store(&self.node, database)
    }

    pub fn to_matcher(&self) -> Matcher {
        self.compiler().compile_matcher(&self.node)
    }

    fn compiler(&self) -> PredicateCompiler<'_> {
        PredicateCompiler::new(self.catalog, &self.config)
    }
}
