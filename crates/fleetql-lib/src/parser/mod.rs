//! Parser infrastructure for the filter language.
//!
//! # Architecture
//!
//! The parser produces a lossless concrete syntax tree (CST) via Rowan's green tree builder,
//! then lowers it into an owned [`RawNode`] once it is known to be error-free.
//!
//! - Zero-copy lexing: tokens carry spans, text sliced only when building tree nodes
//! - Trivia buffering: whitespace collected, then attached between nodes
//! - Checkpoint-based wrapping: `And`/`Or` nodes wrap their left operand retroactively
//! - Explicit recovery sets: per-production sets determine when to bail vs consume
//!
//! # Recovery Strategy
//!
//! The parser is resilient: it always produces a tree, and records what it expected
//! when it stopped. The suggestion oracle relies on both.
//!
//! Fuel exhaustion (token count, nesting depth) stops parsing immediately and is
//! reported as a fatal error.

pub mod ast;
pub mod cst;
pub mod lexer;
pub mod literal;
pub mod raw;

mod core;
mod dump;
mod grammar;
mod invariants;
mod lower;

#[cfg(test)]
mod lexer_tests;
#[cfg(test)]
mod tests;

pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken};
pub use literal::{Literal, LiteralKind, Piece};
pub use raw::{ComparisonOp, FieldPath, RawComparison, RawNode};

pub use self::core::{Expectation, ParseResult, Parser};
pub use dump::dump_cst;

use crate::config::EngineConfig;
use crate::{Diagnostics, SyntaxError};
use lexer::lex;

/// Parse with the default limits.
pub fn parse(source: &str) -> Result<RawNode, SyntaxError> {
    parse_with_config(source, &EngineConfig::default())
}

pub fn parse_with_config(source: &str, config: &EngineConfig) -> Result<RawNode, SyntaxError> {
    let result = parse_tree(source, config);
    if let Some(fatal) = &result.fatal {
        tracing::debug!(kind = ?fatal.kind(), "parse stopped at limit");
        return Err(SyntaxError::from_message(fatal, source));
    }
    if let Some(first) = result.diagnostics.primary() {
        tracing::debug!(kind = ?first.kind(), errors = result.diagnostics.len(), "parse failed");
        return Err(SyntaxError::from_message(&first, source));
    }
    let raw = lower::lower(&result.root);
    tracing::trace!(comparisons = raw.comparisons().len(), "parsed filter");
    Ok(raw)
}

/// Tolerant parse: always returns a tree with its diagnostics.
pub fn parse_tree(source: &str, config: &EngineConfig) -> ParseResult {
    Parser::new(source, lex(source))
        .with_exec_fuel(Some(config.max_tokens))
        .with_recursion_fuel(Some(config.max_depth))
        .with_comparison_fuel(Some(config.max_comparisons))
        .parse()
}

/// Parse diagnostics rendered against the source, for tools that show every error.
pub fn check(source: &str, config: &EngineConfig) -> Diagnostics {
    let result = parse_tree(source, config);
    let mut diagnostics = result.diagnostics;
    if let Some(fatal) = result.fatal {
        diagnostics
            .report(fatal.kind(), fatal.range())
            .emit();
    }
    diagnostics
}
