//! Suggestion and validation oracle for interactive filter authoring.
//!
//! The text before the cursor is split into the partial token being typed
//! and everything before it. The parser runs in tolerant mode over the
//! latter and reports what it expected next; candidates for that expectation
//! are filtered by the partial token. The oracle never fails: malformed text
//! degrades to whatever the parser could still make sense of.


use fleetql_core::utils::{canonical_name, starts_with_ignore_case};
use fleetql_core::{FieldCatalog, FieldDescriptor};
use rowan::{TextRange, TextSize};

use crate::bind::resolve_path;
use crate::config::EngineConfig;
use crate::parser::lexer::{Token, lex, token_text};
use crate::parser::{ComparisonOp, Expectation, SyntaxKind, parse_tree};

/// Comparison operators offered after a field, in suggestion order.
pub const OPERATORS: [&str; 10] = [
    "!=", "==", "=ge=", "=gt=", "=in=", "=is=", "=le=", "=lt=", "=not=", "=out=",
];

pub const CONNECTORS: [&str; 2] = ["and", "or"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SuggestKind {
    Field,
    SubField,
    /// `.` after a field that needs a sub-path.
    Dot,
    Operator,
    Value,
    Connector,
}

impl SuggestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SuggestKind::Field => "field",
            SuggestKind::SubField => "sub-field",
            SuggestKind::Dot => "dot",
            SuggestKind::Operator => "operator",
            SuggestKind::Value => "value",
            SuggestKind::Connector => "connector",
        }
    }
}

/// One completion candidate. Accepting it replaces `range` with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestToken {
    pub text: String,
    pub kind: SuggestKind,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOracleContext {
    /// Byte offset the suggestions apply to.
    pub cursor: usize,
    /// Token being typed at the cursor; empty after a delimiter or whitespace.
    pub partial: String,
    pub partial_range: TextRange,
    /// Sorted by text, without duplicates.
    pub suggestions: Vec<SuggestToken>,
    /// The full text is not a well-formed filter.
    pub syntax_error: bool,
    /// Why the full text is rejected, syntax or field error alike.
    pub error: Option<String>,
}

impl ValidationOracleContext {
    pub fn texts(&self) -> Vec<&str> {
        self.suggestions.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Suggest completions at `cursor` (a byte offset; negative or past the end
/// means the end of the text).
pub fn suggest(text: &str, cursor: i64, catalog: &FieldCatalog) -> ValidationOracleContext {
    suggest_with_config(text, cursor, catalog, &EngineConfig::default())
}

pub fn suggest_with_config(
    text: &str,
    cursor: i64,
    catalog: &FieldCatalog,
    config: &EngineConfig,
) -> ValidationOracleContext {
    let cursor = clamp_cursor(text, cursor);
    let before = &text[..cursor];
    let partial_range = partial_range(before, &lex(before));
    let partial = &before[usize::from(partial_range.start())..];

    let expectation = parse_tree(&before[..usize::from(partial_range.start())], config).expectation;
    let mut suggestions = Suggestions {
        catalog,
        partial,
        range: partial_range,
        out: Vec::new(),
    };
    suggestions.for_expectation(&expectation);

    let mut suggestions = suggestions.out;
    suggestions.sort_by(|a, b| a.text.cmp(&b.text).then(a.kind.cmp(&b.kind)));
    suggestions.dedup_by(|a, b| a.text == b.text);

    let validation = crate::query::validate(text, catalog, config);
    tracing::debug!(
        cursor,
        partial,
        expectation = ?expectation,
        suggestions = suggestions.len(),
        "suggest"
    );

    ValidationOracleContext {
        cursor,
        partial: partial.to_string(),
        partial_range,
        suggestions,
        syntax_error: validation.as_ref().is_err_and(|e| e.is_syntax()),
        error: validation.err().map(|e| e.message().to_string()),
    }
}

fn clamp_cursor(text: &str, cursor: i64) -> usize {
    let mut cursor = usize::try_from(cursor)
        .ok()
        .filter(|&c| c <= text.len())
        .unwrap_or(text.len());
    while !text.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

/// Range of the token touching the end of `before`. Empty when the text ends
/// in whitespace or a delimiter.
fn partial_range(before: &str, tokens: &[Token]) -> TextRange {
    let end = TextSize::of(before);
    let empty = TextRange::empty(end);
    let Some((last, rest)) = tokens.split_last() else {
        return empty;
    };
    if last.span.end() != end {
        return empty;
    }

    match last.kind {
        SyntaxKind::Bareword | SyntaxKind::KwAnd | SyntaxKind::KwOr => {
            // `name=g` lexes as `=` garbage followed by a word.
            match rest.last() {
                Some(prev)
                    if prev.kind == SyntaxKind::Garbage && prev.span.end() == last.span.start() =>
                {
                    prev.span.cover(last.span)
                }
                _ => last.span,
            }
        }
        // A known operator is complete; values come next.
        SyntaxKind::Comparator if ComparisonOp::from_token(token_text(before, last)).is_some() => {
            empty
        }
        SyntaxKind::Garbage | SyntaxKind::Comparator => last.span,
        _ => empty,
    }
}

struct Suggestions<'a> {
    catalog: &'a FieldCatalog,
    partial: &'a str,
    range: TextRange,
    out: Vec<SuggestToken>,
}

impl Suggestions<'_> {
    fn push(&mut self, text: impl Into<String>, kind: SuggestKind, range: TextRange) {
        self.out.push(SuggestToken {
            text: text.into(),
            kind,
            range,
        });
    }

    fn for_expectation(&mut self, expectation: &Expectation) {
        match expectation {
            Expectation::Field => self.fields(),
            Expectation::Operator { .. } => self.operators(self.partial, self.range),
            Expectation::Value { field, .. } => self.values(field),
            Expectation::Connector => {
                for connector in CONNECTORS {
                    if starts_with_ignore_case(connector, self.partial) {
                        self.push(connector, SuggestKind::Connector, self.range);
                    }
                }
            }
            Expectation::Nothing => {}
        }
    }

    fn operators(&mut self, prefix: &str, range: TextRange) {
        for op in OPERATORS {
            if starts_with_ignore_case(op, prefix) {
                self.push(op, SuggestKind::Operator, range);
            }
        }
    }

    fn fields(&mut self) {
        let partial = self.partial;
        if let Some((parent, child)) = partial.rsplit_once('.') {
            return self.sub_fields(parent, child);
        }

        if let Some(field) = self.catalog.get(partial) {
            if field.usable_bare() {
                // A complete field: continue with its operator.
                let at = TextRange::empty(self.range.end());
                return self.operators("", at);
            }
            self.push(format!("{partial}."), SuggestKind::Dot, self.range);
        }

        let catalog = self.catalog;
        for name in catalog.names() {
            if starts_with_ignore_case(name, partial) {
                self.push(name, SuggestKind::Field, self.range);
            }
        }
    }

    /// Children of `parent` starting with `child`. Map keys are open, so maps
    /// suggest nothing.
    fn sub_fields(&mut self, parent: &str, child: &str) {
        let segments: Vec<String> = partial_segments(parent);
        if segments.iter().any(String::is_empty) {
            return;
        }

        let full: Vec<String> = segments.iter().cloned().chain([child.to_string()]).collect();
        if !child.is_empty() && resolve_path(self.catalog, &full).is_ok() {
            let at = TextRange::empty(self.range.end());
            return self.operators("", at);
        }

        let Some(sub) = descend(self.catalog, &segments) else {
            return;
        };
        for name in sub.names() {
            if starts_with_ignore_case(name, child) {
                self.push(format!("{parent}.{name}"), SuggestKind::SubField, self.range);
            }
        }
    }

    fn values(&mut self, field: &str) {
        let Ok(field) = resolve_path(self.catalog, &partial_segments(field)) else {
            return;
        };
        let leaf = field.leaf();
        for value in leaf.enum_values() {
            if starts_with_ignore_case(value, self.partial) {
                self.push(value.clone(), SuggestKind::Value, self.range);
            }
        }
    }
}

fn partial_segments(path: &str) -> Vec<String> {
    path.split('.').map(str::to_string).collect()
}

/// Sub-catalog reached by following `segments` through sub-entities and collections.
fn descend<'c>(catalog: &'c FieldCatalog, segments: &[String]) -> Option<&'c FieldCatalog> {
    let mut current = catalog;
    for segment in segments {
        let field: &FieldDescriptor = current.get(segment)?;
        current = field.sub_catalog()?;
    }
    tracing::trace!(path = %canonical_name(&segments.join(".")), "sub-field suggestions");
    Some(current)
}
