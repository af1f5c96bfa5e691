//! Parser state machine and low-level operations.

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

use super::ast::Root;
use super::cst::{SyntaxKind, SyntaxNode, TokenSet};
use super::lexer::{Token, token_text};
use super::raw::ComparisonOp;
use crate::diagnostics::{DiagnosticKind, DiagnosticMessage, Diagnostics};

/// What the parser was looking for when it last stopped.
///
/// At end of input this names the kind of token that would continue the
/// filter, which is what the suggestion oracle completes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Expectation {
    #[default]
    Field,
    Operator {
        field: String,
    },
    Value {
        field: String,
        op: Option<ComparisonOp>,
    },
    /// A complete comparison or group: `and`/`or` may follow.
    Connector,
    /// Inside a value list, where only `,` or `)` may follow.
    Nothing,
}

#[derive(Debug)]
pub struct ParseResult {
    pub root: Root,
    pub diagnostics: Diagnostics,
    pub expectation: Expectation,
    /// Limit violation that stopped parsing early.
    pub fatal: Option<DiagnosticMessage>,
    pub exec_fuel_consumed: u32,
}

/// Step, depth and comparison limits. `None` means unlimited.
#[derive(Debug, Default, Clone, Copy)]
struct Fuel {
    steps: Option<u32>,
    steps_left: Option<u32>,
    depth: Option<u32>,
    comparisons_left: Option<u32>,
}

impl Fuel {
    fn consumed(&self) -> u32 {
        match (self.steps, self.steps_left) {
            (Some(total), Some(left)) => total.saturating_sub(left),
            _ => 0,
        }
    }

    /// False once the step budget is spent.
    fn burn(&mut self) -> bool {
        match &mut self.steps_left {
            Some(0) => false,
            Some(left) => {
                *left -= 1;
                true
            }
            None => true,
        }
    }
}

/// Builds the green tree token by token. Whitespace is held back and
/// attached in front of whatever node or token comes next.
pub struct Parser<'src> {
    pub(super) source: &'src str,
    pub(super) tokens: Vec<Token>,
    pub(super) pos: usize,
    pending_ws: Vec<Token>,
    builder: GreenNodeBuilder<'static>,
    diagnostics: Diagnostics,
    pub(super) expectation: Expectation,
    depth: u32,
    fuel: Fuel,
    /// One diagnostic per source offset.
    reported_at: Option<TextSize>,
    fatal: Option<DiagnosticMessage>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            pending_ws: Vec::new(),
            builder: GreenNodeBuilder::new(),
            diagnostics: Diagnostics::new(),
            expectation: Expectation::Field,
            depth: 0,
            fuel: Fuel::default(),
            reported_at: None,
            fatal: None,
        }
    }

    pub fn with_exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.fuel.steps = limit;
        self.fuel.steps_left = limit;
        self
    }

    pub fn with_recursion_fuel(mut self, limit: Option<u32>) -> Self {
        self.fuel.depth = limit;
        self
    }

    pub fn with_comparison_fuel(mut self, limit: Option<u32>) -> Self {
        self.fuel.comparisons_left = limit;
        self
    }

    /// Always produces a tree. Limit violations are reported through `fatal`.
    pub fn parse(mut self) -> ParseResult {
        self.parse_root();
        let green: GreenNode = self.builder.finish();
        let root = Root::cast(SyntaxNode::new_root(green)).expect("parser always produces Root");
        ParseResult {
            root,
            diagnostics: self.diagnostics,
            expectation: self.expectation,
            fatal: self.fatal,
            exec_fuel_consumed: self.fuel.consumed(),
        }
    }

    pub(super) fn has_fatal_error(&self) -> bool {
        self.fatal.is_some()
    }

    /// Records the first limit violation. It covers everything from `at` to
    /// the end of input.
    fn set_fatal(&mut self, kind: DiagnosticKind, at: TextRange) {
        if self.fatal.is_none() {
            let range = TextRange::new(at.start(), self.eof_offset());
            self.fatal = Some(DiagnosticMessage::with_default_message(kind, range));
        }
    }

    fn skip_ws(&mut self) {
        while let Some(&token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.pending_ws.push(token);
            self.pos += 1;
        }
    }

    fn flush_ws(&mut self) {
        for token in std::mem::take(&mut self.pending_ws) {
            self.builder.token(token.kind.into(), token_text(self.source, &token));
        }
    }

    pub(super) fn current(&mut self) -> SyntaxKind {
        self.skip_ws();
        self.tokens.get(self.pos).map_or(SyntaxKind::Error, |t| t.kind)
    }

    pub(super) fn current_text(&mut self) -> &'src str {
        self.skip_ws();
        let source = self.source;
        self.tokens
            .get(self.pos)
            .map_or("", |token| token_text(source, token))
    }

    pub(super) fn current_span(&mut self) -> TextRange {
        self.skip_ws();
        match self.tokens.get(self.pos) {
            Some(token) => token.span,
            None => TextRange::empty(self.eof_offset()),
        }
    }

    pub(super) fn eof_offset(&self) -> TextSize {
        TextSize::from(self.source.len() as u32)
    }

    pub(super) fn eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn should_stop(&mut self) -> bool {
        self.skip_ws();
        self.eof() || self.has_fatal_error()
    }

    pub(super) fn currently_is(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(super) fn currently_is_one_of(&mut self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    /// Attach pending whitespace to the node that is currently open.
    pub(super) fn eat_trivia(&mut self) {
        self.skip_ws();
        self.flush_ws();
    }

    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.flush_ws();
        self.builder.start_node(kind.into());
    }

    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    pub(super) fn bump(&mut self) {
        assert!(!self.eof(), "bump called at EOF");
        if !self.fuel.burn() {
            let span = self.tokens[self.pos].span;
            self.set_fatal(DiagnosticKind::FilterTooLarge, span);
        }
        self.flush_ws();
        let token = self.tokens[self.pos];
        self.builder
            .token(token.kind.into(), token_text(self.source, &token));
        self.pos += 1;
    }

    pub(super) fn eat_token(&mut self, kind: SyntaxKind) -> bool {
        let matched = self.currently_is(kind);
        if matched {
            self.bump();
        }
        matched
    }

    pub(super) fn bump_as_error(&mut self) {
        if self.eof() {
            return;
        }
        self.start_node(SyntaxKind::Error);
        self.bump();
        self.finish_node();
    }

    /// Single entry point for parser diagnostics. A second report at the
    /// same offset is dropped, since it is almost always a follow-on error.
    fn report(&mut self, kind: DiagnosticKind, range: TextRange, message: Option<String>) {
        if self.reported_at == Some(range.start()) {
            return;
        }
        self.reported_at = Some(range.start());
        let report = self.diagnostics.report(kind, range);
        match message {
            Some(message) => report.message(message).emit(),
            None => report.emit(),
        }
    }

    pub(super) fn error(&mut self, kind: DiagnosticKind) {
        let range = self.current_span();
        self.report(kind, range, None);
    }

    pub(super) fn error_span(&mut self, kind: DiagnosticKind, range: TextRange) {
        self.report(kind, range, None);
    }

    pub(super) fn error_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let range = self.current_span();
        self.report(kind, range, Some(message.into()));
    }

    pub(super) fn error_at(
        &mut self,
        kind: DiagnosticKind,
        range: TextRange,
        message: impl Into<String>,
    ) {
        self.report(kind, range, Some(message.into()));
    }

    pub(super) fn error_and_bump(&mut self, kind: DiagnosticKind) {
        self.error(kind);
        self.bump_as_error();
    }

    /// Unknown comparator. Common misspellings get a replacement.
    pub(super) fn unknown_operator(&mut self, range: TextRange, text: &str) {
        let Some(op) = operator_fix(text) else {
            self.report(DiagnosticKind::UnknownOperator, range, Some(text.to_owned()));
            return;
        };
        if self.reported_at == Some(range.start()) {
            return;
        }
        self.reported_at = Some(range.start());
        self.diagnostics
            .report(DiagnosticKind::UnknownOperator, range)
            .message(text)
            .fix(format!("use `{op}`"), op)
            .emit();
    }

    /// Report at the current token, then skip up to the next token in
    /// `recovery`. Skipped tokens end up inside one `Error` node.
    pub(super) fn error_recover(&mut self, kind: DiagnosticKind, message: &str, recovery: TokenSet) {
        let skip = !self.currently_is_one_of(recovery) && !self.should_stop();
        if skip {
            self.start_node(SyntaxKind::Error);
        }
        self.error_msg(kind, message);
        if skip {
            while !self.currently_is_one_of(recovery) && !self.should_stop() {
                self.bump();
            }
            self.finish_node();
        }
    }

    pub(super) fn enter_recursion(&mut self) -> bool {
        if self.fuel.depth.is_some_and(|limit| self.depth >= limit) {
            let span = self.current_span();
            self.set_fatal(DiagnosticKind::NestingTooDeep, span);
            return false;
        }
        self.depth += 1;
        true
    }

    /// Counts one comparison. Connector chains nest one tree level per
    /// comparison, so this budget bounds the depth of the lowered tree.
    pub(super) fn enter_comparison(&mut self) -> bool {
        let Some(left) = self.fuel.comparisons_left else {
            return true;
        };
        if left == 0 {
            let span = self.current_span();
            self.set_fatal(DiagnosticKind::FilterTooLarge, span);
            return false;
        }
        self.fuel.comparisons_left = Some(left - 1);
        true
    }

    pub(super) fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Missing `)` or closing quote. The diagnostic spans from the opening
    /// delimiter to the current token, with the opener as related location.
    pub(super) fn error_unclosed_delimiter(
        &mut self,
        kind: DiagnosticKind,
        message: impl Into<String>,
        related_msg: impl Into<String>,
        open_range: TextRange,
    ) {
        let current = self.current_span();
        if self.reported_at == Some(current.start()) {
            return;
        }
        self.reported_at = Some(current.start());
        self.diagnostics
            .report(kind, TextRange::new(open_range.start(), current.end()))
            .message(message)
            .related_to(related_msg, open_range)
            .emit();
    }
}

fn operator_fix(text: &str) -> Option<&'static str> {
    match text.to_ascii_lowercase().as_str() {
        "=" => Some("=="),
        "=lte=" => Some("=le="),
        "=gte=" => Some("=ge="),
        "=neq=" => Some("!="),
        "=nin=" => Some("=out="),
        _ => None,
    }
}
