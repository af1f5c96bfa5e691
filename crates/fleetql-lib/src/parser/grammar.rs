//! Grammar productions for the filter language.
//!
//! This module implements all `parse_*` methods as an extension of `Parser`.
//! Conjunction binds tighter than disjunction:
//!
//! ```text
//! filter     := or_expr EOF
//! or_expr    := and_expr ((',' | OR) and_expr)*
//! and_expr   := primary  ((';' | AND) primary)*
//! primary    := '(' or_expr ')' | comparison
//! comparison := FIELD COMPARATOR arguments
//! arguments  := '(' value (',' value)* ')' | value
//! value      := Bareword | String | AND | OR
//! ```
//!
//! Binary nodes are built left-associative by wrapping at a checkpoint.

use rowan::TextRange;

use super::core::{Expectation, Parser};
use super::cst::token_sets::{
    AND_CONNECTORS, COMPARISON_RECOVERY, GROUP_RECOVERY, OR_CONNECTORS, VALUE_FIRST,
};
use super::cst::{SyntaxKind, TokenSet};
use super::lexer::is_unterminated_string;
use super::raw::ComparisonOp;
use crate::diagnostics::DiagnosticKind;

impl Parser<'_> {
    pub fn parse_root(&mut self) {
        self.start_node(SyntaxKind::Root);

        if self.should_stop() {
            let range = TextRange::new(0.into(), self.eof_offset());
            self.error_span(DiagnosticKind::EmptyFilter, range);
        } else {
            self.parse_or_expr();
            if !self.should_stop() {
                self.parse_trailing();
            }
        }

        self.eat_trivia();
        self.finish_node();
    }

    /// Anything left after a complete expression.
    fn parse_trailing(&mut self) {
        if self.currently_is(SyntaxKind::ParenClose) {
            self.error_msg(DiagnosticKind::UnexpectedToken, "unmatched `)`");
        } else {
            self.error_msg(
                DiagnosticKind::UnexpectedToken,
                "expected `;`, `,`, `and` or `or` between comparisons",
            );
        }
        self.start_node(SyntaxKind::Error);
        while !self.should_stop() {
            self.bump();
        }
        self.finish_node();
    }

    fn parse_or_expr(&mut self) {
        self.parse_binary(SyntaxKind::Or, OR_CONNECTORS, Self::parse_and_expr);
    }

    fn parse_and_expr(&mut self) {
        self.parse_binary(SyntaxKind::And, AND_CONNECTORS, Self::parse_primary);
    }

    fn parse_binary(&mut self, kind: SyntaxKind, connectors: TokenSet, operand: fn(&mut Self)) {
        let checkpoint = self.checkpoint();
        operand(self);

        while !self.has_fatal_error() && self.currently_is_one_of(connectors) {
            self.start_node_at(checkpoint, kind);
            self.bump();
            operand(self);
            self.finish_node();
        }
    }

    fn parse_primary(&mut self) {
        self.expectation = Expectation::Field;

        match self.current() {
            SyntaxKind::ParenOpen => self.parse_group(),
            SyntaxKind::Bareword => self.parse_comparison(),
            _ if self.eof() => self.error(DiagnosticKind::ExpectedField),
            SyntaxKind::Garbage if self.at_unterminated_string() => {
                self.error_and_bump(DiagnosticKind::UnterminatedString)
            }
            _ => {
                let message = format!("found `{}`", self.current_text());
                self.error_recover(DiagnosticKind::ExpectedField, &message, COMPARISON_RECOVERY);
            }
        }
    }

    /// `( or_expr )`
    fn parse_group(&mut self) {
        if !self.enter_recursion() {
            self.start_node(SyntaxKind::Error);
            while !self.should_stop() {
                self.bump();
            }
            self.finish_node();
            return;
        }

        self.start_node(SyntaxKind::Group);
        let open = self.current_span();
        self.bump();

        self.parse_or_expr();

        if !self.has_fatal_error() {
            self.close_group(open);
        }

        self.finish_node();
        self.exit_recursion();
    }

    fn close_group(&mut self, open: TextRange) {
        if self.eat_token(SyntaxKind::ParenClose) {
            self.expectation = Expectation::Connector;
            return;
        }

        if self.eof() {
            self.error_unclosed_delimiter(
                DiagnosticKind::UnclosedGroup,
                "filter ends inside a group",
                "group starts here",
                open,
            );
            return;
        }

        self.error_recover(
            DiagnosticKind::UnexpectedToken,
            "expected `)`, `;`, `,`, `and` or `or`",
            GROUP_RECOVERY,
        );
        if self.eat_token(SyntaxKind::ParenClose) {
            self.expectation = Expectation::Connector;
        } else {
            self.error_unclosed_delimiter(
                DiagnosticKind::UnclosedGroup,
                "filter ends inside a group",
                "group starts here",
                open,
            );
        }
    }

    /// `FIELD COMPARATOR arguments`
    fn parse_comparison(&mut self) {
        if !self.enter_comparison() {
            return;
        }
        self.start_node(SyntaxKind::Comparison);

        let field_span = self.current_span();
        let field = self.current_text();
        self.start_node(SyntaxKind::FieldPath);
        self.bump();
        self.finish_node();
        self.validate_field_path(field, field_span);

        self.expectation = Expectation::Operator {
            field: field.to_string(),
        };

        let op = match self.current() {
            SyntaxKind::Comparator => {
                let span = self.current_span();
                let text = self.current_text();
                let op = ComparisonOp::from_token(text);
                if op.is_none() {
                    self.unknown_operator(span, text);
                }
                self.bump();
                op
            }
            _ if self.eof() => {
                self.error(DiagnosticKind::ExpectedOperator);
                self.finish_node();
                return;
            }
            SyntaxKind::Garbage if !self.at_unterminated_string() => {
                let (span, text) = (self.current_span(), self.current_text());
                self.unknown_operator(span, text);
                self.bump_as_error();
                self.finish_node();
                return;
            }
            _ => {
                let message = format!("found `{}` after `{field}`", self.current_text());
                self.error_msg(DiagnosticKind::ExpectedOperator, message);
                self.finish_node();
                return;
            }
        };

        self.expectation = Expectation::Value {
            field: field.to_string(),
            op,
        };

        if self.parse_arguments() {
            self.expectation = Expectation::Connector;
        }

        self.finish_node();
    }

    fn validate_field_path(&mut self, field: &str, span: TextRange) {
        let segments = field.split('.');
        let problem = if segments.clone().any(str::is_empty) {
            "empty segment"
        } else if segments.clone().any(|s| s.contains('*')) {
            "wildcard"
        } else if segments.clone().any(|s| s.contains('\\')) {
            "escape sequence"
        } else {
            return;
        };
        self.error_at(
            DiagnosticKind::MalformedFieldPath,
            span,
            format!("{problem} in `{field}`"),
        );
    }

    /// Single value or parenthesized list. Returns `false` on error.
    fn parse_arguments(&mut self) -> bool {
        match self.current() {
            SyntaxKind::ParenOpen => self.parse_value_list(),
            kind if VALUE_FIRST.contains(kind) => {
                self.parse_value();
                true
            }
            _ => {
                self.error_expected_value();
                false
            }
        }
    }

    fn parse_value(&mut self) {
        self.start_node(SyntaxKind::Value);
        self.bump();
        self.finish_node();
    }

    fn error_expected_value(&mut self) {
        if self.eof() {
            self.error(DiagnosticKind::ExpectedValue);
        } else if self.at_unterminated_string() {
            self.error_and_bump(DiagnosticKind::UnterminatedString);
        } else {
            let message = format!("found `{}`", self.current_text());
            self.error_msg(DiagnosticKind::ExpectedValue, message);
        }
    }

    /// `( value (, value)* )`
    fn parse_value_list(&mut self) -> bool {
        self.start_node(SyntaxKind::ValueList);
        let open = self.current_span();
        self.bump();

        let ok = self.parse_value_list_items(open);

        self.finish_node();
        ok
    }

    fn parse_value_list_items(&mut self, open: TextRange) -> bool {
        if self.currently_is(SyntaxKind::ParenClose) {
            let range = open.cover(self.current_span());
            self.error_span(DiagnosticKind::EmptyList, range);
            self.bump();
            return false;
        }

        let value_expectation = self.expectation.clone();
        loop {
            self.expectation = value_expectation.clone();
            if !VALUE_FIRST.contains(self.current()) {
                self.error_expected_value();
                self.skip_to_list_end();
                return false;
            }
            self.parse_value();
            self.expectation = Expectation::Nothing;
            if !self.eat_token(SyntaxKind::Comma) {
                break;
            }
        }

        if self.eat_token(SyntaxKind::ParenClose) {
            return true;
        }

        if self.eof() {
            self.error_unclosed_delimiter(
                DiagnosticKind::UnclosedList,
                "filter ends inside a value list",
                "list starts here",
                open,
            );
        } else {
            self.error_msg(DiagnosticKind::UnexpectedToken, "expected `,` or `)` in value list");
            self.skip_to_list_end();
        }
        false
    }

    /// Recovery inside a value list: swallow everything up to and including `)`.
    fn skip_to_list_end(&mut self) {
        if !self.currently_is(SyntaxKind::ParenClose) && !self.should_stop() {
            self.start_node(SyntaxKind::Error);
            while !self.currently_is(SyntaxKind::ParenClose) && !self.should_stop() {
                self.bump();
            }
            self.finish_node();
        }
        self.eat_token(SyntaxKind::ParenClose);
    }

    /// Call after `current()` so `pos` sits past trivia.
    fn at_unterminated_string(&self) -> bool {
        self.tokens
            .get(self.pos)
            .is_some_and(|token| is_unterminated_string(self.source, token))
    }
}
