//! Lexer for the filter language.
//!
//! Tokens carry only a kind and a span. Runs of unrecognized characters
//! become one `Garbage` token each, and a quote that never closes turns the
//! rest of the input into a single `Garbage` token starting at the quote.

use logos::Logos;
use rowan::TextRange;
use std::ops::Range;

use super::cst::SyntaxKind;

/// Token without its text; see [`token_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

impl Token {
    pub fn new(kind: SyntaxKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

/// Tokens plus the start of the unrecognized run not yet emitted.
struct Sink {
    tokens: Vec<Token>,
    garbage_from: Option<usize>,
}

impl Sink {
    fn push(&mut self, kind: SyntaxKind, range: Range<usize>) {
        let span = TextRange::new((range.start as u32).into(), (range.end as u32).into());
        self.tokens.push(Token::new(kind, span));
    }

    /// Emit the pending unrecognized run as one `Garbage` token ending at `end`.
    fn flush_garbage(&mut self, end: usize) {
        if let Some(start) = self.garbage_from.take()
            && start < end
        {
            self.push(SyntaxKind::Garbage, start..end);
        }
    }
}

pub fn lex(source: &str) -> Vec<Token> {
    let mut sink = Sink {
        tokens: Vec::new(),
        garbage_from: None,
    };
    let mut lexer = SyntaxKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(kind) => {
                sink.flush_garbage(span.start);
                sink.push(kind, span);
            }
            Err(()) if is_open_quote(source, span.start) => {
                sink.flush_garbage(span.start);
                sink.push(SyntaxKind::Garbage, span.start..source.len());
                return sink.tokens;
            }
            Err(()) => {
                sink.garbage_from.get_or_insert(span.start);
            }
        }
    }
    sink.flush_garbage(source.len());
    sink.tokens
}

fn is_open_quote(source: &str, offset: usize) -> bool {
    matches!(source.as_bytes().get(offset), Some(b'"' | b'\''))
}

/// Text of a token, sliced from the source it was lexed from.
pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    &source[Range::<usize>::from(token.span)]
}

/// A `Garbage` token produced by a quote that never closes.
pub fn is_unterminated_string(source: &str, token: &Token) -> bool {
    token.kind == SyntaxKind::Garbage && is_open_quote(source, token.span.start().into())
}
