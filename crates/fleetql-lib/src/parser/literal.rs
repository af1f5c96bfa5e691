//! Literal decoding: quotes, escapes and wildcards.
//!
//! An unescaped `*` is a wildcard in quoted and unquoted literals alike.
//! A backslash makes the next character literal, so `\*` is an asterisk.

use rowan::TextRange;

use super::cst::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// Quoted.
    String,
    Number,
    Bareword,
    /// The unquoted word `null`.
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Text(String),
    Wildcard,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub raw: String,
    pub pieces: Vec<Piece>,
    pub kind: LiteralKind,
    pub span: TextRange,
}

impl Literal {
    pub fn from_token(token_kind: SyntaxKind, raw: &str, span: TextRange) -> Self {
        let quoted = token_kind == SyntaxKind::Str;
        let body = if quoted { unquote(raw) } else { raw };
        let pieces = decode(body);
        let kind = if quoted {
            LiteralKind::String
        } else if raw.eq_ignore_ascii_case("null") {
            LiteralKind::Null
        } else if is_number(raw) {
            LiteralKind::Number
        } else {
            LiteralKind::Bareword
        };
        Self {
            raw: raw.to_string(),
            pieces,
            kind,
            span,
        }
    }

    pub fn has_wildcard(&self) -> bool {
        self.pieces.iter().any(|p| matches!(p, Piece::Wildcard))
    }

    pub fn is_null(&self) -> bool {
        self.kind == LiteralKind::Null
    }

    /// Decoded text with wildcards kept as `*`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Text(text) => out.push_str(text),
                Piece::Wildcard => out.push('*'),
            }
        }
        out
    }
}

fn unquote(raw: &str) -> &str {
    if raw.len() >= 2 {
        &raw[1..raw.len() - 1]
    } else {
        ""
    }
}

pub fn decode(body: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut text = String::new();
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                // A trailing backslash stands for itself.
                text.push(chars.next().unwrap_or('\\'));
            }
            '*' => {
                if !text.is_empty() {
                    pieces.push(Piece::Text(std::mem::take(&mut text)));
                }
                pieces.push(Piece::Wildcard);
            }
            _ => text.push(c),
        }
    }

    if !text.is_empty() || pieces.is_empty() {
        pieces.push(Piece::Text(text));
    }
    pieces
}

fn is_number(raw: &str) -> bool {
    raw.bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
        && raw.bytes().any(|b| b.is_ascii_digit())
        && raw.parse::<f64>().is_ok()
}
