//! Token and node kinds of the filter syntax tree.
//!
//! One enum covers both: the variants carrying `#[token]`/`#[regex]`
//! attributes are what the lexer produces, the rest are built by the parser.

use logos::Logos;
use rowan::Language;

/// Discriminants are contiguous from zero up to `__LAST`, which
/// `kind_from_raw` relies on.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    /// Conjunction shorthand.
    #[token(";")]
    Semicolon,

    /// Disjunction shorthand, or separator inside a value list.
    #[token(",")]
    Comma,

    /// `and`, or `&&` as printed in canonical form.
    #[token("and", ignore(case))]
    #[token("&&")]
    KwAnd,

    #[token("or", ignore(case))]
    #[token("||")]
    KwOr,

    /// `==`, `=gt=`, `!=`, `<=` ... Unknown `=name=` spellings are rejected by the parser.
    #[regex(r"=[a-zA-Z]*=")]
    #[token("!=")]
    #[token("<")]
    #[token("<=")]
    #[token(">")]
    #[token(">=")]
    Comparator,

    /// Quoted literal including its quotes.
    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    #[regex(r"'(?:[^'\\]|\\.)*'")]
    Str,

    /// Field path or unquoted literal. A backslash escapes the next character.
    #[regex(r#"(?:[^ \t\r\n\f'"();,=!<>\\]|\\.)+"#)]
    Bareword,

    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    /// Run of characters no token accepts.
    Garbage,
    Error,

    // nodes
    Root,
    Or,
    And,
    Group,
    Comparison,
    FieldPath,
    ValueList,
    Value,

    // keep last
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterLang {}

impl Language for FilterLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16, "raw kind {} out of range", raw.0);
        // SAFETY: in range, and SyntaxKind is a fieldless repr(u16) enum
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<FilterLang>;
pub type SyntaxToken = rowan::SyntaxToken<FilterLang>;

/// Set of token kinds, one bit per kind. Only token kinds fit.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 64, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn single(kind: SyntaxKind) -> Self {
        let kind = kind as u16;
        assert!(kind < 64, "SyntaxKind value exceeds TokenSet capacity");
        TokenSet(1 << kind)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 64 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for i in 0..64u16 {
            if self.0 & (1 << i) != 0 && i < __LAST as u16 {
                let kind: SyntaxKind = unsafe { std::mem::transmute(i) };
                list.entry(&kind);
            }
        }
        list.finish()
    }
}

/// Lookahead and recovery sets used by the grammar.
pub mod token_sets {
    use super::*;

    /// Tokens that can stand as a literal value. Keywords are plain words in value position.
    pub const VALUE_FIRST: TokenSet = TokenSet::new(&[Bareword, Str, KwAnd, KwOr]);

    pub const PRIMARY_FIRST: TokenSet = TokenSet::new(&[ParenOpen, Bareword]);

    pub const AND_CONNECTORS: TokenSet = TokenSet::new(&[Semicolon, KwAnd]);

    pub const OR_CONNECTORS: TokenSet = TokenSet::new(&[Comma, KwOr]);

    pub const CONNECTORS: TokenSet = AND_CONNECTORS.union(OR_CONNECTORS);

    /// Where a broken comparison stops swallowing tokens.
    pub const COMPARISON_RECOVERY: TokenSet = CONNECTORS.union(TokenSet::single(ParenClose));

    pub const GROUP_RECOVERY: TokenSet = TokenSet::single(ParenClose);

    /// Tokens that end a value list, recovering from a missing `,`.
    pub const LIST_RECOVERY: TokenSet = TokenSet::new(&[ParenClose, Semicolon, KwAnd, KwOr]);
}
