use super::cst::SyntaxKind::{self, *};
use super::lexer::{is_unterminated_string, lex, token_text};

fn lexed(source: &str) -> Vec<(SyntaxKind, &str)> {
    lex(source)
        .iter()
        .map(|t| (t.kind, token_text(source, t)))
        .collect()
}

#[test]
fn simple_comparison() {
    assert_eq!(
        lexed("name==abc"),
        [(Bareword, "name"), (Comparator, "=="), (Bareword, "abc")]
    );
}

#[test]
fn named_and_symbolic_comparators() {
    assert_eq!(
        lexed("a=gt=5;b!=2,c<=3"),
        [
            (Bareword, "a"),
            (Comparator, "=gt="),
            (Bareword, "5"),
            (Semicolon, ";"),
            (Bareword, "b"),
            (Comparator, "!="),
            (Bareword, "2"),
            (Comma, ","),
            (Bareword, "c"),
            (Comparator, "<="),
            (Bareword, "3"),
        ]
    );
}

#[test]
fn keywords_are_case_insensitive() {
    assert_eq!(
        lexed("x==1 AND y==2 or z==3"),
        [
            (Bareword, "x"),
            (Comparator, "=="),
            (Bareword, "1"),
            (Whitespace, " "),
            (KwAnd, "AND"),
            (Whitespace, " "),
            (Bareword, "y"),
            (Comparator, "=="),
            (Bareword, "2"),
            (Whitespace, " "),
            (KwOr, "or"),
            (Whitespace, " "),
            (Bareword, "z"),
            (Comparator, "=="),
            (Bareword, "3"),
        ]
    );
}

#[test]
fn symbolic_connectors() {
    assert_eq!(
        lexed("x==1 && y==2 || z==\"a&&b\""),
        [
            (Bareword, "x"),
            (Comparator, "=="),
            (Bareword, "1"),
            (Whitespace, " "),
            (KwAnd, "&&"),
            (Whitespace, " "),
            (Bareword, "y"),
            (Comparator, "=="),
            (Bareword, "2"),
            (Whitespace, " "),
            (KwOr, "||"),
            (Whitespace, " "),
            (Bareword, "z"),
            (Comparator, "=="),
            (Str, "\"a&&b\""),
        ]
    );
    // Only a standalone `&&` connects.
    assert_eq!(lexed("R&&D"), [(Bareword, "R&&D")]);
}

#[test]
fn keyword_prefix_is_a_word() {
    assert_eq!(
        lexed("android==orange"),
        [(Bareword, "android"), (Comparator, "=="), (Bareword, "orange")]
    );
}

#[test]
fn quoted_strings_with_escapes() {
    assert_eq!(
        lexed(r#"name=="a b\"c";d=='x'"#),
        [
            (Bareword, "name"),
            (Comparator, "=="),
            (Str, r#""a b\"c""#),
            (Semicolon, ";"),
            (Bareword, "d"),
            (Comparator, "=="),
            (Str, "'x'"),
        ]
    );
}

#[test]
fn escaped_characters_stay_in_bareword() {
    assert_eq!(
        lexed(r"name==a\ b\*"),
        [(Bareword, "name"), (Comparator, "=="), (Bareword, r"a\ b\*")]
    );
}

#[test]
fn value_list() {
    assert_eq!(
        lexed("tag=in=(a,b)"),
        [
            (Bareword, "tag"),
            (Comparator, "=in="),
            (ParenOpen, "("),
            (Bareword, "a"),
            (Comma, ","),
            (Bareword, "b"),
            (ParenClose, ")"),
        ]
    );
}

#[test]
fn unterminated_string_swallows_rest() {
    let source = "name=='abc def";
    let tokens = lex(source);
    let last = tokens.last().unwrap();
    assert_eq!(last.kind, Garbage);
    assert_eq!(token_text(source, last), "'abc def");
    assert!(is_unterminated_string(source, last));
}

#[test]
fn garbage_is_coalesced() {
    assert_eq!(
        lexed("a !! b"),
        [
            (Bareword, "a"),
            (Whitespace, " "),
            (Garbage, "!!"),
            (Whitespace, " "),
            (Bareword, "b"),
        ]
    );
}

#[test]
fn macro_placeholder_is_a_word() {
    assert_eq!(
        lexed("seen=lt=${NOW_TS}"),
        [(Bareword, "seen"), (Comparator, "=lt="), (Bareword, "${NOW_TS}")]
    );
}

#[test]
fn empty_source() {
    assert!(lex("").is_empty());
}
