use indoc::indoc;

use super::*;
use crate::DiagnosticKind;
use crate::config::EngineConfig;

fn comparison(node: &RawNode) -> &RawComparison {
    match node {
        RawNode::Comparison(c) => c,
        other => panic!("expected comparison, got {other:?}"),
    }
}

/// Compact rendering of the tree shape: `(a & (b | c))`.
fn shape(node: &RawNode) -> String {
    match node {
        RawNode::Comparison(c) => c.field.text(),
        RawNode::And(l, r) => format!("({} & {})", shape(l), shape(r)),
        RawNode::Or(l, r) => format!("({} | {})", shape(l), shape(r)),
        RawNode::Group(inner) => format!("[{}]", shape(inner)),
    }
}

fn error_kind(source: &str) -> DiagnosticKind {
    parse(source).unwrap_err().kind()
}

fn expectation(source: &str) -> Expectation {
    parse_tree(source, &EngineConfig::default()).expectation
}

#[test]
fn simple_comparison() {
    let raw = parse("name==abc").unwrap();
    let c = comparison(&raw);
    assert_eq!(c.field.segments, ["name"]);
    assert_eq!(c.op, ComparisonOp::Eq);
    assert!(!c.is_list);
    assert_eq!(c.values.len(), 1);
    assert_eq!(c.values[0].text(), "abc");
    assert_eq!(c.values[0].kind, LiteralKind::Bareword);
    assert_eq!(c.span, rowan::TextRange::new(0.into(), 9.into()));
}

#[test]
fn dotted_field_path() {
    let raw = parse("assignedDs.version==1.0").unwrap();
    let c = comparison(&raw);
    assert_eq!(c.field.segments, ["assignedDs", "version"]);
    assert_eq!(c.field.head(), "assignedDs");
    assert_eq!(c.values[0].kind, LiteralKind::Number);
}

#[test]
fn and_binds_tighter_than_or() {
    let raw = parse("a==1,b==2;c==3").unwrap();
    assert_eq!(shape(&raw), "(a | (b & c))");
}

#[test]
fn chains_are_left_associative() {
    assert_eq!(shape(&parse("a==1;b==2;c==3").unwrap()), "((a & b) & c)");
    assert_eq!(shape(&parse("a==1,b==2,c==3").unwrap()), "((a | b) | c)");
}

#[test]
fn keyword_connectors() {
    let raw = parse("a==1 and b==2 OR c==3").unwrap();
    assert_eq!(shape(&raw), "((a & b) | c)");
}

#[test]
fn groups_override_precedence() {
    let raw = parse("(a==1 , b==2) ; c==3").unwrap();
    assert_eq!(shape(&raw), "([(a | b)] & c)");
}

#[test]
fn keywords_are_values_after_operator() {
    let raw = parse("a==and;b==OR").unwrap();
    let comparisons = raw.comparisons();
    assert_eq!(comparisons[0].values[0].text(), "and");
    assert_eq!(comparisons[1].values[0].text(), "OR");
}

#[test]
fn value_list() {
    let raw = parse(r#"tag=in=(x, "y z")"#).unwrap();
    let c = comparison(&raw);
    assert_eq!(c.op, ComparisonOp::In);
    assert!(c.is_list);
    let texts: Vec<_> = c.values.iter().map(|v| v.text()).collect();
    assert_eq!(texts, ["x", "y z"]);
}

#[test]
fn operator_aliases() {
    let cases = [
        ("a==1", ComparisonOp::Eq),
        ("a!=1", ComparisonOp::Ne),
        ("a=gt=1", ComparisonOp::Gt),
        ("a>1", ComparisonOp::Gt),
        ("a=GE=1", ComparisonOp::Ge),
        ("a>=1", ComparisonOp::Ge),
        ("a=lt=1", ComparisonOp::Lt),
        ("a<1", ComparisonOp::Lt),
        ("a=le=1", ComparisonOp::Le),
        ("a<=1", ComparisonOp::Le),
        ("a=out=1", ComparisonOp::Out),
        ("a=is=null", ComparisonOp::Is),
        ("a=eq=1", ComparisonOp::Is),
        ("a=not=null", ComparisonOp::Not),
        ("a=ne=1", ComparisonOp::Not),
    ];
    for (source, op) in cases {
        assert_eq!(comparison(&parse(source).unwrap()).op, op, "{source}");
    }
}

#[test]
fn unknown_operator() {
    let err = parse("name=like=abc").unwrap_err();
    assert_eq!(err.kind(), DiagnosticKind::UnknownOperator);
    assert_eq!(err.message(), "unknown operator `=like=`");
    assert_eq!(err.fragment(), "=like=");
}

#[test]
fn unterminated_string() {
    let err = parse(r#"name=="abc"#).unwrap_err();
    assert_eq!(err.kind(), DiagnosticKind::UnterminatedString);
    assert_eq!(err.fragment(), r#""abc"#);
}

#[test]
fn unclosed_group() {
    let err = parse("(a==1").unwrap_err();
    assert_eq!(err.kind(), DiagnosticKind::UnclosedGroup);
    assert_eq!(err.message(), "missing closing `)`; filter ends inside a group");
    assert_eq!(err.fragment(), "(a==1");
}

#[test]
fn unmatched_close_paren() {
    let err = parse("a==1)").unwrap_err();
    assert_eq!(err.kind(), DiagnosticKind::UnexpectedToken);
    assert_eq!(err.message(), "unexpected token: unmatched `)`");
    assert_eq!(err.fragment(), ")");
}

#[test]
fn unclosed_list() {
    assert_eq!(error_kind("a=in=(x,y"), DiagnosticKind::UnclosedList);
}

#[test]
fn empty_list() {
    let err = parse("a=in=()").unwrap_err();
    assert_eq!(err.kind(), DiagnosticKind::EmptyList);
    assert_eq!(err.fragment(), "()");
}

#[test]
fn empty_filter() {
    assert_eq!(error_kind(""), DiagnosticKind::EmptyFilter);
    assert_eq!(error_kind("   "), DiagnosticKind::EmptyFilter);
}

#[test]
fn malformed_field_paths() {
    for source in ["a..b==1", ".a==1", "a.==1", "a.*==1"] {
        assert_eq!(error_kind(source), DiagnosticKind::MalformedFieldPath, "{source}");
    }
    let err = parse("a..b==1").unwrap_err();
    assert_eq!(err.message(), "malformed field path: empty segment in `a..b`");
}

#[test]
fn missing_parts() {
    assert_eq!(error_kind("name"), DiagnosticKind::ExpectedOperator);
    assert_eq!(error_kind("name=="), DiagnosticKind::ExpectedValue);
    assert_eq!(error_kind("name==a;"), DiagnosticKind::ExpectedField);
    assert_eq!(error_kind("name==a;,b==c"), DiagnosticKind::ExpectedField);
    assert_eq!(error_kind("a==1 b==2"), DiagnosticKind::UnexpectedToken);
}

#[test]
fn missing_value_at_end_has_empty_fragment() {
    let err = parse("name==").unwrap_err();
    assert_eq!(err.fragment(), "");
    assert_eq!(err.range(), rowan::TextRange::empty(6.into()));
}

#[test]
fn nesting_limit() {
    let config = EngineConfig::default().with_limits(3, 4096);
    assert!(parse_with_config("(((a==1)))", &config).is_ok());

    let err = parse_with_config("((((a==1))))", &config).unwrap_err();
    assert_eq!(err.kind(), DiagnosticKind::NestingTooDeep);
}

#[test]
fn token_limit() {
    let config = EngineConfig::default().with_limits(64, 5);
    assert!(parse_with_config("a==1", &config).is_ok());

    let err = parse_with_config("a==1;b==2", &config).unwrap_err();
    assert_eq!(err.kind(), DiagnosticKind::FilterTooLarge);
}

#[test]
fn comparison_limit() {
    let config = EngineConfig::default().with_max_comparisons(2);
    assert!(parse_with_config("a==1;b==2", &config).is_ok());

    let err = parse_with_config("a==1;b==2,c==3", &config).unwrap_err();
    assert_eq!(err.kind(), DiagnosticKind::FilterTooLarge);
    assert_eq!(err.fragment(), "c==3");
}

#[test]
fn long_chain_stops_at_comparison_limit() {
    let source = vec!["name==a"; 1000].join(";");
    let result = parse_tree(&source, &EngineConfig::default());
    let fatal = result.fatal.expect("chain exceeds the comparison limit");
    assert_eq!(fatal.kind(), DiagnosticKind::FilterTooLarge);
    assert_eq!(usize::from(fatal.range().start()), 256 * "name==a;".len());
}

#[test]
fn deep_nesting_with_default_limit() {
    let depth = 100;
    let source = format!("{}a==1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(error_kind(&source), DiagnosticKind::NestingTooDeep);
}

#[test]
fn expectation_at_end() {
    assert_eq!(expectation(""), Expectation::Field);
    assert_eq!(
        expectation("name"),
        Expectation::Operator {
            field: "name".to_string()
        }
    );
    assert_eq!(
        expectation("name=="),
        Expectation::Value {
            field: "name".to_string(),
            op: Some(ComparisonOp::Eq)
        }
    );
    assert_eq!(expectation("name==a "), Expectation::Connector);
    assert_eq!(expectation("(name==a)"), Expectation::Connector);
    assert_eq!(expectation("name==a and "), Expectation::Field);
    assert_eq!(expectation("name==a;("), Expectation::Field);
    assert_eq!(expectation("name=in=(a"), Expectation::Nothing);
    assert_eq!(
        expectation("name=in=(a,"),
        Expectation::Value {
            field: "name".to_string(),
            op: Some(ComparisonOp::In)
        }
    );
}

#[test]
fn tolerant_parse_keeps_all_diagnostics() {
    let diagnostics = check("a=like=1;b=in=()", &EngineConfig::default());
    let kinds: Vec<_> = diagnostics.filtered().iter().map(|d| d.kind()).collect();
    assert_eq!(
        kinds,
        [DiagnosticKind::UnknownOperator, DiagnosticKind::EmptyList]
    );
}

#[test]
fn cst_is_lossless() {
    let source = "a==1; b=in=(x,y)";
    let result = parse_tree(source, &EngineConfig::default());
    assert_eq!(result.root.as_cst().text().to_string(), source);

    insta::assert_snapshot!(dump_cst(result.root.as_cst(), true), @r#"
    Root
      And
        Comparison
          FieldPath
            Bareword "a"
          Comparator "=="
          Value
            Bareword "1"
        Semicolon ";"
        Whitespace " "
        Comparison
          FieldPath
            Bareword "b"
          Comparator "=in="
          ValueList
            ParenOpen "("
            Value
              Bareword "x"
            Comma ","
            Value
              Bareword "y"
            ParenClose ")"
    "#);
}

#[test]
fn error_renders_with_source() {
    let source = "name=like=abc";
    let err = parse(source).unwrap_err();
    insta::assert_snapshot!(err.render(source, false), @r"
    error: unknown operator `=like=`
      |
    1 | name=like=abc
      |     ^^^^^^
    ");
}

#[test]
fn multiline_filter() {
    let source = indoc! {"
        name==a
        and tag==b
    "};
    assert_eq!(shape(&parse(source).unwrap()), "(name & tag)");
}

#[test]
fn misspelled_operators_get_a_fix() {
    let fix = |source: &str| {
        let primary = check(source, &EngineConfig::default()).primary().unwrap();
        assert_eq!(primary.kind(), DiagnosticKind::UnknownOperator, "`{source}`");
        primary.fix.map(|f| f.replacement)
    };
    assert_eq!(fix("name=a").as_deref(), Some("=="));
    assert_eq!(fix("id=LTE=5").as_deref(), Some("=le="));
    assert_eq!(fix("id=nin=(1,2)").as_deref(), Some("=out="));
    assert_eq!(fix("name=like=a"), None);
}
