use crate::bind::{BoundNode, bind};
use crate::config::EngineConfig;
use crate::parser::parse;
use crate::printer::{FilterPrinter, print};
use crate::test_support::devices;

fn bound(text: &str) -> BoundNode {
    let raw = parse(text).unwrap_or_else(|err| panic!("`{text}`: {err}"));
    bind(&raw, &devices(), &EngineConfig::default()).unwrap_or_else(|err| panic!("`{text}`: {err}"))
}

fn printed(text: &str) -> String {
    print(&bound(text))
}

#[test]
fn canonical_operators() {
    assert_eq!(printed("name==a"), r#"NAME=="a""#);
    assert_eq!(printed("name=is=a"), r#"NAME=="a""#);
    assert_eq!(printed("name=eq=a"), r#"NAME=="a""#);
    assert_eq!(printed("name=ne=a"), r#"NAME!="a""#);
    assert_eq!(printed("name=not=a"), r#"NAME!="a""#);
    assert_eq!(printed("id>3"), r#"ID=gt="3""#);
    assert_eq!(printed("id>=3"), r#"ID=ge="3""#);
    assert_eq!(printed("id<3"), r#"ID=lt="3""#);
    assert_eq!(printed("id<=3"), r#"ID=le="3""#);
}

#[test]
fn canonical_field_paths() {
    assert_eq!(printed("Name==a"), r#"NAME=="a""#);
    assert_eq!(printed("tag==a"), r#"TAG.name=="a""#);
    assert_eq!(printed("TAG.NAME==a"), r#"TAG.name=="a""#);
    assert_eq!(printed("group.NAME==a"), r#"GROUP.name=="a""#);
    // Map keys keep their spelling.
    assert_eq!(printed("meta.Region==eu"), r#"META.Region=="eu""#);
}

#[test]
fn literals_are_quoted() {
    assert_eq!(printed("id==3.50"), r#"ID=="3.5""#);
    assert_eq!(printed("enabled==TRUE"), r#"ENABLED=="true""#);
    assert_eq!(printed("status==ONLINE"), r#"STATUS=="online""#);
    assert_eq!(printed("name=='a b'"), r#"NAME=="a b""#);
    assert_eq!(printed("name==null"), r#"NAME=="null""#);
    assert_eq!(printed("name==''"), r#"NAME=="""#);
}

#[test]
fn null_checks() {
    assert_eq!(printed("name=is=null"), "NAME=is=null");
    assert_eq!(printed("tag=not=NULL"), "TAG.name=not=null");
    // A quoted null is text.
    assert_eq!(printed("name=is='null'"), r#"NAME=="null""#);
}

#[test]
fn lists() {
    assert_eq!(printed("name=in=(a,'b c')"), r#"NAME=in=("a","b c")"#);
    assert_eq!(printed("id=out=(1, 2)"), r#"ID=out=("1","2")"#);
}

#[test]
fn wildcards_and_escapes() {
    assert_eq!(printed("name==edge*"), r#"NAME=="edge*""#);
    assert_eq!(printed(r"name==edge\*"), r#"NAME=="edge\*""#);
    assert_eq!(printed(r#"name=="say \"hi\" *""#), r#"NAME=="say \"hi\" *""#);
    assert_eq!(printed(r"name==a\\b"), r#"NAME=="a\\b""#);
}

#[test]
fn minimal_parentheses() {
    assert_eq!(
        printed("name==a;id==1,id==2"),
        r#"NAME=="a" && ID=="1" || ID=="2""#
    );
    assert_eq!(
        printed("name==a;(id==1,id==2)"),
        r#"NAME=="a" && (ID=="1" || ID=="2")"#
    );
    assert_eq!(
        printed("(name==a,id==1);id==2"),
        r#"(NAME=="a" || ID=="1") && ID=="2""#
    );
    assert_eq!(
        printed("name==a and id==1 and id==2"),
        r#"NAME=="a" && ID=="1" && ID=="2""#
    );
    assert_eq!(
        printed("name==a;(id==1;id==2)"),
        r#"NAME=="a" && (ID=="1" && ID=="2")"#
    );
    assert_eq!(
        printed("name==a,(id==1;id==2)"),
        r#"NAME=="a" || ID=="1" && ID=="2""#
    );
    assert_eq!(
        printed("name==a,(id==1,id==2)"),
        r#"NAME=="a" || (ID=="1" || ID=="2")"#
    );
    assert_eq!(printed("((name==a))"), r#"NAME=="a""#);
}

#[test]
fn printing_is_idempotent() {
    let filters = [
        "name==a;id==1,id==2",
        "name==a;(id==1,id==2)",
        "(name==a,id==1);(id==2;id==3)",
        "name==a,(id==1,(id==2;(id==3,id==4)))",
        r#"name=="x\"y\\z\**""#,
        "tag=out=(a,b);meta.k=is=null",
        "status=in=(online,OFFLINE),enabled!=false",
        "lastseen=lt=1700000000000;group.id=ge=-2.5",
        "name==null,name=not=null",
    ];
    for filter in filters {
        let once = printed(filter);
        let twice = printed(&once);
        assert_eq!(once, twice, "`{filter}`");
        assert_eq!(bound(filter), bound(&once), "`{filter}` binds differently once printed");
    }
}

#[test]
fn tree_dump() {
    let node = bound("name==a;(tag==b,id=gt=2)");
    insta::assert_snapshot!(FilterPrinter::new(&node).tree(true).dump(), @r#"
    And
      NAME=="a"
      Or
        TAG.name=="b"
        ID=gt="2"
    "#);
}

#[test]
fn display_matches_dump() {
    let node = bound("name==a");
    assert_eq!(FilterPrinter::new(&node).to_string(), print(&node));
}
