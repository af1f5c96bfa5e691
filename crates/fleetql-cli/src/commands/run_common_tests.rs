use fleetql_lib::Generation;

use super::catalogs::field_rows;
use super::matching::load_values;
use super::run_common::{FilterInput, InputError, Loaded, load_config, load_filter, resolve_catalog};

fn input(text: &str) -> FilterInput {
    FilterInput {
        filter_text: Some(text.to_string()),
        filter_path: None,
        entity: "target".to_string(),
        config_path: None,
        generation: None,
        now: Some(1_700_000_000_000),
        expand_macros: true,
        color: false,
    }
}

#[test]
fn inline_filter_wins() {
    assert_eq!(load_filter(Some("a==b"), None).unwrap(), "a==b");
    assert!(matches!(load_filter(None, None), Err(InputError::MissingFilter)));
}

#[test]
fn missing_filter_file() {
    let err = load_filter(None, Some("/nonexistent/filter.rsql".as_ref())).unwrap_err();
    assert!(err.to_string().starts_with("failed to read '/nonexistent/filter.rsql'"));
}

#[test]
fn generation_flag_overrides_config() {
    assert_eq!(load_config(None, None).unwrap().generation, Generation::Current);
    assert_eq!(
        load_config(None, Some(Generation::Legacy)).unwrap().generation,
        Generation::Legacy
    );
}

#[test]
fn catalog_aliases() {
    assert_eq!(resolve_catalog("devices").unwrap().entity(), "target");
    assert_eq!(resolve_catalog("DS").unwrap().entity(), "distribution_set");
    let err = resolve_catalog("printer").unwrap_err();
    assert_eq!(err.to_string(), "unknown entity type 'printer'");
}

#[test]
fn fixed_clock_expands_macros() {
    let loaded = Loaded::from_input(&input("lastcontrollerrequestat=lt=${NOW_TS}")).unwrap();
    let filter = loaded.parse().unwrap();
    assert_eq!(filter.text(), "lastcontrollerrequestat=lt=1700000000000");
}

#[test]
fn macros_can_be_disabled() {
    let mut input = input("name==${NOW_TS}");
    input.expand_macros = false;
    let loaded = Loaded::from_input(&input).unwrap();
    assert_eq!(loaded.parse().unwrap().text(), "name==${NOW_TS}");
}

#[test]
fn out_of_range_clock() {
    let mut input = input("name==a");
    input.now = Some(i64::MAX);
    assert!(matches!(
        Loaded::from_input(&input),
        Err(InputError::InvalidNow(i64::MAX))
    ));
}

#[test]
fn values_inline_or_from_file() {
    let values = load_values(r#"{"NAME": "edge-1", "TAG.name": ["a", "b"]}"#).unwrap();
    assert!(!values.is_empty());

    assert!(load_values("not json").unwrap_err().starts_with("invalid field values"));
    assert!(
        load_values("@/nonexistent/values.json")
            .unwrap_err()
            .starts_with("failed to read")
    );
}

#[test]
fn target_field_rows() {
    let catalog = resolve_catalog("target").unwrap();
    let rows = field_rows(&catalog);

    let status = rows.iter().find(|r| r.path == "UPDATESTATUS").unwrap();
    assert_eq!(status.kind, "enum");
    assert!(status.values.iter().any(|v| v == "pending"));

    let tag = rows.iter().find(|r| r.path == "TAG").unwrap();
    assert_eq!(tag.kind, "collection");
    assert_eq!(tag.default.as_deref(), Some("name"));
    assert!(rows.iter().any(|r| r.path == "TAG.name"));
    assert!(rows.iter().any(|r| r.path == "ASSIGNEDDS.version"));
}

#[test]
fn field_rows_as_json() {
    let rows = field_rows(&resolve_catalog("meta").unwrap());
    insta::assert_snapshot!(serde_json::to_string_pretty(&rows).unwrap(), @r#"
    [
      {
        "path": "KEY",
        "kind": "field",
        "type": "string"
      },
      {
        "path": "VALUE",
        "kind": "field",
        "type": "string"
      }
    ]
    "#);
}
