use indoc::indoc;

use super::config::*;

#[test]
fn defaults() {
    let config = EngineConfig::default();
    assert!(config.ignore_case);
    assert!(!config.case_insensitive_db);
    assert!(!config.lexicographic_ordering);
    assert_eq!(config.generation, Generation::Current);
    assert_eq!(config.max_depth, 64);
    assert_eq!(config.max_tokens, 4096);
    assert_eq!(config.max_comparisons, 256);
}

#[test]
fn empty_object_is_default() {
    assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
}

#[test]
fn from_json_overrides() {
    let json = indoc! {r#"
        {
            "ignore_case": false,
            "generation": "legacy",
            "max_depth": 8,
            "polling": { "polling_interval_ms": 1000 }
        }
    "#};

    let config = EngineConfig::from_json(json).unwrap();
    assert!(!config.ignore_case);
    assert_eq!(config.generation, Generation::Legacy);
    assert_eq!(config.max_depth, 8);
    assert_eq!(config.max_tokens, 4096);
    assert_eq!(config.polling.polling_interval_ms, 1000);
    assert_eq!(config.polling.overdue_interval_ms, 300_000);
}

#[test]
fn unknown_keys_rejected() {
    let err = EngineConfig::from_json(r#"{ "ignorecase": true }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
    assert!(err.to_string().starts_with("invalid config: unknown field `ignorecase`"));
}

#[test]
fn missing_file() {
    let err = EngineConfig::from_path(std::path::Path::new("/nonexistent/fleetql.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn case_folding_flags() {
    let config = EngineConfig::default();
    assert!(config.store_folds_case());
    assert!(config.matcher_folds_case());

    let config = config.with_case_insensitive_db(true);
    assert!(!config.store_folds_case());
    assert!(config.matcher_folds_case());

    let config = config.with_ignore_case(false).with_case_insensitive_db(false);
    assert!(!config.store_folds_case());
    assert!(!config.matcher_folds_case());
}

#[test]
fn generation_from_str() {
    assert_eq!("Legacy".parse::<Generation>().unwrap(), Generation::Legacy);
    assert_eq!("current".parse::<Generation>().unwrap(), Generation::Current);
    assert!("newest".parse::<Generation>().is_err());
    assert_eq!(Generation::Legacy.to_string(), "legacy");
}
