use fleetql_core::{BackendPath, FieldKind, ValueType};

use super::*;

#[test]
#[cfg(feature = "entity-target")]
fn catalog_from_name() {
    assert_eq!(from_name("target").unwrap().entity(), "target");
    assert_eq!(from_name("Devices").unwrap().entity(), "target");
    assert!(from_name("unknown").is_none());
}

#[test]
#[cfg(feature = "entity-distribution-set")]
fn catalog_from_alias() {
    assert_eq!(from_name("ds").unwrap().entity(), "distribution_set");
    assert_eq!(from_name("DistributionSet").unwrap().entity(), "distribution_set");
}

#[test]
fn all_returns_enabled_catalogs() {
    let catalogs = all();
    assert!(!catalogs.is_empty());
    for catalog in &catalogs {
        assert!(!catalog.entity().is_empty());
        assert!(!catalog.is_empty());
    }
}

#[test]
#[cfg(feature = "entity-target")]
fn target_catalog_is_shared() {
    let a = target();
    let b = target();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
#[cfg(feature = "entity-target")]
fn target_fields() {
    let catalog = target();
    let names: Vec<_> = catalog.names().collect();
    assert_eq!(
        names,
        [
            "ID",
            "NAME",
            "DESCRIPTION",
            "CONTROLLERID",
            "UPDATESTATUS",
            "IPADDRESS",
            "LASTCONTROLLERREQUESTAT",
            "ATTRIBUTE",
            "METADATA",
            "ASSIGNEDDS",
            "INSTALLEDDS",
            "TAG",
            "TARGETTYPE",
            "CREATEDAT",
            "LASTMODIFIEDAT",
        ]
    );

    let tag = catalog.get("tag").unwrap();
    assert_eq!(tag.default_child(), Some("name"));
    assert!(matches!(tag.backend_path(), BackendPath::Link { .. }));

    let status = catalog.get("updatestatus").unwrap();
    assert_eq!(status.value_type(), ValueType::EnumSet);
    assert!(status.enum_values().iter().any(|v| v == "in_sync"));

    let attribute = catalog.get("attribute").unwrap();
    assert!(matches!(attribute.kind(), FieldKind::Map { default_key: None }));

    let last_seen = catalog.get("lastcontrollerrequestat").unwrap();
    assert_eq!(last_seen.value_type(), ValueType::Timestamp);
}

#[test]
#[cfg(feature = "entity-distribution-set")]
fn distribution_set_booleans() {
    let catalog = distribution_set();
    assert_eq!(
        catalog.get("complete").unwrap().value_type(),
        ValueType::Boolean
    );
    assert_eq!(catalog.get("MODULE").unwrap().default_child(), Some("name"));
}

#[test]
#[cfg(feature = "entity-rollout")]
fn rollout_status_values() {
    let catalog = rollout();
    let status = catalog.get("status").unwrap();
    assert!(status.enum_values().iter().any(|v| v == "running"));
    let ds = catalog.get("distributionset").unwrap();
    assert!(ds.sub_catalog().unwrap().contains("version"));
}
