use indoc::indoc;

use crate::{
    BackendPath, CatalogError, FieldCatalog, FieldDescriptor, FieldKind, ValueType,
    parse_catalog,
};

const SAMPLE_JSON: &str = indoc! {r#"
    {
        "entity": "target",
        "table": "sp_target",
        "fields": [
            {"name": "NAME", "kind": "string", "column": "name"},
            {"name": "ID", "kind": "number", "column": "id"},
            {"name": "UPDATESTATUS", "kind": "enum", "column": "update_status",
             "values": ["error", "in_sync", "pending"]},
            {"name": "ATTRIBUTE", "kind": "map", "table": "sp_target_attributes",
             "owner_column": "target_id", "key_column": "attribute_key",
             "value_column": "attribute_value"},
            {"name": "TAG", "kind": "collection", "owner_column": "target",
             "link": {"table": "sp_target_target_tag", "child_column": "tag"},
             "default_field": "name",
             "catalog": {
                "entity": "tag",
                "table": "sp_target_tag",
                "fields": [
                    {"name": "name", "kind": "string", "column": "name"},
                    {"name": "colour", "kind": "string", "column": "colour"}
                ]
             }},
            {"name": "ASSIGNEDDS", "kind": "sub_entity", "foreign_key": "assigned_distribution_set",
             "catalog": {
                "entity": "distribution_set",
                "table": "sp_distribution_set",
                "fields": [
                    {"name": "name", "kind": "string", "column": "name"},
                    {"name": "version", "kind": "string", "column": "version"}
                ]
             }}
        ]
    }
"#};

fn tiny() -> FieldCatalog {
    FieldCatalog::builder("device", "devices")
        .field(FieldDescriptor::string("NAME", "name"))
        .field(FieldDescriptor::timestamp("LASTSEEN", "last_seen"))
        .build()
        .unwrap()
}

#[test]
fn parse_raw_catalog() {
    let raw = parse_catalog(SAMPLE_JSON).unwrap();
    assert_eq!(raw.entity, "target");
    assert_eq!(raw.id_column, "id");
    assert_eq!(raw.fields.len(), 6);
}

#[test]
fn raw_catalog_validates_into_analysis_layer() {
    let catalog = FieldCatalog::from_json(SAMPLE_JSON).unwrap();
    assert_eq!(catalog.len(), 6);
    assert_eq!(catalog.table(), "sp_target");

    let tag = catalog.get("tag").unwrap();
    assert!(tag.is_multi_valued());
    assert_eq!(tag.default_child(), Some("name"));
    assert_eq!(tag.value_type(), ValueType::String);
    assert_eq!(
        tag.backend_path(),
        &BackendPath::Link {
            table: "sp_target_target_tag".to_string(),
            owner_column: "target".to_string(),
            child_column: "tag".to_string(),
        }
    );

    let status = catalog.get("UpdateStatus").unwrap();
    assert_eq!(status.enum_values(), ["error", "in_sync", "pending"]);
    assert!(status.is_leaf());

    let ds = catalog.get("assignedds").unwrap();
    let sub = ds.sub_catalog().unwrap();
    assert_eq!(sub.names().collect::<Vec<_>>(), ["name", "version"]);
    assert!(!ds.usable_bare());
}

#[test]
fn lookup_is_case_insensitive() {
    let catalog = tiny();
    assert!(catalog.contains("name"));
    assert!(catalog.contains("LastSeen"));
    assert!(!catalog.contains("names"));
    assert_eq!(catalog.get("name").unwrap().name(), "NAME");
}

#[test]
fn names_keep_registration_order() {
    let catalog = tiny();
    assert_eq!(catalog.names().collect::<Vec<_>>(), ["NAME", "LASTSEEN"]);
}

#[test]
fn duplicate_names_rejected() {
    let err = FieldCatalog::builder("device", "devices")
        .field(FieldDescriptor::string("NAME", "name"))
        .field(FieldDescriptor::string("name", "display_name"))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        CatalogError::DuplicateField {
            entity: "device".to_string(),
            name: "name".to_string(),
        }
    );
}

#[test]
fn default_field_must_exist() {
    let tags = FieldCatalog::builder("tag", "tags")
        .field(FieldDescriptor::string("name", "name"))
        .build()
        .unwrap();
    let err = FieldCatalog::builder("device", "devices")
        .field(FieldDescriptor::collection("TAG", "device_id", tags).with_default("label"))
        .build()
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidDefaultField { .. }));
}

#[test]
fn empty_enumeration_rejected() {
    let err = FieldCatalog::builder("device", "devices")
        .field(FieldDescriptor::enumerated("STATE", "state", Vec::<String>::new()))
        .build()
        .unwrap_err();
    assert_eq!(err, CatalogError::EmptyEnumeration("STATE".to_string()));
}

#[test]
fn map_default_key() {
    let field = FieldDescriptor::map("META", "meta", "owner", "k", "v").with_default("version");
    assert!(matches!(
        field.kind(),
        FieldKind::Map {
            default_key: Some(key)
        } if key == "version"
    ));
    assert!(field.usable_bare());
}

#[test]
fn value_type_ordering() {
    assert!(ValueType::Number.is_ordered());
    assert!(ValueType::Timestamp.is_ordered());
    assert!(!ValueType::String.is_ordered());
    assert!(!ValueType::EnumSet.is_ordered());
    assert_eq!(ValueType::EnumSet.to_string(), "enum");
}

#[test]
fn invalid_json_reports_error() {
    let err = FieldCatalog::from_json("{").unwrap_err();
    assert!(matches!(err, CatalogError::Json(_)));
}
