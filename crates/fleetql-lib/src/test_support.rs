//! Catalogs shared by unit tests.

use std::sync::{Arc, LazyLock};

use fleetql_core::{FieldCatalog, FieldDescriptor};

/// A small device catalog covering every field kind.
///
/// | field        | kind                                    |
/// |--------------|-----------------------------------------|
/// | `ID`         | number                                  |
/// | `NAME`       | string                                  |
/// | `STATUS`     | enum `online`, `offline`, `retired`     |
/// | `ENABLED`    | boolean                                 |
/// | `LASTSEEN`   | timestamp                               |
/// | `TAG`        | linked collection, defaults to `name`   |
/// | `META`       | map                                     |
/// | `GROUP`      | sub-entity                              |
/// | `ATTACHMENT` | collection without default              |
pub fn devices() -> Arc<FieldCatalog> {
    static CATALOG: LazyLock<Arc<FieldCatalog>> = LazyLock::new(|| {
        Arc::new(build_devices().unwrap_or_else(|err| panic!("test catalog: {err}")))
    });
    Arc::clone(&CATALOG)
}

fn build_devices() -> Result<FieldCatalog, fleetql_core::CatalogError> {
    let tags = FieldCatalog::builder("tag", "tag")
        .field(FieldDescriptor::number("id", "id"))
        .field(FieldDescriptor::string("name", "name"))
        .field(FieldDescriptor::string("colour", "colour"))
        .build()?;
    let group = FieldCatalog::builder("device_group", "device_group")
        .field(FieldDescriptor::number("id", "id"))
        .field(FieldDescriptor::string("name", "name"))
        .build()?;
    let attachments = FieldCatalog::builder("attachment", "attachment")
        .field(FieldDescriptor::string("file", "file"))
        .field(FieldDescriptor::number("size", "size"))
        .build()?;

    FieldCatalog::builder("device", "device")
        .field(FieldDescriptor::number("ID", "id"))
        .field(FieldDescriptor::string("NAME", "name"))
        .field(FieldDescriptor::enumerated(
            "STATUS",
            "status",
            ["online", "offline", "retired"],
        ))
        .field(FieldDescriptor::boolean("ENABLED", "enabled"))
        .field(FieldDescriptor::timestamp("LASTSEEN", "last_seen"))
        .field(
            FieldDescriptor::linked_collection("TAG", "device_tag", "device_id", "tag_id", tags)
                .with_default("name"),
        )
        .field(FieldDescriptor::map(
            "META",
            "device_meta",
            "device_id",
            "meta_key",
            "meta_value",
        ))
        .field(FieldDescriptor::sub_entity("GROUP", "group_id", group))
        .field(FieldDescriptor::collection(
            "ATTACHMENT",
            "device_id",
            attachments,
        ))
        .build()
}
