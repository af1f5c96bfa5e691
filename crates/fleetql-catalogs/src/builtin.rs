use std::sync::{Arc, LazyLock};

use fleetql_core::{CatalogError, FieldCatalog, FieldDescriptor};

use crate::Catalog;

macro_rules! define_catalogs {
    (
        $(
            $fn_name:ident => {
                feature: $feature:literal,
                name: $name:literal,
                build: $build:path,
                names: [$($alias:literal),* $(,)?] $(,)?
            }
        ),* $(,)?
    ) => {
        $(
            #[cfg(feature = $feature)]
            pub fn $fn_name() -> Catalog {
                static CATALOG: LazyLock<Catalog> = LazyLock::new(|| {
                    Arc::new($build().unwrap_or_else(|err| {
                        panic!("built-in catalog `{}` is invalid: {err}", $name)
                    }))
                });
                Arc::clone(&CATALOG)
            }
        )*

        pub fn from_name(s: &str) -> Option<Catalog> {
            match s.to_ascii_lowercase().as_str() {
                $(
                    #[cfg(feature = $feature)]
                    $($alias)|* => Some($fn_name()),
                )*
                _ => None,
            }
        }

        pub fn all() -> Vec<Catalog> {
            vec![
                $(
                    #[cfg(feature = $feature)]
                    $fn_name(),
                )*
            ]
        }
    };
}

define_catalogs! {
    target => {
        feature: "entity-target",
        name: "target",
        build: build_target,
        names: ["target", "targets", "device", "devices"],
    },
    distribution_set => {
        feature: "entity-distribution-set",
        name: "distribution_set",
        build: build_distribution_set,
        names: ["distribution_set", "distributionset", "ds", "distribution-set"],
    },
    software_module => {
        feature: "entity-software-module",
        name: "software_module",
        build: build_software_module,
        names: ["software_module", "softwaremodule", "sm", "software-module"],
    },
    rollout => {
        feature: "entity-rollout",
        name: "rollout",
        build: build_rollout,
        names: ["rollout", "rollouts"],
    },
    rollout_group => {
        feature: "entity-rollout-group",
        name: "rollout_group",
        build: build_rollout_group,
        names: ["rollout_group", "rolloutgroup", "group", "rollout-group"],
    },
    tag => {
        feature: "entity-tag",
        name: "tag",
        build: build_tag,
        names: ["tag", "tags"],
    },
    metadata => {
        feature: "entity-metadata",
        name: "metadata",
        build: build_metadata,
        names: ["metadata", "meta"],
    },
}

const TARGET_UPDATE_STATUS: [&str; 5] = ["error", "in_sync", "pending", "registered", "unknown"];

const ROLLOUT_STATUS: [&str; 11] = [
    "approval_denied",
    "creating",
    "deleted",
    "deleting",
    "finished",
    "paused",
    "ready",
    "running",
    "starting",
    "stopped",
    "waiting_for_approval",
];

const ROLLOUT_GROUP_STATUS: [&str; 6] =
    ["creating", "error", "finished", "ready", "running", "scheduled"];

fn audit_fields(builder: fleetql_core::CatalogBuilder) -> fleetql_core::CatalogBuilder {
    builder
        .field(FieldDescriptor::timestamp("CREATEDAT", "created_at"))
        .field(FieldDescriptor::timestamp("LASTMODIFIEDAT", "last_modified_at"))
}

fn distribution_set_ref() -> Result<FieldCatalog, CatalogError> {
    FieldCatalog::builder("distribution_set", "sp_distribution_set")
        .field(FieldDescriptor::number("id", "id"))
        .field(FieldDescriptor::string("name", "name"))
        .field(FieldDescriptor::string("version", "version"))
        .build()
}

fn type_ref(entity: &str, table: &str) -> Result<FieldCatalog, CatalogError> {
    FieldCatalog::builder(entity, table)
        .field(FieldDescriptor::number("id", "id"))
        .field(FieldDescriptor::string("key", "type_key"))
        .field(FieldDescriptor::string("name", "name"))
        .build()
}

fn tag_rows(table: &str) -> Result<FieldCatalog, CatalogError> {
    FieldCatalog::builder("tag", table)
        .field(FieldDescriptor::number("id", "id"))
        .field(FieldDescriptor::string("name", "name"))
        .field(FieldDescriptor::string("description", "description"))
        .field(FieldDescriptor::string("colour", "colour"))
        .build()
}

fn build_target() -> Result<FieldCatalog, CatalogError> {
    let builder = FieldCatalog::builder("target", "sp_target")
        .field(FieldDescriptor::number("ID", "id"))
        .field(FieldDescriptor::string("NAME", "name"))
        .field(FieldDescriptor::string("DESCRIPTION", "description"))
        .field(FieldDescriptor::string("CONTROLLERID", "controller_id"))
        .field(FieldDescriptor::enumerated(
            "UPDATESTATUS",
            "update_status",
            TARGET_UPDATE_STATUS,
        ))
        .field(FieldDescriptor::string("IPADDRESS", "address"))
        .field(FieldDescriptor::timestamp(
            "LASTCONTROLLERREQUESTAT",
            "last_target_query",
        ))
        .field(FieldDescriptor::map(
            "ATTRIBUTE",
            "sp_target_attributes",
            "target_id",
            "attribute_key",
            "attribute_value",
        ))
        .field(FieldDescriptor::map(
            "METADATA",
            "sp_target_metadata",
            "target_id",
            "meta_key",
            "meta_value",
        ))
        .field(FieldDescriptor::sub_entity(
            "ASSIGNEDDS",
            "assigned_distribution_set",
            distribution_set_ref()?,
        ))
        .field(FieldDescriptor::sub_entity(
            "INSTALLEDDS",
            "installed_distribution_set",
            distribution_set_ref()?,
        ))
        .field(
            FieldDescriptor::linked_collection(
                "TAG",
                "sp_target_target_tag",
                "target",
                "tag",
                tag_rows("sp_target_tag")?,
            )
            .with_default("name"),
        )
        .field(FieldDescriptor::sub_entity(
            "TARGETTYPE",
            "target_type",
            type_ref("target_type", "sp_target_type")?,
        ));
    audit_fields(builder).build()
}

fn build_distribution_set() -> Result<FieldCatalog, CatalogError> {
    let modules = FieldCatalog::builder("software_module", "sp_base_software_module")
        .field(FieldDescriptor::number("id", "id"))
        .field(FieldDescriptor::string("name", "name"))
        .field(FieldDescriptor::string("version", "version"))
        .build()?;

    let builder = FieldCatalog::builder("distribution_set", "sp_distribution_set")
        .field(FieldDescriptor::number("ID", "id"))
        .field(FieldDescriptor::string("NAME", "name"))
        .field(FieldDescriptor::string("DESCRIPTION", "description"))
        .field(FieldDescriptor::string("VERSION", "version"))
        .field(FieldDescriptor::boolean("COMPLETE", "complete"))
        .field(FieldDescriptor::boolean("VALID", "valid"))
        .field(FieldDescriptor::sub_entity(
            "TYPE",
            "ds_id",
            type_ref("distribution_set_type", "sp_distribution_set_type")?,
        ))
        .field(
            FieldDescriptor::linked_collection("MODULE", "sp_ds_module", "ds_id", "module_id", modules)
                .with_default("name"),
        )
        .field(
            FieldDescriptor::linked_collection(
                "TAG",
                "sp_ds_dstag",
                "ds",
                "tag",
                tag_rows("sp_distribution_set_tag")?,
            )
            .with_default("name"),
        )
        .field(FieldDescriptor::map(
            "METADATA",
            "sp_ds_metadata",
            "ds_id",
            "meta_key",
            "meta_value",
        ));
    audit_fields(builder).build()
}

fn build_software_module() -> Result<FieldCatalog, CatalogError> {
    let builder = FieldCatalog::builder("software_module", "sp_base_software_module")
        .field(FieldDescriptor::number("ID", "id"))
        .field(FieldDescriptor::string("NAME", "name"))
        .field(FieldDescriptor::string("DESCRIPTION", "description"))
        .field(FieldDescriptor::string("VERSION", "version"))
        .field(FieldDescriptor::string("VENDOR", "vendor"))
        .field(FieldDescriptor::sub_entity(
            "TYPE",
            "module_type",
            type_ref("software_module_type", "sp_software_module_type")?,
        ))
        .field(FieldDescriptor::map(
            "METADATA",
            "sp_sw_metadata",
            "sw_id",
            "meta_key",
            "meta_value",
        ));
    audit_fields(builder).build()
}

fn build_rollout() -> Result<FieldCatalog, CatalogError> {
    let builder = FieldCatalog::builder("rollout", "sp_rollout")
        .field(FieldDescriptor::number("ID", "id"))
        .field(FieldDescriptor::string("NAME", "name"))
        .field(FieldDescriptor::string("DESCRIPTION", "description"))
        .field(FieldDescriptor::enumerated("STATUS", "status", ROLLOUT_STATUS))
        .field(FieldDescriptor::sub_entity(
            "DISTRIBUTIONSET",
            "distribution_set",
            distribution_set_ref()?,
        ));
    audit_fields(builder).build()
}

fn build_rollout_group() -> Result<FieldCatalog, CatalogError> {
    let builder = FieldCatalog::builder("rollout_group", "sp_rolloutgroup")
        .field(FieldDescriptor::number("ID", "id"))
        .field(FieldDescriptor::string("NAME", "name"))
        .field(FieldDescriptor::string("DESCRIPTION", "description"))
        .field(FieldDescriptor::enumerated(
            "STATUS",
            "status",
            ROLLOUT_GROUP_STATUS,
        ));
    audit_fields(builder).build()
}

fn build_tag() -> Result<FieldCatalog, CatalogError> {
    FieldCatalog::builder("tag", "sp_target_tag")
        .field(FieldDescriptor::number("ID", "id"))
        .field(FieldDescriptor::string("NAME", "name"))
        .field(FieldDescriptor::string("DESCRIPTION", "description"))
        .field(FieldDescriptor::string("COLOUR", "colour"))
        .build()
}

fn build_metadata() -> Result<FieldCatalog, CatalogError> {
    FieldCatalog::builder("metadata", "sp_target_metadata")
        .field(FieldDescriptor::string("KEY", "meta_key"))
        .field(FieldDescriptor::string("VALUE", "meta_value"))
        .build()
}
