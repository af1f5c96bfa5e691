//! Built-in entity catalogs and their fields.

use fleetql_core::{FieldCatalog, FieldKind};
use serde::Serialize;

use super::run_common::resolve_catalog;

pub struct CatalogsArgs {
    pub entity: Option<String>,
    pub json: bool,
}

/// One filterable path. Sub-entities and collections are flattened into
/// `PARENT.child` rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRow {
    pub path: String,
    pub kind: &'static str,
    #[serde(rename = "type")]
    pub value_type: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// Sub-field or key used when the path stops at this field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

pub fn run(args: CatalogsArgs) {
    match args.entity {
        Some(entity) => describe_entity(&entity, args.json),
        None => list_entities(args.json),
    }
}

fn list_entities(json: bool) {
    let catalogs = fleetql_catalogs::all();
    if json {
        let names: Vec<&str> = catalogs.iter().map(|c| c.entity()).collect();
        print_json(&names);
        return;
    }
    println!("Entity types ({}):", catalogs.len());
    for catalog in &catalogs {
        println!("  {:<20} {}", catalog.entity(), catalog.table());
    }
}

fn describe_entity(entity: &str, json: bool) {
    let catalog = resolve_catalog(entity).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        eprintln!();
        eprintln!("Run 'fleetql catalogs' for the full list.");
        std::process::exit(1);
    });
    let rows = field_rows(&catalog);
    if json {
        print_json(&rows);
        return;
    }
    for row in &rows {
        let mut line = format!("{:<32} {:<10} {}", row.path, row.kind, row.value_type);
        if let Some(default) = &row.default {
            line.push_str(&format!(" (default: {default})"));
        }
        if !row.values.is_empty() {
            line.push_str(&format!(" [{}]", row.values.join(", ")));
        }
        println!("{}", line.trim_end());
    }
}

pub fn field_rows(catalog: &FieldCatalog) -> Vec<FieldRow> {
    let mut rows = Vec::new();
    collect_rows(catalog, "", &mut rows);
    rows
}

fn collect_rows(catalog: &FieldCatalog, prefix: &str, rows: &mut Vec<FieldRow>) {
    for field in catalog.iter() {
        let path = format!("{prefix}{}", field.name());
        let kind = match field.kind() {
            FieldKind::Simple => "field",
            FieldKind::Enumerated(_) => "enum",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Map { .. } => "map",
            FieldKind::SubEntity(_) => "entity",
            FieldKind::Collection { .. } => "collection",
        };
        rows.push(FieldRow {
            path: path.clone(),
            kind,
            value_type: field.value_type().as_str(),
            values: field.enum_values().to_vec(),
            default: field.default_child().map(str::to_string),
        });
        if let Some(sub) = field.sub_catalog() {
            collect_rows(sub, &format!("{path}."), rows);
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
