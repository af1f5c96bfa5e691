#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for fleetql field catalogs.
//!
//! Two layers:
//! - **Deserialization layer**: 1:1 mapping to the JSON catalog format
//! - **Analysis layer**: validated, immutable catalogs used by the binder and compilers
//!
//! A catalog is closed: every filterable field is declared up front with its
//! kind, value type and the routing information the store compiler needs.
//! Only map keys are open.

use std::sync::Arc;

use indexmap::IndexMap;

mod invariants;
pub mod utils;

#[cfg(test)]
mod lib_tests;

use utils::canonical_name;

// ============================================================================
// Deserialization Layer
// ============================================================================

/// Raw catalog definition as found in a JSON catalog file.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct RawCatalog {
    pub entity: String,
    pub table: String,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default)]
    pub fields: Vec<RawField>,
}

fn default_id_column() -> String {
    "id".to_string()
}

/// Raw field definition. The `kind` tag selects the variant.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct RawField {
    pub name: String,
    #[serde(flatten)]
    pub kind: RawFieldKind,
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawFieldKind {
    String {
        column: String,
    },
    Number {
        column: String,
    },
    Boolean {
        column: String,
    },
    Enum {
        column: String,
        values: Vec<String>,
    },
    Timestamp {
        column: String,
    },
    Map {
        table: String,
        owner_column: String,
        key_column: String,
        value_column: String,
        #[serde(default)]
        default_key: Option<String>,
    },
    SubEntity {
        foreign_key: String,
        catalog: Box<RawCatalog>,
    },
    Collection {
        #[serde(default)]
        link: Option<RawLink>,
        owner_column: String,
        #[serde(default)]
        default_field: Option<String>,
        catalog: Box<RawCatalog>,
    },
}

/// Link table of a many-to-many collection.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct RawLink {
    pub table: String,
    pub child_column: String,
}

/// Parse catalog JSON into the raw layer.
pub fn parse_catalog(json: &str) -> Result<RawCatalog, serde_json::Error> {
    serde_json::from_str(json)
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog `{entity}` declares field `{name}` twice")]
    DuplicateField { entity: String, name: String },

    #[error("field `{field}` names default sub-field `{default}` which is not a leaf of its catalog")]
    InvalidDefaultField { field: String, default: String },

    #[error("enumerated field `{0}` declares no values")]
    EmptyEnumeration(String),

    #[error("invalid catalog json: {0}")]
    Json(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Json(err.to_string())
    }
}

// ============================================================================
// Analysis Layer
// ============================================================================

/// Type of the values stored under a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Number,
    Boolean,
    EnumSet,
    Timestamp,
}

impl ValueType {
    /// Whether `=gt=` and friends have a natural meaning for this type.
    pub fn is_ordered(self) -> bool {
        matches!(self, ValueType::Number | ValueType::Timestamp)
    }

    /// Numeric types compare by value, not by text.
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueType::Number | ValueType::Timestamp)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::EnumSet => "enum",
            ValueType::Timestamp => "timestamp",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a field. Leaves (`Simple`, `Enumerated`, `Timestamp`) accept no sub-path.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Simple,
    Enumerated(Vec<String>),
    Timestamp,
    Map {
        default_key: Option<String>,
    },
    SubEntity(FieldCatalog),
    Collection {
        catalog: FieldCatalog,
        default_field: Option<String>,
    },
}

/// Where the store compiler finds a field's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendPath {
    /// Column of the owning row.
    Column(String),
    /// Key/value rows: `table.owner_column = owner.id`, keyed by `key_column`.
    KeyValue {
        table: String,
        owner_column: String,
        key_column: String,
        value_column: String,
    },
    /// To-one reference: `owner.foreign_key = child.id`.
    Reference { foreign_key: String },
    /// One-to-many rows: `child.owner_column = owner.id`.
    Rows { owner_column: String },
    /// Many-to-many through `table`: `table.owner_column = owner.id`
    /// and `child.id = table.child_column`.
    Link {
        table: String,
        owner_column: String,
        child_column: String,
    },
}

/// One filterable field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    value_type: ValueType,
    backend_path: BackendPath,
}

impl FieldDescriptor {
    pub fn simple(
        name: impl Into<String>,
        column: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Simple,
            value_type,
            backend_path: BackendPath::Column(column.into()),
        }
    }

    pub fn string(name: impl Into<String>, column: impl Into<String>) -> Self {
        Self::simple(name, column, ValueType::String)
    }

    pub fn number(name: impl Into<String>, column: impl Into<String>) -> Self {
        Self::simple(name, column, ValueType::Number)
    }

    pub fn boolean(name: impl Into<String>, column: impl Into<String>) -> Self {
        Self::simple(name, column, ValueType::Boolean)
    }

    pub fn timestamp(name: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Timestamp,
            value_type: ValueType::Timestamp,
            backend_path: BackendPath::Column(column.into()),
        }
    }

    pub fn enumerated<S: Into<String>>(
        name: impl Into<String>,
        column: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Enumerated(values.into_iter().map(Into::into).collect()),
            value_type: ValueType::EnumSet,
            backend_path: BackendPath::Column(column.into()),
        }
    }

    /// Key/value field stored in `table`, one row per key.
    pub fn map(
        name: impl Into<String>,
        table: impl Into<String>,
        owner_column: impl Into<String>,
        key_column: impl Into<String>,
        value_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Map { default_key: None },
            value_type: ValueType::String,
            backend_path: BackendPath::KeyValue {
                table: table.into(),
                owner_column: owner_column.into(),
                key_column: key_column.into(),
                value_column: value_column.into(),
            },
        }
    }

    pub fn sub_entity(
        name: impl Into<String>,
        foreign_key: impl Into<String>,
        catalog: FieldCatalog,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::SubEntity(catalog),
            value_type: ValueType::String,
            backend_path: BackendPath::Reference {
                foreign_key: foreign_key.into(),
            },
        }
    }

    /// One-to-many collection whose rows carry `owner_column`.
    pub fn collection(
        name: impl Into<String>,
        owner_column: impl Into<String>,
        catalog: FieldCatalog,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Collection {
                catalog,
                default_field: None,
            },
            value_type: ValueType::String,
            backend_path: BackendPath::Rows {
                owner_column: owner_column.into(),
            },
        }
    }

    /// Many-to-many collection joined through `link_table`.
    pub fn linked_collection(
        name: impl Into<String>,
        link_table: impl Into<String>,
        owner_column: impl Into<String>,
        child_column: impl Into<String>,
        catalog: FieldCatalog,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Collection {
                catalog,
                default_field: None,
            },
            value_type: ValueType::String,
            backend_path: BackendPath::Link {
                table: link_table.into(),
                owner_column: owner_column.into(),
                child_column: child_column.into(),
            },
        }
    }

    /// Sub-field used when a collection is filtered without a sub-path,
    /// or key used when a map is filtered without one.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        let default = default.into();
        match &mut self.kind {
            FieldKind::Collection { catalog, default_field } => {
                if let Some(child) = catalog.get(&default) {
                    self.value_type = child.value_type;
                }
                *default_field = Some(default);
            }
            FieldKind::Map { default_key } => *default_key = Some(default),
            _ => {}
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn backend_path(&self) -> &BackendPath {
        &self.backend_path
    }

    /// Column name for leaves.
    pub fn column(&self) -> Option<&str> {
        match &self.backend_path {
            BackendPath::Column(column) => Some(column),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Simple | FieldKind::Enumerated(_) | FieldKind::Timestamp
        )
    }

    pub fn is_map(&self) -> bool {
        matches!(self.kind, FieldKind::Map { .. })
    }

    /// Collections may hold any number of values per entity.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self.kind, FieldKind::Collection { .. })
    }

    pub fn sub_catalog(&self) -> Option<&FieldCatalog> {
        match &self.kind {
            FieldKind::SubEntity(catalog) | FieldKind::Collection { catalog, .. } => Some(catalog),
            _ => None,
        }
    }

    /// Default sub-field (collections) or default key (maps).
    pub fn default_child(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Collection { default_field, .. } => default_field.as_deref(),
            FieldKind::Map { default_key } => default_key.as_deref(),
            _ => None,
        }
    }

    /// Whether the bare field name is a complete field reference.
    pub fn usable_bare(&self) -> bool {
        self.is_leaf() || self.default_child().is_some()
    }

    pub fn enum_values(&self) -> &[String] {
        match &self.kind {
            FieldKind::Enumerated(values) => values,
            _ => &[],
        }
    }
}

/// Closed schema of one entity type.
///
/// Immutable after [`CatalogBuilder::build`]; descriptors are reference
/// counted so bound filters can hold on to them without borrowing the catalog.
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    entity: String,
    table: String,
    id_column: String,
    fields: IndexMap<String, Arc<FieldDescriptor>>,
}

impl FieldCatalog {
    pub fn builder(entity: impl Into<String>, table: impl Into<String>) -> CatalogBuilder {
        CatalogBuilder {
            entity: entity.into(),
            table: table.into(),
            id_column: default_id_column(),
            fields: Vec::new(),
        }
    }

    /// Validate a raw catalog into the analysis layer.
    pub fn from_raw(raw: &RawCatalog) -> Result<Self, CatalogError> {
        let mut builder = FieldCatalog::builder(&raw.entity, &raw.table).id_column(&raw.id_column);
        for field in &raw.fields {
            builder = builder.field(FieldDescriptor::from_raw(field)?);
        }
        builder.build()
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::from_raw(&parse_catalog(json)?)
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Arc<FieldDescriptor>> {
        self.fields.get(&canonical_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&canonical_name(name))
    }

    /// Declared field names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.values().map(|d| d.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<FieldDescriptor>> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub struct CatalogBuilder {
    entity: String,
    table: String,
    id_column: String,
    fields: Vec<FieldDescriptor>,
}

impl CatalogBuilder {
    pub fn id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = column.into();
        self
    }

    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    pub fn build(self) -> Result<FieldCatalog, CatalogError> {
        let mut fields = IndexMap::with_capacity(self.fields.len());
        for descriptor in self.fields {
            validate_descriptor(&descriptor)?;
            let key = canonical_name(descriptor.name());
            if fields.contains_key(&key) {
                return Err(CatalogError::DuplicateField {
                    entity: self.entity,
                    name: descriptor.name,
                });
            }
            fields.insert(key, Arc::new(descriptor));
        }
        Ok(FieldCatalog {
            entity: self.entity,
            table: self.table,
            id_column: self.id_column,
            fields,
        })
    }
}

fn validate_descriptor(descriptor: &FieldDescriptor) -> Result<(), CatalogError> {
    match descriptor.kind() {
        FieldKind::Enumerated(values) if values.is_empty() => {
            Err(CatalogError::EmptyEnumeration(descriptor.name().to_string()))
        }
        FieldKind::Collection {
            catalog,
            default_field: Some(default),
        } => match catalog.get(default) {
            Some(child) if child.is_leaf() => Ok(()),
            _ => Err(CatalogError::InvalidDefaultField {
                field: descriptor.name().to_string(),
                default: default.clone(),
            }),
        },
        _ => Ok(()),
    }
}

impl FieldDescriptor {
    fn from_raw(raw: &RawField) -> Result<Self, CatalogError> {
        let name = raw.name.as_str();
        let descriptor = match &raw.kind {
            RawFieldKind::String { column } => Self::string(name, column),
            RawFieldKind::Number { column } => Self::number(name, column),
            RawFieldKind::Boolean { column } => Self::boolean(name, column),
            RawFieldKind::Timestamp { column } => Self::timestamp(name, column),
            RawFieldKind::Enum { column, values } => Self::enumerated(name, column, values.clone()),
            RawFieldKind::Map {
                table,
                owner_column,
                key_column,
                value_column,
                default_key,
            } => {
                let map = Self::map(name, table, owner_column, key_column, value_column);
                match default_key {
                    Some(key) => map.with_default(key),
                    None => map,
                }
            }
            RawFieldKind::SubEntity {
                foreign_key,
                catalog,
            } => Self::sub_entity(name, foreign_key, FieldCatalog::from_raw(catalog)?),
            RawFieldKind::Collection {
                link,
                owner_column,
                default_field,
                catalog,
            } => {
                let catalog = FieldCatalog::from_raw(catalog)?;
                let collection = match link {
                    Some(link) => Self::linked_collection(
                        name,
                        &link.table,
                        owner_column,
                        &link.child_column,
                        catalog,
                    ),
                    None => Self::collection(name, owner_column, catalog),
                };
                match default_field {
                    Some(default) => collection.with_default(default),
                    None => collection,
                }
            }
        };
        Ok(descriptor)
    }
}
