//! Value providers for the in-memory matcher.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Supplies the values an entity has for a field.
///
/// `field` is the canonical path without the map key (`NAME`, `TAG.name`,
/// `METADATA`); `sub_key` is the map key when there is one. An empty result
/// means the entity has no value.
pub trait FieldValues {
    fn values(&self, field: &str, sub_key: Option<&str>) -> Vec<String>;
}

impl<F> FieldValues for F
where
    F: Fn(&str, Option<&str>) -> Vec<String>,
{
    fn values(&self, field: &str, sub_key: Option<&str>) -> Vec<String> {
        self(field, sub_key)
    }
}

/// Field values held in memory. Paths compare case-insensitively, map keys exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValueMap {
    entries: HashMap<(String, Option<String>), Vec<String>>,
}

impl FieldValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.push(field, None, value.into());
        self
    }

    pub fn with_all<S: Into<String>>(
        mut self,
        field: &str,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        for value in values {
            self.push(field, None, value.into());
        }
        self
    }

    pub fn with_key(mut self, field: &str, key: &str, value: impl Into<String>) -> Self {
        self.push(field, Some(key), value.into());
        self
    }

    pub fn push(&mut self, field: &str, key: Option<&str>, value: String) {
        self.entries
            .entry(entry_key(field, key))
            .or_default()
            .push(value);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load from a JSON object.
    ///
    /// Scalars and arrays of scalars are the values of a field; a nested
    /// object holds map keys. `null` entries are skipped.
    ///
    /// ```json
    /// {"NAME": "edge-1", "TAG.name": ["alpha", "beta"], "METADATA": {"region": "eu"}}
    /// ```
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: Map<String, Value> = serde_json::from_str(json)?;
        let mut map = Self::new();
        for (field, value) in &raw {
            match value {
                Value::Object(keys) => {
                    for (key, value) in keys {
                        map.push_json(field, Some(key), value);
                    }
                }
                value => map.push_json(field, None, value),
            }
        }
        Ok(map)
    }

    fn push_json(&mut self, field: &str, key: Option<&str>, value: &Value) {
        match value {
            Value::Array(items) => {
                for item in items {
                    self.push_json(field, key, item);
                }
            }
            Value::Null | Value::Object(_) => {}
            Value::String(text) => self.push(field, key, text.clone()),
            scalar => self.push(field, key, scalar.to_string()),
        }
    }
}

impl FieldValues for FieldValueMap {
    fn values(&self, field: &str, sub_key: Option<&str>) -> Vec<String> {
        self.entries
            .get(&entry_key(field, sub_key))
            .cloned()
            .unwrap_or_default()
    }
}

fn entry_key(field: &str, key: Option<&str>) -> (String, Option<String>) {
    (field.to_uppercase(), key.map(str::to_string))
}
