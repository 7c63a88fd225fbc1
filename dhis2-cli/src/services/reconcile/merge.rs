//! Ordered field overlay for building upsert objects
//!
//! Layers are applied in call order and later layers win. A typical object is
//! built as: kind defaults, existing server fields, resolved id, spreadsheet
//! fields, resolved references.

use serde_json::{Map, Value, json};

use crate::api::metadata::Ref;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    fields: Map<String, Value>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply every field of `fields` over the current ones
    pub fn layer(mut self, fields: Map<String, Value>) -> Self {
        for (key, value) in fields {
            self.fields.insert(key, value);
        }
        self
    }

    /// Apply a layer only when present
    pub fn layer_opt(self, fields: Option<Map<String, Value>>) -> Self {
        match fields {
            Some(fields) => self.layer(fields),
            None => self,
        }
    }

    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Set a reference field. An unresolved reference clears the field, so the
    /// object ends up with no reference rather than a stale one.
    pub fn reference(mut self, key: &str, reference: Option<Ref>) -> Self {
        match reference {
            Some(reference) => {
                self.fields.insert(key.to_string(), json!({ "id": reference.id }));
            }
            None => {
                self.fields.remove(key);
            }
        }
        self
    }

    pub fn build(self) -> Map<String, Value> {
        self.fields
    }
}

/// Collects the spreadsheet fields of one row, skipping absent optionals
#[derive(Debug, Default)]
pub struct RowFields {
    fields: Map<String, Value>,
}

impl RowFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn optional(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.field(key, value),
            None => self,
        }
    }

    pub fn build(self) -> Map<String, Value> {
        self.fields
    }
}
