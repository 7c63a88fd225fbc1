//! Query builder for the `/api/metadata` export endpoint
//!
//! Each requested type becomes `<type>=true` plus `<type>:fields=...` and an
//! optional `<type>:filter=...`, which restricts the export to those types.

/// Field selection for one metadata type
#[derive(Debug, Clone, PartialEq)]
struct TypeQuery {
    metadata_type: String,
    fields: String,
    filters: Vec<String>,
}

/// Metadata export query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataQuery {
    types: Vec<TypeQuery>,
}

impl MetadataQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a metadata type with a DHIS2 field filter (e.g. `:owner`, `id,name`)
    pub fn fields(mut self, metadata_type: &str, fields: &str) -> Self {
        self.types.push(TypeQuery {
            metadata_type: metadata_type.to_string(),
            fields: fields.to_string(),
            filters: Vec::new(),
        });
        self
    }

    /// Add a `property:operator:value` filter to the last requested type
    pub fn filter(mut self, filter: &str) -> Self {
        if let Some(last) = self.types.last_mut() {
            last.filters.push(filter.to_string());
        }
        self
    }

    /// Query string parameters, in request order
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        for query in &self.types {
            params.push((query.metadata_type.clone(), "true".to_string()));
            params.push((format!("{}:fields", query.metadata_type), query.fields.clone()));
            for filter in &query.filters {
                params.push((format!("{}:filter", query.metadata_type), filter.clone()));
            }
        }
        params
    }
}
