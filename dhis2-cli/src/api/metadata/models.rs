//! DHIS2 metadata models
//!
//! Server objects keep every field they were fetched with in a flattened map,
//! so that writing them back does not lose owner properties this crate never
//! looks at.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Bare identifier pointer (`{"id": "..."}`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ref {
    pub id: String,
}

impl Ref {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Identifier plus display name, used for reference collections
/// (category combos, option sets, indicator types)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

/// A full server object (data element, indicator) with all owner fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct D2Object {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl D2Object {
    /// All fields of the object, identifier and code included
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = self.fields.clone();
        fields.insert("id".to_string(), Value::String(self.id.clone()));
        if let Some(code) = &self.code {
            fields.insert("code".to_string(), Value::String(code.clone()));
        }
        fields
    }
}

/// Data element group with its current members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct D2DataElementGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub data_elements: Vec<Ref>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Indicator group with its current members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct D2IndicatorGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub indicators: Vec<Ref>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Group as listed inside a group set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct D2GroupSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct D2DataElementGroupSet {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub data_element_groups: Vec<D2GroupSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct D2IndicatorGroupSet {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub indicator_groups: Vec<D2GroupSummary>,
}

/// Snapshot of the server metadata the import reconciles against
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentMetadata {
    #[serde(default)]
    pub data_elements: Vec<D2Object>,
    #[serde(default)]
    pub data_element_groups: Vec<D2DataElementGroup>,
    #[serde(default)]
    pub data_element_group_sets: Vec<D2DataElementGroupSet>,
    #[serde(default)]
    pub indicators: Vec<D2Object>,
    #[serde(default)]
    pub indicator_groups: Vec<D2IndicatorGroup>,
    #[serde(default)]
    pub indicator_group_sets: Vec<D2IndicatorGroupSet>,
    #[serde(default)]
    pub category_combos: Vec<NamedRef>,
    #[serde(default)]
    pub option_sets: Vec<NamedRef>,
    #[serde(default)]
    pub indicator_types: Vec<NamedRef>,
}

/// Partial metadata payload posted to `/api/metadata`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataPayload {
    pub data_elements: Vec<Map<String, Value>>,
    pub data_element_groups: Vec<D2DataElementGroup>,
    pub indicators: Vec<Map<String, Value>>,
    pub indicator_groups: Vec<D2IndicatorGroup>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_keeps_unknown_fields() {
        let object: D2Object = serde_json::from_value(json!({
            "id": "deAbc123456",
            "code": "DE1",
            "name": "Beds",
            "domainType": "AGGREGATE",
            "legendSets": [{ "id": "lgs12345678" }]
        }))
        .unwrap();

        assert_eq!(object.code.as_deref(), Some("DE1"));
        assert_eq!(object.fields["domainType"], json!("AGGREGATE"));

        let fields = object.to_fields();
        assert_eq!(fields["id"], json!("deAbc123456"));
        assert_eq!(fields["code"], json!("DE1"));
        assert_eq!(fields["legendSets"], json!([{ "id": "lgs12345678" }]));
    }

    #[test]
    fn test_group_roundtrip_preserves_owner_fields() {
        let raw = json!({
            "id": "degShelter1",
            "name": "Shelter",
            "shortName": "Shelter",
            "dataElements": [{ "id": "deX00000001" }],
            "sharing": { "public": "rw------" }
        });
        let group: D2DataElementGroup = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(group.data_elements, vec![Ref::new("deX00000001")]);
        assert_eq!(serde_json::to_value(&group).unwrap(), raw);
    }

    #[test]
    fn test_empty_snapshot_defaults() {
        let current: CurrentMetadata = serde_json::from_value(json!({ "system": {} })).unwrap();
        assert!(current.data_elements.is_empty());
        assert!(current.indicator_group_sets.is_empty());
    }
}
