//! Data set and section models for the section fix-up

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::metadata::Ref;

/// Attribute code marking data sets generated by the data set configuration app
pub const CREATED_BY_APP_ATTRIBUTE: &str = "GL_CREATED_BY_DATASET_CONFIGURATION";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttributeCode {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct D2AttributeValue {
    #[serde(default)]
    pub value: Value,
    pub attribute: AttributeCode,
}

/// Section with every owned field preserved for the round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct D2Section {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub data_set: Ref,
    #[serde(default)]
    pub greyed_fields: Vec<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct D2DataSet {
    pub id: String,
    #[serde(default)]
    pub attribute_values: Vec<D2AttributeValue>,
    #[serde(default)]
    pub sections: Vec<D2Section>,
}

impl D2DataSet {
    /// Whether the data set carries the app attribute set to `"true"`
    pub fn is_created_by_app(&self) -> bool {
        self.attribute_values.iter().any(|av| {
            av.attribute.code.as_deref() == Some(CREATED_BY_APP_ATTRIBUTE)
                && av.value.as_str() == Some("true")
        })
    }
}

/// Data element group of the core competency group set
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoreCompetency {
    pub id: String,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreCompetencySet {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub data_element_groups: Vec<CoreCompetency>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSetsResponse {
    #[serde(default)]
    pub data_sets: Vec<D2DataSet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreCompetencySetsResponse {
    #[serde(default)]
    pub data_element_group_sets: Vec<CoreCompetencySet>,
}
