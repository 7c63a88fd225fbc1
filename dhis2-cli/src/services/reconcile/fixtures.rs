//! Shared test fixtures: a small server snapshot with every axis group set

use std::sync::atomic::{AtomicU32, Ordering};

use serde_json::{Map, json};

use crate::api::metadata::models::D2GroupSummary;
use crate::api::metadata::{
    CurrentMetadata, D2DataElementGroup, D2DataElementGroupSet, D2IndicatorGroup,
    D2IndicatorGroupSet, D2Object, NamedRef, Ref,
};
use crate::metadata::{AggregationType, DataElement, Indicator, ValueType};

use super::mapper::SeedSource;

/// Seed source returning `<code>-<n>` with a per-instance counter
#[derive(Default)]
pub struct CountingSeed(AtomicU32);

impl Clone for CountingSeed {
    fn clone(&self) -> Self {
        Self(AtomicU32::new(self.0.load(Ordering::Relaxed)))
    }
}

impl SeedSource for CountingSeed {
    fn seed(&self, code: &str) -> String {
        let n = self.0.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", code, n)
    }
}

fn summaries(names: &[&str]) -> Vec<D2GroupSummary> {
    names
        .iter()
        .map(|name| D2GroupSummary {
            id: None,
            code: None,
            name: name.to_string(),
        })
        .collect()
}

fn de_group_set(code: &str, groups: &[&str]) -> D2DataElementGroupSet {
    D2DataElementGroupSet {
        name: Some(code.to_string()),
        code: Some(code.to_string()),
        data_element_groups: summaries(groups),
    }
}

fn ind_group_set(name: &str, groups: &[&str]) -> D2IndicatorGroupSet {
    D2IndicatorGroupSet {
        name: Some(name.to_string()),
        code: None,
        indicator_groups: summaries(groups),
    }
}

pub fn de_group(id: &str, name: &str, members: &[&str]) -> D2DataElementGroup {
    D2DataElementGroup {
        id: id.to_string(),
        name: name.to_string(),
        data_elements: members.iter().map(|id| Ref::new(*id)).collect(),
        fields: Map::new(),
    }
}

pub fn ind_group(id: &str, name: &str, members: &[&str]) -> D2IndicatorGroup {
    D2IndicatorGroup {
        id: id.to_string(),
        name: name.to_string(),
        indicators: members.iter().map(|id| Ref::new(*id)).collect(),
        fields: Map::new(),
    }
}

pub fn server_object(id: &str, code: &str, extra: serde_json::Value) -> D2Object {
    D2Object {
        id: id.to_string(),
        code: Some(code.to_string()),
        fields: extra.as_object().cloned().unwrap_or_default(),
    }
}

/// Snapshot with group sets for both kinds:
///
/// - origin: NRC, Partner
/// - status: Active, Retired
/// - core competency: Shelter, WASH
/// - theme: Beds, Water
/// - type (data elements only): Output, Outcome
pub fn snapshot() -> CurrentMetadata {
    CurrentMetadata {
        data_element_group_sets: vec![
            de_group_set("GL_DEORIGIN_DEGROUPSET", &["NRC", "Partner"]),
            de_group_set("GL_DESTATUS_DEGROUPSET", &["Active", "Retired"]),
            de_group_set("GL_CoreComp_DEGROUPSET", &["Shelter", "WASH"]),
            de_group_set("GL_DETHEME_DEGROUPSET", &["Beds", "Water"]),
            de_group_set("GL_DETYPE_DEGROUPSET", &["Output", "Outcome"]),
        ],
        indicator_group_sets: vec![
            ind_group_set("Indicator Origin", &["NRC", "Partner"]),
            ind_group_set("Status", &["Active", "Retired"]),
            ind_group_set("Core Competency/Area", &["Shelter", "WASH"]),
            ind_group_set("Theme", &["Beds", "Water"]),
        ],
        data_element_groups: vec![
            de_group("degNRC00001", "NRC", &[]),
            de_group("degActive01", "Active", &[]),
            de_group("degShelter1", "Shelter", &[]),
            de_group("degWASH0001", "WASH", &[]),
            de_group("degBeds0001", "Beds", &[]),
            de_group("degOutput01", "Output", &[]),
        ],
        indicator_groups: vec![
            ind_group("igNRC000001", "NRC", &[]),
            ind_group("igActive001", "Active", &[]),
            ind_group("igShelter01", "Shelter", &[]),
            ind_group("igWASH00001", "WASH", &[]),
        ],
        category_combos: vec![NamedRef {
            id: "ccDefault01".to_string(),
            name: "default".to_string(),
        }],
        option_sets: vec![NamedRef {
            id: "osYesNo0001".to_string(),
            name: "Yes/No".to_string(),
        }],
        indicator_types: vec![NamedRef {
            id: "itPercent01".to_string(),
            name: "Percentage".to_string(),
        }],
        ..Default::default()
    }
}

/// Valid data element assigned to NRC / Active / Shelter / Beds / Output
pub fn data_element(code: &str) -> DataElement {
    DataElement {
        id: None,
        name: format!("{} name", code),
        short_name: format!("{} short", code),
        form_name: None,
        description: None,
        code: code.to_string(),
        category_combo_name: Some("default".to_string()),
        value_type: ValueType::Number,
        aggregation_type: AggregationType::Sum,
        option_set: None,
        zero_is_significant: false,
        field_mask: None,
        group_origin: "NRC".to_string(),
        group_status: "Active".to_string(),
        group_core_competency: "Shelter".to_string(),
        group_theme: "Beds".to_string(),
        group_type: "Output".to_string(),
    }
}

/// Valid indicator assigned to NRC / Active / Shelter, no theme
pub fn indicator(code: &str) -> Indicator {
    Indicator {
        id: None,
        name: format!("{} name", code),
        short_name: format!("{} short", code),
        form_name: None,
        description: None,
        code: code.to_string(),
        indicator_type: Some("Percentage".to_string()),
        group_origin: "NRC".to_string(),
        group_status: "Active".to_string(),
        group_core_competency: "Shelter".to_string(),
        group_theme: None,
    }
}

pub fn existing_indicator(id: &str, code: &str) -> D2Object {
    server_object(
        id,
        code,
        json!({ "name": "Old name", "numerator": "#{a}", "denominator": "1" }),
    )
}
