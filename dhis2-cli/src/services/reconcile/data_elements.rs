//! Data element reconciliation

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use super::mapper::{IdCodeMapper, NameMapper, SeedSource};
use super::merge::{Overlay, RowFields};
use super::validation::{AxisGroups, DATA_ELEMENT_AXES};
use super::{Accepted, Reconciled, accept_rows};
use crate::api::metadata::{CurrentMetadata, D2Object};
use crate::metadata::DataElement;

/// Fields of a data element owned by the spreadsheet
fn row_fields(data_element: &DataElement) -> Map<String, Value> {
    RowFields::new()
        .field("name", data_element.name.as_str())
        .field("shortName", data_element.short_name.as_str())
        .optional("formName", data_element.form_name.as_deref())
        .optional("description", data_element.description.as_deref())
        .field("code", data_element.code.as_str())
        .field("valueType", data_element.value_type.as_str())
        .field("aggregationType", data_element.aggregation_type.as_str())
        .field("zeroIsSignificant", data_element.zero_is_significant)
        .optional("fieldMask", data_element.field_mask.as_deref())
        .build()
}

/// Validate, identify and merge data element rows against the snapshot
pub fn reconcile_data_elements<'a, S: SeedSource>(
    current: &CurrentMetadata,
    rows: &'a [DataElement],
    seeds: S,
) -> Result<Reconciled<'a, DataElement>> {
    let axes = AxisGroups::locate(&current.data_element_group_sets, DATA_ELEMENT_AXES)
        .context("Data element group sets do not match the expected taxonomy")?;

    let ids = IdCodeMapper::with_seed_source(&current.data_elements, seeds);
    let category_combos = NameMapper::new(&current.category_combos);
    let option_sets = NameMapper::new(&current.option_sets);

    let accepted = accept_rows(rows, &axes, &ids);

    let entities = accepted
        .iter()
        .map(|Accepted { id, row }| {
            let category_combo = category_combos.get_ref(row.category_combo_name.as_deref());
            if category_combo.is_none() && row.category_combo_name.is_some() {
                log::debug!(
                    "Data element {}: category combo '{}' not found",
                    row.code,
                    row.category_combo_name.as_deref().unwrap_or_default()
                );
            }

            Overlay::new()
                .set("domainType", "AGGREGATE")
                .layer_opt(ids.get(&row.code).map(D2Object::to_fields))
                .set("id", id.as_str())
                .layer(row_fields(row))
                .reference("categoryCombo", category_combo)
                .reference("optionSet", option_sets.get_ref(row.option_set.as_deref()))
                .build()
        })
        .collect();

    log::info!(
        "Data elements: {} rows, {} accepted",
        rows.len(),
        accepted.len()
    );

    Ok(Reconciled { entities, accepted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::reconcile::diff_groups;
    use crate::services::reconcile::fixtures::{
        CountingSeed, data_element, de_group, server_object, snapshot,
    };
    use crate::api::uid::is_valid_uid;
    use serde_json::json;

    #[test]
    fn test_existing_code_keeps_server_id_and_fields() {
        let mut current = snapshot();
        current.data_elements = vec![server_object(
            "abc12345678",
            "DE1",
            json!({
                "name": "Stale name",
                "domainType": "TRACKER",
                "legendSets": [{ "id": "lgs00000001" }],
                "categoryCombo": { "id": "ccOther0001" }
            }),
        )];

        let mut row = data_element("DE1");
        row.description = Some("Fresh description".to_string());
        let rows = vec![row];

        let reconciled = reconcile_data_elements(&current, &rows, CountingSeed::default()).unwrap();
        let entity = &reconciled.entities[0];

        assert_eq!(entity["id"], json!("abc12345678"));
        assert_eq!(entity["name"], json!("DE1 name"));
        assert_eq!(entity["description"], json!("Fresh description"));
        // Server fields the row does not carry survive
        assert_eq!(entity["domainType"], json!("TRACKER"));
        assert_eq!(entity["legendSets"], json!([{ "id": "lgs00000001" }]));
        // Resolved references replace stale ones
        assert_eq!(entity["categoryCombo"], json!({ "id": "ccDefault01" }));
        assert!(!entity.contains_key("optionSet"));
    }

    #[test]
    fn test_new_rows_get_fresh_distinct_ids() {
        let current = snapshot();
        let rows = vec![data_element("NEW"), data_element("NEW")];

        let reconciled = reconcile_data_elements(&current, &rows, CountingSeed::default()).unwrap();
        let ids: Vec<&str> = reconciled.accepted.iter().map(|a| a.id.as_str()).collect();

        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert!(ids.iter().all(|id| is_valid_uid(id)));
        assert_eq!(reconciled.entities[0]["domainType"], json!("AGGREGATE"));
        assert_eq!(reconciled.entities[0]["valueType"], json!("NUMBER"));
        assert_eq!(reconciled.entities[0]["zeroIsSignificant"], json!(false));
    }

    #[test]
    fn test_invalid_group_drops_row_everywhere() {
        let current = snapshot();
        let mut bad = data_element("DE1");
        bad.group_origin = "INTERNAL".to_string();
        let rows = vec![bad, data_element("DE2")];

        let reconciled = reconcile_data_elements(&current, &rows, CountingSeed::default()).unwrap();
        assert_eq!(reconciled.accepted.len(), 1);
        assert!(reconciled.entities.iter().all(|e| e["code"] != json!("DE1")));

        let groups = diff_groups(&current.data_element_groups, &reconciled.assignments());
        let accepted_id = reconciled.accepted[0].id.as_str();
        for group in &groups {
            assert!(group.data_elements.iter().all(|m| m.id == accepted_id));
        }
    }

    #[test]
    fn test_missing_group_set_is_fatal() {
        let mut current = snapshot();
        current
            .data_element_group_sets
            .retain(|set| set.code.as_deref() != Some("GL_DETYPE_DEGROUPSET"));

        let rows = vec![data_element("DE1")];
        let err = reconcile_data_elements(&current, &rows, CountingSeed::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("code=GL_DETYPE_DEGROUPSET"));
    }

    #[test]
    fn test_reassignment_between_groups() {
        let mut current = snapshot();
        current.data_elements = vec![
            server_object("deX00000001", "X", json!({})),
            server_object("deY00000001", "Y", json!({})),
        ];
        current.data_element_groups = vec![
            de_group("degShelter1", "Shelter", &["deX00000001", "deY00000001"]),
            de_group("degWASH0001", "WASH", &["deW00000001"]),
        ];

        let mut x = data_element("X");
        x.group_core_competency = "WASH".to_string();
        let rows = vec![x, data_element("Z")];

        let reconciled = reconcile_data_elements(&current, &rows, CountingSeed::default()).unwrap();
        let z_id = reconciled.accepted[1].id.clone();
        let groups = diff_groups(&current.data_element_groups, &reconciled.assignments());

        let shelter = groups.iter().find(|g| g.name == "Shelter").unwrap();
        let shelter_ids: Vec<&str> = shelter.data_elements.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(shelter_ids, vec!["deY00000001", z_id.as_str()]);

        let wash = groups.iter().find(|g| g.name == "WASH").unwrap();
        let wash_ids: Vec<&str> = wash.data_elements.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(wash_ids, vec!["deW00000001", "deX00000001"]);
    }
}
