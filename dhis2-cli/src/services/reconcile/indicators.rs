//! Indicator reconciliation

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use super::mapper::{IdCodeMapper, NameMapper, SeedSource};
use super::merge::{Overlay, RowFields};
use super::validation::{AxisGroups, INDICATOR_AXES};
use super::{Reconciled, accept_rows};
use crate::api::metadata::{CurrentMetadata, D2Object};
use crate::metadata::Indicator;

fn row_fields(indicator: &Indicator) -> Map<String, Value> {
    RowFields::new()
        .field("name", indicator.name.as_str())
        .field("shortName", indicator.short_name.as_str())
        .optional("formName", indicator.form_name.as_deref())
        .optional("description", indicator.description.as_deref())
        .field("code", indicator.code.as_str())
        .build()
}

/// Validate, identify and merge indicator rows against the snapshot
pub fn reconcile_indicators<'a, S: SeedSource>(
    current: &CurrentMetadata,
    rows: &'a [Indicator],
    seeds: S,
) -> Result<Reconciled<'a, Indicator>> {
    let axes = AxisGroups::locate(&current.indicator_group_sets, INDICATOR_AXES)
        .context("Indicator group sets do not match the expected taxonomy")?;

    let ids = IdCodeMapper::with_seed_source(&current.indicators, seeds);
    let indicator_types = NameMapper::new(&current.indicator_types);

    let accepted = accept_rows(rows, &axes, &ids);

    let entities = accepted
        .iter()
        .map(|accepted| {
            let row = accepted.row;
            Overlay::new()
                .layer_opt(ids.get(&row.code).map(D2Object::to_fields))
                .set("id", accepted.id.as_str())
                .layer(row_fields(row))
                .reference(
                    "indicatorType",
                    indicator_types.get_ref(row.indicator_type.as_deref()),
                )
                .build()
        })
        .collect();

    log::info!(
        "Indicators: {} rows, {} accepted",
        rows.len(),
        accepted.len()
    );

    Ok(Reconciled { entities, accepted })
}
