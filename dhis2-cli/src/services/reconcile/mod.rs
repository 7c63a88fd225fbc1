//! Reconciliation of spreadsheet metadata against the server snapshot
//!
//! Rows are validated against the axis group sets, given a stable id, merged
//! over the matching server object and finally used to compute the group
//! membership changes for their kind.

pub mod data_elements;
pub mod groups;
pub mod indicators;
pub mod mapper;
pub mod merge;
pub mod validation;

#[cfg(test)]
pub mod fixtures;

use serde_json::{Map, Value};

use crate::metadata::{DataElement, GroupAxis, Indicator};
use groups::Assignment;
use mapper::{IdCodeMapper, SeedSource};
use validation::AxisGroups;

pub use data_elements::reconcile_data_elements;
pub use groups::diff_groups;
pub use indicators::reconcile_indicators;
pub use mapper::TimeRandomSeed;

/// Spreadsheet row that can be matched and validated
pub trait ImportRow {
    /// Human readable kind, used in logs
    const KIND: &'static str;

    fn id(&self) -> Option<&str>;
    fn code(&self) -> &str;
    fn group_assignments(&self) -> Vec<(GroupAxis, Option<&str>)>;
}

impl ImportRow for DataElement {
    const KIND: &'static str = "data element";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn group_assignments(&self) -> Vec<(GroupAxis, Option<&str>)> {
        DataElement::group_assignments(self)
    }
}

impl ImportRow for Indicator {
    const KIND: &'static str = "indicator";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn group_assignments(&self) -> Vec<(GroupAxis, Option<&str>)> {
        Indicator::group_assignments(self)
    }
}

/// A validated row with its resolved id
#[derive(Debug, Clone, PartialEq)]
pub struct Accepted<'a, T> {
    pub id: String,
    pub row: &'a T,
}

impl<T: ImportRow> Accepted<'_, T> {
    /// Names of every group the row is assigned to
    pub fn assignment(&self) -> Assignment<'_> {
        Assignment {
            id: &self.id,
            groups: self
                .row
                .group_assignments()
                .into_iter()
                .filter_map(|(_, name)| name)
                .collect(),
        }
    }
}

/// Upsert-ready entities of one kind plus the rows they came from
#[derive(Debug, Clone)]
pub struct Reconciled<'a, T> {
    pub entities: Vec<Map<String, Value>>,
    pub accepted: Vec<Accepted<'a, T>>,
}

impl<T: ImportRow> Reconciled<'_, T> {
    pub fn assignments(&self) -> Vec<Assignment<'_>> {
        self.accepted.iter().map(Accepted::assignment).collect()
    }
}

/// Validate every row against the axis groups and resolve ids for the valid
/// ones. Invalid rows are logged and dropped.
pub fn accept_rows<'a, T: ImportRow, S: SeedSource>(
    rows: &'a [T],
    axes: &AxisGroups,
    ids: &IdCodeMapper<'_, S>,
) -> Vec<Accepted<'a, T>> {
    rows.iter()
        .filter_map(|row| {
            let errors = axes.validate(&row.group_assignments());
            if errors.is_empty() {
                Some(Accepted {
                    id: ids.existing_or_random_id(row.id(), row.code()),
                    row,
                })
            } else {
                let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                log::warn!(
                    "Skipping {} {}: {}",
                    T::KIND,
                    row.code(),
                    messages.join("; ")
                );
                None
            }
        })
        .collect()
}
