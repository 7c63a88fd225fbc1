//! Group assignment validation against the server's group sets
//!
//! Each classification axis (origin, status, core competency, ...) maps to a
//! group set on the server. A row may only name groups of the matching set.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Result, bail};

use crate::api::metadata::{D2DataElementGroupSet, D2IndicatorGroupSet};
use crate::metadata::GroupAxis;

/// A group name that is not part of its axis group set
#[derive(Debug, Clone, PartialEq)]
pub struct GroupValidationError {
    pub axis: GroupAxis,
    pub value: String,
    pub expected: Vec<String>,
}

impl fmt::Display for GroupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {} group: {} (expected: {})",
            self.axis,
            self.value,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for GroupValidationError {}

/// Check a claimed group name against the valid names of its axis.
/// An absent name is always valid.
pub fn validate_group(
    axis: GroupAxis,
    group_name: Option<&str>,
    valid_names: &[String],
) -> Result<(), GroupValidationError> {
    match group_name {
        None => Ok(()),
        Some(name) if valid_names.iter().any(|valid| valid == name) => Ok(()),
        Some(name) => Err(GroupValidationError {
            axis,
            value: name.to_string(),
            expected: valid_names.to_vec(),
        }),
    }
}

/// How an axis group set is identified on the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSetKey {
    Code(&'static str),
    Name(&'static str),
}

impl fmt::Display for GroupSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupSetKey::Code(code) => write!(f, "code={}", code),
            GroupSetKey::Name(name) => write!(f, "name={}", name),
        }
    }
}

pub const DATA_ELEMENT_AXES: &[(GroupAxis, GroupSetKey)] = &[
    (GroupAxis::Origin, GroupSetKey::Code("GL_DEORIGIN_DEGROUPSET")),
    (GroupAxis::Status, GroupSetKey::Code("GL_DESTATUS_DEGROUPSET")),
    (GroupAxis::CoreCompetency, GroupSetKey::Code("GL_CoreComp_DEGROUPSET")),
    (GroupAxis::Theme, GroupSetKey::Code("GL_DETHEME_DEGROUPSET")),
    (GroupAxis::Type, GroupSetKey::Code("GL_DETYPE_DEGROUPSET")),
];

pub const INDICATOR_AXES: &[(GroupAxis, GroupSetKey)] = &[
    (GroupAxis::Origin, GroupSetKey::Name("Indicator Origin")),
    (GroupAxis::Status, GroupSetKey::Name("Status")),
    (GroupAxis::CoreCompetency, GroupSetKey::Name("Core Competency/Area")),
    (GroupAxis::Theme, GroupSetKey::Name("Theme")),
];

/// Server group set with named member groups
pub trait GroupSet {
    fn name(&self) -> Option<&str>;
    fn code(&self) -> Option<&str>;
    fn group_names(&self) -> Vec<String>;

    fn matches(&self, key: GroupSetKey) -> bool {
        match key {
            GroupSetKey::Code(code) => self.code() == Some(code),
            GroupSetKey::Name(name) => self.name() == Some(name),
        }
    }
}

impl GroupSet for D2DataElementGroupSet {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    fn group_names(&self) -> Vec<String> {
        self.data_element_groups.iter().map(|g| g.name.clone()).collect()
    }
}

impl GroupSet for D2IndicatorGroupSet {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    fn group_names(&self) -> Vec<String> {
        self.indicator_groups.iter().map(|g| g.name.clone()).collect()
    }
}

/// Valid group names per axis for one entity kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisGroups {
    groups: BTreeMap<GroupAxis, Vec<String>>,
}

impl AxisGroups {
    /// Locate the group set of every axis; a missing set means the server
    /// taxonomy does not match and the import cannot proceed
    pub fn locate<S: GroupSet>(sets: &[S], axes: &[(GroupAxis, GroupSetKey)]) -> Result<Self> {
        let mut groups = BTreeMap::new();
        for (axis, key) in axes {
            let Some(set) = sets.iter().find(|set| set.matches(*key)) else {
                bail!("Cannot find group set: {}", key);
            };
            groups.insert(*axis, set.group_names());
        }
        Ok(Self { groups })
    }

    pub fn valid_names(&self, axis: GroupAxis) -> &[String] {
        self.groups.get(&axis).map(|names| names.as_slice()).unwrap_or(&[])
    }

    /// Validate all assignments of one entity, collecting every failure
    pub fn validate(&self, assignments: &[(GroupAxis, Option<&str>)]) -> Vec<GroupValidationError> {
        assignments
            .iter()
            .filter_map(|(axis, name)| validate_group(*axis, *name, self.valid_names(*axis)).err())
            .collect()
    }
}
