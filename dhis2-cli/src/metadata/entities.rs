//! Metadata decoded from the import spreadsheet

use std::fmt;
use std::str::FromStr;

/// Everything decoded from one import spreadsheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub data_elements: Vec<DataElement>,
    pub indicators: Vec<Indicator>,
    pub data_element_groups: Vec<GroupRow>,
    pub indicator_groups: Vec<GroupRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataElement {
    pub id: Option<String>,
    pub name: String,
    pub short_name: String,
    pub form_name: Option<String>,
    pub description: Option<String>,
    pub code: String,
    pub category_combo_name: Option<String>,
    pub value_type: ValueType,
    pub aggregation_type: AggregationType,
    pub option_set: Option<String>,
    pub zero_is_significant: bool,
    pub field_mask: Option<String>,
    pub group_origin: String,
    pub group_status: String,
    pub group_core_competency: String,
    pub group_theme: String,
    pub group_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    pub id: Option<String>,
    pub name: String,
    pub short_name: String,
    pub form_name: Option<String>,
    pub description: Option<String>,
    pub code: String,
    pub indicator_type: Option<String>,
    pub group_origin: String,
    pub group_status: String,
    pub group_core_competency: String,
    pub group_theme: Option<String>,
}

/// Row of the `dataElementGroups` / `indicatorGroups` sheets
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    pub id: Option<String>,
    pub name: String,
    pub short_name: String,
    pub description: Option<String>,
    pub code: String,
}

/// Classification axis a group assignment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupAxis {
    Origin,
    Status,
    CoreCompetency,
    Theme,
    Type,
}

impl fmt::Display for GroupAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupAxis::Origin => write!(f, "origin"),
            GroupAxis::Status => write!(f, "status"),
            GroupAxis::CoreCompetency => write!(f, "core competency"),
            GroupAxis::Theme => write!(f, "theme"),
            GroupAxis::Type => write!(f, "type"),
        }
    }
}

impl DataElement {
    pub fn group_assignments(&self) -> Vec<(GroupAxis, Option<&str>)> {
        vec![
            (GroupAxis::Origin, Some(self.group_origin.as_str())),
            (GroupAxis::Status, Some(self.group_status.as_str())),
            (GroupAxis::CoreCompetency, Some(self.group_core_competency.as_str())),
            (GroupAxis::Theme, Some(self.group_theme.as_str())),
            (GroupAxis::Type, Some(self.group_type.as_str())),
        ]
    }
}

impl Indicator {
    pub fn group_assignments(&self) -> Vec<(GroupAxis, Option<&str>)> {
        vec![
            (GroupAxis::Origin, Some(self.group_origin.as_str())),
            (GroupAxis::Status, Some(self.group_status.as_str())),
            (GroupAxis::CoreCompetency, Some(self.group_core_competency.as_str())),
            (GroupAxis::Theme, self.group_theme.as_deref()),
        ]
    }
}

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum!(
    /// Data element value type
    ValueType {
        Integer => "INTEGER",
        IntegerPositive => "INTEGER_POSITIVE",
        IntegerZeroOrPositive => "INTEGER_ZERO_OR_POSITIVE",
        LongText => "LONG_TEXT",
        Number => "NUMBER",
        Percentage => "PERCENTAGE",
        Text => "TEXT",
    }
);

string_enum!(
    /// Data element aggregation type
    AggregationType {
        Average => "AVERAGE",
        Count => "COUNT",
        None => "NONE",
        Sum => "SUM",
    }
);
