//! Decode spreadsheet rows into import metadata
//!
//! Decoding is strict: the first row with a missing required column, a
//! malformed uid or a value outside an allowed set fails the whole import.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use super::reader::{SheetRow, WorkbookRows};
use crate::api::uid::is_valid_uid;
use crate::metadata::{
    AggregationType, DataElement, GroupRow, Indicator, Metadata, ValueType,
};

pub const DATA_ELEMENTS_SHEET: &str = "dataElements";
pub const INDICATORS_SHEET: &str = "indicators";
pub const DATA_ELEMENT_GROUPS_SHEET: &str = "dataElementGroups";
pub const INDICATOR_GROUPS_SHEET: &str = "indicatorGroups";

/// What was wrong with a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldProblem {
    Missing,
    NotText,
    NotBoolean,
    InvalidUid(String),
    NotOneOf { value: String, allowed: Vec<String> },
}

/// Error decoding the import spreadsheet
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    MissingSheet { sheet: String },
    Field {
        sheet: String,
        row: usize,
        field: String,
        problem: FieldProblem,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MissingSheet { sheet } => write!(f, "Missing sheet '{}'", sheet),
            DecodeError::Field {
                sheet,
                row,
                field,
                problem,
            } => {
                write!(f, "Sheet '{}', row {}, column '{}': ", sheet, row, field)?;
                match problem {
                    FieldProblem::Missing => write!(f, "value is required"),
                    FieldProblem::NotText => write!(f, "expected text"),
                    FieldProblem::NotBoolean => write!(f, "expected TRUE or FALSE"),
                    FieldProblem::InvalidUid(value) => write!(f, "invalid uid '{}'", value),
                    FieldProblem::NotOneOf { value, allowed } => write!(
                        f,
                        "'{}' is not one of: {}",
                        value,
                        allowed.join(", ")
                    ),
                }
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Field accessors for a single row that report errors with sheet/row context
struct RowDecoder<'a> {
    sheet: &'a str,
    row: usize,
    fields: &'a Map<String, Value>,
}

impl<'a> RowDecoder<'a> {
    fn new(sheet: &'a str, row: &'a SheetRow) -> Self {
        Self {
            sheet,
            row: row.row_number,
            fields: &row.fields,
        }
    }

    fn error(&self, field: &str, problem: FieldProblem) -> DecodeError {
        DecodeError::Field {
            sheet: self.sheet.to_string(),
            row: self.row,
            field: field.to_string(),
            problem,
        }
    }

    /// Text field; numeric cells are read as their text form
    fn optional_string(&self, field: &str) -> Result<Option<String>, DecodeError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(self.error(field, FieldProblem::NotText)),
        }
    }

    fn string(&self, field: &str) -> Result<String, DecodeError> {
        self.optional_string(field)?
            .ok_or_else(|| self.error(field, FieldProblem::Missing))
    }

    fn optional_uid(&self, field: &str) -> Result<Option<String>, DecodeError> {
        match self.optional_string(field)? {
            Some(id) if !is_valid_uid(&id) => Err(self.error(field, FieldProblem::InvalidUid(id))),
            id => Ok(id),
        }
    }

    /// Boolean cell, or the text TRUE / FALSE in any case
    fn boolean(&self, field: &str) -> Result<bool, DecodeError> {
        match self.fields.get(field) {
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("true") => Ok(true),
            Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("false") => Ok(false),
            None | Some(Value::Null) => Err(self.error(field, FieldProblem::Missing)),
            Some(_) => Err(self.error(field, FieldProblem::NotBoolean)),
        }
    }

    fn one_of<T: FromStr>(&self, field: &str, allowed: &[&str]) -> Result<T, DecodeError> {
        let value = self.string(field)?;
        value.parse().map_err(|_| {
            self.error(
                field,
                FieldProblem::NotOneOf {
                    value: value.clone(),
                    allowed: allowed.iter().map(|s| s.to_string()).collect(),
                },
            )
        })
    }
}

fn sheet<'a>(workbook: &'a WorkbookRows, name: &str) -> Result<&'a [SheetRow], DecodeError> {
    workbook
        .get(name)
        .map(|rows| rows.as_slice())
        .ok_or_else(|| DecodeError::MissingSheet {
            sheet: name.to_string(),
        })
}

fn decode_data_element(row: &RowDecoder<'_>) -> Result<DataElement, DecodeError> {
    Ok(DataElement {
        id: row.optional_uid("id")?,
        name: row.string("name")?,
        short_name: row.string("shortName")?,
        form_name: row.optional_string("formName")?,
        description: row.optional_string("description")?,
        code: row.string("code")?,
        category_combo_name: row.optional_string("categoryComboName")?,
        value_type: row.one_of("valueType", ValueType::VALUES)?,
        aggregation_type: row.one_of("aggregationType", AggregationType::VALUES)?,
        option_set: row.optional_string("optionSet")?,
        zero_is_significant: row.boolean("zeroIsSignificant")?,
        field_mask: row.optional_string("fieldMask")?,
        group_origin: row.string("DEG:Origin")?,
        group_status: row.string("DEG:Status")?,
        group_core_competency: row.string("DEG:CC")?,
        group_theme: row.string("DEG:Theme")?,
        group_type: row.string("DEG:Type")?,
    })
}

fn decode_indicator(row: &RowDecoder<'_>) -> Result<Indicator, DecodeError> {
    Ok(Indicator {
        id: row.optional_uid("id")?,
        name: row.string("name")?,
        short_name: row.string("shortName")?,
        form_name: row.optional_string("formName")?,
        description: row.optional_string("description")?,
        code: row.string("code")?,
        indicator_type: row.optional_string("indicatorType")?,
        group_origin: row.string("IG:Origin")?,
        group_status: row.string("IG:Status")?,
        group_core_competency: row.string("IG:CC")?,
        group_theme: row.optional_string("IG:Theme")?,
    })
}

fn decode_group(row: &RowDecoder<'_>) -> Result<GroupRow, DecodeError> {
    Ok(GroupRow {
        id: row.optional_uid("id")?,
        name: row.string("name")?,
        short_name: row.string("shortname")?,
        description: row.optional_string("description")?,
        code: row.string("code")?,
    })
}

fn decode_sheet<T>(
    workbook: &WorkbookRows,
    name: &str,
    decode: impl Fn(&RowDecoder<'_>) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    sheet(workbook, name)?
        .iter()
        .map(|row| decode(&RowDecoder::new(name, row)))
        .collect()
}

/// Decode all four import sheets
pub fn decode_metadata(workbook: &WorkbookRows) -> Result<Metadata, DecodeError> {
    Ok(Metadata {
        data_elements: decode_sheet(workbook, DATA_ELEMENTS_SHEET, decode_data_element)?,
        indicators: decode_sheet(workbook, INDICATORS_SHEET, decode_indicator)?,
        data_element_groups: decode_sheet(workbook, DATA_ELEMENT_GROUPS_SHEET, decode_group)?,
        indicator_groups: decode_sheet(workbook, INDICATOR_GROUPS_SHEET, decode_group)?,
    })
}
