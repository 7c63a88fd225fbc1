//! Read worksheet rows from an Excel file
//!
//! Every sheet becomes a list of rows keyed by the header cells of its first
//! row. Empty cells are left out of the row, so a missing key and an empty
//! cell mean the same thing to the decoder.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook};
use serde_json::{Map, Value, json};

/// One data row of a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    /// 1-based row number as shown in Excel (the header is row 1)
    pub row_number: usize,
    pub fields: Map<String, Value>,
}

/// All sheets of a workbook, by sheet name
pub type WorkbookRows = HashMap<String, Vec<SheetRow>>;

/// Convert Excel cell to serde_json::Value
fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) if s.trim().is_empty() => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => json!(*i),
        Data::Float(f) => {
            // Whole numbers come back as floats from most writers
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                json!(*f as i64)
            } else {
                json!(*f)
            }
        }
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => Value::String(format!("{}", dt)),
        Data::DateTimeIso(s) => Value::String(s.clone()),
        Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(_) => Value::Null,
    }
}

/// Turn raw sheet cells into keyed rows, skipping blank rows.
///
/// `first_row` is the 0-based sheet row of `cells[0]`, since a used range
/// does not necessarily start at the top of the sheet.
pub fn rows_from_cells(cells: &[Vec<Data>], first_row: usize) -> Vec<SheetRow> {
    let Some(header_row) = cells.first() else {
        return Vec::new();
    };

    let headers: Vec<String> = header_row
        .iter()
        .map(|c| match c {
            Data::String(s) => s.trim().to_string(),
            _ => String::new(),
        })
        .collect();

    let mut rows = Vec::new();
    for (idx, row) in cells.iter().enumerate().skip(1) {
        let mut fields = Map::new();

        for (col_idx, cell) in row.iter().enumerate() {
            let header = headers.get(col_idx).map(|s| s.as_str()).unwrap_or("");
            if header.is_empty() {
                continue;
            }

            let value = cell_to_value(cell);
            if value.is_null() {
                continue;
            }

            fields.insert(header.to_string(), value);
        }

        if fields.is_empty() {
            continue;
        }

        rows.push(SheetRow {
            row_number: first_row + idx + 1,
            fields,
        });
    }

    rows
}

/// Read every sheet of an Excel file
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<WorkbookRows> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let mut sheets = HashMap::new();

    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let cells: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
        log::debug!("Sheet '{}': {} rows", sheet_name, cells.len().saturating_sub(1));
        sheets.insert(sheet_name, rows_from_cells(&cells, first_row));
    }

    Ok(sheets)
}
