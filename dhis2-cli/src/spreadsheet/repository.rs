//! Spreadsheet-backed metadata import repository

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::decode::decode_metadata;
use super::reader::read_workbook;
use crate::metadata::{Metadata, MetadataImportOptions, MetadataImportRepository};

#[derive(Debug, Clone, Default)]
pub struct SpreadsheetImportRepository;

impl SpreadsheetImportRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MetadataImportRepository for SpreadsheetImportRepository {
    async fn import(&self, options: &MetadataImportOptions) -> Result<Metadata> {
        let path = options.input_file.clone();
        let workbook = tokio::task::spawn_blocking(move || read_workbook(path))
            .await
            .context("Spreadsheet reader task failed")??;

        decode_metadata(&workbook).with_context(|| {
            format!("Invalid metadata spreadsheet: {}", options.input_file.display())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ValueType;
    use rust_xlsxwriter::Workbook;

    fn write_sheet(workbook: &mut Workbook, name: &str, rows: &[&[&str]]) {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
    }

    #[tokio::test]
    async fn test_import_from_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.xlsx");

        let mut workbook = Workbook::new();
        write_sheet(
            &mut workbook,
            "dataElements",
            &[
                &[
                    "name", "shortName", "code", "valueType", "aggregationType",
                    "zeroIsSignificant", "DEG:Origin", "DEG:Status", "DEG:CC", "DEG:Theme",
                    "DEG:Type",
                ],
                &[
                    "Number of beds", "Beds", "DE1", "NUMBER", "SUM", "TRUE", "NRC", "Active",
                    "SHELTER", "Beds", "Output",
                ],
            ],
        );
        write_sheet(
            &mut workbook,
            "indicators",
            &[
                &["name", "shortName", "code", "IG:Origin", "IG:Status", "IG:CC", "IG:Theme"],
                &["Coverage", "Coverage", "IND1", "NRC", "Active", "SHELTER", ""],
            ],
        );
        write_sheet(&mut workbook, "dataElementGroups", &[&["name", "shortname", "code"]]);
        write_sheet(&mut workbook, "indicatorGroups", &[&["name", "shortname", "code"]]);
        workbook.save(&path).unwrap();

        let metadata = SpreadsheetImportRepository::new()
            .import(&MetadataImportOptions::new(&path))
            .await
            .unwrap();

        assert_eq!(metadata.data_elements.len(), 1);
        assert_eq!(metadata.data_elements[0].value_type, ValueType::Number);
        assert!(metadata.data_elements[0].zero_is_significant);
        assert_eq!(metadata.indicators[0].code, "IND1");
        assert_eq!(metadata.indicators[0].group_theme, None);
        assert!(metadata.data_element_groups.is_empty());
    }

    #[tokio::test]
    async fn test_import_missing_file_fails() {
        let result = SpreadsheetImportRepository::new()
            .import(&MetadataImportOptions::new("/nonexistent/metadata.xlsx"))
            .await;
        assert!(result.is_err());
    }
}
