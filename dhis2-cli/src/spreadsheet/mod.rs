//! Spreadsheet import: reading workbook rows and decoding them into metadata

pub mod decode;
pub mod reader;
pub mod repository;

pub use repository::SpreadsheetImportRepository;
