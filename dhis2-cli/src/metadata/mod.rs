//! Metadata domain: spreadsheet entities and the repository seams used by
//! the import use case

pub mod entities;
pub mod repository;

pub use entities::{
    AggregationType, DataElement, GroupAxis, GroupRow, Indicator, Metadata, ValueType,
};
pub use repository::{MetadataImportOptions, MetadataImportRepository, MetadataRepository};
