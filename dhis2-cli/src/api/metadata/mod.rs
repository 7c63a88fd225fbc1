//! DHIS2 metadata models, export queries and import reports

pub mod models;
pub mod query;
pub mod report;

pub use models::{
    CurrentMetadata, D2DataElementGroup, D2DataElementGroupSet, D2IndicatorGroup,
    D2IndicatorGroupSet, D2Object, MetadataPayload, NamedRef, Ref,
};
pub use query::MetadataQuery;
pub use report::ImportReport;
