pub mod datasets;
pub mod import;
