// Business logic services layer
//
// Reconciliation of spreadsheet metadata, the import orchestration built on
// it and the data set section fix-up.

pub mod datasets;
pub mod import;
pub mod reconcile;
