//! Data set section fix-up after the core competency rename

pub mod fix;
pub mod models;
pub mod repository;

pub use repository::{DataSetD2Repository, FixDataSetSectionsUseCase};
