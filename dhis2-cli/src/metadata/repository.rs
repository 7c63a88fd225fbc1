//! Repository seams for the metadata import

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;

use super::entities::Metadata;

#[derive(Debug, Clone)]
pub struct MetadataImportOptions {
    pub input_file: PathBuf,
}

/// Source of metadata to import
#[async_trait]
pub trait MetadataImportRepository: Send + Sync {
    async fn import(&self, options: &MetadataImportOptions) -> Result<Metadata>;
}

/// Destination that reconciles and persists imported metadata
#[async_trait]
pub trait MetadataRepository: Send + Sync {
    async fn save(&self, metadata: &Metadata) -> Result<()>;
}

impl MetadataImportOptions {
    pub fn new(input_file: impl AsRef<Path>) -> Self {
        Self {
            input_file: input_file.as_ref().to_path_buf(),
        }
    }
}
