//! Metadata import orchestration
//!
//! Fetches one snapshot of the server metadata, reconciles data elements and
//! indicators against it, writes the resulting payload to disk for
//! inspection and posts it as a single metadata import.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

use super::reconcile::mapper::SeedSource;
use super::reconcile::{TimeRandomSeed, diff_groups, reconcile_data_elements, reconcile_indicators};
use crate::api::Dhis2Client;
use crate::api::metadata::{CurrentMetadata, ImportReport, MetadataPayload, MetadataQuery};
use crate::metadata::{
    Metadata, MetadataImportOptions, MetadataImportRepository, MetadataRepository,
};

/// Query for everything the reconciliation reads from the server
pub fn snapshot_query() -> MetadataQuery {
    MetadataQuery::new()
        .fields("dataElements", ":owner")
        .fields("dataElementGroups", ":owner")
        .fields("dataElementGroupSets", "name,code,dataElementGroups[name]")
        .fields("indicators", ":owner")
        .fields("indicatorGroups", ":owner")
        .fields("indicatorGroupSets", "name,code,indicatorGroups[name]")
        .fields("categoryCombos", "id,name")
        .fields("optionSets", "id,name")
        .fields("indicatorTypes", "id,name")
}

/// Server side of the import
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn current_metadata(&self) -> Result<CurrentMetadata>;
    async fn post_metadata(&self, payload: &MetadataPayload) -> Result<ImportReport>;
}

#[async_trait]
impl MetadataStore for Dhis2Client {
    async fn current_metadata(&self) -> Result<CurrentMetadata> {
        self.get_metadata(&snapshot_query())
            .await
            .context("Failed to fetch current metadata")
    }

    async fn post_metadata(&self, payload: &MetadataPayload) -> Result<ImportReport> {
        Dhis2Client::post_metadata(self, payload).await
    }
}

/// Reconcile both entity kinds and collect the payload.
///
/// Either kind failing (missing group set) fails the whole payload.
pub fn build_payload<S: SeedSource + Clone>(
    current: &CurrentMetadata,
    metadata: &Metadata,
    seeds: S,
) -> Result<MetadataPayload> {
    let data_elements = reconcile_data_elements(current, &metadata.data_elements, seeds.clone())?;
    let indicators = reconcile_indicators(current, &metadata.indicators, seeds)?;

    let data_element_groups =
        diff_groups(&current.data_element_groups, &data_elements.assignments());
    let indicator_groups = diff_groups(&current.indicator_groups, &indicators.assignments());

    log::info!(
        "Payload: {} data elements, {} data element groups, {} indicators, {} indicator groups",
        data_elements.entities.len(),
        data_element_groups.len(),
        indicators.entities.len(),
        indicator_groups.len()
    );

    Ok(MetadataPayload {
        data_elements: data_elements.entities,
        data_element_groups,
        indicators: indicators.entities,
        indicator_groups,
    })
}

/// Write a JSON document with four-space indentation
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .context("Failed to serialize payload")?;

    fs::write(path, buffer).with_context(|| format!("Failed to write payload to: {}", path.display()))
}

/// Metadata repository backed by a DHIS2 server
pub struct MetadataD2Repository<C, S = TimeRandomSeed> {
    store: C,
    payload_path: PathBuf,
    seeds: S,
}

impl<C: MetadataStore> MetadataD2Repository<C, TimeRandomSeed> {
    pub fn new(store: C, payload_path: impl Into<PathBuf>) -> Self {
        Self::with_seed_source(store, payload_path, TimeRandomSeed)
    }
}

impl<C: MetadataStore, S: SeedSource + Clone> MetadataD2Repository<C, S> {
    pub fn with_seed_source(store: C, payload_path: impl Into<PathBuf>, seeds: S) -> Self {
        Self {
            store,
            payload_path: payload_path.into(),
            seeds,
        }
    }
}

#[async_trait]
impl<C: MetadataStore, S: SeedSource + Clone + Send + Sync> MetadataRepository
    for MetadataD2Repository<C, S>
{
    async fn save(&self, metadata: &Metadata) -> Result<()> {
        let current = self.store.current_metadata().await?;
        let payload = build_payload(&current, metadata, self.seeds.clone())?;

        write_json(&self.payload_path, &payload)?;
        log::debug!("Payload saved: {}", self.payload_path.display());

        let report = self.store.post_metadata(&payload).await?.ensure_ok()?;

        for (type_name, stats) in report.summary() {
            log::info!("Stats {}: {}", type_name, stats);
        }
        log::info!("Stats total: {}", report.stats);

        Ok(())
    }
}

/// Decode a spreadsheet and save it to the server
pub struct ImportMetadataUseCase<I, R> {
    import_repository: I,
    metadata_repository: R,
}

impl<I: MetadataImportRepository, R: MetadataRepository> ImportMetadataUseCase<I, R> {
    pub fn new(import_repository: I, metadata_repository: R) -> Self {
        Self {
            import_repository,
            metadata_repository,
        }
    }

    pub async fn execute(&self, options: &MetadataImportOptions) -> Result<()> {
        let metadata = self.import_repository.import(options).await?;

        log::info!("Input file: {}", options.input_file.display());
        log::info!(
            "Decoded {} data elements, {} indicators, {} data element groups, {} indicator groups",
            metadata.data_elements.len(),
            metadata.indicators.len(),
            metadata.data_element_groups.len(),
            metadata.indicator_groups.len()
        );

        self.metadata_repository.save(&metadata).await
    }
}
