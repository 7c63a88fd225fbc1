//! Data set section fix-up against a DHIS2 server

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;

use super::fix::{CoreCompetencies, core_competency_renames, fix_section, plan_chunks};
use super::models::{CoreCompetencySet, CoreCompetencySetsResponse, D2DataSet, D2Section, DataSetsResponse};
use crate::api::Dhis2Client;
use crate::api::metadata::{ImportReport, MetadataQuery};

const CORE_COMPETENCY_GROUP_SET: &str = "GL_CoreComp_DEGROUPSET";

/// Server side of the section fix-up
#[async_trait]
pub trait DataSetStore: Send + Sync {
    async fn data_sets(&self) -> Result<Vec<D2DataSet>>;
    async fn core_competency_set(&self) -> Result<Option<CoreCompetencySet>>;
    async fn post_sections(&self, sections: &[D2Section]) -> Result<ImportReport>;
}

#[async_trait]
impl DataSetStore for Dhis2Client {
    async fn data_sets(&self) -> Result<Vec<D2DataSet>> {
        let query = MetadataQuery::new().fields(
            "dataSets",
            "id,attributeValues[value,attribute[code]],sections[:owner,greyedFields[:owner]]",
        );
        let response: DataSetsResponse = self
            .get_metadata(&query)
            .await
            .context("Failed to fetch data sets")?;
        Ok(response.data_sets)
    }

    async fn core_competency_set(&self) -> Result<Option<CoreCompetencySet>> {
        let query = MetadataQuery::new()
            .fields("dataElementGroupSets", "id,code,dataElementGroups[id,code,name]")
            .filter(&format!("code:eq:{}", CORE_COMPETENCY_GROUP_SET));
        let response: CoreCompetencySetsResponse = self
            .get_metadata(&query)
            .await
            .context("Failed to fetch core competencies")?;
        Ok(response.data_element_group_sets.into_iter().next())
    }

    async fn post_sections(&self, sections: &[D2Section]) -> Result<ImportReport> {
        self.post_metadata(&json!({ "sections": sections })).await
    }
}

/// Renames data set sections after a core competency rename
pub struct DataSetD2Repository<C> {
    store: C,
    chunk_size: usize,
}

impl<C: DataSetStore> DataSetD2Repository<C> {
    pub fn new(store: C, chunk_size: usize) -> Self {
        Self { store, chunk_size }
    }

    /// Fix every section of the app-created data sets, returning the number
    /// of sections posted
    pub async fn fix(&self, renames: &HashMap<String, String>) -> Result<usize> {
        let data_sets: Vec<D2DataSet> = self
            .store
            .data_sets()
            .await?
            .into_iter()
            .filter(D2DataSet::is_created_by_app)
            .collect();

        let core_competencies = self
            .store
            .core_competency_set()
            .await?
            .map(CoreCompetencies::new)
            .with_context(|| format!("Cannot get data element group set: {}", CORE_COMPETENCY_GROUP_SET))?;

        let sections: Vec<&D2Section> = data_sets.iter().flat_map(|ds| &ds.sections).collect();
        let fixed = sections
            .iter()
            .filter_map(|section| fix_section(section, &core_competencies, renames).transpose())
            .collect::<Result<Vec<_>>>()?;

        log::info!("Core competencies: {}", core_competencies.names().join(", "));
        log::info!("Data sets: {} - Sections: {}", data_sets.len(), sections.len());
        log::info!("Sections to fix: {}", fixed.len());

        let count = fixed.len();
        let chunks = plan_chunks(fixed, self.chunk_size);
        for (index, chunk) in chunks.iter().enumerate() {
            log::info!("POST {} sections: {}/{}", chunk.len(), index + 1, chunks.len());
            let report = self.store.post_sections(chunk).await?.ensure_ok()?;
            log::info!("Result: {} ({})", report.status, report.stats);
        }

        Ok(count)
    }
}

/// Applies the fixed core competency renames to data set sections
pub struct FixDataSetSectionsUseCase<C> {
    repository: DataSetD2Repository<C>,
}

impl<C: DataSetStore> FixDataSetSectionsUseCase<C> {
    pub fn new(repository: DataSetD2Repository<C>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Result<usize> {
        self.repository.fix(&core_competency_renames()).await
    }
}
