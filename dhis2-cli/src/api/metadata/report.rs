//! Import report returned by `POST /api/metadata`

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Result, bail};
use serde::Deserialize;
use serde_json::Value;

/// Per-type object counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ImportStats {
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub updated: u64,
    #[serde(default)]
    pub deleted: u64,
    #[serde(default)]
    pub ignored: u64,
    #[serde(default)]
    pub total: u64,
}

impl fmt::Display for ImportStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created={} updated={} deleted={} ignored={} total={}",
            self.created, self.updated, self.deleted, self.ignored, self.total
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorReport {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReport {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub error_reports: Vec<ErrorReport>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeReport {
    /// Fully qualified class name, e.g. `org.hisp.dhis.dataelement.DataElement`
    pub klass: String,
    #[serde(default)]
    pub stats: ImportStats,
    #[serde(default)]
    pub object_reports: Vec<ObjectReport>,
}

impl TypeReport {
    /// Short type name (last segment of the class name)
    pub fn type_name(&self) -> &str {
        self.klass.rsplit('.').next().unwrap_or(&self.klass)
    }
}

/// Metadata import report
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub status: String,
    #[serde(default)]
    pub stats: ImportStats,
    #[serde(default)]
    pub type_reports: Vec<TypeReport>,
}

impl ImportReport {
    /// Parse a response body. Newer servers wrap the report in a web message
    /// (`{"status": ..., "response": {...}}`), older ones return it directly.
    pub fn from_response(body: Value) -> Result<Self> {
        let report = match body.get("response") {
            Some(inner) if inner.get("typeReports").is_some() || inner.get("stats").is_some() => {
                let mut inner = inner.clone();
                if inner.get("status").is_none() {
                    if let (Some(obj), Some(status)) = (inner.as_object_mut(), body.get("status")) {
                        obj.insert("status".to_string(), status.clone());
                    }
                }
                inner
            }
            _ => body,
        };
        Ok(serde_json::from_value(report)?)
    }

    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }

    /// Stats keyed by short type name
    pub fn summary(&self) -> BTreeMap<String, ImportStats> {
        self.type_reports
            .iter()
            .map(|report| (report.type_name().to_string(), report.stats))
            .collect()
    }

    /// All error messages across object reports
    pub fn error_messages(&self) -> Vec<String> {
        self.type_reports
            .iter()
            .flat_map(|tr| {
                tr.object_reports.iter().flat_map(move |or| {
                    or.error_reports.iter().map(move |er| match &or.uid {
                        Some(uid) => format!("{} {}: {}", tr.type_name(), uid, er.message),
                        None => format!("{}: {}", tr.type_name(), er.message),
                    })
                })
            })
            .collect()
    }

    /// Fail unless the server reported `OK`
    pub fn ensure_ok(self) -> Result<Self> {
        if !self.is_ok() {
            let errors = self.error_messages();
            if errors.is_empty() {
                bail!("Metadata import failed: status={} ({})", self.status, self.stats);
            }
            bail!(
                "Metadata import failed: status={} ({})\n{}",
                self.status,
                self.stats,
                errors.join("\n")
            );
        }
        Ok(self)
    }
}
