//! JSON export document.
//!
//! ```json
//! {
//!   "metadata": { "exportDate": "2026-01-01T00:00:00Z", "version": "1.0" },
//!   "data": { "clients": [...], "workers": [...], "tasks": [...] }
//! }
//! ```
//!
//! Records serialize under their canonical field names; passthrough
//! columns appear as additional keys on each record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::IntakeConfig;
use crate::error::Result;
use crate::models::{Client, Dataset, Task, Worker};

/// Export header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    #[serde(rename = "exportDate")]
    pub export_date: DateTime<Utc>,
    /// Schema version.
    pub version: String,
}

/// The three coerced collections, keyed by entity kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub workers: Vec<Worker>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// A complete export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub metadata: ExportMetadata,
    pub data: ExportData,
}

impl ExportDocument {
    /// Snapshots a dataset, stamped with the current time and the
    /// configured schema version. Absent collections export as empty arrays.
    pub fn new(dataset: &Dataset, config: &IntakeConfig) -> Self {
        Self {
            metadata: ExportMetadata {
                export_date: Utc::now(),
                version: config.schema_version.clone(),
            },
            data: ExportData {
                clients: dataset.clients.clone().unwrap_or_default(),
                workers: dataset.workers.clone().unwrap_or_default(),
                tasks: dataset.tasks.clone().unwrap_or_default(),
            },
        }
    }

    /// Overrides the export timestamp.
    pub fn with_export_date(mut self, date: DateTime<Utc>) -> Self {
        self.metadata.export_date = date;
        self
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self)?;
        info!(
            clients = self.data.clients.len(),
            workers = self.data.workers.len(),
            tasks = self.data.tasks.len(),
            version = %self.metadata.version,
            "Exported dataset"
        );
        Ok(json)
    }

    /// Parses a document produced by [`ExportDocument::to_json`].
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Converts back into a dataset; every collection is supplied.
    pub fn into_dataset(self) -> Dataset {
        Dataset::new()
            .with_clients(self.data.clients)
            .with_workers(self.data.workers)
            .with_tasks(self.data.tasks)
    }
}
