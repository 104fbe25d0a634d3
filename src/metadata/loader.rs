//! Job definition loading
//!
//! A job bundles the table entities and transformation graphs of one ETL
//! flow. Jobs are read from YAML or JSON documents.

use super::catalog::TableCatalog;
use super::{GraphProvider, MetadataError, MetadataResult};
use crate::models::{TableEntity, TransformGraph};
use crate::validation::names::{validate_libref, validate_member_name};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Tables and transformations of one job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDefinition {
    pub name: String,
    #[serde(default)]
    pub tables: Vec<TableEntity>,
    #[serde(default)]
    pub transformations: Vec<TransformGraph>,
}

impl JobDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
            transformations: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: TableEntity) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_transformation(mut self, graph: TransformGraph) -> Self {
        self.transformations.push(graph);
        self
    }

    pub fn from_yaml_str(content: &str) -> MetadataResult<Self> {
        let job: Self = serde_yaml::from_str(content)?;
        job.validate()?;
        Ok(job)
    }

    pub fn from_json_str(content: &str) -> MetadataResult<Self> {
        let job: Self = serde_json::from_str(content)?;
        job.validate()?;
        Ok(job)
    }

    /// Load a job from a `.yaml`/`.yml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| MetadataError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        let job = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => return Err(MetadataError::UnsupportedFormat(path.to_path_buf())),
        };

        info!(
            "Loaded job '{}' with {} tables and {} transformations from {}",
            job.name,
            job.tables.len(),
            job.transformations.len(),
            path.display()
        );
        Ok(job)
    }

    /// Table catalog built from the job's tables
    pub fn catalog(&self) -> TableCatalog {
        TableCatalog::from_tables(self.tables.iter().cloned())
    }

    /// Reject duplicate table ids and duplicate transformation names
    ///
    /// Physical names are not checked here; an invalid name only fails the
    /// transformations that use the table.
    fn validate(&self) -> MetadataResult<()> {
        let mut seen = std::collections::HashSet::new();
        for table in &self.tables {
            if !seen.insert(table.id.as_str()) {
                return Err(MetadataError::DuplicateTable(table.id.clone()));
            }
            let name_ok = validate_member_name(&table.name).is_ok()
                && table.libref.as_deref().is_none_or(|l| validate_libref(l).is_ok());
            if !name_ok {
                warn!(
                    "Table '{}' of job '{}' has an invalid physical name",
                    table.id, self.name
                );
            }
        }

        let mut names = std::collections::HashSet::new();
        for graph in &self.transformations {
            if !names.insert(graph.name.as_str()) {
                return Err(MetadataError::DuplicateTransformation(graph.name.clone()));
            }
        }
        Ok(())
    }
}

impl GraphProvider for JobDefinition {
    fn transformation(&self, id: &str) -> Option<&TransformGraph> {
        self.transformations
            .iter()
            .find(|g| g.name == id || g.id().to_string() == id)
    }
}
