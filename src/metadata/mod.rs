//! Metadata collaborators
//!
//! Code generation never talks to a metadata server directly. It reads
//! tables and transformation graphs through the traits defined here;
//! [`TableCatalog`] and [`JobDefinition`] are the in-memory implementations.

pub mod catalog;
pub mod loader;

use crate::models::{TableEdge, TableEntity, TransformGraph};
use std::path::PathBuf;
use thiserror::Error;

pub use catalog::TableCatalog;
pub use loader::JobDefinition;

/// Resolves a graph edge to the table entity it points at
pub trait TableLookup {
    fn lookup(&self, edge: &TableEdge) -> Option<&TableEntity>;
}

/// Supplies transformation graphs by identifier (name or id)
pub trait GraphProvider {
    fn transformation(&self, id: &str) -> Option<&TransformGraph>;
}

/// Errors that can occur while loading metadata
#[derive(Error, Debug)]
pub enum MetadataError {
    /// Failed to read metadata file
    #[error("Failed to read metadata file: {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON parse error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File extension not recognised
    #[error("Unsupported metadata format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Two tables share one id
    #[error("Duplicate table id: {0}")]
    DuplicateTable(String),

    /// Two transformations share one name
    #[error("Duplicate transformation name: {0}")]
    DuplicateTransformation(String),
}

/// Result type for metadata operations
pub type MetadataResult<T> = Result<T, MetadataError>;
