//! Table entity model

use super::column::{ColumnRename, TableColumn};
use serde::{Deserialize, Serialize};

/// Storage backing a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStorage {
    /// Table owned by the generated code; may be deleted and recreated
    #[default]
    Managed,
    /// Foreign, non-managed file
    External,
}

/// A table known to the metadata layer
///
/// Read options are derived from `keep`, `rename`, `where_clause` and
/// `read_options`; write options from `label` and `write_options`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableEntity {
    /// Metadata identifier referenced by graph edges
    pub id: String,
    /// Member (dataset) name
    pub name: String,
    /// Library reference; the configured default libref applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub libref: Option<String>,
    #[serde(default)]
    pub storage: TableStorage,
    /// External table exposed as a permanent, queryable view
    #[serde(default)]
    pub permanent_view: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub columns: Vec<TableColumn>,
    /// Columns kept when the table is read
    #[serde(default)]
    pub keep: Vec<String>,
    /// Renames applied when the table is read
    #[serde(default)]
    pub rename: Vec<ColumnRename>,
    /// Row filter applied when the table is read
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,
    /// Literal read-option text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_options: Option<String>,
    /// Literal write-option text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_options: Option<String>,
}

impl TableEntity {
    /// Create a managed table; the id defaults to the member name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            libref: None,
            storage: TableStorage::Managed,
            permanent_view: false,
            label: None,
            columns: Vec::new(),
            keep: Vec::new(),
            rename: Vec::new(),
            where_clause: None,
            read_options: None,
            write_options: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_libref(mut self, libref: impl Into<String>) -> Self {
        self.libref = Some(libref.into());
        self
    }

    pub fn with_storage(mut self, storage: TableStorage) -> Self {
        self.storage = storage;
        self
    }

    /// Mark the table as an external permanent view
    pub fn as_permanent_view(mut self) -> Self {
        self.storage = TableStorage::External;
        self.permanent_view = true;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_keep<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rename.push(ColumnRename::new(from, to));
        self
    }

    pub fn with_where(mut self, condition: impl Into<String>) -> Self {
        self.where_clause = Some(condition.into());
        self
    }

    pub fn with_read_options(mut self, options: impl Into<String>) -> Self {
        self.read_options = Some(options.into());
        self
    }

    pub fn with_write_options(mut self, options: impl Into<String>) -> Self {
        self.write_options = Some(options.into());
        self
    }

    pub fn is_external(&self) -> bool {
        self.storage == TableStorage::External
    }
}
