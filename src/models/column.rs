//! Column model for table entities and transformation graphs

use serde::{Deserialize, Serialize};

/// Column metadata carried by a table entity
///
/// # Example
///
/// ```rust
/// use transform_codegen::models::TableColumn;
///
/// let column = TableColumn::new("AGE").with_label("Age in years");
/// assert_eq!(column.label.as_deref(), Some("Age in years"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableColumn {
    /// Column name
    pub name: String,
    /// Descriptive label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Display format (e.g. "DATE9.", "BEST12.")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl TableColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            format: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Rename applied when a table is read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnRename {
    pub from: String,
    pub to: String,
}

impl ColumnRename {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Ordering key of a sort transformation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderColumn {
    pub name: String,
    #[serde(default)]
    pub descending: bool,
}

impl OrderColumn {
    pub fn ascending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descending: false,
        }
    }

    pub fn descending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descending: true,
        }
    }
}

/// Source-to-target column mapping consumed by the column-mapping pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Column name on the source side
    pub source: String,
    /// Column name on the target side
    pub target: String,
}

impl ColumnMapping {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Whether the mapping changes the column name
    pub fn is_rename(&self) -> bool {
        !self.source.eq_ignore_ascii_case(&self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_builder() {
        let column = TableColumn::new("BIRTH").with_format("DATE9.");
        assert_eq!(column.name, "BIRTH");
        assert_eq!(column.format.as_deref(), Some("DATE9."));
        assert!(column.label.is_none());
    }

    #[test]
    fn test_mapping_rename_is_case_insensitive() {
        assert!(!ColumnMapping::new("name", "NAME").is_rename());
        assert!(ColumnMapping::new("NAME", "FULL_NAME").is_rename());
    }

    #[test]
    fn test_order_column_deserialize_defaults_to_ascending() {
        let column: OrderColumn = serde_json::from_str(r#"{"name": "AGE"}"#).unwrap();
        assert_eq!(column, OrderColumn::ascending("AGE"));
    }
}
