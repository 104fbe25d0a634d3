//! Transformation graph model
//!
//! A graph describes one ETL step: the tables it reads, the table it writes,
//! ordering keys, column mappings and a free-form property bag holding the
//! user-configured options of the step.

use super::column::{ColumnMapping, OrderColumn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Configuration property bag, keyed by `<CATEGORY>.<OPTION>`
pub type PropertyBag = BTreeMap<String, serde_json::Value>;

/// Kind of transformation; selects the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    /// Sort rows by the order-by columns
    Sort,
    /// Concatenate all sources into the target
    Append,
}

impl std::fmt::Display for TransformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformKind::Sort => write!(f, "sort"),
            TransformKind::Append => write!(f, "append"),
        }
    }
}

impl std::str::FromStr for TransformKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sort" => Ok(TransformKind::Sort),
            "append" => Ok(TransformKind::Append),
            _ => Err(format!("Unknown transformation kind: {}", s)),
        }
    }
}

/// Edge from a transformation to a table entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TableEdge {
    /// Metadata id of the referenced table
    pub table_id: String,
}

impl TableEdge {
    pub fn new(table_id: impl Into<String>) -> Self {
        Self {
            table_id: table_id.into(),
        }
    }
}

/// Declarative description of one transformation step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransformGraph {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub kind: TransformKind,
    #[serde(default)]
    pub sources: Vec<TableEdge>,
    #[serde(default)]
    pub targets: Vec<TableEdge>,
    #[serde(default)]
    pub order_by: Vec<OrderColumn>,
    #[serde(default)]
    pub column_mappings: Vec<ColumnMapping>,
    #[serde(default)]
    pub properties: PropertyBag,
}

impl TransformGraph {
    pub fn new(name: impl Into<String>, kind: TransformKind) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind,
            sources: Vec::new(),
            targets: Vec::new(),
            order_by: Vec::new(),
            column_mappings: Vec::new(),
            properties: PropertyBag::new(),
        }
    }

    /// Identifier of the transformation
    ///
    /// Falls back to a deterministic UUID v5 of the kind and name so that
    /// generated work-table names are stable between runs.
    pub fn id(&self) -> Uuid {
        self.id.unwrap_or_else(|| Self::generate_id(self.kind, &self.name))
    }

    pub fn generate_id(kind: TransformKind, name: &str) -> Uuid {
        let key = format!("{}:{}", kind, name);
        Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_source(mut self, table_id: impl Into<String>) -> Self {
        self.sources.push(TableEdge::new(table_id));
        self
    }

    pub fn with_target(mut self, table_id: impl Into<String>) -> Self {
        self.targets.push(TableEdge::new(table_id));
        self
    }

    pub fn with_order_by(mut self, column: OrderColumn) -> Self {
        self.order_by.push(column);
        self
    }

    pub fn with_column_mapping(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.column_mappings.push(ColumnMapping::new(source, target));
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The single target edge, if the graph has exactly one
    pub fn target(&self) -> Option<&TableEdge> {
        match self.targets.as_slice() {
            [target] => Some(target),
            _ => None,
        }
    }
}
