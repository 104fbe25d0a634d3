//! In-memory table catalog

use super::TableLookup;
use crate::models::{TableEdge, TableEntity};
use std::collections::HashMap;

/// Table entities keyed by metadata id
#[derive(Debug, Clone, Default)]
pub struct TableCatalog {
    tables: HashMap<String, TableEntity>,
}

impl TableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = TableEntity>,
    {
        let mut catalog = Self::new();
        for table in tables {
            catalog.insert(table);
        }
        catalog
    }

    /// Insert a table, returning the entity previously stored under its id
    pub fn insert(&mut self, table: TableEntity) -> Option<TableEntity> {
        self.tables.insert(table.id.clone(), table)
    }

    pub fn get(&self, id: &str) -> Option<&TableEntity> {
        self.tables.get(id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableLookup for TableCatalog {
    fn lookup(&self, edge: &TableEdge) -> Option<&TableEntity> {
        self.get(&edge.table_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_edge() {
        let catalog = TableCatalog::from_tables([
            TableEntity::new("CLASS").with_id("A5.T1"),
            TableEntity::new("OUT"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.lookup(&TableEdge::new("A5.T1")).map(|t| t.name.as_str()),
            Some("CLASS")
        );
        assert!(catalog.lookup(&TableEdge::new("CLASS")).is_none());
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let mut catalog = TableCatalog::new();
        assert!(catalog.insert(TableEntity::new("OUT")).is_none());
        let previous = catalog.insert(TableEntity::new("OUT").with_label("new"));
        assert!(previous.is_some());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("OUT").and_then(|t| t.label.as_deref()), Some("new"));
    }
}
