//! Models module
//!
//! Defines the table entities and transformation graphs that code generation
//! reads. Graphs are owned by the caller and never mutated by generators.

pub mod column;
pub mod graph;
pub mod table;

pub use column::{ColumnMapping, ColumnRename, OrderColumn, TableColumn};
pub use graph::{PropertyBag, TableEdge, TransformGraph, TransformKind};
pub use table::{TableEntity, TableStorage};
