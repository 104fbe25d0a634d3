//! Transformation generators
//!
//! Every transformation kind has one [`Generator`]. Generators follow the same
//! skeleton: validate the graph, resolve tables and options, emit the
//! preamble (system options, target delete), emit the main statement and
//! finish with the status check.
//!
//! # Example
//!
//! ```rust
//! use transform_codegen::codegen::{GenerationEnv, RequestContext};
//! use transform_codegen::config::CodegenConfig;
//! use transform_codegen::generators::GeneratorRegistry;
//! use transform_codegen::messages::MessageBundle;
//! use transform_codegen::metadata::TableCatalog;
//! use transform_codegen::models::{OrderColumn, TableEntity, TransformGraph, TransformKind};
//!
//! let catalog = TableCatalog::from_tables([
//!     TableEntity::new("CLASS").with_libref("STAGE"),
//!     TableEntity::new("OUT"),
//! ]);
//! let messages = MessageBundle::english();
//! let config = CodegenConfig::default();
//!
//! let graph = TransformGraph::new("Sort class", TransformKind::Sort)
//!     .with_source("CLASS")
//!     .with_target("OUT")
//!     .with_order_by(OrderColumn::ascending("AGE"));
//!
//! let registry = GeneratorRegistry::with_defaults();
//! let generator = registry.get(graph.kind).unwrap();
//! let mut context = RequestContext::new(GenerationEnv::new(&catalog, &messages, &config), &graph.name);
//! generator.generate(&mut context, &graph).unwrap();
//! assert!(context.render().contains("by AGE;"));
//! ```

pub mod append;
pub mod mapping;
pub mod sort;

use crate::codegen::{CodegenResult, RequestContext};
use crate::models::{TransformGraph, TransformKind};
use std::collections::HashMap;
use std::sync::Arc;

pub use append::AppendGenerator;
pub use mapping::{ColumnMapper, NoColumnMapping, RenameColumnMapper};
pub use sort::SortGenerator;

/// Code generator for one transformation kind
pub trait Generator: Send + Sync {
    fn kind(&self) -> TransformKind;

    /// Write the code of `graph` into the context's buffer
    fn generate(&self, context: &mut RequestContext<'_>, graph: &TransformGraph) -> CodegenResult<()>;
}

/// Dispatch table from transformation kind to generator
#[derive(Clone, Default)]
pub struct GeneratorRegistry {
    generators: HashMap<TransformKind, Arc<dyn Generator>>,
}

impl GeneratorRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in generators
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SortGenerator::default()));
        registry.register(Arc::new(AppendGenerator));
        registry
    }

    /// Register a generator, replacing any previous one for its kind
    pub fn register(&mut self, generator: Arc<dyn Generator>) -> Option<Arc<dyn Generator>> {
        self.generators.insert(generator.kind(), generator)
    }

    pub fn get(&self, kind: TransformKind) -> Option<&dyn Generator> {
        self.generators.get(&kind).map(|g| g.as_ref())
    }

    /// Registered kinds
    pub fn kinds(&self) -> Vec<TransformKind> {
        self.generators.keys().copied().collect()
    }
}
