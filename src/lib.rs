//! Transform Codegen - Code generation engine for ETL transformation steps
//!
//! Provides:
//! - Metadata models for tables and transformation graphs
//! - Table, options and buffer helpers shared by all generators
//! - Generators for sort and append transformations
//! - A program dispatcher that generates whole jobs in dependency order
//! - Localized error messages and configuration loading

pub mod codegen;
pub mod config;
pub mod generators;
pub mod messages;
pub mod metadata;
pub mod models;
pub mod program;
pub mod validation;

// Re-export commonly used types
pub use codegen::{
    CodeBuffer, CodegenError, CodegenResult, GenerationEnv, OptionsResolver, RequestContext,
    TableCodegen,
};
pub use config::{CodegenConfig, ConfigError, LineEnding};
pub use generators::{
    AppendGenerator, ColumnMapper, Generator, GeneratorRegistry, NoColumnMapping,
    RenameColumnMapper, SortGenerator,
};
pub use messages::{MessageBundle, MessageProvider};
pub use metadata::{GraphProvider, JobDefinition, MetadataError, TableCatalog, TableLookup};
pub use models::{
    ColumnMapping, OrderColumn, TableEdge, TableEntity, TableStorage, TransformGraph,
    TransformKind,
};
pub use program::{ProgramGenerator, ProgramOutput, TransformFailure};
