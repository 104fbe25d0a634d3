//! Code generation core
//!
//! Provides the pieces shared by all transformation generators:
//! - [`CodeBuffer`]: indented, append-only text
//! - [`OptionsResolver`]: option text from a graph's property bag
//! - [`TableCodegen`]: table location and read/write options
//! - [`RequestContext`]: validation, resolution and emission helpers

pub mod buffer;
pub mod context;
pub mod error;
pub mod options;
pub mod table;

pub use buffer::CodeBuffer;
pub use context::{
    GenerationEnv, LAST_OUTPUT, RequestContext, STATUS_CHECK_MACRO, STATUS_VARIABLE,
};
pub use error::{CodegenError, CodegenResult};
pub use options::OptionsResolver;
pub use table::TableCodegen;
