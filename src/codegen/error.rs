//! Error types for code generation

use thiserror::Error;

/// Errors that abort generation of one transformation
///
/// Messages are produced by the injected message provider when the error is
/// constructed, so `Display` yields the localized text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    /// Graph topology violates the source/target/external-table rules
    #[error("{message}")]
    Structural { transform: String, message: String },

    /// A referenced table cannot be mapped to an entity or physical location
    #[error("{message}")]
    Resolution {
        transform: String,
        reference: String,
        message: String,
    },

    /// Required per-kind configuration is missing
    #[error("{message}")]
    Configuration {
        transform: String,
        category: String,
        message: String,
    },

    /// No generator is registered for the transformation kind
    #[error("{message}")]
    UnsupportedKind {
        transform: String,
        kind: String,
        message: String,
    },
}

/// Result type for code generation
pub type CodegenResult<T> = Result<T, CodegenError>;

impl CodegenError {
    /// Name of the transformation whose generation failed
    pub fn transform(&self) -> &str {
        match self {
            CodegenError::Structural { transform, .. }
            | CodegenError::Resolution { transform, .. }
            | CodegenError::Configuration { transform, .. }
            | CodegenError::UnsupportedKind { transform, .. } => transform,
        }
    }

    /// Short classification used in failure reports
    pub fn class(&self) -> &'static str {
        match self {
            CodegenError::Structural { .. } => "structural",
            CodegenError::Resolution { .. } => "resolution",
            CodegenError::Configuration { .. } => "configuration",
            CodegenError::UnsupportedKind { .. } => "unsupported_kind",
        }
    }
}
