//! Validation functionality
//!
//! Provides validation logic for:
//! - Physical names (library references, member names)

pub mod names;

pub use names::{ValidationError, ValidationResult};
