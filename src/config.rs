//! Code generation configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read configuration file: {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// File extension not recognised
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(PathBuf),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Line ending used when rendering generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Configuration for code generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CodegenConfig {
    /// Spaces per indentation level
    pub indent_width: usize,
    /// Line ending of generated code
    pub line_ending: LineEnding,
    /// Libref used for tables that do not name one
    pub default_libref: String,
    /// Libref of intermediate work tables
    pub work_libref: String,
    /// Option text emitted ahead of every transformation
    pub global_options: Vec<String>,
    /// Emit a job header comment at the top of a program
    pub emit_header: bool,
    /// Emit a comment ahead of each transformation in a program
    pub emit_step_comments: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            indent_width: 3,
            line_ending: LineEnding::Lf,
            default_libref: "WORK".to_string(),
            work_libref: "WORK".to_string(),
            global_options: Vec::new(),
            emit_header: false,
            emit_step_comments: true,
        }
    }
}

impl CodegenConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn with_default_libref(mut self, libref: impl Into<String>) -> Self {
        self.default_libref = libref.into();
        self
    }

    pub fn with_work_libref(mut self, libref: impl Into<String>) -> Self {
        self.work_libref = libref.into();
        self
    }

    pub fn with_global_option(mut self, option: impl Into<String>) -> Self {
        self.global_options.push(option.into());
        self
    }

    pub fn with_header(mut self, enabled: bool) -> Self {
        self.emit_header = enabled;
        self
    }

    pub fn with_step_comments(mut self, enabled: bool) -> Self {
        self.emit_step_comments = enabled;
        self
    }

    /// Indentation unit (spaces) for one level
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent_width)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a `.yaml`/`.yml` or `.toml` file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        let config = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            Some("toml") => Self::from_toml_str(&content)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };

        debug!("Loaded code generation config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CodegenConfig::default();
        assert_eq!(config.indent_width, 3);
        assert_eq!(config.default_libref, "WORK");
        assert_eq!(config.indent_unit(), "   ");
        assert!(config.global_options.is_empty());
    }

    #[test]
    fn test_builder() {
        let config = CodegenConfig::new()
            .with_indent_width(2)
            .with_line_ending(LineEnding::Crlf)
            .with_global_option("VALIDVARNAME=ANY");

        assert_eq!(config.indent_unit(), "  ");
        assert_eq!(config.line_ending.as_str(), "\r\n");
        assert_eq!(config.global_options, vec!["VALIDVARNAME=ANY"]);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = CodegenConfig::from_yaml_str("indent_width: 4\nline_ending: crlf\n").unwrap();
        assert_eq!(config.indent_width, 4);
        assert_eq!(config.line_ending, LineEnding::Crlf);
        assert_eq!(config.work_libref, "WORK");
    }

    #[test]
    fn test_toml() {
        let config = CodegenConfig::from_toml_str(
            "default_libref = \"STAGE\"\nglobal_options = [\"MPRINT\"]\n",
        )
        .unwrap();
        assert_eq!(config.default_libref, "STAGE");
        assert_eq!(config.global_options, vec!["MPRINT"]);
    }

    #[test]
    fn test_load_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "emit_header = true").unwrap();
        let config = CodegenConfig::load(file.path()).unwrap();
        assert!(config.emit_header);

        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(matches!(
            CodegenConfig::load(file.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
