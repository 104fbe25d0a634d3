//! Localized message lookup for error reporting
//!
//! Messages are only used where errors are constructed; generated code never
//! contains localized text.

use serde::Deserialize;
use std::collections::HashMap;

/// Message keys used by code generation
pub mod keys {
    pub const NO_SOURCES: &str = "structure.no_sources";
    pub const TARGET_COUNT: &str = "structure.target_count";
    pub const EXTERNAL_TARGET: &str = "structure.external_target";
    pub const EXTERNAL_SOURCE: &str = "structure.external_source";
    pub const SOURCE_IS_TARGET: &str = "structure.source_is_target";
    pub const UNRESOLVED_TABLE: &str = "resolution.unresolved_table";
    pub const INVALID_LOCATION: &str = "resolution.invalid_location";
    pub const MISSING_ORDER_BY: &str = "configuration.missing_order_by";
    pub const UNSUPPORTED_KIND: &str = "configuration.unsupported_kind";
}

const ENGLISH: &[(&str, &str)] = &[
    (keys::NO_SOURCES, "Transformation '{0}' has no source tables"),
    (
        keys::TARGET_COUNT,
        "Transformation '{0}' must have exactly one target table, found {1}",
    ),
    (
        keys::EXTERNAL_TARGET,
        "Target table '{1}' of transformation '{0}' is an external table and cannot be replaced",
    ),
    (
        keys::EXTERNAL_SOURCE,
        "Source table '{1}' of transformation '{0}' is an external table that is not a permanent view",
    ),
    (
        keys::SOURCE_IS_TARGET,
        "Transformation '{0}' reads table '{1}' and also replaces it as its target",
    ),
    (
        keys::UNRESOLVED_TABLE,
        "Table '{1}' referenced by transformation '{0}' could not be found",
    ),
    (
        keys::INVALID_LOCATION,
        "Table '{1}' referenced by transformation '{0}' has no valid physical location: {2}",
    ),
    (
        keys::MISSING_ORDER_BY,
        "Transformation '{0}' requires at least one order-by column ({1} options)",
    ),
    (
        keys::UNSUPPORTED_KIND,
        "No code generator is registered for transformation kind '{1}' of transformation '{0}'",
    ),
];

/// Lookup service turning a message key and its arguments into text
pub trait MessageProvider: Send + Sync {
    fn message(&self, key: &str, args: &[&str]) -> String;
}

/// Template-based message bundle
///
/// Templates reference arguments positionally (`{0}`, `{1}`, ...). Keys
/// without a template render as the key followed by the arguments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct MessageBundle {
    templates: HashMap<String, String>,
}

impl MessageBundle {
    /// Empty bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in English messages
    pub fn english() -> Self {
        Self {
            templates: ENGLISH
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Parse a flat `key = "template"` TOML table
    ///
    /// ```rust
    /// use transform_codegen::messages::{keys, MessageBundle, MessageProvider};
    ///
    /// let bundle = MessageBundle::from_toml_str(
    ///     r#""structure.no_sources" = "Transformation '{0}' hat keine Quelltabelle""#,
    /// ).unwrap();
    /// assert_eq!(
    ///     bundle.message(keys::NO_SOURCES, &["Sort"]),
    ///     "Transformation 'Sort' hat keine Quelltabelle"
    /// );
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn with_template(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(key.into(), template.into());
        self
    }

    /// Overlay `other` on top of this bundle
    pub fn merged_with(mut self, other: MessageBundle) -> Self {
        self.templates.extend(other.templates);
        self
    }
}

impl MessageProvider for MessageBundle {
    fn message(&self, key: &str, args: &[&str]) -> String {
        match self.templates.get(key) {
            Some(template) => substitute(template, args),
            None if args.is_empty() => key.to_string(),
            None => format!("{}: {}", key, args.join(", ")),
        }
    }
}

/// Single pass over `template`; argument text is copied verbatim
fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let placeholder = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            args.get(index).map(|arg| (*arg, close))
        });
        match placeholder {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
