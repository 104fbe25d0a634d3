//! Option text resolution from a transformation's property bag
//!
//! Property keys have the form `<CATEGORY>.<OPTION>`. The category match is
//! ASCII case-insensitive. Values render as follows:
//!
//! | value            | rendered          |
//! |------------------|-------------------|
//! | `true`           | `OPTION`          |
//! | `false`, `null`  | omitted           |
//! | string           | `OPTION=value`    |
//! | number           | `OPTION=n`        |
//! | array            | `OPTION=(a b c)`  |
//!
//! The option name `OPTIONS` holds literal text appended after all rendered
//! options.

use crate::models::TransformGraph;
use serde_json::Value;
use tracing::debug;

/// Option categories known to the built-in generators
pub mod categories {
    pub const SORT: &str = "SORT";
    pub const APPEND: &str = "APPEND";
    pub const SYSTEM: &str = "SYSTEM";
}

/// Reserved option name holding literal text
pub const LITERAL_OPTION: &str = "OPTIONS";

/// Stateless resolver; the same graph and category always give the same text
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionsResolver;

impl OptionsResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the option text of `category`; `""` when nothing is configured
    pub fn resolve(&self, graph: &TransformGraph, category: &str) -> String {
        let mut rendered: Vec<String> = Vec::new();
        let mut literal: Vec<String> = Vec::new();

        for (key, value) in &graph.properties {
            let Some((key_category, option)) = key.split_once('.') else {
                continue;
            };
            if !key_category.eq_ignore_ascii_case(category) || option.is_empty() {
                continue;
            }

            if option.eq_ignore_ascii_case(LITERAL_OPTION) {
                if let Some(text) = value.as_str() {
                    let text = text.trim();
                    if !text.is_empty() {
                        literal.push(text.to_string());
                    }
                }
                continue;
            }

            if let Some(text) = render_option(option, value) {
                rendered.push(text);
            } else if value.is_object() {
                debug!(
                    "Ignoring structured value for option '{}' of transformation '{}'",
                    key,
                    graph.name
                );
            }
        }

        rendered.extend(literal);
        rendered.join(" ").trim().to_string()
    }
}

fn render_option(option: &str, value: &Value) -> Option<String> {
    match value {
        Value::Bool(true) => Some(option.to_string()),
        Value::Bool(false) | Value::Null | Value::Object(_) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(format!("{}={}", option, s.trim())),
        Value::Number(n) => Some(format!("{}={}", option, n)),
        Value::Array(items) => {
            let items: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect();
            if items.is_empty() {
                None
            } else {
                Some(format!("{}=({})", option, items.join(" ")))
            }
        }
    }
}
