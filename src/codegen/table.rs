//! Table facade used by generators
//!
//! Wraps a [`TableEntity`] and derives everything a generator needs to
//! reference the table in generated code: its physical location and the
//! option text applied when it is read or written.

use super::context::RequestContext;
use super::error::CodegenResult;
use crate::messages::keys;
use crate::models::TableEntity;
use crate::validation::names::{validate_libref, validate_member_name};

/// Read-only view of a table entity during one generation call
#[derive(Debug, Clone, Copy)]
pub struct TableCodegen<'a> {
    entity: &'a TableEntity,
}

impl<'a> TableCodegen<'a> {
    pub fn new(entity: &'a TableEntity) -> Self {
        Self { entity }
    }

    pub fn entity(&self) -> &'a TableEntity {
        self.entity
    }

    /// Library reference, falling back to the configured default
    pub fn libref(&self, context: &RequestContext<'_>) -> CodegenResult<String> {
        let libref = self
            .entity
            .libref
            .as_deref()
            .unwrap_or(&context.config().default_libref);
        validate_libref(libref).map_err(|e| {
            context.resolution_error(
                &self.entity.id,
                keys::INVALID_LOCATION,
                &[self.entity.name.as_str(), e.to_string().as_str()],
            )
        })?;
        Ok(libref.to_string())
    }

    pub fn member_name(&self, context: &RequestContext<'_>) -> CodegenResult<String> {
        validate_member_name(&self.entity.name).map_err(|e| {
            context.resolution_error(
                &self.entity.id,
                keys::INVALID_LOCATION,
                &[self.entity.name.as_str(), e.to_string().as_str()],
            )
        })?;
        Ok(self.entity.name.clone())
    }

    /// Physical location as `LIBREF.MEMBER`
    pub fn location(&self, context: &RequestContext<'_>) -> CodegenResult<String> {
        Ok(format!(
            "{}.{}",
            self.libref(context)?,
            self.member_name(context)?
        ))
    }

    /// Option text applied when the table is an input; empty if none
    pub fn read_options(&self) -> String {
        let mut parts = Vec::new();

        if !self.entity.keep.is_empty() {
            parts.push(format!("keep={}", self.entity.keep.join(" ")));
        }

        if !self.entity.rename.is_empty() {
            let pairs: Vec<String> = self
                .entity
                .rename
                .iter()
                .map(|r| format!("{}={}", r.from, r.to))
                .collect();
            parts.push(format!("rename=({})", pairs.join(" ")));
        }

        if let Some(condition) = non_blank(self.entity.where_clause.as_deref()) {
            parts.push(format!("where=({})", condition));
        }

        if let Some(extra) = non_blank(self.entity.read_options.as_deref()) {
            parts.push(extra.to_string());
        }

        parts.join(" ")
    }

    /// Option text applied when the table is an output; empty if none
    ///
    /// `include_target_label_info` adds the table label. Final targets ask for
    /// it, intermediate tables do not.
    pub fn write_options(&self, include_target_label_info: bool) -> String {
        let mut parts = Vec::new();

        if include_target_label_info {
            if let Some(label) = non_blank(self.entity.label.as_deref()) {
                parts.push(format!("label=\"{}\"", label.replace('"', "\"\"")));
            }
        }

        if let Some(extra) = non_blank(self.entity.write_options.as_deref()) {
            parts.push(extra.to_string());
        }

        parts.join(" ")
    }

    /// `label` and `format` statements for the table's columns
    ///
    /// Formats are always included; column labels only with
    /// `include_target_label_info`.
    pub fn column_attribute_statements(&self, include_target_label_info: bool) -> Vec<String> {
        let mut statements = Vec::new();

        if include_target_label_info {
            let labels: Vec<String> = self
                .entity
                .columns
                .iter()
                .filter_map(|c| {
                    non_blank(c.label.as_deref())
                        .map(|label| format!("{}=\"{}\"", c.name, label.replace('"', "\"\"")))
                })
                .collect();
            if !labels.is_empty() {
                statements.push(format!("label {};", labels.join(" ")));
            }
        }

        let formats: Vec<String> = self
            .entity
            .columns
            .iter()
            .filter_map(|c| non_blank(c.format.as_deref()).map(|format| format!("{} {}", c.name, format)))
            .collect();
        if !formats.is_empty() {
            statements.push(format!("format {};", formats.join(" ")));
        }

        statements
    }

    pub fn is_external(&self) -> bool {
        self.entity.is_external()
    }

    pub fn is_permanent_view(&self) -> bool {
        self.entity.permanent_view
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
