//! Program generation
//!
//! [`ProgramGenerator`] is the dispatcher: it picks the generator for each
//! transformation, runs it in a fresh [`RequestContext`] and assembles the
//! successful outputs into one program. A failed transformation contributes
//! no code; its failure is reported and the remaining transformations are
//! still generated.

pub mod ordering;

use crate::codegen::{CodeBuffer, CodegenError, CodegenResult, GenerationEnv, RequestContext};
use crate::config::CodegenConfig;
use crate::generators::GeneratorRegistry;
use crate::messages::{MessageBundle, MessageProvider, keys};
use crate::metadata::{JobDefinition, TableLookup};
use crate::models::{TransformGraph, TransformKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

pub use ordering::{ExecutionPlan, execution_order};

/// A transformation whose code was omitted from the program
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformFailure {
    pub transform: String,
    pub kind: TransformKind,
    /// Error class (`structural`, `resolution`, ...)
    pub class: String,
    /// Localized message
    pub message: String,
}

/// Result of generating a whole job
#[derive(Debug, Clone, Serialize)]
pub struct ProgramOutput {
    pub job: String,
    pub code: String,
    /// Names of the transformations included in `code`, in program order
    pub generated: Vec<String>,
    pub failures: Vec<TransformFailure>,
    pub generated_at: DateTime<Utc>,
}

impl ProgramOutput {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Dispatcher turning transformation graphs into code
#[derive(Clone)]
pub struct ProgramGenerator {
    registry: GeneratorRegistry,
    messages: Arc<dyn MessageProvider>,
    config: CodegenConfig,
}

impl Default for ProgramGenerator {
    fn default() -> Self {
        Self::new(CodegenConfig::default())
    }
}

impl ProgramGenerator {
    /// Dispatcher with the built-in generators and English messages
    pub fn new(config: CodegenConfig) -> Self {
        Self {
            registry: GeneratorRegistry::with_defaults(),
            messages: Arc::new(MessageBundle::english()),
            config,
        }
    }

    pub fn with_registry(mut self, registry: GeneratorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_messages(mut self, messages: Arc<dyn MessageProvider>) -> Self {
        self.messages = messages;
        self
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Generate one transformation in a fresh context
    ///
    /// On error the partially written buffer is dropped.
    pub fn generate_transform(
        &self,
        lookup: &dyn TableLookup,
        graph: &TransformGraph,
    ) -> CodegenResult<CodeBuffer> {
        let generator = self.registry.get(graph.kind).ok_or_else(|| {
            let kind = graph.kind.to_string();
            CodegenError::UnsupportedKind {
                transform: graph.name.clone(),
                message: self.messages.message(
                    keys::UNSUPPORTED_KIND,
                    &[graph.name.as_str(), kind.as_str()],
                ),
                kind,
            }
        })?;

        let env = GenerationEnv::new(lookup, self.messages.as_ref(), &self.config);
        let mut context = RequestContext::new(env, graph.name.as_str());
        generator.generate(&mut context, graph)?;
        Ok(context.into_buffer())
    }

    /// Generate every transformation of a job in dependency order
    pub fn generate_program(&self, job: &JobDefinition) -> ProgramOutput {
        let catalog = job.catalog();
        let plan = execution_order(&job.transformations);
        if plan.cyclic {
            warn!(
                "Transformations of job '{}' depend on each other in a cycle; using declared order",
                job.name
            );
        }

        let generated_at = Utc::now();
        let line_break = self.config.line_ending.as_str();
        let mut code = String::new();
        let mut generated = Vec::new();
        let mut failures = Vec::new();

        if self.config.emit_header {
            code.push_str(&format!(
                "/* Job: {}  Generated: {} */{}{}",
                job.name,
                generated_at.to_rfc3339(),
                line_break,
                line_break
            ));
        }

        for index in plan.order {
            let graph = &job.transformations[index];
            match self.generate_transform(&catalog, graph) {
                Ok(buffer) => {
                    if self.config.emit_step_comments {
                        code.push_str(&format!(
                            "/* Step: {} ({}) */{}",
                            graph.name, graph.kind, line_break
                        ));
                    }
                    code.push_str(&buffer.render());
                    generated.push(graph.name.clone());
                }
                Err(err) => {
                    warn!(
                        "Omitting transformation '{}' ({}) from job '{}': {}",
                        graph.name, graph.kind, job.name, err
                    );
                    failures.push(TransformFailure {
                        transform: graph.name.clone(),
                        kind: graph.kind,
                        class: err.class().to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(
            "Generated job '{}': {} transformations, {} failed",
            job.name,
            generated.len(),
            failures.len()
        );

        ProgramOutput {
            job: job.name.clone(),
            code,
            generated,
            failures,
            generated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::SortGenerator;
    use crate::models::{OrderColumn, TableEntity};

    #[test]
    fn test_unsupported_kind() {
        let mut registry = GeneratorRegistry::new();
        registry.register(Arc::new(SortGenerator::default()));
        let dispatcher = ProgramGenerator::default().with_registry(registry);

        let catalog = crate::metadata::TableCatalog::new();
        let graph = TransformGraph::new("Append", TransformKind::Append);
        let err = dispatcher.generate_transform(&catalog, &graph).unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedKind { ref kind, .. } if kind == "append"));
        assert!(err.to_string().contains("'append'"));
    }

    #[test]
    fn test_header_and_step_comments() {
        let job = JobDefinition::new("nightly")
            .with_table(TableEntity::new("SRC"))
            .with_table(TableEntity::new("OUT"))
            .with_transformation(
                TransformGraph::new("Sort", TransformKind::Sort)
                    .with_source("SRC")
                    .with_target("OUT")
                    .with_order_by(OrderColumn::ascending("ID")),
            );
        let dispatcher = ProgramGenerator::new(CodegenConfig::new().with_header(true));
        let output = dispatcher.generate_program(&job);

        assert!(output.is_complete());
        assert!(output.code.starts_with("/* Job: nightly  Generated: "));
        assert!(output.code.contains("/* Step: Sort (sort) */\n"));

        let quiet = ProgramGenerator::new(CodegenConfig::new().with_step_comments(false));
        let output = quiet.generate_program(&job);
        assert!(output.code.starts_with("proc datasets"));
    }
}
