//! Append transformation generator

use super::Generator;
use crate::codegen::options::categories;
use crate::codegen::{CodegenResult, RequestContext, STATUS_VARIABLE};
use crate::models::{TransformGraph, TransformKind};
use tracing::info;

/// Concatenates every source into the target with a `data`/`set` step
#[derive(Debug, Clone, Copy, Default)]
pub struct AppendGenerator;

impl Generator for AppendGenerator {
    fn kind(&self) -> TransformKind {
        TransformKind::Append
    }

    fn generate(&self, context: &mut RequestContext<'_>, graph: &TransformGraph) -> CodegenResult<()> {
        context.check_source_and_target(graph)?;
        context.check_targets_for_external_table(graph)?;
        context.check_sources_for_external_table(graph)?;

        let mut inputs = Vec::new();
        for source in context.resolve_source_tables_cg(graph)? {
            let location = source.location(context)?;
            let options = source.read_options();
            if options.trim().is_empty() {
                inputs.push(location);
            } else {
                inputs.push(format!("{} ({})", location, options.trim()));
            }
        }

        let target = context.resolve_target_table_cg(graph)?;
        let target_location = target.location(context)?;
        let target_options = target.write_options(true);

        let append_options = context.resolve_options(graph, categories::APPEND);

        context.emit_system_options(graph);
        context.emit_table_delete(&target)?;

        context.append(format!("data {}", target_location));
        if !target_options.trim().is_empty() {
            context.append(format!(" ({})", target_options.trim()));
        }
        context.append_line(";");

        context.indent();
        context.append("set");
        for input in &inputs {
            context.append_line("");
            context.indent();
            context.append(input.as_str());
            context.unindent();
        }
        if !append_options.trim().is_empty() {
            context.append_line("");
            context.indent();
            context.append(append_options.trim());
            context.unindent();
        }
        context.append_line(";");
        for statement in target.column_attribute_statements(true) {
            context.append_line(statement);
        }
        context.unindent();

        context.append_line("run;");
        context.set_last_output(target_location.clone());
        context.finish(STATUS_VARIABLE);

        info!(
            "Generated append code for '{}' from {} sources into {}",
            graph.name,
            inputs.len(),
            target_location
        );
        Ok(())
    }
}
