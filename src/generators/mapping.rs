//! Column-mapping pass run ahead of a generator's main statement
//!
//! When a graph maps source columns to differently named target columns, the
//! pass writes a `data` step into a work table that projects and renames the
//! columns. The work table becomes the last output, so the main statement
//! reads already-mapped data.

use crate::codegen::{CodegenResult, RequestContext};
use crate::models::TransformGraph;
use tracing::debug;

/// Collaborator that may insert a rename/extract step into the buffer
pub trait ColumnMapper: Send + Sync {
    /// Returns `true` when a step was emitted. The step has then applied
    /// `source_options` itself and the caller must not apply them again.
    fn apply(
        &self,
        context: &mut RequestContext<'_>,
        graph: &TransformGraph,
        source_options: &str,
    ) -> CodegenResult<bool>;
}

/// Mapper that never emits anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoColumnMapping;

impl ColumnMapper for NoColumnMapping {
    fn apply(
        &self,
        _context: &mut RequestContext<'_>,
        _graph: &TransformGraph,
        _source_options: &str,
    ) -> CodegenResult<bool> {
        Ok(false)
    }
}

/// Emits a keep/rename `data` step for the graph's column mappings
#[derive(Debug, Clone, Copy, Default)]
pub struct RenameColumnMapper;

impl ColumnMapper for RenameColumnMapper {
    fn apply(
        &self,
        context: &mut RequestContext<'_>,
        graph: &TransformGraph,
        source_options: &str,
    ) -> CodegenResult<bool> {
        if graph.column_mappings.is_empty() {
            return Ok(false);
        }

        let input = context.last_output().to_string();
        let work_table = context.next_work_table(graph);
        debug!(
            "Mapping {} columns of '{}' into {}",
            graph.column_mappings.len(),
            graph.name,
            work_table
        );

        context.append_line(format!("data {};", work_table));
        context.indent();

        let source_options = source_options.trim();
        if source_options.is_empty() {
            context.append_line(format!("set {};", input));
        } else {
            context.append_line(format!("set {} ({});", input, source_options));
        }

        let keep: Vec<&str> = graph
            .column_mappings
            .iter()
            .map(|m| m.source.as_str())
            .collect();
        context.append_line(format!("keep {};", keep.join(" ")));

        let renames: Vec<String> = graph
            .column_mappings
            .iter()
            .filter(|m| m.is_rename())
            .map(|m| format!("{} = {}", m.source, m.target))
            .collect();
        if !renames.is_empty() {
            context.append_line(format!("rename {};", renames.join(" ")));
        }

        context.unindent();
        context.append_line("run;");
        context.append_line("");

        context.set_last_output(work_table);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::GenerationEnv;
    use crate::config::CodegenConfig;
    use crate::messages::MessageBundle;
    use crate::metadata::TableCatalog;
    use crate::models::TransformKind;

    #[test]
    fn test_rename_mapper() {
        let catalog = TableCatalog::new();
        let messages = MessageBundle::english();
        let config = CodegenConfig::default();
        let mut context =
            RequestContext::new(GenerationEnv::new(&catalog, &messages, &config), "Sort");
        context.set_last_output("STAGE.SRC");

        let graph = TransformGraph::new("Sort", TransformKind::Sort)
            .with_column_mapping("NAME", "FULL_NAME")
            .with_column_mapping("AGE", "AGE");
        let applied = RenameColumnMapper
            .apply(&mut context, &graph, "where=(AGE > 12)")
            .unwrap();

        assert!(applied);
        let work = context.last_output().to_string();
        assert!(work.starts_with("WORK.W"));
        assert_eq!(
            context.render(),
            format!(
                "data {};\n   set STAGE.SRC (where=(AGE > 12));\n   keep NAME AGE;\n   rename NAME = FULL_NAME;\nrun;\n\n",
                work
            )
        );
    }

    #[test]
    fn test_rename_mapper_without_mappings() {
        let catalog = TableCatalog::new();
        let messages = MessageBundle::english();
        let config = CodegenConfig::default();
        let mut context =
            RequestContext::new(GenerationEnv::new(&catalog, &messages, &config), "Sort");
        let graph = TransformGraph::new("Sort", TransformKind::Sort);

        assert!(!RenameColumnMapper.apply(&mut context, &graph, "keep=A").unwrap());
        assert!(!NoColumnMapping.apply(&mut context, &graph, "keep=A").unwrap());
        assert!(context.buffer().is_empty());
    }
}
