//! Sort transformation generator

use super::Generator;
use super::mapping::{ColumnMapper, RenameColumnMapper};
use crate::codegen::options::categories;
use crate::codegen::{CodegenResult, RequestContext, STATUS_VARIABLE};
use crate::messages::keys;
use crate::models::{TransformGraph, TransformKind};
use std::sync::Arc;
use tracing::info;

/// Generates a `proc sort` step
///
/// ```text
/// proc datasets lib = WORK nolist nowarn memtype = (data view);
///    delete OUT;
/// quit;
///
/// proc sort data = STAGE.CLASS (keep=NAME AGE)
///    out = WORK.OUT (label="Sorted class")
///    NODUPKEY;
///    by AGE;
/// run;
///
/// %rcSet(&syserr);
/// ```
pub struct SortGenerator {
    mapper: Arc<dyn ColumnMapper>,
}

impl Default for SortGenerator {
    fn default() -> Self {
        Self::new(Arc::new(RenameColumnMapper))
    }
}

impl SortGenerator {
    pub fn new(mapper: Arc<dyn ColumnMapper>) -> Self {
        Self { mapper }
    }
}

impl Generator for SortGenerator {
    fn kind(&self) -> TransformKind {
        TransformKind::Sort
    }

    fn generate(&self, context: &mut RequestContext<'_>, graph: &TransformGraph) -> CodegenResult<()> {
        context.check_source_and_target(graph)?;
        context.check_targets_for_external_table(graph)?;
        context.check_sources_for_external_table(graph)?;

        let source = context.resolve_source_table_cg(graph)?;
        let mut source_options = source.read_options();

        let target = context.resolve_target_table_cg(graph)?;
        let target_location = target.location(context)?;
        let target_options = target.write_options(true);

        let sort_options = context.resolve_options(graph, categories::SORT);

        context.emit_system_options(graph);
        context.emit_table_delete(&target)?;

        // The mapping step already read the source with its options.
        if self.mapper.apply(context, graph, &source_options)? {
            source_options.clear();
        }

        let data = context.last_output().to_string();
        context.append(format!("proc sort data = {}", data));
        if !source_options.trim().is_empty() {
            context.append(format!(" ({})", source_options.trim()));
        }
        context.append_line("");

        context.indent();
        context.append(format!("out = {}", target_location));
        if !target_options.trim().is_empty() {
            context.append(format!(" ({})", target_options.trim()));
        }
        if !sort_options.trim().is_empty() {
            context.append_line("");
            context.append(sort_options.trim());
        }
        context.append_line(";");

        let order_by = context.build_order_by_clause(graph).ok_or_else(|| {
            context.configuration_error(
                categories::SORT,
                keys::MISSING_ORDER_BY,
                &[categories::SORT],
            )
        })?;
        context.append_line(order_by);

        context.unindent();
        context.append_line("run;");
        context.emit_column_attributes(&target, true)?;
        context.finish(STATUS_VARIABLE);

        info!("Generated sort code for '{}' into {}", graph.name, target_location);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{CodegenError, GenerationEnv};
    use crate::config::CodegenConfig;
    use crate::generators::mapping::NoColumnMapping;
    use crate::messages::MessageBundle;
    use crate::metadata::TableCatalog;
    use crate::models::{OrderColumn, TableEntity};

    fn run(generator: &SortGenerator, catalog: &TableCatalog, graph: &TransformGraph) -> (CodegenResult<()>, String) {
        let messages = MessageBundle::english();
        let config = CodegenConfig::default();
        let mut context =
            RequestContext::new(GenerationEnv::new(catalog, &messages, &config), &graph.name);
        let result = generator.generate(&mut context, graph);
        (result, context.render())
    }

    fn catalog() -> TableCatalog {
        TableCatalog::from_tables([
            TableEntity::new("CLASS").with_libref("STAGE"),
            TableEntity::new("OUT").with_label("Sorted class"),
        ])
    }

    #[test]
    fn test_full_statement() {
        let graph = TransformGraph::new("Sort class", TransformKind::Sort)
            .with_source("CLASS")
            .with_target("OUT")
            .with_order_by(OrderColumn::ascending("AGE"))
            .with_property("SORT.NODUPKEY", true);

        let (result, code) = run(&SortGenerator::new(Arc::new(NoColumnMapping)), &catalog(), &graph);
        result.unwrap();
        assert_eq!(
            code,
            "proc datasets lib = WORK nolist nowarn memtype = (data view);\n\
             \x20  delete OUT;\n\
             quit;\n\
             \n\
             proc sort data = STAGE.CLASS\n\
             \x20  out = WORK.OUT (label=\"Sorted class\")\n\
             \x20  NODUPKEY;\n\
             \x20  by AGE;\n\
             run;\n\
             \n\
             %rcSet(&syserr);\n\
             \n"
        );
    }

    #[test]
    fn test_missing_order_by_names_category() {
        let graph = TransformGraph::new("Sort class", TransformKind::Sort)
            .with_source("CLASS")
            .with_target("OUT");
        let (result, code) = run(&SortGenerator::default(), &catalog(), &graph);
        match result {
            Err(CodegenError::Configuration { category, message, .. }) => {
                assert_eq!(category, "SORT");
                assert!(message.contains("SORT"));
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
        assert!(!code.contains("by "));
        assert!(!code.contains("%rcSet"));
    }
}
