//! Per-transformation request context
//!
//! A [`RequestContext`] is created for exactly one generation call. It owns
//! the [`CodeBuffer`] the generator writes into and offers the validation,
//! table resolution and emission helpers shared by every generator.

use super::buffer::CodeBuffer;
use super::error::CodegenError;
use super::error::CodegenResult;
use super::options::{OptionsResolver, categories};
use super::table::TableCodegen;
use crate::config::CodegenConfig;
use crate::messages::{MessageProvider, keys};
use crate::metadata::TableLookup;
use crate::models::{TableEdge, TransformGraph};
use tracing::debug;

/// Runtime status variable checked after every step
pub const STATUS_VARIABLE: &str = "&syserr";

/// Macro invoked with the status variable by [`RequestContext::finish`]
pub const STATUS_CHECK_MACRO: &str = "%rcSet";

/// Reference to the most recently produced dataset at run time
pub const LAST_OUTPUT: &str = "&SYSLAST";

/// Collaborators shared by all generation calls
#[derive(Clone, Copy)]
pub struct GenerationEnv<'a> {
    pub lookup: &'a dyn TableLookup,
    pub messages: &'a dyn MessageProvider,
    pub config: &'a CodegenConfig,
}

impl<'a> GenerationEnv<'a> {
    pub fn new(
        lookup: &'a dyn TableLookup,
        messages: &'a dyn MessageProvider,
        config: &'a CodegenConfig,
    ) -> Self {
        Self {
            lookup,
            messages,
            config,
        }
    }
}

/// Orchestrator state for one transformation
pub struct RequestContext<'a> {
    env: GenerationEnv<'a>,
    transform: String,
    buffer: CodeBuffer,
    options: OptionsResolver,
    last_output: Option<String>,
    work_tables: usize,
}

impl<'a> RequestContext<'a> {
    pub fn new(env: GenerationEnv<'a>, transform: impl Into<String>) -> Self {
        Self {
            buffer: CodeBuffer::with_config(env.config),
            env,
            transform: transform.into(),
            options: OptionsResolver::new(),
            last_output: None,
            work_tables: 0,
        }
    }

    pub fn transform_name(&self) -> &str {
        &self.transform
    }

    pub fn config(&self) -> &'a CodegenConfig {
        self.env.config
    }

    pub fn buffer(&self) -> &CodeBuffer {
        &self.buffer
    }

    pub fn into_buffer(self) -> CodeBuffer {
        self.buffer
    }

    pub fn render(&self) -> String {
        self.buffer.render()
    }

    // Validation

    /// At least one source and exactly one target, which is not also a source
    pub fn check_source_and_target(&self, graph: &TransformGraph) -> CodegenResult<()> {
        if graph.sources.is_empty() {
            return Err(self.structural_error(keys::NO_SOURCES, &[]));
        }
        if graph.targets.len() != 1 {
            let found = graph.targets.len().to_string();
            return Err(self.structural_error(keys::TARGET_COUNT, &[found.as_str()]));
        }
        if let Some(target) = graph.target().filter(|t| graph.sources.contains(*t)) {
            return Err(self.structural_error(keys::SOURCE_IS_TARGET, &[target.table_id.as_str()]));
        }
        Ok(())
    }

    /// Generated code may only delete or overwrite managed tables
    pub fn check_targets_for_external_table(&self, graph: &TransformGraph) -> CodegenResult<()> {
        let target = self.resolve_target_table_cg(graph)?;
        if target.is_external() {
            return Err(self.structural_error(keys::EXTERNAL_TARGET, &[target.entity().name.as_str()]));
        }
        Ok(())
    }

    /// External sources are only accepted when they are permanent views
    pub fn check_sources_for_external_table(&self, graph: &TransformGraph) -> CodegenResult<()> {
        for edge in &graph.sources {
            let source = self.lookup_edge(edge)?;
            if source.is_external() && !source.is_permanent_view() {
                return Err(self.structural_error(keys::EXTERNAL_SOURCE, &[source.entity().name.as_str()]));
            }
        }
        Ok(())
    }

    // Resolution

    /// Facade for the first source table
    ///
    /// Its location becomes the last produced dataset unless something was
    /// already produced in this context.
    pub fn resolve_source_table_cg(
        &mut self,
        graph: &TransformGraph,
    ) -> CodegenResult<TableCodegen<'a>> {
        let edge = graph
            .sources
            .first()
            .ok_or_else(|| self.structural_error(keys::NO_SOURCES, &[]))?;
        let source = self.lookup_edge(edge)?;
        if self.last_output.is_none() {
            self.last_output = Some(source.location(self)?);
        }
        Ok(source)
    }

    /// Facades for all source tables in edge order
    pub fn resolve_source_tables_cg(
        &self,
        graph: &TransformGraph,
    ) -> CodegenResult<Vec<TableCodegen<'a>>> {
        graph.sources.iter().map(|edge| self.lookup_edge(edge)).collect()
    }

    pub fn resolve_target_table_cg(&self, graph: &TransformGraph) -> CodegenResult<TableCodegen<'a>> {
        let edge = graph.target().ok_or_else(|| {
            let found = graph.targets.len().to_string();
            self.structural_error(keys::TARGET_COUNT, &[found.as_str()])
        })?;
        self.lookup_edge(edge)
    }

    fn lookup_edge(&self, edge: &TableEdge) -> CodegenResult<TableCodegen<'a>> {
        let lookup: &'a dyn TableLookup = self.env.lookup;
        lookup
            .lookup(edge)
            .map(TableCodegen::new)
            .ok_or_else(|| {
                self.resolution_error(&edge.table_id, keys::UNRESOLVED_TABLE, &[edge.table_id.as_str()])
            })
    }

    pub fn resolve_options(&self, graph: &TransformGraph, category: &str) -> String {
        let resolved = self.options.resolve(graph, category);
        debug!(
            "Resolved {} options for '{}': '{}'",
            category, self.transform, resolved
        );
        resolved
    }

    // Emission

    /// `options` statement from the global options and the `SYSTEM` category
    pub fn emit_system_options(&mut self, graph: &TransformGraph) {
        let mut parts: Vec<String> = self
            .env
            .config
            .global_options
            .iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let system = self.resolve_options(graph, categories::SYSTEM);
        if !system.is_empty() {
            parts.push(system);
        }

        if parts.is_empty() {
            return;
        }

        self.append_line(format!("options {};", parts.join(" ")));
        self.append_line("");
    }

    /// Delete statement for a managed table
    ///
    /// # Panics
    ///
    /// Panics for an external table; generators must run
    /// [`check_targets_for_external_table`](Self::check_targets_for_external_table) first.
    pub fn emit_table_delete(&mut self, table: &TableCodegen<'_>) -> CodegenResult<()> {
        assert!(
            !table.is_external(),
            "emit_table_delete called for external table '{}'",
            table.entity().name
        );

        let libref = table.libref(self)?;
        let member = table.member_name(self)?;
        debug!("Emitting delete of {}.{} for '{}'", libref, member, self.transform);

        self.append_line(format!(
            "proc datasets lib = {} nolist nowarn memtype = (data view);",
            libref
        ));
        self.indent();
        self.append_line(format!("delete {};", member));
        self.unindent();
        self.append_line("quit;");
        self.append_line("");
        Ok(())
    }

    /// Column labels and formats applied to an existing table in place
    ///
    /// Writes nothing when the table defines no column attributes.
    pub fn emit_column_attributes(
        &mut self,
        table: &TableCodegen<'_>,
        include_target_label_info: bool,
    ) -> CodegenResult<()> {
        let statements = table.column_attribute_statements(include_target_label_info);
        if statements.is_empty() {
            return Ok(());
        }

        let libref = table.libref(self)?;
        let member = table.member_name(self)?;
        debug!("Emitting column attributes of {}.{} for '{}'", libref, member, self.transform);

        self.append_line("");
        self.append_line(format!("proc datasets lib = {} nolist nowarn;", libref));
        self.indent();
        self.append_line(format!("modify {};", member));
        self.indent();
        for statement in statements {
            self.append_line(statement);
        }
        self.unindent();
        self.unindent();
        self.append_line("quit;");
        Ok(())
    }

    /// `by` statement from the graph's order-by columns; `None` when empty
    pub fn build_order_by_clause(&self, graph: &TransformGraph) -> Option<String> {
        if graph.order_by.is_empty() {
            return None;
        }

        let columns: Vec<String> = graph
            .order_by
            .iter()
            .map(|c| {
                if c.descending {
                    format!("descending {}", c.name)
                } else {
                    c.name.clone()
                }
            })
            .collect();

        Some(format!("by {};", columns.join(" ")))
    }

    /// Most recently produced dataset
    pub fn last_output(&self) -> &str {
        self.last_output.as_deref().unwrap_or(LAST_OUTPUT)
    }

    pub fn set_last_output(&mut self, location: impl Into<String>) {
        self.last_output = Some(location.into());
    }

    /// Fresh intermediate table in the work library, stable for a given graph
    pub fn next_work_table(&mut self, graph: &TransformGraph) -> String {
        self.work_tables += 1;
        let id = graph.id().simple().to_string().to_uppercase();
        format!(
            "{}.W{}_{}",
            self.env.config.work_libref,
            &id[..8],
            self.work_tables
        )
    }

    pub fn append(&mut self, text: impl Into<String>) {
        self.buffer.append(text);
    }

    pub fn append_line(&mut self, text: impl AsRef<str>) {
        self.buffer.append_line(text);
    }

    pub fn indent(&mut self) {
        self.buffer.indent();
    }

    pub fn unindent(&mut self) {
        self.buffer.unindent();
    }

    /// Trailing status check; the last call of a successful generation
    pub fn finish(&mut self, status_variable: &str) {
        self.append_line("");
        self.append_line(format!("{}({});", STATUS_CHECK_MACRO, status_variable));
        self.append_line("");
    }

    // Error construction

    pub fn structural_error(&self, key: &str, args: &[&str]) -> CodegenError {
        CodegenError::Structural {
            transform: self.transform.clone(),
            message: self.message(key, args),
        }
    }

    pub fn resolution_error(&self, reference: &str, key: &str, args: &[&str]) -> CodegenError {
        CodegenError::Resolution {
            transform: self.transform.clone(),
            reference: reference.to_string(),
            message: self.message(key, args),
        }
    }

    pub fn configuration_error(&self, category: &str, key: &str, args: &[&str]) -> CodegenError {
        CodegenError::Configuration {
            transform: self.transform.clone(),
            category: category.to_string(),
            message: self.message(key, args),
        }
    }

    /// Message with the transformation name as argument `{0}`
    fn message(&self, key: &str, args: &[&str]) -> String {
        let mut all: Vec<&str> = Vec::with_capacity(args.len() + 1);
        all.push(&self.transform);
        all.extend_from_slice(args);
        self.env.messages.message(key, &all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MessageBundle;
    use crate::metadata::TableCatalog;
    use crate::models::{OrderColumn, TableColumn, TableEntity, TableStorage, TransformKind};

    fn catalog() -> TableCatalog {
        TableCatalog::from_tables([
            TableEntity::new("SRC").with_libref("STAGE"),
            TableEntity::new("OUT"),
            TableEntity::new("RAW").with_storage(TableStorage::External),
            TableEntity::new("V_RAW").as_permanent_view(),
            TableEntity::new("bad name").with_id("BAD"),
        ])
    }

    fn with_context<F>(f: F)
    where
        F: FnOnce(&mut RequestContext<'_>),
    {
        let catalog = catalog();
        let messages = MessageBundle::english();
        let config = CodegenConfig::default();
        let env = GenerationEnv::new(&catalog, &messages, &config);
        let mut context = RequestContext::new(env, "Sort");
        f(&mut context);
    }

    fn sort_graph() -> TransformGraph {
        TransformGraph::new("Sort", TransformKind::Sort)
            .with_source("SRC")
            .with_target("OUT")
    }

    #[test]
    fn test_check_source_and_target() {
        with_context(|ctx| {
            assert!(ctx.check_source_and_target(&sort_graph()).is_ok());

            let no_source = TransformGraph::new("Sort", TransformKind::Sort).with_target("OUT");
            let err = ctx.check_source_and_target(&no_source).unwrap_err();
            assert!(matches!(err, CodegenError::Structural { .. }));
            assert_eq!(err.to_string(), "Transformation 'Sort' has no source tables");

            let two_targets = sort_graph().with_target("SRC");
            let err = ctx.check_source_and_target(&two_targets).unwrap_err();
            assert!(err.to_string().contains("found 2"));

            let in_place = TransformGraph::new("Sort", TransformKind::Sort)
                .with_source("SRC")
                .with_source("OUT")
                .with_target("OUT");
            let err = ctx.check_source_and_target(&in_place).unwrap_err();
            assert!(matches!(err, CodegenError::Structural { .. }));
            assert!(err.to_string().contains("'OUT'"));
            assert!(ctx.buffer().is_empty());
        });
    }

    #[test]
    fn test_external_source_rules() {
        with_context(|ctx| {
            let view = sort_graph().with_source("V_RAW");
            assert!(ctx.check_sources_for_external_table(&view).is_ok());

            let raw = sort_graph().with_source("RAW");
            let err = ctx.check_sources_for_external_table(&raw).unwrap_err();
            assert!(matches!(err, CodegenError::Structural { .. }));
            assert!(err.to_string().contains("'RAW'"));
        });
    }

    #[test]
    fn test_external_target_rejected() {
        with_context(|ctx| {
            let graph = TransformGraph::new("Sort", TransformKind::Sort)
                .with_source("SRC")
                .with_target("V_RAW");
            let err = ctx.check_targets_for_external_table(&graph).unwrap_err();
            assert!(matches!(err, CodegenError::Structural { .. }));
        });
    }

    #[test]
    fn test_unknown_table_is_resolution_error() {
        with_context(|ctx| {
            let graph = TransformGraph::new("Sort", TransformKind::Sort)
                .with_source("MISSING")
                .with_target("OUT");
            let err = ctx.resolve_source_table_cg(&graph).unwrap_err();
            assert_eq!(
                err,
                CodegenError::Resolution {
                    transform: "Sort".to_string(),
                    reference: "MISSING".to_string(),
                    message: "Table 'MISSING' referenced by transformation 'Sort' could not be found"
                        .to_string(),
                }
            );
        });
    }

    #[test]
    fn test_invalid_member_name_is_resolution_error() {
        with_context(|ctx| {
            let graph = TransformGraph::new("Sort", TransformKind::Sort)
                .with_source("BAD")
                .with_target("OUT");
            let err = ctx.resolve_source_table_cg(&graph).unwrap_err();
            assert!(matches!(err, CodegenError::Resolution { ref reference, .. } if reference == "BAD"));
        });
    }

    #[test]
    fn test_source_sets_last_output_once() {
        with_context(|ctx| {
            assert_eq!(ctx.last_output(), LAST_OUTPUT);
            let source = ctx.resolve_source_table_cg(&sort_graph()).unwrap();
            assert_eq!(source.location(ctx).unwrap(), "STAGE.SRC");
            assert_eq!(ctx.last_output(), "STAGE.SRC");

            ctx.set_last_output("WORK.W1");
            ctx.resolve_source_table_cg(&sort_graph()).unwrap();
            assert_eq!(ctx.last_output(), "WORK.W1");
        });
    }

    #[test]
    fn test_target_location_uses_default_libref() {
        with_context(|ctx| {
            let target = ctx.resolve_target_table_cg(&sort_graph()).unwrap();
            assert_eq!(target.location(ctx).unwrap(), "WORK.OUT");
        });
    }

    #[test]
    fn test_emit_table_delete() {
        with_context(|ctx| {
            let target = ctx.resolve_target_table_cg(&sort_graph()).unwrap();
            ctx.emit_table_delete(&target).unwrap();
            assert_eq!(
                ctx.render(),
                "proc datasets lib = WORK nolist nowarn memtype = (data view);\n   delete OUT;\nquit;\n\n"
            );
        });
    }

    #[test]
    #[should_panic(expected = "external table")]
    fn test_emit_table_delete_external_panics() {
        with_context(|ctx| {
            let graph = TransformGraph::new("Sort", TransformKind::Sort)
                .with_source("SRC")
                .with_target("RAW");
            let target = ctx.resolve_target_table_cg(&graph).unwrap();
            let _ = ctx.emit_table_delete(&target);
        });
    }

    #[test]
    fn test_emit_column_attributes() {
        let catalog = TableCatalog::from_tables([TableEntity::new("OUT")
            .with_column(TableColumn::new("AGE").with_label("Age").with_format("3."))]);
        let messages = MessageBundle::english();
        let config = CodegenConfig::default();
        let mut ctx = RequestContext::new(GenerationEnv::new(&catalog, &messages, &config), "Sort");
        let target = ctx.resolve_target_table_cg(&sort_graph()).unwrap();

        ctx.emit_column_attributes(&target, false).unwrap();
        assert_eq!(
            ctx.render(),
            "\nproc datasets lib = WORK nolist nowarn;\n   modify OUT;\n      format AGE 3.;\nquit;\n"
        );
    }

    #[test]
    fn test_column_attributes_absent() {
        with_context(|ctx| {
            let target = ctx.resolve_target_table_cg(&sort_graph()).unwrap();
            ctx.emit_column_attributes(&target, true).unwrap();
            assert!(ctx.buffer().is_empty());
        });
    }

    #[test]
    fn test_order_by_clause() {
        with_context(|ctx| {
            assert_eq!(ctx.build_order_by_clause(&sort_graph()), None);
            let graph = sort_graph()
                .with_order_by(OrderColumn::ascending("AGE"))
                .with_order_by(OrderColumn::descending("NAME"));
            assert_eq!(
                ctx.build_order_by_clause(&graph).as_deref(),
                Some("by AGE descending NAME;")
            );
        });
    }

    #[test]
    fn test_system_options() {
        with_context(|ctx| {
            ctx.emit_system_options(&sort_graph());
            assert!(ctx.buffer().is_empty());

            let graph = sort_graph().with_property("SYSTEM.OPTIONS", "NOTES");
            ctx.emit_system_options(&graph);
            assert_eq!(ctx.render(), "options NOTES;\n\n");
        });
    }

    #[test]
    fn test_work_tables_are_distinct_and_stable() {
        with_context(|ctx| {
            let graph = sort_graph();
            let first = ctx.next_work_table(&graph);
            let second = ctx.next_work_table(&graph);
            assert_ne!(first, second);
            assert!(first.starts_with("WORK.W"));
            assert!(first.ends_with("_1"));
            assert!(second.ends_with("_2"));
        });
        with_context(|ctx| {
            let graph = sort_graph();
            let again = ctx.next_work_table(&graph);
            assert!(again.ends_with("_1"));
        });
    }

    #[test]
    fn test_finish() {
        with_context(|ctx| {
            ctx.finish(STATUS_VARIABLE);
            assert_eq!(ctx.render(), "\n%rcSet(&syserr);\n\n");
        });
    }
}
