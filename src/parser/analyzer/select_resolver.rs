use tracing::trace;

use crate::{
    database::{DbNameMap, SchemaProvider},
    parser::{
        analyzer::{
            AggregateResolver, AnalysisContext, AnalyzerError, ColumnResolver, ResolvedColumn, ResolverFlags,
            SourceColumn, SourceTable, SubQueryResolver, WildcardResolver,
        },
        ast::{Expr, JoinConstraint, Name, NodeId, ResultColumn, Source, Statement},
    },
};

/// A common table expression visible to the cores that follow its definition.
#[derive(Debug, Clone)]
struct CteDefinition {
    name: String,
    columns: Vec<ResolvedColumn>,
    column_names: Vec<String>,
}

/// Resolves every result column of a SELECT to the table column it reads, or to
/// an expression, walking joins, sub-selects and CTEs. Problems are collected
/// rather than returned so that one pass reports all of them.
pub struct SelectResolver<'a> {
    schemas: &'a dyn SchemaProvider,
    db_name_map: &'a DbNameMap,
    resolve_multi_core: bool,
    errors: Vec<AnalyzerError>,
}

impl<'a> SelectResolver<'a> {
    pub fn new(schemas: &'a dyn SchemaProvider, db_name_map: &'a DbNameMap) -> Self {
        Self { schemas, db_name_map, resolve_multi_core: true, errors: Vec::new() }
    }

    pub fn with_multi_core(mut self, resolve_multi_core: bool) -> Self {
        self.resolve_multi_core = resolve_multi_core;
        self
    }

    /// One list of columns per core of the top-level SELECT.
    pub fn resolve(&mut self, statement: &Statement) -> Vec<Vec<ResolvedColumn>> {
        self.errors.clear();
        self.resolve_select(statement, statement.root, &[], self.resolve_multi_core, None)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    pub fn analyzer_errors(&self) -> &[AnalyzerError] {
        &self.errors
    }

    fn resolve_select(
        &mut self,
        statement: &Statement,
        select_id: NodeId,
        outer_ctes: &[CteDefinition],
        all_cores: bool,
        recursive_cte: Option<(&Name, &[Name])>,
    ) -> Vec<Vec<ResolvedColumn>> {
        let select = match statement.arena.select(select_id) {
            Some(select) => select,
            None => return vec![],
        };

        let mut ctes = outer_ctes.to_vec();
        if let Some(with) = &select.with {
            for cte_id in &with.ctes {
                if let Some(definition) = self.resolve_cte(statement, *cte_id, &ctes) {
                    ctes.push(definition);
                }
            }
        }

        let mut result = Vec::new();
        for (i, core) in select.cores.iter().enumerate() {
            if i > 0 && !all_cores {
                break;
            }
            let columns = self.resolve_core(statement, *core, &ctes);
            if i == 0 {
                // the anchor defines the columns later cores may read recursively
                if let Some((name, column_names)) = recursive_cte {
                    ctes.push(CteDefinition {
                        name: name.value.clone(),
                        columns: columns.clone(),
                        column_names: column_names.iter().map(|n| n.value.clone()).collect(),
                    });
                }
            }
            result.push(columns);
        }

        if select.is_compound() {
            for column in result.iter_mut().flatten() {
                column.flags |= ResolverFlags::FROM_COMPOUND_SELECT;
            }
        }
        result
    }

    fn resolve_cte(&mut self, statement: &Statement, cte_id: NodeId, ctes: &[CteDefinition]) -> Option<CteDefinition> {
        let cte = statement.arena.cte(cte_id)?;
        let cores = self.resolve_select(statement, cte.select, ctes, true, Some((&cte.name, cte.columns.as_slice())));
        Some(CteDefinition {
            name: cte.name.value.clone(),
            columns: cores.into_iter().next().unwrap_or_default(),
            column_names: cte.columns.iter().map(|n| n.value.clone()).collect(),
        })
    }

    fn resolve_core(&mut self, statement: &Statement, core_id: NodeId, ctes: &[CteDefinition]) -> Vec<ResolvedColumn> {
        let core = match statement.arena.core(core_id) {
            Some(core) => core,
            None => return vec![],
        };

        if core.is_values() {
            return core
                .values
                .first()
                .map(|row| {
                    row.iter()
                        .enumerate()
                        .map(|(i, id)| {
                            ResolvedColumn::expression(&statement.node_text(*id), Some(format!("column{}", i + 1).as_str()))
                        })
                        .collect()
                })
                .unwrap_or_default();
        }

        let mut ctx = AnalysisContext::new(self.schemas, self.db_name_map);
        if let Some(from) = core.from {
            self.collect_sources(statement, from, ctes, &mut ctx);
        }

        let mut columns = Vec::new();
        for column_id in &core.result_columns {
            let resolved = match statement.arena.result_column(*column_id) {
                Some(ResultColumn::Star) => WildcardResolver::expand_star(&ctx),
                Some(ResultColumn::TableStar(table)) => WildcardResolver::expand_table_star(&table.value, &ctx),
                Some(ResultColumn::Expr { expr, alias }) => {
                    Self::resolve_expression(statement, *expr, alias.as_ref(), &ctx).map(|c| vec![c])
                }
                None => continue,
            };
            match resolved {
                Ok(resolved) => columns.extend(resolved),
                Err(err) => self.errors.push(err),
            }
        }

        let mut flags = ResolverFlags::empty();
        if core.distinct {
            flags |= ResolverFlags::FROM_DISTINCT_SELECT;
        }
        let aggregated = core.result_columns.iter().any(|id| match statement.arena.result_column(*id) {
            Some(ResultColumn::Expr { expr, .. }) => AggregateResolver::contains_aggregate(&statement.arena, *expr),
            _ => false,
        });
        if !core.group_by.is_empty() || aggregated {
            flags |= ResolverFlags::FROM_GROUPED_SELECT;
        }

        for column in &mut columns {
            column.flags |= flags;
            trace!(column = %column.display_name, flags = ?column.flags, "resolved column");
        }
        columns
    }

    fn resolve_expression(
        statement: &Statement,
        expr: NodeId,
        alias: Option<&Name>,
        ctx: &AnalysisContext,
    ) -> Result<ResolvedColumn, AnalyzerError> {
        let alias = alias.map(|a| a.value.as_str());
        match statement.arena.expr(expr) {
            Some(Expr::Column { database, table, column }) => {
                match ColumnResolver::resolve(database.as_ref(), table.as_ref(), column, ctx) {
                    Ok(resolved) => Ok(resolved.with_alias(alias)),
                    // SQLite reads an unknown double-quoted identifier as a string literal
                    Err(AnalyzerError::UnknownColumn(_)) if table.is_none() && column.text.starts_with('"') => {
                        Ok(ResolvedColumn::expression(&statement.node_text(expr), alias))
                    }
                    Err(err) => Err(err),
                }
            }
            _ => Ok(ResolvedColumn::expression(&statement.node_text(expr), alias)),
        }
    }

    fn collect_sources(&mut self, statement: &Statement, source_id: NodeId, ctes: &[CteDefinition], ctx: &mut AnalysisContext) {
        let source = match statement.arena.source(source_id) {
            Some(source) => source,
            None => return,
        };

        match source {
            Source::Table { database, name, alias, .. } => {
                let alias = alias.as_ref().map(|a| a.value.clone());

                if database.is_none() {
                    if let Some(cte) = ctes.iter().rev().find(|c| name.matches(&c.name)) {
                        let visible = alias.unwrap_or_else(|| cte.name.clone());
                        let columns = SubQueryResolver::expose(cte.columns.clone(), Some(&visible), &cte.column_names);
                        ctx.add_source(SourceTable {
                            alias: Some(visible),
                            table: None,
                            database: None,
                            columns,
                            has_rowid: false,
                        });
                        return;
                    }
                }

                let database = database.as_ref().map(|d| ctx.logical_database(&d.value));
                let schema = match self.schemas.table_schema(database.as_deref(), &name.value) {
                    Some(schema) => schema,
                    None => {
                        let full_name = match &database {
                            Some(db) => format!("{}.{}", db, name.value),
                            None => name.value.clone(),
                        };
                        self.errors.push(AnalyzerError::UnknownTable(full_name));
                        return;
                    }
                };

                let columns = schema
                    .column_names()
                    .map(|column| SourceColumn {
                        name: column.to_string(),
                        resolved: ResolvedColumn::table_column(column, &schema.name, alias.as_deref(), database.as_deref()),
                        hidden: false,
                    })
                    .collect();
                ctx.add_source(SourceTable {
                    alias,
                    table: Some(schema.name.clone()),
                    database,
                    columns,
                    has_rowid: schema.has_rowid(),
                });
            }
            Source::SubSelect { select, alias } => {
                let alias = alias.as_ref().map(|a| a.value.clone());
                let cores = self.resolve_select(statement, *select, ctes, true, None);
                let first = cores.into_iter().next().unwrap_or_default();
                let columns = SubQueryResolver::expose(first, alias.as_deref(), &[]);
                ctx.add_source(SourceTable { alias, table: None, database: None, columns, has_rowid: false });
            }
            Source::Join { sources, ops, constraints } => {
                let start = ctx.sources.len();
                for (i, source) in sources.iter().enumerate() {
                    let before = ctx.sources.len();
                    self.collect_sources(statement, *source, ctes, ctx);
                    if i == 0 {
                        continue;
                    }

                    let using = match constraints.get(i - 1) {
                        Some(JoinConstraint::Using(names)) => Some(names.iter().map(|n| n.value.clone()).collect::<Vec<_>>()),
                        _ => None,
                    };
                    let natural = ops.get(i - 1).is_some_and(|op| op.is_natural());
                    if natural || using.is_some() {
                        let after = ctx.sources.len();
                        ctx.merge_join_columns(start..before, before..after, using.as_deref());
                    }
                }
            }
            Source::Nested(inner) => self.collect_sources(statement, *inner, ctes, ctx),
        }
    }
}
