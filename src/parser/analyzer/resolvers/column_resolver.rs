use crate::parser::{
    analyzer::{AnalysisContext, AnalyzerError, ResolvedColumn, SourceTable},
    ast::Name,
    is_row_id_keyword,
};

pub struct ColumnResolver;

impl ColumnResolver {
    pub fn resolve(
        database: Option<&Name>,
        table: Option<&Name>,
        column: &Name,
        ctx: &AnalysisContext,
    ) -> Result<ResolvedColumn, AnalyzerError> {
        let full_name = [database, table, Some(column)]
            .into_iter()
            .flatten()
            .map(|n| n.value.as_str())
            .collect::<Vec<_>>()
            .join(".");

        let table = match table {
            Some(table) => table,
            None => return Self::resolve_unqualified(column, &full_name, ctx),
        };

        let database = database.map(|d| ctx.logical_database(&d.value));
        let source = ctx
            .sources
            .iter()
            .find(|s| {
                s.matches(&table.value)
                    && match (&database, &s.database) {
                        (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
                        _ => true,
                    }
            })
            .ok_or_else(|| AnalyzerError::UnknownColumn(full_name.clone()))?;

        if let Some(found) = source.column(&column.value) {
            return Ok(found.resolved.clone());
        }
        if is_row_id_keyword(&column.value) && source.has_rowid {
            return Ok(Self::row_id(source, column));
        }
        Err(AnalyzerError::UnknownColumn(full_name))
    }

    fn resolve_unqualified(column: &Name, full_name: &str, ctx: &AnalysisContext) -> Result<ResolvedColumn, AnalyzerError> {
        let mut matches = ctx
            .sources
            .iter()
            .filter_map(|s| s.visible_columns().find(|c| c.name.eq_ignore_ascii_case(&column.value)));

        if let Some(first) = matches.next() {
            return match matches.next() {
                Some(_) => Err(AnalyzerError::AmbiguousColumn(full_name.to_string())),
                None => Ok(first.resolved.clone()),
            };
        }

        if is_row_id_keyword(&column.value) {
            let mut with_rowid = ctx.sources.iter().filter(|s| s.has_rowid);
            if let Some(source) = with_rowid.next() {
                return match with_rowid.next() {
                    Some(_) => Err(AnalyzerError::AmbiguousColumn(full_name.to_string())),
                    None => Ok(Self::row_id(source, column)),
                };
            }
        }

        Err(AnalyzerError::UnknownColumn(full_name.to_string()))
    }

    fn row_id(source: &SourceTable, column: &Name) -> ResolvedColumn {
        ResolvedColumn::table_column(
            &column.value,
            source.table.as_deref().unwrap_or_default(),
            source.alias.as_deref(),
            source.database.as_deref(),
        )
    }
}
