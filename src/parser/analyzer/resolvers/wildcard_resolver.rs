use crate::parser::analyzer::{AnalysisContext, AnalyzerError, ResolvedColumn};

pub struct WildcardResolver;

impl WildcardResolver {
    /// `*`: every visible column of every source, in FROM order.
    pub fn expand_star(ctx: &AnalysisContext) -> Result<Vec<ResolvedColumn>, AnalyzerError> {
        if ctx.sources.is_empty() {
            return Err(AnalyzerError::NoTablesSpecified);
        }
        Ok(ctx
            .sources
            .iter()
            .flat_map(|s| s.visible_columns().map(|c| c.resolved.clone()))
            .collect())
    }

    /// `t.*`: all columns of the source referenced as `t`.
    pub fn expand_table_star(table: &str, ctx: &AnalysisContext) -> Result<Vec<ResolvedColumn>, AnalyzerError> {
        let source = ctx
            .sources
            .iter()
            .find(|s| s.matches(table))
            .ok_or_else(|| AnalyzerError::UnknownTable(table.to_string()))?;
        Ok(source.columns.iter().map(|c| c.resolved.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        database::{Catalog, DbNameMap},
        parser::analyzer::{AnalysisContext, AnalyzerError, ResolvedColumn, SourceColumn, SourceTable, WildcardResolver},
    };

    fn source(table: &str, columns: &[(&str, bool)]) -> SourceTable {
        SourceTable {
            alias: None,
            table: Some(table.to_string()),
            database: None,
            columns: columns
                .iter()
                .map(|(c, hidden)| SourceColumn {
                    name: c.to_string(),
                    resolved: ResolvedColumn::table_column(c, table, None, None),
                    hidden: *hidden,
                })
                .collect(),
            has_rowid: true,
        }
    }

    #[test]
    pub fn test_expand_star_skips_merged_columns() {
        let catalog = Catalog::new();
        let map = DbNameMap::default();
        let mut ctx = AnalysisContext::new(&catalog, &map);
        ctx.add_source(source("a", &[("id", false), ("x", false)]));
        ctx.add_source(source("b", &[("id", true), ("y", false)]));

        let columns = WildcardResolver::expand_star(&ctx).expect("Failed to expand *");
        let names: Vec<&str> = columns.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["id", "x", "y"]);

        let b = WildcardResolver::expand_table_star("B", &ctx).expect("Failed to expand b.*");
        assert_eq!(b.len(), 2);
    }

    #[test]
    pub fn test_expand_errors() {
        let catalog = Catalog::new();
        let map = DbNameMap::default();
        let ctx = AnalysisContext::new(&catalog, &map);

        assert_eq!(WildcardResolver::expand_star(&ctx), Err(AnalyzerError::NoTablesSpecified));
        assert_eq!(
            WildcardResolver::expand_table_star("x", &ctx),
            Err(AnalyzerError::UnknownTable("x".to_string()))
        );
    }
}
