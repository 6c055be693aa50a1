use std::collections::BTreeSet;

use tracing::{trace, warn};

use crate::{
    parser::{
        analyzer::{ResolvedColumn, ResolverFlags},
        is_system_table,
    },
    rewriter::{EditionForbiddenReason, ResolutionError, ResultColumn, RewriteContext},
};

/// A resolved column paired with what the rewriter will emit for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedColumn {
    pub result: ResultColumn,
    pub resolved: ResolvedColumn,
    /// Injected row identifier: re-emitted in the inner SELECT, projected by its
    /// own alias in the outer one.
    pub row_id: bool,
}

pub struct ColumnClassifier;

impl ColumnClassifier {
    pub fn classify(
        columns: Vec<ResolvedColumn>,
        resolver_errors: &[String],
        ctx: &mut RewriteContext,
    ) -> Result<Vec<ClassifiedColumn>, ResolutionError> {
        if !resolver_errors.is_empty() {
            warn!(errors = %resolver_errors.join("\n"), "could not resolve the SELECT");
            return Err(ResolutionError::ResolverErrors(resolver_errors.to_vec()));
        }
        if columns.is_empty() {
            warn!("no result column could be resolved");
            return Err(ResolutionError::NoColumns);
        }

        for alias in columns.iter().filter_map(|c| c.alias.as_deref()) {
            ctx.reserve(alias);
        }

        let mut classified = Vec::with_capacity(columns.len());
        for resolved in columns {
            let row_id = resolved.alias.as_deref().is_some_and(|a| ctx.is_row_id_column(a));
            if row_id && resolved.alias.as_deref().is_some_and(|a| a.contains(':')) {
                trace!(alias = ?resolved.alias, "dropping duplicated row identifier");
                continue;
            }

            let result = Self::result_column(&resolved, ctx);
            trace!(
                column = %result.display_name,
                alias = %result.generated_alias,
                reasons = ?result.edition_forbidden_reasons,
                row_id,
                "classified column"
            );
            if !row_id {
                ctx.result_columns.push(result.clone());
            }
            classified.push(ClassifiedColumn { result, resolved, row_id });
        }
        Ok(classified)
    }

    pub fn result_column(resolved: &ResolvedColumn, ctx: &mut RewriteContext) -> ResultColumn {
        let mut result = ResultColumn {
            generated_alias: String::new(),
            alias: resolved.alias.clone(),
            display_name: resolved.display_name.clone(),
            column: resolved.column.clone(),
            table: None,
            table_alias: None,
            database: None,
            expression: resolved.is_expression(),
            edition_forbidden_reasons: BTreeSet::new(),
        };

        if result.expression {
            result.forbid(EditionForbiddenReason::Expression);
        } else {
            if resolved.table.as_deref().is_some_and(is_system_table) {
                result.forbid(EditionForbiddenReason::SystemTable);
            }
            for (flag, reason) in [
                (ResolverFlags::FROM_COMPOUND_SELECT, EditionForbiddenReason::CompoundSelect),
                (ResolverFlags::FROM_GROUPED_SELECT, EditionForbiddenReason::GroupedResults),
                (ResolverFlags::FROM_DISTINCT_SELECT, EditionForbiddenReason::DistinctResults),
            ] {
                if resolved.flags.contains(flag) {
                    result.forbid(reason);
                }
            }
            result.database = resolved.database.clone();
            result.table = resolved.table.clone();
            result.table_alias = resolved.table_alias.clone();
        }

        result.generated_alias = match resolved.alias.as_deref() {
            Some(alias) if ctx.is_row_id_column_alias(alias) => alias.to_string(),
            _ => ctx.next_col_name(),
        };
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        database::DbNameMap,
        parser::analyzer::{ResolvedColumn, ResolverFlags},
        rewriter::{ColumnClassifier, EditionForbiddenReason, ResolutionError, RewriteContext, RowIdColumn},
    };

    fn table_column(column: &str, table: &str, flags: ResolverFlags) -> ResolvedColumn {
        let mut resolved = ResolvedColumn::table_column(column, table, None, Some("main"));
        resolved.flags = flags;
        resolved
    }

    #[test]
    pub fn test_expression_and_table_columns() {
        let map = DbNameMap::default();
        let mut ctx = RewriteContext::new(&map, &[], "ResCol_");
        let columns = vec![
            ResolvedColumn::expression("a + 1", None),
            table_column("b", "t", ResolverFlags::FROM_COMPOUND_SELECT),
        ];

        let classified = ColumnClassifier::classify(columns, &[], &mut ctx).expect("Failed to classify");

        assert_eq!(classified[0].result.generated_alias, "ResCol_0");
        assert!(classified[0].result.expression);
        assert_eq!(
            classified[0].result.edition_forbidden_reasons.iter().copied().collect::<Vec<_>>(),
            vec![EditionForbiddenReason::Expression]
        );
        assert_eq!(classified[1].result.generated_alias, "ResCol_1");
        assert_eq!(classified[1].result.database.as_deref(), Some("main"));
        assert_eq!(
            classified[1].result.edition_forbidden_reasons.iter().copied().collect::<Vec<_>>(),
            vec![EditionForbiddenReason::CompoundSelect]
        );
        assert_eq!(ctx.result_columns.len(), 2);
    }

    #[test]
    pub fn test_reasons_accumulate() {
        let map = DbNameMap::default();
        let mut ctx = RewriteContext::new(&map, &[], "ResCol_");
        let column = table_column(
            "name",
            "sqlite_master",
            ResolverFlags::FROM_GROUPED_SELECT | ResolverFlags::FROM_DISTINCT_SELECT,
        );

        let result = ColumnClassifier::result_column(&column, &mut ctx);

        assert_eq!(
            result.edition_forbidden_reasons.into_iter().collect::<Vec<_>>(),
            vec![
                EditionForbiddenReason::SystemTable,
                EditionForbiddenReason::GroupedResults,
                EditionForbiddenReason::DistinctResults
            ]
        );
    }

    #[test]
    pub fn test_row_id_columns() {
        let map = DbNameMap::default();
        let row_ids = vec![RowIdColumn::new("t").with_alias("ResCol_0", "ROWID")];
        let mut ctx = RewriteContext::new(&map, &row_ids, "ResCol_");
        let columns = vec![
            table_column("ROWID", "t", ResolverFlags::empty()).with_alias(Some("ResCol_0")),
            table_column("ROWID", "t", ResolverFlags::empty()).with_alias(Some("ResCol_0:1")),
            table_column("a", "t", ResolverFlags::empty()).with_alias(Some("ResCol_1")),
            table_column("b", "t", ResolverFlags::empty()),
        ];

        let classified = ColumnClassifier::classify(columns, &[], &mut ctx).expect("Failed to classify");

        assert_eq!(classified.len(), 3);
        assert!(classified[0].row_id);
        assert_eq!(classified[0].result.generated_alias, "ResCol_0");
        assert_eq!(classified[1].result.generated_alias, "ResCol_2");
        assert_eq!(classified[2].result.generated_alias, "ResCol_3");
        assert_eq!(
            ctx.result_columns.iter().map(|c| c.column.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    pub fn test_failures() {
        let map = DbNameMap::default();
        let mut ctx = RewriteContext::new(&map, &[], "ResCol_");

        match ColumnClassifier::classify(vec![], &[], &mut ctx) {
            Err(ResolutionError::NoColumns) => {}
            _ => panic!(),
        }
        match ColumnClassifier::classify(vec![ResolvedColumn::expression("1", None)], &["boom".to_string()], &mut ctx) {
            Err(ResolutionError::ResolverErrors(errors)) => assert_eq!(errors, vec!["boom".to_string()]),
            _ => panic!(),
        }
    }
}
