use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::{
    database::{Config, DbNameMap, SchemaProvider},
    parser::{
        analyzer::SelectResolver,
        ast::{Statement, StatementKind},
        Dialect,
    },
    rewriter::{
        ColumnClassifier, ResultColumn, RewriteContext, RewriteError, RowIdColumn, StatementForbiddenReason,
        StatementRewriter,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteOutcome {
    pub rewritten_sql: String,
    pub result_columns: Vec<ResultColumn>,
    pub edition_forbidden_reasons: BTreeSet<StatementForbiddenReason>,
}

impl RewriteOutcome {
    fn not_a_select(sql: &str) -> Self {
        Self {
            rewritten_sql: sql.to_string(),
            result_columns: Vec::new(),
            edition_forbidden_reasons: BTreeSet::from([StatementForbiddenReason::NotASelect]),
        }
    }

    pub fn is_statement_editable(&self) -> bool {
        self.edition_forbidden_reasons.is_empty()
    }
}

/// Rewrites user SELECTs so that every result column comes out under a unique
/// generated alias and can be mapped back to the table column it reads.
///
/// Holds no per-statement state: one instance can serve several threads.
pub struct QueryRewriter<'a> {
    schemas: &'a dyn SchemaProvider,
    config: Config,
}

impl<'a> QueryRewriter<'a> {
    pub fn new(schemas: &'a dyn SchemaProvider, config: Config) -> Self {
        Self { schemas, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Statements other than a plain SELECT are returned unmodified and flagged
    /// [`StatementForbiddenReason::NotASelect`]. Any other failure aborts the
    /// rewrite: there is no partially rewritten result.
    pub fn rewrite(
        &self,
        sql: &str,
        dialect: Dialect,
        db_name_map: &DbNameMap,
        row_id_columns: &[RowIdColumn],
    ) -> Result<RewriteOutcome, RewriteError> {
        let kind = Statement::peek_kind(sql);
        if kind != StatementKind::Select {
            debug!(?kind, "not a SELECT, statement left unmodified");
            return Ok(RewriteOutcome::not_a_select(sql));
        }

        let mut statement = Statement::parse(sql, dialect)?;
        if statement.explain {
            return Ok(RewriteOutcome::not_a_select(sql));
        }

        let mut resolver =
            SelectResolver::new(self.schemas, db_name_map).with_multi_core(self.config.resolve_multi_core);
        let columns = resolver.resolve(&statement).into_iter().next().unwrap_or_default();

        let mut ctx = RewriteContext::new(db_name_map, row_id_columns, &self.config.alias_prefix);
        let classified = ColumnClassifier::classify(columns, &resolver.errors(), &mut ctx)?;

        debug!(query = %sql, "before rewriting");
        let rewritten_sql = StatementRewriter::rewrite(&mut statement, &classified, &ctx, self.config.name_wrapper)?;
        debug!(query = %rewritten_sql, "after rewriting");

        Ok(RewriteOutcome { rewritten_sql, result_columns: ctx.result_columns, edition_forbidden_reasons: BTreeSet::new() })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        database::{Catalog, Config, DbNameMap},
        parser::Dialect,
        rewriter::{QueryRewriter, RewriteError, StatementForbiddenReason},
    };

    #[test]
    pub fn test_non_select_statements_pass_through() {
        let catalog = Catalog::new().with_table("main", "t", &["a"]);
        let rewriter = QueryRewriter::new(&catalog, Config::new());
        let map = DbNameMap::default();

        for sql in [
            "UPDATE t SET a = 1",
            "EXPLAIN SELECT a FROM t",
            "EXPLAIN QUERY PLAN SELECT a FROM t",
            "WITH x AS (SELECT 1) DELETE FROM t",
        ] {
            let outcome = rewriter.rewrite(sql, Dialect::Sqlite3, &map, &[]).expect("Failed to rewrite");

            assert_eq!(outcome.rewritten_sql, sql);
            assert!(outcome.result_columns.is_empty());
            assert!(outcome.edition_forbidden_reasons.contains(&StatementForbiddenReason::NotASelect));
            assert!(!outcome.is_statement_editable());
        }
    }

    #[test]
    pub fn test_invalid_select_is_an_error() {
        let catalog = Catalog::new();
        let rewriter = QueryRewriter::new(&catalog, Config::new());

        match rewriter.rewrite("SELECT FROM", Dialect::Sqlite3, &DbNameMap::default(), &[]) {
            Err(RewriteError::InvalidStatement(_)) => {}
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_custom_alias_prefix() {
        let catalog = Catalog::new().with_table("main", "t", &["a"]);
        let rewriter = QueryRewriter::new(&catalog, Config::with_alias_prefix("Col_"));

        let outcome = rewriter
            .rewrite("SELECT a FROM t", Dialect::Sqlite3, &DbNameMap::default(), &[])
            .expect("Failed to rewrite");

        assert_eq!(outcome.rewritten_sql, "SELECT \"a\" AS Col_0 FROM (SELECT t.a AS Col_0 FROM t)");
        assert!(outcome.is_statement_editable());
    }
}
