#[cfg(test)]
pub mod fixtures {
    use crate::{
        database::{Catalog, Config, DbNameMap, TableSchema},
        parser::{ast::Statement, Dialect},
        rewriter::{QueryRewriter, RewriteError, RewriteOutcome, RowIdColumn},
    };

    pub fn catalog() -> Catalog {
        let mut catalog = Catalog::new()
            .with_table("main", "t", &["a", "b"])
            .with_table("main", "t1", &["a", "x"])
            .with_table("main", "t2", &["a", "y"])
            .with_table("main", "users", &["id", "name", "email"])
            .with_table("main", "orders", &["id", "user_id", "total"])
            .with_table("sales", "invoices", &["id", "amount"]);
        catalog.add_view("main", "active_users", &["id", "name"]);
        let mut settings = TableSchema::with_columns("settings", &["key", "value"]);
        settings.without_rowid = true;
        catalog.add_table("main", settings);
        catalog
    }

    pub fn rewrite_with(sql: &str, map: &DbNameMap, row_ids: &[RowIdColumn]) -> Result<RewriteOutcome, RewriteError> {
        let catalog = catalog();
        QueryRewriter::new(&catalog, Config::new()).rewrite(sql, Dialect::Sqlite3, map, row_ids)
    }

    pub fn rewrite(sql: &str) -> RewriteOutcome {
        rewrite_with(sql, &DbNameMap::default(), &[]).expect("Failed to rewrite query")
    }

    /// Result columns of the outer SELECT of a rewritten query.
    pub fn outer_column_count(sql: &str) -> usize {
        let statement = Statement::parse(sql, Dialect::Sqlite3).expect("Failed to parse rewritten query");
        let core = statement.first_core().expect("Failed to find first core");
        statement.arena.core(core).map(|c| c.result_columns.len()).unwrap_or_default()
    }

    pub fn generated_aliases(outcome: &RewriteOutcome) -> Vec<&str> {
        outcome.result_columns.iter().map(|c| c.generated_alias.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashSet};

    use crate::{
        database::DbNameMap,
        rewriter::{
            EditionForbiddenReason, ResolutionError, RewriteError, RowIdColumn,
            _tests::fixtures::{generated_aliases, outer_column_count, rewrite, rewrite_with},
        },
    };

    #[test]
    pub fn test_select_star_from_table() {
        let outcome = rewrite("SELECT * FROM t");

        assert_eq!(
            outcome.rewritten_sql,
            "SELECT \"a\" AS ResCol_0, \"b\" AS ResCol_1 FROM (SELECT t.a AS ResCol_0, t.b AS ResCol_1 FROM t)"
        );
        assert_eq!(outcome.result_columns.len(), 2);
        for (column, name) in outcome.result_columns.iter().zip(["a", "b"]) {
            assert_eq!(column.column, name);
            assert_eq!(column.table.as_deref(), Some("t"));
            assert!(!column.expression);
            assert!(column.is_editable());
        }
        assert!(outcome.is_statement_editable());
    }

    #[test]
    pub fn test_compound_select_forbids_edition() {
        let outcome = rewrite("SELECT a FROM t1 UNION SELECT a FROM t2");

        assert_eq!(outcome.result_columns.len(), 1);
        assert!(outcome
            .result_columns
            .iter()
            .all(|c| c.edition_forbidden_reasons.contains(&EditionForbiddenReason::CompoundSelect)));
        assert!(outcome.rewritten_sql.starts_with("SELECT \"a\" AS ResCol_0 FROM (SELECT t1.a AS ResCol_0 FROM t1 UNION"));
        assert_eq!(outer_column_count(&outcome.rewritten_sql), 1);
    }

    #[test]
    pub fn test_unknown_table_fails() {
        match rewrite_with("SELECT * FROM missing", &DbNameMap::default(), &[]) {
            Err(RewriteError::Resolution(ResolutionError::ResolverErrors(errors))) => {
                assert_eq!(errors[0], "no such table: missing");
            }
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_unknown_column_fails() {
        match rewrite_with("SELECT nope FROM t", &DbNameMap::default(), &[]) {
            Err(RewriteError::Resolution(ResolutionError::ResolverErrors(errors))) => {
                assert_eq!(errors, vec!["no such column: nope".to_string()]);
            }
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_deep_nesting_is_an_error() {
        let sql = format!("SELECT {}a{} FROM t", "(".repeat(200), ")".repeat(200));

        match rewrite_with(&sql, &DbNameMap::default(), &[]) {
            Err(RewriteError::InvalidStatement(error)) => assert_eq!(error.message, "parser stack overflow"),
            _ => panic!(),
        }

        let sql = format!("SELECT {}a{} FROM t", "(".repeat(40), ")".repeat(40));
        let outcome = rewrite(&sql);
        assert_eq!(outcome.result_columns.len(), 1);

        let sql = format!("SELECT a FROM t WHERE a = 0{}", " OR a = 1".repeat(300));
        let outcome = rewrite(&sql);
        assert!(outcome.rewritten_sql.ends_with(" OR a = 1)"));
    }

    #[test]
    pub fn test_name_collisions() {
        let outcome = rewrite("SELECT users.id, orders.id FROM users JOIN orders ON users.id = orders.user_id");

        assert!(outcome.rewritten_sql.starts_with(
            "SELECT \"id\" AS ResCol_0, \"id:1\" AS ResCol_1 FROM (SELECT users.id AS ResCol_0, orders.id AS ResCol_1 FROM users"
        ));
        assert_eq!(generated_aliases(&outcome), vec!["ResCol_0", "ResCol_1"]);
    }

    #[test]
    pub fn test_user_alias_collisions_use_column_name() {
        let outcome = rewrite("SELECT a AS x, b AS X FROM t");

        assert!(outcome.rewritten_sql.starts_with("SELECT \"x\" AS ResCol_0, \"b:1\" AS ResCol_1 FROM (SELECT t.a AS x, t.b AS X FROM t)"));
    }

    #[test]
    pub fn test_forbidden_reasons_accumulate() {
        let outcome = rewrite("SELECT DISTINCT name FROM sqlite_master GROUP BY name");

        assert_eq!(
            outcome.result_columns[0].edition_forbidden_reasons,
            BTreeSet::from([
                EditionForbiddenReason::SystemTable,
                EditionForbiddenReason::GroupedResults,
                EditionForbiddenReason::DistinctResults,
            ])
        );
    }

    #[test]
    pub fn test_expressions() {
        let outcome = rewrite("SELECT count(*), max(a) AS top FROM t");

        assert_eq!(
            outcome.rewritten_sql,
            "SELECT ResCol_0, \"top\" AS ResCol_1 FROM (SELECT count(*) AS ResCol_0, max(a) AS top FROM t)"
        );
        assert_eq!(outcome.result_columns[0].display_name, "count(*)");
        assert!(outcome.result_columns.iter().all(|c| c.expression
            && c.edition_forbidden_reasons == BTreeSet::from([EditionForbiddenReason::Expression])));
    }

    #[test]
    pub fn test_row_id_columns_are_preserved() {
        let row_ids = vec![RowIdColumn::new("users").with_alias("ResCol_0", "ROWID")];

        let outcome = rewrite_with("SELECT users.ROWID AS ResCol_0, * FROM users", &DbNameMap::default(), &row_ids)
            .expect("Failed to rewrite query");

        assert_eq!(
            outcome.rewritten_sql,
            "SELECT ResCol_0, \"id\" AS ResCol_1, \"name\" AS ResCol_2, \"email\" AS ResCol_3 FROM (SELECT users.ROWID AS ResCol_0, users.id AS ResCol_1, users.name AS ResCol_2, users.email AS ResCol_3 FROM users)"
        );
        assert_eq!(generated_aliases(&outcome), vec!["ResCol_1", "ResCol_2", "ResCol_3"]);
        assert_eq!(outer_column_count(&outcome.rewritten_sql), 4);
    }

    #[test]
    pub fn test_duplicated_row_ids_are_dropped() {
        let row_ids = vec![RowIdColumn::new("users").with_alias("ResCol_0", "ROWID")];

        let outcome = rewrite_with(
            "SELECT * FROM (SELECT ROWID AS ResCol_0, ROWID AS ResCol_0, name FROM users)",
            &DbNameMap::default(),
            &row_ids,
        )
        .expect("Failed to rewrite query");

        assert!(outcome
            .rewritten_sql
            .starts_with("SELECT ResCol_0, \"name\" AS ResCol_1 FROM (SELECT ResCol_0 AS ResCol_0, name AS ResCol_1 FROM ("));
        assert_eq!(outcome.result_columns.len(), 1);
        assert_eq!(outer_column_count(&outcome.rewritten_sql), 2);
    }

    #[test]
    pub fn test_sub_query_aliases() {
        let outcome = rewrite("SELECT s.n, s.name FROM (SELECT id AS n, name FROM users) s");

        assert!(outcome
            .rewritten_sql
            .starts_with("SELECT \"n\" AS ResCol_0, \"name\" AS ResCol_1 FROM (SELECT s.n AS n, s.name AS ResCol_1 FROM ("));
        let n = &outcome.result_columns[0];
        assert_eq!(n.column, "id");
        assert_eq!(n.table.as_deref(), Some("users"));
        assert_eq!(n.table_alias.as_deref(), Some("s"));
    }

    #[test]
    pub fn test_anonymous_sub_query_is_not_qualified() {
        let outcome = rewrite("SELECT * FROM (SELECT a FROM t)");

        assert!(outcome.rewritten_sql.starts_with("SELECT \"a\" AS ResCol_0 FROM (SELECT a AS ResCol_0 FROM (SELECT a FROM t))"));
        assert_eq!(outcome.result_columns[0].table.as_deref(), Some("t"));
    }

    #[test]
    pub fn test_attached_database_qualification() {
        let map = DbNameMap::new([("sales", "attached_3")]);

        let outcome = rewrite_with("SELECT amount FROM sales.invoices", &map, &[]).expect("Failed to rewrite query");

        assert!(outcome.rewritten_sql.contains("SELECT attached_3.invoices.amount AS ResCol_0 FROM sales.invoices"));
        assert_eq!(outcome.result_columns[0].database.as_deref(), Some("sales"));
    }

    #[test]
    pub fn test_common_table_expression() {
        let outcome = rewrite("WITH big AS (SELECT user_id, total FROM orders WHERE total > 100) SELECT * FROM big");

        assert!(outcome
            .rewritten_sql
            .contains("SELECT big.user_id AS ResCol_0, big.total AS ResCol_1 FROM big)"));
        assert!(outcome.rewritten_sql.contains("(WITH big AS ("));
        assert_eq!(outcome.result_columns[1].table.as_deref(), Some("orders"));
    }

    #[test]
    pub fn test_values() {
        let outcome = rewrite("VALUES (1, 'x')");

        assert!(outcome.rewritten_sql.starts_with("SELECT \"column1\" AS ResCol_0, \"column2\" AS ResCol_1 FROM (VALUES"));
        assert_eq!(outer_column_count(&outcome.rewritten_sql), 2);
    }

    #[test]
    pub fn test_views_are_editable_columns_without_row_id() {
        let outcome = rewrite("SELECT name FROM active_users");
        assert!(outcome.result_columns[0].is_editable());

        match rewrite_with("SELECT rowid FROM settings", &DbNameMap::default(), &[]) {
            Err(RewriteError::Resolution(_)) => {}
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_rewritten_queries_parse_and_keep_their_columns() {
        let row_ids = vec![RowIdColumn::new("users").with_alias("ResCol_0", "ROWID")];
        let none: &[RowIdColumn] = &[];
        let queries = vec![
            ("SELECT * FROM t", none),
            ("SELECT a AS x, b + 1 FROM t WHERE a > 0 ORDER BY b", none),
            ("SELECT users.ROWID AS ResCol_0, * FROM users", row_ids.as_slice()),
            ("SELECT u.name, o.total FROM users u LEFT JOIN orders o ON o.user_id = u.id", none),
            ("SELECT a FROM t1 UNION ALL SELECT a FROM t2 LIMIT 5", none),
            ("SELECT * FROM users JOIN orders USING (id)", none),
        ];

        for (sql, row_ids) in queries {
            let first = rewrite_with(sql, &DbNameMap::default(), row_ids).expect("Failed to rewrite query");
            let expected = row_ids.iter().map(|r| r.alias_to_column.len()).sum::<usize>() + first.result_columns.len();
            assert_eq!(outer_column_count(&first.rewritten_sql), expected, "{}", sql);

            let aliases: HashSet<&str> = generated_aliases(&first).into_iter().collect();
            assert_eq!(aliases.len(), first.result_columns.len(), "{}", sql);

            let second = rewrite_with(&first.rewritten_sql, &DbNameMap::default(), row_ids)
                .expect("Failed to rewrite rewritten query");
            assert!(outer_column_count(&second.rewritten_sql) >= expected, "{}", sql);
        }
    }

    #[test]
    pub fn test_concurrent_rewrites() {
        let queries = [
            "SELECT * FROM t",
            "SELECT users.id, orders.id FROM users JOIN orders ON users.id = orders.user_id",
            "SELECT count(*) FROM orders GROUP BY user_id",
            "SELECT a FROM t1 UNION SELECT a FROM t2",
        ];
        let expected: Vec<String> = queries.iter().map(|q| rewrite(q).rewritten_sql).collect();

        let catalog = super::fixtures::catalog();
        let rewriter = crate::rewriter::QueryRewriter::new(&catalog, crate::database::Config::new());
        let map = DbNameMap::default();

        std::thread::scope(|scope| {
            let handles: Vec<_> = queries
                .iter()
                .map(|sql| {
                    let (rewriter, map) = (&rewriter, &map);
                    scope.spawn(move || {
                        (0..20)
                            .map(|_| {
                                rewriter
                                    .rewrite(sql, crate::parser::Dialect::Sqlite3, map, &[])
                                    .expect("Failed to rewrite query")
                                    .rewritten_sql
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            for (handle, expected) in handles.into_iter().zip(&expected) {
                let results = handle.join().expect("Failed to join rewriter thread");
                assert!(results.iter().all(|r| r == expected));
            }
        });
    }
}
