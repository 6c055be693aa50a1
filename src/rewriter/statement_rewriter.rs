use tracing::warn;

use crate::{
    parser::{
        analyzer::ResolverFlags,
        ast::{Expr, Name, NodeId, Payload, ResultColumn as ResultColumnNode, Statement},
        tokens::{Token, TokenList},
        wrap_obj_if_needed_with, wrap_obj_with, Dialect, NameWrapper, ParseError,
    },
    rewriter::{ClassifiedColumn, ResultColumn, RewriteContext, RewriteError},
};

/// Replaces the result columns of the first core with explicitly qualified and
/// aliased ones, then wraps the statement in a SELECT projecting every column
/// under its generated alias.
pub struct StatementRewriter;

impl StatementRewriter {
    pub fn rewrite(
        statement: &mut Statement,
        classified: &[ClassifiedColumn],
        ctx: &RewriteContext,
        wrapper: NameWrapper,
    ) -> Result<String, RewriteError> {
        let core_id = statement
            .first_core()
            .ok_or_else(|| ParseError::new("Expected a SELECT statement", "", 0, 0))?;

        // VALUES has no result columns to replace; its columns are already named columnN
        let is_values = statement.arena.core(core_id).is_some_and(|core| core.is_values());
        if !is_values {
            let mut result_columns = Vec::with_capacity(classified.len());
            for column in classified {
                result_columns.push(Self::result_column_node(statement, column, ctx, wrapper)?);
            }
            for id in &result_columns {
                statement.arena.reparent(*id, core_id);
            }
            if let Some(core) = statement.arena.core_mut(core_id) {
                core.result_columns = result_columns;
            }
        }

        statement.rebuild_tokens();
        let outer = Self::outer_columns(ctx, statement.dialect, wrapper);
        Ok(Self::wrap_select(&statement.tokens, outer).detokenize())
    }

    fn result_column_node(
        statement: &mut Statement,
        column: &ClassifiedColumn,
        ctx: &RewriteContext,
        wrapper: NameWrapper,
    ) -> Result<NodeId, RewriteError> {
        let (resolved, result) = (&column.resolved, &column.result);
        let dialect = statement.dialect;

        let text = match resolved.sub_query_alias.as_deref() {
            Some(name) => wrap_obj_if_needed_with(name, dialect, wrapper),
            None if !result.expression => wrap_obj_if_needed_with(&result.column, dialect, wrapper),
            None => result.column.clone(),
        };

        let expr = statement.parse_expression(&text).map_err(|error| {
            warn!(text = %text, position = error.start, message = %error.message, "could not parse result column expression");
            RewriteError::ColumnParse { text: text.clone(), error }
        })?;

        if !resolved.flags.contains(ResolverFlags::FROM_ANONYMOUS_SELECT) {
            Self::qualify(statement, expr, result, ctx, wrapper);
        }

        let alias = resolved.alias.as_deref().unwrap_or(&result.generated_alias);
        let node = ResultColumnNode::Expr { expr, alias: Some(Name::wrapped(alias, dialect, wrapper)) };
        Ok(statement.arena.alloc(Payload::ResultColumn(node), 0..0))
    }

    /// Prefixes a column reference with its table alias, or with its table and
    /// the attach name of its database.
    fn qualify(statement: &mut Statement, expr: NodeId, result: &ResultColumn, ctx: &RewriteContext, wrapper: NameWrapper) {
        let dialect = statement.dialect;
        let (database, table) = match statement.arena.expr_mut(expr) {
            Some(Expr::Column { database, table, .. }) => (database, table),
            _ => return,
        };

        if let Some(alias) = &result.table_alias {
            *table = Some(Name::wrapped(alias, dialect, wrapper));
        } else if let Some(name) = &result.table {
            if let Some(db) = &result.database {
                *database = Some(Name::wrapped(&ctx.physical_database(db), dialect, wrapper));
            }
            *table = Some(Name::wrapped(name, dialect, wrapper));
        }
    }

    /// Row identifiers first, then `"name" AS alias` for every other column. The
    /// name is left out for expressions nobody named.
    ///
    /// The inner SELECT only exposes the generated aliases, so `"name"` matches no
    /// inner column. Executing the output works only where SQLite reads an unknown
    /// double-quoted name as a string literal; otherwise it fails with
    /// `no such column`.
    fn outer_columns(ctx: &RewriteContext, dialect: Dialect, wrapper: NameWrapper) -> Vec<Vec<Token>> {
        let mut columns: Vec<Vec<Token>> = ctx
            .row_id_columns
            .iter()
            .flat_map(|r| r.aliases())
            .map(|alias| vec![Token::other(alias)])
            .collect();

        let mut names_used: Vec<String> = Vec::new();
        for result in &ctx.result_columns {
            let mut tokens = Vec::new();

            let base = match (&result.alias, result.expression) {
                (Some(alias), _) => Some(alias.clone()),
                (None, false) => Some(result.display_name.clone()),
                (None, true) => None,
            };
            if let Some(base) = base {
                let mut name = base;
                let mut i = 1;
                while names_used.iter().any(|used| used.eq_ignore_ascii_case(&name)) {
                    name = format!("{}:{}", result.column, i);
                    i += 1;
                }
                tokens.push(Token::other(wrap_obj_with(&name, dialect, wrapper)));
                tokens.push(Token::keyword("AS"));
                names_used.push(name);
            }

            tokens.push(Token::other(wrap_obj_if_needed_with(&result.generated_alias, dialect, wrapper)));
            columns.push(tokens);
        }
        columns
    }

    fn wrap_select(inner: &TokenList, columns: Vec<Vec<Token>>) -> TokenList {
        let mut tokens = TokenList::new();
        tokens.push(Token::keyword("SELECT"));
        tokens.push(Token::space());
        for (i, column) in columns.into_iter().enumerate() {
            if i > 0 {
                tokens.push(Token::comma());
                tokens.push(Token::space());
            }
            for (j, token) in column.into_iter().enumerate() {
                if j > 0 {
                    tokens.push(Token::space());
                }
                tokens.push(token);
            }
        }
        tokens.push(Token::space());
        tokens.push(Token::keyword("FROM"));
        tokens.push(Token::space());
        tokens.push(Token::par_left());
        tokens.extend(inner.iter().cloned());
        tokens.push(Token::par_right());
        tokens
    }
}
