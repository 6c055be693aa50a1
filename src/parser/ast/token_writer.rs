use crate::parser::{
    ast::{
        Arena, CompoundOperator, Cte, Expr, Indexed, JoinConstraint, JoinOperator, Literal, Name, NodeId, NullTest,
        NullsOrder, OrderingTerm, Over, Payload, ResultColumn, Select, SelectCore, SortOrder, Source, UnaryOp,
    },
    tokens::{Token, TokenKind, TokenList},
};

/// Regenerates tokens from the tree. Output is canonical: keywords upper-case,
/// names as written, single spaces between tokens where SQL needs them.
pub struct TokenWriter<'a> {
    arena: &'a Arena,
    out: Vec<Token>,
}

impl<'a> TokenWriter<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        Self { arena, out: Vec::new() }
    }

    pub fn node_tokens(arena: &Arena, id: NodeId) -> TokenList {
        let mut writer = TokenWriter::new(arena);
        writer.node(id);
        writer.finish()
    }

    pub fn finish(self) -> TokenList {
        TokenList::join_canonical(self.out)
    }

    pub fn keyword(&mut self, keyword: &str) {
        self.out.push(Token::keyword(keyword));
    }

    fn keywords(&mut self, keywords: &[&str]) {
        for keyword in keywords {
            self.keyword(keyword);
        }
    }

    fn operator(&mut self, operator: &str) {
        self.out.push(Token::operator(operator));
    }

    fn name(&mut self, name: &Name) {
        self.out.push(Token::other(name.text.clone()));
    }

    fn open(&mut self) {
        self.out.push(Token::par_left());
    }

    fn close(&mut self) {
        self.out.push(Token::par_right());
    }

    fn raw(&mut self, tokens: &[Token]) {
        self.out.extend(tokens.iter().map(|t| Token::new(t.kind, t.text.clone())));
    }

    fn list(&mut self, ids: &[NodeId]) {
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                self.out.push(Token::comma());
            }
            self.node(*id);
        }
    }

    fn names(&mut self, names: &[Name]) {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.out.push(Token::comma());
            }
            self.name(name);
        }
    }

    pub fn node(&mut self, id: NodeId) {
        let arena = self.arena;
        match &arena.get(id).payload {
            Payload::Select(select) => self.select(select),
            Payload::Core(core) => self.core(core),
            Payload::ResultColumn(column) => self.result_column(column),
            Payload::Source(source) => self.source(source),
            Payload::Cte(cte) => self.cte(cte),
            Payload::OrderingTerm(term) => self.ordering_term(term),
            Payload::Expr(expr) => self.expr(expr),
        }
    }

    fn select(&mut self, select: &Select) {
        if let Some(with) = &select.with {
            self.keyword("WITH");
            if with.recursive {
                self.keyword("RECURSIVE");
            }
            self.list(&with.ctes);
        }

        for (i, core) in select.cores.iter().enumerate() {
            if i > 0 {
                let op = select.compound_ops.get(i - 1).copied().unwrap_or(CompoundOperator::Union);
                self.keywords(op.keywords());
            }
            self.node(*core);
        }

        if !select.order_by.is_empty() {
            self.keywords(&["ORDER", "BY"]);
            self.list(&select.order_by);
        }

        if let Some(limit) = &select.limit {
            self.keyword("LIMIT");
            self.node(limit.limit);
            if let Some(offset) = limit.offset {
                self.keyword("OFFSET");
                self.node(offset);
            }
        }
    }

    fn core(&mut self, core: &SelectCore) {
        if core.is_values() {
            self.keyword("VALUES");
            for (i, row) in core.values.iter().enumerate() {
                if i > 0 {
                    self.out.push(Token::comma());
                }
                self.open();
                self.list(row);
                self.close();
            }
            return;
        }

        self.keyword("SELECT");
        if core.distinct {
            self.keyword("DISTINCT");
        } else if core.all {
            self.keyword("ALL");
        }
        self.list(&core.result_columns);

        if let Some(from) = core.from {
            self.keyword("FROM");
            self.node(from);
        }
        if let Some(where_clause) = core.where_clause {
            self.keyword("WHERE");
            self.node(where_clause);
        }
        if !core.group_by.is_empty() {
            self.keywords(&["GROUP", "BY"]);
            self.list(&core.group_by);
        }
        if let Some(having) = core.having {
            self.keyword("HAVING");
            self.node(having);
        }
        if !core.windows.is_empty() {
            self.keyword("WINDOW");
            for (i, window) in core.windows.iter().enumerate() {
                if i > 0 {
                    self.out.push(Token::comma());
                }
                self.name(&window.name);
                self.keyword("AS");
                self.open();
                self.raw(&window.tokens);
                self.close();
            }
        }
    }

    fn result_column(&mut self, column: &ResultColumn) {
        match column {
            ResultColumn::Star => self.operator("*"),
            ResultColumn::TableStar(table) => {
                self.name(table);
                self.operator(".");
                self.operator("*");
            }
            ResultColumn::Expr { expr, alias } => {
                self.node(*expr);
                if let Some(alias) = alias {
                    self.keyword("AS");
                    self.name(alias);
                }
            }
        }
    }

    fn source(&mut self, source: &Source) {
        match source {
            Source::Table { database, name, alias, indexed } => {
                if let Some(database) = database {
                    self.name(database);
                    self.operator(".");
                }
                self.name(name);
                if let Some(alias) = alias {
                    self.keyword("AS");
                    self.name(alias);
                }
                match indexed {
                    Some(Indexed::By(index)) => {
                        self.keywords(&["INDEXED", "BY"]);
                        self.name(index);
                    }
                    Some(Indexed::NotIndexed) => self.keywords(&["NOT", "INDEXED"]),
                    None => {}
                }
            }
            Source::SubSelect { select, alias } => {
                self.open();
                self.node(*select);
                self.close();
                if let Some(alias) = alias {
                    self.keyword("AS");
                    self.name(alias);
                }
            }
            Source::Join { sources, ops, constraints } => {
                for (i, source) in sources.iter().enumerate() {
                    if i > 0 {
                        match ops.get(i - 1) {
                            Some(JoinOperator::Join { natural, kind }) => {
                                if *natural {
                                    self.keyword("NATURAL");
                                }
                                self.keywords(kind.keywords());
                                self.keyword("JOIN");
                            }
                            _ => self.out.push(Token::comma()),
                        }
                    }
                    self.node(*source);
                    if i > 0 {
                        match constraints.get(i - 1) {
                            Some(JoinConstraint::On(expr)) => {
                                self.keyword("ON");
                                self.node(*expr);
                            }
                            Some(JoinConstraint::Using(names)) => {
                                self.keyword("USING");
                                self.open();
                                self.names(names);
                                self.close();
                            }
                            _ => {}
                        }
                    }
                }
            }
            Source::Nested(inner) => {
                self.open();
                self.node(*inner);
                self.close();
            }
        }
    }

    fn cte(&mut self, cte: &Cte) {
        self.name(&cte.name);
        if !cte.columns.is_empty() {
            self.open();
            self.names(&cte.columns);
            self.close();
        }
        self.keyword("AS");
        match cte.materialized {
            Some(true) => self.keyword("MATERIALIZED"),
            Some(false) => self.keywords(&["NOT", "MATERIALIZED"]),
            None => {}
        }
        self.open();
        self.node(cte.select);
        self.close();
    }

    fn ordering_term(&mut self, term: &OrderingTerm) {
        self.node(term.expr);
        match term.order {
            Some(SortOrder::Asc) => self.keyword("ASC"),
            Some(SortOrder::Desc) => self.keyword("DESC"),
            None => {}
        }
        match term.nulls {
            Some(NullsOrder::First) => self.keywords(&["NULLS", "FIRST"]),
            Some(NullsOrder::Last) => self.keywords(&["NULLS", "LAST"]),
            None => {}
        }
    }

    fn literal(&mut self, literal: &Literal) {
        let token = match literal {
            Literal::Null => Token::keyword("NULL"),
            Literal::Integer(text) => Token::new(TokenKind::Integer, text.clone()),
            Literal::Float(text) => Token::new(TokenKind::Float, text.clone()),
            Literal::String(text) => Token::new(TokenKind::String, text.clone()),
            Literal::Blob(text) => Token::new(TokenKind::Blob, text.clone()),
            Literal::CurrentTime => Token::keyword("CURRENT_TIME"),
            Literal::CurrentDate => Token::keyword("CURRENT_DATE"),
            Literal::CurrentTimestamp => Token::keyword("CURRENT_TIMESTAMP"),
        };
        self.out.push(token);
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(literal) => self.literal(literal),
            Expr::BindParam(text) => self.out.push(Token::new(TokenKind::BindParam, text.clone())),
            Expr::Column { database, table, column } => {
                for qualifier in [database, table].into_iter().flatten() {
                    self.name(qualifier);
                    self.operator(".");
                }
                self.name(column);
            }
            Expr::Unary { op, expr } => {
                match op {
                    UnaryOp::Minus => self.operator("-"),
                    UnaryOp::Plus => self.operator("+"),
                    UnaryOp::BitNot => self.operator("~"),
                    UnaryOp::Not => self.keyword("NOT"),
                }
                self.node(*expr);
            }
            Expr::Binary { left, op, right } => {
                self.node(*left);
                match op.is_keyword() {
                    true => self.keywords(&op.text().split(' ').collect::<Vec<_>>()),
                    false => self.operator(op.text()),
                }
                self.node(*right);
            }
            Expr::Like { expr, op, negated, pattern, escape } => {
                self.node(*expr);
                if *negated {
                    self.keyword("NOT");
                }
                self.keyword(op.text());
                self.node(*pattern);
                if let Some(escape) = escape {
                    self.keyword("ESCAPE");
                    self.node(*escape);
                }
            }
            Expr::Between { expr, negated, low, high } => {
                self.node(*expr);
                if *negated {
                    self.keyword("NOT");
                }
                self.keyword("BETWEEN");
                self.node(*low);
                self.keyword("AND");
                self.node(*high);
            }
            Expr::InList { expr, negated, list } => {
                self.in_prefix(*expr, *negated);
                self.open();
                self.list(list);
                self.close();
            }
            Expr::InSelect { expr, negated, select } => {
                self.in_prefix(*expr, *negated);
                self.open();
                self.node(*select);
                self.close();
            }
            Expr::InTable { expr, negated, database, table } => {
                self.in_prefix(*expr, *negated);
                if let Some(database) = database {
                    self.name(database);
                    self.operator(".");
                }
                self.name(table);
            }
            Expr::NullTest { expr, test } => {
                self.node(*expr);
                match test {
                    NullTest::IsNull => self.keyword("ISNULL"),
                    NullTest::NotNull => self.keyword("NOTNULL"),
                    NullTest::NotSpaceNull => self.keywords(&["NOT", "NULL"]),
                }
            }
            Expr::Exists(select) => {
                self.keyword("EXISTS");
                self.open();
                self.node(*select);
                self.close();
            }
            Expr::SubSelect(select) => {
                self.open();
                self.node(*select);
                self.close();
            }
            Expr::Case { operand, branches, else_expr } => {
                self.keyword("CASE");
                if let Some(operand) = operand {
                    self.node(*operand);
                }
                for (when, then) in branches {
                    self.keyword("WHEN");
                    self.node(*when);
                    self.keyword("THEN");
                    self.node(*then);
                }
                if let Some(else_expr) = else_expr {
                    self.keyword("ELSE");
                    self.node(*else_expr);
                }
                self.keyword("END");
            }
            Expr::Cast { expr, type_name } => {
                self.keyword("CAST");
                self.open();
                self.node(*expr);
                self.keyword("AS");
                self.raw(type_name);
                self.close();
            }
            Expr::Collate { expr, collation } => {
                self.node(*expr);
                self.keyword("COLLATE");
                self.name(collation);
            }
            Expr::Function { name, distinct, star, args, filter, over } => {
                // keeps "name(" together even when the name lexes as a keyword
                self.out.push(Token::other(name.text.clone()));
                self.open();
                if *distinct {
                    self.keyword("DISTINCT");
                }
                if *star {
                    self.operator("*");
                } else {
                    self.list(args);
                }
                self.close();
                if let Some(filter) = filter {
                    self.keyword("FILTER");
                    self.open();
                    self.keyword("WHERE");
                    self.node(*filter);
                    self.close();
                }
                match over {
                    Some(Over::Name(window)) => {
                        self.keyword("OVER");
                        self.name(window);
                    }
                    Some(Over::Definition(tokens)) => {
                        self.keyword("OVER");
                        self.open();
                        self.raw(tokens);
                        self.close();
                    }
                    None => {}
                }
            }
            Expr::Parenthesized(list) => {
                self.open();
                self.list(list);
                self.close();
            }
            Expr::Raise(tokens) => {
                self.keyword("RAISE");
                self.open();
                self.raw(tokens);
                self.close();
            }
        }
    }

    fn in_prefix(&mut self, expr: NodeId, negated: bool) {
        self.node(expr);
        if negated {
            self.keyword("NOT");
        }
        self.keyword("IN");
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ast::{Statement, TokenWriter}, Dialect};

    fn canonical(sql: &str) -> String {
        let statement = Statement::parse(sql, Dialect::Sqlite3).expect("Failed to parse statement");
        TokenWriter::node_tokens(&statement.arena, statement.root).detokenize()
    }

    #[test]
    pub fn test_writer_normalizes_spacing_and_keywords() {
        assert_eq!(
            canonical("select  a,b as \"B\"  from main.t  where a>1 order by b desc"),
            "SELECT a, b AS \"B\" FROM main.t WHERE a > 1 ORDER BY b DESC"
        );
    }

    #[test]
    pub fn test_writer_joins_and_sub_selects() {
        assert_eq!(
            canonical("SELECT * FROM (select x from y) s left join z using(x) WHERE x in (1,2)"),
            "SELECT * FROM (SELECT x FROM y) AS s LEFT JOIN z USING (x) WHERE x IN (1, 2)"
        );
    }

    #[test]
    pub fn test_writer_functions_and_cast() {
        assert_eq!(
            canonical("SELECT count(DISTINCT a), cast(b as text), replace(c, 'a', 'b') FROM t GROUP BY d"),
            "SELECT count(DISTINCT a), CAST (b AS text), replace(c, 'a', 'b') FROM t GROUP BY d"
        );
    }

    #[test]
    pub fn test_writer_limit_comma_form() {
        assert_eq!(canonical("SELECT 1 LIMIT 5, 10"), "SELECT 1 LIMIT 10 OFFSET 5");
    }
}
