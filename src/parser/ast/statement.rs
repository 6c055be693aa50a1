use crate::parser::{
    ast::{Arena, Expr, NodeId, Select, TokenWriter},
    tokens::{TokenKind, TokenList},
    Dialect, Lexer, ParseError, StatementParser,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Explain,
    /// First keyword of the statement, upper-cased.
    Other(String),
}

/// A parsed SELECT statement. `original` holds the tokens the tree was parsed
/// from; `tokens` is what [`Statement::detokenize`] renders and is regenerated by
/// [`Statement::rebuild_tokens`] after the tree changes.
#[derive(Debug, Clone)]
pub struct Statement {
    pub arena: Arena,
    pub root: NodeId,
    pub original: TokenList,
    pub tokens: TokenList,
    pub explain: bool,
    pub query_plan: bool,
    pub dialect: Dialect,
}

impl Statement {
    pub fn parse(sql: &str, dialect: Dialect) -> Result<Statement, ParseError> {
        let tokens = Lexer::tokenize(sql);
        let mut arena = Arena::new();

        let (root, explain, query_plan) = {
            let mut parser = StatementParser::new(&tokens, &mut arena, dialect);
            parser.check_tokens()?;

            let explain = parser.eat_keyword("EXPLAIN");
            let query_plan = explain && parser.is_keyword("QUERY") && parser.is_keyword_at(1, "PLAN");
            if query_plan {
                parser.position += 2;
            }

            if !parser.is_select_start() {
                return parser.error("Expected a SELECT statement").err();
            }
            let root = Select::parse(&mut parser)?;

            parser.eat_operator(";");
            if !parser.eof() {
                return parser.error("Unexpected token after end of statement").err();
            }
            (root, explain, query_plan)
        };

        Ok(Statement { arena, root, original: tokens.clone(), tokens, explain, query_plan, dialect })
    }

    /// Reports what kind of statement `sql` is without parsing its body.
    pub fn peek_kind(sql: &str) -> StatementKind {
        let tokens = Lexer::tokenize(sql).filter_whitespace();
        let first = match tokens.first() {
            Some(token) => token,
            None => return StatementKind::Other(String::new()),
        };

        if first.is_keyword("EXPLAIN") {
            return StatementKind::Explain;
        }
        if first.is_keyword("SELECT") || first.is_keyword("VALUES") {
            return StatementKind::Select;
        }
        if !first.is_keyword("WITH") {
            return StatementKind::Other(first.text.to_ascii_uppercase());
        }

        let mut depth = 0usize;
        for token in tokens.iter().skip(1) {
            match token.kind {
                TokenKind::ParLeft => depth += 1,
                TokenKind::ParRight => depth = depth.saturating_sub(1),
                TokenKind::Keyword if depth == 0 => {
                    let keyword = token.text.to_ascii_uppercase();
                    match keyword.as_str() {
                        "SELECT" | "VALUES" => return StatementKind::Select,
                        "INSERT" | "UPDATE" | "DELETE" | "REPLACE" => return StatementKind::Other(keyword),
                        _ => {}
                    }
                }
                _ => {}
            }
        }
        StatementKind::Other("WITH".to_string())
    }

    pub fn select(&self) -> Option<&Select> {
        self.arena.select(self.root)
    }

    pub fn first_core(&self) -> Option<NodeId> {
        self.select().and_then(|s| s.cores.first().copied())
    }

    /// Text of a node as written in the original query.
    pub fn node_text(&self, id: NodeId) -> String {
        self.original.slice(self.arena.get(id).tokens.clone()).trimmed().detokenize()
    }

    /// Parses `text` as an expression into this statement's arena.
    pub fn parse_expression(&mut self, text: &str) -> Result<NodeId, ParseError> {
        parse_expression_into(text, self.dialect, &mut self.arena)
    }

    pub fn rebuild_tokens(&mut self) {
        let mut writer = TokenWriter::new(&self.arena);
        if self.explain {
            writer.keyword("EXPLAIN");
        }
        if self.query_plan {
            writer.keyword("QUERY");
            writer.keyword("PLAN");
        }
        writer.node(self.root);
        self.tokens = writer.finish();
    }

    pub fn detokenize(&self) -> String {
        self.tokens.detokenize()
    }
}

/// Parses a complete expression into `arena`. Node token ranges refer to the
/// tokens of `text`.
pub fn parse_expression_into(text: &str, dialect: Dialect, arena: &mut Arena) -> Result<NodeId, ParseError> {
    let tokens = Lexer::tokenize(text);
    let mut parser = StatementParser::new(&tokens, arena, dialect);
    parser.check_tokens()?;

    let root = Expr::parse(&mut parser)?;
    if !parser.eof() {
        return parser.error("Unexpected token after end of expression").err();
    }
    Ok(root)
}

pub fn parse_expression(text: &str, dialect: Dialect) -> Result<(Arena, NodeId), ParseError> {
    let mut arena = Arena::new();
    let root = parse_expression_into(text, dialect, &mut arena)?;
    Ok((arena, root))
}
