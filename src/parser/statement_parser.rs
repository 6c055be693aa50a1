use std::ops::Range;

use crate::parser::{
    ast::{Arena, Name, NodeId, Payload},
    tokens::{is_reserved_keyword, Token, TokenKind, TokenList},
    Dialect, ParseError,
};

/// Nested expressions, sub-selects and parenthesised joins the parser enters
/// before giving up. Each level costs a chain of recursive calls.
pub const MAX_PARSER_DEPTH: usize = 100;

/// Largest tree height accepted. Everything walking a parsed tree recurses on it.
pub const MAX_EXPR_DEPTH: usize = 500;

/// Cursor over the significant tokens of a token list. Parsed nodes are stored in
/// `arena` and their token ranges index the full list, whitespace included.
pub struct StatementParser<'a, 'b> {
    tokens: &'a TokenList,
    significant: Vec<usize>,
    pub position: usize,
    pub arena: &'b mut Arena,
    pub dialect: Dialect,
    depth: usize,
}

impl<'a, 'b> StatementParser<'a, 'b> {
    pub fn new(tokens: &'a TokenList, arena: &'b mut Arena, dialect: Dialect) -> Self {
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_whitespace())
            .map(|(i, _)| i)
            .collect();
        Self { tokens, significant, position: 0, arena, dialect, depth: 0 }
    }

    /// Fails on the first token the lexer could not recognise.
    pub fn check_tokens(&self) -> Result<(), ParseError> {
        match self.tokens.iter().find(|t| t.kind == TokenKind::Invalid) {
            Some(token) => ParseError::at_token("Unrecognized token", Some(token), self.eof_offset()).err(),
            None => Ok(()),
        }
    }

    pub fn eof(&self) -> bool {
        self.position >= self.significant.len()
    }

    pub fn current(&self) -> Option<&'a Token> {
        self.peek(0)
    }

    pub fn peek(&self, offset: usize) -> Option<&'a Token> {
        let tokens: &'a TokenList = self.tokens;
        self.significant.get(self.position + offset).map(|i| &tokens[*i])
    }

    pub fn next(&mut self) -> Option<&'a Token> {
        let token = self.current();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    pub fn mark(&self) -> usize {
        self.position
    }

    /// Range in the full token list from the significant token at `mark` up to the
    /// last consumed one.
    pub fn range_from(&self, mark: usize) -> Range<usize> {
        if self.position <= mark {
            let at = self.significant.get(mark).copied().unwrap_or(self.tokens.len());
            return at..at;
        }
        self.significant[mark]..self.significant[self.position - 1] + 1
    }

    pub fn alloc(&mut self, payload: Payload, mark: usize) -> NodeId {
        let range = self.range_from(mark);
        self.arena.alloc(payload, range)
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.is_keyword_at(0, keyword)
    }

    pub fn is_keyword_at(&self, offset: usize, keyword: &str) -> bool {
        self.peek(offset).is_some_and(|t| t.is_keyword(keyword))
    }

    pub fn is_any_keyword(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.is_keyword(k))
    }

    pub fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.is_keyword(keyword) {
            self.position += 1;
            return true;
        }
        false
    }

    pub fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        if self.eat_keyword(keyword) {
            return Ok(());
        }
        self.error(&format!("Expected {}", keyword)).err()
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.is_operator_at(0, operator)
    }

    pub fn is_operator_at(&self, offset: usize, operator: &str) -> bool {
        self.peek(offset).is_some_and(|t| t.is_operator(operator))
    }

    pub fn eat_operator(&mut self, operator: &str) -> bool {
        if self.is_operator(operator) {
            self.position += 1;
            return true;
        }
        false
    }

    pub fn expect_operator(&mut self, operator: &str) -> Result<(), ParseError> {
        if self.eat_operator(operator) {
            return Ok(());
        }
        self.error(&format!("Expected '{}'", operator)).err()
    }

    pub fn is_par_left(&self) -> bool {
        self.is_par_left_at(0)
    }

    pub fn is_par_left_at(&self, offset: usize) -> bool {
        self.peek(offset).is_some_and(|t| t.kind == TokenKind::ParLeft)
    }

    pub fn is_par_right(&self) -> bool {
        self.current().is_some_and(|t| t.kind == TokenKind::ParRight)
    }

    pub fn expect_par_left(&mut self) -> Result<(), ParseError> {
        if self.is_par_left() {
            self.position += 1;
            return Ok(());
        }
        self.error("Expected '('").err()
    }

    pub fn expect_par_right(&mut self) -> Result<(), ParseError> {
        if self.is_par_right() {
            self.position += 1;
            return Ok(());
        }
        self.error("Expected ')'").err()
    }

    /// A SELECT body starts at the current token.
    pub fn is_select_start(&self) -> bool {
        self.is_select_start_at(0)
    }

    pub fn is_select_start_at(&self, offset: usize) -> bool {
        ["SELECT", "WITH", "VALUES"].iter().any(|k| self.is_keyword_at(offset, k))
    }

    pub fn is_name(&self) -> bool {
        self.is_name_at(0)
    }

    /// Identifiers, quoted or bare, and keywords SQLite accepts as names.
    pub fn is_name_at(&self, offset: usize) -> bool {
        match self.peek(offset) {
            Some(token) => match token.kind {
                TokenKind::Other => true,
                TokenKind::Keyword => !is_reserved_keyword(&token.text),
                _ => false,
            },
            None => false,
        }
    }

    pub fn parse_name(&mut self) -> Result<Name, ParseError> {
        if !self.is_name() {
            return self.error("Expected a name").err();
        }
        if self.dialect == Dialect::Sqlite2 && self.current().is_some_and(|t| t.text.starts_with('`')) {
            return self.error("Backtick-quoted names are not supported by SQLite 2").err();
        }
        match self.next() {
            Some(token) => Ok(Name::from_token(&token.text)),
            None => self.error("Expected a name").err(),
        }
    }

    /// Optional `[AS] alias`. A string literal is accepted as an alias, as SQLite does.
    pub fn parse_alias(&mut self) -> Result<Option<Name>, ParseError> {
        let explicit = self.eat_keyword("AS");
        if self.current().is_some_and(|t| t.kind == TokenKind::String) {
            return Ok(self.next().map(|t| Name::from_token(&t.text)));
        }
        if explicit || self.is_name() {
            return self.parse_name().map(Some);
        }
        Ok(None)
    }

    /// Copies the tokens between the current `(` and its matching `)`, both consumed.
    pub fn raw_parenthesized(&mut self) -> Result<Vec<Token>, ParseError> {
        self.expect_par_left()?;
        let mut depth = 0usize;
        let mut raw = Vec::new();
        loop {
            let token = match self.next() {
                Some(token) => token,
                None => return self.error("Expected ')'").err(),
            };
            match token.kind {
                TokenKind::ParLeft => depth += 1,
                TokenKind::ParRight if depth == 0 => return Ok(raw),
                TokenKind::ParRight => depth -= 1,
                _ => {}
            }
            raw.push(token.clone());
        }
    }

    /// Runs one recursive parse step, failing once steps nest past
    /// [`MAX_PARSER_DEPTH`] or the node built is taller than [`MAX_EXPR_DEPTH`].
    pub fn nested(
        &mut self,
        step: impl FnOnce(&mut Self) -> Result<NodeId, ParseError>,
    ) -> Result<NodeId, ParseError> {
        if self.depth >= MAX_PARSER_DEPTH {
            return self.error("parser stack overflow").err();
        }
        self.depth += 1;
        let result = step(self);
        self.depth -= 1;

        let id = result?;
        if self.arena.height(id) > MAX_EXPR_DEPTH {
            return self
                .error(&format!("Expression tree is too large (maximum depth {})", MAX_EXPR_DEPTH))
                .err();
        }
        Ok(id)
    }

    pub fn comma_separated<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = vec![item(self)?];
        while self.eat_operator(",") {
            items.push(item(self)?);
        }
        Ok(items)
    }

    pub fn eof_offset(&self) -> usize {
        self.tokens.last().map(|t| t.end()).unwrap_or(0)
    }

    pub fn error(&self, message: &str) -> ParseError {
        ParseError::at_token(message, self.current(), self.eof_offset())
    }
}
