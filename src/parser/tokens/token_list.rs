use std::ops::{Deref, Range};

use crate::parser::tokens::{Token, TokenKind};

/// Ordered token stream of a statement, whitespace and comments included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = Token>) {
        self.tokens.extend(other);
    }

    /// Literal SQL text of the tokens.
    pub fn detokenize(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    pub fn filter_whitespace(&self) -> TokenList {
        self.tokens.iter().filter(|t| !t.is_whitespace()).cloned().collect()
    }

    pub fn slice(&self, range: Range<usize>) -> TokenList {
        let end = range.end.min(self.tokens.len());
        let start = range.start.min(end);
        self.tokens[start..end].iter().cloned().collect()
    }

    /// Drops leading and trailing whitespace tokens.
    pub fn trimmed(&self) -> TokenList {
        let start = self.tokens.iter().position(|t| !t.is_whitespace());
        let end = self.tokens.iter().rposition(|t| !t.is_whitespace());
        match (start, end) {
            (Some(start), Some(end)) => self.slice(start..end + 1),
            _ => TokenList::new(),
        }
    }

    /// Joins significant tokens with single spaces where SQL needs them.
    pub fn join_canonical(tokens: Vec<Token>) -> TokenList {
        let mut result = TokenList::new();
        let mut prev: Option<Token> = None;
        for token in tokens {
            if let Some(prev) = &prev {
                if Self::needs_space(prev, &token) {
                    result.push(Token::space());
                }
            }
            prev = Some(token.clone());
            result.push(token);
        }
        result
    }

    fn needs_space(prev: &Token, next: &Token) -> bool {
        if next.kind == TokenKind::ParRight || next.is_operator(",") || next.is_operator(".") || next.is_operator(";") {
            return false;
        }
        if prev.kind == TokenKind::ParLeft || prev.is_operator(".") {
            return false;
        }
        !(next.kind == TokenKind::ParLeft && prev.kind == TokenKind::Other)
    }
}

impl Deref for TokenList {
    type Target = [Token];

    fn deref(&self) -> &Self::Target {
        &self.tokens
    }
}

impl FromIterator<Token> for TokenList {
    fn from_iter<T: IntoIterator<Item = Token>>(iter: T) -> Self {
        Self { tokens: iter.into_iter().collect() }
    }
}

impl IntoIterator for TokenList {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
