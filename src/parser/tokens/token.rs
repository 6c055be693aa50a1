use std::fmt;

use crate::parser::tokens::TokenKind;

#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Character offset in the source text. Tokens produced by a rebuild carry `0`.
    pub start: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into(), start: 0 }
    }

    pub fn at(kind: TokenKind, text: impl Into<String>, start: usize) -> Self {
        Self { kind, text: text.into(), start }
    }

    pub fn keyword(text: &str) -> Self {
        Self::new(TokenKind::Keyword, text.to_ascii_uppercase())
    }

    pub fn other(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Other, text)
    }

    pub fn operator(text: &str) -> Self {
        Self::new(TokenKind::Operator, text)
    }

    pub fn space() -> Self {
        Self::new(TokenKind::Space, " ")
    }

    pub fn comma() -> Self {
        Self::operator(",")
    }

    pub fn par_left() -> Self {
        Self::new(TokenKind::ParLeft, "(")
    }

    pub fn par_right() -> Self {
        Self::new(TokenKind::ParRight, ")")
    }

    /// Exclusive end offset of the token in the source text.
    pub fn end(&self) -> usize {
        self.start + self.text.chars().count()
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text.eq_ignore_ascii_case(keyword)
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == operator
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?}@{})", self.kind, self.text, self.start)
    }
}
