use thiserror::Error;

use crate::parser::tokens::Token;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ParseError: {message}\n  at [{start}:{end}] -> '{text}'")]
pub struct ParseError {
    pub message: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl ParseError {
    pub fn new(message: &str, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            message: message.to_string(),
            text: text.into(),
            start,
            end,
        }
    }

    /// Error pointing at a token, or at the end of input when there is none.
    pub fn at_token(message: &str, token: Option<&Token>, eof: usize) -> Self {
        match token {
            Some(token) => Self::new(message, token.text.clone(), token.start, token.end()),
            None => Self::new(message, "", eof, eof),
        }
    }

    pub fn err<T>(self) -> Result<T, ParseError> {
        Err(self)
    }
}
