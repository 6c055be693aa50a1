use thiserror::Error;

use crate::parser::ParseError;

/// The SELECT could not be resolved well enough to rewrite it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("could not resolve the SELECT: {}", .0.join("; "))]
    ResolverErrors(Vec<String>),
    #[error("no result column could be resolved")]
    NoColumns,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("invalid statement: {0}")]
    InvalidStatement(#[from] ParseError),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error("could not parse result column expression `{text}`: {error}")]
    ColumnParse { text: String, error: ParseError },
}
