use thiserror::Error;

/// One problem found while resolving a SELECT. Messages follow SQLite's wording.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    #[error("no such table: {0}")]
    UnknownTable(String),
    #[error("no such column: {0}")]
    UnknownColumn(String),
    #[error("ambiguous column name: {0}")]
    AmbiguousColumn(String),
    #[error("no tables specified")]
    NoTablesSpecified,
    #[error("{0}")]
    Other(String),
}
