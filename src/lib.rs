pub mod parser;
pub use parser::{Dialect, NameWrapper, ParseError};

pub mod database;
pub use database::{Catalog, Config, ConfigError, DbNameMap, SchemaProvider, TableSchema};

pub mod rewriter;
pub use rewriter::{
    EditionForbiddenReason, QueryRewriter, ResolutionError, ResultColumn, RewriteError, RewriteOutcome, RowIdColumn,
    StatementForbiddenReason,
};
