pub mod result_column;
pub use result_column::*;

pub mod row_id_column;
pub use row_id_column::*;

pub mod rewrite_error;
pub use rewrite_error::*;

pub mod rewrite_context;
pub use rewrite_context::*;

pub mod column_classifier;
pub use column_classifier::*;

pub mod statement_rewriter;
pub use statement_rewriter::*;

pub mod query_rewriter;
pub use query_rewriter::*;

mod _tests;
