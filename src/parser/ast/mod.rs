pub mod arena;
pub use arena::*;

pub mod name;
pub use name::*;

pub mod expr;
pub use expr::*;

pub mod select;
pub use select::*;

pub mod select_core;
pub use select_core::*;

pub mod result_column;
pub use result_column::*;

pub mod source;
pub use source::*;

pub mod cte;
pub use cte::*;

pub mod ordering_term;
pub use ordering_term::*;

pub mod statement;
pub use statement::*;

pub mod token_writer;
pub use token_writer::*;
