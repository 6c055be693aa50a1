pub mod char_cursor;
pub use char_cursor::*;

pub mod tokens;

pub mod lexer;
pub use lexer::*;

pub mod parse_error;
pub use parse_error::*;

pub mod dialect;
pub use dialect::*;

pub mod statement_parser;
pub use statement_parser::*;

pub mod ast;

pub mod analyzer;
