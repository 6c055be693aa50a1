pub mod token_kind;
pub use token_kind::*;

pub mod token;
pub use token::*;

pub mod token_list;
pub use token_list::*;

pub mod keywords;
pub use keywords::*;
