pub mod config;
pub use config::*;

pub mod schema;
pub use schema::*;

pub mod catalog;
pub use catalog::*;

pub mod db_name_map;
pub use db_name_map::*;
