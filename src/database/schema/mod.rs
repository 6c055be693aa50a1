pub mod column_info;
pub use column_info::*;

pub mod table_schema;
pub use table_schema::*;

pub trait SchemaProvider: Send + Sync {
    /// Schema of `table` in the logical `database`. Without a database the lookup
    /// follows SQLite's search order: `main`, `temp`, then attached databases.
    fn table_schema(&self, database: Option<&str>, table: &str) -> Option<TableSchema>;
}
