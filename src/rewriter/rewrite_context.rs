use std::collections::HashSet;

use crate::{
    database::DbNameMap,
    rewriter::{ResultColumn, RowIdColumn},
};

/// Scratch state of a single rewrite. Owns the alias counter, so concurrent
/// rewrites never share naming state.
pub struct RewriteContext<'a> {
    pub db_name_map: &'a DbNameMap,
    pub row_id_columns: &'a [RowIdColumn],
    /// Non row-identifier columns, in output order.
    pub result_columns: Vec<ResultColumn>,
    pub row_id_col_names: Vec<String>,
    alias_prefix: String,
    counter: usize,
    reserved: HashSet<String>,
}

impl<'a> RewriteContext<'a> {
    pub fn new(db_name_map: &'a DbNameMap, row_id_columns: &'a [RowIdColumn], alias_prefix: &str) -> Self {
        let row_id_col_names: Vec<String> =
            row_id_columns.iter().flat_map(|r| r.aliases().map(str::to_string)).collect();
        let reserved = row_id_col_names.iter().map(|n| n.to_lowercase()).collect();

        Self {
            db_name_map,
            row_id_columns,
            result_columns: Vec::new(),
            row_id_col_names,
            alias_prefix: alias_prefix.to_string(),
            counter: 0,
            reserved,
        }
    }

    /// Keeps `name` out of the generated aliases.
    pub fn reserve(&mut self, name: &str) {
        self.reserved.insert(name.to_lowercase());
    }

    pub fn next_col_name(&mut self) -> String {
        loop {
            let name = format!("{}{}", self.alias_prefix, self.counter);
            self.counter += 1;
            if self.reserved.insert(name.to_lowercase()) {
                return name;
            }
        }
    }

    /// Exact match against the aliases the row identifier columns were injected with.
    pub fn is_row_id_column_alias(&self, alias: &str) -> bool {
        self.row_id_columns.iter().any(|r| r.alias_to_column.contains_key(alias))
    }

    /// Like [`Self::is_row_id_column_alias`], but also recognises the `alias:N`
    /// copies a sub-query produces when it exposes the same row identifier twice.
    pub fn is_row_id_column(&self, alias: &str) -> bool {
        let base = alias.split(':').next().unwrap_or(alias);
        self.row_id_col_names.iter().any(|n| n == base)
    }

    /// Logical name of a database given by its attach name.
    pub fn resolve_attached_database(&self, name: &str) -> String {
        self.db_name_map.logical_of(name).unwrap_or(name).to_string()
    }

    /// Attach name of a logical database, or the name itself when it is not attached.
    pub fn physical_database(&self, name: &str) -> String {
        self.db_name_map.physical_of(name).unwrap_or(name).to_string()
    }
}
