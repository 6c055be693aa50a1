use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Row identifier columns injected into a query before it is rewritten, so each
/// output row can be traced back to the physical row it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIdColumn {
    pub database: Option<String>,
    pub table: String,
    pub table_alias: Option<String>,
    /// Generated alias to the column it identifies (`ROWID` or a primary key column).
    pub alias_to_column: IndexMap<String, String>,
}

impl RowIdColumn {
    pub fn new(table: &str) -> Self {
        Self { table: table.to_string(), ..Self::default() }
    }

    pub fn with_alias(mut self, alias: &str, column: &str) -> Self {
        self.alias_to_column.insert(alias.to_string(), column.to_string());
        self
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.alias_to_column.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use crate::rewriter::RowIdColumn;

    #[test]
    pub fn test_aliases_in_insertion_order() {
        let row_id = RowIdColumn::new("orders").with_alias("ResCol_3", "order_no").with_alias("ResCol_1", "line");

        assert_eq!(row_id.aliases().collect::<Vec<_>>(), vec!["ResCol_3", "ResCol_1"]);
        assert_eq!(row_id.alias_to_column.get("ResCol_1").map(String::as_str), Some("line"));
    }

    #[test]
    pub fn test_from_json() {
        let row_id: RowIdColumn = serde_json::from_str(
            r#"{"database": "main", "table": "users", "table_alias": "u", "alias_to_column": {"ResCol_0": "ROWID"}}"#,
        )
        .expect("Failed to parse row id column");

        assert_eq!(row_id.table_alias.as_deref(), Some("u"));
        assert_eq!(row_id.aliases().next(), Some("ResCol_0"));
    }
}
