use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::database::ColumnInfo;

/// Columns of a table or view in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: IndexMap<String, ColumnInfo>,
    #[serde(default)]
    pub without_rowid: bool,
    #[serde(default)]
    pub is_view: bool,
}

impl TableSchema {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), ..Default::default() }
    }

    pub fn with_columns(name: &str, columns: &[&str]) -> Self {
        let mut schema = Self::new(name);
        for column in columns {
            schema.add_column(column, ColumnInfo::default());
        }
        schema
    }

    pub fn add_column(&mut self, name: &str, info: ColumnInfo) {
        self.columns.insert(name.to_string(), info);
    }

    /// Case-insensitive lookup returning the column's declared spelling.
    pub fn get(&self, name: &str) -> Option<(&str, &ColumnInfo)> {
        self.columns
            .iter()
            .find(|(column, _)| column.eq_ignore_ascii_case(name))
            .map(|(column, info)| (column.as_str(), info))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Views and WITHOUT ROWID tables have no ROWID to select.
    pub fn has_rowid(&self) -> bool {
        !self.without_rowid && !self.is_view
    }
}
