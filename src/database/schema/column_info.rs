use serde::{Deserialize, Serialize};

/// Metadata of one table column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnInfo {
    pub declared_type: Option<String>,
    pub primary_key: bool,
}

impl ColumnInfo {
    pub fn new(declared_type: Option<&str>, primary_key: bool) -> Self {
        Self { declared_type: declared_type.map(str::to_string), primary_key }
    }

    pub fn typed(declared_type: &str) -> Self {
        Self::new(Some(declared_type), false)
    }
}
