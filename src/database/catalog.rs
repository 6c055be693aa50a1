use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::database::{ColumnInfo, ConfigError, SchemaProvider, TableSchema};

const MASTER_COLUMNS: [&str; 5] = ["type", "name", "tbl_name", "rootpage", "sql"];

/// In-memory schema catalog keyed by logical database name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    databases: IndexMap<String, IndexMap<String, TableSchema>>,
}

impl Default for Catalog {
    fn default() -> Self {
        let mut databases = IndexMap::new();
        databases.insert("main".to_string(), IndexMap::new());
        databases.insert("temp".to_string(), IndexMap::new());
        Self { databases }
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn with_table(mut self, database: &str, name: &str, columns: &[&str]) -> Self {
        self.add_table(database, TableSchema::with_columns(name, columns));
        self
    }

    pub fn add_table(&mut self, database: &str, schema: TableSchema) {
        self.databases
            .entry(database.to_ascii_lowercase())
            .or_default()
            .insert(schema.name.to_ascii_lowercase(), schema);
    }

    pub fn add_view(&mut self, database: &str, name: &str, columns: &[&str]) {
        let mut schema = TableSchema::with_columns(name, columns);
        schema.is_view = true;
        self.add_table(database, schema);
    }

    pub fn databases(&self) -> impl Iterator<Item = &str> {
        self.databases.keys().map(String::as_str)
    }

    pub fn tables(&self, database: &str) -> Vec<&str> {
        self.databases
            .get(&database.to_ascii_lowercase())
            .map(|tables| tables.values().map(|t| t.name.as_str()).collect())
            .unwrap_or_default()
    }

    fn builtin(database: Option<&str>, table: &str) -> Option<TableSchema> {
        let lower = table.to_ascii_lowercase();
        let is_temp = database.is_some_and(|db| db.eq_ignore_ascii_case("temp"));
        let known = match lower.as_str() {
            "sqlite_master" | "sqlite_schema" => true,
            "sqlite_temp_master" | "sqlite_temp_schema" => database.is_none() || is_temp,
            _ => false,
        };
        if !known {
            return None;
        }

        let mut schema = TableSchema::new(&lower);
        for column in MASTER_COLUMNS {
            schema.add_column(column, ColumnInfo::default());
        }
        Some(schema)
    }
}

impl SchemaProvider for Catalog {
    fn table_schema(&self, database: Option<&str>, table: &str) -> Option<TableSchema> {
        let key = table.to_ascii_lowercase();
        let found = match database {
            Some(db) => self.databases.get(&db.to_ascii_lowercase()).and_then(|tables| tables.get(&key)),
            None => self.databases.values().find_map(|tables| tables.get(&key)),
        };

        match found {
            Some(schema) => Some(schema.clone()),
            None if database.is_none_or(|db| self.databases.contains_key(&db.to_ascii_lowercase())) => {
                Self::builtin(database, table)
            }
            None => None,
        }
    }
}
