use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Why a result column cannot be written back to its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditionForbiddenReason {
    Expression,
    SystemTable,
    CompoundSelect,
    GroupedResults,
    DistinctResults,
}

/// Why no column of a statement can be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementForbiddenReason {
    NotASelect,
}

/// One output column of a rewritten statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultColumn {
    /// Unique name the column is exposed under by the outer SELECT.
    pub generated_alias: String,
    /// Alias written by the user, if any.
    pub alias: Option<String>,
    pub display_name: String,
    pub column: String,
    pub table: Option<String>,
    pub table_alias: Option<String>,
    pub database: Option<String>,
    pub expression: bool,
    pub edition_forbidden_reasons: BTreeSet<EditionForbiddenReason>,
}

impl ResultColumn {
    pub fn is_editable(&self) -> bool {
        self.edition_forbidden_reasons.is_empty()
    }

    pub fn forbid(&mut self, reason: EditionForbiddenReason) {
        self.edition_forbidden_reasons.insert(reason);
    }
}
