use crate::{
    database::{DbNameMap, SchemaProvider},
    parser::analyzer::ResolvedColumn,
};

/// A column a source exposes to the core that selects from it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceColumn {
    pub name: String,
    pub resolved: ResolvedColumn,
    /// Merged into an earlier column by USING or NATURAL: skipped by `*` and by
    /// unqualified lookups.
    pub hidden: bool,
}

/// A table, view, sub-select or CTE reference visible in a core.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    pub alias: Option<String>,
    /// Underlying table or view, `None` for sub-selects and CTE references.
    pub table: Option<String>,
    /// Database as written in the query, mapped to its logical name.
    pub database: Option<String>,
    pub columns: Vec<SourceColumn>,
    pub has_rowid: bool,
}

impl SourceTable {
    /// Name the source is referenced by: its alias, else the table name.
    pub fn visible(&self) -> Option<&str> {
        self.alias.as_deref().or(self.table.as_deref())
    }

    pub fn matches(&self, name: &str) -> bool {
        self.visible().is_some_and(|v| v.eq_ignore_ascii_case(name))
    }

    pub fn column(&self, name: &str) -> Option<&SourceColumn> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &SourceColumn> {
        self.columns.iter().filter(|c| !c.hidden)
    }
}

/// Sources visible to one core, plus the collaborators lookups go through.
pub struct AnalysisContext<'a> {
    pub sources: Vec<SourceTable>,
    pub schemas: &'a dyn SchemaProvider,
    pub db_name_map: &'a DbNameMap,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(schemas: &'a dyn SchemaProvider, db_name_map: &'a DbNameMap) -> Self {
        Self { sources: Vec::new(), schemas, db_name_map }
    }

    pub fn add_source(&mut self, source: SourceTable) {
        self.sources.push(source);
    }

    /// Database names written in a query may be physical attach names; resolution
    /// always reports the logical one.
    pub fn logical_database(&self, name: &str) -> String {
        match self.db_name_map.logical_of(name) {
            Some(logical) if !self.db_name_map.contains_logical(name) => logical.to_string(),
            _ => name.to_string(),
        }
    }

    /// Hides columns of the sources in `right` whose names already appear in
    /// `left` and are listed in `names` (all shared names for NATURAL joins).
    pub fn merge_join_columns(&mut self, left: std::ops::Range<usize>, right: std::ops::Range<usize>, names: Option<&[String]>) {
        let left_names: Vec<String> = self.sources[left]
            .iter()
            .flat_map(|s| s.visible_columns().map(|c| c.name.to_ascii_lowercase()))
            .collect();

        for source in &mut self.sources[right] {
            for column in &mut source.columns {
                let lower = column.name.to_ascii_lowercase();
                let listed = match names {
                    Some(names) => names.iter().any(|n| n.eq_ignore_ascii_case(&lower)),
                    None => true,
                };
                if listed && left_names.contains(&lower) {
                    column.hidden = true;
                }
            }
        }
    }
}
