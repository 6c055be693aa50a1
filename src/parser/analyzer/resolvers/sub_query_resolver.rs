use std::collections::HashSet;

use crate::parser::analyzer::{ResolvedColumn, ResolverFlags, SourceColumn};

pub struct SubQueryResolver;

impl SubQueryResolver {
    /// Name SQLite gives a result column: its alias, else the column name, else
    /// the expression text.
    pub fn result_name(column: &ResolvedColumn) -> &str {
        column.alias.as_deref().unwrap_or(&column.column)
    }

    /// Turns the result columns of a sub-select or CTE into the columns the
    /// enclosing core sees. Duplicate names get `:1`, `:2`, ... appended; a column
    /// visible under another name than its raw column carries that name as alias.
    pub fn expose(columns: Vec<ResolvedColumn>, alias: Option<&str>, column_names: &[String]) -> Vec<SourceColumn> {
        let mut used = HashSet::new();
        columns
            .into_iter()
            .enumerate()
            .map(|(i, mut column)| {
                let base = column_names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| Self::result_name(&column).to_string());
                let mut name = base.clone();
                let mut counter = 0;
                while !used.insert(name.to_lowercase()) {
                    counter += 1;
                    name = format!("{}:{}", base, counter);
                }

                let renamed = !name.eq_ignore_ascii_case(&column.column)
                    || column.is_expression()
                    || column.alias.is_some()
                    || column.alias_defined_in_sub_query();
                if renamed {
                    column.alias = Some(name.clone());
                    column.sub_query_alias = Some(name.clone());
                    column.display_name = name.clone();
                }

                match alias {
                    Some(alias) => column.table_alias = Some(alias.to_string()),
                    None => column.flags |= ResolverFlags::FROM_ANONYMOUS_SELECT,
                }

                SourceColumn { name, resolved: column, hidden: false }
            })
            .collect()
    }
}
