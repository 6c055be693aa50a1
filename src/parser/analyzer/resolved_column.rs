bitflags::bitflags! {
    /// Restrictions inherited from the SELECT a column was resolved in.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct ResolverFlags: u8 {
        const FROM_COMPOUND_SELECT = 1;
        const FROM_GROUPED_SELECT = 2;
        const FROM_DISTINCT_SELECT = 4;
        const FROM_ANONYMOUS_SELECT = 8;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Expression,
    TableColumn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub kind: ColumnKind,
    pub display_name: String,
    /// Column name for table columns, original text for expressions.
    pub column: String,
    pub alias: Option<String>,
    pub table: Option<String>,
    pub table_alias: Option<String>,
    pub database: Option<String>,
    pub flags: ResolverFlags,
    /// Name the value is visible under when it comes out of a sub-query.
    pub sub_query_alias: Option<String>,
}

impl ResolvedColumn {
    pub fn table_column(column: &str, table: &str, table_alias: Option<&str>, database: Option<&str>) -> Self {
        Self {
            kind: ColumnKind::TableColumn,
            display_name: column.to_string(),
            column: column.to_string(),
            alias: None,
            table: Some(table.to_string()),
            table_alias: table_alias.map(str::to_string),
            database: database.map(str::to_string),
            flags: ResolverFlags::empty(),
            sub_query_alias: None,
        }
    }

    pub fn expression(text: &str, alias: Option<&str>) -> Self {
        Self {
            kind: ColumnKind::Expression,
            display_name: alias.unwrap_or(text).to_string(),
            column: text.to_string(),
            alias: alias.map(str::to_string),
            table: None,
            table_alias: None,
            database: None,
            flags: ResolverFlags::empty(),
            sub_query_alias: None,
        }
    }

    pub fn with_alias(mut self, alias: Option<&str>) -> Self {
        if let Some(alias) = alias {
            self.alias = Some(alias.to_string());
            self.display_name = alias.to_string();
        }
        self
    }

    pub fn is_expression(&self) -> bool {
        self.kind == ColumnKind::Expression
    }

    pub fn alias_defined_in_sub_query(&self) -> bool {
        self.sub_query_alias.is_some()
    }
}
