use crate::parser::{
    ast::{Expr, Name, NodeId, Payload, ResultColumn, Source},
    tokens::Token,
    ParseError, StatementParser,
};

#[derive(Debug, Clone, PartialEq)]
pub struct WindowDefinition {
    pub name: Name,
    pub tokens: Vec<Token>,
}

/// One `SELECT ... FROM ... WHERE ...` unit, or a `VALUES` list when `values` is not empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectCore {
    pub distinct: bool,
    pub all: bool,
    pub result_columns: Vec<NodeId>,
    pub from: Option<NodeId>,
    pub where_clause: Option<NodeId>,
    pub group_by: Vec<NodeId>,
    pub having: Option<NodeId>,
    pub windows: Vec<WindowDefinition>,
    pub values: Vec<Vec<NodeId>>,
}

impl SelectCore {
    pub fn children(&self) -> Vec<NodeId> {
        let mut children = self.result_columns.clone();
        children.extend(self.from);
        children.extend(self.where_clause);
        children.extend(self.group_by.iter().copied());
        children.extend(self.having);
        for row in &self.values {
            children.extend(row.iter().copied());
        }
        children
    }

    pub fn is_values(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn parse(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        let mark = parser.mark();

        if parser.eat_keyword("VALUES") {
            let values = parser.comma_separated(|p| {
                p.expect_par_left()?;
                let row = p.comma_separated(Expr::parse)?;
                p.expect_par_right()?;
                Ok(row)
            })?;
            return Ok(parser.alloc(Payload::Core(SelectCore { values, ..Default::default() }), mark));
        }

        parser.expect_keyword("SELECT")?;
        let distinct = parser.eat_keyword("DISTINCT");
        let all = !distinct && parser.eat_keyword("ALL");
        let result_columns = parser.comma_separated(ResultColumn::parse)?;

        let from = match parser.eat_keyword("FROM") {
            true => Some(Source::parse_join(parser)?),
            false => None,
        };

        let where_clause = match parser.eat_keyword("WHERE") {
            true => Some(Expr::parse(parser)?),
            false => None,
        };

        let mut group_by = Vec::new();
        if parser.eat_keyword("GROUP") {
            parser.expect_keyword("BY")?;
            group_by = parser.comma_separated(Expr::parse)?;
        }

        let having = match parser.eat_keyword("HAVING") {
            true => Some(Expr::parse(parser)?),
            false => None,
        };

        let mut windows = Vec::new();
        if parser.eat_keyword("WINDOW") {
            windows = parser.comma_separated(|p| {
                let name = p.parse_name()?;
                p.expect_keyword("AS")?;
                Ok(WindowDefinition { name, tokens: p.raw_parenthesized()? })
            })?;
        }

        let core = SelectCore { distinct, all, result_columns, from, where_clause, group_by, having, windows, values: vec![] };
        Ok(parser.alloc(Payload::Core(core), mark))
    }
}
