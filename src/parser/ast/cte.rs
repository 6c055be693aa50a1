use crate::parser::{
    ast::{Name, NodeId, Payload, Select},
    ParseError, StatementParser,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Cte {
    pub name: Name,
    pub columns: Vec<Name>,
    /// `Some(true)` for `MATERIALIZED`, `Some(false)` for `NOT MATERIALIZED`.
    pub materialized: Option<bool>,
    pub select: NodeId,
}

impl Cte {
    pub fn parse(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        let mark = parser.mark();
        let name = parser.parse_name()?;

        let mut columns = Vec::new();
        if parser.is_par_left() {
            parser.next();
            columns = parser.comma_separated(|p| p.parse_name())?;
            parser.expect_par_right()?;
        }

        parser.expect_keyword("AS")?;
        let materialized = if parser.is_keyword("NOT") && parser.is_keyword_at(1, "MATERIALIZED") {
            parser.position += 2;
            Some(false)
        } else if parser.eat_keyword("MATERIALIZED") {
            Some(true)
        } else {
            None
        };

        parser.expect_par_left()?;
        let select = Select::parse(parser)?;
        parser.expect_par_right()?;

        Ok(parser.alloc(Payload::Cte(Cte { name, columns, materialized, select }), mark))
    }
}
