use crate::parser::{
    ast::{Expr, Name, NodeId, Payload},
    ParseError, StatementParser,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ResultColumn {
    Star,
    TableStar(Name),
    Expr { expr: NodeId, alias: Option<Name> },
}

impl ResultColumn {
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            ResultColumn::Expr { expr, .. } => vec![*expr],
            _ => vec![],
        }
    }

    pub fn parse(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        let mark = parser.mark();

        if parser.eat_operator("*") {
            return Ok(parser.alloc(Payload::ResultColumn(ResultColumn::Star), mark));
        }

        if parser.is_name() && parser.is_operator_at(1, ".") && parser.is_operator_at(2, "*") {
            let table = parser.parse_name()?;
            parser.position += 2;
            return Ok(parser.alloc(Payload::ResultColumn(ResultColumn::TableStar(table)), mark));
        }

        let expr = Expr::parse(parser)?;
        let alias = parser.parse_alias()?;
        Ok(parser.alloc(Payload::ResultColumn(ResultColumn::Expr { expr, alias }), mark))
    }
}
