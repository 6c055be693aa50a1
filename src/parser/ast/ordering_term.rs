use crate::parser::{
    ast::{Expr, NodeId, Payload},
    ParseError, StatementParser,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderingTerm {
    pub expr: NodeId,
    pub order: Option<SortOrder>,
    pub nulls: Option<NullsOrder>,
}

impl OrderingTerm {
    pub fn parse(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        let mark = parser.mark();
        let expr = Expr::parse(parser)?;

        let order = if parser.eat_keyword("ASC") {
            Some(SortOrder::Asc)
        } else if parser.eat_keyword("DESC") {
            Some(SortOrder::Desc)
        } else {
            None
        };

        let mut nulls = None;
        if parser.eat_keyword("NULLS") {
            nulls = Some(if parser.eat_keyword("FIRST") {
                NullsOrder::First
            } else {
                parser.expect_keyword("LAST")?;
                NullsOrder::Last
            });
        }

        Ok(parser.alloc(Payload::OrderingTerm(OrderingTerm { expr, order, nulls }), mark))
    }
}
