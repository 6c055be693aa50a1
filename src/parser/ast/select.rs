use crate::parser::{
    ast::{Cte, Expr, NodeId, OrderingTerm, Payload, SelectCore},
    ParseError, StatementParser,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundOperator {
    Union,
    UnionAll,
    Intersect,
    Except,
}

impl CompoundOperator {
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            CompoundOperator::Union => &["UNION"],
            CompoundOperator::UnionAll => &["UNION", "ALL"],
            CompoundOperator::Intersect => &["INTERSECT"],
            CompoundOperator::Except => &["EXCEPT"],
        }
    }

    fn parse(parser: &mut StatementParser) -> Option<CompoundOperator> {
        if parser.eat_keyword("UNION") {
            return match parser.eat_keyword("ALL") {
                true => Some(CompoundOperator::UnionAll),
                false => Some(CompoundOperator::Union),
            };
        }
        if parser.eat_keyword("INTERSECT") {
            return Some(CompoundOperator::Intersect);
        }
        if parser.eat_keyword("EXCEPT") {
            return Some(CompoundOperator::Except);
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct With {
    pub recursive: bool,
    pub ctes: Vec<NodeId>,
}

/// `LIMIT a, b` is stored as `LIMIT b OFFSET a`.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    pub limit: NodeId,
    pub offset: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub with: Option<With>,
    pub cores: Vec<NodeId>,
    /// `compound_ops[i]` joins `cores[i]` and `cores[i + 1]`.
    pub compound_ops: Vec<CompoundOperator>,
    pub order_by: Vec<NodeId>,
    pub limit: Option<Limit>,
}

impl Select {
    pub fn children(&self) -> Vec<NodeId> {
        let mut children = Vec::new();
        if let Some(with) = &self.with {
            children.extend(with.ctes.iter().copied());
        }
        children.extend(self.cores.iter().copied());
        children.extend(self.order_by.iter().copied());
        if let Some(limit) = &self.limit {
            children.push(limit.limit);
            children.extend(limit.offset);
        }
        children
    }

    pub fn is_compound(&self) -> bool {
        self.cores.len() > 1
    }

    pub fn parse(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        parser.nested(Self::parse_select)
    }

    fn parse_select(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        let mark = parser.mark();

        let with = match parser.eat_keyword("WITH") {
            true => {
                let recursive = parser.eat_keyword("RECURSIVE");
                let ctes = parser.comma_separated(Cte::parse)?;
                Some(With { recursive, ctes })
            }
            false => None,
        };

        let mut cores = vec![SelectCore::parse(parser)?];
        let mut compound_ops = Vec::new();
        while let Some(op) = CompoundOperator::parse(parser) {
            compound_ops.push(op);
            cores.push(SelectCore::parse(parser)?);
        }

        let mut order_by = Vec::new();
        if parser.eat_keyword("ORDER") {
            parser.expect_keyword("BY")?;
            order_by = parser.comma_separated(OrderingTerm::parse)?;
        }

        let mut limit = None;
        if parser.eat_keyword("LIMIT") {
            let first = Expr::parse(parser)?;
            limit = Some(if parser.eat_keyword("OFFSET") {
                Limit { limit: first, offset: Some(Expr::parse(parser)?) }
            } else if parser.eat_operator(",") {
                Limit { limit: Expr::parse(parser)?, offset: Some(first) }
            } else {
                Limit { limit: first, offset: None }
            });
        }

        Ok(parser.alloc(Payload::Select(Select { with, cores, compound_ops, order_by, limit }), mark))
    }
}
