use crate::parser::{
    ast::{Expr, Name, NodeId, Payload, Select},
    ParseError, StatementParser,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Plain,
    Inner,
    Cross,
    Left,
    LeftOuter,
    Right,
    RightOuter,
    Full,
    FullOuter,
}

impl JoinKind {
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            JoinKind::Plain => &[],
            JoinKind::Inner => &["INNER"],
            JoinKind::Cross => &["CROSS"],
            JoinKind::Left => &["LEFT"],
            JoinKind::LeftOuter => &["LEFT", "OUTER"],
            JoinKind::Right => &["RIGHT"],
            JoinKind::RightOuter => &["RIGHT", "OUTER"],
            JoinKind::Full => &["FULL"],
            JoinKind::FullOuter => &["FULL", "OUTER"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOperator {
    Comma,
    Join { natural: bool, kind: JoinKind },
}

impl JoinOperator {
    pub fn is_natural(&self) -> bool {
        matches!(self, JoinOperator::Join { natural: true, .. })
    }

    fn parse(parser: &mut StatementParser) -> Result<Option<JoinOperator>, ParseError> {
        if parser.eat_operator(",") {
            return Ok(Some(JoinOperator::Comma));
        }

        let start = parser.position;
        let natural = parser.eat_keyword("NATURAL");
        let kind = if parser.eat_keyword("INNER") {
            JoinKind::Inner
        } else if parser.eat_keyword("CROSS") {
            JoinKind::Cross
        } else if parser.eat_keyword("LEFT") {
            if parser.eat_keyword("OUTER") { JoinKind::LeftOuter } else { JoinKind::Left }
        } else if parser.eat_keyword("RIGHT") {
            if parser.eat_keyword("OUTER") { JoinKind::RightOuter } else { JoinKind::Right }
        } else if parser.eat_keyword("FULL") {
            if parser.eat_keyword("OUTER") { JoinKind::FullOuter } else { JoinKind::Full }
        } else {
            JoinKind::Plain
        };

        if parser.eat_keyword("JOIN") {
            return Ok(Some(JoinOperator::Join { natural, kind }));
        }
        if parser.position != start {
            return parser.error("Expected JOIN").err();
        }
        Ok(None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinConstraint {
    None,
    On(NodeId),
    Using(Vec<Name>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Indexed {
    By(Name),
    NotIndexed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Table { database: Option<Name>, name: Name, alias: Option<Name>, indexed: Option<Indexed> },
    SubSelect { select: NodeId, alias: Option<Name> },
    /// `ops[i]` and `constraints[i]` join `sources[i + 1]` to what precedes it.
    Join { sources: Vec<NodeId>, ops: Vec<JoinOperator>, constraints: Vec<JoinConstraint> },
    Nested(NodeId),
}

impl Source {
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Source::Table { .. } => vec![],
            Source::SubSelect { select, .. } => vec![*select],
            Source::Join { sources, constraints, .. } => {
                let mut children = sources.clone();
                for constraint in constraints {
                    if let JoinConstraint::On(expr) = constraint {
                        children.push(*expr);
                    }
                }
                children
            }
            Source::Nested(inner) => vec![*inner],
        }
    }

    /// Parses a FROM clause. A single source is returned as is, several become a `Join`.
    pub fn parse_join(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        parser.nested(Self::parse_join_list)
    }

    fn parse_join_list(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        let mark = parser.mark();
        let first = Self::parse_single(parser)?;

        let mut sources = vec![first];
        let mut ops = Vec::new();
        let mut constraints = Vec::new();
        while let Some(op) = JoinOperator::parse(parser)? {
            sources.push(Self::parse_single(parser)?);
            ops.push(op);
            constraints.push(Self::parse_constraint(parser)?);
        }

        if ops.is_empty() {
            return Ok(first);
        }
        Ok(parser.alloc(Payload::Source(Source::Join { sources, ops, constraints }), mark))
    }

    fn parse_constraint(parser: &mut StatementParser) -> Result<JoinConstraint, ParseError> {
        if parser.eat_keyword("ON") {
            return Ok(JoinConstraint::On(Expr::parse(parser)?));
        }
        if parser.eat_keyword("USING") {
            parser.expect_par_left()?;
            let names = parser.comma_separated(|p| p.parse_name())?;
            parser.expect_par_right()?;
            return Ok(JoinConstraint::Using(names));
        }
        Ok(JoinConstraint::None)
    }

    fn parse_single(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        let mark = parser.mark();

        if parser.is_par_left() {
            parser.next();
            if parser.is_select_start() {
                let select = Select::parse(parser)?;
                parser.expect_par_right()?;
                let alias = parser.parse_alias()?;
                return Ok(parser.alloc(Payload::Source(Source::SubSelect { select, alias }), mark));
            }
            let inner = Self::parse_join(parser)?;
            parser.expect_par_right()?;
            return Ok(parser.alloc(Payload::Source(Source::Nested(inner)), mark));
        }

        let first = parser.parse_name()?;
        let (database, name) = match parser.eat_operator(".") {
            true => (Some(first), parser.parse_name()?),
            false => (None, first),
        };

        if parser.is_par_left() {
            return parser.error("Table-valued functions are not supported").err();
        }

        let alias = parser.parse_alias()?;
        let indexed = if parser.eat_keyword("INDEXED") {
            parser.expect_keyword("BY")?;
            Some(Indexed::By(parser.parse_name()?))
        } else if parser.is_keyword("NOT") && parser.is_keyword_at(1, "INDEXED") {
            parser.position += 2;
            Some(Indexed::NotIndexed)
        } else {
            None
        };

        Ok(parser.alloc(Payload::Source(Source::Table { database, name, alias, indexed }), mark))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{
        ast::{Arena, Indexed, JoinConstraint, JoinKind, JoinOperator, Source},
        Dialect, Lexer, StatementParser,
    };

    #[test]
    pub fn test_join_chain() {
        let tokens = Lexer::tokenize(
            "main.users AS u NATURAL LEFT OUTER JOIN orders o, items i INNER JOIN tags USING (id) JOIN x ON x.a = i.a",
        );
        let mut arena = Arena::new();
        let mut parser = StatementParser::new(&tokens, &mut arena, Dialect::Sqlite3);

        let id = Source::parse_join(&mut parser).expect("Failed to parse FROM");
        assert!(parser.eof());

        match arena.source(id) {
            Some(Source::Join { sources, ops, constraints }) => {
                assert_eq!(sources.len(), 5);
                assert_eq!(ops[0], JoinOperator::Join { natural: true, kind: JoinKind::LeftOuter });
                assert_eq!(ops[1], JoinOperator::Comma);
                assert!(matches!(&constraints[2], JoinConstraint::Using(names) if names.len() == 1));
                assert!(matches!(constraints[3], JoinConstraint::On(_)));
                match arena.source(sources[0]) {
                    Some(Source::Table { database: Some(db), alias: Some(alias), .. }) => {
                        assert_eq!(db.value, "main");
                        assert_eq!(alias.value, "u");
                    }
                    _ => panic!(),
                }
            }
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_sub_select_and_nested() {
        let tokens = Lexer::tokenize("(SELECT 1) s, (a JOIN b) , c NOT INDEXED");
        let mut arena = Arena::new();
        let mut parser = StatementParser::new(&tokens, &mut arena, Dialect::Sqlite3);

        let id = Source::parse_join(&mut parser).expect("Failed to parse FROM");

        match arena.source(id) {
            Some(Source::Join { sources, .. }) => {
                assert!(matches!(arena.source(sources[0]), Some(Source::SubSelect { alias: Some(_), .. })));
                assert!(matches!(arena.source(sources[1]), Some(Source::Nested(_))));
                assert!(matches!(arena.source(sources[2]), Some(Source::Table { indexed: Some(Indexed::NotIndexed), .. })));
            }
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_table_valued_function_rejected() {
        let tokens = Lexer::tokenize("json_each('[1]')");
        let mut arena = Arena::new();
        let mut parser = StatementParser::new(&tokens, &mut arena, Dialect::Sqlite3);

        let err = Source::parse_join(&mut parser).expect_err("Parse should fail");

        assert_eq!(err.message, "Table-valued functions are not supported");
    }

    #[test]
    pub fn test_deeply_nested_joins_fail_cleanly() {
        let text = format!("{}t{}", "(".repeat(1_000), ")".repeat(1_000));
        let tokens = Lexer::tokenize(&text);
        let mut arena = Arena::new();
        let mut parser = StatementParser::new(&tokens, &mut arena, Dialect::Sqlite3);

        let err = Source::parse_join(&mut parser).expect_err("Parse should fail");

        assert_eq!(err.message, "parser stack overflow");
    }
}
