use crate::parser::{
    ast::{Name, NodeId, Payload, Select},
    tokens::{Token, TokenKind},
    Dialect, ParseError, StatementParser,
};

/// Literal values keep the token text they were written with.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Integer(String),
    Float(String),
    String(String),
    Blob(String),
    CurrentTime,
    CurrentDate,
    CurrentTimestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,
    Plus,
    BitNot,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    EqEq,
    NotEq,
    LtGt,
    Is,
    IsNot,
    IsDistinctFrom,
    IsNotDistinctFrom,
    Lt,
    LtEq,
    Gt,
    GtEq,
    BitAnd,
    BitOr,
    ShiftLeft,
    ShiftRight,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Concat,
    Arrow,
    LongArrow,
}

impl BinaryOp {
    pub fn text(&self) -> &'static str {
        match self {
            BinaryOp::Or => "OR",
            BinaryOp::And => "AND",
            BinaryOp::Eq => "=",
            BinaryOp::EqEq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::LtGt => "<>",
            BinaryOp::Is => "IS",
            BinaryOp::IsNot => "IS NOT",
            BinaryOp::IsDistinctFrom => "IS DISTINCT FROM",
            BinaryOp::IsNotDistinctFrom => "IS NOT DISTINCT FROM",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Concat => "||",
            BinaryOp::Arrow => "->",
            BinaryOp::LongArrow => "->>",
        }
    }

    pub fn is_keyword(&self) -> bool {
        self.text().starts_with(|c: char| c.is_ascii_alphabetic())
    }

    fn from_operator(text: &str) -> Option<BinaryOp> {
        let op = match text {
            "=" => BinaryOp::Eq,
            "==" => BinaryOp::EqEq,
            "!=" => BinaryOp::NotEq,
            "<>" => BinaryOp::LtGt,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::LtEq,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::GtEq,
            "&" => BinaryOp::BitAnd,
            "|" => BinaryOp::BitOr,
            "<<" => BinaryOp::ShiftLeft,
            ">>" => BinaryOp::ShiftRight,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Subtract,
            "*" => BinaryOp::Multiply,
            "/" => BinaryOp::Divide,
            "%" => BinaryOp::Modulo,
            "||" => BinaryOp::Concat,
            "->" => BinaryOp::Arrow,
            "->>" => BinaryOp::LongArrow,
            _ => return None,
        };
        Some(op)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOp {
    Like,
    Glob,
    Regexp,
    Match,
}

impl LikeOp {
    pub fn text(&self) -> &'static str {
        match self {
            LikeOp::Like => "LIKE",
            LikeOp::Glob => "GLOB",
            LikeOp::Regexp => "REGEXP",
            LikeOp::Match => "MATCH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullTest {
    IsNull,
    NotNull,
    NotSpaceNull,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Over {
    Name(Name),
    Definition(Vec<Token>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    BindParam(String),
    Column { database: Option<Name>, table: Option<Name>, column: Name },
    Unary { op: UnaryOp, expr: NodeId },
    Binary { left: NodeId, op: BinaryOp, right: NodeId },
    Like { expr: NodeId, op: LikeOp, negated: bool, pattern: NodeId, escape: Option<NodeId> },
    Between { expr: NodeId, negated: bool, low: NodeId, high: NodeId },
    InList { expr: NodeId, negated: bool, list: Vec<NodeId> },
    InSelect { expr: NodeId, negated: bool, select: NodeId },
    InTable { expr: NodeId, negated: bool, database: Option<Name>, table: Name },
    NullTest { expr: NodeId, test: NullTest },
    Exists(NodeId),
    SubSelect(NodeId),
    Case { operand: Option<NodeId>, branches: Vec<(NodeId, NodeId)>, else_expr: Option<NodeId> },
    Cast { expr: NodeId, type_name: Vec<Token> },
    Collate { expr: NodeId, collation: Name },
    Function {
        name: Name,
        distinct: bool,
        star: bool,
        args: Vec<NodeId>,
        filter: Option<NodeId>,
        over: Option<Over>,
    },
    Parenthesized(Vec<NodeId>),
    Raise(Vec<Token>),
}

impl Expr {
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Expr::Literal(_) | Expr::BindParam(_) | Expr::Column { .. } | Expr::Raise(_) => vec![],
            Expr::Unary { expr, .. } | Expr::NullTest { expr, .. } | Expr::Collate { expr, .. } => vec![*expr],
            Expr::Cast { expr, .. } | Expr::InTable { expr, .. } => vec![*expr],
            Expr::Binary { left, right, .. } => vec![*left, *right],
            Expr::Like { expr, pattern, escape, .. } => {
                let mut children = vec![*expr, *pattern];
                children.extend(escape);
                children
            }
            Expr::Between { expr, low, high, .. } => vec![*expr, *low, *high],
            Expr::InList { expr, list, .. } => std::iter::once(*expr).chain(list.iter().copied()).collect(),
            Expr::InSelect { expr, select, .. } => vec![*expr, *select],
            Expr::Exists(select) | Expr::SubSelect(select) => vec![*select],
            Expr::Case { operand, branches, else_expr } => {
                let mut children: Vec<NodeId> = operand.iter().copied().collect();
                for (when, then) in branches {
                    children.push(*when);
                    children.push(*then);
                }
                children.extend(else_expr);
                children
            }
            Expr::Function { args, filter, .. } => args.iter().copied().chain(filter.iter().copied()).collect(),
            Expr::Parenthesized(list) => list.clone(),
        }
    }

    pub fn parse(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        parser.nested(Self::parse_or)
    }

    fn binary(parser: &mut StatementParser, mark: usize, left: NodeId, op: BinaryOp, right: NodeId) -> NodeId {
        parser.alloc(Payload::Expr(Expr::Binary { left, op, right }), mark)
    }

    fn parse_or(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        let mark = parser.mark();
        let mut left = Self::parse_and(parser)?;
        while parser.eat_keyword("OR") {
            let right = Self::parse_and(parser)?;
            left = Self::binary(parser, mark, left, BinaryOp::Or, right);
        }
        Ok(left)
    }

    fn parse_and(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        let mark = parser.mark();
        let mut left = Self::parse_not(parser)?;
        while parser.eat_keyword("AND") {
            let right = Self::parse_not(parser)?;
            left = Self::binary(parser, mark, left, BinaryOp::And, right);
        }
        Ok(left)
    }

    fn parse_not(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        let mut marks = Vec::new();
        while parser.is_keyword("NOT") {
            marks.push(parser.mark());
            parser.next();
        }

        let mut expr = Self::parse_equality(parser)?;
        for mark in marks.into_iter().rev() {
            expr = parser.alloc(Payload::Expr(Expr::Unary { op: UnaryOp::Not, expr }), mark);
        }
        Ok(expr)
    }

    fn like_op(parser: &StatementParser, offset: usize) -> Option<LikeOp> {
        [("LIKE", LikeOp::Like), ("GLOB", LikeOp::Glob), ("REGEXP", LikeOp::Regexp), ("MATCH", LikeOp::Match)]
            .into_iter()
            .find(|(kw, _)| parser.is_keyword_at(offset, kw))
            .map(|(_, op)| op)
    }

    fn parse_equality(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        let mark = parser.mark();
        let mut left = Self::parse_comparison(parser)?;
        loop {
            if let Some(op) = ["=", "==", "!=", "<>"]
                .into_iter()
                .find(|op| parser.is_operator(op))
                .and_then(BinaryOp::from_operator)
            {
                parser.next();
                let right = Self::parse_comparison(parser)?;
                left = Self::binary(parser, mark, left, op, right);
                continue;
            }

            if parser.eat_keyword("IS") {
                let not = parser.eat_keyword("NOT");
                let op = if parser.eat_keyword("DISTINCT") {
                    parser.expect_keyword("FROM")?;
                    if not { BinaryOp::IsNotDistinctFrom } else { BinaryOp::IsDistinctFrom }
                } else if not {
                    BinaryOp::IsNot
                } else {
                    BinaryOp::Is
                };
                let right = Self::parse_comparison(parser)?;
                left = Self::binary(parser, mark, left, op, right);
                continue;
            }

            if parser.eat_keyword("ISNULL") {
                left = parser.alloc(Payload::Expr(Expr::NullTest { expr: left, test: NullTest::IsNull }), mark);
                continue;
            }
            if parser.eat_keyword("NOTNULL") {
                left = parser.alloc(Payload::Expr(Expr::NullTest { expr: left, test: NullTest::NotNull }), mark);
                continue;
            }
            if parser.is_keyword("NOT") && parser.is_keyword_at(1, "NULL") {
                parser.position += 2;
                left = parser.alloc(Payload::Expr(Expr::NullTest { expr: left, test: NullTest::NotSpaceNull }), mark);
                continue;
            }

            let negated = parser.is_keyword("NOT");
            let offset = usize::from(negated);

            if let Some(op) = Self::like_op(parser, offset) {
                parser.position += offset + 1;
                let pattern = Self::parse_comparison(parser)?;
                let escape = match parser.eat_keyword("ESCAPE") {
                    true => Some(Self::parse_comparison(parser)?),
                    false => None,
                };
                left = parser.alloc(Payload::Expr(Expr::Like { expr: left, op, negated, pattern, escape }), mark);
                continue;
            }

            if parser.is_keyword_at(offset, "BETWEEN") {
                parser.position += offset + 1;
                let low = Self::parse_comparison(parser)?;
                parser.expect_keyword("AND")?;
                let high = Self::parse_comparison(parser)?;
                left = parser.alloc(Payload::Expr(Expr::Between { expr: left, negated, low, high }), mark);
                continue;
            }

            if parser.is_keyword_at(offset, "IN") {
                parser.position += offset + 1;
                left = Self::parse_in(parser, mark, left, negated)?;
                continue;
            }

            return Ok(left);
        }
    }

    fn parse_in(parser: &mut StatementParser, mark: usize, expr: NodeId, negated: bool) -> Result<NodeId, ParseError> {
        if parser.is_par_left() {
            parser.next();
            if parser.is_select_start() {
                let select = Select::parse(parser)?;
                parser.expect_par_right()?;
                return Ok(parser.alloc(Payload::Expr(Expr::InSelect { expr, negated, select }), mark));
            }
            let list = match parser.is_par_right() {
                true => vec![],
                false => parser.comma_separated(Self::parse)?,
            };
            parser.expect_par_right()?;
            return Ok(parser.alloc(Payload::Expr(Expr::InList { expr, negated, list }), mark));
        }

        let first = parser.parse_name()?;
        let (database, table) = match parser.eat_operator(".") {
            true => (Some(first), parser.parse_name()?),
            false => (None, first),
        };
        Ok(parser.alloc(Payload::Expr(Expr::InTable { expr, negated, database, table }), mark))
    }

    fn parse_binary_level(
        parser: &mut StatementParser,
        operators: &[&str],
        operand: fn(&mut StatementParser) -> Result<NodeId, ParseError>,
    ) -> Result<NodeId, ParseError> {
        let mark = parser.mark();
        let mut left = operand(parser)?;
        while let Some(op) = operators
            .iter()
            .find(|op| parser.is_operator(op))
            .and_then(|op| BinaryOp::from_operator(op))
        {
            parser.next();
            let right = operand(parser)?;
            left = Self::binary(parser, mark, left, op, right);
        }
        Ok(left)
    }

    fn parse_comparison(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        Self::parse_binary_level(parser, &["<", "<=", ">", ">="], Self::parse_bitwise)
    }

    fn parse_bitwise(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        Self::parse_binary_level(parser, &["&", "|", "<<", ">>"], Self::parse_additive)
    }

    fn parse_additive(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        Self::parse_binary_level(parser, &["+", "-"], Self::parse_multiplicative)
    }

    fn parse_multiplicative(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        Self::parse_binary_level(parser, &["*", "/", "%"], Self::parse_concat)
    }

    fn parse_concat(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        match parser.dialect {
            Dialect::Sqlite2 => Self::parse_binary_level(parser, &["||"], Self::parse_unary),
            Dialect::Sqlite3 => Self::parse_binary_level(parser, &["||", "->", "->>"], Self::parse_unary),
        }
    }

    fn parse_unary(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        let mut ops = Vec::new();
        loop {
            let op = match parser.current() {
                Some(t) if t.is_operator("-") => UnaryOp::Minus,
                Some(t) if t.is_operator("+") => UnaryOp::Plus,
                Some(t) if t.is_operator("~") => UnaryOp::BitNot,
                _ => break,
            };
            ops.push((parser.mark(), op));
            parser.next();
        }

        let mut expr = Self::parse_collate(parser)?;
        for (mark, op) in ops.into_iter().rev() {
            expr = parser.alloc(Payload::Expr(Expr::Unary { op, expr }), mark);
        }
        Ok(expr)
    }

    fn parse_collate(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        let mark = parser.mark();
        let mut expr = Self::parse_primary(parser)?;
        while parser.eat_keyword("COLLATE") {
            let collation = parser.parse_name()?;
            expr = parser.alloc(Payload::Expr(Expr::Collate { expr, collation }), mark);
        }
        Ok(expr)
    }

    fn parse_primary(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        let mark = parser.mark();
        let token = match parser.current() {
            Some(token) => token,
            None => return parser.error("Expected an expression").err(),
        };

        let literal = match token.kind {
            TokenKind::Integer => Some(Literal::Integer(token.text.clone())),
            TokenKind::Float => Some(Literal::Float(token.text.clone())),
            TokenKind::String => Some(Literal::String(token.text.clone())),
            TokenKind::Blob => Some(Literal::Blob(token.text.clone())),
            TokenKind::Keyword if token.is_keyword("NULL") => Some(Literal::Null),
            TokenKind::Keyword if token.is_keyword("CURRENT_TIME") => Some(Literal::CurrentTime),
            TokenKind::Keyword if token.is_keyword("CURRENT_DATE") => Some(Literal::CurrentDate),
            TokenKind::Keyword if token.is_keyword("CURRENT_TIMESTAMP") => Some(Literal::CurrentTimestamp),
            _ => None,
        };
        if let Some(literal) = literal {
            parser.next();
            return Ok(parser.alloc(Payload::Expr(Expr::Literal(literal)), mark));
        }

        if token.kind == TokenKind::BindParam {
            parser.next();
            return Ok(parser.alloc(Payload::Expr(Expr::BindParam(token.text.clone())), mark));
        }

        if token.kind == TokenKind::ParLeft {
            parser.next();
            if parser.is_select_start() {
                let select = Select::parse(parser)?;
                parser.expect_par_right()?;
                return Ok(parser.alloc(Payload::Expr(Expr::SubSelect(select)), mark));
            }
            let list = parser.comma_separated(Self::parse)?;
            parser.expect_par_right()?;
            return Ok(parser.alloc(Payload::Expr(Expr::Parenthesized(list)), mark));
        }

        if parser.eat_keyword("EXISTS") {
            parser.expect_par_left()?;
            let select = Select::parse(parser)?;
            parser.expect_par_right()?;
            return Ok(parser.alloc(Payload::Expr(Expr::Exists(select)), mark));
        }

        if parser.is_keyword("CASE") {
            return Self::parse_case(parser);
        }

        if parser.eat_keyword("CAST") {
            parser.expect_par_left()?;
            let expr = Self::parse(parser)?;
            parser.expect_keyword("AS")?;
            let mut type_name = Vec::new();
            let mut depth = 0usize;
            while let Some(token) = parser.current() {
                match token.kind {
                    TokenKind::ParRight if depth == 0 => break,
                    TokenKind::ParRight => depth -= 1,
                    TokenKind::ParLeft => depth += 1,
                    _ => {}
                }
                type_name.push(token.clone());
                parser.next();
            }
            parser.expect_par_right()?;
            return Ok(parser.alloc(Payload::Expr(Expr::Cast { expr, type_name }), mark));
        }

        if parser.is_keyword("RAISE") && parser.is_par_left_at(1) {
            parser.next();
            let raw = parser.raw_parenthesized()?;
            return Ok(parser.alloc(Payload::Expr(Expr::Raise(raw)), mark));
        }

        let callable = parser.is_name() || Self::like_op(parser, 0).is_some();
        if callable && parser.is_par_left_at(1) {
            return Self::parse_function(parser);
        }

        if parser.is_name() {
            return Self::parse_column(parser);
        }

        parser.error("Expected an expression").err()
    }

    fn parse_column(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        let mark = parser.mark();
        let mut parts = vec![parser.parse_name()?];
        while parts.len() < 3 && parser.is_operator(".") && parser.is_name_at(1) {
            parser.next();
            parts.push(parser.parse_name()?);
        }
        let column = parts.pop().ok_or_else(|| parser.error("Expected a column name"))?;
        let table = parts.pop();
        let database = parts.pop();
        Ok(parser.alloc(Payload::Expr(Expr::Column { database, table, column }), mark))
    }

    fn parse_function(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        let mark = parser.mark();
        let name = match parser.next() {
            Some(token) => Name::from_token(&token.text),
            None => return parser.error("Expected a function name").err(),
        };
        parser.expect_par_left()?;

        let distinct = parser.eat_keyword("DISTINCT");
        let mut star = false;
        let mut args = Vec::new();
        if parser.eat_operator("*") {
            star = true;
        } else if !parser.is_par_right() {
            args = parser.comma_separated(Self::parse)?;
        }
        parser.expect_par_right()?;

        let mut filter = None;
        let mut over = None;
        if parser.dialect == Dialect::Sqlite3 {
            if parser.is_keyword("FILTER") && parser.is_par_left_at(1) {
                parser.next();
                parser.expect_par_left()?;
                parser.expect_keyword("WHERE")?;
                filter = Some(Self::parse(parser)?);
                parser.expect_par_right()?;
            }
            if parser.eat_keyword("OVER") {
                over = Some(match parser.is_par_left() {
                    true => Over::Definition(parser.raw_parenthesized()?),
                    false => Over::Name(parser.parse_name()?),
                });
            }
        }

        Ok(parser.alloc(Payload::Expr(Expr::Function { name, distinct, star, args, filter, over }), mark))
    }

    fn parse_case(parser: &mut StatementParser) -> Result<NodeId, ParseError> {
        let mark = parser.mark();
        parser.expect_keyword("CASE")?;
        let operand = match parser.is_keyword("WHEN") {
            true => None,
            false => Some(Self::parse(parser)?),
        };

        let mut branches = Vec::new();
        while parser.eat_keyword("WHEN") {
            let when = Self::parse(parser)?;
            parser.expect_keyword("THEN")?;
            let then = Self::parse(parser)?;
            branches.push((when, then));
        }
        if branches.is_empty() {
            return parser.error("Expected WHEN").err();
        }

        let else_expr = match parser.eat_keyword("ELSE") {
            true => Some(Self::parse(parser)?),
            false => None,
        };
        parser.expect_keyword("END")?;

        Ok(parser.alloc(Payload::Expr(Expr::Case { operand, branches, else_expr }), mark))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{
        ast::{Arena, BinaryOp, Expr, Literal, NullTest, Over, UnaryOp},
        Dialect, Lexer, StatementParser,
    };

    fn parse(text: &str) -> (Arena, crate::parser::ast::NodeId) {
        let tokens = Lexer::tokenize(text);
        let mut arena = Arena::new();
        let root = {
            let mut parser = StatementParser::new(&tokens, &mut arena, Dialect::Sqlite3);
            let root = Expr::parse(&mut parser).expect("Failed to parse expression");
            assert!(parser.eof(), "trailing tokens in {}", text);
            root
        };
        (arena, root)
    }

    #[test]
    pub fn test_precedence_of_and_over_or() {
        let (arena, root) = parse("a = 1 OR b = 2 AND c");

        match arena.expr(root) {
            Some(Expr::Binary { op: BinaryOp::Or, right, .. }) => match arena.expr(*right) {
                Some(Expr::Binary { op: BinaryOp::And, .. }) => {}
                _ => panic!(),
            },
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_multiplication_binds_tighter() {
        let (arena, root) = parse("1 + 2 * 3");

        match arena.expr(root) {
            Some(Expr::Binary { op: BinaryOp::Add, left, right }) => {
                assert!(matches!(arena.expr(*left), Some(Expr::Literal(Literal::Integer(v))) if v == "1"));
                assert!(matches!(arena.expr(*right), Some(Expr::Binary { op: BinaryOp::Multiply, .. })));
            }
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_qualified_column() {
        let (arena, root) = parse("main.\"Users\".name");

        match arena.expr(root) {
            Some(Expr::Column { database, table, column }) => {
                assert_eq!(database.as_ref().map(|n| n.value.as_str()), Some("main"));
                assert_eq!(table.as_ref().map(|n| n.value.as_str()), Some("Users"));
                assert_eq!(column.value, "name");
            }
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_not_between_and_like_escape() {
        let (arena, root) = parse("a NOT BETWEEN 1 AND 5 AND b LIKE 'x%' ESCAPE '\\'");

        match arena.expr(root) {
            Some(Expr::Binary { op: BinaryOp::And, left, right }) => {
                assert!(matches!(arena.expr(*left), Some(Expr::Between { negated: true, .. })));
                assert!(matches!(arena.expr(*right), Some(Expr::Like { escape: Some(_), negated: false, .. })));
            }
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_in_forms() {
        let (arena, root) = parse("a IN (1, 2)");
        assert!(matches!(arena.expr(root), Some(Expr::InList { list, .. }) if list.len() == 2));

        let (arena, root) = parse("a NOT IN (SELECT b FROM t)");
        assert!(matches!(arena.expr(root), Some(Expr::InSelect { negated: true, .. })));

        let (arena, root) = parse("a IN aux.t");
        assert!(matches!(arena.expr(root), Some(Expr::InTable { database: Some(_), .. })));
    }

    #[test]
    pub fn test_null_tests_and_not() {
        let (arena, root) = parse("NOT a NOT NULL");

        match arena.expr(root) {
            Some(Expr::Unary { op: UnaryOp::Not, expr }) => {
                assert!(matches!(arena.expr(*expr), Some(Expr::NullTest { test: NullTest::NotSpaceNull, .. })));
            }
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_function_with_filter_and_window() {
        let (arena, root) = parse("count(DISTINCT a) FILTER (WHERE a > 1) OVER (PARTITION BY b)");

        match arena.expr(root) {
            Some(Expr::Function { name, distinct, filter, over, args, .. }) => {
                assert_eq!(name.value, "count");
                assert!(*distinct);
                assert_eq!(args.len(), 1);
                assert!(filter.is_some());
                assert!(matches!(over, Some(Over::Definition(tokens)) if tokens.len() == 3));
            }
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_star_function_case_and_cast() {
        let (arena, root) = parse("CASE WHEN count(*) > 0 THEN CAST(a AS VARCHAR(10)) ELSE NULL END");

        match arena.expr(root) {
            Some(Expr::Case { operand: None, branches, else_expr: Some(_) }) => {
                assert_eq!(branches.len(), 1);
                assert!(matches!(arena.expr(branches[0].1), Some(Expr::Cast { type_name, .. }) if type_name.len() == 4));
            }
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_collate_and_json_operators() {
        let (arena, root) = parse("a ->> '$.x' COLLATE NOCASE");

        match arena.expr(root) {
            Some(Expr::Binary { op: BinaryOp::LongArrow, right, .. }) => {
                assert!(matches!(arena.expr(*right), Some(Expr::Collate { .. })));
            }
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_node_ranges_and_parents() {
        let (arena, root) = parse("a + b");

        match arena.expr(root) {
            Some(Expr::Binary { left, right, .. }) => {
                assert_eq!(arena.get(root).tokens, 0..5);
                assert_eq!(arena.get(*right).tokens, 4..5);
                assert_eq!(arena.parent(*left), Some(root));
            }
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_missing_operand_fails() {
        let tokens = Lexer::tokenize("1 +");
        let mut arena = Arena::new();
        let mut parser = StatementParser::new(&tokens, &mut arena, Dialect::Sqlite3);

        let err = Expr::parse(&mut parser).expect_err("Parse should fail");

        assert_eq!(err.message, "Expected an expression");
        assert_eq!(err.start, 3);
    }

    #[test]
    pub fn test_prefix_operator_chains() {
        let (arena, root) = parse("- ~ + 1");
        match arena.expr(root) {
            Some(Expr::Unary { op: UnaryOp::Minus, expr }) => {
                assert_eq!(arena.get(root).tokens, 0..7);
                assert!(matches!(arena.expr(*expr), Some(Expr::Unary { op: UnaryOp::BitNot, .. })));
            }
            _ => panic!(),
        }

        let (arena, root) = parse("NOT NOT a");
        match arena.expr(root) {
            Some(Expr::Unary { op: UnaryOp::Not, expr }) => {
                assert!(matches!(arena.expr(*expr), Some(Expr::Unary { op: UnaryOp::Not, .. })));
                assert_eq!(arena.height(root), 3);
            }
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_long_chains_fail_cleanly() {
        for text in [
            format!("{}1", "- ".repeat(100_000)),
            format!("{}a", "NOT ".repeat(100_000)),
            format!("a{}", " + a".repeat(10_000)),
        ] {
            let tokens = Lexer::tokenize(&text);
            let mut arena = Arena::new();
            let mut parser = StatementParser::new(&tokens, &mut arena, Dialect::Sqlite3);

            let err = Expr::parse(&mut parser).expect_err("Parse should fail");

            assert_eq!(err.message, "Expression tree is too large (maximum depth 500)");
        }
    }

    #[test]
    pub fn test_deep_parentheses_fail_cleanly() {
        let text = format!("{}a{}", "(".repeat(5_000), ")".repeat(5_000));
        let tokens = Lexer::tokenize(&text);
        let mut arena = Arena::new();
        let mut parser = StatementParser::new(&tokens, &mut arena, Dialect::Sqlite3);

        let err = Expr::parse(&mut parser).expect_err("Parse should fail");

        assert_eq!(err.message, "parser stack overflow");
    }
}
