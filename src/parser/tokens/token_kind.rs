#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    /// Identifiers, quoted or bare.
    Other,
    String,
    Integer,
    Float,
    Blob,
    BindParam,
    /// Operators and the `,` `.` `;` punctuation.
    Operator,
    ParLeft,
    ParRight,
    Space,
    Comment,
    Invalid,
}

impl TokenKind {
    pub fn is_whitespace(&self) -> bool {
        matches!(self, TokenKind::Space | TokenKind::Comment)
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, TokenKind::String | TokenKind::Integer | TokenKind::Float | TokenKind::Blob)
    }
}
