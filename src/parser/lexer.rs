use crate::parser::{
    tokens::{is_keyword, Token, TokenKind, TokenList},
    CharCursor,
};

/// SQLite tokenizer. Whitespace and comments are kept as tokens so that
/// `detokenize(tokenize(sql)) == sql` holds for any input.
pub struct Lexer {
    cursor: CharCursor,
}

impl Lexer {
    pub fn new(sql: &str) -> Self {
        Self { cursor: CharCursor::new(sql) }
    }

    pub fn tokenize(sql: &str) -> TokenList {
        let mut lexer = Lexer::new(sql);
        let mut tokens = TokenList::new();
        while let Some(token) = lexer.next_token() {
            tokens.push(token);
        }
        tokens
    }

    pub fn is_identifier_start(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_' || (!ch.is_ascii() && ch.is_alphanumeric())
    }

    pub fn is_identifier_char(ch: char) -> bool {
        Self::is_identifier_start(ch) || ch.is_ascii_digit() || ch == '$'
    }

    fn next_token(&mut self) -> Option<Token> {
        if self.cursor.eof() {
            return None;
        }

        let pivot = self.cursor.position;
        let current = self.cursor.current();
        let next = self.cursor.peek(1);

        let kind = match current {
            c if c.is_whitespace() => {
                self.cursor.next_while(char::is_whitespace);
                TokenKind::Space
            }
            '-' if next == '-' => {
                self.cursor.next_while(|c| c != '\n');
                TokenKind::Comment
            }
            '/' if next == '*' => self.block_comment(),
            '\'' => self.quoted('\'', '\'', TokenKind::String),
            '"' => self.quoted('"', '"', TokenKind::Other),
            '`' => self.quoted('`', '`', TokenKind::Other),
            '[' => self.quoted('[', ']', TokenKind::Other),
            'x' | 'X' if next == '\'' => {
                self.cursor.next();
                self.quoted('\'', '\'', TokenKind::Blob)
            }
            c if c.is_ascii_digit() => self.number(),
            '.' if next.is_ascii_digit() => self.number(),
            c if Self::is_identifier_start(c) => {
                self.cursor.next_while(Self::is_identifier_char);
                match is_keyword(&self.cursor.text_from_pivot(pivot)) {
                    true => TokenKind::Keyword,
                    false => TokenKind::Other,
                }
            }
            '?' => {
                self.cursor.next();
                self.cursor.next_while(|c| c.is_ascii_digit());
                TokenKind::BindParam
            }
            ':' | '@' | '$' if Self::is_identifier_char(next) => {
                self.cursor.next();
                self.cursor.next_while(Self::is_identifier_char);
                TokenKind::BindParam
            }
            '(' => {
                self.cursor.next();
                TokenKind::ParLeft
            }
            ')' => {
                self.cursor.next();
                TokenKind::ParRight
            }
            _ => self.operator(),
        };

        Some(Token::at(kind, self.cursor.text_from_pivot(pivot), pivot))
    }

    fn block_comment(&mut self) -> TokenKind {
        self.cursor.jump(2);
        while !self.cursor.eof() && !(self.cursor.current() == '*' && self.cursor.peek(1) == '/') {
            self.cursor.next();
        }
        self.cursor.jump(2);
        TokenKind::Comment
    }

    /// Consumes a delimited token. A doubled closing delimiter is an escape,
    /// except for brackets which cannot be escaped.
    fn quoted(&mut self, open: char, close: char, kind: TokenKind) -> TokenKind {
        debug_assert_eq!(self.cursor.current(), open);
        self.cursor.next();
        loop {
            if self.cursor.eof() {
                return TokenKind::Invalid;
            }
            if self.cursor.current() == close {
                if open != '[' && self.cursor.peek(1) == close {
                    self.cursor.jump(2);
                    continue;
                }
                self.cursor.next();
                return kind;
            }
            self.cursor.next();
        }
    }

    fn number(&mut self) -> TokenKind {
        if self.cursor.current() == '0' && matches!(self.cursor.peek(1), 'x' | 'X') && self.cursor.peek(2).is_ascii_hexdigit() {
            self.cursor.jump(2);
            self.cursor.next_while(|c| c.is_ascii_hexdigit());
            return TokenKind::Integer;
        }

        let mut kind = TokenKind::Integer;
        self.cursor.next_while(|c| c.is_ascii_digit());
        if self.cursor.current() == '.' {
            kind = TokenKind::Float;
            self.cursor.next();
            self.cursor.next_while(|c| c.is_ascii_digit());
        }
        if matches!(self.cursor.current(), 'e' | 'E') {
            let sign = matches!(self.cursor.peek(1), '+' | '-');
            let digit_at = if sign { 2 } else { 1 };
            if self.cursor.peek(digit_at).is_ascii_digit() {
                kind = TokenKind::Float;
                self.cursor.jump(digit_at);
                self.cursor.next_while(|c| c.is_ascii_digit());
            }
        }
        if Self::is_identifier_start(self.cursor.current()) {
            // "12abc" is not a number
            self.cursor.next_while(Self::is_identifier_char);
            return TokenKind::Invalid;
        }
        kind
    }

    fn operator(&mut self) -> TokenKind {
        const OPERATORS: [&str; 22] = [
            "->>", "||", "->", "<<", ">>", "<=", ">=", "<>", "==", "!=", "=", "<", ">", "+", "-", "*", "/", "%", "&", "|", "~", ",",
        ];
        for op in OPERATORS {
            let matches = op.chars().enumerate().all(|(i, c)| self.cursor.peek(i) == c);
            if matches {
                self.cursor.jump(op.chars().count());
                return TokenKind::Operator;
            }
        }

        let kind = match self.cursor.current() {
            '.' | ';' => TokenKind::Operator,
            _ => TokenKind::Invalid,
        };
        self.cursor.next();
        kind
    }
}
