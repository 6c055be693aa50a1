/// Character level cursor over the SQL text, driven by the [`Lexer`](crate::parser::Lexer).
///
/// Positions are character offsets, not byte offsets, so error positions line up with
/// what an editor shows for non-ASCII input.
#[derive(Debug, Default)]
pub struct CharCursor {
    pub position: usize,
    pub length: usize,
    pub text_v: Vec<char>,
}

impl CharCursor {
    pub fn new(text: &str) -> Self {
        let text_v: Vec<char> = text.chars().collect();
        Self {
            position: 0,
            length: text_v.len(),
            text_v,
        }
    }

    pub fn eof(&self) -> bool {
        self.position >= self.length
    }

    pub fn current(&self) -> char {
        self.peek(0)
    }

    pub fn peek(&self, ahead: usize) -> char {
        self.text_v.get(self.position + ahead).copied().unwrap_or('\0')
    }

    pub fn next(&mut self) {
        if self.position < self.length {
            self.position += 1;
        }
    }

    pub fn jump(&mut self, ahead: usize) {
        self.position = (self.position + ahead).min(self.length);
    }

    pub fn next_while(&mut self, predicate: impl Fn(char) -> bool) {
        while !self.eof() && predicate(self.current()) {
            self.next();
        }
    }

    pub fn text_from_range(&self, start: usize, end: usize) -> String {
        let end = end.min(self.length);
        let start = start.min(end);
        self.text_v[start..end].iter().collect()
    }

    pub fn text_from_pivot(&self, pivot: usize) -> String {
        self.text_from_range(pivot, self.position)
    }
}
