use std::fmt::Formatter;

/// 1-based source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub struct Line(pub usize);

impl Default for Line {
    fn default() -> Self {
        Line(1)
    }
}

/// A scanning position inside a source string.
///
/// Keeps two byte offsets: `start` marks the beginning of the lexeme currently
/// being scanned and `current` the next character to consume. The line counter
/// is bumped whenever a `'\n'` is consumed, no matter whether it sits between
/// tokens or inside a string or comment.
#[derive(Clone, PartialEq)]
pub struct Cursor<'a> {
    source: &'a str,
    start: usize,
    current: usize,
    line: Line,
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // The source is usually too verbose, so only print it on {:#?}
        if f.alternate() {
            f.debug_struct("Cursor")
                .field("line", &self.line)
                .field("start", &self.start)
                .field("current", &self.current)
                .field("source", &self.source)
                .finish()
        } else {
            f.debug_struct("Cursor")
                .field("line", &self.line)
                .field("start", &self.start)
                .field("current", &self.current)
                .finish()
        }
    }
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, start: 0, current: 0, line: Line::default() }
    }

    pub fn line(&self) -> Line {
        self.line
    }

    pub fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn rest(&self) -> &'a str {
        &self.source[self.current..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn peek_next(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    /// Consumes the next character if it equals `expected`.
    pub fn advance_if(&mut self, expected: char) -> bool {
        match self.peek() {
            Some(c) if c == expected => {
                self.next();
                true
            }
            _ => false,
        }
    }

    /// Consumes characters as long as `predicate` holds, stopping before the
    /// first one that doesn't (or at the end of the source).
    pub fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.next();
        }
    }

    /// Starts a new lexeme at the current position.
    pub fn mark_start(&mut self) {
        self.start = self.current;
    }

    /// Source text between the last `mark_start` and the current position.
    pub fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.current]
    }
}

impl<'a> From<&'a str> for Cursor<'a> {
    fn from(source: &'a str) -> Self {
        Self::new(source)
    }
}

impl Iterator for Cursor<'_> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.peek()?;
        self.current += c.len_utf8();
        if c == '\n' {
            self.line.0 += 1;
        }
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexeme() {
        let mut cursor: Cursor = "ab\ncd\n\n".into();

        cursor.next(); // 'a'
        cursor.mark_start();

        cursor.next(); // 'b'
        cursor.next(); // '\n'
        cursor.next(); // 'c'

        assert_eq!(cursor.lexeme(), "b\nc");
        assert_eq!(cursor.line(), Line(2));
    }

    #[test]
    fn peek_and_lines() {
        let mut cursor = Cursor::new("ab\ncd\n\n");

        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek_next(), Some('b'));
        assert_eq!(cursor.next(), Some('a'));
        assert_eq!(cursor.line(), Line(1));

        assert_eq!(cursor.next(), Some('b'));
        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!(cursor.line(), Line(2));

        cursor.next(); // 'c'
        cursor.next(); // 'd'

        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!(cursor.line(), Line(4));

        assert!(cursor.is_at_end());
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.line(), Line(4));

        cursor = "".into();
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.peek_next(), None);
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.line(), Line(1));
    }

    #[test]
    fn advance_helpers() {
        let mut cursor = Cursor::new("123.5+");

        cursor.advance_while(|c| c.is_ascii_digit());
        assert_eq!(cursor.lexeme(), "123");

        assert!(!cursor.advance_if('+'));
        assert!(cursor.advance_if('.'));
        cursor.advance_while(|c| c.is_ascii_digit());
        assert_eq!(cursor.lexeme(), "123.5");
        assert_eq!(cursor.peek(), Some('+'));
    }

    #[test]
    fn multibyte_characters() {
        let mut cursor = Cursor::new("\"héllo\"");

        cursor.next();
        cursor.mark_start();
        cursor.advance_while(|c| c != '"');

        assert_eq!(cursor.lexeme(), "héllo");
        assert_eq!(cursor.peek(), Some('"'));
    }
}
