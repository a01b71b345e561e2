use cursor::Cursor;
use diagnostics::Diagnostics;
use value::Value;

mod token;
pub use token::{Token, TokenType};
use TokenType::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanErrorType {
    #[error("Unexpected character.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Invalid number literal '{0}'.")]
    InvalidNumber(String),
}

type Result<T> = std::result::Result<T, ScanErrorType>;

/// Scans `source` into tokens, reporting lexical errors to `diagnostics`.
///
/// Scanning never stops early: after an error the scanner moves on to the next
/// character, so the returned tokens always end with exactly one `Eof`.
pub fn lex<'a>(source: &'a str, diagnostics: &mut Diagnostics) -> Vec<Token<'a>> {
    Scanner::new(source).scan_tokens(diagnostics)
}

pub struct Scanner<'a> {
    cursor: Cursor<'a>,
    tokens: Vec<Token<'a>>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source), tokens: Vec::new() }
    }

    pub fn scan_tokens(mut self, diagnostics: &mut Diagnostics) -> Vec<Token<'a>> {
        while !self.cursor.is_at_end() {
            self.cursor.mark_start();
            if let Err(e) = self.scan_token() {
                diagnostics.error(self.cursor.line(), e);
            }
        }

        self.tokens.push(Token::eof(self.cursor.line()));
        self.tokens
    }

    fn scan_token(&mut self) -> Result<()> {
        let Some(c) = self.cursor.next() else {
            return Ok(());
        };

        match c {
            '(' => self.add_token(LeftParen),
            ')' => self.add_token(RightParen),
            '{' => self.add_token(LeftBrace),
            '}' => self.add_token(RightBrace),
            ',' => self.add_token(Comma),
            '.' => self.add_token(Dot),
            '-' => self.add_token(Minus),
            '+' => self.add_token(Plus),
            ';' => self.add_token(Semicolon),
            '*' => self.add_token(Star),

            '!' => self.add_token_if_matches('=', BangEqual, Bang),
            '=' => self.add_token_if_matches('=', EqualEqual, Equal),
            '<' => self.add_token_if_matches('=', LessEqual, Less),
            '>' => self.add_token_if_matches('=', GreaterEqual, Greater),

            '/' => {
                if self.cursor.advance_if('/') {
                    // Comment, the newline is left for the main loop
                    self.cursor.advance_while(|c| c != '\n');
                } else {
                    self.add_token(Slash)
                }
            }

            ' ' | '\r' | '\t' | '\n' => (),

            '"' => return self.string(),
            d if d.is_ascii_digit() => return self.number(),
            a if a.is_ascii_alphabetic() => self.identifier(),

            c => return Err(ScanErrorType::UnexpectedCharacter(c)),
        }
        Ok(())
    }

    fn add_token(&mut self, kind: TokenType) {
        self.push_token(kind, None)
    }

    fn add_token_if_matches(&mut self, next: char, matched: TokenType, unmatched: TokenType) {
        if self.cursor.advance_if(next) {
            self.add_token(matched)
        } else {
            self.add_token(unmatched)
        }
    }

    fn push_token(&mut self, kind: TokenType, literal: Option<Value>) {
        let token = Token::new(kind, self.cursor.lexeme(), literal, self.cursor.line());
        log::trace!("Scanned {:?}", token);
        self.tokens.push(token);
    }

    fn string(&mut self) -> Result<()> {
        self.cursor.advance_while(|c| c != '"');
        if !self.cursor.advance_if('"') {
            return Err(ScanErrorType::UnterminatedString);
        }

        let lexeme = self.cursor.lexeme();
        let contents = &lexeme[1..lexeme.len() - 1];
        self.push_token(Str, Some(contents.into()));
        Ok(())
    }

    fn number(&mut self) -> Result<()> {
        self.cursor.advance_while(|c| c.is_ascii_digit());

        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.next(); // '.'
            self.cursor.advance_while(|c| c.is_ascii_digit());
        }

        let lexeme = self.cursor.lexeme();
        let n: f64 =
            lexeme.parse().map_err(|_| ScanErrorType::InvalidNumber(lexeme.to_string()))?;
        self.push_token(Number, Some(n.into()));
        Ok(())
    }

    fn identifier(&mut self) {
        self.cursor.advance_while(|c| c.is_ascii_alphabetic());
        let kind = TokenType::keyword(self.cursor.lexeme()).unwrap_or(Identifier);
        self.add_token(kind)
    }
}

#[cfg(test)]
mod tests {
    use cursor::Line;
    use diagnostics::{Diagnostic, Location};
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;

    fn token(kind: TokenType, lexeme: &str, line: usize) -> Token<'_> {
        Token::new(kind, lexeme, None, Line(line))
    }

    fn scan(source: &str) -> (Vec<Token<'_>>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let tokens = lex(source, &mut diagnostics);
        (tokens, diagnostics)
    }

    fn scan_ok(source: &str) -> Vec<Token<'_>> {
        let (tokens, diagnostics) = scan(source);
        assert!(diagnostics.is_empty(), "{}", diagnostics);
        tokens
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenType> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn string_literals() {
        assert_eq!(
            scan_ok("\"hello world\""),
            vec![
                Token::new(Str, "\"hello world\"", Some("hello world".into()), Line(1)),
                Token::eof(Line(1)),
            ]
        );

        assert_eq!(
            scan_ok("\"a\nb\" c"),
            vec![
                Token::new(Str, "\"a\nb\"", Some("a\nb".into()), Line(2)),
                token(Identifier, "c", 2),
                Token::eof(Line(2)),
            ]
        );
    }

    #[test]
    fn unterminated_string() {
        let (tokens, diagnostics) = scan("\"abc");
        assert_eq!(tokens, vec![Token::eof(Line(1))]);
        assert_eq!(
            diagnostics.to_vec(),
            vec![Diagnostic::Static {
                line: Line(1),
                location: Location::Nowhere,
                message: "Unterminated string.".to_string(),
            }]
        );

        let (tokens, diagnostics) = scan("1 + \"hello\nworld");
        assert_eq!(kinds(&tokens), vec![Number, Plus, Eof]);
        assert_eq!(diagnostics.to_string(), "[line 2] Error: Unterminated string.");
    }

    #[test]
    fn two_char_tokens() {
        assert_eq!(
            scan_ok("! != = == < <= > >="),
            vec![
                token(Bang, "!", 1),
                token(BangEqual, "!=", 1),
                token(Equal, "=", 1),
                token(EqualEqual, "==", 1),
                token(Less, "<", 1),
                token(LessEqual, "<=", 1),
                token(Greater, ">", 1),
                token(GreaterEqual, ">=", 1),
                Token::eof(Line(1)),
            ]
        );
    }

    #[test]
    fn single_char_tokens() {
        assert_eq!(
            kinds(&scan_ok("=(){},.-+;*/!<>")),
            vec![
                Equal, LeftParen, RightParen, LeftBrace, RightBrace, Comma, Dot, Minus, Plus,
                Semicolon, Star, Slash, Bang, Less, Greater, Eof
            ]
        );
    }

    #[test]
    fn comments() {
        assert_eq!(
            scan_ok("a // comment\nb // trailing"),
            vec![token(Identifier, "a", 1), token(Identifier, "b", 2), Token::eof(Line(2))]
        );

        assert_eq!(scan_ok("// only a comment"), vec![Token::eof(Line(1))]);
    }

    #[test]
    fn numbers() {
        assert_eq!(
            scan_ok("123 45.67"),
            vec![
                Token::new(Number, "123", Some(123.0.into()), Line(1)),
                Token::new(Number, "45.67", Some(45.67.into()), Line(1)),
                Token::eof(Line(1)),
            ]
        );

        // A trailing dot is not part of the number
        assert_eq!(
            scan_ok("1."),
            vec![
                Token::new(Number, "1", Some(1.0.into()), Line(1)),
                token(Dot, ".", 1),
                Token::eof(Line(1)),
            ]
        );

        assert_eq!(kinds(&scan_ok(".5")), vec![Dot, Number, Eof]);
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds(&scan_ok("and class else false for fun if nil or print return super this true var while")),
            vec![
                And, Class, Else, False, For, Fun, If, Nil, Or, Print, Return, Super, This, True,
                Var, While, Eof
            ]
        );

        let tokens = scan_ok("orchid nil truex");
        assert_eq!(kinds(&tokens), vec![Identifier, Nil, Identifier, Eof]);
        assert!(tokens.iter().all(|t| t.literal.is_none()));
    }

    #[test]
    fn identifiers_are_alphabetic_runs() {
        let tokens = scan_ok("abc1");
        assert_eq!(kinds(&tokens), vec![Identifier, Number, Eof]);
        assert_eq!(tokens[0].lexeme, "abc");
    }

    #[test]
    fn unexpected_characters_keep_scanning() {
        let (tokens, diagnostics) = scan("1 @ 2\n# 3");
        assert_eq!(kinds(&tokens), vec![Number, Number, Number, Eof]);
        assert_eq!(
            diagnostics.to_string(),
            "[line 1] Error: Unexpected character.\n[line 2] Error: Unexpected character."
        );
        assert!(diagnostics.had_error());
    }

    #[test]
    fn eof_is_on_last_line() {
        let tokens = scan_ok("1\n2\n\n");
        assert_eq!(tokens.last(), Some(&Token::eof(Line(4))));
        assert_eq!(tokens.iter().filter(|t| t.is_eof()).count(), 1);
    }

    #[test]
    fn lexing_is_idempotent() {
        let source = "(1 + 2) * \"three\" // four\n!= nil";
        assert_eq!(scan_ok(source), scan_ok(source));
    }

    #[test]
    fn token_display() {
        let tokens = scan_ok("(1 + 2) * 3");
        assert_eq!(
            tokens.iter().map(|t| t.to_string()).collect_vec(),
            vec![
                "LEFT_PAREN ( nil",
                "NUMBER 1 1",
                "PLUS + nil",
                "NUMBER 2 2",
                "RIGHT_PAREN ) nil",
                "STAR * nil",
                "NUMBER 3 3",
                "EOF  nil",
            ]
        );
        assert_eq!(scan_ok("\"hi\"")[0].to_string(), "STRING \"hi\" hi");
    }
}
