mod expr;
mod printer;
mod stmt;

use diagnostics::{Diagnostics, Line, Located, Location};
use scanner::{Token, TokenType};
use value::Value;

pub use expr::{Expr, Visitor};
pub use printer::AstPrinter;
pub use stmt::Stmt;

use TokenType::*;

pub type Result<'a, T> = std::result::Result<T, ParserError<'a>>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{error}")]
pub struct ParserError<'a> {
    pub error: ParserErrorType,
    pub token: Token<'a>,
}

impl<'a> ParserError<'a> {
    fn new(error: ParserErrorType, token: Token<'a>) -> Self {
        Self { error, token }
    }
}

impl Located for ParserError<'_> {
    fn line(&self) -> Line {
        self.token.line()
    }

    fn location(&self) -> Location {
        self.token.location()
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ParserErrorType {
    #[error("Expected expression.")]
    ExpectedExpression,
    #[error("Expect ')' after expression.")]
    MissingRightParen,
    #[error("Expect ';' after value.")]
    ExpectedSemicolon,
    #[error("Expect end of expression.")]
    ExpectedEnd,
}

/// Recursive descent parser over a complete token sequence.
///
/// Precedence, from loosest to tightest binding:
///
/// ```text
/// expression  = equality
/// equality    = comparison ( ( "!=" | "==" ) comparison )*
/// comparison  = term ( ( ">" | ">=" | "<" | "<=" ) term )*
/// term        = factor ( ( "-" | "+" ) factor )*
/// factor      = unary ( ( "/" | "*" ) unary )*
/// unary       = ( "-" | "!" ) unary | primary
/// primary     = NUMBER | STRING | "true" | "false" | "nil" | "(" expression ")"
/// ```
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    current: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        assert!(
            tokens.last().is_some_and(Token::is_eof),
            "token sequence must be terminated by Eof"
        );
        Self { tokens, current: 0 }
    }

    /// Parses a single expression that has to span the whole input.
    ///
    /// A failure is reported to `diagnostics` and yields `None`.
    pub fn parse(&mut self, diagnostics: &mut Diagnostics) -> Option<Expr<'a>> {
        match self.parse_expression() {
            Ok(expr) => Some(expr),
            Err(e) => {
                diagnostics.error_at(&e, e.error);
                None
            }
        }
    }

    /// Same as [`Parser::parse`], but hands back the failure instead of reporting it.
    pub fn parse_expression(&mut self) -> Result<'a, Expr<'a>> {
        let expr = self.expression()?;
        self.consume(Eof, ParserErrorType::ExpectedEnd)?;
        Ok(expr)
    }

    /// Parses a single statement that has to span the whole input.
    pub fn parse_statement(&mut self, diagnostics: &mut Diagnostics) -> Option<Stmt<'a>> {
        let stmt = self.statement().and_then(|stmt| {
            self.consume(Eof, ParserErrorType::ExpectedEnd)?;
            Ok(stmt)
        });

        match stmt {
            Ok(stmt) => Some(stmt),
            Err(e) => {
                diagnostics.error_at(&e, e.error);
                self.synchronize();
                None
            }
        }
    }

    fn statement(&mut self) -> Result<'a, Stmt<'a>> {
        if self.matches(&[Print]).is_some() {
            let value = self.expression()?;
            self.consume(Semicolon, ParserErrorType::ExpectedSemicolon)?;
            return Ok(Stmt::Print(value));
        }

        let value = self.expression()?;
        // A bare expression may leave out its semicolon
        self.matches(&[Semicolon]);
        Ok(Stmt::Expression(value))
    }

    fn expression(&mut self) -> Result<'a, Expr<'a>> {
        self.equality()
    }

    fn equality(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.comparison()?;

        while let Some(operator) = self.matches(&[BangEqual, EqualEqual]) {
            let right = self.comparison()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.term()?;

        while let Some(operator) = self.matches(&[Greater, GreaterEqual, Less, LessEqual]) {
            let right = self.term()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.factor()?;

        while let Some(operator) = self.matches(&[Minus, Plus]) {
            let right = self.factor()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.unary()?;

        while let Some(operator) = self.matches(&[Slash, Star]) {
            let right = self.unary()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<'a, Expr<'a>> {
        if let Some(operator) = self.matches(&[Minus, Bang]) {
            let right = self.unary()?;
            return Ok(Expr::unary(operator, right));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<'a, Expr<'a>> {
        let token = self.peek().clone();
        let expr: Expr<'a> = match token.kind {
            False => Value::Bool(false).into(),
            True => Value::Bool(true).into(),
            Nil => Value::Nil.into(),
            Number | Str => match token.literal {
                Some(literal) => literal.into(),
                None => unreachable!("Scanner always attaches a literal to {}", token.kind),
            },
            LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(RightParen, ParserErrorType::MissingRightParen)?;
                return Ok(Expr::grouping(expr));
            }
            _ => return Err(ParserError::new(ParserErrorType::ExpectedExpression, token)),
        };

        self.advance();
        Ok(expr)
    }

    /// Skips tokens until the start of the next statement.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == Semicolon {
                break;
            }

            match self.peek().kind {
                Class | Fun | Var | For | If | While | Print | Return => break,
                _ => {
                    self.advance();
                }
            }
        }

        log::debug!("Synchronized parser at {:?}", self.peek());
    }
}

// Helpers
impl<'a> Parser<'a> {
    /// Consumes the next token if it has one of the given kinds.
    fn matches(&mut self, kinds: &[TokenType]) -> Option<Token<'a>> {
        kinds.iter().any(|kind| self.check(*kind)).then(|| self.advance())
    }

    fn consume(&mut self, kind: TokenType, error: ParserErrorType) -> Result<'a, Token<'a>> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParserError::new(error, self.peek().clone()))
        }
    }

    fn check(&self, kind: TokenType) -> bool {
        self.peek().kind == kind
    }

    /// Returns the current token and moves past it, unless it is `Eof`.
    fn advance(&mut self) -> Token<'a> {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous().clone()
    }

    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    fn peek(&self) -> &Token<'a> {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token<'a> {
        &self.tokens[self.current.saturating_sub(1)]
    }
}
