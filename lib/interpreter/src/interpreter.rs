use std::{cmp::Ordering, io::Write};

use diagnostics::{Diagnostics, Line, Located, Location};
use parser::{Expr, Parser, Stmt, Visitor};
use scanner::{Token, TokenType};
use value::Value;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum RuntimeErrorType {
    #[error("Operand must be a number.")]
    OperandMustBeNumber,
    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers,
    #[error("Operands must be two numbers or two strings.")]
    OperandsMustBeNumbersOrStrings,
    #[error("Operands must be of the same type or nil.")]
    OperandsNotComparable,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{error}")]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub line: Line,
    /// Lexeme of the operator that failed.
    pub operator: String,
}

impl RuntimeError {
    fn new(error: RuntimeErrorType, operator: &Token<'_>) -> Self {
        Self { error, line: operator.line, operator: operator.lexeme().to_string() }
    }
}

impl Located for RuntimeError {
    fn line(&self) -> Line {
        self.line
    }

    fn location(&self) -> Location {
        Location::Lexeme(self.operator.clone())
    }
}

/// Scans, parses and runs one source unit.
///
/// Stops after parsing if scanning or parsing reported anything; otherwise the
/// value of the statement is written to `output`. Language errors end up in
/// `diagnostics`, only I/O failures on `output` are returned.
pub fn run_source(
    source: &str,
    output: &mut impl Write,
    diagnostics: &mut Diagnostics,
) -> std::io::Result<()> {
    let tokens = scanner::lex(source, diagnostics);
    let stmt = Parser::new(tokens).parse_statement(diagnostics);

    match stmt {
        Some(stmt) if !diagnostics.had_error() => {
            Interpreter::new().interpret(&stmt, output, diagnostics)
        }
        _ => Ok(()),
    }
}

/// Tree-walking evaluator.
///
/// Evaluation is a single post-order pass: both operands of a node are fully
/// evaluated before the node itself, and the first failure aborts the whole
/// pass.
#[derive(Debug, Default)]
pub struct Interpreter;

impl Interpreter {
    pub fn new() -> Self {
        Self
    }

    /// Executes `stmt`, writing its value to `output` or reporting a runtime error.
    pub fn interpret(
        &mut self,
        stmt: &Stmt<'_>,
        output: &mut impl Write,
        diagnostics: &mut Diagnostics,
    ) -> std::io::Result<()> {
        match self.execute(stmt) {
            Ok(value) => writeln!(output, "{}", value),
            Err(e) => {
                diagnostics.runtime_error(&e);
                Ok(())
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt<'_>) -> Result<Value> {
        match stmt {
            Stmt::Print(expr) => self.evaluate(expr),
            // At the top level a bare expression echoes its value as well
            Stmt::Expression(expr) => self.evaluate(expr),
        }
    }

    pub fn evaluate(&mut self, expr: &Expr<'_>) -> Result<Value> {
        let value: Result<Value> = expr.accept(self);
        let value = value?;
        log::trace!("{} => {} {}", expr, value.type_name(), value);
        Ok(value)
    }
}

impl Visitor<Result<Value>> for Interpreter {
    fn visit_literal(&mut self, value: &Value) -> Result<Value> {
        Ok(value.clone())
    }

    fn visit_grouping(&mut self, expression: &Expr<'_>) -> Result<Value> {
        self.evaluate(expression)
    }

    fn visit_unary(&mut self, operator: &Token<'_>, right: &Expr<'_>) -> Result<Value> {
        let right = self.evaluate(right)?;
        match (operator.kind, right) {
            (TokenType::Minus, Value::Number(n)) => Ok((-n).into()),
            (TokenType::Minus, _) => {
                Err(RuntimeError::new(RuntimeErrorType::OperandMustBeNumber, operator))
            }
            (TokenType::Bang, v) => Ok((!v.is_truthy()).into()),
            (kind, _) => unreachable!("Parser never produces unary operator {}", kind),
        }
    }

    fn visit_binary(
        &mut self,
        left: &Expr<'_>,
        operator: &Token<'_>,
        right: &Expr<'_>,
    ) -> Result<Value> {
        use RuntimeErrorType::*;
        use TokenType::*;

        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;
        let error = |error| RuntimeError::new(error, operator);

        match (&left, &right, operator.kind) {
            (Value::Number(l), Value::Number(r), Plus) => Ok((l + r).into()),
            (Value::Str(l), Value::Str(r), Plus) => Ok(format!("{}{}", l, r).into()),
            (_, _, Plus) => Err(error(OperandsMustBeNumbersOrStrings)),

            (Value::Number(l), Value::Number(r), Minus) => Ok((l - r).into()),
            // Division by zero gives inf or NaN
            (Value::Number(l), Value::Number(r), Slash) => Ok((l / r).into()),
            (Value::Number(l), Value::Number(r), Star) => Ok((l * r).into()),
            (_, _, Minus | Slash | Star) => Err(error(OperandsMustBeNumbers)),

            // Compared directly so that NaN is unordered instead of an error
            (Value::Number(l), Value::Number(r), Greater) => Ok((l > r).into()),
            (Value::Number(l), Value::Number(r), GreaterEqual) => Ok((l >= r).into()),
            (Value::Number(l), Value::Number(r), Less) => Ok((l < r).into()),
            (Value::Number(l), Value::Number(r), LessEqual) => Ok((l <= r).into()),
            (_, _, kind @ (Greater | GreaterEqual | Less | LessEqual)) => {
                let ordering =
                    left.cmp_in_lox(&right).ok_or_else(|| error(OperandsNotComparable))?;
                Ok(compare(kind, ordering).into())
            }

            (_, _, EqualEqual) => Ok(left.eq_in_lox(&right).into()),
            (_, _, BangEqual) => Ok((!left.eq_in_lox(&right)).into()),

            (_, _, kind) => unreachable!("Parser never produces binary operator {}", kind),
        }
    }
}

fn compare(kind: TokenType, ordering: Ordering) -> bool {
    match kind {
        TokenType::Greater => ordering.is_gt(),
        TokenType::GreaterEqual => ordering.is_ge(),
        TokenType::Less => ordering.is_lt(),
        TokenType::LessEqual => ordering.is_le(),
        _ => unreachable!("{} is not a comparison", kind),
    }
}
