use std::fmt::{self, Display, Formatter};

use scanner::Token;
use value::Value;

use crate::printer::AstPrinter;

/// An expression tree. Every interior node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    Binary { left: Box<Expr<'a>>, operator: Token<'a>, right: Box<Expr<'a>> },
    Grouping(Box<Expr<'a>>),
    Unary { operator: Token<'a>, right: Box<Expr<'a>> },
    Literal(Value),
}

/// One operation over expression trees, with a method per node kind.
///
/// New operations are added by implementing this trait, the node types stay
/// untouched.
pub trait Visitor<R> {
    fn visit_literal(&mut self, value: &Value) -> R;
    fn visit_grouping(&mut self, expression: &Expr<'_>) -> R;
    fn visit_unary(&mut self, operator: &Token<'_>, right: &Expr<'_>) -> R;
    fn visit_binary(&mut self, left: &Expr<'_>, operator: &Token<'_>, right: &Expr<'_>) -> R;
}

impl<'a> Expr<'a> {
    pub fn binary(left: Expr<'a>, operator: Token<'a>, right: Expr<'a>) -> Self {
        Expr::Binary { left: Box::new(left), operator, right: Box::new(right) }
    }

    pub fn unary(operator: Token<'a>, right: Expr<'a>) -> Self {
        Expr::Unary { operator, right: Box::new(right) }
    }

    pub fn grouping(expression: Expr<'a>) -> Self {
        Expr::Grouping(Box::new(expression))
    }

    pub fn accept<R>(&self, visitor: &mut impl Visitor<R>) -> R {
        match self {
            Expr::Literal(value) => visitor.visit_literal(value),
            Expr::Grouping(expression) => visitor.visit_grouping(expression),
            Expr::Unary { operator, right } => visitor.visit_unary(operator, right),
            Expr::Binary { left, operator, right } => visitor.visit_binary(left, operator, right),
        }
    }
}

impl From<Value> for Expr<'_> {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

impl Display for Expr<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", AstPrinter.print(self))
    }
}
