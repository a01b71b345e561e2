use scanner::Token;
use value::Value;

use crate::{Expr, Visitor};

/// Renders a tree in fully parenthesized prefix form, e.g. `(* (- 123) (group 45.67))`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&mut self, expr: &Expr<'_>) -> String {
        expr.accept(self)
    }

    fn parenthesize(&mut self, name: &str, exprs: &[&Expr<'_>]) -> String {
        let mut buffer = format!("({}", name);
        for expr in exprs {
            let printed: String = expr.accept(self);
            buffer.push(' ');
            buffer.push_str(&printed);
        }
        buffer.push(')');
        buffer
    }
}

impl Visitor<String> for AstPrinter {
    fn visit_literal(&mut self, value: &Value) -> String {
        value.to_string()
    }

    fn visit_grouping(&mut self, expression: &Expr<'_>) -> String {
        self.parenthesize("group", &[expression])
    }

    fn visit_unary(&mut self, operator: &Token<'_>, right: &Expr<'_>) -> String {
        self.parenthesize(operator.lexeme(), &[right])
    }

    fn visit_binary(&mut self, left: &Expr<'_>, operator: &Token<'_>, right: &Expr<'_>) -> String {
        self.parenthesize(operator.lexeme(), &[left, right])
    }
}
