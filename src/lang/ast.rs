use super::{Operator, Position};
use std::rc::Rc;

pub type Ident = Rc<str>;

#[derive(Debug, PartialEq)]
pub enum Statement {
    Expression(Position, Expression),
    Var(Position, Ident, Expression),
    If(Position, Expression, Vec<Statement>, Vec<Statement>),
    Loop(Position, Expression, Vec<Statement>),
}

#[derive(Debug, PartialEq)]
pub enum Expression {
    Integer(Position, i64),
    Double(Position, f64),
    String(Position, Rc<str>),
    Boolean(Position, bool),
    Var(Position, Ident),
    Increment(Position, Ident),
    Decrement(Position, Ident),
    Stdin(Position),
    Rand(Position, Box<Expression>),
    Unary(Position, Operator, Box<Expression>),
    Binary(Position, Operator, Box<Expression>, Box<Expression>),
}

impl Statement {
    pub fn position(&self) -> Position {
        use Statement::*;
        match self {
            Expression(pos, ..) | Var(pos, ..) | If(pos, ..) | Loop(pos, ..) => *pos,
        }
    }
}

impl Expression {
    pub fn position(&self) -> Position {
        use Expression::*;
        match self {
            Integer(pos, ..)
            | Double(pos, ..)
            | String(pos, ..)
            | Boolean(pos, ..)
            | Var(pos, ..)
            | Increment(pos, ..)
            | Decrement(pos, ..)
            | Stdin(pos)
            | Rand(pos, ..)
            | Unary(pos, ..)
            | Binary(pos, ..) => *pos,
        }
    }
}

/// Post-order walk. Children are visited before their parent, and branch
/// bodies are visited in source order after the condition.
pub trait Visitor {
    fn visit_statement(&mut self, _: &Statement) {}
    fn visit_expression(&mut self, _: &Expression) {}
}

pub trait AcceptVisitor {
    fn accept<V: Visitor>(&self, visitor: &mut V);
}

impl AcceptVisitor for Statement {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        use Statement::*;
        match self {
            Expression(_, expr) | Var(_, _, expr) => {
                expr.accept(visitor);
            }
            If(_, predicate, then_stmts, else_stmts) => {
                predicate.accept(visitor);
                for stmt in then_stmts {
                    stmt.accept(visitor);
                }
                for stmt in else_stmts {
                    stmt.accept(visitor);
                }
            }
            Loop(_, predicate, body) => {
                predicate.accept(visitor);
                for stmt in body {
                    stmt.accept(visitor);
                }
            }
        }
        visitor.visit_statement(self)
    }
}

impl AcceptVisitor for Expression {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        use Expression::*;
        match self {
            Integer(..) | Double(..) | String(..) | Boolean(..) | Var(..) | Increment(..)
            | Decrement(..) | Stdin(..) => {}
            Rand(_, expr) | Unary(_, _, expr) => expr.accept(visitor),
            Binary(_, _, expr1, expr2) => {
                expr1.accept(visitor);
                expr2.accept(visitor);
            }
        }
        visitor.visit_expression(self)
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Expression::*;
        match self {
            Integer(_, n) => write!(f, "{}", n),
            Double(_, n) => write!(f, "{:?}", n),
            String(_, s) => write!(f, "\"{}\"", s),
            Boolean(_, b) => write!(f, "{}", b),
            Var(_, name) => write!(f, "{}", name),
            Increment(_, name) => write!(f, "{}++", name),
            Decrement(_, name) => write!(f, "{}--", name),
            Stdin(_) => write!(f, "stdin"),
            Rand(_, expr) => write!(f, "rand({})", expr),
            Unary(_, op, expr) => write!(f, "({}{})", op, expr),
            Binary(_, op, lhs, rhs) => write!(f, "({} {} {})", lhs, op, rhs),
        }
    }
}
