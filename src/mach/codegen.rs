use super::{Link, Opcode, Program, Stack, Symbol, Val};
use crate::error;
use crate::lang::ast::{self, AcceptVisitor};
use crate::lang::{Error, Operator, Position};

type Result<T> = std::result::Result<T, Error>;

pub fn codegen(program: &mut Program, ast: &[ast::Statement]) {
    Visitor::accept(program, ast)
}

struct Visitor<'a> {
    link: &'a mut Program,
    gen: Generator,
}

impl<'a> Visitor<'a> {
    fn accept(program: &mut Program, ast: &[ast::Statement]) {
        let mut this = Visitor {
            link: program,
            gen: Generator::new(),
        };
        for statement in ast {
            statement.accept(&mut this);
        }
        for (_pos, frag) in this.gen.stmt.drain(..) {
            if let Some(error) = this.link.append(frag).err() {
                this.link.error(error);
                break;
            }
        }
        let mut exit = Link::new();
        let appended = exit
            .push(Opcode::Exit)
            .and_then(|_| this.link.append(exit));
        if let Some(error) = appended.err() {
            this.link.error(error);
        }
        this.link.link();
        debug_assert_eq!(0, this.gen.expr.len());
        debug_assert_eq!(0, this.gen.stmt.len());
    }
}

impl<'a> ast::Visitor for Visitor<'a> {
    fn visit_statement(&mut self, statement: &ast::Statement) {
        let mut link = Link::new();
        let pos = statement.position();
        if let Err(e) = self.gen.statement(&mut link, statement) {
            self.link.error(e.or_position(pos));
        }
        link.frame(pos);
        if let Some(error) = self.gen.stmt.push((pos, link)).err() {
            self.link.error(error.or_position(pos))
        }
    }
    fn visit_expression(&mut self, expression: &ast::Expression) {
        let mut link = Link::new();
        let pos = expression.position();
        let assigns = match self.gen.expression(&mut link, expression) {
            Ok(assigns) => assigns,
            Err(e) => {
                self.link.error(e.or_position(pos));
                false
            }
        };
        let frag = Fragment {
            pos,
            link,
            assigns,
        };
        if let Some(error) = self.gen.expr.push(frag).err() {
            self.link.error(error.or_position(pos))
        }
    }
}

#[derive(Debug)]
struct Fragment {
    pos: Position,
    link: Link,
    /// Assignments store and leave nothing on the stack.
    assigns: bool,
}

impl Fragment {
    fn value(self) -> Result<Link> {
        if self.assigns {
            Err(error!(SyntaxError, self.pos; "ASSIGNMENT CANNOT BE USED AS A VALUE"))
        } else {
            Ok(self.link)
        }
    }
}

struct Generator {
    expr: Stack<Fragment>,
    stmt: Stack<(Position, Link)>,
    current_symbol: Symbol,
}

impl Generator {
    fn new() -> Generator {
        Generator {
            expr: Stack::new("EXPRESSION OVERFLOW"),
            stmt: Stack::new("STATEMENT OVERFLOW"),
            current_symbol: 0,
        }
    }

    fn next_symbol(&mut self) -> Symbol {
        self.current_symbol += 1;
        self.current_symbol
    }

    /// Returns true when the expression is an assignment.
    fn expression(&mut self, link: &mut Link, expr: &ast::Expression) -> Result<bool> {
        fn unrecognized(pos: Position, op: Operator) -> Error {
            error!(SyntaxError, pos; &format!("UNRECOGNIZED OPERATOR '{}'", op))
        }
        fn literal(link: &mut Link, val: Val) -> Result<bool> {
            link.push_const(val)?;
            Ok(false)
        }
        fn named(link: &mut Link, name: &ast::Ident, op: Opcode) -> Result<bool> {
            link.push_const(Val::String(name.clone()))?;
            link.push(op)?;
            Ok(false)
        }
        use ast::Expression;
        match expr {
            Expression::Integer(_, val) => literal(link, Val::Integer(*val)),
            Expression::Double(_, val) => literal(link, Val::Double(*val)),
            Expression::String(_, val) => literal(link, Val::String(val.clone())),
            Expression::Boolean(_, val) => literal(link, Val::Boolean(*val)),
            Expression::Var(_, name) => named(link, name, Opcode::VarGet),
            Expression::Increment(_, name) => named(link, name, Opcode::Inc),
            Expression::Decrement(_, name) => named(link, name, Opcode::Dec),
            Expression::Stdin(_) => {
                link.push(Opcode::Stdin)?;
                Ok(false)
            }
            Expression::Rand(..) => {
                let bound = self.expr.pop()?.value()?;
                link.append(bound)?;
                link.push(Opcode::Rand)?;
                Ok(false)
            }
            Expression::Unary(pos, op, _) => {
                let operand = self.expr.pop()?.value()?;
                let opcode = Opcode::for_unary(*op).ok_or_else(|| unrecognized(*pos, *op))?;
                link.append(operand)?;
                link.push(opcode)?;
                Ok(false)
            }
            Expression::Binary(pos, Operator::Assign, target, _) => {
                let rhs = self.expr.pop()?;
                let _target = self.expr.pop()?;
                let name = match target.as_ref() {
                    Expression::Var(_, name) => name,
                    _ => return Err(error!(SyntaxError, *pos; "INVALID ASSIGNMENT TARGET")),
                };
                let rhs = rhs.value()?;
                link.push_const(Val::String(name.clone()))?;
                link.append(rhs)?;
                link.push(Opcode::VarDecl)?;
                Ok(true)
            }
            Expression::Binary(pos, op, ..) => {
                let rhs = self.expr.pop()?;
                let lhs = self.expr.pop()?;
                let (lhs, rhs) = (lhs.value()?, rhs.value()?);
                let opcode = Opcode::for_binary(*op).ok_or_else(|| unrecognized(*pos, *op))?;
                link.append(lhs)?;
                link.append(rhs)?;
                link.push(opcode)?;
                Ok(false)
            }
        }
    }

    fn statement(&mut self, link: &mut Link, statement: &ast::Statement) -> Result<()> {
        use ast::Statement;
        match statement {
            Statement::Expression(..) => self.r#expression_statement(link),
            Statement::Var(_, name, _) => self.r#var(link, name),
            Statement::If(pos, _, th, el) => self.r#if(link, *pos, th.len(), el.len()),
            Statement::Loop(pos, _, body) => self.r#loop(link, *pos, body.len()),
        }
    }

    fn r#expression_statement(&mut self, link: &mut Link) -> Result<()> {
        let frag = self.expr.pop()?;
        let assigns = frag.assigns;
        link.append(frag.link)?;
        if !assigns {
            link.push(Opcode::Pop)?;
        }
        Ok(())
    }

    fn r#var(&mut self, link: &mut Link, name: &ast::Ident) -> Result<()> {
        let value = self.expr.pop()?.value()?;
        link.push_const(Val::String(name.clone()))?;
        link.append(value)?;
        link.push(Opcode::VarDecl)
    }

    fn r#if(&mut self, link: &mut Link, pos: Position, then_len: usize, else_len: usize) -> Result<()> {
        let elses = self.stmt.pop_n(else_len)?;
        let thens = self.stmt.pop_n(then_len)?;
        let predicate = self.expr.pop()?.value()?;
        link.append(predicate)?;
        let else_sym = self.next_symbol();
        link.push_if(pos, else_sym)?;
        for (_pos, stmt_ops) in thens {
            link.append(stmt_ops)?;
        }
        if else_len == 0 {
            link.push_symbol(else_sym);
        } else {
            let finished_sym = self.next_symbol();
            link.push_else(pos, finished_sym)?;
            link.push_symbol(else_sym);
            for (_pos, stmt_ops) in elses {
                link.append(stmt_ops)?;
            }
            link.push_symbol(finished_sym);
        }
        link.push(Opcode::JumpEnd)
    }

    fn r#loop(&mut self, link: &mut Link, pos: Position, body_len: usize) -> Result<()> {
        let body = self.stmt.pop_n(body_len)?;
        let predicate = self.expr.pop()?.value()?;
        link.append(predicate)?;
        let reenter = link.len();
        let loop_sym = self.next_symbol();
        let exit_sym = self.next_symbol();
        link.push_symbol(loop_sym);
        link.push_loop(pos, exit_sym)?;
        for (_pos, stmt_ops) in body {
            link.append_at_depth(stmt_ops, 1)?;
        }
        link.push_loop_end(pos, loop_sym, reenter)?;
        link.push_symbol(exit_sym);
        Ok(())
    }
}
