use super::{ast::*, token::*, Error, Lexer, Position};
use tracing::trace;

type Result<T> = std::result::Result<T, Error>;

/// Parse a whole source text. Every statement that fails to parse adds one
/// error; parsing resumes at the next statement boundary.
pub fn parse(source: &str) -> std::result::Result<Vec<Statement>, Vec<Error>> {
    Parser::parse(Lexer::new(source))
}

const ASSIGNMENT: usize = 1;

struct Parser<'a> {
    token_stream: Lexer<'a>,
    peeked: Option<Token>,
    errors: Vec<Error>,
}

impl<'a> Parser<'a> {
    fn parse(lexer: Lexer<'a>) -> std::result::Result<Vec<Statement>, Vec<Error>> {
        let mut parse = Parser {
            token_stream: lexer,
            peeked: None,
            errors: vec![],
        };
        let r = parse.statement_list(false);
        if parse.errors.is_empty() {
            Ok(r)
        } else {
            Err(parse.errors)
        }
    }

    fn statement_list(&mut self, in_block: bool) -> Vec<Statement> {
        let mut r: Vec<Statement> = vec![];
        loop {
            match self.peek() {
                None => return r,
                Some(TokenKind::RBrace) if in_block => return r,
                Some(TokenKind::Semicolon) => {
                    self.next();
                    continue;
                }
                _ => {}
            }
            match self.statement() {
                Ok(s) => r.push(s),
                Err(e) => {
                    trace!("parse error {}", e);
                    self.errors.push(e);
                    self.synchronize(in_block);
                }
            }
        }
    }

    /// Skip to the end of the broken statement. Braces opened while
    /// skipping are skipped as a unit; an unmatched `}` ends a block.
    fn synchronize(&mut self, in_block: bool) {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                None => return,
                Some(TokenKind::Semicolon) if depth == 0 => {
                    self.next();
                    return;
                }
                Some(TokenKind::LBrace) => depth += 1,
                Some(TokenKind::RBrace) => {
                    if depth == 0 {
                        if !in_block {
                            self.next();
                        }
                        return;
                    }
                    depth -= 1;
                    if depth == 0 {
                        self.next();
                        return;
                    }
                }
                Some(TokenKind::Word(Word::Var))
                | Some(TokenKind::Word(Word::If))
                | Some(TokenKind::Word(Word::Loop))
                    if depth == 0 =>
                {
                    return
                }
                _ => {}
            }
            self.next();
        }
    }

    fn next(&mut self) -> Option<Token> {
        if self.peeked.is_some() {
            return self.peeked.take();
        }
        self.token_stream.next()
    }

    fn peek(&mut self) -> Option<&TokenKind> {
        if self.peeked.is_none() {
            self.peeked = self.token_stream.next();
        }
        self.peeked.as_ref().map(|t| &t.kind)
    }

    fn peek_word(&mut self) -> Option<Word> {
        match self.peek() {
            Some(TokenKind::Word(word)) => Some(*word),
            _ => None,
        }
    }

    /// Position of the next token, or of the end of input.
    fn position(&mut self) -> Position {
        self.peek();
        match &self.peeked {
            Some(t) => t.position(),
            None => self.token_stream.position(),
        }
    }

    fn found(&mut self) -> String {
        self.peek();
        match &self.peeked {
            None => "END OF INPUT".to_string(),
            Some(t) => format!("'{}'", t),
        }
    }

    fn statement(&mut self) -> Result<Statement> {
        let position = self.position();
        match self.peek_word() {
            Some(word @ Word::Var)
            | Some(word @ Word::If)
            | Some(word @ Word::Loop)
            | Some(word @ Word::Func)
            | Some(word @ Word::Return)
            | Some(word @ Word::Break)
            | Some(word @ Word::Continue)
            | Some(word @ Word::Else) => {
                self.next();
                Statement::for_word(self, position, word)
            }
            _ => Statement::r#expression(self, position),
        }
    }

    fn expression(&mut self) -> Result<Expression> {
        fn parse(this: &mut Parser, precedence: usize) -> Result<Expression> {
            let mut lhs = this.prefix()?;
            loop {
                let op = match this.peek() {
                    Some(TokenKind::Operator(op)) => *op,
                    _ => break,
                };
                let op_precedence = match Expression::op_precedence(op) {
                    Some(p) => p,
                    None => break,
                };
                if op_precedence < precedence {
                    break;
                }
                let position = this.position();
                this.next();
                let rhs = if op == Operator::Assign {
                    parse(this, op_precedence)?
                } else {
                    parse(this, op_precedence + 1)?
                };
                lhs = Expression::Binary(position, op, Box::new(lhs), Box::new(rhs));
            }
            Ok(lhs)
        }

        parse(self, ASSIGNMENT)
    }

    fn prefix(&mut self) -> Result<Expression> {
        let position = self.position();
        match self.peek() {
            None
            | Some(TokenKind::Semicolon)
            | Some(TokenKind::RParen)
            | Some(TokenKind::RBrace) => {
                let found = self.found();
                return Err(error!(SyntaxError, position;
                    &format!("EXPECTED EXPRESSION, FOUND {}", found)));
            }
            _ => {}
        }
        let token = match self.next() {
            Some(t) => t,
            None => return Err(error!(InternalError, position)),
        };
        match token.kind {
            TokenKind::Literal(lit) => Expression::for_literal(position, &lit),
            TokenKind::Word(Word::True) => Ok(Expression::Boolean(position, true)),
            TokenKind::Word(Word::False) => Ok(Expression::Boolean(position, false)),
            TokenKind::Word(Word::Stdin) => Ok(Expression::Stdin(position)),
            TokenKind::Word(Word::Rand) => {
                self.expect(TokenKind::LParen)?;
                let bound = self.expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expression::Rand(position, Box::new(bound)))
            }
            TokenKind::Ident(name) => match self.peek() {
                Some(TokenKind::Operator(Operator::Increment)) => {
                    self.next();
                    Ok(Expression::Increment(position, name))
                }
                Some(TokenKind::Operator(Operator::Decrement)) => {
                    self.next();
                    Ok(Expression::Decrement(position, name))
                }
                _ => Ok(Expression::Var(position, name)),
            },
            TokenKind::LParen => {
                let expr = self.expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Operator(op @ Operator::Minus) | TokenKind::Operator(op @ Operator::Bang) => {
                // Unary binds tighter than every infix operator.
                let operand = self.prefix()?;
                Ok(Expression::Unary(position, op, Box::new(operand)))
            }
            TokenKind::Unknown(s) => Err(Expression::illegal(position, &s)),
            kind => Err(error!(SyntaxError, position;
                &format!("EXPECTED EXPRESSION, FOUND '{}'", kind))),
        }
    }

    fn ident(&mut self) -> Result<Ident> {
        let position = self.position();
        match self.next() {
            Some(Token {
                kind: TokenKind::Ident(i),
                ..
            }) => Ok(i),
            Some(Token {
                kind: TokenKind::Word(w),
                ..
            }) => Err(error!(SyntaxError, position;
                &format!("'{}' IS A RESERVED WORD", w))),
            _ => Err(error!(SyntaxError, position; "EXPECTED IDENTIFIER")),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        let position = self.position();
        if let Some(found) = self.peek() {
            if *found == kind {
                self.next();
                return Ok(());
            }
            if let TokenKind::Unknown(s) = found {
                let s = s.clone();
                return Err(Expression::illegal(position, &s));
            }
        }
        use TokenKind::*;
        let expected = match kind {
            Operator(op) => return self.expected(position, &format!("'{}'", op)),
            Unknown(_) => "UNEXPECTED TOKEN",
            Literal(_) => "EXPECTED LITERAL",
            Word(_) => "EXPECTED RESERVED WORD",
            Ident(_) => "EXPECTED IDENTIFIER",
            LParen => "EXPECTED LEFT PARENTHESIS",
            RParen => "EXPECTED RIGHT PARENTHESIS",
            LBrace => "EXPECTED LEFT BRACE",
            RBrace => "EXPECTED RIGHT BRACE",
            LBracket => "EXPECTED LEFT BRACKET",
            RBracket => "EXPECTED RIGHT BRACKET",
            Comma => "EXPECTED COMMA",
            Semicolon => "EXPECTED SEMICOLON",
        };
        let found = self.found();
        Err(error!(SyntaxError, position; &format!("{}, FOUND {}", expected, found)))
    }

    fn expected(&mut self, position: Position, what: &str) -> Result<()> {
        let found = self.found();
        Err(error!(SyntaxError, position; &format!("EXPECTED {}, FOUND {}", what, found)))
    }

    fn block(&mut self) -> Result<Vec<Statement>> {
        self.expect(TokenKind::LBrace)?;
        let statements = self.statement_list(true);
        self.expect(TokenKind::RBrace)?;
        Ok(statements)
    }
}

impl Expression {
    fn op_precedence(op: Operator) -> Option<usize> {
        use Operator::*;
        Some(match op {
            Assign => ASSIGNMENT,
            Or => 2,
            And => 3,
            Equal | NotEqual => 4,
            Less | LessEqual | Greater | GreaterEqual => 5,
            Plus | Minus => 6,
            Multiply | Divide | Modulo => 7,
            Bang | Increment | Decrement => return None,
        })
    }

    fn for_literal(position: Position, lit: &Literal) -> Result<Expression> {
        match lit {
            Literal::Integer(s) => match s.parse() {
                Ok(n) => Ok(Expression::Integer(position, n)),
                Err(_) => Err(error!(Overflow, position; &format!("INTEGER LITERAL {}", s))),
            },
            Literal::Double(s) => match s.parse() {
                Ok(n) => Ok(Expression::Double(position, n)),
                Err(_) => Err(error!(SyntaxError, position; &format!("MALFORMED NUMBER {}", s))),
            },
            Literal::String(s) => Ok(Expression::String(position, s.as_str().into())),
            Literal::Char(c) => Ok(Expression::String(position, c.to_string().into())),
        }
    }

    fn illegal(position: Position, s: &str) -> Error {
        if s.starts_with('"') {
            error!(SyntaxError, position; "UNTERMINATED STRING")
        } else {
            error!(SyntaxError, position; &format!("ILLEGAL CHARACTER {}", s))
        }
    }
}

impl Statement {
    fn for_word(parse: &mut Parser, position: Position, word: Word) -> Result<Statement> {
        use Word::*;
        match word {
            Var => Self::r#var(parse, position),
            If => Self::r#if(parse, position),
            Loop => Self::r#loop(parse, position),
            Func => Err(error!(SyntaxError, position; "FUNCTIONS ARE NOT SUPPORTED")),
            Return | Break | Continue => Err(error!(SyntaxError, position;
                &format!("'{}' IS NOT YET IMPLEMENTED", word))),
            Else => Err(error!(SyntaxError, position; "ELSE WITHOUT IF")),
            True | False | Rand | Stdin => Err(error!(InternalError, position;
                "EXPRESSION WORD PARSED AS STATEMENT")),
        }
    }

    fn r#expression(parse: &mut Parser, position: Position) -> Result<Statement> {
        let expr = parse.expression()?;
        parse.expect(TokenKind::Semicolon)?;
        Ok(Statement::Expression(position, expr))
    }

    fn r#var(parse: &mut Parser, position: Position) -> Result<Statement> {
        let ident = parse.ident()?;
        parse.expect(TokenKind::Operator(Operator::Assign))?;
        let expr = parse.expression()?;
        parse.expect(TokenKind::Semicolon)?;
        Ok(Statement::Var(position, ident, expr))
    }

    fn r#if(parse: &mut Parser, position: Position) -> Result<Statement> {
        parse.expect(TokenKind::LParen)?;
        let predicate = parse.expression()?;
        parse.expect(TokenKind::RParen)?;
        let then_stmts = parse.block()?;
        let mut else_stmts = vec![];
        if parse.peek_word() == Some(Word::Else) {
            parse.next();
            if parse.peek_word() == Some(Word::If) {
                let position = parse.position();
                parse.next();
                else_stmts.push(Self::r#if(parse, position)?);
            } else {
                else_stmts = parse.block()?;
            }
        }
        Ok(Statement::If(position, predicate, then_stmts, else_stmts))
    }

    fn r#loop(parse: &mut Parser, position: Position) -> Result<Statement> {
        parse.expect(TokenKind::LParen)?;
        let predicate = parse.expression()?;
        parse.expect(TokenKind::RParen)?;
        let body = parse.block()?;
        Ok(Statement::Loop(position, predicate, body))
    }
}
