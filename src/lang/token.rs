use super::{Column, Position};
use std::rc::Rc;

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Column,
    pub line: usize,
    pub col: usize,
}

impl Token {
    pub fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind {
    Unknown(String),
    Literal(Literal),
    Word(Word),
    Operator(Operator),
    Ident(Rc<str>),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        use TokenKind::*;
        match self {
            Unknown(_) => "ILLEGAL",
            Literal(lit) => lit.name(),
            Word(_) => "KEYWORD",
            Operator(_) => "OPERATOR",
            Ident(_) => "IDENT",
            LParen => "LPAREN",
            RParen => "RPAREN",
            LBrace => "LBRACE",
            RBrace => "RBRACE",
            LBracket => "LBRACKET",
            RBracket => "RBRACKET",
            Comma => "COMMA",
            Semicolon => "SEMI_COLON",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use TokenKind::*;
        match self {
            Unknown(s) => write!(f, "{}", s),
            Literal(s) => write!(f, "{}", s),
            Word(s) => write!(f, "{}", s),
            Operator(s) => write!(f, "{}", s),
            Ident(s) => write!(f, "{}", s),
            LParen => write!(f, "("),
            RParen => write!(f, ")"),
            LBrace => write!(f, "{{"),
            RBrace => write!(f, "}}"),
            LBracket => write!(f, "["),
            RBracket => write!(f, "]"),
            Comma => write!(f, ","),
            Semicolon => write!(f, ";"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Integer(String),
    Double(String),
    String(String),
    Char(char),
}

impl Literal {
    fn name(&self) -> &'static str {
        match self {
            Literal::Integer(_) => "INT",
            Literal::Double(_) => "FLOAT",
            Literal::String(_) => "STRING",
            Literal::Char(_) => "CHAR",
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Literal::*;
        match self {
            Integer(s) => write!(f, "{}", s),
            Double(s) => write!(f, "{}", s),
            String(s) => write!(f, "\"{}\"", s),
            Char(c) => write!(f, "'{}'", c),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Word {
    Break,
    Continue,
    Else,
    False,
    Func,
    If,
    Loop,
    Rand,
    Return,
    Stdin,
    True,
    Var,
}

impl Word {
    pub fn from_string(s: &str) -> Option<Word> {
        use Word::*;
        Some(match s {
            "break" => Break,
            "continue" => Continue,
            "else" => Else,
            "false" => False,
            "func" => Func,
            "if" => If,
            "loop" => Loop,
            "rand" => Rand,
            "return" => Return,
            "stdin" => Stdin,
            "true" => True,
            "var" => Var,
            _ => return None,
        })
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Word::*;
        match self {
            Break => write!(f, "break"),
            Continue => write!(f, "continue"),
            Else => write!(f, "else"),
            False => write!(f, "false"),
            Func => write!(f, "func"),
            If => write!(f, "if"),
            Loop => write!(f, "loop"),
            Rand => write!(f, "rand"),
            Return => write!(f, "return"),
            Stdin => write!(f, "stdin"),
            True => write!(f, "true"),
            Var => write!(f, "var"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Operator {
    Assign,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Bang,
    And,
    Or,
    Increment,
    Decrement,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl Operator {
    pub fn from_string(s: &str) -> Option<Operator> {
        use Operator::*;
        Some(match s {
            "=" => Assign,
            "+" => Plus,
            "-" => Minus,
            "*" => Multiply,
            "/" => Divide,
            "%" => Modulo,
            "!" => Bang,
            "&&" => And,
            "||" => Or,
            "++" => Increment,
            "--" => Decrement,
            "<" => Less,
            "<=" => LessEqual,
            ">" => Greater,
            ">=" => GreaterEqual,
            "==" => Equal,
            "!=" => NotEqual,
            _ => return None,
        })
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Operator::*;
        match self {
            Assign => write!(f, "="),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Multiply => write!(f, "*"),
            Divide => write!(f, "/"),
            Modulo => write!(f, "%"),
            Bang => write!(f, "!"),
            And => write!(f, "&&"),
            Or => write!(f, "||"),
            Increment => write!(f, "++"),
            Decrement => write!(f, "--"),
            Less => write!(f, "<"),
            LessEqual => write!(f, "<="),
            Greater => write!(f, ">"),
            GreaterEqual => write!(f, ">="),
            Equal => write!(f, "=="),
            NotEqual => write!(f, "!="),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string() {
        assert_eq!(Word::from_string("loop"), Some(Word::Loop));
        assert_eq!(Word::from_string("LOOP"), None);
        assert_eq!(Operator::from_string("!="), Some(Operator::NotEqual));
        assert_eq!(Operator::from_string("=>"), None);
    }
}
