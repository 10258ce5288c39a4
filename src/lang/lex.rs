use super::token::*;
use super::Position;

pub fn lex(s: &str) -> Vec<Token> {
    Lexer::new(s).collect()
}

fn is_phantom_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r' || c == '\n'
}

fn is_phantom_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_phantom_alphabetic(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Pull tokenizer. Each call to `next` yields one positioned token;
/// `None` marks the end of the source.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            col: 1,
        }
    }

    /// Line and column of the next unread character.
    pub fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    fn offset(&mut self) -> usize {
        match self.chars.peek() {
            Some((index, _)) => *index,
            None => self.source.len(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn peek_second(&mut self) -> Option<char> {
        let offset = self.offset();
        self.source[offset..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let (_, ch) = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if !is_phantom_whitespace(ch) {
                break;
            }
            self.bump();
        }
    }

    fn number(&mut self) -> TokenKind {
        let mut s = String::new();
        let mut decimal = false;
        while let Some(ch) = self.peek() {
            if is_phantom_digit(ch) {
                s.push(ch);
                self.bump();
                continue;
            }
            if ch == '.' && !decimal {
                if let Some(next) = self.peek_second() {
                    if is_phantom_digit(next) {
                        decimal = true;
                        s.push(ch);
                        self.bump();
                        continue;
                    }
                }
            }
            break;
        }
        if decimal {
            TokenKind::Literal(Literal::Double(s))
        } else {
            TokenKind::Literal(Literal::Integer(s))
        }
    }

    fn string(&mut self) -> TokenKind {
        let mut s = String::new();
        self.bump();
        loop {
            match self.bump() {
                Some('"') => return TokenKind::Literal(Literal::String(s)),
                Some(ch) => s.push(ch),
                None => return TokenKind::Unknown(format!("\"{}", s)),
            }
        }
    }

    fn character(&mut self) -> TokenKind {
        self.bump();
        match self.bump() {
            Some(ch) if ch != '\'' => {
                if let Some('\'') = self.peek() {
                    self.bump();
                    return TokenKind::Literal(Literal::Char(ch));
                }
                TokenKind::Unknown(format!("'{}", ch))
            }
            _ => TokenKind::Unknown("'".to_string()),
        }
    }

    fn alphabetic(&mut self) -> TokenKind {
        let mut s = String::new();
        while let Some(ch) = self.peek() {
            if !is_phantom_alphabetic(ch) && !is_phantom_digit(ch) {
                break;
            }
            s.push(ch);
            self.bump();
        }
        match Word::from_string(&s) {
            Some(word) => TokenKind::Word(word),
            None => TokenKind::Ident(s.into()),
        }
    }

    fn minutia(&mut self) -> TokenKind {
        let ch = match self.bump() {
            Some(ch) => ch,
            None => return TokenKind::Unknown(String::new()),
        };
        match ch {
            '(' => return TokenKind::LParen,
            ')' => return TokenKind::RParen,
            '{' => return TokenKind::LBrace,
            '}' => return TokenKind::RBrace,
            '[' => return TokenKind::LBracket,
            ']' => return TokenKind::RBracket,
            ',' => return TokenKind::Comma,
            ';' => return TokenKind::Semicolon,
            _ => {}
        }
        if let Some(pk) = self.peek() {
            let pair: String = [ch, pk].iter().collect();
            if let Some(op) = Operator::from_string(&pair) {
                self.bump();
                return TokenKind::Operator(op);
            }
        }
        match Operator::from_string(&ch.to_string()) {
            Some(op) => TokenKind::Operator(op),
            None => TokenKind::Unknown(ch.to_string()),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.whitespace();
        let pk = self.peek()?;
        let start = self.offset();
        let (line, col) = (self.line, self.col);
        let kind = if is_phantom_digit(pk) {
            self.number()
        } else if is_phantom_alphabetic(pk) {
            self.alphabetic()
        } else if pk == '"' {
            self.string()
        } else if pk == '\'' {
            self.character()
        } else {
            self.minutia()
        };
        Some(Token {
            kind,
            span: start..self.offset(),
            line,
            col,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(s: &str) -> Vec<TokenKind> {
        lex(s).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_positions() {
        let tokens = lex("var x = 1;\n  x++;");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[0].col, 1);
        assert_eq!(tokens[0].span, 0..3);
        assert_eq!(tokens[5].kind, TokenKind::Ident("x".into()));
        assert_eq!(tokens[5].line, 2);
        assert_eq!(tokens[5].col, 3);
        assert_eq!(tokens[6].kind, TokenKind::Operator(Operator::Increment));
        assert_eq!(tokens[6].col, 4);
    }

    #[test]
    fn test_dot_without_digit() {
        assert_eq!(
            kinds("1."),
            vec![
                TokenKind::Literal(Literal::Integer("1".to_string())),
                TokenKind::Unknown(".".to_string())
            ]
        );
    }

    #[test]
    fn test_lone_ampersand_is_illegal() {
        assert_eq!(
            kinds("a & b"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Unknown("&".to_string()),
                TokenKind::Ident("b".into())
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(kinds("\"abc"), vec![TokenKind::Unknown("\"abc".to_string())]);
    }
}
