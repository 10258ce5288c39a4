use super::Position;

#[derive(Clone, PartialEq)]
pub struct Error {
    code: u16,
    position: Option<Position>,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $pos:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_position($pos)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $pos:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_position($pos)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code: code as u16,
            position: None,
            message: String::new(),
        }
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code as u16
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn in_position(self, position: Position) -> Error {
        debug_assert!(self.position.is_none());
        Error {
            position: Some(position),
            ..self
        }
    }

    /// Attach a position unless the error already carries one.
    pub fn or_position(self, position: Position) -> Error {
        match self.position {
            Some(_) => self,
            None => self.in_position(position),
        }
    }

    pub fn message(self, message: &str) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        Error {
            message: message.to_string(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Break = 1,
    SyntaxError = 2,
    IllegalFunctionCall = 5,
    Overflow = 6,
    OutOfMemory = 7,
    DivisionByZero = 11,
    TypeMismatch = 13,
    UndefinedVariable = 24,
    InternalError = 51,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = match self.code {
            1 => "BREAK",
            2 => "SYNTAX ERROR",
            5 => "ILLEGAL FUNCTION CALL",
            6 => "OVERFLOW",
            7 => "OUT OF MEMORY",
            11 => "DIVISION BY ZERO",
            13 => "TYPE MISMATCH",
            24 => "UNDEFINED VARIABLE",
            51 => "INTERNAL ERROR",
            _ => "",
        };
        let mut suffix = String::new();
        if let Some(position) = self.position {
            suffix.push_str(&format!(" IN {}", position));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        if code_str.is_empty() {
            write!(f, "PROGRAM ERROR {}{}", self.code, suffix)
        } else {
            write!(f, "{}{}", code_str, suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(error!(TypeMismatch).to_string(), "TYPE MISMATCH");
        assert_eq!(
            error!(SyntaxError, Position::new(3, 7); "EXPECTED EXPRESSION").to_string(),
            "SYNTAX ERROR IN 3:7; EXPECTED EXPRESSION"
        );
        assert_eq!(
            error!(DivisionByZero; "10 / 0").to_string(),
            "DIVISION BY ZERO; 10 / 0"
        );
    }

    #[test]
    fn test_or_position_keeps_first() {
        let e = error!(Overflow, Position::new(1, 2)).or_position(Position::new(9, 9));
        assert_eq!(e.position(), Some(Position::new(1, 2)));
        assert!(e.is(ErrorCode::Overflow));
    }
}
