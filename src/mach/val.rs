use super::Address;
use std::rc::Rc;

/// ## Runtime values

#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Integer(i64),
    Double(f64),
    String(Rc<str>),
    Boolean(bool),
    /// Loop state for a condition that is tested again on every pass.
    /// Holds the address of the `LOOP` op that pushed it.
    Next(Address),
}

impl Val {
    pub fn is_truthy(&self) -> bool {
        use Val::*;
        match self {
            Integer(n) => *n != 0,
            Double(n) => *n != 0.0,
            String(s) => !s.is_empty(),
            Boolean(b) => *b,
            Next(_) => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        use Val::*;
        match self {
            Integer(_) => "INTEGER",
            Double(_) => "DOUBLE",
            String(_) => "STRING",
            Boolean(_) => "BOOLEAN",
            Next(_) => "LOOP STATE",
        }
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Val::*;
        match self {
            Integer(n) => write!(f, "{}", n),
            Double(n) => write!(f, "{:.6}", n),
            String(s) => write!(f, "{}", s),
            Boolean(b) => write!(f, "{}", b),
            Next(addr) => write!(f, "<LOOP {}>", addr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy() {
        assert!(Val::Integer(-1).is_truthy());
        assert!(!Val::Integer(0).is_truthy());
        assert!(!Val::Double(0.0).is_truthy());
        assert!(!Val::String("".into()).is_truthy());
        assert!(Val::String("0".into()).is_truthy());
        assert!(!Val::Boolean(false).is_truthy());
    }

    #[test]
    fn test_display() {
        assert_eq!(Val::Double(2.5).to_string(), "2.500000");
        assert_eq!(Val::Integer(-7).to_string(), "-7");
        assert_eq!(Val::Boolean(true).to_string(), "true");
    }
}
