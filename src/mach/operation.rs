use super::Val;
use crate::error;
use crate::lang::Error;
use std::cmp::Ordering;

type Result<T> = std::result::Result<T, Error>;

/// ## Operators
///
/// Arithmetic never mixes Integer and Double. Comparisons between values
/// that cannot be ordered are simply false.

pub struct Operation {}

impl Operation {
    pub fn negate(val: Val) -> Result<Val> {
        use Val::*;
        match val {
            Integer(n) => match n.checked_neg() {
                Some(n) => Ok(Integer(n)),
                None => Err(error!(Overflow)),
            },
            Double(n) => Ok(Double(-n)),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn not(val: Val) -> Result<Val> {
        match val {
            Val::Next(_) => Err(error!(TypeMismatch)),
            val => Ok(Val::Boolean(!val.is_truthy())),
        }
    }

    pub fn sum(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => match l.checked_add(r) {
                Some(i) => Ok(Integer(i)),
                None => Err(error!(Overflow)),
            },
            (Double(l), Double(r)) => Ok(Double(l + r)),
            (String(l), String(r)) => Ok(String((l.to_string() + &r).into())),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn subtract(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => match l.checked_sub(r) {
                Some(i) => Ok(Integer(i)),
                None => Err(error!(Overflow)),
            },
            (Double(l), Double(r)) => Ok(Double(l - r)),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn multiply(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => match l.checked_mul(r) {
                Some(i) => Ok(Integer(i)),
                None => Err(error!(Overflow)),
            },
            (Double(l), Double(r)) => Ok(Double(l * r)),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn divide(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => match l.checked_div(r) {
                Some(i) => Ok(Integer(i)),
                None => {
                    if r == 0 {
                        Err(error!(DivisionByZero))
                    } else {
                        Err(error!(Overflow))
                    }
                }
            },
            (Double(l), Double(r)) => {
                if r == 0.0 {
                    Err(error!(DivisionByZero))
                } else {
                    Ok(Double(l / r))
                }
            }
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn modulo(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => match l.checked_rem(r) {
                Some(i) => Ok(Integer(i)),
                None => {
                    if r == 0 {
                        Err(error!(DivisionByZero))
                    } else {
                        Err(error!(Overflow))
                    }
                }
            },
            (Double(_), Double(_)) => Err(error!(TypeMismatch; "MODULO OF DOUBLES")),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn and(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Boolean(
            Operation::truth(&lhs)? && Operation::truth(&rhs)?,
        ))
    }

    pub fn or(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Boolean(
            Operation::truth(&lhs)? || Operation::truth(&rhs)?,
        ))
    }

    fn truth(val: &Val) -> Result<bool> {
        match val {
            Val::Next(_) => Err(error!(TypeMismatch)),
            val => Ok(val.is_truthy()),
        }
    }

    pub fn equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Boolean(Operation::ordering(&lhs, &rhs) == Some(Ordering::Equal)))
    }

    pub fn not_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Boolean(matches!(
            Operation::ordering(&lhs, &rhs),
            Some(Ordering::Less) | Some(Ordering::Greater)
        )))
    }

    pub fn less(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Boolean(Operation::ordering(&lhs, &rhs) == Some(Ordering::Less)))
    }

    pub fn less_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Boolean(match Operation::ordering(&lhs, &rhs) {
            Some(Ordering::Less) | Some(Ordering::Equal) => true,
            _ => false,
        }))
    }

    pub fn greater(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Boolean(Operation::ordering(&lhs, &rhs) == Some(Ordering::Greater)))
    }

    pub fn greater_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Boolean(match Operation::ordering(&lhs, &rhs) {
            Some(Ordering::Greater) | Some(Ordering::Equal) => true,
            _ => false,
        }))
    }

    fn ordering(lhs: &Val, rhs: &Val) -> Option<Ordering> {
        use Val::*;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => Some(l.cmp(r)),
            (Integer(l), Double(r)) => (*l as f64).partial_cmp(r),
            (Double(l), Integer(r)) => l.partial_cmp(&(*r as f64)),
            (Double(l), Double(r)) => l.partial_cmp(r),
            (String(l), String(r)) => Some(l.cmp(r)),
            (Boolean(l), Boolean(r)) => Some(l.cmp(r)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_arithmetic_kinds() {
        assert_eq!(
            Operation::sum(Val::Integer(2), Val::Integer(3)),
            Ok(Val::Integer(5))
        );
        assert_eq!(
            Operation::sum(Val::String("ab".into()), Val::String("cd".into())),
            Ok(Val::String("abcd".into()))
        );
        let e = Operation::sum(Val::Integer(1), Val::Double(2.5)).unwrap_err();
        assert!(e.is(ErrorCode::TypeMismatch));
        let e = Operation::multiply(Val::Integer(i64::MAX), Val::Integer(2)).unwrap_err();
        assert!(e.is(ErrorCode::Overflow));
    }

    #[test]
    fn test_division_by_zero() {
        for (l, r) in vec![
            (Val::Integer(1), Val::Integer(0)),
            (Val::Double(1.0), Val::Double(0.0)),
        ] {
            let e = Operation::divide(l, r).unwrap_err();
            assert!(e.is(ErrorCode::DivisionByZero));
        }
        let e = Operation::modulo(Val::Integer(1), Val::Integer(0)).unwrap_err();
        assert!(e.is(ErrorCode::DivisionByZero));
        let e = Operation::modulo(Val::Double(1.0), Val::Double(2.0)).unwrap_err();
        assert!(e.is(ErrorCode::TypeMismatch));
        assert_eq!(
            Operation::modulo(Val::Integer(-7), Val::Integer(3)),
            Ok(Val::Integer(-1))
        );
    }

    #[test]
    fn test_compare() {
        assert_eq!(
            Operation::less(Val::Integer(1), Val::Double(1.5)),
            Ok(Val::Boolean(true))
        );
        assert_eq!(
            Operation::equal(Val::Double(2.0), Val::Integer(2)),
            Ok(Val::Boolean(true))
        );
        assert_eq!(
            Operation::equal(Val::Integer(1), Val::String("1".into())),
            Ok(Val::Boolean(false))
        );
        assert_eq!(
            Operation::greater_equal(Val::Double(std::f64::NAN), Val::Double(0.0)),
            Ok(Val::Boolean(false))
        );
        assert_eq!(
            Operation::not_equal(Val::Boolean(true), Val::Boolean(false)),
            Ok(Val::Boolean(true))
        );
        assert_eq!(
            Operation::not_equal(Val::Integer(1), Val::String("1".into())),
            Ok(Val::Boolean(false))
        );
        assert_eq!(
            Operation::not_equal(Val::Double(std::f64::NAN), Val::Double(0.0)),
            Ok(Val::Boolean(false))
        );
    }

    #[test]
    fn test_logic() {
        assert_eq!(
            Operation::and(Val::Integer(1), Val::String("".into())),
            Ok(Val::Boolean(false))
        );
        assert_eq!(
            Operation::or(Val::Integer(0), Val::Double(0.5)),
            Ok(Val::Boolean(true))
        );
        assert_eq!(Operation::not(Val::Integer(0)), Ok(Val::Boolean(true)));
        assert!(Operation::negate(Val::String("a".into())).is_err());
    }
}
