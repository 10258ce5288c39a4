use super::Val;
use crate::error;
use crate::lang::Error;
use rand::Rng;

type Result<T> = std::result::Result<T, Error>;

pub struct Function {}

impl Function {
    /// Value of one whitespace-delimited token read by `stdin`.
    pub fn input(token: &str) -> Val {
        match token.parse::<i64>() {
            Ok(n) => Val::Integer(n),
            Err(_) => Val::String(token.into()),
        }
    }

    /// Integer in `[0, bound)`.
    pub fn rand<R: Rng>(bound: Val, rng: &mut R) -> Result<Val> {
        match bound {
            Val::Integer(n) if n > 0 => Ok(Val::Integer(rng.gen_range(0..n))),
            Val::Integer(_) => Err(error!(IllegalFunctionCall; "RAND BOUND MUST BE POSITIVE")),
            _ => Err(error!(TypeMismatch)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_input() {
        assert_eq!(Function::input("42"), Val::Integer(42));
        assert_eq!(Function::input("-3"), Val::Integer(-3));
        assert_eq!(Function::input("4.5"), Val::String("4.5".into()));
        assert_eq!(Function::input("abc"), Val::String("abc".into()));
    }

    #[test]
    fn test_rand() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            match Function::rand(Val::Integer(3), &mut rng) {
                Ok(Val::Integer(n)) => assert!((0..3).contains(&n)),
                r => panic!("{:?}", r),
            }
        }
        let e = Function::rand(Val::Integer(0), &mut rng).unwrap_err();
        assert!(e.is(ErrorCode::IllegalFunctionCall));
        let e = Function::rand(Val::Double(2.0), &mut rng).unwrap_err();
        assert!(e.is(ErrorCode::TypeMismatch));
    }
}
