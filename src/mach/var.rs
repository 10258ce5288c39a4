use super::Val;
use crate::error;
use crate::lang::Error;
use std::collections::HashMap;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Global Table
///
/// One flat namespace for the whole session. Each value is owned by its
/// entry and dropped when overwritten or cleared.

#[derive(Debug, Default)]
pub struct Var {
    vars: HashMap<Rc<str>, Val>,
}

impl Var {
    pub fn new() -> Var {
        Var::default()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn contains(&self, var_name: &str) -> bool {
        self.vars.contains_key(var_name)
    }

    pub fn get(&self, var_name: &str) -> Option<&Val> {
        self.vars.get(var_name)
    }

    pub fn insert(&mut self, var_name: &Rc<str>, value: Val) -> Result<()> {
        if self.vars.len() >= u16::max_value() as usize {
            return Err(error!(OutOfMemory; "TOO MANY VARIABLES"));
        }
        self.vars.insert(var_name.clone(), value);
        Ok(())
    }

    pub fn update(&mut self, var_name: &str, value: Val) -> Result<()> {
        match self.vars.get_mut(var_name) {
            Some(var) => {
                *var = value;
                Ok(())
            }
            None => Err(error!(UndefinedVariable; var_name)),
        }
    }

    /// Declaration and assignment share one path: overwrite when present.
    pub fn store(&mut self, var_name: &Rc<str>, value: Val) -> Result<()> {
        if self.contains(var_name) {
            self.update(var_name, value)
        } else {
            self.insert(var_name, value)
        }
    }

    /// Add `delta` to a numeric global in place and return the new value.
    pub fn increment(&mut self, var_name: &str, delta: i64) -> Result<Val> {
        let var = match self.vars.get_mut(var_name) {
            Some(var) => var,
            None => return Err(error!(UndefinedVariable; var_name)),
        };
        let value = match var {
            Val::Integer(n) => match n.checked_add(delta) {
                Some(n) => Val::Integer(n),
                None => return Err(error!(Overflow)),
            },
            Val::Double(n) => Val::Double(*n + delta as f64),
            _ => return Err(error!(TypeMismatch)),
        };
        *var = value.clone();
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_store_overwrites() {
        let mut var = Var::new();
        let name: Rc<str> = "x".into();
        var.store(&name, Val::Integer(1)).unwrap();
        var.store(&name, Val::String("one".into())).unwrap();
        assert_eq!(var.len(), 1);
        assert_eq!(var.get("x"), Some(&Val::String("one".into())));
    }

    #[test]
    fn test_increment() {
        let mut var = Var::new();
        var.insert(&"i".into(), Val::Integer(1)).unwrap();
        var.insert(&"d".into(), Val::Double(0.5)).unwrap();
        var.insert(&"s".into(), Val::String("s".into())).unwrap();
        assert_eq!(var.increment("i", 1), Ok(Val::Integer(2)));
        assert_eq!(var.get("i"), Some(&Val::Integer(2)));
        assert_eq!(var.increment("d", -1), Ok(Val::Double(-0.5)));
        assert!(var.increment("s", 1).unwrap_err().is(ErrorCode::TypeMismatch));
        assert!(var
            .increment("nope", 1)
            .unwrap_err()
            .is(ErrorCode::UndefinedVariable));
    }

    #[test]
    fn test_update_requires_entry() {
        let mut var = Var::new();
        let e = var.update("x", Val::Integer(1)).unwrap_err();
        assert!(e.is(ErrorCode::UndefinedVariable));
        assert!(var.is_empty());
    }
}
