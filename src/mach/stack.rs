use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Stack enforced and size limited vector

pub struct Stack<T> {
    overflow_message: &'static str,
    limit: usize,
    vec: Vec<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.vec)
    }
}

impl<T> Stack<T> {
    pub fn new(overflow_message: &'static str) -> Stack<T> {
        Stack::with_limit(overflow_message, u16::max_value() as usize)
    }
    pub fn with_limit(overflow_message: &'static str, limit: usize) -> Stack<T> {
        Stack {
            overflow_message,
            limit,
            vec: vec![],
        }
    }
    fn overflow_check(&self, additional: usize) -> Result<()> {
        if self.vec.len() + additional > self.limit {
            Err(error!(OutOfMemory; self.overflow_message))
        } else {
            Ok(())
        }
    }
    fn underflow_error(&self) -> Error {
        error!(InternalError; "UNDERFLOW")
    }
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.vec.get_mut(index)
    }
    pub fn clear(&mut self) {
        self.vec.clear()
    }
    pub fn truncate(&mut self, len: usize) {
        self.vec.truncate(len)
    }
    pub fn drain<R>(&mut self, range: R) -> std::vec::Drain<'_, T>
    where
        R: std::ops::RangeBounds<usize>,
    {
        self.vec.drain(range)
    }
    pub fn len(&self) -> usize {
        self.vec.len()
    }
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.vec.get(idx)
    }
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.vec.iter()
    }
    pub fn push(&mut self, val: T) -> Result<()> {
        self.overflow_check(1)?;
        self.vec.push(val);
        Ok(())
    }
    pub fn pop(&mut self) -> Result<T> {
        match self.vec.pop() {
            Some(v) => Ok(v),
            None => Err(self.underflow_error()),
        }
    }
    pub fn pop_2(&mut self) -> Result<(T, T)> {
        let two = self.pop()?;
        let one = self.pop()?;
        Ok((one, two))
    }
    pub fn pop_n(&mut self, len: usize) -> Result<Vec<T>> {
        if len > self.vec.len() {
            Err(self.underflow_error())
        } else {
            let range = (self.vec.len() - len)..;
            Ok(self.vec.drain(range).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_limit() {
        let mut stack: Stack<u8> = Stack::with_limit("STACK OVERFLOW", 2);
        assert!(stack.push(1).is_ok());
        assert!(stack.push(2).is_ok());
        let e = stack.push(3).unwrap_err();
        assert!(e.is(ErrorCode::OutOfMemory));
        assert_eq!(e.to_string(), "OUT OF MEMORY; STACK OVERFLOW");
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_pop_order() {
        let mut stack: Stack<u8> = Stack::new("");
        for n in 1..=4 {
            stack.push(n).unwrap();
        }
        assert_eq!(stack.pop_2().unwrap(), (3, 4));
        assert_eq!(stack.pop_n(2).unwrap(), vec![1, 2]);
        assert!(stack.pop().unwrap_err().is(ErrorCode::InternalError));
    }
}
