use super::codegen::codegen;
use super::link::Frame;
use super::{Address, Link, Opcode, Val};
use crate::lang::ast::Statement;
use crate::lang::Error;
use std::sync::Arc;
use tracing::debug;

/// ## Linked program
///
/// The instruction buffer and constant pool of the most recent compile.

#[derive(Debug, Default)]
pub struct Program {
    link: Link,
    errors: Arc<Vec<Error>>,
}

impl Program {
    pub fn new() -> Program {
        Program::default()
    }

    pub fn clear(&mut self) {
        self.link.clear();
        self.errors = Arc::default();
    }

    pub fn error(&mut self, error: Error) {
        Arc::make_mut(&mut self.errors).push(error);
    }

    pub fn errors(&self) -> &Arc<Vec<Error>> {
        &self.errors
    }

    /// Replace the program with the compiled statements.
    pub fn compile(&mut self, ast: &[Statement]) -> Result<(), Arc<Vec<Error>>> {
        self.clear();
        codegen(self, ast);
        debug!(
            ops = self.link.len(),
            constants = self.link.constants().len(),
            errors = self.errors.len(),
            "compiled"
        );
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Arc::clone(&self.errors))
        }
    }

    pub(super) fn append(&mut self, link: Link) -> Result<(), Error> {
        self.link.append(link)
    }

    pub(super) fn link(&mut self) {
        for error in self.link.link() {
            self.error(error);
        }
    }

    pub fn len(&self) -> usize {
        self.link.len()
    }

    pub fn is_empty(&self) -> bool {
        self.link.is_empty()
    }

    pub fn op(&self, addr: Address) -> Option<&Opcode> {
        self.link.op(addr)
    }

    pub fn ops(&self) -> Vec<Opcode> {
        self.link.ops().cloned().collect()
    }

    pub fn constant(&self, idx: usize) -> Option<&Val> {
        self.link.constant(idx)
    }

    pub fn constants(&self) -> &[Val] {
        self.link.constants()
    }

    pub fn frame_for(&self, addr: Address) -> Option<&Frame> {
        self.link.frame_for(addr)
    }

    /// One line per opcode, constants shown by value.
    pub fn listing(&self) -> Vec<String> {
        self.link
            .ops()
            .map(|op| match op {
                Opcode::Const(idx) => match self.link.constant(*idx) {
                    Some(Val::String(s)) => format!("{} \"{}\"", op.name(), s),
                    Some(val) => format!("{} {}", op.name(), val),
                    None => format!("{} ?", op.name()),
                },
                Opcode::If(addr) | Opcode::Else(addr) | Opcode::Loop(addr) => {
                    format!("{} {}", op.name(), addr)
                }
                Opcode::LoopEnd(addr, _) => format!("{} {}", op.name(), addr),
                _ => op.name().to_string(),
            })
            .collect()
    }
}
