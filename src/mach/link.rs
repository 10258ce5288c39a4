use super::{Address, Opcode, Stack, Symbol, Val};
use crate::error;
use crate::lang::{Error, Position};
use std::collections::HashMap;
use std::ops::Range;

type Result<T> = std::result::Result<T, Error>;

/// ## Relocatable code
///
/// A `Link` is a fragment of opcodes with its own constants, labels and
/// jumps waiting on labels. Fragments are appended into bigger fragments
/// until one whole program remains, which is then linked.

#[derive(Debug)]
pub struct Link {
    ops: Stack<Opcode>,
    constants: Vec<Val>,
    symbols: HashMap<Symbol, Address>,
    unlinked: HashMap<Address, (Position, Symbol)>,
    frames: Vec<Frame>,
}

/// Where to resume when a statement fails at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub range: Range<Address>,
    /// Operand stack depth when the statement starts.
    pub depth: usize,
    pub position: Position,
}

impl Default for Link {
    fn default() -> Link {
        Link {
            ops: Stack::new("PROGRAM TOO LARGE"),
            constants: vec![],
            symbols: HashMap::new(),
            unlinked: HashMap::new(),
            frames: vec![],
        }
    }
}

impl Link {
    pub fn new() -> Link {
        Link::default()
    }

    pub fn clear(&mut self) {
        *self = Link::default();
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn op(&self, addr: Address) -> Option<&Opcode> {
        self.ops.get(addr)
    }

    pub fn ops(&self) -> impl Iterator<Item = &Opcode> {
        self.ops.iter()
    }

    pub fn constant(&self, idx: usize) -> Option<&Val> {
        self.constants.get(idx)
    }

    pub fn constants(&self) -> &[Val] {
        &self.constants
    }

    /// The innermost statement containing `addr`.
    pub fn frame_for(&self, addr: Address) -> Option<&Frame> {
        self.frames
            .iter()
            .filter(|f| f.range.contains(&addr))
            .min_by_key(|f| f.range.len())
    }

    pub fn push(&mut self, op: Opcode) -> Result<()> {
        self.ops.push(op)
    }

    pub fn push_const(&mut self, val: Val) -> Result<()> {
        let idx = self.constants.len();
        self.constants.push(val);
        self.ops.push(Opcode::Const(idx))
    }

    pub fn append(&mut self, other: Link) -> Result<()> {
        self.append_at_depth(other, 0)
    }

    /// Append `other` after the last op. Its statements run with
    /// `depth` more values on the operand stack than they assumed.
    pub fn append_at_depth(&mut self, mut other: Link, depth: usize) -> Result<()> {
        let offset = self.ops.len();
        let const_offset = self.constants.len();
        for op in other.ops.drain(..) {
            self.ops.push(match op {
                Opcode::Const(idx) => Opcode::Const(idx + const_offset),
                op => op,
            })?;
        }
        self.constants.append(&mut other.constants);
        for (symbol, addr) in other.symbols {
            self.symbols.insert(symbol, addr + offset);
        }
        for (addr, unlinked) in other.unlinked {
            self.unlinked.insert(addr + offset, unlinked);
        }
        for frame in other.frames {
            self.frames.push(Frame {
                range: (frame.range.start + offset)..(frame.range.end + offset),
                depth: frame.depth + depth,
                position: frame.position,
            });
        }
        Ok(())
    }

    /// Label the next op pushed.
    pub fn push_symbol(&mut self, symbol: Symbol) {
        self.symbols.insert(symbol, self.ops.len());
    }

    pub fn push_if(&mut self, pos: Position, symbol: Symbol) -> Result<()> {
        self.push_unlinked(Opcode::If(0), pos, symbol)
    }

    pub fn push_else(&mut self, pos: Position, symbol: Symbol) -> Result<()> {
        self.push_unlinked(Opcode::Else(0), pos, symbol)
    }

    pub fn push_loop(&mut self, pos: Position, symbol: Symbol) -> Result<()> {
        self.push_unlinked(Opcode::Loop(0), pos, symbol)
    }

    /// `reenter` is the number of ops between the condition start and `LOOP`.
    pub fn push_loop_end(&mut self, pos: Position, symbol: Symbol, reenter: usize) -> Result<()> {
        self.push_unlinked(Opcode::LoopEnd(0, reenter), pos, symbol)
    }

    fn push_unlinked(&mut self, op: Opcode, pos: Position, symbol: Symbol) -> Result<()> {
        self.unlinked.insert(self.ops.len(), (pos, symbol));
        self.ops.push(op)
    }

    /// Record the whole fragment as one statement.
    pub fn frame(&mut self, position: Position) {
        self.frames.push(Frame {
            range: 0..self.ops.len(),
            depth: 0,
            position,
        });
    }

    pub fn link(&mut self) -> Vec<Error> {
        let mut errors: Vec<Error> = vec![];
        for (op_addr, (pos, symbol)) in std::mem::take(&mut self.unlinked) {
            if let Some(dest) = self.symbols.get(&symbol) {
                if let Some(op) = self.ops.get_mut(op_addr) {
                    if let Some(new_op) = match op {
                        Opcode::If(_) => Some(Opcode::If(*dest)),
                        Opcode::Else(_) => Some(Opcode::Else(*dest)),
                        Opcode::Loop(_) => Some(Opcode::Loop(*dest)),
                        Opcode::LoopEnd(_, reenter) => Some(Opcode::LoopEnd(*dest, *reenter)),
                        _ => None,
                    } {
                        *op = new_op;
                        continue;
                    }
                }
            }
            errors.push(error!(InternalError, pos; "LINK FAILURE"));
        }
        self.symbols.clear();
        errors
    }
}
