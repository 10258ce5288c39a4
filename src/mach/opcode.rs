use super::Address;
use crate::lang::Operator;

/// ## Virtual machine instruction set
///
/// The Phantom virtual machine has no registers.
/// Every operation is performed on the stack.
///
/// For example: `x = 3 * y;` compiles to
/// `[Const("x"), Const(3), Const("y"), VarGet, Mul, VarDecl]`
///
/// Jump targets are absolute addresses filled in when the program is linked.

#[derive(Clone, Copy, PartialEq)]
pub enum Opcode {
    // *** Stack manipulation
    /// Push the constant pool entry at this index.
    Const(usize),
    /// Pop and print.
    Pop,
    /// Pop value then name; insert or overwrite the global.
    VarDecl,
    /// Pop name and push the value of that global.
    VarGet,
    /// Pop name, add one to the global in place, push the new value.
    Inc,
    /// Pop name, subtract one from the global in place, push the new value.
    Dec,

    // *** Branch control
    /// Pop condition and branch to Address if it is not truthy.
    If(Address),
    /// End of a taken then-branch. Branch to Address, the `JumpEnd`.
    Else(Address),
    /// Marks the end of an `if`. No operation.
    JumpEnd,
    /// Pop condition. Exits to Address when the loop is finished,
    /// otherwise pushes loop state and falls into the body.
    Loop(Address),
    /// Pop loop state. Counters branch back to the `Loop` at Address,
    /// other conditions are evaluated again starting `usize` ops before it.
    LoopEnd(Address, usize),

    // *** Expression operations
    Neg,
    Not,
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,

    // *** Built-in functions
    Stdin,
    Rand,

    Exit,
}

impl Opcode {
    pub fn for_binary(op: Operator) -> Option<Opcode> {
        use Operator::*;
        Some(match op {
            Plus => Opcode::Add,
            Minus => Opcode::Sub,
            Multiply => Opcode::Mul,
            Divide => Opcode::Div,
            Modulo => Opcode::Mod,
            And => Opcode::And,
            Or => Opcode::Or,
            Less => Opcode::Lt,
            LessEqual => Opcode::LtEq,
            Greater => Opcode::Gt,
            GreaterEqual => Opcode::GtEq,
            Equal => Opcode::Eq,
            NotEqual => Opcode::NotEq,
            Assign | Bang | Increment | Decrement => return None,
        })
    }

    pub fn for_unary(op: Operator) -> Option<Opcode> {
        match op {
            Operator::Minus => Some(Opcode::Neg),
            Operator::Bang => Some(Opcode::Not),
            _ => None,
        }
    }

    /// Name as shown in disassembly.
    pub fn name(&self) -> &'static str {
        use Opcode::*;
        match self {
            Const(_) => "CONST",
            Pop => "POP",
            VarDecl => "VAR_DECL",
            VarGet => "VAR_GET",
            Inc => "INC",
            Dec => "DEC",
            If(_) => "IF",
            Else(_) => "ELSE",
            JumpEnd => "JUMP_END",
            Loop(_) => "LOOP",
            LoopEnd(..) => "LOOP_END",
            Neg => "NEG",
            Not => "NOT",
            Mul => "MUL",
            Div => "DIV",
            Mod => "MOD",
            Add => "ADD",
            Sub => "SUB",
            Eq => "EQ",
            NotEq => "NOT_EQ",
            Lt => "LT",
            LtEq => "LT_EQ",
            Gt => "GT",
            GtEq => "GT_EQ",
            And => "AND",
            Or => "OR",
            Stdin => "STDIN",
            Rand => "RAND",
            Exit => "EXIT",
        }
    }
}

impl std::fmt::Debug for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Opcode::*;
        match self {
            Const(idx) => write!(f, "{}({})", self.name(), idx),
            If(addr) | Else(addr) | Loop(addr) => write!(f, "{}({})", self.name(), addr),
            LoopEnd(addr, len) => write!(f, "{}({}, {})", self.name(), addr, len),
            _ => write!(f, "{}", self.name()),
        }
    }
}
