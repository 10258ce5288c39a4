/*!
## Rust Machine Module

This Rust module is a compiler and virtual machine for Phantom.

*/

pub type Address = usize;
pub type Symbol = isize;

mod codegen;
mod function;
mod link;
mod opcode;
mod operation;
mod program;
mod runtime;
mod stack;
mod val;
mod var;

#[cfg(test)]
mod tests;

pub use function::Function;
pub use link::Frame;
pub use link::Link;
pub use opcode::Opcode;
pub use operation::Operation;
pub use program::Program;
pub use runtime::Config;
pub use runtime::ErrorPolicy;
pub use runtime::Event;
pub use runtime::Runtime;
pub use stack::Stack;
pub use val::Val;
pub use var::Var;
