//! # Phantom
//!
//! A small imperative scripting language. Source text is parsed into an
//! abstract syntax tree, compiled to a flat opcode stream with a constant
//! pool, and executed on a stack virtual machine.
//!
//! ```
//! use phantom::mach::{Event, Runtime};
//!
//! let mut runtime = Runtime::default();
//! runtime.enter("var x = 5; loop (2) { x = x * 2; } x + 1;");
//! let mut output = String::new();
//! loop {
//!     match runtime.execute(1000) {
//!         Event::Print(s) => output.push_str(&s),
//!         Event::Running => {}
//!         _ => break,
//!     }
//! }
//! assert_eq!(output, "21\n");
//! ```
//!
//! Globals persist across calls to `enter`, so one `Runtime` serves a
//! whole interactive session.

pub mod lang;
pub mod mach;
