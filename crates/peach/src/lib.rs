//! Peach — a single-pass bytecode compiler and stack-based virtual machine
//! for a small dynamically-typed scripting language.
//!
//! Source text is scanned on demand and compiled straight to bytecode by a
//! Pratt parser (there is no AST); the VM then interprets that bytecode
//! with a value stack and a stack of call frames. One [`Vm`] can be reused
//! across calls: globals and interned strings persist, so a REPL's later
//! lines see earlier bindings.
//!
//! # Quick Start
//!
//! ```
//! use peach::Vm;
//!
//! let mut vm = Vm::new();
//! vm.interpret("print 1 + 2 * 3;").unwrap();
//! assert_eq!(vm.take_print_output(), vec!["7"]);
//! ```
//!
//! # Language surface
//!
//! ## Types
//! - `nil`, booleans, 64-bit float numbers, immutable interned strings
//! - first-class functions and closures
//!
//! ## Operators
//! - Arithmetic: `+`, `-`, `*`, `/` (`+` also concatenates strings)
//! - Comparison: `==`, `!=`, `<`, `<=`, `>`, `>=`
//! - Boolean: `and`, `or`, `!` (short-circuiting, value-preserving)
//!
//! ## Statements
//! - `let` declarations (globals at the top level, stack slots in blocks)
//! - `if`/`else`, `while`, blocks, `print`, `return`
//! - `fn` declarations, nested functions, closures capturing enclosing
//!   variables by reference
//!
//! ## Natives
//! - `clock()` — elapsed seconds, installed by default
//! - host functions registered with [`Vm::define_native`]
//!
//! # Not supported
//!
//! - Classes and inheritance (`class`, `super`, `this` are reserved)
//! - `for` loops (`for` is reserved)
//! - String escape sequences
//!
//! # Errors
//!
//! [`Vm::interpret`] returns [`Error::Compile`] with one formatted
//! diagnostic per line, or [`Error::Runtime`] with the message and a stack
//! trace. Both display as the exact text a command-line host should print
//! to stderr.

mod chunk;
mod compiler;
mod debug;
mod error;
mod natives;
mod object;
mod scanner;
mod table;
mod value;
mod vm;

pub use error::{Error, Result};
pub use value::Value;
pub use vm::Vm;

/// Compile `source` and return the disassembly of the script and every
/// function it contains, without executing anything.
///
/// ```
/// let text = peach::disassemble("print 1 + 2;").unwrap();
/// assert!(text.contains("LOAD_CONST"));
/// assert!(text.contains("ADD"));
/// ```
pub fn disassemble(source: &str) -> Result<String> {
    let mut strings = table::Table::new();
    let function = compiler::compile(source, &mut strings)?;
    Ok(debug::disassemble(&function))
}
