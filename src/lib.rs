//! Brainf**k compiler and virtual machine.
//!
//! Source is compiled in a single pass into a flat list of run-length folded
//! instructions, which a [`VirtualMachine`] then executes over a tape of any
//! fixed-width integer cell.
//!
//! ```
//! use tapevm::Brainfuck;
//!
//! let mut vm = Brainfuck::new("++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.").unwrap();
//! assert!(vm.diagnostic().is_success());
//! assert_eq!(vm.run_text("", 0).unwrap(), "H");
//! ```

pub mod bytecode;
pub mod cell;
pub mod compiler;
pub mod interpreter;
pub mod io;
pub mod lexer;

pub use bytecode::{Instruction, Op};
pub use cell::Cell;
pub use compiler::{compile, CompileDiagnostic, CompileError, Compiled};
pub use interpreter::{MachineConfig, RunOutcome, RuntimeError, Tape, VirtualMachine};
pub use io::{Input, Output};

pub type Brainfuck = VirtualMachine<u8>;
pub type I8Brainfuck = VirtualMachine<i8>;
pub type U16Brainfuck = VirtualMachine<u16>;
pub type I16Brainfuck = VirtualMachine<i16>;
pub type U32Brainfuck = VirtualMachine<u32>;
pub type I32Brainfuck = VirtualMachine<i32>;
pub type U64Brainfuck = VirtualMachine<u64>;
pub type I64Brainfuck = VirtualMachine<i64>;
