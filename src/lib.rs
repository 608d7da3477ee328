//! A bounded-tape Brainfuck interpreter.
//!
//! Source text is filtered down to the eight operators `><+-.,[]` by the
//! [`loader`]; everything else is a comment. The [`Interpreter`] then runs the
//! resulting [`Program`] on a fresh tape of wrapping byte cells, reading `,`
//! input from any [`std::io::Read`] and writing `.` output to any
//! [`std::io::Write`], and hands back the trimmed output text.
//!
//! ```
//! use bf_tape::{ErrorKind, Interpreter};
//!
//! let mut bf = Interpreter::with_io(std::io::empty(), std::io::sink());
//! bf.set_tape_size(10);
//! let err = bf.interpret("<").expect_err("cannot move left of cell 0");
//! assert_eq!(err.kind(), ErrorKind::SegmentationFault);
//! ```

pub mod cli_util;
pub mod commands;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod jump;
pub mod loader;
pub mod repl;
pub mod tape;
pub mod theme;

pub use error::{ErrorKind, InterpretError, UnmatchedBracketKind};
pub use interpreter::{EofPolicy, Interpreter, InterpreterConfig};
pub use jump::JumpTable;
pub use loader::{bf_only, load, Instruction, Program};
pub use tape::{PointerPolicy, Tape, DEFAULT_TAPE_SIZE};
