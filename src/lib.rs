//! An interpreter for Codexter, a self-modifying esoteric language whose
//! whole state is one string of decimal digits.
//!
//! The digit string is the tape. The engine walks it left to right and every
//! cell is both an instruction and data: ADD, POP and IO overwrite cells as
//! they execute, a two-digit `77` toggles a flag, and runs of 9s of equal
//! length act as loop brackets while the flag is set. A small double-ended
//! memory bank holds digits between instructions.
//!
//! Features and behaviors:
//! - Reading outside the tape yields 0; writing outside it does nothing.
//! - IO prints a byte taken from the next three cells, or, for non-printable
//!   values, pulls one digit from a [`DigitSource`]; an exhausted source
//!   makes the instruction skip its operands.
//! - ROTATE on an empty memory bank does nothing.
//! - Anything but `0`-`9` in the program is an error before execution starts.
//!
//! Quick start:
//!
//! ```
//! use codexter::{CodexterEngine, DigitQueue};
//!
//! let mut engine = CodexterEngine::new("20722105".to_string());
//! engine.set_input_source(DigitQueue::default());
//! assert_eq!(engine.run().unwrap(), b"Hi");
//! ```

pub mod bank;
pub mod cli_util;
pub mod commands;
pub mod config;
pub mod engine;
pub mod flow;
pub mod input;
pub mod loader;
pub mod repl;
pub mod tape;
pub mod theme;

pub use bank::MemoryBank;
pub use engine::{CodexterEngine, CodexterError, Opcode, StepControl, StepSnapshot};
pub use input::{DigitQueue, DigitSource, LineInput};
pub use tape::Tape;
