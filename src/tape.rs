//! The self-modifying program tape.
//!
//! A Codexter program is its own working memory: every cell is a decimal
//! digit that is read as an opcode when the instruction pointer reaches it
//! and as an operand when a neighbouring instruction looks at it.
//!
//! Reads outside the tape yield `0` and writes outside it are dropped. Both
//! happen constantly (ADD at cell 0 reads positions -1 and -2, IO near the
//! end writes past the last cell), so positions are signed and never panic.

use std::fmt;

use crate::CodexterError;

/// A fixed-length sequence of digits `0..=9`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
}

impl Tape {
    /// Build a tape from program text.
    ///
    /// The text must be non-empty and contain only ASCII digits; anything
    /// else is rejected before a single instruction runs.
    pub fn parse(code: &str) -> Result<Self, CodexterError> {
        if code.is_empty() {
            return Err(CodexterError::EmptyProgram);
        }

        let mut cells = Vec::with_capacity(code.len());
        for (ip, ch) in code.chars().enumerate() {
            let Some(digit) = ch.to_digit(10) else {
                return Err(CodexterError::InvalidCharacter { ch, ip });
            };
            cells.push(digit as u8);
        }

        Ok(Self { cells })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Digit at `pos`, or `0` when `pos` is outside the tape.
    #[inline]
    pub fn read(&self, pos: isize) -> u8 {
        usize::try_from(pos)
            .ok()
            .and_then(|p| self.cells.get(p).copied())
            .unwrap_or(0)
    }

    /// Store `value % 10` at `pos`; a no-op when `pos` is outside the tape.
    #[inline]
    pub fn write(&mut self, pos: isize, value: u8) {
        if let Some(cell) = usize::try_from(pos).ok().and_then(|p| self.cells.get_mut(p)) {
            *cell = value % 10;
        }
    }

    /// Index of the first cell after `from` holding `digit`.
    pub fn find_after(&self, from: usize, digit: u8) -> Option<usize> {
        let start = from.checked_add(1)?;
        self.cells
            .get(start..)?
            .iter()
            .position(|&d| d == digit)
            .map(|offset| start + offset)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.cells {
            write!(f, "{d}")?;
        }
        Ok(())
    }
}
