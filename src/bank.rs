//! The auxiliary memory bank used by PUSH, POP, ROTATE and printable IO.

use std::collections::VecDeque;

/// A double-ended stack of digits. The "front" is the top of the stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBank {
    values: VecDeque<u8>,
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, digit: u8) {
        self.values.push_front(digit % 10);
    }

    pub fn pop(&mut self) -> Option<u8> {
        self.values.pop_front()
    }

    /// Pop the front value, or `0` when the bank is empty.
    pub fn pop_or_zero(&mut self) -> u8 {
        self.pop().unwrap_or(0)
    }

    pub fn peek(&self) -> Option<u8> {
        self.values.front().copied()
    }

    /// Move the front value to the back. Returns `false` (and does nothing)
    /// when the bank is empty.
    pub fn rotate(&mut self) -> bool {
        match self.values.pop_front() {
            Some(v) => {
                self.values.push_back(v);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in front-to-back order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.values.iter().copied()
    }
}
