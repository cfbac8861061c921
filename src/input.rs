//! Digit input for the IO instruction.
//!
//! The engine pulls one digit at a time. A source answers with
//! `Ok(Some(digit))`, with `Ok(None)` once it is exhausted, or with an
//! error when the underlying channel fails.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Something that hands out digits `0..=9` on demand.
pub trait DigitSource {
    fn next_digit(&mut self) -> io::Result<Option<u8>>;
}

type ReadLine = Box<dyn FnMut(&mut String) -> io::Result<usize> + Send>;

/// Line-buffered adapter over a line reader.
///
/// When its queue is empty it blocks for one more line and queues the
/// characters. Non-digit characters are dropped as they are dequeued. A
/// line without digits simply triggers another read; only end-of-stream
/// reports exhaustion. The queue belongs to one adapter, while the lines
/// themselves come from whatever reader it wraps.
pub struct LineInput {
    read_line: ReadLine,
    pending: VecDeque<char>,
    prompt: Option<String>,
    exhausted: bool,
}

impl LineInput {
    /// Wrap an owned reader; lines it buffers past the last one consumed
    /// are dropped with the adapter.
    pub fn new<R>(mut reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        Self::from_fn(move |line| reader.read_line(line))
    }

    /// Read process stdin one line at a time through its shared buffer, so
    /// unread lines stay available to the next adapter.
    pub fn stdin() -> Self {
        Self::from_fn(|line| io::stdin().read_line(line))
    }

    fn from_fn<F>(read_line: F) -> Self
    where
        F: FnMut(&mut String) -> io::Result<usize> + Send + 'static,
    {
        Self {
            read_line: Box::new(read_line),
            pending: VecDeque::new(),
            prompt: None,
            exhausted: false,
        }
    }

    /// Print `prompt` to stderr before each blocking read.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    fn refill(&mut self) -> io::Result<bool> {
        if self.exhausted {
            return Ok(false);
        }

        if let Some(prompt) = self.prompt.as_deref() {
            eprint!("{prompt}");
            let _ = io::stderr().flush();
        }

        let mut line = String::new();
        if (self.read_line)(&mut line)? == 0 {
            self.exhausted = true;
            return Ok(false);
        }
        self.pending.extend(line.chars());
        Ok(true)
    }
}

impl DigitSource for LineInput {
    fn next_digit(&mut self) -> io::Result<Option<u8>> {
        loop {
            while let Some(ch) = self.pending.pop_front() {
                if let Some(d) = ch.to_digit(10) {
                    return Ok(Some(d as u8));
                }
            }
            if !self.refill()? {
                return Ok(None);
            }
        }
    }
}

/// A pre-filled source, handy for tests and scripted runs.
#[derive(Debug, Clone, Default)]
pub struct DigitQueue {
    digits: VecDeque<u8>,
}

impl DigitQueue {
    /// Queue every ASCII digit found in `text`; everything else is dropped.
    pub fn from_text(text: &str) -> Self {
        Self {
            digits: text
                .chars()
                .filter_map(|c| c.to_digit(10))
                .map(|d| d as u8)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }
}

impl DigitSource for DigitQueue {
    fn next_digit(&mut self) -> io::Result<Option<u8>> {
        Ok(self.digits.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn line_input_skips_non_digits() {
        let mut input = LineInput::new(Cursor::new("a4 b\n"));
        assert_eq!(input.next_digit().unwrap(), Some(4));
        assert_eq!(input.next_digit().unwrap(), None);
    }

    #[test]
    fn line_input_reads_more_lines_on_demand() {
        let mut input = LineInput::new(Cursor::new("12\n\nxyz\n3\n"));
        assert_eq!(input.next_digit().unwrap(), Some(1));
        assert_eq!(input.next_digit().unwrap(), Some(2));
        // The empty line and the digit-free line are consumed on the way to 3.
        assert_eq!(input.next_digit().unwrap(), Some(3));
        assert_eq!(input.next_digit().unwrap(), None);
    }

    #[test]
    fn line_input_stays_exhausted() {
        let mut input = LineInput::new(Cursor::new(""));
        assert_eq!(input.next_digit().unwrap(), None);
        assert_eq!(input.next_digit().unwrap(), None);
    }

    #[test]
    fn line_input_handles_missing_trailing_newline() {
        let mut input = LineInput::new(Cursor::new("98"));
        assert_eq!(input.next_digit().unwrap(), Some(9));
        assert_eq!(input.next_digit().unwrap(), Some(8));
        assert_eq!(input.next_digit().unwrap(), None);
    }

    #[test]
    fn unread_lines_stay_with_the_shared_reader() {
        use std::sync::{Arc, Mutex};

        // Two adapters over one reader, the way consecutive runs share stdin.
        let shared = Arc::new(Mutex::new(Cursor::new("1 9\n2\n")));
        let read_from = |shared: &Arc<Mutex<Cursor<&'static str>>>| {
            let shared = Arc::clone(shared);
            LineInput::from_fn(move |line| match shared.lock() {
                Ok(mut reader) => reader.read_line(line),
                Err(_) => Ok(0),
            })
        };

        let mut first = read_from(&shared);
        assert_eq!(first.next_digit().unwrap(), Some(1));
        drop(first);

        // The rest of the first line was queued by the dropped adapter.
        let mut second = read_from(&shared);
        assert_eq!(second.next_digit().unwrap(), Some(2));
        assert_eq!(second.next_digit().unwrap(), None);
    }

    #[test]
    fn digit_queue_drains_in_order() {
        let mut q = DigitQueue::from_text("5, 6");
        assert_eq!(q.len(), 2);
        assert_eq!(q.next_digit().unwrap(), Some(5));
        assert_eq!(q.next_digit().unwrap(), Some(6));
        assert_eq!(q.next_digit().unwrap(), None);
        assert!(q.is_empty());
    }
}
