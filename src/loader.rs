//! Turning source text into a runnable digit string.
//!
//! Source files may spread a program over many lines and annotate it with
//! `#` comments. Loading removes every comment (from `#` to the end of the
//! line) and all whitespace, and concatenates what is left. Nothing else is
//! filtered, so a stray letter still reaches the engine and is reported as
//! an invalid character with its position.

use std::fs;
use std::io;
use std::path::Path;

/// Strip comments and whitespace from `text`.
pub fn strip_source(text: &str) -> String {
    let mut program = String::with_capacity(text.len());
    for line in text.lines() {
        // A comment starts at the `#` itself, so `123#456` keeps `123`
        // rather than losing the whole glued chunk.
        let code = match line.find('#') {
            Some(idx) => &line[..idx],
            None => line,
        };
        for chunk in code.split_whitespace() {
            program.push_str(chunk);
        }
    }
    program
}

/// Read a source file and strip it.
pub fn load_file(path: impl AsRef<Path>) -> io::Result<String> {
    let text = fs::read_to_string(path)?;
    Ok(strip_source(&text))
}
