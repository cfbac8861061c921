use std::io::{self, Write};

use nu_ansi_term::Style;

use crate::config::Colors;
use crate::engine::StepSnapshot;
use crate::CodexterError;

/// Cells shown on either side of the instruction pointer.
const WINDOW_CHARS: usize = 32;

/// Pretty-print a structured CodexterError with caret positioning.
/// If `program` is `Some("codexter")`, prefix messages with "codexter: ..." for CLI run mode
pub fn print_engine_error(program: Option<&str>, code: &str, err: &CodexterError) {
    let prefix_program = |msg: &str| {
        if let Some(p) = program {
            format!("{p}: {msg}")
        } else {
            msg.to_string()
        }
    };

    match err {
        CodexterError::EmptyProgram => {
            eprintln!("{}", prefix_program("Parse error: empty program"));
            let _ = io::stderr().flush();
        }
        CodexterError::InvalidCharacter { ch, ip } => {
            let msg = prefix_program(&format!("Parse error: invalid character '{ch}'"));
            print_error_with_context(&msg, code, *ip);
        }
        CodexterError::IoError { ip, source } => {
            let msg = prefix_program(&format!("I/O error: {source}"));
            print_error_with_context(&msg, code, *ip);
        }
        CodexterError::StepLimitExceeded { .. } | CodexterError::Canceled => {
            eprintln!("{err}");
            let _ = io::stderr().flush();
        }
    }
}

/// Print a concise error with instruction index and a caret context window,
/// working with UTF-8 by slicing using char indices.
pub fn print_error_with_context(prefix: &str, code: &str, pos: usize) {
    eprintln!("{prefix} at instruction {pos}");
    let (slice, caret) = context_window(code, pos);
    eprintln!("  {slice}");
    eprintln!("  {caret}");
    let _ = io::stderr().flush();
}

/// A window of `code` around char index `pos`, plus a caret line pointing at it.
fn context_window(code: &str, pos: usize) -> (&str, String) {
    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let start_byte = char_to_byte_index(code, start_char);
    let end_byte = char_to_byte_index(code, end_char.max(start_char));
    let slice = &code[start_byte..end_byte];

    let mut underline = " ".repeat(pos.saturating_sub(start_char));
    underline.push('^');
    (slice, underline)
}

/// Convert a char index into a byte index in the given UTF-8 string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(byte_idx, _)| byte_idx)
}

/// Render one step for `--trace`: a header line, the tape window with the
/// cell under the cursor highlighted, and a caret line.
///
/// With `colors` set, digits are painted per opcode; otherwise plain text.
pub fn render_snapshot(snap: &StepSnapshot<'_>, colors: Option<&Colors>) -> String {
    let bank: Vec<String> = snap.bank.iter().map(|d| d.to_string()).collect();
    let flag = if snap.flag { "on" } else { "off" };
    let flag = match colors {
        Some(c) if snap.flag => c.flag_on.bold().paint(flag).to_string(),
        _ => flag.to_string(),
    };

    let header = format!(
        "step {} | ip {} | {} | flag {} | bank [{}] | out {:?}",
        snap.step,
        snap.ip,
        snap.opcode.mnemonic(),
        flag,
        bank.join(" "),
        String::from_utf8_lossy(snap.output),
    );

    let cells = snap.tape.as_slice();
    let start = snap.ip.saturating_sub(WINDOW_CHARS);
    let end = (snap.ip + WINDOW_CHARS + 1).min(cells.len());

    let mut tape = String::new();
    for (idx, &d) in cells.iter().enumerate().take(end).skip(start) {
        let digit = char::from(b'0' + d).to_string();
        match colors {
            Some(c) if idx == snap.ip => tape.push_str(&c.pointer.reverse().bold().paint(digit).to_string()),
            Some(c) => tape.push_str(&Style::new().fg(c.for_digit(d)).paint(digit).to_string()),
            None => tape.push_str(&digit),
        }
    }

    let mut caret = " ".repeat(snap.ip - start);
    caret.push('^');

    format!("{header}\n  {tape}\n  {caret}")
}
