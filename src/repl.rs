use std::env;
use std::io::{self, IsTerminal, Write};
use reedline::{Signal, DefaultPrompt, DefaultPromptSegment, HistoryItem, Highlighter, StyledText};
use nu_ansi_term::Style;

use crate::commands::run::{execute_program, ExecOptions, RunLimits};
use crate::config::{config, Colors};
use crate::loader::strip_source;

pub const REPL_MODE_ENV: &str = "CODEXTER_REPL_MODE";
pub const REPL_ONCE_ENV: &str = "CODEXTER_REPL_ONCE";

const META_HELP: &str = r#"Meta commands (line starts with ":")
  :exit            Exit immediately (code 0)
  :help            Show this help

Ctrl+D submits the buffer; Enter inserts a newline; '#' starts a comment."#;

/// What the editor handed back for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Submission {
    Program(String),
    Exit,
    Help,
    Empty,
}

fn classify(buffer: &str) -> Submission {
    match buffer.trim() {
        ":exit" => Submission::Exit,
        ":help" => Submission::Help,
        _ => {
            let code = strip_source(buffer);
            if code.is_empty() { Submission::Empty } else { Submission::Program(code) }
        }
    }
}

pub fn repl_loop() -> io::Result<()> {
    // Initialize interactive line editor
    let mut editor = init_line_editor()?;
    let opts = ExecOptions { limits: RunLimits::resolve(None, None), ..ExecOptions::default() };

    loop {
        let Some(buffer) = read_submission_interactive(&mut editor)? else {
            // EOF or editor closed. End the session cleanly to avoid hanging when stdin is closed
            println!();
            io::stdout().flush()?;
            return Ok(());
        };

        match classify(&buffer) {
            Submission::Exit => return Ok(()),
            Submission::Help => {
                eprintln!("{META_HELP}");
                io::stderr().flush()?;
                continue;
            }
            Submission::Empty => continue,
            Submission::Program(code) => {
                execute_program(None, &code, &opts);
            }
        }

        // Test hook: if CODEXTER_REPL_ONCE=1, exit after one execution
        if env::var(REPL_ONCE_ENV).ok().as_deref() == Some("1") {
            return Ok(());
        }
    }
}

fn init_line_editor() -> io::Result<reedline::Reedline> {
    use reedline::{
        default_emacs_keybindings, EditCommand, Emacs, KeyCode, KeyModifiers, Reedline, ReedlineEvent,
    };

    // Start from default emacs-like bindings and adjust:
    // - Enter -> InsertNewLine (do not submit)
    // - Ctrl+D -> AcceptLine (submit)
    // - Ctrl+Z -> AcceptLine (submit, for Windows)
    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Enter, ReedlineEvent::Edit(vec![EditCommand::InsertNewline]));
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('d'), ReedlineEvent::Submit);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('z'), ReedlineEvent::Submit);

    // Alt+Up/Alt+Down or Ctrl+Up/Ctrl+Down to navigate history items.
    keybindings.add_binding(KeyModifiers::ALT, KeyCode::Up, ReedlineEvent::PreviousHistory);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Up, ReedlineEvent::PreviousHistory);
    keybindings.add_binding(KeyModifiers::ALT, KeyCode::Down, ReedlineEvent::NextHistory);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Down, ReedlineEvent::NextHistory);

    let history = reedline::FileBackedHistory::new(1_000)
        .map_err(|e| io::Error::other(e.to_string()))?;

    let editor = Reedline::create()
        .with_highlighter(Box::new(DigitHighlighter::new(config().colors.clone())))
        .with_history(Box::new(history))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    Ok(editor)
}

pub fn read_submission<R: io::BufRead>(stdin: &mut R) -> Option<String> {
    let mut buffer = String::new();
    match stdin.read_to_string(&mut buffer) {
        Ok(_) if !buffer.is_empty() => Some(buffer),
        _ => None,
    }
}

fn read_submission_interactive(editor: &mut reedline::Reedline) -> io::Result<Option<String>> {
    let prompt = DefaultPrompt::new(DefaultPromptSegment::Basic("codexter".to_string()), DefaultPromptSegment::Empty);

    match editor.read_line(&prompt) {
        Ok(Signal::Success(buffer)) => {
            // One history item per submitted program
            if !buffer.trim().is_empty() {
                let _ = editor.history_mut().save(HistoryItem::from_command_line(buffer.clone()));
            }
            Ok(Some(buffer))
        }
        Ok(Signal::CtrlC) | Ok(Signal::CtrlD) => Ok(None),
        Err(e) => {
            eprintln!("repl: editor error: {e}");
            let _ = io::stderr().flush();
            Ok(None)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplMode {
    Bare,
    Editor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeFlagOverride {
    None,
    Bare,
    Editor,
}

pub fn select_mode(flag: ModeFlagOverride) -> Result<ReplMode, String> {
    resolve_mode(flag, env::var(REPL_MODE_ENV).ok().as_deref(), io::stdin().is_terminal())
}

fn resolve_mode(flag: ModeFlagOverride, env_mode: Option<&str>, stdin_is_tty: bool) -> Result<ReplMode, String> {
    // Flag override
    match flag {
        ModeFlagOverride::Bare => return Ok(ReplMode::Bare),
        ModeFlagOverride::Editor => {
            if !stdin_is_tty {
                return Err(format!("cannot start editor: stdin is not a TTY (use --bare or {REPL_MODE_ENV}=bare)"));
            }
            return Ok(ReplMode::Editor);
        }
        ModeFlagOverride::None => {}
    }

    // Environment override
    if let Some(val) = env_mode {
        return match val.trim().to_ascii_lowercase().as_str() {
            "bare" => Ok(ReplMode::Bare),
            "editor" if stdin_is_tty => Ok(ReplMode::Editor),
            "editor" => Err(format!("cannot start editor: stdin is not a TTY (use {REPL_MODE_ENV}=bare)")),
            _ => Err(format!("invalid {REPL_MODE_ENV} value: {val}, must be 'bare' or 'editor'")),
        };
    }

    // Auto-detect
    if stdin_is_tty { Ok(ReplMode::Editor) } else { Ok(ReplMode::Bare) }
}

/// Bare mode: read stdin until EOF, run it once. IO then sees exhausted input.
pub fn execute_bare_once() -> io::Result<()> {
    // The lock must be released before the engine asks stdin for digits.
    let submission = {
        let mut locked = io::stdin().lock();
        read_submission(&mut locked)
    };
    let Some(buffer) = submission else {
        return Ok(());
    };

    if let Submission::Program(code) = classify(&buffer) {
        let opts = ExecOptions { limits: RunLimits::resolve(None, None), ..ExecOptions::default() };
        execute_program(None, &code, &opts);
    }
    Ok(())
}

/// Paints each digit with its opcode colour, comments dimmed and anything
/// that would be rejected underlined in red.
struct DigitHighlighter {
    colors: Colors,
}

impl DigitHighlighter {
    fn new(colors: Colors) -> Self {
        Self { colors }
    }

    fn style_for(&self, ch: char, in_comment: bool) -> Style {
        if in_comment {
            return Style::new().fg(self.colors.text).dimmed().italic();
        }
        match ch.to_digit(10) {
            Some(d) => Style::new().fg(self.colors.for_digit(d as u8)).bold(),
            None if ch.is_whitespace() => Style::new(),
            None => Style::new().fg(nu_ansi_term::Color::Red).underline(),
        }
    }
}

impl Highlighter for DigitHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut out = StyledText::new();
        let mut current_style: Option<Style> = None;
        let mut buffer = String::new();
        let mut in_comment = false;

        for ch in line.chars() {
            if ch == '#' {
                in_comment = true;
            }
            let style = self.style_for(ch, in_comment);
            if ch == '\n' {
                in_comment = false;
            }

            match current_style {
                Some(s) if s == style => buffer.push(ch),
                Some(s) => {
                    out.push((s, std::mem::take(&mut buffer)));
                    current_style = Some(style);
                    buffer.push(ch);
                }
                None => {
                    current_style = Some(style);
                    buffer.push(ch);
                }
            }
        }

        if let Some(s) = current_style {
            if !buffer.is_empty() {
                out.push((s, buffer));
            }
        }
        out
    }
}
