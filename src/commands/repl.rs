use std::io::{self, IsTerminal, Write};
use clap::Args;

use crate::repl::{execute_bare_once, repl_loop, select_mode, ModeFlagOverride, ReplMode, REPL_MODE_ENV, REPL_ONCE_ENV};

#[derive(Args, Debug, Default)]
#[command(disable_help_flag = true)]
pub struct ReplArgs {
    /// Read the whole program from stdin and run it once
    #[arg(long = "bare", conflicts_with = "editor")]
    pub bare: bool,

    /// Use the line editor (stdin must be a TTY)
    #[arg(long = "editor", conflicts_with = "bare")]
    pub editor: bool,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

/// `codexter repl`, and `codexter` without a subcommand.
pub fn run(program: &str, args: ReplArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let flag = if args.bare {
        ModeFlagOverride::Bare
    } else if args.editor {
        ModeFlagOverride::Editor
    } else {
        ModeFlagOverride::None
    };

    match select_mode(flag).and_then(start) {
        Ok(()) => 0,
        Err(msg) => {
            eprintln!("{program}: {msg}");
            let _ = io::stderr().flush();
            1
        }
    }
}

fn start(mode: ReplMode) -> Result<(), String> {
    // Ctrl+C ends the session, mid-program or at the prompt.
    ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(0);
    })
    .map_err(|e| format!("failed to set ctrl+c handler: {e}"))?;

    let session = match mode {
        ReplMode::Bare => execute_bare_once(),
        ReplMode::Editor => {
            if io::stderr().is_terminal() {
                eprintln!("codexter {} | Enter: newline, Ctrl+D (Ctrl+Z on Windows): run, :help, Ctrl+C: quit", env!("CARGO_PKG_VERSION"));
                let _ = io::stderr().flush();
            }
            repl_loop()
        }
    };
    session.map_err(|e| format!("REPL error: {e}"))
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} repl [--bare|--editor]

Options:
  --bare        Read stdin to EOF as one program, run it, exit
  --editor      Multi-line editor with per-opcode highlighting (needs a TTY)
  --help, -h    Show this help

Without a flag, {1}=bare|editor decides; otherwise a TTY on stdin
selects the editor. In the editor, each submission runs on a fresh tape and
IO reads digits from the lines typed after it; {2}=1 quits after the first
run. In bare mode stdin is the program, so IO always sees end of input.
"#,
        program, REPL_MODE_ENV, REPL_ONCE_ENV
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    #[command(disable_help_flag = true)]
    struct Harness {
        #[command(flatten)]
        args: ReplArgs,
    }

    #[test]
    fn mode_flags_conflict() {
        assert!(Harness::try_parse_from(["repl", "--bare", "--editor"]).is_err());
    }

    #[test]
    fn no_flags_leave_mode_to_detection() {
        let parsed = Harness::try_parse_from(["repl"]).unwrap();
        assert!(!parsed.args.bare && !parsed.args.editor && !parsed.args.help);
    }
}
