use clap::Args;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use crate::cli_util::{print_engine_error, render_snapshot};
use crate::config::config;
use crate::engine::StepControl;
use crate::{loader, CodexterEngine, CodexterError};

pub const TIMEOUT_ENV: &str = "CODEXTER_TIMEOUT_MS";
pub const MAX_STEPS_ENV: &str = "CODEXTER_MAX_STEPS";

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Print a step-by-step table of operations; input is treated as exhausted
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Render tape, bank and flag to stderr after every step
    #[arg(short = 't', long = "trace")]
    pub trace: bool,

    /// Load a program from PATH (may be repeated)
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Programs given literally; each one runs separately
    #[arg(value_name = "PROGRAM", trailing_var_arg = true)]
    pub programs: Vec<String>,

    /// Wall-clock timeout in milliseconds (fallback CODEXTER_TIMEOUT_MS, then config; default none)
    #[arg(long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Maximum interpreter steps before abort (fallback CODEXTER_MAX_STEPS, then config; default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<u64>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

/// Limits applied to a single execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunLimits {
    pub timeout_ms: Option<u64>,
    pub max_steps: Option<u64>,
}

impl RunLimits {
    /// Resolve limits: flags -> env -> config file -> none
    pub fn resolve(timeout_ms: Option<u64>, max_steps: Option<u64>) -> Self {
        let from_env = |key: &str| std::env::var(key).ok().and_then(|s| s.trim().parse::<u64>().ok());
        let fallback = &config().limits;
        Self {
            timeout_ms: timeout_ms.or_else(|| from_env(TIMEOUT_ENV)).or(fallback.timeout_ms),
            max_steps: max_steps.or_else(|| from_env(MAX_STEPS_ENV)).or(fallback.max_steps),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExecOptions {
    pub debug: bool,
    pub trace: bool,
    pub limits: RunLimits,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        debug,
        trace,
        files,
        programs,
        timeout_ms,
        max_steps,
        ..
    } = args;

    if files.is_empty() && programs.is_empty() {
        usage_and_exit(program, 2);
    }

    let mut sources = Vec::with_capacity(files.len() + programs.len());
    for path in &files {
        match loader::load_file(path) {
            Ok(code) => sources.push(code),
            Err(e) => {
                eprintln!("{program}: failed to read program file {}: {e}", path.display());
                let _ = io::stderr().flush();
                return 1;
            }
        }
    }
    sources.extend(programs);

    let opts = ExecOptions {
        debug,
        trace,
        limits: RunLimits::resolve(timeout_ms, max_steps),
    };

    sources
        .iter()
        .map(|code| execute_program(Some(program), code, &opts))
        .fold(0, i32::max)
}

/// Execute one program on a worker thread, streaming its output to stdout.
///
/// - Program output goes to stdout, followed by a newline.
/// - Errors and abort messages go to stderr.
///
/// Returns the exit code for this program: 0 on success, 1 otherwise.
pub fn execute_program(program: Option<&str>, code: &str, opts: &ExecOptions) -> i32 {
    let ExecOptions { debug, trace, limits } = *opts;

    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel::<Result<Vec<u8>, CodexterError>>();
    let program_owned = code.to_string();
    let cancel_clone = cancel.clone();

    thread::spawn(move || {
        let mut engine = CodexterEngine::new(program_owned);
        engine.set_output_sink(|bytes| {
            let mut out = io::stdout().lock();
            let _ = out.write_all(bytes);
            let _ = out.flush();
        });
        if trace {
            let colors = io::stderr().is_terminal().then(|| config().colors.clone());
            engine.set_observer(move |snap| {
                eprintln!("{}", render_snapshot(snap, colors.as_ref()));
            });
        }

        let max_steps = limits.max_steps.map(|n| usize::try_from(n).unwrap_or(usize::MAX));
        let ctrl = StepControl::new(max_steps, cancel_clone);
        let res = if debug {
            engine.run_debug_with_control(ctrl)
        } else {
            engine.run_with_control(ctrl)
        };
        let _ = tx.send(res);
    });

    let received = match limits.timeout_ms {
        Some(ms) => rx.recv_timeout(Duration::from_millis(ms)),
        None => rx.recv().map_err(|_| mpsc::RecvTimeoutError::Disconnected),
    };

    let exit_code = match received {
        Ok(Ok(output)) => {
            if debug {
                // Debug runs do not stream; show the collected output once.
                let mut out = io::stdout().lock();
                let _ = out.write_all(&output);
                let _ = out.flush();
            }
            0
        }
        Ok(Err(CodexterError::StepLimitExceeded { limit })) => {
            eprintln!("Execution aborted: step limit exceeded ({limit})");
            let _ = io::stderr().flush();
            1
        }
        Ok(Err(other)) => {
            print_engine_error(program, code, &other);
            let _ = io::stderr().flush();
            1
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            cancel.store(true, Ordering::Relaxed);
            let ms = limits.timeout_ms.unwrap_or_default();
            eprintln!("Execution aborted: wall-clock timeout exceeded ({ms} ms)");
            let _ = io::stderr().flush();
            1
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => 1,
    };

    println!();
    let _ = io::stdout().flush();
    exit_code
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [--debug|-d] [--trace|-t] "<program>"...
  {0} run [--debug|-d] [--trace|-t] --file <PATH>...

Options:
  --file,  -f <PATH>  Load a program from PATH (repeatable); '#' starts a comment
  --debug, -d         Print a step-by-step table of operations; input reads as exhausted
  --trace, -t         Render tape, memory bank and flag to stderr after every step
  --timeout <MS>      Abort after MS milliseconds of wall-clock time
  --max-steps <N>     Abort after N executed instructions
  --help,  -h         Show this help

Notes:
- Every file and every positional program is a separate run with a fresh tape.
- Programs may only contain the digits 0-9; anything else is reported as an error.
- IO on a non-printable value reads one digit from stdin; end of input skips it.
- Limits fall back to CODEXTER_TIMEOUT_MS / CODEXTER_MAX_STEPS, then to the
  [limits] section of the config file.

Examples:
- Print "Hi":
    {0} run 20722105
- Run a commented source file, feeding digits on stdin:
    {0} run --file ./program.cdx < digits.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
