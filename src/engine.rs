//! The Codexter execution engine.
//!
//! A program is a string of decimal digits that becomes the tape. Execution
//! walks the tape left to right; each cell's digit picks one of ten
//! instructions, and most instructions read their neighbours as operands or
//! overwrite cells, so the program rewrites itself as it runs.
//!
//! | Digit | Name   | Effect                                                          |
//! |-------|--------|-----------------------------------------------------------------|
//! | 0     | NOP    | nothing                                                         |
//! | 1     | ADD    | own cell := (previous two cells) mod 10                         |
//! | 2     | IO     | next three cells as a byte: print it, or read a digit           |
//! | 3     | JUMP   | flag set: continue after the next `3`                           |
//! | 4     | PUSH   | push the previous cell onto the memory bank                     |
//! | 5     | POP    | own cell := popped value; empty bank skips the next cell        |
//! | 6     | SKIP   | skip the next cell                                              |
//! | 7     | FLAG   | second of two consecutive 7s toggles the flag                   |
//! | 8     | ROTATE | move the bank's front value to its back                         |
//! | 9     | LOOP   | flag set: jump back to an earlier run of 9s of the same length  |
//!
//! Quick start:
//!
//! ```
//! use codexter::{CodexterEngine, DigitQueue};
//!
//! // "2072" prints byte 72 ('H').
//! let mut engine = CodexterEngine::new("2072".to_string());
//! engine.set_input_source(DigitQueue::default());
//! let output = engine.run().expect("program should run");
//! assert_eq!(output, b"H");
//! ```

use std::io::{self, IsTerminal};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::bank::MemoryBank;
use crate::flow::{jump_target, loop_target};
use crate::input::{DigitSource, LineInput};
use crate::tape::Tape;

/// Errors that can occur while loading or running a Codexter program.
#[derive(Debug, thiserror::Error)]
pub enum CodexterError {
    /// The program text was empty.
    #[error("Invalid program: no instructions")]
    EmptyProgram,

    /// The program text contained something other than `0`-`9`.
    #[error("Invalid character: '{ch}' at instruction {ip}")]
    InvalidCharacter { ch: char, ip: usize },

    /// The input channel failed while an IO instruction was waiting for a digit.
    #[error("I/O error at instruction {ip}: {source}")]
    IoError {
        ip: usize,
        #[source]
        source: io::Error,
    },

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: usize },

    /// Execution aborted due to cooperative cancellation (e.g., timeout)
    #[error("Execution aborted: cancelled")]
    Canceled,
}

impl CodexterError {
    /// True for errors raised before the first instruction runs.
    pub fn is_invalid_program(&self) -> bool {
        matches!(self, Self::EmptyProgram | Self::InvalidCharacter { .. })
    }
}

/// Controls for cooperative cancellation and step limiting.
#[derive(Clone)]
pub struct StepControl {
    pub max_steps: Option<usize>,
    pub cancel_flag: Arc<AtomicBool>,
}

impl StepControl {
    pub fn new(max_steps: Option<usize>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self { max_steps, cancel_flag }
    }
}

/// The ten instructions, decoded from a cell's digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Nop,
    Add,
    Io,
    Jump,
    Push,
    Pop,
    Skip,
    Flag,
    Rotate,
    Loop,
}

impl Opcode {
    pub fn decode(digit: u8) -> Self {
        match digit {
            0 => Opcode::Nop,
            1 => Opcode::Add,
            2 => Opcode::Io,
            3 => Opcode::Jump,
            4 => Opcode::Push,
            5 => Opcode::Pop,
            6 => Opcode::Skip,
            7 => Opcode::Flag,
            8 => Opcode::Rotate,
            // Tape cells never exceed 9.
            _ => Opcode::Loop,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::Add => "ADD",
            Opcode::Io => "IO",
            Opcode::Jump => "JUMP",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Skip => "SKIP",
            Opcode::Flag => "FLAG",
            Opcode::Rotate => "ROT",
            Opcode::Loop => "LOOP",
        }
    }
}

/// Read-only view of the engine handed to an observer after every step.
pub struct StepSnapshot<'a> {
    pub step: usize,
    /// Cursor position after the instruction's own repositioning, before the
    /// loop's `+1` advance.
    pub ip: usize,
    pub opcode: Opcode,
    pub tape: &'a Tape,
    pub bank: &'a MemoryBank,
    pub flag: bool,
    pub output: &'a [u8],
}

type OutputSink = Box<dyn Fn(&[u8]) + Send + Sync>;
type StepObserver = Box<dyn Fn(&StepSnapshot<'_>) + Send + Sync>;

/// A Codexter interpreter for one program.
///
/// Every call to one of the `run*` methods starts from a fresh tape, empty
/// memory bank, cleared flag and empty output. The final state of the most
/// recent run stays inspectable through the accessors.
pub struct CodexterEngine {
    code: String,
    tape: Tape,
    bank: MemoryBank,
    flag: bool,
    output: Vec<u8>,
    steps: usize,
    // Optional hooks:
    output_sink: Option<OutputSink>,
    input_source: Option<Box<dyn DigitSource + Send>>,
    observer: Option<StepObserver>,
}

impl CodexterEngine {
    /// Create a new interpreter for `code`. Validation happens when it runs.
    pub fn new(code: String) -> Self {
        Self {
            code,
            tape: Tape::default(),
            bank: MemoryBank::new(),
            flag: false,
            output: Vec::new(),
            steps: 0,
            output_sink: None,
            input_source: None,
            observer: None,
        }
    }

    /// Provide an output sink that sees every printed byte as soon as it is
    /// produced. The bytes are still collected and returned by `run`.
    pub fn set_output_sink<F>(&mut self, sink: F)
    where
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        self.output_sink = Some(Box::new(sink));
    }

    /// Provide the digit source used by IO. Without one, each run reads
    /// lines from stdin through its own [`LineInput`].
    pub fn set_input_source<S>(&mut self, source: S)
    where
        S: DigitSource + Send + 'static,
    {
        self.input_source = Some(Box::new(source));
    }

    /// Provide an observer called once per step, after the step's effects.
    pub fn set_observer<F>(&mut self, observer: F)
    where
        F: Fn(&StepSnapshot<'_>) + Send + Sync + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn bank(&self) -> &MemoryBank {
        &self.bank
    }

    pub fn flag(&self) -> bool {
        self.flag
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Number of instructions executed by the most recent run.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Internal executor shared by run and run_debug.
    fn execute(
        &mut self,
        debug: bool,
        step_control: Option<&StepControl>,
    ) -> Result<Vec<u8>, CodexterError> {
        self.tape = Tape::parse(&self.code)?;
        self.bank = MemoryBank::new();
        self.flag = false;
        self.output.clear();
        self.steps = 0;

        let code_len = self.tape.len();
        let mut ip: usize = 0;
        let mut stdin_input: Option<LineInput> = None;

        if debug {
            println!("STEP | IP  | OP   | FLAG | BANK         | ACTION");
            println!("-----+-----+------+------+--------------+------------------------------------------");
        }

        while ip < code_len {
            // Cooperative cancellation check
            if let Some(ctrl) = step_control {
                if ctrl.cancel_flag.load(Ordering::Relaxed) {
                    return Err(CodexterError::Canceled);
                }
                if let Some(max) = ctrl.max_steps {
                    if self.steps >= max {
                        return Err(CodexterError::StepLimitExceeded { limit: max });
                    }
                }
            }

            let ip_before = ip;
            let pos = ip as isize;
            let opcode = Opcode::decode(self.tape.read(pos));
            let mut action: Option<String> = if debug { Some(String::new()) } else { None };

            match opcode {
                Opcode::Nop => {
                    if let Some(a) = action.as_mut() { *a = "No operation".to_string(); }
                }
                Opcode::Add => {
                    let (a, b) = (self.tape.read(pos - 1), self.tape.read(pos - 2));
                    let sum = (a + b) % 10;
                    self.tape.write(pos, sum);
                    if let Some(s) = action.as_mut() { *s = format!("cell[{ip}] := ({a} + {b}) mod 10 = {sum}"); }
                }
                Opcode::Io => {
                    let value = 100 * u32::from(self.tape.read(pos + 1))
                        + 10 * u32::from(self.tape.read(pos + 2))
                        + u32::from(self.tape.read(pos + 3));
                    let byte = (value % 256) as u8;

                    if byte == 127 || byte < 32 {
                        let digit = if debug {
                            None
                        } else {
                            let next = match self.input_source.as_mut() {
                                Some(source) => source.next_digit(),
                                None => stdin_input.get_or_insert_with(default_stdin_input).next_digit(),
                            };
                            next.map_err(|source| CodexterError::IoError { ip, source })?
                        };

                        match digit {
                            Some(d) => {
                                self.tape.write(pos, d);
                                if let Some(a) = action.as_mut() { *a = format!("Read digit {d} into cell[{ip}]"); }
                            }
                            None => {
                                ip += 3;
                                if let Some(a) = action.as_mut() {
                                    *a = if debug {
                                        "Read digit -> simulated end of input; skip 3 operand cells".to_string()
                                    } else {
                                        "Input exhausted; skip 3 operand cells".to_string()
                                    };
                                }
                            }
                        }
                    } else {
                        self.output.push(byte);
                        if !debug {
                            if let Some(sink) = self.output_sink.as_ref() {
                                (sink)(&[byte]);
                            }
                        }
                        for offset in 1..=3 {
                            let v = self.bank.pop_or_zero();
                            self.tape.write(pos + offset, v);
                        }
                        ip += 3;
                        if let Some(a) = action.as_mut() {
                            *a = format!("Output byte {byte} ({:?}); drain bank into cells {}..={}", byte as char, ip - 2, ip);
                        }
                    }
                }
                Opcode::Jump => {
                    if let Some(target) = jump_target(&self.tape, ip, self.flag) {
                        if let Some(a) = action.as_mut() { *a = format!("Flag set; jump to 3 at IP {target}"); }
                        ip = target;
                    } else if let Some(a) = action.as_mut() {
                        *a = if self.flag { "No later 3; continue".to_string() } else { "Flag clear; continue".to_string() };
                    }
                }
                Opcode::Push => {
                    let v = self.tape.read(pos - 1);
                    self.bank.push(v);
                    if let Some(a) = action.as_mut() { *a = format!("Push {v} onto bank"); }
                }
                Opcode::Pop => match self.bank.pop() {
                    Some(v) => {
                        self.tape.write(pos, v);
                        if let Some(a) = action.as_mut() { *a = format!("Pop {v} into cell[{ip}]"); }
                    }
                    None => {
                        ip += 1;
                        if let Some(a) = action.as_mut() { *a = "Bank empty; skip next cell".to_string(); }
                    }
                },
                Opcode::Skip => {
                    ip += 1;
                    if let Some(a) = action.as_mut() { *a = "Skip next cell".to_string(); }
                }
                Opcode::Flag => {
                    if self.tape.read(pos - 1) == 7 {
                        self.flag = !self.flag;
                        if let Some(a) = action.as_mut() { *a = format!("Toggle flag to {}", self.flag); }
                    } else if let Some(a) = action.as_mut() {
                        *a = "Lone 7; no effect".to_string();
                    }
                }
                Opcode::Rotate => {
                    let rotated = self.bank.rotate();
                    if let Some(a) = action.as_mut() {
                        *a = if rotated { "Rotate bank front to back".to_string() } else { "Bank empty; no effect".to_string() };
                    }
                }
                Opcode::Loop => {
                    if let Some(target) = loop_target(&self.tape, ip, self.flag) {
                        if let Some(a) = action.as_mut() { *a = format!("Matched run of 9s; resume at IP {}", target + 1); }
                        ip = target;
                    } else if let Some(a) = action.as_mut() {
                        *a = "No loop".to_string();
                    }
                }
            }

            // Notify observer (if any) after applying the instruction's effect.
            if let Some(observer) = self.observer.as_ref() {
                (observer)(&StepSnapshot {
                    step: self.steps,
                    ip,
                    opcode,
                    tape: &self.tape,
                    bank: &self.bank,
                    flag: self.flag,
                    output: &self.output,
                });
            }

            if debug {
                println!(
                    "{:<4} | {:<3} | {:<4} | {:<4} | {:<12} | {}",
                    self.steps,
                    ip_before,
                    opcode.mnemonic(),
                    if self.flag { "on" } else { "off" },
                    bank_digits(&self.bank),
                    action.unwrap_or_default()
                );
            }

            self.steps += 1;
            // Move to the next instruction
            ip += 1;
        }

        Ok(self.output.clone())
    }

    /// Execute the program until the instruction pointer leaves the tape.
    ///
    /// Returns the output bytes, or a [`CodexterError`] if the program text
    /// is invalid or input could not be read.
    pub fn run(&mut self) -> Result<Vec<u8>, CodexterError> {
        self.execute(false, None)
    }

    /// Debug-run the program, printing a step-by-step table of operations.
    /// The engine state advances exactly as it would during a real run, but:
    /// - output is not forwarded to the sink (it is still collected)
    /// - IO never reads input; the source is treated as exhausted
    pub fn run_debug(&mut self) -> Result<Vec<u8>, CodexterError> {
        self.execute(true, None)
    }

    /// Execute with cooperative cancellation and optional step limit.
    pub fn run_with_control(&mut self, step_control: StepControl) -> Result<Vec<u8>, CodexterError> {
        self.execute(false, Some(&step_control))
    }

    /// Debug-run with cooperative cancellation and optional step limit.
    pub fn run_debug_with_control(&mut self, step_control: StepControl) -> Result<Vec<u8>, CodexterError> {
        self.execute(true, Some(&step_control))
    }
}

fn default_stdin_input() -> LineInput {
    let input = LineInput::stdin();
    if io::stderr().is_terminal() {
        input.with_prompt("Reading input... ")
    } else {
        input
    }
}

fn bank_digits(bank: &MemoryBank) -> String {
    if bank.is_empty() {
        return "-".to_string();
    }
    bank.iter().map(|d| char::from(b'0' + d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::DigitQueue;
    use proptest::prelude::*;
    use std::sync::Mutex;

    fn engine(code: &str) -> CodexterEngine {
        let mut e = CodexterEngine::new(code.to_string());
        e.set_input_source(DigitQueue::default());
        e
    }

    fn engine_with_input(code: &str, input: &str) -> CodexterEngine {
        let mut e = CodexterEngine::new(code.to_string());
        e.set_input_source(DigitQueue::from_text(input));
        e
    }

    #[test]
    fn invalid_character_returns_error() {
        let mut e = engine("12a");
        let result = e.run();
        assert!(matches!(result, Err(CodexterError::InvalidCharacter { ch: 'a', ip: 2 })));
        assert!(result.unwrap_err().is_invalid_program());
        assert_eq!(e.steps(), 0);
    }

    #[test]
    fn empty_program_returns_error() {
        let result = engine("").run();
        assert!(matches!(result, Err(CodexterError::EmptyProgram)));
    }

    #[test]
    fn nops_produce_no_output() {
        let mut e = engine("0000");
        assert_eq!(e.run().unwrap(), b"");
        assert_eq!(e.tape().to_string(), "0000");
        assert_eq!(e.steps(), 4);
    }

    #[test]
    fn add_wraps_mod_ten() {
        let mut e = engine("991");
        e.run().unwrap();
        assert_eq!(e.tape().to_string(), "998");
    }

    #[test]
    fn add_at_tape_start_reads_zeros() {
        let mut e = engine("1");
        e.run().unwrap();
        assert_eq!(e.tape().to_string(), "0");
    }

    #[test]
    fn io_fixture_1234() {
        // cell 0: ADD of two out-of-bounds zeros -> 0
        // cell 1: IO with operands 3,4,<oob 0> = 340 mod 256 = 84 ('T'); empty bank zeros cells 2..=3
        let mut e = engine("1234");
        assert_eq!(e.run().unwrap(), b"T");
        assert_eq!(e.tape().to_string(), "0200");
        assert_eq!(e.steps(), 2);
    }

    #[test]
    fn io_printable_outputs_space_and_drains_bank() {
        let mut e = engine("2032");
        assert_eq!(e.run().unwrap(), b" ");
        assert_eq!(e.tape().to_string(), "2000");
        assert_eq!(e.steps(), 1);
    }

    #[test]
    fn io_printable_writes_bank_contents_into_operands() {
        let mut e = engine("340402072");
        // cell 1: PUSH 3 -> [3]
        // cell 3: PUSH 0 -> [0, 3]
        // cell 5: IO 072 -> 'H'; drains 0, 3 and a default 0 into cells 6..=8
        assert_eq!(e.run().unwrap(), b"H");
        assert_eq!(e.tape().to_string(), "340402030");
        assert!(e.bank().is_empty());
    }

    #[test]
    fn io_non_printable_with_exhausted_input_skips_operands() {
        let mut e = engine("2000");
        assert_eq!(e.run().unwrap(), b"");
        assert_eq!(e.tape().to_string(), "2000");
        assert_eq!(e.steps(), 1);
    }

    #[test]
    fn io_non_printable_reads_digit_into_own_cell() {
        let mut e = engine_with_input("2000", "7");
        e.run().unwrap();
        // The IO cell becomes 7, then the three 0 operands execute as NOPs.
        assert_eq!(e.tape().to_string(), "7000");
        assert_eq!(e.steps(), 4);
    }

    #[test]
    fn io_value_127_is_non_printable() {
        let mut e = engine("2127");
        assert_eq!(e.run().unwrap(), b"");
        assert_eq!(e.tape().to_string(), "2127");
    }

    #[test]
    fn io_value_wraps_mod_256() {
        // 321 mod 256 = 65 ('A')
        let mut e = engine("2321");
        assert_eq!(e.run().unwrap(), b"A");
    }

    #[test]
    fn pop_on_empty_bank_skips_next_cell() {
        // The skipped 1 is never executed, so it keeps its value.
        let mut e = engine("5100");
        e.run().unwrap();
        assert_eq!(e.tape().to_string(), "5100");
        assert_eq!(e.steps(), 3);
    }

    #[test]
    fn push_then_pop_copies_previous_cell() {
        let mut e = engine("845");
        e.run().unwrap();
        // ROTATE on empty bank is a no-op; PUSH 8; POP writes 8 over itself.
        assert_eq!(e.tape().to_string(), "848");
        assert!(e.bank().is_empty());
    }

    #[test]
    fn skip_jumps_over_one_cell() {
        let mut e = engine("6101");
        e.run().unwrap();
        // cell 1 skipped; cell 3 ADD: 0 + 1 = 1
        assert_eq!(e.tape().to_string(), "6101");
        assert_eq!(e.steps(), 3);
    }

    #[test]
    fn double_seven_sets_flag() {
        let mut e = engine("77");
        e.run().unwrap();
        assert!(e.flag());
    }

    #[test]
    fn separated_sevens_do_not_toggle() {
        let mut e = engine("707");
        e.run().unwrap();
        assert!(!e.flag());
    }

    #[test]
    fn triple_seven_toggles_twice() {
        let mut e = engine("777");
        e.run().unwrap();
        assert!(!e.flag());
    }

    #[test]
    fn jump_with_flag_skips_to_after_next_three() {
        // Flag on, JUMP at 2 parks on the 3 at 5; cells 3..=5 never run.
        let mut e = engine("77311300");
        e.run().unwrap();
        assert_eq!(e.tape().to_string(), "77311300");
        assert_eq!(e.steps(), 5);
    }

    #[test]
    fn jump_without_flag_falls_through() {
        let mut e = engine("311");
        e.run().unwrap();
        // cell 1: 3 + 0 = 3, cell 2: 3 + 3 = 6
        assert_eq!(e.tape().to_string(), "336");
    }

    #[test]
    fn rotate_moves_bank_front_to_back() {
        // cell 1 pushes 0, cell 2 pushes 4 -> [4, 0]; ROTATE -> [0, 4]
        let mut e = engine("0448");
        e.run().unwrap();
        assert_eq!(e.bank().iter().collect::<Vec<_>>(), vec![0, 4]);
    }

    #[test]
    fn rotate_on_empty_bank_is_a_nop() {
        let mut e = engine("8");
        assert!(e.run().is_ok());
        assert!(e.bank().is_empty());
    }

    #[test]
    fn loop_repeats_until_body_breaks_it() {
        // 77 sets the flag; the 9 at 3 opens, the 9 at 7 closes.
        // pass 1: POP at 4 finds an empty bank and skips the 7 at 5,
        //         PUSH at 6 stores 7, the closing 9 jumps back to cell 4.
        // pass 2: POP writes 7 over itself, so 5 is now the second of two
        //         7s and clears the flag; the closing 9 falls through.
        let mut e = engine("77095749");
        e.run().unwrap();
        assert_eq!(e.tape().to_string(), "77097749");
        assert!(!e.flag());
        assert_eq!(e.bank().iter().collect::<Vec<_>>(), vec![7]);
        assert_eq!(e.steps(), 11);
    }

    #[test]
    fn loop_without_flag_is_a_nop() {
        let mut e = engine("0909");
        e.run().unwrap();
        assert_eq!(e.steps(), 4);
    }

    #[test]
    fn infinite_loop_hits_step_limit() {
        // The 9 at 5 keeps jumping back to the 9 at 3.
        let mut e = engine("770909");
        let ctrl = StepControl::new(Some(50), Arc::new(AtomicBool::new(false)));
        let result = e.run_with_control(ctrl);
        assert!(matches!(result, Err(CodexterError::StepLimitExceeded { limit: 50 })));
    }

    #[test]
    fn cancel_flag_aborts_before_first_step() {
        let cancel = Arc::new(AtomicBool::new(true));
        let mut e = engine("0000");
        let result = e.run_with_control(StepControl::new(None, cancel));
        assert!(matches!(result, Err(CodexterError::Canceled)));
    }

    #[test]
    fn output_sink_sees_each_byte() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let mut e = engine("20722105");
        e.set_output_sink(move |bytes| sink_seen.lock().unwrap().extend_from_slice(bytes));
        let out = e.run().unwrap();
        assert_eq!(out, b"Hi");
        assert_eq!(seen.lock().unwrap().as_slice(), b"Hi");
    }

    #[test]
    fn observer_sees_every_step_before_advance() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let obs_seen = Arc::clone(&seen);
        let mut e = engine("6020");
        e.set_observer(move |snap| {
            obs_seen.lock().unwrap().push((snap.step, snap.ip, snap.opcode));
        });
        e.run().unwrap();
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[(0, 1, Opcode::Skip), (1, 5, Opcode::Io)]
        );
    }

    #[test]
    fn each_run_starts_fresh() {
        let mut e = engine("2072");
        assert_eq!(e.run().unwrap(), b"H");
        assert_eq!(e.run().unwrap(), b"H");
        assert_eq!(e.tape().to_string(), "2000");
    }

    #[test]
    fn debug_run_collects_output_but_skips_sink() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let mut e = engine("2072");
        e.set_output_sink(move |bytes| sink_seen.lock().unwrap().extend_from_slice(bytes));
        assert_eq!(e.run_debug().unwrap(), b"H");
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn debug_run_simulates_end_of_input() {
        let mut e = engine_with_input("2000", "5");
        e.run_debug().unwrap();
        assert_eq!(e.tape().to_string(), "2000");
    }

    proptest! {
        #[test]
        fn flagless_programs_finish_within_tape_length(code in "[0134568-9]{1,128}") {
            // Without 7s the flag stays clear and without IO nothing is
            // written ahead of the cursor, so every step moves forward.
            let mut e = engine(&code);
            prop_assert!(e.run().is_ok());
            prop_assert!(e.steps() <= code.len());
            prop_assert!(!e.flag());
            prop_assert_eq!(e.tape().len(), code.len());
        }

        #[test]
        fn tape_stays_digits(code in "[0-9]{1,64}") {
            let mut e = engine(&code);
            let ctrl = StepControl::new(Some(2_000), Arc::new(AtomicBool::new(false)));
            let _ = e.run_with_control(ctrl);
            prop_assert_eq!(e.tape().len(), code.len());
            prop_assert!(e.tape().as_slice().iter().all(|&d| d <= 9));
            prop_assert!(e.bank().iter().all(|d| d <= 9));
        }
    }
}
