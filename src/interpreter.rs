//! The Brainfuck execution engine.
//!
//! Features and behaviors:
//! - Tape of `tape_size` byte cells (1024 by default), zeroed at the start of every run.
//! - Wrapping cell arithmetic: `255 + 1 == 0` and `0 - 1 == 255`.
//! - Strict pointer bounds by default: moving left from cell 0 or right past the end
//!   is a segmentation fault. [`PointerPolicy::Wrapping`] opts into wraparound.
//! - Input `,` reads a single byte; running out of input is an error unless
//!   [`EofPolicy::Zero`] is selected.
//! - Output `.` writes the byte at the current cell to the output sink and records it.
//! - Unmatched brackets are reported before anything executes.
//! - Any non-Brainfuck character is a comment.
//!
//! Quick start:
//!
//! ```
//! use bf_tape::Interpreter;
//!
//! let mut sink = Vec::new();
//! let mut bf = Interpreter::with_io(std::io::empty(), &mut sink);
//! // 8 * 8 + 1 = 65, an 'A'
//! let text = bf.interpret("++++++++[>++++++++<-]>+.").expect("program should run");
//! assert_eq!(text, "A");
//! ```

use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

use crate::error::{InterpretError, UnmatchedBracketKind};
use crate::jump::JumpTable;
use crate::loader::{self, Instruction, Program};
use crate::tape::{OutOfBounds, PointerPolicy, Tape, DEFAULT_TAPE_SIZE};

/// What `,` does once the input source is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EofPolicy {
    /// Abort the run with [`InterpretError::InputFailure`].
    #[default]
    Fail,
    /// Store 0 in the current cell and carry on.
    Zero,
}

impl FromStr for EofPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(EofPolicy::Fail),
            "zero" => Ok(EofPolicy::Zero),
            other => Err(format!("invalid eof policy: {other}, must be 'fail' or 'zero'")),
        }
    }
}

impl fmt::Display for EofPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EofPolicy::Fail => write!(f, "fail"),
            EofPolicy::Zero => write!(f, "zero"),
        }
    }
}

/// Construction parameters. Changes apply from the next run on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    pub tape_size: usize,
    pub pointer_policy: PointerPolicy,
    pub eof: EofPolicy,
    /// Announce the loading and executing phases on the diagnostic sink.
    pub debug_trace: bool,
    /// Print a step-by-step table of operations on the diagnostic sink.
    pub step_trace: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            tape_size: DEFAULT_TAPE_SIZE,
            pointer_policy: PointerPolicy::Bounded,
            eof: EofPolicy::Fail,
            debug_trace: false,
            step_trace: false,
        }
    }
}

/// Everything a single run mutates. Built fresh by every `interpret` call.
struct RunState {
    tape: Tape,
    ip: usize,
    output: Vec<u8>,
    step: usize,
}

impl RunState {
    fn new(config: &InterpreterConfig) -> Self {
        Self {
            tape: Tape::new(config.tape_size, config.pointer_policy),
            ip: 0,
            output: Vec::new(),
            step: 0,
        }
    }
}

/// A Brainfuck interpreter bound to an input source and an output sink.
///
/// The interpreter itself only holds configuration, the I/O collaborators and
/// the output of the most recent run; tape and pointers never outlive a run.
pub struct Interpreter<R = io::Stdin, W = io::Stdout> {
    config: InterpreterConfig,
    input: R,
    output: W,
    trace: Box<dyn Write>,
    last_output: Vec<u8>,
}

impl Interpreter {
    /// An interpreter on stdin/stdout with the default 1024-cell tape.
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    /// An interpreter on stdin/stdout with a custom tape size.
    pub fn with_tape_size(tape_size: usize) -> Self {
        let mut bf = Self::new();
        bf.set_tape_size(tape_size);
        bf
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Interpreter::with_io_and_config(io::stdin(), io::stdout(), config)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Read, W: Write> Interpreter<R, W> {
    pub fn with_io(input: R, output: W) -> Self {
        Self::with_io_and_config(input, output, InterpreterConfig::default())
    }

    pub fn with_io_and_config(input: R, output: W, mut config: InterpreterConfig) -> Self {
        config.tape_size = config.tape_size.max(1);
        Self {
            config,
            input,
            output,
            trace: Box::new(io::stderr()),
            last_output: Vec::new(),
        }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn set_config(&mut self, mut config: InterpreterConfig) {
        config.tape_size = config.tape_size.max(1);
        self.config = config;
    }

    pub fn tape_size(&self) -> usize {
        self.config.tape_size
    }

    /// Resize the tape used by the next run. A size of 0 is raised to 1.
    pub fn set_tape_size(&mut self, tape_size: usize) {
        self.config.tape_size = tape_size.max(1);
    }

    pub fn set_pointer_policy(&mut self, policy: PointerPolicy) {
        self.config.pointer_policy = policy;
    }

    pub fn set_eof_policy(&mut self, eof: EofPolicy) {
        self.config.eof = eof;
    }

    pub fn set_debug_trace(&mut self, enabled: bool) {
        self.config.debug_trace = enabled;
    }

    pub fn set_step_trace(&mut self, enabled: bool) {
        self.config.step_trace = enabled;
    }

    /// Send trace output somewhere other than stderr.
    pub fn set_trace_sink<T>(&mut self, sink: T)
    where
        T: Write + 'static,
    {
        self.trace = Box::new(sink);
    }

    /// Text emitted by the last run, one char per byte.
    ///
    /// Leading and trailing chars up to and including U+0020 (space and every
    /// control byte below it) are trimmed; bytes above 0x7F such as 0x85 and
    /// 0xA0 are kept. After a failed run this is whatever was emitted before
    /// the failure.
    pub fn output(&self) -> String {
        let text: String = self.last_output.iter().map(|&b| b as char).collect();
        text.trim_matches(is_trimmed).to_string()
    }

    /// Raw bytes emitted by the last run.
    pub fn output_bytes(&self) -> &[u8] {
        &self.last_output
    }

    pub fn output_sink(&self) -> &W {
        &self.output
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Load `source` and run it to completion on a fresh tape.
    ///
    /// Returns the trimmed output text, or the error that stopped the run.
    /// Bytes written to the output sink before a failure stay written.
    pub fn interpret(&mut self, source: &str) -> Result<String, InterpretError> {
        let mut state = RunState::new(&self.config);

        self.trace_line("loading program");
        let program = loader::load(source);
        self.trace_line("executing program");

        let result = JumpTable::build(&program)
            .and_then(|jumps| self.execute(&program, &jumps, &mut state));

        self.last_output = std::mem::take(&mut state.output);

        if let Err(err) = result {
            let _ = self.output.flush();
            return Err(err);
        }

        Ok(self.output())
    }

    fn trace_line(&mut self, line: &str) {
        if self.config.debug_trace {
            let _ = writeln!(self.trace, "{line}");
        }
    }

    fn execute(
        &mut self,
        program: &Program,
        jumps: &JumpTable,
        state: &mut RunState,
    ) -> Result<(), InterpretError> {
        if self.config.step_trace {
            let _ = writeln!(self.trace, "STEP | IP  | PTR | CELL | INSTR | ACTION");
            let _ = writeln!(
                self.trace,
                "-----+-----+-----+------+-------+------------------------------------------------"
            );
        }

        while state.ip < program.len() {
            self.step(program, jumps, state)?;
        }

        self.output
            .flush()
            .map_err(|source| InterpretError::OutputFailure { ip: state.ip, source })
    }

    fn step(
        &mut self,
        program: &Program,
        jumps: &JumpTable,
        state: &mut RunState,
    ) -> Result<(), InterpretError> {
        let ip = state.ip;
        let instr = program.instructions()[ip];
        let (ptr_before, cell_before) = (state.tape.pointer(), state.tape.current());
        let mut action: Option<String> = if self.config.step_trace { Some(String::new()) } else { None };

        let fault = |OutOfBounds { ptr }: OutOfBounds| InterpretError::SegmentationFault {
            ip,
            ptr,
            op: instr.symbol(),
        };

        match instr {
            Instruction::MoveRight => {
                state.tape.move_right().map_err(fault)?;
                if let Some(a) = action.as_mut() { *a = format!("Moved pointer head to index {}", state.tape.pointer()); }
            }
            Instruction::MoveLeft => {
                state.tape.move_left().map_err(fault)?;
                if let Some(a) = action.as_mut() { *a = format!("Moved pointer head to index {}", state.tape.pointer()); }
            }
            Instruction::Increment => {
                let after = state.tape.increment();
                if let Some(a) = action.as_mut() { *a = format!("Increment cell[{}] from {} to {}", ptr_before, cell_before, after); }
            }
            Instruction::Decrement => {
                let after = state.tape.decrement();
                if let Some(a) = action.as_mut() { *a = format!("Decrement cell[{}] from {} to {}", ptr_before, cell_before, after); }
            }
            Instruction::Output => {
                let byte = state.tape.current();
                self.output
                    .write_all(&[byte])
                    .map_err(|source| InterpretError::OutputFailure { ip, source })?;
                state.output.push(byte);
                if let Some(a) = action.as_mut() { *a = format!("Output byte {} ({:?})", byte, byte as char); }
            }
            Instruction::Input => {
                let value = match read_byte(&mut self.input) {
                    Ok(Some(b)) => b,
                    Ok(None) => match self.config.eof {
                        EofPolicy::Fail => {
                            return Err(InterpretError::InputFailure {
                                ip,
                                source: io::Error::new(io::ErrorKind::UnexpectedEof, "input exhausted"),
                            });
                        }
                        EofPolicy::Zero => 0,
                    },
                    Err(source) => return Err(InterpretError::InputFailure { ip, source }),
                };
                state.tape.set_current(value);
                if let Some(a) = action.as_mut() { *a = format!("Read byte from input -> {}", value); }
            }
            Instruction::LoopStart => {
                if state.tape.current() == 0 {
                    let j = jumps.target(ip).ok_or(InterpretError::UnbalancedLoop {
                        ip,
                        kind: UnmatchedBracketKind::Open,
                    })?;
                    if let Some(a) = action.as_mut() { *a = format!("Cell is 0; jump forward to matching ']' at IP {}", j); }
                    state.ip = j;
                } else if let Some(a) = action.as_mut() {
                    *a = "Enter loop (cell != 0)".to_string();
                }
            }
            Instruction::LoopEnd => {
                if state.tape.current() != 0 {
                    let j = jumps.target(ip).ok_or(InterpretError::UnbalancedLoop {
                        ip,
                        kind: UnmatchedBracketKind::Close,
                    })?;
                    if let Some(a) = action.as_mut() { *a = format!("Cell != 0; jump back to matching '[' at IP {}", j); }
                    state.ip = j;
                } else if let Some(a) = action.as_mut() {
                    *a = "Exit loop (cell is 0)".to_string();
                }
            }
        }

        if let Some(action) = action {
            let _ = writeln!(
                self.trace,
                "{:<4} | {:<3} | {:<3} | {:<4} |  {}    | {}",
                state.step,
                ip,
                ptr_before,
                cell_before,
                instr.symbol(),
                action
            );
        }

        state.step += 1;
        // The jump targets above land on a bracket; this moves past it.
        state.ip += 1;
        Ok(())
    }
}

/// Chars dropped from both ends of the output text.
fn is_trimmed(c: char) -> bool {
    c <= ' '
}

/// Read exactly one byte, retrying on interruption. `Ok(None)` means end of input.
fn read_byte<R: Read>(input: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn run(code: &str, input: &[u8], tape_size: usize) -> (Result<String, InterpretError>, Vec<u8>) {
        let mut sink = Vec::new();
        let result = {
            let mut bf = Interpreter::with_io(input, &mut sink);
            bf.set_tape_size(tape_size);
            bf.interpret(code)
        };
        (result, sink)
    }

    #[test]
    fn comment_characters_are_ignored() {
        let (result, sink) = run("+a+ this is fine!", &[], 10);
        assert_eq!(result.expect("comments are no-ops"), "");
        assert!(sink.is_empty());
    }

    #[test]
    fn unmatched_open_bracket_returns_error() {
        // The starting cell is zero, so encountering '[' with no matching ']' should error.
        let (result, _) = run("[+", &[], 10);
        assert!(matches!(
            result,
            Err(InterpretError::UnbalancedLoop { kind: UnmatchedBracketKind::Open, .. })
        ));
    }

    #[test]
    fn unmatched_close_bracket_fails_even_on_zero_cell() {
        let (result, _) = run("]", &[], 10);
        assert!(matches!(
            result,
            Err(InterpretError::UnbalancedLoop { ip: 0, kind: UnmatchedBracketKind::Close })
        ));
    }

    #[test]
    fn unbalanced_program_emits_nothing() {
        let (result, sink) = run("+.]", &[], 10);
        assert!(result.is_err());
        assert!(sink.is_empty());
    }

    #[test]
    fn left_pointer_out_of_bounds_errors() {
        let (result, _) = run("<", &[], 10);
        assert!(matches!(
            result,
            Err(InterpretError::SegmentationFault { ip: 0, ptr: 0, op: '<' })
        ));
    }

    #[test]
    fn right_pointer_out_of_bounds_errors() {
        // With 3 cells (0..=2), the 3rd '>' attempts to move beyond index 2.
        let (result, _) = run(&">".repeat(3), &[], 3);
        assert!(matches!(
            result,
            Err(InterpretError::SegmentationFault { ip: 2, ptr: 2, op: '>' })
        ));
    }

    #[test]
    fn wrapping_pointer_policy_is_opt_in() {
        let mut sink = Vec::new();
        let mut bf = Interpreter::with_io(&[][..], &mut sink);
        bf.set_tape_size(4);
        bf.set_pointer_policy(PointerPolicy::Wrapping);
        // Start at 0, wrap to cell 3, bump it, walk right back around to 3.
        let result = bf.interpret("<+>>>>.");
        assert!(result.is_ok());
        drop(bf);
        assert_eq!(sink, [1]);
    }

    #[test]
    fn empty_loop_on_zero_cell_is_ok() {
        let (result, _) = run("[]", &[], 10);
        assert!(result.is_ok());
    }

    #[test]
    fn simple_program_without_io_runs_ok() {
        // Increment a few times and use a loop to zero the cell.
        let (result, _) = run("+++[-]", &[], 10);
        assert!(result.is_ok());
    }

    #[test]
    fn wrapping_subtraction() {
        let (_, sink) = run("-.", &[], 1);
        assert_eq!(sink, [255]);
    }

    #[test]
    fn wrapping_addition() {
        let code = format!("{}.", "+".repeat(256)); // 256 increments should wrap around
        let (_, sink) = run(&code, &[], 1);
        assert_eq!(sink, [0u8]);
    }

    #[test]
    fn loop_multiplies() {
        let (result, sink) = run("+++[>+++<-]>.", &[], 10);
        assert!(result.is_ok());
        assert_eq!(sink, [9]);
    }

    #[test]
    fn echo_until_zero() {
        let (result, sink) = run(",[.,]", &[1, 4, 2, 3, 5, 2, 3, 0], 16);
        assert!(result.is_ok());
        assert_eq!(sink, [1, 4, 2, 3, 5, 2, 3]);
    }

    #[test]
    fn reverse_input() {
        let (result, sink) = run(">,[>,]<[.<]", &[1, 4, 2, 3, 5, 2, 3, 0], 16);
        assert!(result.is_ok());
        assert_eq!(sink, [3, 2, 5, 3, 2, 4, 1]);
    }

    #[test]
    fn sum_one_to_n() {
        let (result, sink) = run(",[[->>+>+<<<]>>>[-<<<+>>>]<[-<+>]<<-]>.", &[3], 16);
        assert!(result.is_ok());
        assert_eq!(sink, [6]);
    }

    #[test]
    fn exhausted_input_is_an_input_failure() {
        let (result, _) = run(",", &[], 10);
        let err = result.expect_err("no input available");
        assert_eq!(err.kind(), ErrorKind::InputFailure);
        assert_eq!(err.position(), 0);
    }

    #[test]
    fn eof_zero_policy_clears_the_cell() {
        let mut sink = Vec::new();
        let mut bf = Interpreter::with_io(&[][..], &mut sink);
        bf.set_eof_policy(EofPolicy::Zero);
        assert!(bf.interpret("+++,.").is_ok());
        drop(bf);
        assert_eq!(sink, [0u8]);
    }

    #[test]
    fn output_failure_is_reported() {
        let mut bf = Interpreter::with_io(&[][..], BrokenPipe);
        let err = bf.interpret("+.").expect_err("sink is closed");
        assert_eq!(err.kind(), ErrorKind::OutputFailure);
        assert_eq!(err.position(), 1);
    }

    #[test]
    fn returned_output_is_trimmed() {
        // Emits "\n A \n"
        let code = "++++++++++.>++++[>++++++++<-]>.>++++++++[>++++++++<-]>+.<<.<<.";
        let (result, sink) = run(code, &[], 16);
        assert_eq!(result.expect("runs"), "A");
        assert_eq!(sink, b"\n A \n");
    }

    #[test]
    fn control_bytes_are_trimmed_like_spaces() {
        // A lone NUL is all padding
        let (result, sink) = run(".", &[], 16);
        assert_eq!(result.expect("runs"), "");
        assert_eq!(sink, [0u8]);

        // 0x01 around an 'A'
        let code = format!("+.>{}.<.", "+".repeat(65));
        let (result, _) = run(&code, &[], 16);
        assert_eq!(result.expect("runs"), "A");
    }

    #[test]
    fn high_bytes_are_not_trimmed() {
        // 256 - 96 = 0xA0, a non-breaking space once mapped to a char
        let (result, _) = run(&format!("{}.", "-".repeat(96)), &[], 16);
        assert_eq!(result.expect("runs"), "\u{a0}");

        // 0x85, next line
        let (result, _) = run(&format!("{}.", "-".repeat(123)), &[], 16);
        assert_eq!(result.expect("runs"), "\u{85}");
    }

    #[test]
    fn state_does_not_leak_between_runs() {
        let code = format!("{}.", "+".repeat(49)); // '1'
        let mut sink = Vec::new();
        let mut bf = Interpreter::with_io(&[][..], &mut sink);
        assert_eq!(bf.interpret(&code).expect("runs"), "1");
        // A fresh tape means this prints 1 again, not 2.
        assert_eq!(bf.interpret(&code).expect("runs"), "1");
        assert_eq!(bf.output_bytes(), b"1");
    }

    #[test]
    fn tape_size_change_applies_to_next_run() {
        let mut bf = Interpreter::with_io(&[][..], Vec::new());
        assert!(bf.interpret(">>>>>").is_ok());
        bf.set_tape_size(5);
        assert_eq!(bf.tape_size(), 5);
        let err = bf.interpret(">>>>>").expect_err("only five cells");
        assert_eq!(err.kind(), ErrorKind::SegmentationFault);
    }

    #[test]
    fn partial_output_survives_a_failure() {
        let mut bf = Interpreter::with_io(&[][..], Vec::new());
        bf.set_tape_size(2);
        let code = format!("{}.>><", "+".repeat(66)); // 'B', then walk off the tape
        let err = bf.interpret(&code).expect_err("off the tape");
        assert_eq!(err.kind(), ErrorKind::SegmentationFault);
        assert_eq!(bf.output(), "B");
        let (_, sink) = bf.into_inner();
        assert_eq!(sink, b"B");
    }

    #[test]
    fn debug_trace_announces_both_phases() {
        let trace = SharedBuf::default();
        let mut bf = Interpreter::with_io(&[][..], Vec::new());
        bf.set_debug_trace(true);
        bf.set_trace_sink(trace.clone());
        assert!(bf.interpret("+").is_ok());
        let text = String::from_utf8(trace.0.borrow().clone()).expect("utf8");
        assert_eq!(text, "loading program\nexecuting program\n");
        assert!(bf.output_sink().is_empty());
    }

    #[test]
    fn step_trace_prints_a_table_without_touching_output() {
        let trace = SharedBuf::default();
        let mut bf = Interpreter::with_io(&[][..], Vec::new());
        bf.set_step_trace(true);
        bf.set_trace_sink(trace.clone());
        assert!(bf.interpret(">+.").is_ok());
        let text = String::from_utf8(trace.0.borrow().clone()).expect("utf8");
        assert!(text.contains("STEP | IP"));
        assert!(text.contains("Moved pointer head to index 1"));
        assert!(text.contains("Increment cell[1] from 0 to 1"));
        assert_eq!(*bf.output_sink(), vec![1]);
    }

    #[test]
    fn eof_policy_parses() {
        assert_eq!("fail".parse::<EofPolicy>(), Ok(EofPolicy::Fail));
        assert_eq!("ZERO".parse::<EofPolicy>(), Ok(EofPolicy::Zero));
        assert!("maybe".parse::<EofPolicy>().is_err());
    }
}
