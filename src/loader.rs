//! Turns raw source text into a dense [`Program`].
//!
//! Only the eight operators `><+-.,[]` are kept. Every other character,
//! including whitespace, letters, digits and punctuation, is a comment.

use std::fmt;

/// One of the eight Brainfuck operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    MoveRight,
    MoveLeft,
    Increment,
    Decrement,
    Output,
    Input,
    LoopStart,
    LoopEnd,
}

impl Instruction {
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '>' => Instruction::MoveRight,
            '<' => Instruction::MoveLeft,
            '+' => Instruction::Increment,
            '-' => Instruction::Decrement,
            '.' => Instruction::Output,
            ',' => Instruction::Input,
            '[' => Instruction::LoopStart,
            ']' => Instruction::LoopEnd,
            _ => return None,
        })
    }

    pub fn symbol(self) -> char {
        match self {
            Instruction::MoveRight => '>',
            Instruction::MoveLeft => '<',
            Instruction::Increment => '+',
            Instruction::Decrement => '-',
            Instruction::Output => '.',
            Instruction::Input => ',',
            Instruction::LoopStart => '[',
            Instruction::LoopEnd => ']',
        }
    }
}

/// The filtered instruction sequence for a single run.
///
/// Alongside each instruction the program remembers the char offset it was
/// read from, so diagnostics can point into the original source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
    offsets: Vec<usize>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, ip: usize) -> Option<Instruction> {
        self.instructions.get(ip).copied()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Char index in the source text that produced instruction `ip`.
    pub fn source_offset(&self, ip: usize) -> Option<usize> {
        self.offsets.get(ip).copied()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instr in &self.instructions {
            write!(f, "{}", instr.symbol())?;
        }
        Ok(())
    }
}

/// Build a [`Program`] from raw source text.
///
/// Whitespace only separates tokens; each character of each token is then
/// checked on its own, so the result is the same as filtering the whole text.
pub fn load(source: &str) -> Program {
    let mut program = Program::default();
    for (offset, ch) in source.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        if let Some(instr) = Instruction::from_char(ch) {
            program.instructions.push(instr);
            program.offsets.push(offset);
        }
    }
    program
}

/// Keep only Brainfuck instruction characters
pub fn bf_only(s: &str) -> String {
    load(s).to_string()
}
