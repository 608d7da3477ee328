use crate::error::{InterpretError, UnmatchedBracketKind};
use crate::loader::{Instruction, Program};

/// Matching bracket positions for a [`Program`].
///
/// `targets[i]` holds the index of the bracket paired with the one at `i`.
/// For non-bracket positions, it is None.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTable {
    targets: Vec<Option<usize>>,
}

impl JumpTable {
    /// Pair every `[` with its `]`, failing on the first bracket left unmatched.
    pub fn build(program: &Program) -> Result<Self, InterpretError> {
        let mut targets = vec![None; program.len()];
        let mut stack: Vec<usize> = Vec::new();

        for (i, instr) in program.instructions().iter().enumerate() {
            match instr {
                Instruction::LoopStart => stack.push(i),
                Instruction::LoopEnd => {
                    let Some(open_index) = stack.pop() else {
                        return Err(InterpretError::UnbalancedLoop {
                            ip: i,
                            kind: UnmatchedBracketKind::Close,
                        });
                    };
                    targets[open_index] = Some(i);
                    targets[i] = Some(open_index);
                }
                _ => {}
            }
        }

        if let Some(unmatched_open) = stack.last().copied() {
            return Err(InterpretError::UnbalancedLoop {
                ip: unmatched_open,
                kind: UnmatchedBracketKind::Open,
            });
        }

        Ok(Self { targets })
    }

    /// Index of the bracket matching the one at `ip`.
    pub fn target(&self, ip: usize) -> Option<usize> {
        self.targets.get(ip).copied().flatten()
    }
}
