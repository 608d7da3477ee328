use std::fmt;
use std::io;

/// Errors that abort a run of the interpreter.
///
/// Every variant carries `ip`, the index of the offending instruction in the
/// loaded [`Program`](crate::Program) (not in the raw source text).
#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    /// The data pointer attempted to move left of cell 0 or beyond the last cell.
    #[error("Segmentation fault at instruction {ip} (ptr={ptr}, op='{op}')")]
    SegmentationFault { ip: usize, ptr: usize, op: char },

    /// A `[` or `]` has no matching counterpart in the program.
    #[error("Unbalanced loop: unmatched {kind} at instruction {ip}")]
    UnbalancedLoop { ip: usize, kind: UnmatchedBracketKind },

    /// The input source failed or ran dry while servicing `,`.
    #[error("Input failure at instruction {ip}: {source}")]
    InputFailure {
        ip: usize,
        #[source]
        source: io::Error,
    },

    /// The output sink rejected a byte written by `.` or the final flush.
    #[error("Output failure at instruction {ip}: {source}")]
    OutputFailure {
        ip: usize,
        #[source]
        source: io::Error,
    },
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnmatchedBracketKind {
    Open,
    Close,
}

impl fmt::Display for UnmatchedBracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedBracketKind::Open => write!(f, "'['"),
            UnmatchedBracketKind::Close => write!(f, "']'"),
        }
    }
}

/// Payload-free view of an [`InterpretError`], handy for matching and comparing outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SegmentationFault,
    UnbalancedLoop,
    InputFailure,
    OutputFailure,
}

impl InterpretError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InterpretError::SegmentationFault { .. } => ErrorKind::SegmentationFault,
            InterpretError::UnbalancedLoop { .. } => ErrorKind::UnbalancedLoop,
            InterpretError::InputFailure { .. } => ErrorKind::InputFailure,
            InterpretError::OutputFailure { .. } => ErrorKind::OutputFailure,
        }
    }

    /// Instruction index at which the run stopped.
    pub fn position(&self) -> usize {
        match self {
            InterpretError::SegmentationFault { ip, .. }
            | InterpretError::UnbalancedLoop { ip, .. }
            | InterpretError::InputFailure { ip, .. }
            | InterpretError::OutputFailure { ip, .. } => *ip,
        }
    }
}
