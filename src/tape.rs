use std::fmt;
use std::str::FromStr;

/// Number of cells a tape gets unless configured otherwise.
pub const DEFAULT_TAPE_SIZE: usize = 1024;

/// What happens when the data pointer is moved off either end of the tape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerPolicy {
    /// Leaving `[0, len)` is a segmentation fault.
    #[default]
    Bounded,
    /// `<` at cell 0 moves to the last cell and `>` at the last cell moves to 0.
    Wrapping,
}

impl FromStr for PointerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bounded" => Ok(PointerPolicy::Bounded),
            "wrap" | "wrapping" => Ok(PointerPolicy::Wrapping),
            other => Err(format!("invalid pointer policy: {other}, must be 'bounded' or 'wrap'")),
        }
    }
}

impl fmt::Display for PointerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerPolicy::Bounded => write!(f, "bounded"),
            PointerPolicy::Wrapping => write!(f, "wrap"),
        }
    }
}

/// The pointer would have left the tape under [`PointerPolicy::Bounded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    /// Pointer position before the rejected move.
    pub ptr: usize,
}

/// Fixed-length strip of wrapping byte cells plus the data pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
    policy: PointerPolicy,
}

impl Tape {
    /// A zeroed tape of `size` cells. A size of 0 is raised to 1.
    pub fn new(size: usize, policy: PointerPolicy) -> Self {
        Self {
            cells: vec![0; size.max(1)],
            pointer: 0,
            policy,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn current(&self) -> u8 {
        self.cells[self.pointer]
    }

    pub fn set_current(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    pub fn increment(&mut self) -> u8 {
        let after = self.current().wrapping_add(1);
        self.set_current(after);
        after
    }

    pub fn decrement(&mut self) -> u8 {
        let after = self.current().wrapping_sub(1);
        self.set_current(after);
        after
    }

    pub fn move_right(&mut self) -> Result<(), OutOfBounds> {
        if self.pointer + 1 < self.cells.len() {
            self.pointer += 1;
            return Ok(());
        }
        match self.policy {
            PointerPolicy::Bounded => Err(OutOfBounds { ptr: self.pointer }),
            PointerPolicy::Wrapping => {
                self.pointer = 0;
                Ok(())
            }
        }
    }

    pub fn move_left(&mut self) -> Result<(), OutOfBounds> {
        if self.pointer > 0 {
            self.pointer -= 1;
            return Ok(());
        }
        match self.policy {
            PointerPolicy::Bounded => Err(OutOfBounds { ptr: self.pointer }),
            PointerPolicy::Wrapping => {
                self.pointer = self.cells.len() - 1;
                Ok(())
            }
        }
    }
}
