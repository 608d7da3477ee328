pub mod catppuccin {
    use nu_ansi_term::Color;
    pub struct Mocha;
    impl Mocha {
        // Base colors
        pub const TEXT: Color = Color::Rgb(205, 214, 244);
        pub const OVERLAY0: Color = Color::Rgb(108, 112, 134);

        // Accents
        pub const RED: Color = Color::Rgb(243, 139, 168);
        pub const GREEN: Color = Color::Rgb(166, 227, 161);
        pub const YELLOW: Color = Color::Rgb(249, 226, 175);
        pub const MAUVE: Color = Color::Rgb(203, 166, 247);
        pub const PEACH: Color = Color::Rgb(250, 179, 135);
        pub const TEAL: Color = Color::Rgb(148, 226, 213);
        pub const SKY: Color = Color::Rgb(137, 220, 235);
    }
}

use nu_ansi_term::Style;

use crate::loader::Instruction;
use catppuccin::Mocha as P;

/// Style for a source character in the editor.
///
/// > <   => SKY/TEAL (movement)
/// + -   => GREEN/RED (cell arithmetic)
/// . ,   => YELLOW/PEACH (I/O)
/// [ ]   => MAUVE (flow control)
pub fn instruction_style(ch: char) -> Style {
    match Instruction::from_char(ch) {
        Some(Instruction::MoveRight) => Style::new().fg(P::SKY).bold(),
        Some(Instruction::MoveLeft) => Style::new().fg(P::TEAL).bold(),
        Some(Instruction::Increment) => Style::new().fg(P::GREEN).bold(),
        Some(Instruction::Decrement) => Style::new().fg(P::RED).bold(),
        Some(Instruction::Output) => Style::new().fg(P::YELLOW).bold(),
        Some(Instruction::Input) => Style::new().fg(P::PEACH).bold(),
        Some(Instruction::LoopStart | Instruction::LoopEnd) => Style::new().fg(P::MAUVE).bold(),
        None => Style::new().fg(P::OVERLAY0),
    }
}

/// Header line of an error report.
pub fn error_header() -> Style {
    Style::new().fg(P::RED).bold()
}

/// Caret and context lines under an error header.
pub fn error_context() -> Style {
    Style::new().fg(P::TEXT)
}
