use std::io::{self, IsTerminal, Write};

use crate::error::InterpretError;
use crate::loader;
use crate::theme;

/// Show a short window around the position for context
const WINDOW_CHARS: usize = 32;

/// Pretty-print an [`InterpretError`] to stderr with caret positioning.
/// If `program` is `Some("bf")`, prefix messages with "bf: ..." for CLI run mode.
pub fn print_interpret_error(program: Option<&str>, source: &str, err: &InterpretError) {
    let styled = io::stderr().is_terminal();
    let report = render_interpret_error(program, source, err, styled);
    let mut stderr = io::stderr().lock();
    let _ = stderr.write_all(report.as_bytes());
    let _ = stderr.flush();
}

/// Build the report printed by [`print_interpret_error`].
///
/// Positions in the error refer to the filtered program; the caret is placed
/// under the matching character of the original `source`.
pub fn render_interpret_error(
    program: Option<&str>,
    source: &str,
    err: &InterpretError,
    styled: bool,
) -> String {
    let msg = match err {
        InterpretError::SegmentationFault { ptr, op, .. } => {
            format!("Runtime error: segmentation fault (ptr={ptr}, op={op})")
        }
        InterpretError::UnbalancedLoop { kind, .. } => {
            format!("Parse error: unmatched bracket {kind}")
        }
        InterpretError::InputFailure { source, .. } => format!("I/O error: input failure: {source}"),
        InterpretError::OutputFailure { source, .. } => format!("I/O error: output failure: {source}"),
    };
    let msg = match program {
        Some(p) => format!("{p}: {msg}"),
        None => msg,
    };

    let ip = err.position();
    let pos = loader::load(source)
        .source_offset(ip)
        .unwrap_or_else(|| source.chars().count());

    let header = format!("{msg} at instruction {ip}");
    let (window, caret) = context_window(source, pos);

    if styled {
        let context = theme::error_context();
        format!(
            "{}\n  {}\n  {}\n",
            theme::error_header().paint(header),
            context.paint(window),
            context.paint(caret)
        )
    } else {
        format!("{header}\n  {window}\n  {caret}\n")
    }
}

/// Slice of `code` around char `pos` (newlines flattened) and a caret line under `pos`.
fn context_window(code: &str, pos: usize) -> (String, String) {
    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let slice: String = code
        .chars()
        .skip(start_char)
        .take(end_char - start_char)
        .map(|c| if c == '\n' || c == '\t' || c == '\r' { ' ' } else { c })
        .collect();

    // Caret under the exact position
    let caret_offset_chars = pos.saturating_sub(start_char);
    let mut underline = " ".repeat(caret_offset_chars);
    underline.push('^');

    (slice, underline)
}
