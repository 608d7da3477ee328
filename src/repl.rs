use std::env;
use std::io::{self, IsTerminal, Read, Write};
use std::str::FromStr;

use reedline::{
    default_emacs_keybindings, DefaultPrompt, DefaultPromptSegment, EditCommand, Emacs, FileBackedHistory,
    Highlighter, HistoryItem, KeyCode, KeyModifiers, Reedline, ReedlineEvent, Signal, StyledText,
};

use crate::cli_util;
use crate::interpreter::{Interpreter, InterpreterConfig};
use crate::loader;
use crate::theme;

/// Set to `1` to leave the REPL after the first program that runs.
pub const ENV_REPL_ONCE: &str = "BF_REPL_ONCE";
/// `bare` or `editor`; consulted when no mode flag is given.
pub const ENV_REPL_MODE: &str = "BF_REPL_MODE";

const HISTORY_CAPACITY: usize = 1_000;

/// Interactive loop: every submission runs on the same interpreter, each on a fresh tape.
pub fn repl_loop(config: InterpreterConfig) -> io::Result<()> {
    let mut editor = init_line_editor()?;
    let mut bf = Interpreter::with_config(config);

    while let Some(submission) = read_submission_interactive(&mut editor)? {
        if loader::load(&submission).is_empty() {
            continue;
        }

        execute_submission(&mut bf, &submission);

        if stop_after_one_run() {
            return Ok(());
        }
    }

    // Leave the shell prompt on a clean line
    println!();
    io::stdout().flush()
}

fn stop_after_one_run() -> bool {
    env::var(ENV_REPL_ONCE).is_ok_and(|v| v == "1")
}

fn init_line_editor() -> io::Result<Reedline> {
    // Enter edits; ctrl+d (ctrl+z on Windows) runs the buffer.
    // Plain arrows move inside the buffer, modified arrows walk history.
    let bindings = [
        (KeyModifiers::NONE, KeyCode::Enter, ReedlineEvent::Edit(vec![EditCommand::InsertNewline])),
        (KeyModifiers::CONTROL, KeyCode::Char('d'), ReedlineEvent::Submit),
        (KeyModifiers::CONTROL, KeyCode::Char('z'), ReedlineEvent::Submit),
        (KeyModifiers::NONE, KeyCode::Up, ReedlineEvent::Up),
        (KeyModifiers::NONE, KeyCode::Down, ReedlineEvent::Down),
        (KeyModifiers::ALT, KeyCode::Up, ReedlineEvent::PreviousHistory),
        (KeyModifiers::CONTROL, KeyCode::Up, ReedlineEvent::PreviousHistory),
        (KeyModifiers::ALT, KeyCode::Down, ReedlineEvent::NextHistory),
        (KeyModifiers::CONTROL, KeyCode::Down, ReedlineEvent::NextHistory),
    ];

    let mut keybindings = default_emacs_keybindings();
    for (modifiers, key, event) in bindings {
        keybindings.add_binding(modifiers, key, event);
    }

    let history = FileBackedHistory::new(HISTORY_CAPACITY).map_err(|e| io::Error::other(e.to_string()))?;

    Ok(Reedline::create()
        .with_highlighter(Box::new(BrainfuckHighlighter))
        .with_history(Box::new(history))
        .with_edit_mode(Box::new(Emacs::new(keybindings))))
}

/// The whole of `input` as one program. `None` for empty or unreadable input.
pub fn read_submission<R: Read>(input: &mut R) -> Option<String> {
    let mut program = String::new();
    match input.read_to_string(&mut program) {
        Ok(_) if !program.is_empty() => Some(program),
        _ => None,
    }
}

fn read_submission_interactive(editor: &mut Reedline) -> io::Result<Option<String>> {
    let prompt = DefaultPrompt::new(DefaultPromptSegment::Basic("bf".to_string()), DefaultPromptSegment::Empty);

    match editor.read_line(&prompt) {
        Ok(Signal::Success(program)) => {
            if !program.trim().is_empty() {
                let _ = editor.history_mut().save(HistoryItem::from_command_line(program.clone()));
            }
            Ok(Some(program))
        }
        Ok(Signal::CtrlC | Signal::CtrlD) => Ok(None),
        Err(e) => {
            eprintln!("repl: editor error: {e}");
            let _ = io::stderr().flush();
            Ok(None)
        }
    }
}

/// Run one submission. Output lands on stdout, a failure is reported on
/// stderr, and stdout always gets a trailing newline.
fn execute_submission(bf: &mut Interpreter, source: &str) {
    if let Err(err) = bf.interpret(source) {
        cli_util::print_interpret_error(None, source, &err);
    }
    println!();
    let _ = io::stdout().flush();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplMode {
    Bare,
    Editor,
}

impl FromStr for ReplMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bare" => Ok(ReplMode::Bare),
            "editor" => Ok(ReplMode::Editor),
            _ => Err(format!("invalid {ENV_REPL_MODE} value: {s}, must be 'bare' or 'editor'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeFlagOverride {
    None,
    Bare,
    Editor,
}

/// Pick the REPL mode: flags first, then `BF_REPL_MODE`, then TTY detection.
pub fn select_mode(flag: ModeFlagOverride) -> Result<ReplMode, String> {
    select_mode_with(flag, env::var(ENV_REPL_MODE).ok(), io::stdin().is_terminal())
}

fn select_mode_with(flag: ModeFlagOverride, env_mode: Option<String>, stdin_tty: bool) -> Result<ReplMode, String> {
    let (requested, origin) = match flag {
        ModeFlagOverride::Bare => (Some(ReplMode::Bare), "--bare"),
        ModeFlagOverride::Editor => (Some(ReplMode::Editor), "--editor"),
        ModeFlagOverride::None => match env_mode {
            Some(raw) => (Some(raw.parse()?), ENV_REPL_MODE),
            None => (None, "auto-detect"),
        },
    };

    match requested {
        Some(ReplMode::Editor) if !stdin_tty => Err(format!(
            "cannot start editor: stdin is not a TTY (requested by {origin}; use bare mode for piped input)"
        )),
        Some(mode) => Ok(mode),
        None if stdin_tty => Ok(ReplMode::Editor),
        None => Ok(ReplMode::Bare),
    }
}

/// Bare mode: read stdin until EOF and run it once.
pub fn execute_bare_once(config: InterpreterConfig) -> io::Result<()> {
    let submission = read_submission(&mut io::stdin().lock());

    if let Some(source) = submission.filter(|s| !loader::load(s).is_empty()) {
        let mut bf = Interpreter::with_config(config);
        execute_submission(&mut bf, &source);
    }
    Ok(())
}

/// Colours Brainfuck operators by role and dims everything else.
struct BrainfuckHighlighter;

impl Highlighter for BrainfuckHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();
        for ch in line.chars() {
            let style = theme::instruction_style(ch);
            match styled.buffer.last_mut() {
                Some((last, run)) if *last == style => run.push(ch),
                _ => styled.push((style, ch.to_string())),
            }
        }
        styled
    }
}
