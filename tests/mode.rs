use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env("BF_CONFIG", "/nonexistent/bf-tape/bf.toml")
        .env_remove("BF_REPL_MODE")
        .env_remove("BF_TAPE_SIZE");
    cmd
}

fn small_valid_bf() -> &'static str { "+++." }

#[test]
fn test_auto_bare_on_piped_stdin_executes_once() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .write_stdin(small_valid_bf())
        .assert()
        .success()
        .stdout("\u{3}\n");
}

#[test]
fn test_repl_respects_bf_repl_once_env() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .env("BF_REPL_ONCE", "1")
        .write_stdin(small_valid_bf())
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_forced_editor_on_non_tty_errors() {
    // Piped stdin (non-tty) + --editor should error out with non-zero and helpful message.
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("repl")
        .arg("--editor")
        .write_stdin(small_valid_bf())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("stdin is not a TTY"));
}

#[test]
fn test_env_mode_respected_flags_override() {
    cargo_bin()
        .env("BF_REPL_MODE", "editor")
        .arg("repl")
        .arg("--bare")
        .write_stdin(small_valid_bf())
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{3}"));
}

#[test]
fn test_env_bare_mode() {
    cargo_bin()
        .env("BF_REPL_MODE", "bare")
        .write_stdin(small_valid_bf())
        .assert()
        .success()
        .stdout("\u{3}\n");
}

#[test]
fn test_invalid_env_mode_is_rejected() {
    cargo_bin()
        .env("BF_REPL_MODE", "fancy")
        .write_stdin(small_valid_bf())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid BF_REPL_MODE value"));
}

#[test]
fn test_bare_and_editor_conflict() {
    cargo_bin()
        .arg("repl").arg("--bare").arg("--editor")
        .assert()
        .code(2);
}
