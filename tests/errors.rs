use assert_cmd::Command;
use predicates::prelude::*;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env("BF_CONFIG", "/nonexistent/bf-tape/bf.toml")
        .env_remove("BF_TAPE_SIZE")
        .env_remove("BF_POINTER_POLICY")
        .env_remove("BF_EOF")
        .env_remove("BF_DEBUG_TRACE");
    cmd
}

#[test]
fn moving_left_of_the_first_cell_is_a_segmentation_fault() {
    cargo_bin()
        .arg("run").arg("<")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Runtime error: segmentation fault (ptr=0, op=<) at instruction 0",
        ));
}

#[test]
fn moving_past_the_last_cell_is_a_segmentation_fault() {
    cargo_bin()
        .arg("run").arg("--tape-size").arg("10").arg(">".repeat(11))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("segmentation fault (ptr=9, op=>) at instruction 9"));
}

#[test]
fn ten_moves_fit_on_eleven_cells() {
    cargo_bin()
        .arg("run").arg("--tape-size").arg("11").arg(">".repeat(10))
        .assert()
        .success();
}

#[test]
fn wrap_flag_turns_faults_into_wraparound() {
    cargo_bin()
        .arg("run").arg("--wrap").arg("<+.")
        .assert()
        .success()
        .stdout("\u{1}\n");
}

#[test]
fn unmatched_open_bracket() {
    cargo_bin()
        .arg("run").arg("[")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Parse error: unmatched bracket '[' at instruction 0"));
}

#[test]
fn unmatched_close_bracket_fails_before_anything_runs() {
    cargo_bin()
        .arg("run").arg(format!("{}.]", "+".repeat(65)))
        .assert()
        .code(1)
        .stdout("\n")
        .stderr(predicate::str::contains("unmatched bracket ']' at instruction 66"));
}

#[test]
fn caret_points_into_the_original_source() {
    cargo_bin()
        .arg("run").arg("ab ]")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("\n  ab ]\n     ^\n"));
}

#[test]
fn output_before_a_fault_is_kept() {
    cargo_bin()
        .arg("run").arg(format!("{}.<", "+".repeat(65)))
        .assert()
        .code(1)
        .stdout("A\n")
        .stderr(predicate::str::contains("segmentation fault"));
}
