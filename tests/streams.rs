use assert_cmd::Command;
use predicates::prelude::*;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("codexter").unwrap();
    cmd.env("CODEXTER_CONFIG", "/nonexistent/codexter.toml");
    cmd
}

#[test]
fn program_output_goes_to_stdout_only() {
    cargo_bin()
        .args(["run", "20722105"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hi"))
        .stderr(predicate::str::contains("Hi").not());
}

#[test]
fn errors_go_to_stderr_only() {
    cargo_bin()
        .args(["run", "2z"])
        .assert()
        .failure()
        .stdout("\n")
        .stderr(predicate::str::contains("invalid character 'z'"));
}

#[test]
fn output_before_an_abort_is_kept() {
    // Prints 'H' and then spins forever in the loop.
    cargo_bin()
        .args(["run", "--max-steps", "100", "2072770909"])
        .assert()
        .failure()
        .stdout(predicate::str::starts_with("H"))
        .stderr(predicate::str::contains("step limit exceeded (100)"));
}
