use std::io::Write as _;
use std::process::Command;

use tempfile::NamedTempFile;

fn aeolis() -> Command {
    Command::new(env!("CARGO_BIN_EXE_aeolis"))
}

fn il_file(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(source.as_bytes()).expect("write IL source");
    file
}

const ADD_PRINT: &str = "- _entry\n\
                         var a int\nvar b int\nvar c int\n\
                         assg a 2\nassg b 3\n\
                         bind in a\nbind in b\nbind out c\ncall add\n\
                         bind in c\ncall print\n\
                         ---\n";

// --- Running programs ---

#[test]
fn add_then_print_outputs_five() {
    let file = il_file(ADD_PRINT);
    let out = aeolis().arg(file.path()).output().expect("failed to run aeolis");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "5");
}

#[test]
fn user_function_enqueues_work() {
    let source = "- double\n\
                  bind in x\nbind in x\nbind out y\ncall add\n\
                  ---\n\
                  - _entry\n\
                  var x int\nvar y int\n\
                  assg x 21\n\
                  call double\n\
                  bind in y\ncall print\n\
                  ---\n";
    let file = il_file(source);
    let out = aeolis().arg(file.path()).output().expect("failed to run aeolis");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "42");
}

#[test]
fn prints_in_execution_order() {
    let source = "- _entry\n\
                  var a int\nvar b int\n\
                  assg a 1\nassg b 2\n\
                  bind in a\ncall print\n\
                  bind in b\ncall print\n\
                  ---\n";
    let file = il_file(source);
    let out = aeolis().arg(file.path()).output().expect("failed to run aeolis");
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "1\n2\n");
}

// --- Fatal runs ---

#[test]
fn deadlock_reports_queue_size() {
    let source = "- _entry\n\
                  var a int\nvar b int\nvar c int\n\
                  assg a 2\n\
                  bind in a\nbind in b\nbind out c\ncall add\n\
                  ---\n";
    let file = il_file(source);
    let out = aeolis().arg(file.path()).output().expect("failed to run aeolis");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("deadlock"), "stderr: {stderr}");
    assert!(stderr.contains('1'), "expected queue size in: {stderr}");
}

#[test]
fn redeclaration_is_fatal() {
    let file = il_file("- _entry\nvar x int\nvar x int\n---\n");
    let out = aeolis().arg(file.path()).output().expect("failed to run aeolis");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("already declared"), "stderr: {stderr}");
    assert!(stderr.contains('x'), "stderr: {stderr}");
}

#[test]
fn use_after_delete_is_fatal() {
    let file = il_file("- _entry\nvar x int\nassg x 1\ndel x\nassg x 2\n---\n");
    let out = aeolis().arg(file.path()).output().expect("failed to run aeolis");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown variable"));
}

#[test]
fn missing_entry_is_fatal() {
    let file = il_file("- other\n---\n");
    let out = aeolis().arg(file.path()).output().expect("failed to run aeolis");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("_entry"), "stderr: {stderr}");
}

#[test]
fn parse_error_names_the_line() {
    let file = il_file("- _entry\nfrob a b\n---\n");
    let out = aeolis().arg(file.path()).arg("--no-color").output().expect("failed to run aeolis");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("frob"), "stderr: {stderr}");
    assert!(stderr.contains("line 2"), "stderr: {stderr}");
}

#[test]
fn missing_file_is_fatal() {
    let out = aeolis().arg("no-such-file.il").output().expect("failed to run aeolis");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("cannot read"));
}

// --- Emit modes ---

#[test]
fn emit_json_dumps_parsed_program() {
    let file = il_file(ADD_PRINT);
    let out = aeolis()
        .arg(file.path())
        .args(["--emit", "json"])
        .output()
        .expect("failed to run aeolis");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let v: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(v["functions"][0]["name"], "_entry");
}

#[test]
fn emit_il_round_trips() {
    let file = il_file(ADD_PRINT);
    let out = aeolis()
        .arg(file.path())
        .args(["--emit", "il"])
        .output()
        .expect("failed to run aeolis");
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), ADD_PRINT);
}

#[test]
fn json_errors_are_parseable() {
    let file = il_file("- _entry\nvar x int\nvar x int\n---\n");
    let out = aeolis().arg(file.path()).arg("--json").output().expect("failed to run aeolis");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    let v: serde_json::Value = serde_json::from_str(stderr.trim()).expect("valid JSON on stderr");
    assert_eq!(v["severity"], "error");
    assert!(v["message"].as_str().unwrap().contains("already declared"));
}
