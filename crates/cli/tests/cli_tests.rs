// Integration tests for the `taskgrid` binary.
// Run with: cargo test -p taskgrid-cli --test cli_tests

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use httpmock::prelude::*;
use serde_json::json;

fn taskgrid(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_taskgrid"));
    cmd.current_dir(dir)
        .env("TASKGRID_SETTINGS", dir.join("settings.json"))
        .env_remove("TASKGRID_RELAY_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn run(dir: &Path, args: &[&str]) -> Output {
    taskgrid(dir).args(args).output().expect("run taskgrid")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn init(dir: &Path, rows: &str) {
    let output = run(dir, &["init", "--rows", rows, "--out", "plan.json"]);
    assert!(output.status.success(), "init failed: {:?}", output);
}

#[test]
fn init_then_show_prints_headers() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path(), "2");

    let output = run(dir.path(), &["show", "plan.json"]);
    assert!(output.status.success());
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Task Name\tStatus\tPriority\tStart Date\tDeadline");
    assert_eq!(lines.len(), 3);
}

#[test]
fn paste_tsv_from_file_updates_document() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path(), "1");
    fs::write(dir.path().join("rows.tsv"), "Design\tOpen\nBuild\tBlocked\n").unwrap();

    let output = run(dir.path(), &["paste", "plan.json", "--text", "rows.tsv", "--at", "1,1"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = stdout(&run(dir.path(), &["show", "plan.json"]));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1], "Design\tOpen\t\t\t");
    assert_eq!(lines[2], "Build\tBlocked\t\t\t");
}

#[test]
fn paste_html_keeps_formatting_in_export() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path(), "1");
    fs::write(dir.path().join("cell.txt"), "Launch").unwrap();
    fs::write(
        dir.path().join("cell.html"),
        "<table><tr><td><b>Launch</b></td></tr></table>",
    )
    .unwrap();

    let output = run(
        dir.path(),
        &["paste", "plan.json", "--text", "cell.txt", "--html", "cell.html", "--at", "1,1", "--out", "styled.json"],
    );
    assert!(output.status.success());

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("styled.json")).unwrap()).unwrap();
    assert_eq!(doc["tasks"][0]["name"], "Launch");
    assert_eq!(doc["formatting"].as_array().unwrap().len(), 1);

    // Input file untouched when --out is given
    let original = stdout(&run(dir.path(), &["show", "plan.json"]));
    assert!(!original.contains("Launch"));
}

#[test]
fn paste_outside_grid_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path(), "1");
    fs::write(dir.path().join("x.txt"), "x").unwrap();

    let output = run(dir.path(), &["paste", "plan.json", "--text", "x.txt", "--at", "5,1"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn append_into_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path(), "0");
    fs::write(dir.path().join("rows.tsv"), "Design\nBuild\n").unwrap();

    let output = run(
        dir.path(),
        &["paste", "plan.json", "--text", "rows.tsv", "--at", "1,1", "--mode", "append"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = stdout(&run(dir.path(), &["show", "plan.json"]));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("Design\t"));
    assert!(lines[2].starts_with("Build\t"));
}

#[test]
fn replace_warns_about_dropped_columns() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path(), "1");
    fs::write(dir.path().join("wide.tsv"), "a\tb\tc").unwrap();

    let output = run(dir.path(), &["paste", "plan.json", "--text", "wide.tsv", "--at", "1,4"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning: 1 pasted column(s) fell outside the grid"), "{}", stderr);

    let text = stdout(&run(dir.path(), &["show", "plan.json"]));
    assert_eq!(text.lines().nth(1), Some("\t\t\ta\tb"));
}

#[test]
fn unknown_paste_mode_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path(), "1");
    fs::write(dir.path().join("x.txt"), "x").unwrap();

    let output = run(
        dir.path(),
        &["paste", "plan.json", "--text", "x.txt", "--at", "1,1", "--mode", "sideways"],
    );
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("insert-rows"));
}

#[test]
fn settings_default_paste_mode_applies() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("settings.json"), r#"{"paste.defaultMode": "append"}"#).unwrap();
    init(dir.path(), "2");
    fs::write(dir.path().join("x.txt"), "extra").unwrap();

    let output = run(dir.path(), &["paste", "plan.json", "--text", "x.txt", "--at", "1,1"]);
    assert!(output.status.success());

    let text = stdout(&run(dir.path(), &["show", "plan.json"]));
    assert_eq!(text.lines().count(), 4);
    assert!(text.lines().last().unwrap().starts_with("extra"));
}

#[test]
fn add_column_appears_in_show() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path(), "0");

    let output = run(dir.path(), &["add-column", "plan.json", "--title", "Owner"]);
    assert!(output.status.success());
    let text = stdout(&run(dir.path(), &["show", "plan.json"]));
    assert!(text.lines().next().unwrap().ends_with("\tOwner"));

    let dup = run(dir.path(), &["add-column", "plan.json", "--title", "Owner"]);
    assert_eq!(dup.status.code(), Some(5));
}

#[test]
fn corrupt_document_has_its_own_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("plan.json"), "not json").unwrap();

    let output = run(dir.path(), &["show", "plan.json"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn generate_merges_relay_reply() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(json!({
            "choices": [{"message": {"role": "assistant", "content":
                "{\"columns\": [{\"title\": \"Owner\"}], \"rows\": [{\"Task Name\": \"Book venue\", \"Owner\": \"Lee\"}]}"
            }}]
        }));
    });

    let dir = tempfile::tempdir().unwrap();
    init(dir.path(), "0");

    let endpoint = format!("{}/v1/chat/completions", server.base_url());
    let output = run(
        dir.path(),
        &["generate", "plan.json", "--prompt", "plan a launch", "--endpoint", &endpoint],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    mock.assert();

    let text = stdout(&run(dir.path(), &["show", "plan.json"]));
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].ends_with("\tOwner"));
    assert_eq!(lines[1], "Book venue\t\t\t\t\tLee");
}

#[test]
fn generate_reports_relay_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(401).json_body(json!({"error": {"message": "bad token"}}));
    });

    let dir = tempfile::tempdir().unwrap();
    init(dir.path(), "1");

    let endpoint = format!("{}/v1/chat/completions", server.base_url());
    let output = run(
        dir.path(),
        &["generate", "plan.json", "--prompt", "x", "--endpoint", &endpoint],
    );
    assert_eq!(output.status.code(), Some(11));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad token"));
    assert!(stderr.contains("TASKGRID_RELAY_KEY"));
}
