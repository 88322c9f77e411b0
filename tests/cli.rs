//! End-to-end tests running the `csvtool` binary against fixtures in `specs/`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("specs").join(name)
}

fn csvtool(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_csvtool"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_named_columns_without_footnote() {
    let input = fixture("cities.csv");
    let out = csvtool(&[
        "--input",
        input.to_str().unwrap(),
        "--named",
        "--filter",
        "4-",
        "--invert-filter",
        "City",
        "Population",
    ]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "City,Population\n\
         Tokyo,37400068\n\
         Delhi,28514000\n\
         Shanghai,25582000\n\
         Sao Paulo,21650000\n"
    );
}

#[test]
fn test_rename_keeps_quoting() {
    let input = fixture("cities.csv");
    let out = csvtool(&[
        "-i",
        input.to_str().unwrap(),
        "--filter",
        "0-3",
        "--named",
        "Notes",
        "City",
        "--new",
        "Remark",
        "",
    ]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "Remark,City\n\
         \"Largest, by metro area\",Tokyo\n\
         ,Delhi\n\
         \"Known as \"\"the Pearl of the Orient\"\"\",Shanghai\n\
         \"Spans\ntwo lines\",Sao Paulo\n"
    );
}

#[test]
fn test_no_print_header_to_file() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out.csv");
    let input = fixture("cities.csv");
    let out = csvtool(&[
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--named",
        "--no-print-header",
        "--filter",
        "1",
        "Country",
    ]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).is_empty());
    assert_eq!(fs::read_to_string(&output).unwrap(), "India\n");
}

#[test]
fn test_index_mode_from_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_csvtool"))
        .args(["2", "0", "--new", "third", "first"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"a,b,c\nd,e,f\n")
        .unwrap();
    let out = child.wait_with_output().unwrap();

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "third,first\nc,a\nf,d\n");
}

#[test]
fn test_semicolon_dialect_and_non_numeric_quoting() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.csv");
    fs::write(&input, "name;qty\nbolt;12\n").unwrap();

    let out = csvtool(&[
        "-i",
        input.to_str().unwrap(),
        "-d",
        ";",
        "--quote-style",
        "non-numeric",
        "--named",
        "qty",
        "name",
    ]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "\"qty\";\"name\"\n12;\"bolt\"\n");
}

#[test]
fn test_unknown_column_fails() {
    let input = fixture("cities.csv");
    let out = csvtool(&["-i", input.to_str().unwrap(), "--named", "City", "Missing"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("\"Missing\""), "stderr: {}", stderr(&out));
}

#[test]
fn test_malformed_filter_fails_before_output_is_created() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out.csv");
    let input = fixture("cities.csv");
    let out = csvtool(&[
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--filter",
        "3-1",
        "0",
    ]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("'3-1'"), "stderr: {}", stderr(&out));
    assert!(!output.exists());
}

#[test]
fn test_rename_count_mismatch_fails() {
    let input = fixture("cities.csv");
    let out = csvtool(&["-i", input.to_str().unwrap(), "0", "--new", "a", "b"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(
        stderr(&out).contains("2 new names but 1 columns"),
        "stderr: {}",
        stderr(&out)
    );
}

#[test]
fn test_bad_column_index_fails() {
    let input = fixture("cities.csv");
    let out = csvtool(&["-i", input.to_str().unwrap(), "City"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("invalid column index 'City'"));
}

#[test]
fn test_short_row_stops_the_run() {
    let input = fixture("ragged.csv");
    let out = csvtool(&["-i", input.to_str().unwrap(), "2"]);

    assert_eq!(out.status.code(), Some(1));
    // Rows before the short one were already written.
    assert_eq!(stdout(&out), "score\n90\n");
    assert!(stderr(&out).contains("row 2"), "stderr: {}", stderr(&out));
}

#[test]
fn test_width_warning_logged() {
    let input = fixture("ragged.csv");
    let out = csvtool(&["-i", input.to_str().unwrap(), "--named", "id"]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "id\n1\n2\n3\n");
    assert!(
        stderr(&out).contains("row width differs"),
        "stderr: {}",
        stderr(&out)
    );
}
