//! Running `perfsum` against files and commands.

use std::path::Path;
use std::process::{Command, Output};

const BEFORE_LOG: &str = r"Build started 10/14/2026 9:12:03 AM.

Project Evaluation Performance Summary:
      438 ms  C:\src\app\app.csproj   1 calls
       12 ms  C:\src\lib\lib.csproj   2 calls

Target Performance Summary:
      900 ms  CoreCompile   2 calls

Task Performance Summary:
       10 ms  Copy   3 calls
       20 ms  Csc   1 calls

Build succeeded.
";

const AFTER_LOG: &str = r"Task Performance Summary:

      7.5 ms  Copy   3 calls
     2.25 ms  Touch   1 calls
";

const AFTER_TRACE: &str = r#"{"providerName":"Microsoft-Build","eventName":"ExecuteTask/Start","threadId":1,"timestampMS":100,"payload":{"taskName":"Csc"}}
{"providerName":"Microsoft-Build","eventName":"ExecuteTask/Stop","threadId":1,"timestampMS":105,"payload":{"taskName":"Csc"}}
{"providerName":"Microsoft-Build","eventName":"ExecuteTask/Start","threadId":2,"timestampMS":110,"payload":{"taskName":"Csc"}}
{"providerName":"Microsoft-Build","eventName":"ExecuteTask/Stop","threadId":2,"timestampMS":112,"payload":{"taskName":"Csc"}}
"#;

fn perfsum(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_perfsum"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run perfsum")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn test_single_log_to_stdout() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "before.log", BEFORE_LOG);

    let output = perfsum(temp.path(), &["--stdout", "before.log"]);
    assert!(output.status.success(), "{}", stderr(&output));

    // Evaluation sums both projects; target rows are not task rows
    insta::assert_snapshot!(stdout(&output), @r"
    Name,before.log
    Copy,10
    Csc,20
    Evaluation,450
    ");
}

#[test]
fn test_writes_default_csv_in_working_directory() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "before.log", BEFORE_LOG);

    let output = perfsum(temp.path(), &["before.log"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("MSBuild_performance.csv"));

    let csv = std::fs::read_to_string(temp.path().join("MSBuild_performance.csv")).unwrap();
    assert!(csv.starts_with("Name,before.log\n"), "{csv}");
}

#[test]
fn test_output_flag_creates_directories() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "before.log", BEFORE_LOG);

    let output = perfsum(temp.path(), &["before.log", "-o", "reports/perf.csv"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(temp.path().join("reports/perf.csv").is_file());
}

#[test]
fn test_two_builds_with_absent_tasks() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "before.log", BEFORE_LOG);
    write(temp.path(), "after.log", AFTER_LOG);

    let output = perfsum(temp.path(), &["--stdout", "before.log", "after.log"]);
    assert!(output.status.success(), "{}", stderr(&output));

    // Columns follow completion order, so check cells by header position
    let text = stdout(&output);
    let mut lines = text.lines();
    let header: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(header[0], "Name");
    let before = header.iter().position(|h| *h == "before.log").unwrap();
    let after = header.iter().position(|h| *h == "after.log").unwrap();

    let rows: Vec<Vec<&str>> = lines.map(|l| l.split(',').collect()).collect();
    let names: Vec<&str> = rows.iter().map(|r| r[0]).collect();
    assert_eq!(names, ["Copy", "Csc", "Evaluation", "Touch"]);

    let cell = |row: &str, col: usize| rows.iter().find(|r| r[0] == row).unwrap()[col];
    assert_eq!(cell("Copy", before), "10");
    assert_eq!(cell("Copy", after), "7.5");
    assert_eq!(cell("Csc", after), "0");
    assert_eq!(cell("Touch", before), "0");
    assert_eq!(cell("Touch", after), "2.25");
}

#[test]
fn test_trace_capture_input() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "nightly.trace.jsonl", AFTER_TRACE);

    let output = perfsum(temp.path(), &["--stdout", "nightly.trace.jsonl"]);
    assert!(output.status.success(), "{}", stderr(&output));

    insta::assert_snapshot!(stdout(&output), @r"
    Name,nightly
    Csc,7
    ");
}

#[test]
fn test_missing_summary_fails_naming_source() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "before.log", BEFORE_LOG);
    write(temp.path(), "broken.log", "Build started.\nBuild succeeded.\n");

    let output = perfsum(temp.path(), &["before.log", "broken.log"]);
    assert_eq!(output.status.code(), Some(1));

    let err = stderr(&output);
    assert!(err.contains("No performance summary in broken.log"), "{err}");
    assert!(err.contains("Task Performance Summary:"), "{err}");
    assert!(!temp.path().join("MSBuild_performance.csv").exists());
}

#[test]
fn test_truncated_summary_fails() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "cut.log", "Task Performance Summary:\n\n");

    let output = perfsum(temp.path(), &["cut.log"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("ended prematurely"), "{}", stderr(&output));
}

#[test]
fn test_malformed_trace_names_line() {
    let temp = tempfile::tempdir().unwrap();
    write(
        temp.path(),
        "bad.trace.jsonl",
        &format!("{AFTER_TRACE}not json\n"),
    );

    let output = perfsum(temp.path(), &["bad.trace.jsonl"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("bad:5"), "{}", stderr(&output));
}

#[test]
fn test_same_name_twice_fails() {
    let temp = tempfile::tempdir().unwrap();
    for dir in ["a", "b"] {
        std::fs::create_dir(temp.path().join(dir)).unwrap();
        write(&temp.path().join(dir), "build.log", AFTER_LOG);
    }

    let output = perfsum(temp.path(), &["--stdout", "a/build.log", "b/build.log"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("build.log"), "{}", stderr(&output));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_missing_input_file_fails() {
    let temp = tempfile::tempdir().unwrap();

    let output = perfsum(temp.path(), &["nope.log"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to open nope.log"), "{}", stderr(&output));
}

#[test]
fn test_no_inputs_fails() {
    let temp = tempfile::tempdir().unwrap();

    let output = perfsum(temp.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("No inputs given"), "{}", stderr(&output));
}

#[test]
fn test_stdout_conflicts_with_output() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "before.log", BEFORE_LOG);

    let output = perfsum(temp.path(), &["--stdout", "-o", "x.csv", "before.log"]);
    assert!(!output.status.success());
}

#[test]
#[cfg(unix)]
fn test_run_command_input() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "after.log", AFTER_LOG);

    let output = perfsum(temp.path(), &["--stdout", "--run", "cat after.log"]);
    assert!(output.status.success(), "{}", stderr(&output));

    insta::assert_snapshot!(stdout(&output), @r"
    Name,cat after.log
    Copy,7.5
    Touch,2.25
    ");
}

#[test]
#[cfg(unix)]
fn test_run_command_without_summary_fails() {
    let temp = tempfile::tempdir().unwrap();

    let output = perfsum(temp.path(), &["--run", "echo Build succeeded."]);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("No performance summary in echo Build succeeded."),
        "{}",
        stderr(&output)
    );
}

#[test]
fn test_verbose_logs_ingestion() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "before.log", BEFORE_LOG);

    let output = perfsum(temp.path(), &["-v", "--stdout", "before.log"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("Added before.log with 3 tasks"), "{}", stderr(&output));
}
