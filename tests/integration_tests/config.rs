//! Config file discovery and precedence.

use std::path::Path;
use std::process::{Command, Output};

const LOG: &str = "Task Performance Summary:\n\n  3 ms  Csc  1 calls\n";

const TRACE: &str = r#"{"providerName":"My-Engine","eventName":"ExecuteTask/Start","threadId":1,"timestampMS":0,"payload":{"taskName":"Link"}}
{"providerName":"My-Engine","eventName":"ExecuteTask/Stop","threadId":1,"timestampMS":4.5,"payload":{"taskName":"Link"}}
{"providerName":"Microsoft-Build","eventName":"ExecuteTask/Start","threadId":1,"timestampMS":10,"payload":{"taskName":"Csc"}}
{"providerName":"Microsoft-Build","eventName":"ExecuteTask/Stop","threadId":1,"timestampMS":11,"payload":{"taskName":"Csc"}}
"#;

fn perfsum(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_perfsum"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run perfsum")
}

fn write_config(dir: &Path, contents: &str) {
    std::fs::create_dir_all(dir.join(".config")).unwrap();
    std::fs::write(dir.join(".config/perfsum.toml"), contents).unwrap();
}

#[test]
fn test_config_output_path() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("a.log"), LOG).unwrap();
    write_config(temp.path(), "output = \"out/from-config.csv\"\n");

    let output = perfsum(temp.path(), &["a.log"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let csv = std::fs::read_to_string(temp.path().join("out/from-config.csv")).unwrap();
    assert_eq!(csv, "Name,a.log\nCsc,3\n");
    assert!(!temp.path().join("MSBuild_performance.csv").exists());
}

#[test]
fn test_cli_output_beats_config() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("a.log"), LOG).unwrap();
    write_config(temp.path(), "output = \"from-config.csv\"\n");

    let output = perfsum(temp.path(), &["a.log", "--output", "from-cli.csv"]);
    assert!(output.status.success());
    assert!(temp.path().join("from-cli.csv").exists());
    assert!(!temp.path().join("from-config.csv").exists());
}

#[test]
fn test_config_trace_provider() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("c.trace.jsonl"), TRACE).unwrap();
    write_config(temp.path(), "[trace]\nprovider = \"My-Engine\"\n");

    let output = perfsum(temp.path(), &["--stdout", "c.trace.jsonl"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Name,c\nLink,4.5\n");
}

#[test]
fn test_explicit_config_flag() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("a.log"), LOG).unwrap();
    std::fs::write(temp.path().join("alt.toml"), "output = \"alt.csv\"\n").unwrap();

    let output = perfsum(temp.path(), &["-c", "alt.toml", "a.log"]);
    assert!(output.status.success());
    assert!(temp.path().join("alt.csv").exists());
}

#[test]
fn test_invalid_config_fails() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("a.log"), LOG).unwrap();
    write_config(temp.path(), "outptu = \"typo.csv\"\n");

    let output = perfsum(temp.path(), &["a.log"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid config"), "{stderr}");
    assert!(stderr.contains("unknown field"), "{stderr}");
}

#[test]
fn test_missing_explicit_config_fails() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("a.log"), LOG).unwrap();

    let output = perfsum(temp.path(), &["--config", "missing.toml", "a.log"]);
    assert_eq!(output.status.code(), Some(1));
}
