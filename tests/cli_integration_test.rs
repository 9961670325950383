mod common;

use std::path::Path;
use std::process::{Command, Output};

use common::test_helpers::{TestFixtures, patent_xml, write_temp_file};
use tempfile::TempDir;

/// Run the binary from an empty working directory with a clean environment,
/// so no stray config file or PATENT_EXTRACT_* variable leaks in.
fn run_cli(args: &[&str], env: &[(&str, &str)]) -> Output {
    let sandbox = TempDir::new().unwrap();
    run_cli_in(sandbox.path(), args, env)
}

fn run_cli_in(cwd: &Path, args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_patent-extract"));
    command
        .args(args)
        .current_dir(cwd)
        .env("HOME", cwd)
        .env("XDG_CONFIG_HOME", cwd.join(".config"))
        .env_remove("RUST_LOG");
    for key in [
        "PATENT_EXTRACT_FORMAT",
        "PATENT_EXTRACT_VERBOSE",
        "PATENT_EXTRACT_QUIET",
        "PATENT_EXTRACT_DEBUG",
        "PATENT_EXTRACT_INCLUDE_UNKNOWN",
        "PATENT_EXTRACT_ENCODINGS",
    ] {
        command.env_remove(key);
    }
    for (key, value) in env {
        command.env(key, value);
    }
    command.output().expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

fn fixture(name: &str) -> String {
    TestFixtures::new().xml(name).to_string_lossy().into_owned()
}

#[test]
fn test_cli_help_output() {
    let output = run_cli(&["--help"], &[]);

    assert!(output.status.success());
    let help = stdout(&output);
    assert!(help.contains("--output-format"));
    assert!(help.contains("--verbose"));
    assert!(help.contains("--quiet"));
    assert!(help.contains("--debug"));
    assert!(help.contains("--include-unknown"));
    assert!(help.contains("--encodings"));
    assert!(help.contains("--config"));
}

#[test]
fn test_cli_version_output() {
    let output = run_cli(&["--version"], &[]);
    assert!(output.status.success());
    assert!(stdout(&output).contains(concat!("patent-extract ", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_cli_lines_output() {
    let output = run_cli(&[&fixture("standard.xml")], &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "999000888\n66667777\n");
}

#[test]
fn test_cli_json_output() {
    let output = run_cli(&["--output-format", "json", &fixture("priority_order.xml")], &[]);

    assert_eq!(output.status.code(), Some(0));
    let parsed: Vec<String> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed, vec!["222222222", "333333333", "111111111", "444444444"]);
}

#[test]
fn test_cli_empty_result_is_success() {
    let output = run_cli(
        &["--output-format", "json", &fixture("no_application_reference.xml")],
        &[],
    );

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).trim(), "[]");
}

#[test]
fn test_cli_missing_file_exits_one() {
    let output = run_cli(&["/nonexistent/patent.xml"], &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("File not found"));
}

#[test]
fn test_cli_parse_failure_exits_one() {
    let (_dir, path) = write_temp_file("broken.xml", b"not xml at all");
    let output = run_cli(&[path.to_str().unwrap()], &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("XML parsing failed"));
}

#[test]
fn test_cli_debug_prints_error_details() {
    let output = run_cli(&["--debug", "/nonexistent/patent.xml"], &[]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("File not found"));
    assert!(err.contains("Debug Info: FileNotFound"));
    assert!(err.contains("Error Chain:"));

    let output = run_cli(
        &["/nonexistent/patent.xml"],
        &[("PATENT_EXTRACT_DEBUG", "true")],
    );
    assert!(stderr(&output).contains("Debug Info: FileNotFound"));
}

#[test]
fn test_cli_debug_keeps_stdout_clean() {
    let output = run_cli(&["--debug", &fixture("standard.xml")], &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "999000888\n66667777\n");
}

#[test]
fn test_cli_conflicting_options() {
    let output = run_cli(&["--verbose", "--quiet", &fixture("standard.xml")], &[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("cannot be used with"));
}

#[test]
fn test_cli_invalid_output_format() {
    let output = run_cli(&["--output-format", "yaml", &fixture("standard.xml")], &[]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_include_unknown() {
    let xml = patent_xml(&[(None, "123"), (Some("patent-office"), "456")]);
    let (_dir, path) = write_temp_file("unknown.xml", xml.as_bytes());

    let output = run_cli(&[path.to_str().unwrap()], &[]);
    assert_eq!(stdout(&output), "456\n");

    let output = run_cli(&["--include-unknown", path.to_str().unwrap()], &[]);
    assert_eq!(stdout(&output), "456\n123\n");
}

#[test]
fn test_cli_quiet_suppresses_warnings() {
    let output = run_cli(&["--quiet", &fixture("missing_load_source.xml")], &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "66667777\n");
    assert!(stderr(&output).is_empty());
}

#[test]
fn test_cli_verbose_logs_warnings_to_stderr() {
    let output = run_cli(&["--verbose", &fixture("missing_load_source.xml")], &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "66667777\n");
    assert!(stderr(&output).contains("no load-source attribute"));
}

#[test]
fn test_cli_normal_mode_prints_summary() {
    let output = run_cli(&[&fixture("empty_doc_number.xml")], &[]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("rerun with --verbose"));
}

#[test]
fn test_cli_invalid_encodings_exits_one() {
    let output = run_cli(&["--encodings", "ebcdic", &fixture("standard.xml")], &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Configuration error"));
}

#[test]
fn test_cli_environment_format() {
    let output = run_cli(
        &[&fixture("standard.xml")],
        &[("PATENT_EXTRACT_FORMAT", "json")],
    );
    let parsed: Vec<String> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed, vec!["999000888", "66667777"]);

    // command line beats environment
    let output = run_cli(
        &["--output-format", "lines", &fixture("standard.xml")],
        &[("PATENT_EXTRACT_FORMAT", "json")],
    );
    assert_eq!(stdout(&output), "999000888\n66667777\n");
}

#[test]
fn test_cli_config_file_in_working_directory() {
    let cwd = TempDir::new().unwrap();
    std::fs::write(
        cwd.path().join("patent-extract.toml"),
        "[output]\nformat = \"json\"\n",
    )
    .unwrap();

    let output = run_cli_in(cwd.path(), &[&fixture("standard.xml")], &[]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).starts_with('['));
}

#[test]
fn test_cli_explicit_config_file() {
    let (_dir, config) = write_temp_file(
        "custom.json",
        br#"{"extraction": {"include_unknown": true}}"#,
    );
    let xml = patent_xml(&[(Some("uspto"), "1"), (Some("docdb"), "2")]);
    let (_xml_dir, path) = write_temp_file("doc.xml", xml.as_bytes());

    let output = run_cli(
        &["--config", config.to_str().unwrap(), path.to_str().unwrap()],
        &[],
    );
    assert_eq!(stdout(&output), "2\n1\n");
}

#[test]
fn test_cli_malformed_input_still_succeeds() {
    let output = run_cli(&[&fixture("malformed.xml")], &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "999000888\n66667777\n");
}
