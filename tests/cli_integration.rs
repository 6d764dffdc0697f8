//! Integration tests that run the CLI binary.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// Command with config and data redirected to `tmp` and no Supabase backend.
fn bin(tmp: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_chatburak"));
    cmd.env_remove("SUPABASE_URL")
        .env_remove("SUPABASE_ANON_KEY")
        .env_remove("CHATBURAK_MODEL")
        .env("TEST_CONFIG_DIR", tmp.path().join("config"))
        .env("TEST_DATA_DIR", tmp.path().join("data"))
        // Keep dotenv() from picking up a .env in the project root
        .current_dir(tmp.path());
    cmd
}

fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary not found - run cargo build first");
    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for binary")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn cli_help_succeeds_and_outputs_usage() {
    let tmp = TempDir::new().expect("temp dir");
    let output = bin(&tmp)
        .arg("--help")
        .output()
        .expect("binary not found - run cargo build first");

    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("normalize"), "expected subcommands in usage");
    assert!(stdout.contains("--prompt"));
}

#[test]
fn cli_version_succeeds() {
    let tmp = TempDir::new().expect("temp dir");
    let output = bin(&tmp)
        .arg("--version")
        .output()
        .expect("binary not found - run cargo build first");

    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("chatburak"));
}

#[test]
fn normalize_reads_stdin_and_unescapes_newlines() {
    let tmp = TempDir::new().expect("temp dir");
    let mut cmd = bin(&tmp);
    cmd.arg("normalize");
    let output = run_with_stdin(cmd, "Hello\\nWorld");

    assert_success(&output);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hello\nWorld\n");
}

#[test]
fn normalize_html_wraps_paragraphs() {
    let tmp = TempDir::new().expect("temp dir");
    let mut cmd = bin(&tmp);
    cmd.args(["normalize", "--html"]);
    let output = run_with_stdin(cmd, "*kalın* metin");

    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<p>"), "got {stdout}");
    assert!(stdout.contains("<strong>kalın</strong>"), "got {stdout}");
}

#[test]
fn normalize_reads_file_argument() {
    let tmp = TempDir::new().expect("temp dir");
    let path = tmp.path().join("reply.txt");
    std::fs::write(&path, "Line one\n\n\n\nLine two").expect("write input");
    let output = bin(&tmp)
        .arg("normalize")
        .arg(&path)
        .output()
        .expect("binary not found - run cargo build first");

    assert_success(&output);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Line one\nLine two\n"
    );
}

#[test]
fn normalize_missing_file_fails() {
    let tmp = TempDir::new().expect("temp dir");
    let output = bin(&tmp)
        .args(["normalize", "does-not-exist.txt"])
        .output()
        .expect("binary not found - run cargo build first");

    assert!(!output.status.success());
    assert!(!output.stderr.is_empty());
}

#[test]
fn models_lists_presets_and_marks_default() {
    let tmp = TempDir::new().expect("temp dir");
    let output = bin(&tmp)
        .arg("models")
        .output()
        .expect("binary not found - run cargo build first");

    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("claude3-sonnet"), "got {stdout}");
    assert!(stdout.contains("* claude3-sonnet "), "default not marked: {stdout}");
}

#[test]
fn models_filter_without_match_says_so() {
    let tmp = TempDir::new().expect("temp dir");
    let output = bin(&tmp)
        .args(["models", "--query", "zzz-no-such-model"])
        .output()
        .expect("binary not found - run cargo build first");

    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("No models found."));
}

#[test]
fn unknown_model_env_is_rejected() {
    let tmp = TempDir::new().expect("temp dir");
    let output = bin(&tmp)
        .env("CHATBURAK_MODEL", "not-a-preset")
        .args(["-p", "merhaba"])
        .output()
        .expect("binary not found - run cargo build first");

    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("not-a-preset"),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn config_reports_local_backend() {
    let tmp = TempDir::new().expect("temp dir");
    let output = bin(&tmp)
        .arg("config")
        .output()
        .expect("binary not found - run cargo build first");

    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Backend:     local"), "got {stdout}");
}

#[test]
fn chats_list_on_empty_store_prints_nothing() {
    let tmp = TempDir::new().expect("temp dir");
    let output = bin(&tmp)
        .args(["chats", "list"])
        .output()
        .expect("binary not found - run cargo build first");

    assert_success(&output);
    assert!(output.stdout.is_empty());
}

#[test]
fn completions_bash_generates_script() {
    let tmp = TempDir::new().expect("temp dir");
    let output = bin(&tmp)
        .args(["completions", "bash"])
        .output()
        .expect("binary not found - run cargo build first");

    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("chatburak"));
}
