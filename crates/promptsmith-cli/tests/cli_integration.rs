//! CLI integration tests for the `psmith` binary.
//!
//! These tests run the compiled binary via `std::process::Command`. Each
//! test points `PROMPTSMITH_CONFIG` at a file it controls (or at a path
//! that does not exist) and aims `OLLAMA_HOST` at a closed port, so no
//! test depends on a running model server.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Address nothing listens on.
const DEAD_HOST: &str = "127.0.0.1:9";

fn shipped_templates() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

/// Build a `Command` pointing at the compiled `psmith` binary.
fn psmith_bin(config: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_psmith"));
    cmd.env("PROMPTSMITH_CONFIG", config);
    cmd.env("OLLAMA_HOST", DEAD_HOST);
    // Suppress tracing output so assertions only match program output.
    cmd.env("RUST_LOG", "off");
    cmd
}

/// Write a config whose templates directory is the shipped one.
fn config_with_templates(dir: &Path, extra: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    let yaml = format!(
        "refiner:\n  templates_dir: {}\n{extra}",
        shipped_templates().display()
    );
    std::fs::write(&path, yaml).unwrap();
    path
}

fn missing_config() -> PathBuf {
    PathBuf::from("/tmp/.promptsmith-test-nonexistent-config.yaml")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ── Version and help ──────────────────────────────────────────────────────

#[test]
fn version_output() {
    let output = psmith_bin(&missing_config()).arg("--version").output().unwrap();
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("psmith") && out.contains(env!("CARGO_PKG_VERSION")), "got: {out}");
}

#[test]
fn help_lists_subcommands() {
    let output = psmith_bin(&missing_config()).arg("--help").output().unwrap();
    assert!(output.status.success());
    let out = stdout(&output);
    for sub in ["refine", "shell", "serve", "config"] {
        assert!(out.contains(sub), "help should mention {sub}, got: {out}");
    }
}

#[test]
fn unknown_subcommand_fails() {
    let output = psmith_bin(&missing_config()).arg("frobnicate").output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn refine_without_prompt_fails() {
    let output = psmith_bin(&missing_config()).arg("refine").output().unwrap();
    assert!(!output.status.success());
}

// ── config ────────────────────────────────────────────────────────────────

#[test]
fn config_missing_file_shows_defaults() {
    let output = psmith_bin(&missing_config()).arg("config").output().unwrap();
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("model: gpt-oss:20b"), "got: {out}");
    assert!(out.contains("num_ctx: 2048"), "got: {out}");
    assert!(out.contains("port: 8000"), "got: {out}");
}

#[test]
fn config_reads_file_and_normalizes_host() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "ollama:\n  model: mistral:latest\n  num_ctx: 4096\n").unwrap();

    let output = psmith_bin(&path).args(["config", "refiner"]).output().unwrap();
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("model: mistral:latest"), "got: {out}");
    assert!(out.contains("num_ctx: 4096"), "got: {out}");
    assert!(out.contains("http://127.0.0.1:9"), "got: {out}");
}

#[test]
fn config_malformed_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "ollama: [not, a, mapping\n").unwrap();

    let output = psmith_bin(&path).arg("config").output().unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("model: gpt-oss:20b"));
}

#[test]
fn config_unknown_section_fails() {
    let output = psmith_bin(&missing_config())
        .args(["config", "nonexistent"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

// ── refine ────────────────────────────────────────────────────────────────

#[test]
fn refine_prints_header_then_fails_on_dead_backend() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_templates(dir.path(), "");

    let output = psmith_bin(&config)
        .args(["refine", "rasm chiz: qizil mashina", "--mode", "image", "--cascade"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let out = stdout(&output);
    assert!(
        out.starts_with(
            "[Model: qwen2.5:7b | num_ctx: 2048 | host: http://127.0.0.1:9 | profile: speed | cascade: true]\n"
        ),
        "got: {out}"
    );
    assert!(out.contains(&"=".repeat(80)));
}

#[test]
fn refine_fails_when_templates_are_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "refiner:\n  templates_dir: /definitely/not/here\n").unwrap();

    let output = psmith_bin(&path).args(["refine", "salom"]).output().unwrap();
    assert!(!output.status.success());
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("failed to load templates"), "got: {err}");
}

// ── shell ─────────────────────────────────────────────────────────────────

fn run_shell(config: &Path, input: &str) -> Output {
    let mut child = psmith_bin(config)
        .arg("shell")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn shell_commands_without_backend() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_templates(dir.path(), "");

    let output = run_shell(&config, "/mode engineer video\n/mode\n/bogus\n/exit\n");
    assert!(output.status.success());
    let out = stdout(&output);

    assert!(out.starts_with("[model: gpt-oss:20b | num_ctx: 2048 | host: http://127.0.0.1:9]\n"));
    assert!(out.contains("Commands:"));
    assert!(out.contains("[mode=engineer:video on gpt-oss:20b]"));
    assert!(out.contains("usage: /mode raw | /mode engineer [submode]"));
    assert!(out.contains("unknown command; /help"));
    assert!(!out.contains("bye!"));
}

#[test]
fn shell_chat_error_is_reported_inline() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_templates(dir.path(), "");

    let output = run_shell(&config, "salom\n/exit\n");
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("assistant › "), "got: {out}");
    assert!(out.contains("[chat error]"), "got: {out}");
}

#[test]
fn shell_save_writes_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");
    let config = config_with_templates(
        dir.path(),
        &format!("shell:\n  logs_dir: {}\n", logs.display()),
    );
    let target = dir.path().join("t.jsonl");

    let output = run_shell(&config, &format!("/save {}\n/save\n", target.display()));
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains(&format!("[saved → {}]", target.display())));

    let saved = std::fs::read_to_string(&target).unwrap();
    assert!(saved.starts_with(r#"{"role":"system","content":"#));
    assert_eq!(std::fs::read_dir(&logs).unwrap().count(), 1);
}

#[test]
fn shell_end_of_input_says_bye() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_templates(dir.path(), "");

    let output = run_shell(&config, "");
    assert!(output.status.success());
    assert!(stdout(&output).ends_with("\nbye!\n"));
}
