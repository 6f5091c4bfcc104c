//! Integration tests for the termsnap CLI

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use super::helpers::run_termsnap;

fn termsnap(config: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("termsnap").unwrap();
    cmd.env("TERMSNAP_CONFIG", config)
        .env_remove("RUST_LOG")
        .env_remove("TERMSNAP_LOG");
    cmd
}

// ============================================================================
// Help and Metadata Tests
// ============================================================================

#[test]
fn help_lists_subcommands() {
    let tmp = TempDir::new().unwrap();
    let (stdout, _stderr, exit_code) = run_termsnap(&["--help"], &tmp.path().join("c.toml"));

    assert_eq!(exit_code, 0);
    for sub in ["screenshot", "record", "themes", "config", "completions"] {
        assert!(stdout.contains(sub), "help is missing {}", sub);
    }
}

#[test]
fn version_includes_package_version() {
    let tmp = TempDir::new().unwrap();
    termsnap(&tmp.path().join("c.toml"))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn screenshot_requires_a_command() {
    let tmp = TempDir::new().unwrap();
    termsnap(&tmp.path().join("c.toml"))
        .arg("screenshot")
        .assert()
        .failure()
        .stderr(predicate::str::contains("COMMAND"));
}

#[test]
fn completions_are_generated() {
    let tmp = TempDir::new().unwrap();
    termsnap(&tmp.path().join("c.toml"))
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("termsnap"));
}

// ============================================================================
// Themes and Config Tests
// ============================================================================

#[test]
fn themes_lists_every_builtin_theme() {
    let tmp = TempDir::new().unwrap();
    let (stdout, _stderr, exit_code) = run_termsnap(&["themes"], &tmp.path().join("c.toml"));

    assert_eq!(exit_code, 0);
    for name in termsnap::theme::theme_names() {
        assert!(stdout.contains(name), "missing theme {}", name);
    }
    assert!(stdout.contains("dark:"));
    assert!(stdout.contains("light:"));
    assert!(stdout.contains("one-dark"));
    assert!(stdout.contains("(default)"));
}

#[test]
fn config_path_follows_environment() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("termsnap.toml");

    termsnap(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(path.to_string_lossy().to_string()))
        .stdout(predicate::str::contains("using defaults"));
}

#[test]
fn config_show_merges_file_with_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("termsnap.toml");
    fs::write(&path, "[terminal]\ncols = 90\n").unwrap();

    termsnap(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cols = 90"))
        .stdout(predicate::str::contains("rows = 40"))
        .stdout(predicate::str::contains("theme = \"one-dark\""));
}

#[test]
fn invalid_config_is_reported() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("termsnap.toml");
    fs::write(&path, "[terminal]\ncols = \"wide\"\n").unwrap();

    termsnap(&path)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}

// ============================================================================
// Capture Tests
// ============================================================================

#[test]
fn unknown_theme_fails_without_output() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let (_stdout, stderr, exit_code) = run_termsnap(
        &[
            "screenshot",
            "--theme",
            "neon",
            "-o",
            out.to_str().unwrap(),
            "--",
            "true",
        ],
        &tmp.path().join("c.toml"),
    );

    assert_ne!(exit_code, 0);
    assert!(stderr.contains("Unknown theme 'neon'"), "stderr: {}", stderr);
    assert!(!out.exists());
}

#[test]
fn screenshot_writes_four_files() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let (stdout, stderr, exit_code) = run_termsnap(
        &[
            "screenshot",
            "--wait-ms",
            "500",
            "--cols",
            "40",
            "--rows",
            "5",
            "-o",
            out.to_str().unwrap(),
            "-n",
            "hello",
            "--",
            "sh",
            "-c",
            "echo hello-world; sleep 3",
        ],
        &tmp.path().join("c.toml"),
    );

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    let paths: Vec<&str> = stdout.lines().collect();
    assert_eq!(paths.len(), 4);
    for ext in ["png", "svg", "ansi", "txt"] {
        let path = paths
            .iter()
            .find(|p| p.ends_with(&format!("hello.{}", ext)))
            .unwrap_or_else(|| panic!("no .{} in {:?}", ext, paths));
        assert!(std::path::Path::new(path).exists());
    }
    let text_path = paths.iter().find(|p| p.ends_with(".txt")).unwrap();
    assert!(fs::read_to_string(text_path).unwrap().contains("hello-world"));
    let png_path = paths.iter().find(|p| p.ends_with(".png")).unwrap();
    assert!(fs::read(png_path).unwrap().starts_with(b"\x89PNG"));
}

#[test]
fn record_writes_a_gif() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let (stdout, stderr, exit_code) = run_termsnap(
        &[
            "record",
            "--fps",
            "10",
            "--duration-ms",
            "800",
            "--wait-ms",
            "100",
            "--cols",
            "40",
            "--rows",
            "5",
            "-o",
            out.to_str().unwrap(),
            "-n",
            "clip",
            "--",
            "sh",
            "-c",
            "echo recording; sleep 5",
        ],
        &tmp.path().join("c.toml"),
    );

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    let gif = stdout.trim();
    assert!(gif.ends_with("recordings/clip.gif"), "stdout: {}", stdout);
    assert!(fs::read(gif).unwrap().starts_with(b"GIF89a"));
    assert!(stderr.contains("frames"));
}
