//! Integration tests against a real Yandex Disk account
//!
//! Run with:
//! ```bash
//! TEST_YD_TOKEN='{"access_token":"..."}' cargo test --features integration
//! ```
//!
//! Files are written below a unique directory under `yd-integration/` and
//! removed afterwards.

#![cfg(feature = "integration")]

use std::path::Path;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use tempfile::TempDir;

fn run_yd(args: &[&str], config_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_yd"))
        .args(args)
        .env("YD_CONFIG_DIR", config_dir)
        .output()
        .expect("Failed to execute yd")
}

fn unique_root() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("yd-integration/run-{nanos}")
}

/// Configure a remote named `test`, or skip when no token is available
fn setup() -> Option<(TempDir, String)> {
    let Ok(token) = std::env::var("TEST_YD_TOKEN") else {
        eprintln!("Skipping: TEST_YD_TOKEN not set");
        return None;
    };

    let config_dir = TempDir::new().unwrap();
    let root = unique_root();
    let output = run_yd(
        &["remote", "set", "test", &token, "--root", &root],
        config_dir.path(),
    );
    assert!(output.status.success(), "Failed to set remote: {output:?}");
    Some((config_dir, root))
}

#[test]
fn test_put_ls_cat_stat_rm() {
    let Some((config_dir, _root)) = setup() else {
        return;
    };

    let local = config_dir.path().join("hello.txt");
    std::fs::write(&local, b"hello, disk\n").unwrap();

    let output = run_yd(
        &["put", local.to_str().unwrap(), "test:nested/dir/", "--no-progress"],
        config_dir.path(),
    );
    assert!(output.status.success(), "put failed: {output:?}");

    let output = run_yd(&["ls", "test", "--json", "--summarize"], config_dir.path());
    assert!(output.status.success(), "ls failed: {output:?}");
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["total_objects"], 1);

    let output = run_yd(&["cat", "test:nested/dir/hello.txt"], config_dir.path());
    assert!(output.status.success(), "cat failed: {output:?}");
    assert_eq!(output.stdout, b"hello, disk\n");

    let output = run_yd(
        &["stat", "test:nested/dir/hello.txt", "--json"],
        config_dir.path(),
    );
    assert!(output.status.success(), "stat failed: {output:?}");
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["object"]["metadata"]["size"], 12);

    let output = run_yd(&["rm", "test:nested/dir/hello.txt"], config_dir.path());
    assert!(output.status.success(), "rm failed: {output:?}");

    let output = run_yd(&["stat", "test:nested/dir/hello.txt"], config_dir.path());
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_mkdir_is_idempotent() {
    let Some((config_dir, _root)) = setup() else {
        return;
    };

    for _ in 0..2 {
        let output = run_yd(&["mkdir", "test:a/b"], config_dir.path());
        assert!(output.status.success(), "mkdir failed: {output:?}");
    }
}
