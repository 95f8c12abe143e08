//! CLI integration tests using the real albumsync binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
fn albumsync_cmd() -> Command {
    let mut cmd = Command::cargo_bin("albumsync").unwrap();
    cmd.env_remove("ALBUMSYNC_TOKEN");
    cmd
}

#[test]
fn test_help_output() {
    albumsync_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("photo-album bundles"))
        .stdout(predicate::str::contains("--token"))
        .stdout(predicate::str::contains("--media-dir"))
        .stdout(predicate::str::contains("--image-prefix"));
}

#[test]
fn test_missing_root_argument_fails() {
    albumsync_cmd().assert().failure();
}

#[test]
fn test_nonexistent_root_exits_nonzero() {
    albumsync_cmd()
        .arg("/no/such/directory")
        .assert()
        .failure()
        .stderr(predicate::str::contains("root path is not a directory"));
}

#[test]
fn test_file_root_exits_nonzero() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("not-a-dir.txt");
    std::fs::write(&file, b"x").unwrap();

    albumsync_cmd()
        .arg(file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("root path is not a directory"));
}

#[test]
fn test_missing_token_exits_nonzero() {
    let temp = TempDir::new().unwrap();

    albumsync_cmd()
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no access token provided"));
}

#[test]
fn test_verbose_prints_resolved_layout() {
    let temp = TempDir::new().unwrap();

    // Even though the run stops at the missing token, the resolved layout
    // has already been reported
    albumsync_cmd()
        .arg(temp.path())
        .args(["-v", "--media-dir", "fullsize"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Using layout"))
        .stdout(predicate::str::contains("fullsize"));
}

#[test]
fn test_non_verbose_omits_layout_line() {
    let temp = TempDir::new().unwrap();

    albumsync_cmd()
        .arg(temp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Using layout").not());
}

#[test]
fn test_bad_config_file_is_reported() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("albumsync.yaml"), "media_dir: [not, a, string]").unwrap();

    albumsync_cmd()
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse configuration file"));
}

#[test]
#[ignore = "Requires network access to the remote photo service"]
fn test_empty_root_completes_successfully() {
    let temp = TempDir::new().unwrap();

    albumsync_cmd()
        .arg(temp.path())
        .args(["--token", "test-token"])
        .assert()
        .success();
}
