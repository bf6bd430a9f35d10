//! End-to-end tests for the segstore binary

use anyhow::Result;
use assert_cmd::cargo::CommandCargoExt;
use assert_cmd::Command;
use predicates::prelude::*;
use segstore::storage::UploadReceipt;
use segstore::{ProofResponse, SegmentStore};
use std::path::Path;
use std::process::Stdio;
use tempfile::TempDir;

/// Command isolated from the user's home configuration
fn segstore(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("segstore").expect("binary builds");
    cmd.env("SEGSTORE_DIR", temp_dir.path().join("uploads"))
        .env("SEGSTORE_CONFIG", temp_dir.path().join("config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

fn upload(temp_dir: &TempDir, file: &str, name: &str, contents: &[u8]) -> Result<()> {
    let path = temp_dir.path().join(name);
    std::fs::write(&path, contents)?;
    segstore(temp_dir)
        .args(["upload", file])
        .arg(&path)
        .assert()
        .success();
    Ok(())
}

fn read_proof(path: &Path) -> Result<ProofResponse> {
    Ok(ProofResponse::from_json(&std::fs::read_to_string(path)?)?)
}

#[test]
fn test_upload_reports_leaf_index() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("chunk-a");
    std::fs::write(&path, b"segment a")?;

    segstore(&temp_dir)
        .args(["upload", "archive"])
        .arg(&path)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"leaf_index\": 0"))
        .stdout(predicate::str::contains("\"segment\": \"chunk-a\""));

    segstore(&temp_dir)
        .args(["upload", "archive"])
        .arg(&path)
        .args(["--name", "chunk-b", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"leaf_index\": 1"));
    Ok(())
}

#[test]
fn test_prove_and_verify_roundtrip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    upload(&temp_dir, "archive", "a", b"first")?;
    upload(&temp_dir, "archive", "b", b"second")?;
    upload(&temp_dir, "archive", "c", b"third")?;

    let proof_path = temp_dir.path().join("proof.json");
    segstore(&temp_dir)
        .args(["prove", "archive", "2", "-o"])
        .arg(&proof_path)
        .assert()
        .success();

    let response = read_proof(&proof_path)?;
    assert_eq!(response.leaf_index, 2);
    assert_eq!(response.proof.len(), 3);

    let root = segstore(&temp_dir).args(["root", "archive"]).output()?;
    let root = String::from_utf8(root.stdout)?;
    assert_eq!(root.trim(), response.root.to_hex());

    segstore(&temp_dir)
        .arg("verify")
        .arg(&proof_path)
        .args(["--root", root.trim()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Proof verified"));
    Ok(())
}

#[test]
fn test_verify_rejects_foreign_root() -> Result<()> {
    let temp_dir = TempDir::new()?;
    upload(&temp_dir, "archive", "a", b"first")?;
    upload(&temp_dir, "archive", "b", b"second")?;

    let proof_path = temp_dir.path().join("proof.json");
    segstore(&temp_dir)
        .args(["prove", "archive", "0", "-o"])
        .arg(&proof_path)
        .assert()
        .success();

    segstore(&temp_dir)
        .arg("verify")
        .arg(&proof_path)
        .args(["--root", &"00".repeat(32)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Proof verification failed"));
    Ok(())
}

#[test]
fn test_verify_from_stdin() -> Result<()> {
    let temp_dir = TempDir::new()?;
    upload(&temp_dir, "archive", "a", b"only")?;

    let output = segstore(&temp_dir).args(["prove", "archive", "0"]).output()?;
    assert!(output.status.success());

    segstore(&temp_dir)
        .args(["verify", "-"])
        .write_stdin(output.stdout)
        .assert()
        .success();
    Ok(())
}

#[test]
fn test_prove_out_of_range_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;
    upload(&temp_dir, "archive", "a", b"first")?;

    segstore(&temp_dir)
        .args(["prove", "archive", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));

    segstore(&temp_dir)
        .args(["prove", "archive", "--", "-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
    Ok(())
}

#[test]
fn test_list_download_delete() -> Result<()> {
    let temp_dir = TempDir::new()?;
    upload(&temp_dir, "archive", "a", b"first")?;

    segstore(&temp_dir)
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"archive\""));

    segstore(&temp_dir)
        .args(["download", "archive", "a"])
        .assert()
        .success()
        .stdout(predicate::eq(b"first" as &[u8]));

    // Without --yes and without a terminal the delete is refused
    segstore(&temp_dir)
        .args(["delete", "archive"])
        .assert()
        .failure();

    segstore(&temp_dir)
        .args(["delete", "archive", "--yes"])
        .assert()
        .success();

    segstore(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No files stored"));
    Ok(())
}

#[test]
fn test_config_set_changes_record_format() -> Result<()> {
    let temp_dir = TempDir::new()?;

    segstore(&temp_dir)
        .args(["config", "set", "storage.record_format", "bincode"])
        .assert()
        .success();
    segstore(&temp_dir)
        .args(["config", "set", "storage.tree_file_name", "tree.bin"])
        .assert()
        .success();

    segstore(&temp_dir)
        .args(["config", "get", "storage.record_format"])
        .assert()
        .success()
        .stdout("bincode\n");

    upload(&temp_dir, "archive", "a", b"first")?;
    assert!(temp_dir.path().join("uploads/archive/tree.bin").is_file());

    segstore(&temp_dir)
        .args(["config", "set", "no.such.key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration key"));
    Ok(())
}

#[test]
fn test_concurrent_upload_processes_keep_every_leaf() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let uploads = temp_dir.path().join("uploads");
    let processes = 24;

    let mut children = Vec::new();
    for i in 0..processes {
        let path = temp_dir.path().join(format!("part-{:02}", i));
        std::fs::write(&path, format!("segment {}", i))?;

        let child = std::process::Command::cargo_bin("segstore")?
            .env("SEGSTORE_DIR", &uploads)
            .env("SEGSTORE_CONFIG", temp_dir.path().join("config.toml"))
            .env_remove("RUST_LOG")
            .args(["-q", "upload", "shared"])
            .arg(&path)
            .arg("--json")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        children.push(child);
    }

    let mut indices = Vec::new();
    for child in children {
        let output = child.wait_with_output()?;
        assert!(
            output.status.success(),
            "upload failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let receipt: UploadReceipt = serde_json::from_slice(&output.stdout)?;
        indices.push(receipt.leaf_index);
    }
    indices.sort_unstable();
    assert_eq!(indices, (0..processes).collect::<Vec<_>>());

    let store = SegmentStore::open_at(&uploads)?;
    assert_eq!(store.leaf_count("shared")?, processes);
    assert_eq!(store.list()?[0].segments, processes);
    for i in 0..processes {
        assert!(store.prove("shared", &i.to_string())?.verify()?);
    }
    Ok(())
}
