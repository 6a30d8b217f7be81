//! Integration tests for the CLI binary.
//!
//! Registered as a [[test]] in the routing-state-cli crate so that
//! CARGO_BIN_EXE_rsr is available.

use std::path::Path;
use std::process::{Command, Output};

use routing_state::{Keypair, Multiaddr, RoutingStateBuilder};

/// Get a Command pointing to the `rsr` binary.
fn rsr_binary() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rsr"));
    cmd.env_remove("RSR_PASSPHRASE");
    cmd
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_record(path: &Path, keypair: &Keypair, seq: u64, addrs: &[&str]) {
    let addresses: Vec<Multiaddr> = addrs.iter().map(|a| a.parse().unwrap()).collect();
    let record = RoutingStateBuilder::new(addresses)
        .seq(seq)
        .sign(keypair)
        .unwrap();
    std::fs::write(path, record.marshal()).unwrap();
}

#[test]
fn cli_responds_to_help() {
    let output = rsr_binary()
        .arg("--help")
        .output()
        .expect("failed to execute rsr --help");

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Usage"), "got: {stdout}");
    for sub in ["keygen", "peer-id", "build", "inspect", "compare"] {
        assert!(stdout.contains(sub), "help should list {sub}, got: {stdout}");
    }
}

#[test]
fn cli_responds_to_version() {
    let output = rsr_binary()
        .arg("--version")
        .output()
        .expect("failed to execute rsr --version");

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("0.1"));
}

#[test]
fn cli_exits_with_error_on_unknown_flag() {
    let output = rsr_binary()
        .arg("--nonexistent-flag")
        .output()
        .expect("failed to execute rsr");

    assert!(!output.status.success());
}

#[test]
fn cli_inspect_prints_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("record.bin");
    let kp = Keypair::generate();
    write_record(&path, &kp, 42, &["/ip4/1.2.3.4/tcp/4001"]);

    let output = rsr_binary().arg("inspect").arg(&path).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let stdout = stdout_of(&output);
    assert!(stdout.contains(&kp.peer_id().to_string()));
    assert!(stdout.contains("42"));
    assert!(stdout.contains("/ip4/1.2.3.4/tcp/4001"));
}

#[test]
fn cli_inspect_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("record.bin");
    let kp = Keypair::generate();
    write_record(&path, &kp, 7, &["/ip4/1.2.3.4/tcp/4001", "/ip6/::1/udp/4001/quic-v1"]);

    let output = rsr_binary()
        .arg("inspect")
        .arg(&path)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let value: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(value["peer_id"], kp.peer_id().to_string());
    assert_eq!(value["seq"], 7);
    assert_eq!(value["addresses"].as_array().unwrap().len(), 2);
}

#[test]
fn cli_inspect_rejects_tampered_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("record.bin");
    write_record(&path, &Keypair::generate(), 1, &["/ip4/1.2.3.4/tcp/4001"]);

    let mut bytes = std::fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    std::fs::write(&path, bytes).unwrap();

    let output = rsr_binary().arg("inspect").arg(&path).output().unwrap();
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("not an authentic routing state record"));
}

#[test]
fn cli_compare_reports_newer() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("old.bin");
    let new = dir.path().join("new.bin");
    let kp = Keypair::generate();
    write_record(&old, &kp, 1, &["/ip4/1.1.1.1/tcp/1"]);
    write_record(&new, &kp, 2, &["/ip4/2.2.2.2/tcp/2"]);

    let output = rsr_binary().arg("compare").arg(&old).arg(&new).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("new.bin is newer"), "got: {stdout}");

    let output = rsr_binary().arg("compare").arg(&old).arg(&old).output().unwrap();
    assert!(stdout_of(&output).contains("identical"));
}

#[test]
fn cli_compare_rejects_different_peers() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.bin");
    let b = dir.path().join("b.bin");
    write_record(&a, &Keypair::generate(), 1, &[]);
    write_record(&b, &Keypair::generate(), 1, &[]);

    let output = rsr_binary().arg("compare").arg(&a).arg(&b).output().unwrap();
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("different peers"));
}

#[test]
fn cli_keygen_build_inspect() {
    let dir = tempfile::tempdir().unwrap();
    let key = dir.path().join("node.key");
    let record = dir.path().join("record.bin");

    // Step 1: keygen
    let output = rsr_binary()
        .env("RSR_PASSPHRASE", "correct horse")
        .arg("--key")
        .arg(&key)
        .arg("keygen")
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(key.exists());

    // Step 2: refuse to overwrite without --force
    let output = rsr_binary()
        .env("RSR_PASSPHRASE", "correct horse")
        .arg("--key")
        .arg(&key)
        .arg("keygen")
        .output()
        .unwrap();
    assert!(!output.status.success());

    // Step 3: peer id needs no passphrase
    let output = rsr_binary().arg("--key").arg(&key).arg("peer-id").output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let peer_id = stdout_of(&output).trim().to_string();
    assert!(peer_id.starts_with("12D3KooW"), "got: {peer_id}");

    // Step 4: build
    let output = rsr_binary()
        .env("RSR_PASSPHRASE", "correct horse")
        .arg("--key")
        .arg(&key)
        .args(["build", "--addr", "/ip4/1.2.3.4/tcp/4001", "--seq", "9", "-o"])
        .arg(&record)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    // Step 5: inspect
    let output = rsr_binary().arg("inspect").arg(&record).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.contains(&peer_id));
    assert!(stdout.contains("/ip4/1.2.3.4/tcp/4001"));

    // Step 6: a record with no addresses
    let empty = dir.path().join("empty.bin");
    let output = rsr_binary()
        .env("RSR_PASSPHRASE", "correct horse")
        .arg("--key")
        .arg(&key)
        .args(["build", "--seq", "10", "-o"])
        .arg(&empty)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let output = rsr_binary().arg("inspect").arg(&empty).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("(none)"));

    let output = rsr_binary().arg("compare").arg(&record).arg(&empty).output().unwrap();
    assert!(stdout_of(&output).contains("empty.bin is newer"));

    // Step 7: wrong passphrase cannot sign
    let output = rsr_binary()
        .env("RSR_PASSPHRASE", "wrong")
        .arg("--key")
        .arg(&key)
        .args(["build", "--addr", "/ip4/1.2.3.4/tcp/4001"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
