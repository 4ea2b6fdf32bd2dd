#![cfg(unix)]

use anyhow::Result;
use assert_cmd::prelude::*;
use predicate::str::*;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const GCLOUD: &str = r#"#!/bin/sh
case "$*" in
  *"instances list"*)
    printf 'NAME          ZONE            STATUS\n'
    printf 'controller-0  europe-west1-b  RUNNING\n'
    printf 'worker-0      europe-west1-b  RUNNING\n'
    printf 'bastion       europe-west1-b  TERMINATED\n' ;;
  *natIP*) echo 34.1.2.3 ;;
  *networkIP*) echo 10.240.0.20 ;;
  *) echo "$@" >> gcloud.log ;;
esac
"#;

const CFSSL: &str = "#!/bin/sh\necho \"$@\"\n";
const CFSSLJSON: &str = "#!/bin/sh\ncat > \"$2.out\"\n";

fn tool(dir: &Path, name: &str, script: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn infra(templates: &TempDir, bin: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hardway-infra").unwrap();
    cmd.arg("--templates")
        .arg(templates.path())
        .arg("--gcloud")
        .arg(tool(bin.path(), "gcloud", GCLOUD))
        .arg("--cfssl")
        .arg(tool(bin.path(), "cfssl", CFSSL))
        .arg("--cfssljson")
        .arg(tool(bin.path(), "cfssljson", CFSSLJSON));
    cmd
}

#[test]
fn test_list_nodes_table() -> Result<()> {
    let (templates, bin) = (tempfile::tempdir()?, tempfile::tempdir()?);
    infra(&templates, &bin)
        .args(&["--command", "list-nodes"])
        .assert()
        .success()
        .stdout(contains("controller-0").and(contains("TERMINATED")));
    Ok(())
}

#[test]
fn test_list_nodes_json() -> Result<()> {
    let (templates, bin) = (tempfile::tempdir()?, tempfile::tempdir()?);
    let output = infra(&templates, &bin)
        .args(&["--command", "list-nodes", "--json"])
        .args(&["--pattern", "worker"])
        .output()?;
    assert!(output.status.success());

    let listed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        listed,
        serde_json::json!([{"name": "worker-0", "status": "RUNNING"}])
    );
    Ok(())
}

#[test]
fn test_bootstrap_needs_nodes() -> Result<()> {
    let (templates, bin) = (tempfile::tempdir()?, tempfile::tempdir()?);
    infra(&templates, &bin)
        .args(&["--command", "bootstrap-node"])
        .assert()
        .failure()
        .stderr(contains("--nodes"));
    Ok(())
}

#[test]
fn test_bootstrap_unknown_node_type() -> Result<()> {
    let (templates, bin) = (tempfile::tempdir()?, tempfile::tempdir()?);
    infra(&templates, &bin)
        .args(&["--command", "bootstrap-node", "--nodes", "etcd-0"])
        .assert()
        .failure()
        .stderr(contains("unknown node type"));

    assert!(!templates.path().join("gcloud.log").exists());
    Ok(())
}

#[test]
fn test_bootstrap_worker() -> Result<()> {
    let (templates, bin) = (tempfile::tempdir()?, tempfile::tempdir()?);
    fs::write(
        templates.path().join("instance-csr.json"),
        r#"{"CN": "", "hosts": [], "names": [{"O": "system:nodes"}]}"#,
    )?;

    infra(&templates, &bin)
        .args(&["--command", "bootstrap-node", "--nodes", "worker-3"])
        .args(&["--subnet", "k8s"])
        .assert()
        .success()
        .stdout(contains("bootstrapped worker-3"));

    let log = fs::read_to_string(templates.path().join("gcloud.log"))?;
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("compute instances create worker-3 --boot-disk-size 200GB"));
    assert!(lines[0].ends_with("--subnet k8s --tags kubernetes-the-hard-way,worker"));
    assert_eq!(
        lines[1],
        "compute scp ca.pem worker-3-key.pem worker-3.pem worker-3:~/"
    );

    let issued = fs::read_to_string(templates.path().join("worker-3.out"))?;
    assert!(issued.contains("-hostname=worker-3,34.1.2.3,10.240.0.20"));
    Ok(())
}
