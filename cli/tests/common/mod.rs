#![allow(dead_code)]

use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Answers the gcloud queries hardway makes; everything else is appended to
/// `gcloud.log` in the working directory.
pub const GCLOUD: &str = r#"
case "$*" in
  *natIP*) echo 34.1.2.3 ;;
  *networkIP*) echo 10.0.0.5 ;;
  *"addresses describe"*) echo 35.0.0.9 ;;
  *"instances list"*)
    printf 'NAME ZONE STATUS\n'
    printf 'worker-0 europe-west1-b RUNNING\n'
    printf 'worker-1 europe-west1-b TERMINATED\n' ;;
  *) echo "$@" >> gcloud.log ;;
esac
"#;

/// Prints its arguments, then the request document if it can find it.
pub const CFSSL: &str = r#"
echo "$@"
for last; do :; done
if [ -f "$last" ]; then cat "$last"; fi
"#;

/// `cfssljson -bare <name>` stores whatever it was fed in `<name>.out`.
pub const CFSSLJSON: &str = r#"cat > "$2.out""#;

pub fn fake_tool(dir: &Path, name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

pub struct Fixture {
    pub templates: TempDir,
    pub bin: TempDir,
    pub gcloud: PathBuf,
    pub cfssl: PathBuf,
    pub cfssljson: PathBuf,
}

impl Fixture {
    pub fn new() -> Fixture {
        Fixture::with_gcloud(GCLOUD)
    }

    pub fn with_gcloud(gcloud: &str) -> Fixture {
        let templates = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let gcloud = fake_tool(bin.path(), "gcloud", gcloud);
        let cfssl = fake_tool(bin.path(), "cfssl", CFSSL);
        let cfssljson = fake_tool(bin.path(), "cfssljson", CFSSLJSON);
        fs::write(
            templates.path().join("instance-csr.json"),
            r#"{"CN": "", "hosts": []}"#,
        )
        .unwrap();

        Fixture {
            templates,
            bin,
            gcloud,
            cfssl,
            cfssljson,
        }
    }

    pub fn hardway(&self, action: &str) -> Command {
        let mut cmd = Command::cargo_bin("hardway").unwrap();
        cmd.arg("--command")
            .arg(action)
            .arg("--templates")
            .arg(self.templates.path())
            .arg("--gcloud")
            .arg(&self.gcloud)
            .arg("--cfssl")
            .arg(&self.cfssl)
            .arg("--cfssljson")
            .arg(&self.cfssljson)
            .arg("--region")
            .arg("europe-west1");
        cmd
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.templates.path().join(name)).unwrap()
    }

    pub fn files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.templates.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}
