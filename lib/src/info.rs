use log::info;
use serde::Serialize;
use std::net::IpAddr;

use crate::types::Workspace;
use crate::{Error, Invocation, Result, Runner};

const RUNNING: &str = "RUNNING";
const EXTERNAL_IP_FORMAT: &str = "value(networkInterfaces[0].accessConfigs[0].natIP)";
const INTERNAL_IP_FORMAT: &str = "value(networkInterfaces[0].networkIP)";

/// One line of `gcloud compute instances list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub name: String,
    pub status: String,
    #[serde(skip)]
    pub line: String,
}

impl Listing {
    fn parse(line: &str) -> Option<Listing> {
        let mut columns = line.split_whitespace();
        let name = columns.next()?;
        let status = columns.last().unwrap_or_default();
        Some(Listing {
            name: name.to_string(),
            status: status.to_string(),
            line: line.to_string(),
        })
    }

    pub fn is_running(&self) -> bool {
        self.line.contains(RUNNING)
    }
}

/// Instances whose listing line contains `pattern`, in listing order.
pub fn instances(
    runner: &mut dyn Runner,
    workspace: &Workspace,
    pattern: &str,
) -> Result<Vec<Listing>> {
    let list = workspace.gcloud().args(["compute", "instances", "list"]);
    Ok(runner
        .lines(&list)?
        .iter()
        .filter(|line| line.contains(pattern))
        .filter_map(|line| Listing::parse(line))
        .collect())
}

pub fn discover(
    runner: &mut dyn Runner,
    workspace: &Workspace,
    pattern: &str,
    running_only: bool,
) -> Result<Vec<String>> {
    let names: Vec<String> = instances(runner, workspace, pattern)?
        .into_iter()
        .filter(|listing| !running_only || listing.is_running())
        .map(|listing| listing.name)
        .collect();
    info!("instances matching {:?}: {:?}", pattern, names);
    Ok(names)
}

pub fn external_address(
    runner: &mut dyn Runner,
    workspace: &Workspace,
    instance: &str,
) -> Result<IpAddr> {
    describe(runner, workspace, instance, EXTERNAL_IP_FORMAT)
}

pub fn internal_address(
    runner: &mut dyn Runner,
    workspace: &Workspace,
    instance: &str,
) -> Result<IpAddr> {
    describe(runner, workspace, instance, INTERNAL_IP_FORMAT)
}

fn describe(
    runner: &mut dyn Runner,
    workspace: &Workspace,
    instance: &str,
    format: &str,
) -> Result<IpAddr> {
    let describe = workspace.gcloud().args([
        "compute",
        "instances",
        "describe",
        instance,
        "--format",
        format,
    ]);
    let lines = runner.lines(&describe)?;
    address(&describe, &lines)
}

/// The reserved public address of the API server.
pub fn public_address(runner: &mut dyn Runner, workspace: &Workspace) -> Result<IpAddr> {
    let region = region(runner, workspace)?;
    let describe = workspace.gcloud().args([
        "compute",
        "addresses",
        "describe",
        workspace.settings().address_name.as_str(),
        "--region",
        region.as_str(),
        "--format",
        "value(address)",
    ]);
    let lines = runner.lines(&describe)?;
    address(&describe, &lines)
}

pub fn region(runner: &mut dyn Runner, workspace: &Workspace) -> Result<String> {
    if let Some(region) = &workspace.settings().region {
        return Ok(region.clone());
    }

    let get_value = workspace
        .gcloud()
        .args(["config", "get-value", "compute/region"]);
    let lines = runner.lines(&get_value)?;
    first_line(&lines)
        .map(str::to_string)
        .ok_or_else(|| unexpected(&get_value, "a compute region", &lines))
}

fn address(invocation: &Invocation, lines: &[String]) -> Result<IpAddr> {
    first_line(lines)
        .and_then(|line| line.parse().ok())
        .ok_or_else(|| unexpected(invocation, "an IP address", lines))
}

fn first_line(lines: &[String]) -> Option<&str> {
    lines
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
}

fn unexpected(invocation: &Invocation, expected: &'static str, lines: &[String]) -> Error {
    Error::UnexpectedOutput {
        command: invocation.to_string(),
        expected,
        output: lines.join("\n"),
    }
}
