use anyhow::{Context, Result};
use colored::*;
use hardway_lib::certs::{self, bare_outputs, Role};
use hardway_lib::distribute;
use hardway_lib::types::{NodeType, Workspace};
use hardway_lib::Runner;
use log::*;

use crate::{Action, Opts};

pub(crate) fn run(opts: &Opts, runner: &mut dyn Runner, workspace: &Workspace) -> Result<()> {
    match opts.command {
        Action::CertificateAuthority => issue(runner, workspace, Role::CertificateAuthority),
        Action::AdminClient => issue(runner, workspace, Role::Admin),
        Action::KubeletClient => kubelet(opts, runner, workspace),
        Action::ControllerManager => issue(runner, workspace, Role::ControllerManager),
        Action::ProxyClient => issue(runner, workspace, Role::Proxy),
        Action::SchedulerClient => issue(runner, workspace, Role::Scheduler),
        Action::ApiServer => issue(runner, workspace, Role::ApiServer),
        Action::ServiceAccKeyPair => issue(runner, workspace, Role::ServiceAccount),
        Action::DistributeCertKeys => distribute(opts, opts.node_type, runner, workspace),
        Action::DistributeCertKeysWorkers => {
            distribute(opts, Some(NodeType::Worker), runner, workspace)
        }
        Action::DistributeCertKeysControllers => {
            distribute(opts, Some(NodeType::Controller), runner, workspace)
        }
    }
}

fn issue(runner: &mut dyn Runner, workspace: &Workspace, role: Role) -> Result<()> {
    certs::issue(runner, workspace, role)
        .with_context(|| format!("couldn't issue the {} certificate", role))?;
    report(&role.outputs());
    Ok(())
}

fn kubelet(opts: &Opts, runner: &mut dyn Runner, workspace: &Workspace) -> Result<()> {
    let issued = certs::kubelet(
        runner,
        workspace,
        opts.instances.as_deref(),
        opts.pattern.as_deref(),
    )
    .context("couldn't issue kubelet certificates")?;

    if issued.is_empty() {
        warn!("no running instances matched {:?}", opts.pattern);
    }
    for instance in issued {
        report(&bare_outputs(&instance));
    }
    Ok(())
}

fn distribute(
    opts: &Opts,
    node_type: Option<NodeType>,
    runner: &mut dyn Runner,
    workspace: &Workspace,
) -> Result<()> {
    distribute::distribute(runner, workspace, node_type, opts.instances.as_deref())
        .context("couldn't distribute certificates and keys")?;

    if let Some(instances) = &opts.instances {
        println!("{} {}", "copied to".green(), instances.join(" "));
    }
    Ok(())
}

fn report(files: &[String]) {
    println!("{} {}", "issued".green(), files.join(" "));
}
