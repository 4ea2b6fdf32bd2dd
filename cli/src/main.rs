mod cli;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use hardway_lib::types::{NodeType, Settings, Workspace};
use hardway_lib::System;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Action {
    CertificateAuthority,
    AdminClient,
    KubeletClient,
    ControllerManager,
    ProxyClient,
    SchedulerClient,
    ApiServer,
    ServiceAccKeyPair,
    DistributeCertKeys,
    DistributeCertKeysWorkers,
    DistributeCertKeysControllers,
}

/// Issue and distribute the certificates of a Kubernetes the Hard Way cluster
#[derive(Debug, Parser)]
#[clap(name = "hardway", version, author)]
pub(crate) struct Opts {
    /// What to generate or distribute
    #[clap(long, value_enum)]
    pub(crate) command: Action,

    /// Instances to issue kubelet certificates for or copy files to
    #[clap(long, multiple_values = true, value_name = "NAME")]
    pub(crate) instances: Option<Vec<String>>,

    /// Pick running instances whose listing contains this text
    #[clap(long)]
    pub(crate) pattern: Option<String>,

    /// Which file set to distribute
    #[clap(long, value_enum)]
    pub(crate) node_type: Option<NodeType>,

    #[clap(flatten)]
    pub(crate) settings: Settings,
}

fn main() -> Result<()> {
    hardway_lib::init_logger();

    let opts = Opts::parse();
    let workspace = Workspace::open(opts.settings.clone())?;

    cli::run(&opts, &mut System, &workspace)
}
