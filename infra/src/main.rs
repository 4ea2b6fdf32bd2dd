mod cli;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use hardway_lib::types::{Settings, Workspace};
use hardway_lib::System;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Action {
    BootstrapNode,
    ListNodes,
}

/// Create and list the compute instances of a Kubernetes the Hard Way cluster
#[derive(Debug, Parser)]
#[clap(name = "hardway-infra", version, author)]
pub(crate) struct Opts {
    #[clap(long, value_enum)]
    pub(crate) command: Action,

    /// Nodes to create, named worker-<n> or controller-<n>
    #[clap(long, multiple_values = true, value_name = "NAME")]
    pub(crate) nodes: Option<Vec<String>>,

    /// Only list instances whose listing contains this text
    #[clap(long)]
    pub(crate) pattern: Option<String>,

    /// Subnet new instances are attached to
    #[clap(long, default_value = "kubernetes")]
    pub(crate) subnet: String,

    /// Network tags of new instances [default: kubernetes-the-hard-way,<node type>]
    #[clap(long)]
    pub(crate) tags: Option<String>,

    /// Print the node list as JSON
    #[clap(short, long)]
    pub(crate) json: bool,

    #[clap(flatten)]
    pub(crate) settings: Settings,
}

fn main() -> Result<()> {
    hardway_lib::init_logger();

    let opts = Opts::parse();
    let workspace = Workspace::open(opts.settings.clone())?;

    match opts.command {
        Action::BootstrapNode => cli::bootstrap(&opts, &mut System, &workspace),
        Action::ListNodes => cli::list(&opts, &mut System, &workspace),
    }
}
