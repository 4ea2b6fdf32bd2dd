use anyhow::{anyhow, Context, Result};
use hardway_lib::info::{self, Listing};
use hardway_lib::provision::{self, Network};
use hardway_lib::types::{NodeType, Workspace};
use hardway_lib::Runner;
use prettytable::{cell, row, Table};
use std::io;

use crate::Opts;

pub(crate) fn bootstrap(opts: &Opts, runner: &mut dyn Runner, workspace: &Workspace) -> Result<()> {
    let nodes = opts
        .nodes
        .as_deref()
        .ok_or_else(|| anyhow!("bootstrap-node needs the --nodes to create"))?;
    let network = Network {
        subnet: opts.subnet.clone(),
        tags: opts.tags.clone(),
    };

    provision::bootstrap(runner, workspace, nodes, &network).context("bootstrap failed")?;
    println!("bootstrapped {}", nodes.join(" "));
    Ok(())
}

pub(crate) fn list(opts: &Opts, runner: &mut dyn Runner, workspace: &Workspace) -> Result<()> {
    let pattern = opts.pattern.as_deref().unwrap_or_default();
    let listings = info::instances(runner, workspace, pattern)
        .context("couldn't list compute instances")?
        .into_iter()
        .filter(|listing| listing.name != "NAME")
        .collect::<Vec<Listing>>();

    if opts.json {
        let stdout = io::stdout();
        let handle = stdout.lock();
        serde_json::to_writer_pretty(handle, &listings)?;
        println!();
    } else {
        let mut table = Table::new();
        table.add_row(row!["Name", "Type", "Status"]);

        for listing in listings {
            let node_type = NodeType::from_instance(&listing.name)
                .map(|node_type| node_type.to_string())
                .unwrap_or_else(|_| "-".to_string());
            table.add_row(row![listing.name, node_type, listing.status]);
        }

        table.printstd();
    }

    Ok(())
}
