use log::info;

use crate::types::{NodeType, Workspace};
use crate::{certs, distribute, Result, Runner};

const SCOPES: &str =
    "compute-rw,storage-ro,service-management,service-control,logging-write,monitoring";

/// Where new instances are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub subnet: String,
    /// Defaults to `kubernetes-the-hard-way,<node type>`.
    pub tags: Option<String>,
}

impl Default for Network {
    fn default() -> Network {
        Network {
            subnet: "kubernetes".to_string(),
            tags: None,
        }
    }
}

/// `gcloud compute instances create` flags for a node. Workers and
/// controllers currently share a machine shape and differ only in tags.
pub fn instance_template(node_type: NodeType, network: &Network) -> Vec<String> {
    let tags = network
        .tags
        .clone()
        .unwrap_or_else(|| format!("kubernetes-the-hard-way,{}", node_type));

    [
        "--boot-disk-size",
        "200GB",
        "--can-ip-forward",
        "--image-family",
        "ubuntu-1804-lts",
        "--image-project",
        "ubuntu-os-cloud",
        "--machine-type",
        "n1-standard-1",
        "--scopes",
        SCOPES,
        "--subnet",
        network.subnet.as_str(),
        "--tags",
        tags.as_str(),
    ]
    .iter()
    .map(|arg| arg.to_string())
    .collect()
}

pub fn create_node(
    runner: &mut dyn Runner,
    workspace: &Workspace,
    node: &str,
    node_type: NodeType,
    network: &Network,
) -> Result<()> {
    let create = workspace
        .gcloud()
        .args(["compute", "instances", "create", node])
        .args(instance_template(node_type, network));
    runner.run(&create)?;
    Ok(())
}

/// Creates each node and hands it the certificates its role needs. The node
/// type comes from the name, so nodes must be called `worker-<n>` or
/// `controller-<n>`.
pub fn bootstrap(
    runner: &mut dyn Runner,
    workspace: &Workspace,
    nodes: &[String],
    network: &Network,
) -> Result<()> {
    let typed = nodes
        .iter()
        .map(|node| NodeType::from_instance(node).map(|node_type| (node, node_type)))
        .collect::<Result<Vec<_>>>()?;

    for (node, node_type) in typed {
        info!("bootstrap {}: {}", node_type, node);
        create_node(runner, workspace, node, node_type, network)?;

        let instances = std::slice::from_ref(node);
        if node_type == NodeType::Worker {
            certs::kubelet(runner, workspace, Some(instances), None)?;
        }
        distribute::distribute(runner, workspace, Some(node_type), Some(instances))?;
        // TODO: kubeconfigs for kubelet and kube-proxy (workers), and for
        // controller-manager, scheduler and admin (controllers).
    }

    Ok(())
}
