use log::info;

use crate::certs::bare_outputs;
use crate::types::{NodeType, Workspace};
use crate::{Error, Result, Runner};

/// Same set for every controller.
pub const CONTROLLER_FILES: [&str; 6] = [
    "ca.pem",
    "ca-key.pem",
    "kubernetes-key.pem",
    "kubernetes.pem",
    "service-account-key.pem",
    "service-account.pem",
];

pub fn files(node_type: NodeType, instance: &str) -> Vec<String> {
    match node_type {
        NodeType::Worker => {
            let [cert, key] = bare_outputs(instance);
            vec!["ca.pem".to_string(), key, cert]
        }
        NodeType::Controller => CONTROLLER_FILES.iter().map(|f| f.to_string()).collect(),
    }
}

/// Copies the certificates and keys a node needs into its home directory,
/// one `gcloud compute scp` per instance.
pub fn distribute(
    runner: &mut dyn Runner,
    workspace: &Workspace,
    node_type: Option<NodeType>,
    instances: Option<&[String]>,
) -> Result<()> {
    let node_type = node_type.ok_or_else(|| {
        Error::Validation("please provide --node-type: worker | controller".to_string())
    })?;
    let instances = instances.ok_or_else(|| {
        Error::Validation("please provide the --instances to copy to".to_string())
    })?;

    for instance in instances {
        info!("distribute {} files to {}", node_type, instance);
        let scp = workspace
            .gcloud()
            .args(["compute", "scp"])
            .args(files(node_type, instance))
            .arg(format!("{}:~/", instance));
        runner.run(&scp)?;
    }

    Ok(())
}
