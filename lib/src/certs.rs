use log::info;
use std::fmt;
use std::io::Write;
use std::net::IpAddr;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::info::{discover, external_address, internal_address, public_address};
use crate::types::{CertificateRequest, Workspace};
use crate::{Error, Invocation, Result, Runner};

/// Cluster service address followed by the controller addresses.
pub const CLUSTER_ADDRESSES: [&str; 4] =
    ["10.32.0.1", "10.240.0.10", "10.240.0.11", "10.240.0.12"];
pub const LOOPBACK: &str = "127.0.0.1";
pub const KUBERNETES_HOSTNAMES: [&str; 5] = [
    "kubernetes",
    "kubernetes.default",
    "kubernetes.default.svc",
    "kubernetes.default.svc.cluster",
    "kubernetes.svc.cluster.local",
];

pub const INSTANCE_TEMPLATE: &str = "instance-csr.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    CertificateAuthority,
    Admin,
    ControllerManager,
    Proxy,
    Scheduler,
    ServiceAccount,
    ApiServer,
}

impl Role {
    /// Name of both the request template and the `cfssljson -bare` output.
    pub fn basename(self) -> &'static str {
        match self {
            Role::CertificateAuthority => "ca",
            Role::Admin => "admin",
            Role::ControllerManager => "kube-controller-manager",
            Role::Proxy => "kube-proxy",
            Role::Scheduler => "kube-scheduler",
            Role::ServiceAccount => "service-account",
            Role::ApiServer => "kubernetes",
        }
    }

    pub fn request(self) -> String {
        format!("{}-csr.json", self.basename())
    }

    pub fn outputs(self) -> [String; 2] {
        bare_outputs(self.basename())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.basename())
    }
}

pub fn bare_outputs(name: &str) -> [String; 2] {
    [format!("{}.pem", name), format!("{}-key.pem", name)]
}

pub fn issue(runner: &mut dyn Runner, workspace: &Workspace, role: Role) -> Result<()> {
    let request = role.request();
    let gencert = match role {
        Role::CertificateAuthority => {
            workspace
                .cfssl()
                .args(["gencert", "-initca", request.as_str()])
        }
        Role::ApiServer => {
            let public = public_address(runner, workspace)?;
            signed(workspace, Some(&api_server_hostnames(public)), &request)
        }
        _ => signed(workspace, None, &request),
    };
    bare(runner, workspace, &gencert, role.basename())
}

pub fn api_server_hostnames(public: IpAddr) -> String {
    let public = public.to_string();
    CLUSTER_ADDRESSES
        .iter()
        .copied()
        .chain([public.as_str(), LOOPBACK])
        .chain(KUBERNETES_HOSTNAMES)
        .collect::<Vec<_>>()
        .join(",")
}

/// Issues `<instance>.pem` for the kubelet of each instance. Explicit
/// `instances` win; otherwise running instances matching `pattern` are used.
/// Returns the instances that got a certificate.
pub fn kubelet(
    runner: &mut dyn Runner,
    workspace: &Workspace,
    instances: Option<&[String]>,
    pattern: Option<&str>,
) -> Result<Vec<String>> {
    let instances = match (instances, pattern) {
        (Some(instances), _) => instances.to_vec(),
        (None, Some(pattern)) => discover(runner, workspace, pattern, true)?,
        (None, None) => {
            return Err(Error::Validation(
                "kubelet certificates need either --instances or --pattern".to_string(),
            ))
        }
    };
    info!("instances: {:?}", instances);

    let template = CertificateRequest::load(&workspace.path(INSTANCE_TEMPLATE))?;

    for instance in &instances {
        let mut request_file = request_file(workspace.dir(), instance)?;
        serde_json::to_writer(&mut request_file, &template.for_node(instance))?;
        request_file.flush()?;

        let external = external_address(runner, workspace, instance)?;
        let internal = internal_address(runner, workspace, instance)?;
        let hostname = format!("{},{},{}", instance, external, internal);
        let request = request_file.path().to_string_lossy().to_string();

        let gencert = signed(workspace, Some(&hostname), &request);
        bare(runner, workspace, &gencert, instance)?;
        info!("{}: external {}, internal {}", instance, external, internal);
    }

    Ok(instances)
}

/// Holds the kubelet request of `instance` next to the other templates until
/// it is dropped.
fn request_file(dir: &Path, instance: &str) -> Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix(&format!("{}-", instance))
        .suffix("-csr.json")
        .tempfile_in(dir)
        .map_err(|source| Error::RequestFile {
            dir: dir.to_path_buf(),
            source,
        })
}

fn signed(workspace: &Workspace, hostname: Option<&str>, request: &str) -> Invocation {
    let mut gencert = workspace.cfssl().args([
        "gencert",
        "-ca=ca.pem",
        "-ca-key=ca-key.pem",
        "-config=ca-config.json",
    ]);
    if let Some(hostname) = hostname {
        gencert = gencert.arg(format!("-hostname={}", hostname));
    }
    gencert
        .arg(format!("-profile={}", workspace.settings().profile))
        .arg(request)
}

fn bare(
    runner: &mut dyn Runner,
    workspace: &Workspace,
    gencert: &Invocation,
    name: &str,
) -> Result<()> {
    runner.pipe(gencert, workspace.cfssljson().args(["-bare", name]))?;
    Ok(())
}
