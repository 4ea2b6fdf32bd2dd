use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::{Error, Invocation, Result};

/// Tool locations and cluster naming shared by both binaries.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Directory holding the *-csr.json templates; certificates are written here
    #[clap(
        long,
        env = "HARDWAY_TEMPLATES",
        default_value = "templates",
        value_name = "DIR"
    )]
    pub templates: String,

    /// The cloud CLI
    #[clap(
        long,
        env = "HARDWAY_GCLOUD",
        default_value = "gcloud",
        value_name = "PROGRAM"
    )]
    pub gcloud: String,

    /// The certificate issuance tool
    #[clap(
        long,
        env = "HARDWAY_CFSSL",
        default_value = "cfssl",
        value_name = "PROGRAM"
    )]
    pub cfssl: String,

    /// Writes cfssl JSON output to <name>.pem and <name>-key.pem
    #[clap(
        long,
        env = "HARDWAY_CFSSLJSON",
        default_value = "cfssljson",
        value_name = "PROGRAM"
    )]
    pub cfssljson: String,

    /// Compute region of the public address; asked from gcloud when unset
    #[clap(long, env = "CLOUDSDK_COMPUTE_REGION", value_name = "REGION")]
    pub region: Option<String>,

    /// Name of the reserved public address of the API server
    #[clap(
        long,
        env = "HARDWAY_ADDRESS_NAME",
        default_value = "kubernetes-the-hard-way",
        value_name = "NAME"
    )]
    pub address_name: String,

    /// Signing profile in ca-config.json
    #[clap(
        long,
        env = "HARDWAY_PROFILE",
        default_value = "kubernetes",
        value_name = "PROFILE"
    )]
    pub profile: String,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            templates: "templates".to_string(),
            gcloud: "gcloud".to_string(),
            cfssl: "cfssl".to_string(),
            cfssljson: "cfssljson".to_string(),
            region: None,
            address_name: "kubernetes-the-hard-way".to_string(),
            profile: "kubernetes".to_string(),
        }
    }
}

/// The templates directory. Every tool is started with it as its working
/// directory, so relative names like `ca.pem` resolve there and `cfssljson`
/// writes its output next to the templates.
#[derive(Debug, Clone)]
pub struct Workspace {
    dir: PathBuf,
    settings: Settings,
}

impl Workspace {
    pub fn open(settings: Settings) -> Result<Workspace> {
        let dir = PathBuf::from(shellexpand::tilde(&settings.templates).to_string());
        if !dir.is_dir() {
            return Err(Error::Validation(format!(
                "templates directory {} does not exist",
                dir.display()
            )));
        }
        Ok(Workspace { dir, settings })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn gcloud(&self) -> Invocation {
        Invocation::new(&self.settings.gcloud).current_dir(&self.dir)
    }

    pub fn cfssl(&self) -> Invocation {
        Invocation::new(&self.settings.cfssl).current_dir(&self.dir)
    }

    pub fn cfssljson(&self) -> Invocation {
        Invocation::new(&self.settings.cfssljson).current_dir(&self.dir)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NodeType {
    Worker,
    Controller,
}

impl NodeType {
    /// Role token of an instance name: `worker-0` is a worker.
    pub fn from_instance(name: &str) -> Result<NodeType> {
        match name.split('-').next() {
            Some("worker") => Ok(NodeType::Worker),
            Some("controller") => Ok(NodeType::Controller),
            _ => Err(Error::UnknownNodeType(name.to_string())),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NodeType::Worker => write!(f, "worker"),
            NodeType::Controller => write!(f, "controller"),
        }
    }
}

/// A cfssl certificate signing request. Only `CN` and `hosts` are looked at;
/// everything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateRequest {
    #[serde(rename = "CN")]
    pub common_name: String,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl CertificateRequest {
    pub fn load(path: &Path) -> Result<CertificateRequest> {
        let file = File::open(path).map_err(|source| Error::Template {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// A copy identifying the kubelet of `instance` to the node authorizer.
    pub fn for_node(&self, instance: &str) -> CertificateRequest {
        let mut request = self.clone();
        request.common_name = format!("system:node:{}", instance);
        request
    }
}
