use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),
    #[error("`{command}` failed: {details}")]
    CommandFailed { command: String, details: String },
    #[error("`{command}` did not print {expected}, got {output:?}")]
    UnexpectedOutput {
        command: String,
        expected: &'static str,
        output: String,
    },
    #[error("couldn't read request template {}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("couldn't create a request file in {}", dir.display())]
    RequestFile {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown node type in {0:?}, expected worker-<n> or controller-<n>")]
    UnknownNodeType(String),
    #[error("error parsing json")]
    Serde(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
