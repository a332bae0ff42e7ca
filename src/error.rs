// ABOUTME: Application-wide error types for dockership.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::deploy::{DeployError, RuntimeFailure};
use crate::models::GraphError;
use crate::runtime::RuntimeError;
use crate::types::{ProjectNameError, RevisionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("unknown project: {0}")]
    UnknownProject(String),

    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    ProjectName(#[from] ProjectNameError),

    #[error(transparent)]
    Revision(#[from] RevisionError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error("listing on {endpoint} failed: {source}")]
    Listing {
        endpoint: String,
        source: RuntimeFailure,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Malformed caller input. Never retried; always carries the offending literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("malformed port {0:?}")]
    MalformedPort(String),

    #[error("malformed restart policy {0:?}")]
    MalformedRestartPolicy(String),

    #[error("malformed link {0:?}")]
    MalformedLink(String),
}

impl ValidationError {
    /// The literal that failed to parse.
    pub fn literal(&self) -> &str {
        match self {
            ValidationError::MalformedPort(s)
            | ValidationError::MalformedRestartPolicy(s)
            | ValidationError::MalformedLink(s) => s,
        }
    }
}
