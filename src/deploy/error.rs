// ABOUTME: Error types for deployment operations.
// ABOUTME: Step failures carry their endpoint; cascade failures are aggregated.

use serde::Serialize;
use snafu::Snafu;
use std::fmt;

use crate::build_context::BuildContextError;
use crate::error::ValidationError;
use crate::runtime::{ContainerError, ImageError};
use crate::types::{ContainerId, ProjectName};

/// Pipeline step a runtime call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStep {
    PruneImages,
    Build,
    CleanContainers,
    Start,
    CascadeRestarts,
}

impl DeployStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployStep::PruneImages => "prune images",
            DeployStep::Build => "build",
            DeployStep::CleanContainers => "clean containers",
            DeployStep::Start => "start",
            DeployStep::CascadeRestarts => "cascade restarts",
        }
    }
}

impl fmt::Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cause of a failed runtime call.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeFailure {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Container(#[from] ContainerError),
}

/// A deploy, clean, build or run that stopped at its first failure.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DeployError {
    #[snafu(display("{step} failed on {endpoint}: {source}"))]
    Step {
        step: DeployStep,
        endpoint: String,
        source: RuntimeFailure,
    },

    #[snafu(display("invalid host settings: {source}"))]
    Validation { source: ValidationError },

    #[snafu(display("{source}"))]
    BuildContext { source: BuildContextError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Runtime,
    Validation,
    BuildContext,
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Step { .. } => DeployErrorKind::Runtime,
            DeployError::Validation { .. } => DeployErrorKind::Validation,
            DeployError::BuildContext { .. } => DeployErrorKind::BuildContext,
        }
    }

    /// Step that failed, when a runtime call was the cause.
    pub fn step(&self) -> Option<DeployStep> {
        match self {
            DeployError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        match self {
            DeployError::Step { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }
}

/// One dependent that could not be restarted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeFailure {
    pub project: ProjectName,
    /// `None` when the dependent's containers could not be listed.
    pub container: Option<ContainerId>,
    pub reason: String,
}

impl fmt::Display for CascadeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.container {
            Some(container) => write!(f, "{}/{}: {}", self.project, container.short(), self.reason),
            None => write!(f, "{}: {}", self.project, self.reason),
        }
    }
}

/// Every cascade restart that failed, collected after all were attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unable to restart {} linked container(s): {}", .failures.len(), join(.failures))]
pub struct CascadeError {
    pub failures: Vec<CascadeFailure>,
}

fn join(failures: &[CascadeFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_error_names_step_and_endpoint() {
        let err = DeployError::Step {
            step: DeployStep::Build,
            endpoint: "tcp://a:2376".to_string(),
            source: ImageError::BuildFailed("web:abc".to_string()).into(),
        };
        assert_eq!(
            err.to_string(),
            "build failed on tcp://a:2376: build failed: web:abc"
        );
        assert_eq!(err.kind(), DeployErrorKind::Runtime);
        assert_eq!(err.step(), Some(DeployStep::Build));
        assert_eq!(err.endpoint(), Some("tcp://a:2376"));
    }

    #[test]
    fn validation_error_keeps_literal() {
        let err = DeployError::Validation {
            source: ValidationError::MalformedPort("8080:80".to_string()),
        };
        assert!(err.to_string().contains("\"8080:80\""));
        assert_eq!(err.step(), None);
    }

    #[test]
    fn cascade_error_lists_every_failure() {
        let err = CascadeError {
            failures: vec![
                CascadeFailure {
                    project: ProjectName::new("api").unwrap(),
                    container: Some(ContainerId::new("0123456789abcdef")),
                    reason: "kill refused".to_string(),
                },
                CascadeFailure {
                    project: ProjectName::new("worker").unwrap(),
                    container: None,
                    reason: "listing refused".to_string(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "unable to restart 2 linked container(s): api/0123456789ab: kill refused; worker: listing refused"
        );
    }
}
