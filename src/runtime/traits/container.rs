// ABOUTME: Container operations trait for container runtimes.
// ABOUTME: List, create, start, kill, and remove containers.

use super::sealed::Sealed;
use super::shared_types::ContainerConfig;
use crate::models::Container;
use crate::types::ContainerId;
use async_trait::async_trait;

/// Container lifecycle operations.
#[async_trait]
pub trait ContainerOps: Sealed + Send + Sync {
    /// List every container on the endpoint, running or not.
    async fn list_containers(&self) -> Result<Vec<Container>, ContainerError>;

    /// Create a container. Host settings are bound here, not at start.
    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<ContainerId, ContainerError>;

    /// Start a created or stopped container with its creation-time settings.
    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Kill a running container.
    async fn kill_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Remove a stopped container.
    async fn remove_container(&self, id: &ContainerId) -> Result<(), ContainerError>;
}

/// Errors from container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("container not found: {0}")]
    NotFound(String),

    #[error("container already exists: {0}")]
    AlreadyExists(String),

    #[error("container not running: {0}")]
    NotRunning(String),

    #[error("container already running: {0}")]
    AlreadyRunning(String),

    #[error("image not found: {0}")]
    ImageNotFound(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
