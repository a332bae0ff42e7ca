// ABOUTME: Shared types used across runtime trait definitions.
// ABOUTME: BuildRequest, ContainerConfig, and creation-time HostSettings.

use crate::config::{PortBindings, RestartPolicy};
use crate::types::ImageName;

/// Parameters of an image build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Name the built image is tagged with.
    pub image: ImageName,
    /// Ignore the layer cache and remove intermediate containers.
    pub no_cache: bool,
}

/// Configuration for creating a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Name for the container.
    pub name: String,
    /// Image to run.
    pub image: ImageName,
    pub host: HostSettings,
}

/// Host-side settings bound when the container is created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSettings {
    /// Guest port key (`80/tcp`) to host bindings.
    pub port_bindings: PortBindings,
    pub restart_policy: RestartPolicy,
    /// Legacy links as `name:alias`.
    pub links: Vec<String>,
    /// Containers to mount volumes from.
    pub volumes_from: Vec<String>,
    /// Bind mounts as `host:container[:mode]`.
    pub binds: Vec<String>,
}

impl ContainerConfig {
    /// Guest ports that need to be exposed for the bindings to apply.
    pub fn exposed_ports(&self) -> Vec<String> {
        self.host.port_bindings.keys().cloned().collect()
    }
}
