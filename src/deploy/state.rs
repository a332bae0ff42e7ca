// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Each state carries what the steps before it produced.

use crate::types::{ContainerId, ImageName};

use super::report::DeployReport;

/// Initial state: nothing touched yet.
/// Available actions: `prune_images()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

/// Images beyond the retention count removed.
/// Available actions: `build()`
#[derive(Debug, Clone, Copy)]
pub struct ImagesPruned {
    pub(crate) pruned: usize,
}

/// New image built and tagged.
/// Available actions: `clean_containers()`
#[derive(Debug, Clone)]
pub struct ImageBuilt {
    pub(crate) pruned: usize,
    pub(crate) image: ImageName,
}

/// Every previous container of the project removed.
/// Available actions: `start()`
#[derive(Debug, Clone)]
pub struct ContainersCleaned {
    pub(crate) pruned: usize,
    pub(crate) image: ImageName,
    pub(crate) removed: usize,
}

/// New container created and running.
/// Available actions: `cascade()`
#[derive(Debug, Clone)]
pub struct Started {
    pub(crate) pruned: usize,
    pub(crate) image: ImageName,
    pub(crate) removed: usize,
    pub(crate) container: ContainerId,
}

impl Started {
    pub fn container_id(&self) -> &ContainerId {
        &self.container
    }
}

/// Dependents restarted; the deployment is over.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Done {
    pub(crate) report: DeployReport,
}
