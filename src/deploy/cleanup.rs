// ABOUTME: Retention policy for images and removal plan for containers.
// ABOUTME: Pure decisions; the deployer executes them one at a time.

use crate::models::{Container, Image};

/// Images to remove so that at most `keep` remain.
///
/// `images` must be ordered oldest first. The oldest `len - keep` are returned.
pub fn images_to_prune(images: &[Image], keep: usize) -> &[Image] {
    let excess = images.len().saturating_sub(keep);
    &images[..excess]
}

/// How one container gets removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerRemoval<'a> {
    pub container: &'a Container,
    /// Running containers are killed before removal.
    pub kill_first: bool,
}

/// Every container is removed, in the given order.
pub fn plan_container_cleanup(containers: &[Container]) -> Vec<ContainerRemoval<'_>> {
    containers
        .iter()
        .map(|container| ContainerRemoval {
            container,
            kill_first: container.is_running(),
        })
        .collect()
}
