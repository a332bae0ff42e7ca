// ABOUTME: Container as reported by a runtime endpoint listing.
// ABOUTME: Belongs to a project through its image repository or container name.

use chrono::{DateTime, Utc};

use crate::types::{ContainerId, ImageName};

use super::project::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: ContainerId,
    /// Container name without the leading slash.
    pub name: String,
    /// Image the container was created from.
    pub image: ImageName,
    pub state: ContainerState,
    pub created: DateTime<Utc>,
    pub endpoint: String,
}

impl Container {
    pub fn is_running(&self) -> bool {
        self.state == ContainerState::Running
    }

    /// A container belongs to a project when it was created from one of the
    /// project's images, or when it carries the project's name. The second
    /// rule still matches after the image tag it was created from is pruned.
    pub fn belongs_to(&self, project: &Project) -> bool {
        project.owns(&self.image) || self.name == project.name.as_str()
    }

    pub fn sort_by_created(containers: &mut [Container]) {
        containers.sort_by_key(|c| c.created);
    }
}
