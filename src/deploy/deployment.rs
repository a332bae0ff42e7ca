// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::models::Project;
use crate::types::{ContainerId, ImageName, Revision};

use super::state::{ContainersCleaned, Idle, ImageBuilt, Started};

/// A deployment in progress, parameterized by its current state.
///
/// Each transition consumes the deployment and returns it in the next state,
/// or stops with the error of the step that failed. There is no way back.
#[derive(Debug)]
pub struct Deployment<'a, S> {
    pub(crate) project: &'a Project,
    pub(crate) revision: Revision,
    pub(crate) state: S,
}

impl<'a> Deployment<'a, Idle> {
    pub fn new(project: &'a Project, revision: Revision) -> Self {
        Deployment {
            project,
            revision,
            state: Idle,
        }
    }
}

impl<'a, S> Deployment<'a, S> {
    pub fn project(&self) -> &Project {
        self.project
    }

    pub fn revision(&self) -> &Revision {
        &self.revision
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub(crate) fn advance<T>(self, state: T) -> Deployment<'a, T> {
        Deployment {
            project: self.project,
            revision: self.revision,
            state,
        }
    }
}

impl Deployment<'_, ImageBuilt> {
    pub fn image(&self) -> &ImageName {
        &self.state.image
    }
}

impl Deployment<'_, ContainersCleaned> {
    pub fn image(&self) -> &ImageName {
        &self.state.image
    }
}

impl Deployment<'_, Started> {
    pub fn new_container(&self) -> &ContainerId {
        self.state.container_id()
    }
}
