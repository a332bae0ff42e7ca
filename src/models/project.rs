// ABOUTME: Deployable project definition: build, run, retention and link settings.
// ABOUTME: Also the naming rules that tie images and containers to a project.

use std::collections::BTreeMap;

use crate::types::{ImageName, ProjectName, Revision};

use super::link::Link;

/// A named deployable application unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Image repository root and container name.
    pub name: ProjectName,
    /// Number of images to keep when pruning. Negative values behave as zero.
    pub history: i32,
    pub no_cache: bool,
    pub use_short_revisions: bool,
    /// Port-binding specs, `[host_interface]:[host_port]:container_port[/proto][@environment]`.
    pub ports: Vec<String>,
    /// Restart-policy spec, `"" | "no" | "always" | "on-failure:N"`.
    pub restart: String,
    pub links: BTreeMap<String, Link>,
    pub volumes_from: Vec<String>,
    pub binds: Vec<String>,
}

impl Project {
    pub fn new(name: ProjectName) -> Self {
        Self {
            name,
            history: 0,
            no_cache: false,
            use_short_revisions: false,
            ports: Vec::new(),
            restart: String::new(),
            links: BTreeMap::new(),
            volumes_from: Vec::new(),
            binds: Vec::new(),
        }
    }

    /// Retention count clamped to zero.
    pub fn retention(&self) -> usize {
        self.history.max(0) as usize
    }

    /// Image name for a build of `revision`: `<project>:<revision>`, using the
    /// short revision when the project opts in.
    pub fn image_name(&self, revision: &Revision) -> ImageName {
        let tag = if self.use_short_revisions {
            revision.short()
        } else {
            revision.as_str()
        };
        ImageName::new(self.name.as_str(), tag)
    }

    /// Whether an image name falls under this project's repository.
    pub fn owns(&self, image: &ImageName) -> bool {
        image.repository() == self.name.as_str()
    }
}
