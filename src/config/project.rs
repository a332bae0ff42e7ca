// ABOUTME: Per-project configuration entry.
// ABOUTME: Validated into a Project; build settings locate the Dockerfile.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::port::parse_port_bindings;
use super::restart_policy::RestartPolicy;
use crate::error::ValidationError;
use crate::models::{Link, Project};
use crate::types::ProjectName;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    /// Build directory holding the Dockerfile, relative to the config file.
    /// Defaults to a directory named after the project.
    #[serde(default)]
    pub build: Option<PathBuf>,

    /// Auxiliary files, relative to the build directory, shipped with the Dockerfile.
    #[serde(default)]
    pub files: Vec<String>,

    #[serde(default)]
    pub history: i32,

    #[serde(default)]
    pub no_cache: bool,

    #[serde(default)]
    pub use_short_revisions: bool,

    #[serde(default)]
    pub ports: Vec<String>,

    #[serde(default)]
    pub restart: String,

    /// Link specs, `name` or `name:alias`.
    #[serde(default)]
    pub links: Vec<String>,

    #[serde(default)]
    pub volumes_from: Vec<String>,

    #[serde(default)]
    pub binds: Vec<String>,
}

impl ProjectConfig {
    /// Validate the string specs and build the project.
    ///
    /// Port specs are only checked for syntax here; which of them apply is
    /// decided against the active environment at deploy time.
    pub fn to_project(&self, name: &ProjectName) -> Result<Project, ValidationError> {
        parse_port_bindings(&self.ports, None)?;
        self.restart.parse::<RestartPolicy>()?;

        let mut links = BTreeMap::new();
        for spec in &self.links {
            let link: Link = spec.parse()?;
            // one link per target container
            if links.insert(link.name.clone(), link).is_some() {
                return Err(ValidationError::MalformedLink(spec.clone()));
            }
        }

        Ok(Project {
            name: name.clone(),
            history: self.history,
            no_cache: self.no_cache,
            use_short_revisions: self.use_short_revisions,
            ports: self.ports.clone(),
            restart: self.restart.clone(),
            links,
            volumes_from: self.volumes_from.clone(),
            binds: self.binds.clone(),
        })
    }
}
