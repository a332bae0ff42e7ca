// ABOUTME: Configuration types and parsing for dockership.yml.
// ABOUTME: Environments, projects, and the string specs they contain.

mod environment;
mod port;
mod project;
mod restart_policy;

pub use environment::{Environment, EnvironmentConfig};
pub use port::{
    GuestPort, HostBinding, PortBinding, PortBindings, parse_port_binding, parse_port_bindings,
};
pub use project::ProjectConfig;
pub use restart_policy::RestartPolicy;

use crate::error::{Error, Result};
use crate::models::{Dockerfile, ProjectGraph};
use crate::types::ProjectName;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "dockership.yml";
pub const CONFIG_FILENAME_ALT: &str = "dockership.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".dockership/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentConfig>,

    pub projects: BTreeMap<ProjectName, ProjectConfig>,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub root: PathBuf,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        config.root = match path.parent() {
            // .dockership/config.yml resolves against the project directory
            Some(dir) if dir.ends_with(".dockership") => {
                dir.parent().unwrap_or(dir).to_path_buf()
            }
            Some(dir) => dir.to_path_buf(),
            None => PathBuf::new(),
        };
        Ok(config)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    fn validate(&self) -> Result<()> {
        if self.projects.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one project is required".to_string(),
            ));
        }
        for (name, project) in &self.projects {
            project.to_project(name)?;
        }
        Ok(())
    }

    /// Look up an environment by name.
    pub fn environment(&self, name: &str) -> Result<Environment> {
        let config = self
            .environments
            .get(name)
            .ok_or_else(|| Error::UnknownEnvironment(name.to_string()))?;
        Ok(Environment::new(name, config.clone()))
    }

    /// Build the project graph, including the inverse link adjacency.
    pub fn graph(&self) -> Result<ProjectGraph> {
        let projects = self
            .projects
            .iter()
            .map(|(name, project)| project.to_project(name))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ProjectGraph::new(projects)?)
    }

    fn project_entry(&self, name: &str) -> Result<(&ProjectName, &ProjectConfig)> {
        self.projects
            .get_key_value(name)
            .ok_or_else(|| Error::UnknownProject(name.to_string()))
    }

    /// Build directory of a project.
    pub fn build_dir(&self, name: &str) -> Result<PathBuf> {
        let (project_name, project) = self.project_entry(name)?;
        let dir = project
            .build
            .clone()
            .unwrap_or_else(|| PathBuf::from(project_name.as_str()));
        Ok(self.root.join(dir))
    }

    /// Load a project's Dockerfile and auxiliary files from its build directory.
    pub fn dockerfile(&self, name: &str) -> Result<Dockerfile> {
        let (_, project) = self.project_entry(name)?;
        let dir = self.build_dir(name)?;
        Ok(Dockerfile::load(&dir, &project.files)?)
    }
}
