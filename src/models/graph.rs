// ABOUTME: Project graph with the inverse link adjacency ("linked by").
// ABOUTME: Built once by the caller; the orchestrator only reads it.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::types::ProjectName;

use super::project::Project;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("project defined more than once: {0}")]
    DuplicateProject(ProjectName),
}

/// All configured projects plus, for each, the projects that link to it.
#[derive(Debug, Clone, Default)]
pub struct ProjectGraph {
    projects: BTreeMap<ProjectName, Project>,
    linked_by: BTreeMap<ProjectName, BTreeSet<ProjectName>>,
}

impl ProjectGraph {
    /// Index projects by name and derive the inverse of their links.
    ///
    /// A link whose container name is not a known project points outside the
    /// graph and adds no edge. Self-links add no edge either.
    pub fn new(projects: impl IntoIterator<Item = Project>) -> Result<Self, GraphError> {
        let mut by_name = BTreeMap::new();
        for project in projects {
            let name = project.name.clone();
            if by_name.insert(name.clone(), project).is_some() {
                return Err(GraphError::DuplicateProject(name));
            }
        }

        let mut linked_by: BTreeMap<ProjectName, BTreeSet<ProjectName>> = BTreeMap::new();
        for (name, project) in &by_name {
            for link in project.links.values() {
                let Some((target, _)) = by_name.get_key_value(link.name.as_str()) else {
                    continue;
                };
                if target == name {
                    continue;
                }
                linked_by
                    .entry(target.clone())
                    .or_default()
                    .insert(name.clone());
            }
        }

        Ok(Self {
            projects: by_name,
            linked_by,
        })
    }

    pub fn get(&self, name: &str) -> Option<&Project> {
        self.projects.get(name)
    }

    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Projects that declare a link to `name`, in name order.
    pub fn linked_by(&self, name: &ProjectName) -> impl Iterator<Item = &Project> {
        self.linked_by
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|dependent| self.projects.get(dependent))
    }
}
