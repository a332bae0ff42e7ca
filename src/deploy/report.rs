// ABOUTME: Outcomes of the deploy, run and clean pipelines.
// ABOUTME: Returned on success; failures surface as DeployError instead.

use crate::types::{ContainerId, ImageName, ProjectName};

use super::cascade::CascadeReport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub project: ProjectName,
    pub endpoint: String,
    pub image: ImageName,
    pub container: ContainerId,
    pub pruned_images: usize,
    pub removed_containers: usize,
    pub cascade: CascadeReport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub container: ContainerId,
    pub cascade: CascadeReport,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub removed_containers: usize,
    pub pruned_images: usize,
}
