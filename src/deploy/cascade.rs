// ABOUTME: Restart of dependent projects' containers after a new start.
// ABOUTME: Every dependent is attempted; failures are collected, not raised.

use crate::events::DeployEvent;
use crate::models::{Container, Project, ProjectGraph};
use crate::runtime::{ContainerError, FullRuntime};
use crate::types::{ContainerId, ProjectName};

use super::deployer::Deployer;
use super::error::{CascadeError, CascadeFailure, DeployStep};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartedContainer {
    pub project: ProjectName,
    pub container: ContainerId,
}

/// What the cascade did, including what it could not do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Running containers a restart was attempted on.
    pub attempted: usize,
    pub restarted: Vec<RestartedContainer>,
    pub failures: Vec<CascadeFailure>,
}

impl CascadeReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn error(&self) -> Option<CascadeError> {
        (!self.is_clean()).then(|| CascadeError {
            failures: self.failures.clone(),
        })
    }

    pub fn into_result(self) -> Result<Vec<RestartedContainer>, CascadeError> {
        if self.is_clean() {
            Ok(self.restarted)
        } else {
            Err(CascadeError {
                failures: self.failures,
            })
        }
    }
}

impl<R: FullRuntime> Deployer<R> {
    /// Kill and start, in place, every running container of each project
    /// that links to `project`. Stopped containers are left alone.
    pub async fn restart_linked_containers(
        &self,
        graph: &ProjectGraph,
        project: &Project,
    ) -> CascadeReport {
        self.emit(DeployEvent::StepStarted {
            project: project.name.clone(),
            step: DeployStep::CascadeRestarts,
            endpoint: self.endpoint().to_string(),
        });

        let mut report = CascadeReport::default();
        for dependent in graph.linked_by(&project.name) {
            let containers = match self.list_containers(dependent).await {
                Ok(containers) => containers,
                Err(e) => {
                    self.record_failure(&mut report, dependent, project, None, e);
                    continue;
                }
            };

            for container in containers.iter().filter(|c| c.is_running()) {
                report.attempted += 1;
                self.emit(DeployEvent::RestartingContainer {
                    project: dependent.name.clone(),
                    container: container.id.clone(),
                    dependency: project.name.clone(),
                });

                match self.restart(container).await {
                    Ok(()) => report.restarted.push(RestartedContainer {
                        project: dependent.name.clone(),
                        container: container.id.clone(),
                    }),
                    Err(e) => self.record_failure(
                        &mut report,
                        dependent,
                        project,
                        Some(container.id.clone()),
                        e,
                    ),
                }
            }
        }
        report
    }

    async fn restart(&self, container: &Container) -> Result<(), ContainerError> {
        self.runtime.kill_container(&container.id).await?;
        self.runtime.start_container(&container.id).await
    }

    fn record_failure(
        &self,
        report: &mut CascadeReport,
        dependent: &Project,
        dependency: &Project,
        container: Option<ContainerId>,
        error: ContainerError,
    ) {
        let reason = error.to_string();
        self.emit(DeployEvent::RestartFailed {
            project: dependent.name.clone(),
            container: container.clone(),
            dependency: dependency.name.clone(),
            error: reason.clone(),
        });
        report.failures.push(CascadeFailure {
            project: dependent.name.clone(),
            container,
            reason,
        });
    }
}
