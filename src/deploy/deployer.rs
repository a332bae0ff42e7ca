// ABOUTME: Deployer drives one project against one runtime endpoint.
// ABOUTME: Deploy, clean, build and run pipelines; fail-fast except the cascade.

use chrono::Utc;
use snafu::ResultExt;
use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use crate::build_context;
use crate::config::{RestartPolicy, parse_port_bindings};
use crate::error::ValidationError;
use crate::events::{DeployEvent, EventSink, TracingSink};
use crate::models::{Container, Dockerfile, Image, Project, ProjectGraph, format_links};
use crate::runtime::{
    BuildRequest, ContainerConfig, ContainerError, FullRuntime, HostSettings, ImageError,
};
use crate::types::{ContainerId, ImageName, LATEST_TAG, Revision};

use super::Deployment;
use super::cleanup::{images_to_prune, plan_container_cleanup};
use super::error::{BuildContextSnafu, DeployError, DeployStep, RuntimeFailure, ValidationSnafu};
use super::report::{CleanReport, DeployReport, RunReport};

/// Host settings of a project's container, resolved for `environment`.
///
/// Port bindings scoped to another environment are dropped.
pub fn host_settings(
    project: &Project,
    environment: Option<&str>,
) -> Result<HostSettings, ValidationError> {
    Ok(HostSettings {
        port_bindings: parse_port_bindings(&project.ports, environment)?,
        restart_policy: project.restart.parse::<RestartPolicy>()?,
        links: format_links(&project.links),
        volumes_from: project.volumes_from.clone(),
        binds: project.binds.clone(),
    })
}

/// Runs deployment pipelines against one endpoint.
pub struct Deployer<R> {
    pub(crate) runtime: R,
    environment: Option<String>,
    events: Arc<dyn EventSink>,
}

impl<R: FullRuntime> Deployer<R> {
    /// Deployer logging through `tracing`, with no active environment.
    pub fn new(runtime: R) -> Self {
        Self {
            runtime,
            environment: None,
            events: Arc::new(TracingSink),
        }
    }

    /// Environment whose `@name` port bindings apply.
    pub fn with_environment(mut self, name: impl Into<String>) -> Self {
        self.environment = Some(name.into());
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    pub fn endpoint(&self) -> &str {
        self.runtime.endpoint()
    }

    pub(crate) fn emit(&self, event: DeployEvent) {
        self.events.emit(event);
    }

    /// Bracket a step with started/failed events.
    async fn step<T>(
        &self,
        project: &Project,
        step: DeployStep,
        work: impl Future<Output = Result<T, DeployError>>,
    ) -> Result<T, DeployError> {
        self.emit(DeployEvent::StepStarted {
            project: project.name.clone(),
            step,
            endpoint: self.endpoint().to_string(),
        });

        let result = work.await;
        if let Err(e) = &result {
            self.emit(DeployEvent::StepFailed {
                project: project.name.clone(),
                step,
                endpoint: self.endpoint().to_string(),
                error: e.to_string(),
            });
        }
        result
    }

    fn fail<E: Into<RuntimeFailure>>(&self, step: DeployStep) -> impl FnOnce(E) -> DeployError {
        let endpoint = self.endpoint().to_string();
        move |e| DeployError::Step {
            step,
            endpoint,
            source: e.into(),
        }
    }

    /// The project's images on this endpoint, oldest first.
    pub async fn list_images(&self, project: &Project) -> Result<Vec<Image>, ImageError> {
        let mut images: Vec<Image> = self
            .runtime
            .list_images()
            .await?
            .into_iter()
            .filter(|image| image.belongs_to(project))
            .collect();
        Image::sort_by_created(&mut images);
        Ok(images)
    }

    /// The project's containers on this endpoint, running or not, oldest first.
    pub async fn list_containers(
        &self,
        project: &Project,
    ) -> Result<Vec<Container>, ContainerError> {
        let mut containers: Vec<Container> = self
            .runtime
            .list_containers()
            .await?
            .into_iter()
            .filter(|container| container.belongs_to(project))
            .collect();
        Container::sort_by_created(&mut containers);
        Ok(containers)
    }

    /// Remove the project's oldest images beyond its retention count.
    /// Returns how many were removed.
    pub async fn clean_images(&self, project: &Project) -> Result<usize, DeployError> {
        self.step(project, DeployStep::PruneImages, async {
            let images = self
                .list_images(project)
                .await
                .map_err(self.fail(DeployStep::PruneImages))?;

            let prune = images_to_prune(&images, project.retention());
            for image in prune {
                self.emit(DeployEvent::RemovingImage {
                    project: project.name.clone(),
                    image: image.id.clone(),
                    name: image.name.to_string(),
                });
                self.runtime
                    .remove_image(&image.id, true)
                    .await
                    .map_err(self.fail(DeployStep::PruneImages))?;
            }
            Ok(prune.len())
        })
        .await
    }

    /// Kill and remove every container of the project.
    /// Returns how many were removed.
    pub async fn clean_containers(&self, project: &Project) -> Result<usize, DeployError> {
        self.step(project, DeployStep::CleanContainers, async {
            let containers = self
                .list_containers(project)
                .await
                .map_err(self.fail(DeployStep::CleanContainers))?;

            let plan = plan_container_cleanup(&containers);
            for removal in &plan {
                let id = &removal.container.id;
                if removal.kill_first {
                    self.emit(DeployEvent::KillingContainer {
                        project: project.name.clone(),
                        container: id.clone(),
                    });
                    self.runtime
                        .kill_container(id)
                        .await
                        .map_err(self.fail(DeployStep::CleanContainers))?;
                }

                self.emit(DeployEvent::RemovingContainer {
                    project: project.name.clone(),
                    container: id.clone(),
                });
                self.runtime
                    .remove_container(id)
                    .await
                    .map_err(self.fail(DeployStep::CleanContainers))?;
            }
            Ok(plan.len())
        })
        .await
    }

    /// Build the project's image for `revision` and tag it `latest`.
    ///
    /// The build context is assembled in memory first; if that fails the
    /// runtime is never called.
    pub async fn build_image(
        &self,
        project: &Project,
        revision: &Revision,
        dockerfile: &Dockerfile,
        output: &mut (dyn Write + Send),
    ) -> Result<ImageName, DeployError> {
        self.step(project, DeployStep::Build, async {
            let image = project.image_name(revision);
            let context =
                build_context::assemble(dockerfile, Utc::now()).context(BuildContextSnafu)?;

            self.emit(DeployEvent::BuildingImage {
                project: project.name.clone(),
                image: image.to_string(),
                endpoint: self.endpoint().to_string(),
            });
            let request = BuildRequest {
                image: image.clone(),
                no_cache: project.no_cache,
            };
            self.runtime
                .build_image(&request, context, output)
                .await
                .map_err(self.fail(DeployStep::Build))?;

            for tag in [LATEST_TAG, image.tag()] {
                self.emit(DeployEvent::TaggingImage {
                    project: project.name.clone(),
                    image: image.to_string(),
                    tag: tag.to_string(),
                });
                self.runtime
                    .tag_image(&image, image.repository(), tag, true)
                    .await
                    .map_err(self.fail(DeployStep::Build))?;
            }
            Ok(image)
        })
        .await
    }

    /// Create a container named after the project from its `revision` image
    /// and start it. Host settings are validated before anything is created.
    pub async fn start(
        &self,
        project: &Project,
        revision: &Revision,
    ) -> Result<ContainerId, DeployError> {
        self.step(project, DeployStep::Start, async {
            let host =
                host_settings(project, self.environment.as_deref()).context(ValidationSnafu)?;
            let config = ContainerConfig {
                name: project.name.to_string(),
                image: project.image_name(revision),
                host,
            };

            self.emit(DeployEvent::CreatingContainer {
                project: project.name.clone(),
                image: config.image.to_string(),
            });
            let id = self
                .runtime
                .create_container(&config)
                .await
                .map_err(self.fail(DeployStep::Start))?;
            self.runtime
                .start_container(&id)
                .await
                .map_err(self.fail(DeployStep::Start))?;

            self.emit(DeployEvent::ContainerStarted {
                project: project.name.clone(),
                container: id.clone(),
                image: config.image.to_string(),
                endpoint: self.endpoint().to_string(),
            });
            Ok(id)
        })
        .await
    }

    /// Start a container of an already built revision, then restart dependents.
    pub async fn run(
        &self,
        graph: &ProjectGraph,
        project: &Project,
        revision: &Revision,
    ) -> Result<RunReport, DeployError> {
        let container = self.start(project, revision).await?;
        let cascade = self.restart_linked_containers(graph, project).await;
        Ok(RunReport { container, cascade })
    }

    /// Remove all containers of the project, then prune its images.
    pub async fn clean(&self, project: &Project) -> Result<CleanReport, DeployError> {
        let removed_containers = self.clean_containers(project).await?;
        let pruned_images = self.clean_images(project).await?;
        Ok(CleanReport {
            removed_containers,
            pruned_images,
        })
    }

    /// Full deploy: prune, build, replace the container, restart dependents.
    ///
    /// Stops at the first failing step and leaves everything done so far in
    /// place. Only cascade failures are tolerated; they land in the report.
    pub async fn deploy(
        &self,
        graph: &ProjectGraph,
        project: &Project,
        revision: &Revision,
        dockerfile: &Dockerfile,
        output: &mut (dyn Write + Send),
    ) -> Result<DeployReport, DeployError> {
        let report = Deployment::new(project, revision.clone())
            .prune_images(self)
            .await?
            .build(self, dockerfile, output)
            .await?
            .clean_containers(self)
            .await?
            .start(self)
            .await?
            .cascade(self, graph)
            .await
            .finish();
        Ok(report)
    }
}
