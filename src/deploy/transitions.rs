// ABOUTME: State transitions of a deployment, one per pipeline step.
// ABOUTME: Prune, build, clean, start, then cascade restarts to dependents.

use std::io::Write;

use crate::models::{Dockerfile, ProjectGraph};
use crate::runtime::FullRuntime;

use super::Deployment;
use super::deployer::Deployer;
use super::error::DeployError;
use super::report::DeployReport;
use super::state::{ContainersCleaned, Done, Idle, ImageBuilt, ImagesPruned, Started};

impl<'a> Deployment<'a, Idle> {
    /// Remove images beyond the project's retention count.
    ///
    /// Runs before the build, so the image about to be built never counts.
    pub async fn prune_images<R: FullRuntime>(
        self,
        deployer: &Deployer<R>,
    ) -> Result<Deployment<'a, ImagesPruned>, DeployError> {
        let pruned = deployer.clean_images(self.project).await?;
        Ok(self.advance(ImagesPruned { pruned }))
    }
}

impl<'a> Deployment<'a, ImagesPruned> {
    /// Build `<project>:<revision>` and tag it `latest`.
    pub async fn build<R: FullRuntime>(
        self,
        deployer: &Deployer<R>,
        dockerfile: &Dockerfile,
        output: &mut (dyn Write + Send),
    ) -> Result<Deployment<'a, ImageBuilt>, DeployError> {
        let image = deployer
            .build_image(self.project, &self.revision, dockerfile, output)
            .await?;
        let pruned = self.state.pruned;
        Ok(self.advance(ImageBuilt { pruned, image }))
    }
}

impl<'a> Deployment<'a, ImageBuilt> {
    /// Stop and remove every existing container of the project.
    pub async fn clean_containers<R: FullRuntime>(
        self,
        deployer: &Deployer<R>,
    ) -> Result<Deployment<'a, ContainersCleaned>, DeployError> {
        let removed = deployer.clean_containers(self.project).await?;
        let ImageBuilt { pruned, image } = self.state.clone();
        Ok(self.advance(ContainersCleaned {
            pruned,
            image,
            removed,
        }))
    }
}

impl<'a> Deployment<'a, ContainersCleaned> {
    /// Create and start the replacement container from the new image.
    pub async fn start<R: FullRuntime>(
        self,
        deployer: &Deployer<R>,
    ) -> Result<Deployment<'a, Started>, DeployError> {
        let container = deployer.start(self.project, &self.revision).await?;
        let ContainersCleaned {
            pruned,
            image,
            removed,
        } = self.state.clone();
        Ok(self.advance(Started {
            pruned,
            image,
            removed,
            container,
        }))
    }
}

impl<'a> Deployment<'a, Started> {
    /// Restart running containers of every project linking to this one.
    ///
    /// Never fails: restart failures end up in the report.
    pub async fn cascade<R: FullRuntime>(
        self,
        deployer: &Deployer<R>,
        graph: &ProjectGraph,
    ) -> Deployment<'a, Done> {
        let cascade = deployer
            .restart_linked_containers(graph, self.project)
            .await;
        let report = DeployReport {
            project: self.project.name.clone(),
            endpoint: deployer.endpoint().to_string(),
            image: self.state.image.clone(),
            container: self.state.container.clone(),
            pruned_images: self.state.pruned,
            removed_containers: self.state.removed,
            cascade,
        };
        self.advance(Done { report })
    }
}

impl Deployment<'_, Done> {
    pub fn finish(self) -> DeployReport {
        self.state.report
    }
}
