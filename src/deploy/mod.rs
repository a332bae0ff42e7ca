// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Deployer pipelines, retention policy, cascade restarts, and step errors.

mod cascade;
mod cleanup;
mod deployer;
mod deployment;
mod error;
mod report;
mod state;
mod transitions;

pub use cascade::{CascadeReport, RestartedContainer};
pub use cleanup::{ContainerRemoval, images_to_prune, plan_container_cleanup};
pub use deployer::{Deployer, host_settings};
pub use deployment::Deployment;
pub use error::{
    CascadeError, CascadeFailure, DeployError, DeployErrorKind, DeployStep, RuntimeFailure,
};
pub use report::{CleanReport, DeployReport, RunReport};
pub use state::{ContainersCleaned, Done, Idle, ImageBuilt, ImagesPruned, Started};
