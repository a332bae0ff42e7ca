// ABOUTME: Resource models for projects and the runtime objects they own.
// ABOUTME: Ownership of images and containers is derived from their names.

mod container;
mod dockerfile;
mod graph;
mod image;
mod link;
mod project;

pub use container::{Container, ContainerState};
pub use dockerfile::{AuxFile, DOCKERFILE_NAME, Dockerfile};
pub use graph::{GraphError, ProjectGraph};
pub use image::Image;
pub use link::{Link, format_links};
pub use project::Project;
