// ABOUTME: Composable capability traits for container runtimes.
// ABOUTME: Defines ImageOps, ContainerOps, RuntimeInfo and the FullRuntime bundle.

mod container;
mod image;
mod runtime_info;
pub(crate) mod sealed;
mod shared_types;

pub use container::{ContainerError, ContainerOps};
pub use image::{ImageError, ImageOps};
pub use runtime_info::{RuntimeInfo, RuntimeInfoError};
pub use shared_types::*;

/// Everything the deploy orchestrator needs from one endpoint.
pub trait FullRuntime: ImageOps + ContainerOps + RuntimeInfo {}

impl<T> FullRuntime for T where T: ImageOps + ContainerOps + RuntimeInfo {}
