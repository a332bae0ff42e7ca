// ABOUTME: Image operations trait for container runtimes.
// ABOUTME: List, build, tag, and remove images on one endpoint.

use super::sealed::Sealed;
use super::shared_types::BuildRequest;
use crate::models::Image;
use crate::types::{ImageId, ImageName};
use async_trait::async_trait;
use std::io::Write;

/// Image operations: list, build, tag, remove.
#[async_trait]
pub trait ImageOps: Sealed + Send + Sync {
    /// List every tagged image on the endpoint, unfiltered.
    async fn list_images(&self) -> Result<Vec<Image>, ImageError>;

    /// Build an image from a tar build context.
    ///
    /// Build output is streamed into `output` as it arrives. A build that
    /// reports an error in its stream fails even if the transport succeeded.
    async fn build_image(
        &self,
        request: &BuildRequest,
        context: Vec<u8>,
        output: &mut (dyn Write + Send),
    ) -> Result<(), ImageError>;

    /// Add `repository:tag` to an existing image.
    ///
    /// Without `force`, an existing `repository:tag` is left alone and the
    /// call fails with [`ImageError::AlreadyExists`].
    async fn tag_image(
        &self,
        source: &ImageName,
        repository: &str,
        tag: &str,
        force: bool,
    ) -> Result<(), ImageError>;

    /// Remove an image by id.
    async fn remove_image(&self, id: &ImageId, force: bool) -> Result<(), ImageError>;
}

/// Errors from image operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image not found: {0}")]
    NotFound(String),

    #[error("image tag already exists: {0}")]
    AlreadyExists(String),

    #[error("build failed: {0}")]
    BuildFailed(String),

    #[error("failed to write build output: {0}")]
    Output(String),

    #[error("image in use, cannot remove: {0}")]
    InUse(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
