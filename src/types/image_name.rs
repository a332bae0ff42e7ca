// ABOUTME: Image name parsing in the <repository>:<tag> form.
// ABOUTME: Repository determines which project an image or container belongs to.

use std::fmt;
use thiserror::Error;

/// Tag that always points at the most recently built image of a project.
pub const LATEST_TAG: &str = "latest";

#[derive(Debug, Error)]
pub enum ParseImageNameError {
    #[error("image name cannot be empty")]
    Empty,

    #[error("invalid image name format: {0}")]
    InvalidFormat(String),
}

/// A repository plus tag, such as `api:abcdef1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageName {
    repository: String,
    tag: String,
}

impl ImageName {
    pub fn new(repository: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            tag: tag.into(),
        }
    }

    /// Parse `repository[:tag][@digest]`. A missing tag means `latest`.
    pub fn parse(input: &str) -> Result<Self, ParseImageNameError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseImageNameError::Empty);
        }

        let without_digest = match input.split_once('@') {
            Some((before, _)) => before,
            None => input,
        };

        // A colon followed by a slash belongs to a registry port, not a tag.
        let (repository, tag) = match without_digest.rsplit_once(':') {
            Some((before, after)) if !after.contains('/') => (before, after),
            _ => (without_digest, LATEST_TAG),
        };

        if repository.is_empty() || tag.is_empty() {
            return Err(ParseImageNameError::InvalidFormat(input.to_string()));
        }

        Ok(Self::new(repository, tag))
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Same repository, different tag.
    pub fn with_tag(&self, tag: impl Into<String>) -> Self {
        Self::new(self.repository.clone(), tag)
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}
