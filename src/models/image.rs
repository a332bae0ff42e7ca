// ABOUTME: Image as reported by a runtime endpoint listing.
// ABOUTME: Values are rebuilt on every listing and never cached.

use chrono::{DateTime, Utc};

use crate::types::{ImageId, ImageName};

use super::project::Project;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub id: ImageId,
    /// First repository tag the runtime reported for the image.
    pub name: ImageName,
    /// Every repository tag of the image, `name` included.
    pub tags: Vec<ImageName>,
    pub created: DateTime<Utc>,
    /// Address of the runtime endpoint the image was listed from.
    pub endpoint: String,
}

impl Image {
    /// Owned when any of the image's tags is in the project's repository.
    pub fn belongs_to(&self, project: &Project) -> bool {
        project.owns(&self.name) || self.tags.iter().any(|tag| project.owns(tag))
    }

    /// Sort oldest first; ties keep listing order.
    pub fn sort_by_created(images: &mut [Image]) {
        images.sort_by_key(|i| i.created);
    }
}
