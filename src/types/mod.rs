// ABOUTME: Type-safe identifiers and validated naming types.
// ABOUTME: Project names, image names, revisions, and phantom-typed ids.

mod id;
mod image_name;
mod project_name;
mod revision;

pub use id::{ContainerId, ImageId};
pub use image_name::{ImageName, LATEST_TAG, ParseImageNameError};
pub use project_name::{ProjectName, ProjectNameError};
pub use revision::{Revision, RevisionError};
