// ABOUTME: Build input revision with full and abbreviated renderings.
// ABOUTME: Used as the image tag for every build of a project.

use std::fmt;
use thiserror::Error;

/// Characters kept by the short form of a revision.
const SHORT_REVISION_LEN: usize = 7;

#[derive(Debug, Error)]
pub enum RevisionError {
    #[error("revision cannot be empty")]
    Empty,

    #[error("invalid character in revision {0:?}: '{1}'")]
    InvalidChar(String, char),
}

/// An opaque version identifier, typically a commit hash.
///
/// Restricted to characters that are valid in an image tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision(String);

impl Revision {
    pub fn new(value: &str) -> Result<Self, RevisionError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(RevisionError::Empty);
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '-' | '_' | '.'))
        {
            return Err(RevisionError::InvalidChar(value.to_string(), c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First seven characters, or the whole revision when it is shorter.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(SHORT_REVISION_LEN) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Revision {
    type Err = RevisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Revision::new(s)
    }
}
