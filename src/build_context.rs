// ABOUTME: Build-context archive assembly for image builds.
// ABOUTME: Dockerfile first, then auxiliary files, all stamped with the build time.

use chrono::{DateTime, Utc};
use std::io;

use crate::models::{DOCKERFILE_NAME, Dockerfile};

const ENTRY_MODE: u32 = 0o644;

#[derive(Debug, thiserror::Error)]
pub enum BuildContextError {
    #[error("failed to add {name} to build context: {source}")]
    Entry { name: String, source: io::Error },

    #[error("failed to finish build context: {0}")]
    Finish(io::Error),
}

/// Package a Dockerfile and its auxiliary files as an in-memory tar archive.
///
/// Every entry's modification, access and change times are `at`. The archive
/// is only returned once complete; any entry failure discards it.
pub fn assemble(dockerfile: &Dockerfile, at: DateTime<Utc>) -> Result<Vec<u8>, BuildContextError> {
    let timestamp = at.timestamp().max(0) as u64;
    let mut builder = tar::Builder::new(Vec::new());

    append(
        &mut builder,
        DOCKERFILE_NAME,
        dockerfile.render().as_bytes(),
        timestamp,
    )?;

    for file in dockerfile.files() {
        append(&mut builder, &file.name, &file.content, timestamp)?;
    }

    builder.into_inner().map_err(BuildContextError::Finish)
}

fn append(
    builder: &mut tar::Builder<Vec<u8>>,
    name: &str,
    content: &[u8],
    timestamp: u64,
) -> Result<(), BuildContextError> {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(ENTRY_MODE);
    header.set_mtime(timestamp);
    if let Some(gnu) = header.as_gnu_mut() {
        gnu.set_atime(timestamp);
        gnu.set_ctime(timestamp);
    }

    builder
        .append_data(&mut header, name, content)
        .map_err(|source| BuildContextError::Entry {
            name: name.to_string(),
            source,
        })
}
