// ABOUTME: Dockerfile text plus the auxiliary files packaged next to it.
// ABOUTME: Loaded from a build directory or assembled in memory.

use std::io;
use std::path::Path;

/// Archive entry name of the build file.
pub const DOCKERFILE_NAME: &str = "Dockerfile";

/// A file shipped in the build context alongside the Dockerfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxFile {
    pub name: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dockerfile {
    content: String,
    files: Vec<AuxFile>,
}

impl Dockerfile {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            files: Vec::new(),
        }
    }

    /// Append an auxiliary file. Files keep the order they were added in.
    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.files.push(AuxFile {
            name: name.into(),
            content: content.into(),
        });
        self
    }

    /// Read `Dockerfile` and the listed auxiliary files from a build directory.
    /// Auxiliary file names are relative to `dir` and become the entry names.
    pub fn load(dir: &Path, files: &[String]) -> io::Result<Self> {
        let content = std::fs::read_to_string(dir.join(DOCKERFILE_NAME))?;
        let mut dockerfile = Dockerfile::new(content);
        for name in files {
            let bytes = std::fs::read(dir.join(name))?;
            dockerfile = dockerfile.with_file(name.clone(), bytes);
        }
        Ok(dockerfile)
    }

    /// Final build-file text, newline terminated.
    pub fn render(&self) -> String {
        if self.content.ends_with('\n') {
            self.content.clone()
        } else {
            format!("{}\n", self.content)
        }
    }

    pub fn files(&self) -> &[AuxFile] {
        &self.files
    }
}
