// ABOUTME: Runtime error types with SNAFU pattern.
// ABOUTME: Covers connecting to an endpoint and verifying it answers.

use snafu::Snafu;
use std::path::PathBuf;

use super::traits::RuntimeInfoError;

/// Failure to reach a runtime endpoint.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RuntimeError {
    #[snafu(display("TLS material for {endpoint} not found: {}", path.display()))]
    MissingTlsMaterial { endpoint: String, path: PathBuf },

    #[snafu(display("failed to connect to {endpoint}: {source}"))]
    Connection {
        endpoint: String,
        source: bollard::errors::Error,
    },

    #[snafu(display("runtime at {endpoint} is not responding: {source}"))]
    Unreachable {
        endpoint: String,
        source: RuntimeInfoError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// Certificate, key or CA file absent.
    TlsMaterial,
    /// Client could not be constructed for the address.
    ConnectionFailed,
    /// Client exists but the runtime did not answer.
    Unreachable,
}

impl RuntimeError {
    pub fn kind(&self) -> RuntimeErrorKind {
        match self {
            RuntimeError::MissingTlsMaterial { .. } => RuntimeErrorKind::TlsMaterial,
            RuntimeError::Connection { .. } => RuntimeErrorKind::ConnectionFailed,
            RuntimeError::Unreachable { .. } => RuntimeErrorKind::Unreachable,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            RuntimeError::MissingTlsMaterial { endpoint, .. }
            | RuntimeError::Connection { endpoint, .. }
            | RuntimeError::Unreachable { endpoint, .. } => endpoint,
        }
    }
}
