// ABOUTME: Container runtime access for one endpoint.
// ABOUTME: Capability traits, the bollard client, and connection parameters.

mod bollard;
mod endpoint;
mod error;
#[cfg(test)]
pub(crate) mod mock;
pub mod traits;

pub use self::bollard::BollardRuntime;
pub use endpoint::{CA_FILE, CERT_FILE, Endpoint, KEY_FILE, TlsMaterial};
pub use error::{RuntimeError, RuntimeErrorKind};
pub use traits::{
    BuildRequest, ContainerConfig, ContainerError, ContainerOps, FullRuntime, HostSettings,
    ImageError, ImageOps, RuntimeInfo, RuntimeInfoError,
};
