// ABOUTME: Connection parameters for one runtime endpoint.
// ABOUTME: Address, optional TLS material directory, and client timeout.

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CERT_FILE: &str = "cert.pem";
pub const KEY_FILE: &str = "key.pem";
pub const CA_FILE: &str = "ca.pem";

/// Client certificate, key and CA bundle for a TLS endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsMaterial {
    pub cert: PathBuf,
    pub key: PathBuf,
    pub ca: PathBuf,
}

impl TlsMaterial {
    /// Expect `cert.pem`, `key.pem` and `ca.pem` inside `dir`.
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            cert: dir.join(CERT_FILE),
            key: dir.join(KEY_FILE),
            ca: dir.join(CA_FILE),
        }
    }

    /// First file that does not exist on disk.
    pub fn missing(&self) -> Option<&Path> {
        [&self.cert, &self.key, &self.ca]
            .into_iter()
            .find(|path| !path.is_file())
            .map(PathBuf::as_path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// `unix:///var/run/docker.sock`, `tcp://host:2376`, or `http://host:2375`.
    pub address: String,
    pub tls: Option<TlsMaterial>,
    pub timeout: Duration,
}

impl Endpoint {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            tls: None,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn is_unix_socket(&self) -> bool {
        self.address.starts_with("unix://") || self.address.starts_with('/')
    }
}
