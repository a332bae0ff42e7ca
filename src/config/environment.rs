// ABOUTME: Deployment environment: named runtime endpoints with optional TLS material.
// ABOUTME: The environment name also scopes "@environment" port bindings.

use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::runtime::{Endpoint, TlsMaterial};

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(deserialize_with = "deserialize_endpoints")]
    pub endpoints: NonEmpty<String>,

    /// Directory holding `cert.pem`, `key.pem` and `ca.pem`.
    #[serde(default)]
    pub cert_path: Option<PathBuf>,

    /// Request timeout of the runtime client.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

/// An environment resolved from configuration, carrying its own name.
#[derive(Debug, Clone)]
pub struct Environment {
    pub name: String,
    pub endpoints: NonEmpty<String>,
    pub cert_path: Option<PathBuf>,
    pub timeout: Duration,
}

impl Environment {
    pub fn new(name: impl Into<String>, config: EnvironmentConfig) -> Self {
        Self {
            name: name.into(),
            endpoints: config.endpoints,
            cert_path: config.cert_path,
            timeout: config.timeout,
        }
    }

    /// TLS material for every endpoint of this environment, if configured.
    pub fn tls(&self) -> Option<TlsMaterial> {
        self.cert_path.as_deref().map(TlsMaterial::from_dir)
    }

    /// Connection parameters for each endpoint, in configured order.
    pub fn endpoints(&self) -> Vec<Endpoint> {
        let tls = self.tls();
        self.endpoints
            .iter()
            .map(|address| Endpoint {
                address: address.clone(),
                tls: tls.clone(),
                timeout: self.timeout,
            })
            .collect()
    }
}

fn deserialize_endpoints<'de, D>(deserializer: D) -> Result<NonEmpty<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<String> = Vec::deserialize(deserializer)?;
    if let Some(blank) = values.iter().find(|v| v.trim().is_empty()) {
        return Err(serde::de::Error::custom(format!(
            "endpoint address cannot be blank: {blank:?}"
        )));
    }
    NonEmpty::from_vec(values)
        .ok_or_else(|| serde::de::Error::custom("at least one endpoint is required"))
}
