// ABOUTME: Container restart policy configuration.
// ABOUTME: Supports "", no, always, and on-failure:N.

use serde::de::{self, Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestartPolicy {
    #[default]
    No,
    Always,
    OnFailure {
        max_retries: i64,
    },
}

impl FromStr for RestartPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedRestartPolicy(s.to_string());

        match s {
            "" | "no" => Ok(RestartPolicy::No),
            "always" => Ok(RestartPolicy::Always),
            s if s.starts_with("on-failure:") => {
                let retries = s["on-failure:".len()..]
                    .parse::<i64>()
                    .map_err(|_| malformed())?;
                Ok(RestartPolicy::OnFailure {
                    max_retries: retries,
                })
            }
            _ => Err(malformed()),
        }
    }
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartPolicy::No => write!(f, "no"),
            RestartPolicy::Always => write!(f, "always"),
            RestartPolicy::OnFailure { max_retries } => write!(f, "on-failure:{}", max_retries),
        }
    }
}

impl<'de> Deserialize<'de> for RestartPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
