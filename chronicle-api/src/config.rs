//! API server configuration.
//!
//! Settings come from the environment with sensible defaults, so the binary
//! runs out of the box:
//!
//! - `CHRONICLE_ADDR` - listen address (default `0.0.0.0:8080`)
//! - `CHRONICLE_CORS` - enable CORS (default `true`)
//! - `CHRONICLE_TIMEOUT_SECS` - per-request timeout (default `10`)

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configuration variable could not be parsed.
#[derive(Debug, Error)]
#[error("invalid {name}: {value:?}")]
pub struct ConfigError {
    name: &'static str,
    value: String,
}

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Listen address.
    pub listen_addr: SocketAddr,
    /// Enable permissive CORS.
    pub cors_enabled: bool,
    /// Per-request timeout.
    #[serde(with = "duration_serde")]
    pub request_timeout: Duration,
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".parse().expect("static address is valid"),
            cors_enabled: true,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ApiConfig {
    /// Load the configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(value) = env::var("CHRONICLE_ADDR") {
            config.listen_addr = value.parse().map_err(|_| ConfigError {
                name: "CHRONICLE_ADDR",
                value,
            })?;
        }

        if let Ok(value) = env::var("CHRONICLE_CORS") {
            config.cors_enabled = match value.as_str() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => {
                    return Err(ConfigError {
                        name: "CHRONICLE_CORS",
                        value,
                    })
                }
            };
        }

        if let Ok(value) = env::var("CHRONICLE_TIMEOUT_SECS") {
            let secs: u64 = value.parse().map_err(|_| ConfigError {
                name: "CHRONICLE_TIMEOUT_SECS",
                value,
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
