//! Configuration loading.
//!
//! The two required settings, `PRIVATE_KEY` and `RPC_URL`, are read from the raw
//! environment. Optional knobs come from `Soldeploy.toml` and `SOLDEPLOY_*`
//! environment variables. The environment always wins over the file.

use std::{fmt, time::Duration};

use alloy_signer_local::PrivateKeySigner;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

/// The default name for the optional configuration file.
pub const CONFIG_FILENAME: &str = "Soldeploy.toml";

/// Environment variable holding the signing key.
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Environment variable holding the node endpoint.
pub const RPC_URL_ENV: &str = "RPC_URL";

/// Prefix for the optional `SOLDEPLOY_*` settings.
pub const ENV_PREFIX: &str = "SOLDEPLOY_";

/// Default compiler executable.
pub const DEFAULT_SOLC: &str = "solc";

/// Default interval between receipt lookups.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Raw settings as extracted from the figment, before validation.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    private_key: Option<String>,
    rpc_url: Option<String>,
    solc: Option<String>,
    /// Seconds.
    confirmation_timeout: Option<u64>,
    /// Milliseconds.
    poll_interval: Option<u64>,
}

/// Validated deployment configuration.
///
/// Created once at startup and never mutated.
#[derive(Clone)]
pub struct DeployConfig {
    /// The signing key. Never printed.
    pub private_key: PrivateKeySigner,
    /// The JSON-RPC endpoint of the node.
    pub rpc_url: Url,
    /// Path or name of the `solc` executable.
    pub solc: String,
    /// How long to wait for the creation transaction to be mined. `None` waits forever.
    pub confirmation_timeout: Option<Duration>,
    /// Interval between receipt lookups.
    pub poll_interval: Duration,
}

impl fmt::Debug for DeployConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployConfig")
            .field("private_key", &"<redacted>")
            .field("signer", &self.private_key.address())
            .field("rpc_url", &self.rpc_url.as_str())
            .field("solc", &self.solc)
            .field("confirmation_timeout", &self.confirmation_timeout)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl DeployConfig {
    /// The layered configuration sources, lowest precedence first.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file(CONFIG_FILENAME))
            .merge(Env::prefixed(ENV_PREFIX).only(&[
                "solc",
                "confirmation_timeout",
                "poll_interval",
            ]))
            .merge(Env::raw().only(&[PRIVATE_KEY_ENV, RPC_URL_ENV]).lowercase(true))
    }

    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Extract and validate the configuration from a figment.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let raw: RawConfig = figment.extract()?;

        let private_key = required(raw.private_key, PRIVATE_KEY_ENV)?;
        let rpc_url = required(raw.rpc_url, RPC_URL_ENV)?;

        let private_key = private_key
            .parse::<PrivateKeySigner>()
            .map_err(|e| ConfigError::Invalid {
                name: PRIVATE_KEY_ENV,
                reason: e.to_string(),
            })?;

        let rpc_url = Url::parse(&rpc_url).map_err(|e| ConfigError::Invalid {
            name: RPC_URL_ENV,
            reason: e.to_string(),
        })?;

        let solc = raw
            .solc
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SOLC.to_string());

        let poll_interval = match raw.poll_interval {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    name: "poll_interval",
                    reason: "must be greater than zero".to_string(),
                });
            }
            Some(millis) => Duration::from_millis(millis),
            None => DEFAULT_POLL_INTERVAL,
        };

        let confirmation_timeout = match raw.confirmation_timeout {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    name: "confirmation_timeout",
                    reason: "must be greater than zero".to_string(),
                });
            }
            secs => secs.map(Duration::from_secs),
        };

        Ok(Self {
            private_key,
            rpc_url,
            solc,
            confirmation_timeout,
            poll_interval,
        })
    }
}

/// Reject absent and blank values alike.
fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}
