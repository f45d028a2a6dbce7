use std::path::PathBuf;
use std::time::Duration;

use accessable_shared::ConfigError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ASSETS_DIR: &str = "assets";
pub const DEFAULT_ROUTING_BASE_URL: &str = "https://router.project-osrm.org";
pub const DEFAULT_ROUTING_TIMEOUT_SECS: u64 = 10;

/// Server settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub assets_dir: PathBuf,
    pub routing_base_url: String,
    pub routing_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let assets_dir = lookup("ASSETS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR));

        let routing_base_url = match lookup("ROUTING_BASE_URL") {
            Some(raw) => {
                let url = raw.trim().trim_end_matches('/').to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::Invalid {
                        key: "ROUTING_BASE_URL",
                        value: raw,
                        reason: "expected an http:// or https:// URL".to_string(),
                    });
                }
                url
            }
            None => DEFAULT_ROUTING_BASE_URL.to_string(),
        };

        let timeout_secs = match lookup("ROUTING_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        key: "ROUTING_TIMEOUT_SECS",
                        value: raw,
                        reason: "must be greater than zero".to_string(),
                    })
                }
                Ok(secs) => secs,
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        key: "ROUTING_TIMEOUT_SECS",
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_ROUTING_TIMEOUT_SECS,
        };

        Ok(Config {
            port,
            assets_dir,
            routing_base_url,
            routing_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
