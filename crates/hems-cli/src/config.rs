//! Provider endpoints and timeouts from the environment.

use hems_weather::Credentials;
use std::env;
use std::time::Duration;

pub const DEFAULT_AVWX_URL: &str = "https://avwx.rest";
pub const DEFAULT_DWD_URL: &str = "https://data.dwd.de";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub avwx_url: String,
    pub avwx_token: Option<String>,
    pub dwd_url: String,
    pub dwd_user: Option<String>,
    pub dwd_password: Option<String>,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset, blank or unparsable values fall
    /// back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            avwx_url: value("HEMS_AVWX_URL").unwrap_or_else(|| DEFAULT_AVWX_URL.to_string()),
            avwx_token: value("HEMS_AVWX_TOKEN"),
            dwd_url: value("HEMS_DWD_URL").unwrap_or_else(|| DEFAULT_DWD_URL.to_string()),
            dwd_user: value("HEMS_DWD_USER"),
            dwd_password: value("HEMS_DWD_PASSWORD"),
            http_timeout: Duration::from_secs(
                value("HEMS_HTTP_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
        }
    }

    pub fn dwd_credentials(&self) -> Option<Credentials> {
        Credentials::from_parts(self.dwd_user.clone(), self.dwd_password.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
