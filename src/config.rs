//! Process configuration, read once at startup from the environment.
//!
//! Provider credentials are deliberately not validated here: a relay with
//! missing credentials still starts and reports the problem on each dispatch.

use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_API_BASE_URL: &str = "https://api.twilio.com";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} is not a valid socket address: {value}")]
    InvalidAddr { key: &'static str, value: String },

    #[error("{key} must be a whole number of seconds, got: {value}")]
    InvalidSeconds { key: &'static str, value: String },
}

/// Twilio account settings. Any of the three may be absent.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub sender: Option<String>,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("sender", &self.sender)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub allowed_origin: String,
    pub provider: ProviderSettings,
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// The binary merges a `.env` file into the environment before calling this.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("SOS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr: SocketAddr = raw_addr.trim().parse().map_err(|_| ConfigError::InvalidAddr {
            key: "SOS_BIND_ADDR",
            value: raw_addr.clone(),
        })?;

        let timeout = match lookup("TWILIO_TIMEOUT_SECS") {
            Some(value) => {
                let secs = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeconds {
                        key: "TWILIO_TIMEOUT_SECS",
                        value,
                    })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            bind_addr,
            allowed_origin: lookup("SOS_ALLOWED_ORIGIN")
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_owned()),
            provider: ProviderSettings {
                account_sid: lookup("TWILIO_SID"),
                auth_token: lookup("TWILIO_AUTH_TOKEN"),
                sender: lookup("TWILIO_PHONE_NUMBER"),
                base_url: lookup("TWILIO_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned()),
                timeout,
            },
        })
    }
}
