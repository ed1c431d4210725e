//! # PayHero Configuration
//!
//! Configuration management for the PayHero integration.
//! Credentials are loaded from environment variables; channel settings
//! default to the bank channel and may be overridden from TOML.

use base64::{engine::general_purpose::STANDARD as BASE64_ENGINE, Engine as _};
use pay_core::PaymentError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_API_BASE_URL: &str = "https://backend.payhero.co.ke";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// PayHero API username/password pair
#[derive(Clone)]
pub struct GatewayCredentials {
    username: String,
    password: String,
}

impl GatewayCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `Basic base64(username:password)`
    pub fn basic_auth(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        format!("Basic {}", BASE64_ENGINE.encode(credentials))
    }
}

impl fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fixed channel identifiers sent with every payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub channel_type: String,
    pub channel_id: u64,
    pub short_code: u64,
    pub account_number: u64,
    /// Description sent to the gateway (not the client's description)
    pub description: String,
    pub provider: String,
    pub network_code: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            channel_type: "bank".to_string(),
            channel_id: 3125,
            short_code: 714777,
            account_number: 420200730665,
            description: "bank payment".to_string(),
            provider: "sasapay".to_string(),
            network_code: "63902".to_string(),
        }
    }
}

impl ChannelConfig {
    /// Load channel settings from a TOML string. Absent keys keep their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, PaymentError> {
        toml::from_str(toml_str)
            .map_err(|e| PaymentError::Configuration(format!("Invalid channel config: {}", e)))
    }
}

/// PayHero API configuration
#[derive(Debug, Clone)]
pub struct PayHeroConfig {
    pub credentials: GatewayCredentials,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Outbound request timeout in seconds
    pub timeout_secs: u64,

    pub channel: ChannelConfig,
}

impl PayHeroConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `PAYHERO_API_USERNAME`
    /// - `PAYHERO_API_PASSWORD`
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PaymentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let (username, password) = match (get("PAYHERO_API_USERNAME"), get("PAYHERO_API_PASSWORD")) {
            (Some(username), Some(password)) => (username, password),
            _ => {
                return Err(PaymentError::Configuration(
                    "PAYHERO_API_USERNAME and PAYHERO_API_PASSWORD must be set".to_string(),
                ))
            }
        };

        // A zero timeout would fail every gateway call
        let timeout_secs = match get("PAYHERO_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|&secs| secs > 0)
                .ok_or_else(|| {
                    PaymentError::Configuration(format!(
                        "PAYHERO_TIMEOUT_SECS must be a positive whole number of seconds, got {:?}",
                        raw
                    ))
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            credentials: GatewayCredentials::new(username, password),
            api_base_url: get("PAYHERO_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            timeout_secs,
            channel: ChannelConfig::default(),
        })
    }

    /// Create config with explicit credentials (for testing)
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: GatewayCredentials::new(username, password),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            channel: ChannelConfig::default(),
        }
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        self.credentials.basic_auth()
    }

    /// Payment creation endpoint
    pub fn payments_url(&self) -> String {
        format!("{}/api/v2/payments", self.api_base_url.trim_end_matches('/'))
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: replace channel settings
    pub fn with_channel(mut self, channel: ChannelConfig) -> Self {
        self.channel = channel;
        self
    }
}
