//! # Application State
//!
//! Shared state for the Axum application.
//! Built once at start-up and read-only afterwards.

use pay_core::{BoxedPaymentStrategy, CallbackUrls, PaymentError, PaymentResult};
use pay_payhero::{ChannelConfig, PayHeroConfig, PayHeroStrategy};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public base URL used to build the callback URL
    pub base_url: String,
    /// Callback receiver path
    pub callback_path: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup. `URL` takes precedence over `BASE_URL`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: get("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080),
            base_url: get("URL")
                .or_else(|| get("BASE_URL"))
                .unwrap_or_else(|| CallbackUrls::DEFAULT_BASE_URL.to_string()),
            callback_path: get("CALLBACK_PATH")
                .unwrap_or_else(|| CallbackUrls::DEFAULT_CALLBACK_PATH.to_string()),
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn callback_urls(&self) -> CallbackUrls {
        CallbackUrls::new(&self.base_url).with_callback_path(&self.callback_path)
    }
}

/// Payment gateway availability, decided once at start-up
#[derive(Clone)]
pub enum Gateway {
    Ready(BoxedPaymentStrategy),
    /// Credentials were missing; every payment request answers 500
    Unconfigured { reason: Arc<str> },
}

impl Gateway {
    /// Get the strategy, or the configuration error if there is none
    pub fn strategy(&self) -> PaymentResult<&BoxedPaymentStrategy> {
        match self {
            Gateway::Ready(strategy) => Ok(strategy),
            Gateway::Unconfigured { reason } => {
                Err(PaymentError::Configuration(reason.to_string()))
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Gateway::Ready(_))
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment gateway
    pub gateway: Gateway,
    /// Callback URLs
    pub urls: CallbackUrls,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState with the PayHero strategy
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let channel = load_channel_config()?;

        let gateway = match PayHeroConfig::from_env() {
            Ok(payhero) => {
                let strategy = PayHeroStrategy::new(payhero.with_channel(channel))
                    .map_err(|e| anyhow::anyhow!("Failed to initialize PayHero: {}", e))?;
                Gateway::Ready(Arc::new(strategy) as BoxedPaymentStrategy)
            }
            Err(e) => {
                error!("Missing PayHero API credentials: {}", e);
                Gateway::Unconfigured {
                    reason: e.to_string().into(),
                }
            }
        };

        Ok(Self::with_gateway(config, gateway))
    }

    /// Create state around an explicit gateway (for tests and embedding)
    pub fn with_gateway(config: AppConfig, gateway: Gateway) -> Self {
        Self {
            gateway,
            urls: config.callback_urls(),
            config,
        }
    }

    /// Create state around a ready strategy
    pub fn with_strategy(config: AppConfig, strategy: BoxedPaymentStrategy) -> Self {
        Self::with_gateway(config, Gateway::Ready(strategy))
    }

    /// Callback URL sent with every payment
    pub fn callback_url(&self) -> String {
        self.urls.callback_url()
    }
}

/// Load channel settings from config file, falling back to the built-in bank channel
fn load_channel_config() -> anyhow::Result<ChannelConfig> {
    let config_paths = [
        "config/payhero.toml",
        "../config/payhero.toml",
        "../../config/payhero.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let channel = ChannelConfig::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            info!("Loaded channel config from {}: channel_id={}", path, channel.channel_id);
            return Ok(channel);
        }
    }

    warn!("No channel config found, using built-in defaults");
    Ok(ChannelConfig::default())
}
