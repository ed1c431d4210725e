//! # Payment Strategy Trait
//!
//! Strategy pattern trait for payment gateways.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PaymentStrategy (trait)                  │
//! │  ├── initiate_payment()                                     │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                   ┌────────┴────────┐
//!                   │ PayHeroStrategy │
//!                   └─────────────────┘
//! ```

use crate::error::PaymentResult;
use crate::payment::{InitiatedPayment, PaymentOrder};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment gateway implementations.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Submit a payment to the gateway.
    ///
    /// Exactly one outbound request is made; failures are returned as-is
    /// and never retried.
    async fn initiate_payment(&self, order: &PaymentOrder) -> PaymentResult<InitiatedPayment>;

    /// Get the provider name (for logging and responses).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a boxed payment strategy (dynamic dispatch)
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;

/// Public URLs the gateway calls back into
#[derive(Debug, Clone)]
pub struct CallbackUrls {
    /// Public base URL of the deployment (e.g., "https://survaypay75new.netlify.app")
    pub base_url: String,
    /// Callback receiver path
    pub callback_path: String,
}

impl CallbackUrls {
    pub const DEFAULT_BASE_URL: &'static str = "https://survaypay75new.netlify.app";
    pub const DEFAULT_CALLBACK_PATH: &'static str = "/.netlify/functions/payment-callback";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            callback_path: Self::DEFAULT_CALLBACK_PATH.to_string(),
        }
    }

    /// Builder: set callback path
    pub fn with_callback_path(mut self, path: impl Into<String>) -> Self {
        self.callback_path = path.into();
        self
    }

    pub fn callback_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.callback_path.starts_with('/') {
            format!("{}{}", base, self.callback_path)
        } else {
            format!("{}/{}", base, self.callback_path)
        }
    }
}

impl Default for CallbackUrls {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}
