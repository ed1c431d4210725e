//! # pay-payhero
//!
//! PayHero payment strategy for the payment initiation service.
//!
//! Payments are created with a single authenticated POST to
//! `/api/v2/payments`; the gateway then prompts the payer and reports the
//! outcome to the callback URL carried in the request.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_core::{CallbackUrls, PaymentOrder, PaymentStrategy};
//! use pay_payhero::PayHeroStrategy;
//!
//! // Reads PAYHERO_API_USERNAME / PAYHERO_API_PASSWORD
//! let strategy = PayHeroStrategy::from_env()?;
//!
//! let order = PaymentOrder::new("0712345678", CallbackUrls::default().callback_url());
//! let initiated = strategy.initiate_payment(&order).await?;
//! ```

pub mod config;
pub mod payments;

// Re-exports
pub use config::{ChannelConfig, GatewayCredentials, PayHeroConfig};
pub use payments::PayHeroStrategy;
