//! # pay-core
//!
//! Core types and traits for the payment initiation service.
//!
//! This crate provides:
//! - `PaymentStrategy` trait for implementing payment gateways
//! - `PaymentOrder`, `ExternalReference`, and `InitiatedPayment` for the initiation flow
//! - `CallbackUrls` for the gateway's asynchronous result callback
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{CallbackUrls, PaymentOrder, PaymentStrategy};
//!
//! let urls = CallbackUrls::default();
//! let order = PaymentOrder::new("0712345678", urls.callback_url());
//!
//! let initiated = strategy.initiate_payment(&order).await?;
//! println!("checkout request: {}", initiated.checkout_request_id);
//! ```

pub mod error;
pub mod payment;
pub mod strategy;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use payment::{ExternalReference, InitiatedPayment, PaymentOrder};
pub use strategy::{BoxedPaymentStrategy, CallbackUrls, PaymentStrategy};
