//! # Payment Types
//!
//! Payment order and initiation result types.

use crate::error::PaymentError;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

/// Caller-generated token correlating an initiation with its callback.
///
/// Format: `INV-<epoch millis>-<0..=999>`. Uniqueness is best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalReference(String);

impl ExternalReference {
    pub const PREFIX: &'static str = "INV";

    /// Generate a reference from the current time and a random suffix
    pub fn generate() -> Self {
        let suffix = rand::thread_rng().gen_range(0..1000);
        Self::at(Utc::now(), suffix)
    }

    /// Build a reference from an explicit timestamp and suffix
    pub fn at(timestamp: DateTime<Utc>, suffix: u16) -> Self {
        Self(format!(
            "{}-{}-{}",
            Self::PREFIX,
            timestamp.timestamp_millis(),
            suffix
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ExternalReference {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PaymentError::InvalidRequest(format!("Invalid external reference: {}", s));

        let mut parts = s.splitn(3, '-');
        if parts.next() != Some(Self::PREFIX) {
            return Err(invalid());
        }
        let millis = parts.next().ok_or_else(invalid)?;
        let suffix = parts.next().ok_or_else(invalid)?;

        let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(millis) || !all_digits(suffix) {
            return Err(invalid());
        }
        match suffix.parse::<u16>() {
            Ok(n) if n < 1000 => Ok(Self(s.to_string())),
            _ => Err(invalid()),
        }
    }
}

/// A validated payment to be initiated with a gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrder {
    /// Correlation token sent to the gateway
    pub external_reference: ExternalReference,

    /// Payer's phone number
    pub phone_number: String,

    /// Amount to charge, passed through as supplied
    pub amount: Number,

    /// Client-facing description
    pub description: String,

    /// Opaque caller identifier (not sent to the gateway)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,

    /// Where the gateway posts the payment result
    pub callback_url: String,
}

impl PaymentOrder {
    pub const DEFAULT_AMOUNT: u64 = 75;
    pub const DEFAULT_DESCRIPTION: &'static str = "SurvayPay Account Activation";

    /// Create an order with a fresh external reference and default amount/description
    pub fn new(phone_number: impl Into<String>, callback_url: impl Into<String>) -> Self {
        Self {
            external_reference: ExternalReference::generate(),
            phone_number: phone_number.into(),
            amount: Number::from(Self::DEFAULT_AMOUNT),
            description: Self::DEFAULT_DESCRIPTION.to_string(),
            user_id: None,
            callback_url: callback_url.into(),
        }
    }

    /// Set amount
    pub fn with_amount(mut self, amount: Number) -> Self {
        self.amount = amount;
        self
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set caller identifier
    pub fn with_user_id(mut self, user_id: Value) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// Result of a successful initiation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatedPayment {
    /// Our correlation token
    pub external_reference: ExternalReference,

    /// Gateway's identifier for the payment attempt
    pub checkout_request_id: String,

    /// Gateway-reported status (e.g., "QUEUED")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Gateway's own reference, if returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_reference: Option<String>,
}
