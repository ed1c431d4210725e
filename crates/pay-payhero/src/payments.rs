//! # PayHero Payments
//!
//! Implementation of the PayHero v2 payment creation API.
//! A payment is pushed to the payer's phone; completion arrives later on
//! the configured callback URL.

use crate::config::PayHeroConfig;
use async_trait::async_trait;
use pay_core::{InitiatedPayment, PaymentError, PaymentOrder, PaymentResult, PaymentStrategy};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "payhero";

/// PayHero payment strategy
pub struct PayHeroStrategy {
    config: PayHeroConfig,
    client: Client,
}

impl PayHeroStrategy {
    /// Create a new PayHero strategy
    pub fn new(config: PayHeroConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = PayHeroConfig::from_env()?;
        Self::new(config)
    }

    /// Merge the order with the fixed channel settings
    fn build_payload<'a>(&'a self, order: &'a PaymentOrder) -> PayHeroPaymentRequest<'a> {
        let channel = &self.config.channel;
        PayHeroPaymentRequest {
            amount: &order.amount,
            phone_number: &order.phone_number,
            channel_type: &channel.channel_type,
            channel_id: channel.channel_id,
            short_code: channel.short_code,
            account_number: channel.account_number,
            description: &channel.description,
            provider: &channel.provider,
            network_code: &channel.network_code,
            external_reference: order.external_reference.as_str(),
            callback_url: &order.callback_url,
        }
    }
}

#[async_trait]
impl PaymentStrategy for PayHeroStrategy {
    #[instrument(skip(self, order), fields(external_reference = %order.external_reference))]
    async fn initiate_payment(&self, order: &PaymentOrder) -> PaymentResult<InitiatedPayment> {
        let payload = self.build_payload(order);
        let url = self.config.payments_url();

        debug!(
            "Submitting PayHero payment: amount={}, channel_id={}, callback_url={}",
            payload.amount, payload.channel_id, payload.callback_url
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .json(&payload)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("PayHero API error: status={}, body={}", status, body);

            return Err(PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                message: format!("HTTP {}", status),
                detail: body_detail(&body),
            });
        }

        let payment_response: PayHeroPaymentResponse =
            serde_json::from_str(&body).map_err(|e| PaymentError::MalformedResponse {
                provider: PROVIDER.to_string(),
                message: format!("Failed to parse PayHero response: {}", e),
                detail: body_detail(&body),
            })?;

        let checkout_request_id = payment_response
            .checkout_request_id
            .as_ref()
            .and_then(checkout_id_text)
            .ok_or_else(|| PaymentError::MalformedResponse {
                provider: PROVIDER.to_string(),
                message: "Response did not include CheckoutRequestID".to_string(),
                detail: body_detail(&body),
            })?;

        info!(
            "Initiated PayHero payment: checkout_request_id={}, status={:?}",
            checkout_request_id, payment_response.status
        );

        Ok(InitiatedPayment {
            external_reference: order.external_reference.clone(),
            checkout_request_id,
            status: payment_response.status,
            provider_reference: payment_response.reference,
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Gateway body as JSON when it parses, otherwise as text. Empty bodies carry no detail.
fn body_detail(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())))
}

/// The gateway sends `CheckoutRequestID` as a string or a bare number.
fn checkout_id_text(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// =============================================================================
// PayHero API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct PayHeroPaymentRequest<'a> {
    amount: &'a Number,
    phone_number: &'a str,
    channel_type: &'a str,
    channel_id: u64,
    short_code: u64,
    account_number: u64,
    description: &'a str,
    provider: &'a str,
    network_code: &'a str,
    external_reference: &'a str,
    callback_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct PayHeroPaymentResponse {
    #[serde(rename = "CheckoutRequestID", default)]
    checkout_request_id: Option<Value>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChannelConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn strategy_for(server_uri: &str) -> PayHeroStrategy {
        let config = PayHeroConfig::new("user", "pass").with_api_base_url(server_uri);
        PayHeroStrategy::new(config).unwrap()
    }

    fn order() -> PaymentOrder {
        PaymentOrder::new("0712345678", "https://example.com/.netlify/functions/payment-callback")
    }

    #[test]
    fn test_payload_merges_channel_and_order() {
        let strategy = PayHeroStrategy::new(PayHeroConfig::new("user", "pass")).unwrap();
        let order = order().with_description("ignored by the gateway");

        let payload = serde_json::to_value(strategy.build_payload(&order)).unwrap();

        assert_eq!(
            payload,
            json!({
                "amount": 75,
                "phone_number": "0712345678",
                "channel_type": "bank",
                "channel_id": 3125,
                "short_code": 714777,
                "account_number": 420200730665u64,
                "description": "bank payment",
                "provider": "sasapay",
                "network_code": "63902",
                "external_reference": order.external_reference.as_str(),
                "callback_url": "https://example.com/.netlify/functions/payment-callback",
            })
        );
    }

    #[test]
    fn test_payload_uses_custom_channel() {
        let channel = ChannelConfig {
            channel_id: 9,
            ..ChannelConfig::default()
        };
        let strategy =
            PayHeroStrategy::new(PayHeroConfig::new("user", "pass").with_channel(channel)).unwrap();
        let order = order();

        assert_eq!(strategy.build_payload(&order).channel_id, 9);
    }

    #[test]
    fn test_body_detail() {
        assert_eq!(body_detail(""), None);
        assert_eq!(body_detail(r#"{"a":1}"#), Some(json!({"a": 1})));
        assert_eq!(body_detail("Bad Gateway"), Some(json!("Bad Gateway")));
    }

    #[tokio::test]
    async fn test_initiate_payment_success() {
        let server = MockServer::start().await;
        let order = order();

        Mock::given(method("POST"))
            .and(path("/api/v2/payments"))
            .and(header("Authorization", "Basic dXNlcjpwYXNz"))
            .and(header("Content-Type", "application/json"))
            .and(body_partial_json(json!({
                "phone_number": "0712345678",
                "amount": 75,
                "channel_id": 3125,
                "external_reference": order.external_reference.as_str(),
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "status": "QUEUED",
                "reference": "E8UWT7CLUW",
                "CheckoutRequestID": "abc123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let initiated = strategy_for(&server.uri())
            .initiate_payment(&order)
            .await
            .unwrap();

        assert_eq!(initiated.checkout_request_id, "abc123");
        assert_eq!(initiated.external_reference, order.external_reference);
        assert_eq!(initiated.status.as_deref(), Some("QUEUED"));
        assert_eq!(initiated.provider_reference.as_deref(), Some("E8UWT7CLUW"));
    }

    #[test]
    fn test_checkout_id_text() {
        assert_eq!(checkout_id_text(&json!("abc123")), Some("abc123".to_string()));
        assert_eq!(checkout_id_text(&json!(12345)), Some("12345".to_string()));
        assert_eq!(checkout_id_text(&json!(null)), None);
        assert_eq!(checkout_id_text(&json!({"id": 1})), None);
    }

    #[tokio::test]
    async fn test_initiate_payment_numeric_checkout_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v2/payments"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"CheckoutRequestID": 12345})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let initiated = strategy_for(&server.uri())
            .initiate_payment(&order())
            .await
            .unwrap();

        assert_eq!(initiated.checkout_request_id, "12345");
    }

    #[tokio::test]
    async fn test_initiate_payment_gateway_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v2/payments"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "insufficient funds"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = strategy_for(&server.uri())
            .initiate_payment(&order())
            .await
            .unwrap_err();

        match &err {
            PaymentError::ProviderError { status, detail, .. } => {
                assert_eq!(*status, 400);
                assert_eq!(detail, &Some(json!({"error": "insufficient funds"})));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_initiate_payment_missing_checkout_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v2/payments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let err = strategy_for(&server.uri())
            .initiate_payment(&order())
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::MalformedResponse { .. }));
        assert_eq!(err.detail(), json!({"success": true}));
    }

    #[tokio::test]
    async fn test_initiate_payment_non_json_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v2/payments"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let err = strategy_for(&server.uri())
            .initiate_payment(&order())
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::MalformedResponse { .. }));
        assert_eq!(err.detail(), json!("<html>ok</html>"));
    }

    #[tokio::test]
    async fn test_initiate_payment_network_error() {
        // Nothing listens on port 1
        let strategy = strategy_for("http://127.0.0.1:1");

        let err = strategy.initiate_payment(&order()).await.unwrap_err();

        assert!(matches!(err, PaymentError::NetworkError(_)));
        assert!(err.is_upstream());
    }
}
