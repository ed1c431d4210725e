//! # Request Handlers
//!
//! Axum request handlers for the payment API.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use pay_core::{InitiatedPayment, PaymentError, PaymentOrder, PaymentResult};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use tracing::{debug, error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Initiate payment request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatePaymentRequest {
    /// Payer's phone number (required)
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Caller identifier, logged only
    #[serde(default)]
    pub user_id: Option<Value>,
    /// Amount (defaults to 75)
    #[serde(default)]
    pub amount: Option<Number>,
    /// Description (defaults to "SurvayPay Account Activation")
    #[serde(default)]
    pub description: Option<String>,
}

impl InitiatePaymentRequest {
    /// Validate and turn into an order bound for `callback_url`.
    ///
    /// A blank phone number counts as missing; otherwise it is forwarded as sent.
    pub fn into_order(self, callback_url: String) -> PaymentResult<PaymentOrder> {
        let phone_number = self
            .phone_number
            .filter(|p| !p.trim().is_empty())
            .ok_or(PaymentError::MissingField {
                field: "phoneNumber",
            })?;

        let mut order = PaymentOrder::new(phone_number, callback_url);
        if let Some(amount) = self.amount {
            order = order.with_amount(amount);
        }
        if let Some(description) = self.description {
            order = order.with_description(description);
        }
        if let Some(user_id) = self.user_id {
            order = order.with_user_id(user_id);
        }
        Ok(order)
    }
}

/// Normalized response envelope returned for every payment request
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PaymentData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// Identifiers for a successfully initiated payment
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    pub external_reference: String,
    pub checkout_request_id: String,
}

impl PaymentResponse {
    pub fn initiated(payment: &InitiatedPayment) -> Self {
        Self {
            success: true,
            message: "Payment initiated successfully".to_string(),
            data: Some(PaymentData {
                external_reference: payment.external_reference.to_string(),
                checkout_request_id: payment.checkout_request_id.clone(),
            }),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: None,
        }
    }

    pub fn with_error(mut self, error: Value) -> Self {
        self.error = Some(error);
        self
    }
}

fn payment_error_to_response(err: &PaymentError) -> (StatusCode, Json<PaymentResponse>) {
    let body = match err {
        PaymentError::Configuration(_) => {
            PaymentResponse::failure("Server configuration error: Missing API credentials.")
        }
        PaymentError::MethodNotAllowed { .. } => PaymentResponse::failure("Method not allowed"),
        PaymentError::MissingField {
            field: "phoneNumber",
        } => PaymentResponse::failure("Phone number is required"),
        PaymentError::MissingField { field } => {
            PaymentResponse::failure(format!("{} is required", field))
        }
        PaymentError::InvalidRequest(_) => {
            PaymentResponse::failure("Invalid request body").with_error(err.detail())
        }
        _ => PaymentResponse::failure("Failed to initiate payment").with_error(err.detail()),
    };

    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "payhero-initiate",
        "version": env!("CARGO_PKG_VERSION"),
        "gateway_configured": state.gateway.is_configured()
    }))
}

/// Initiate a payment.
///
/// `OPTIONS` answers the CORS preflight with an empty 200; `POST` submits the
/// payment; anything else is 405. The body is only read for `POST`.
#[instrument(skip(state, request), fields(method = %request.method()))]
pub async fn initiate_payment(State(state): State<AppState>, request: Request) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    match process_payment(&state, request).await {
        Ok(initiated) => {
            info!(
                "Payment initiated: external_reference={}, checkout_request_id={}",
                initiated.external_reference, initiated.checkout_request_id
            );
            (StatusCode::OK, Json(PaymentResponse::initiated(&initiated))).into_response()
        }
        Err(err) => {
            match &err {
                PaymentError::Configuration(reason) => {
                    error!("Server configuration error: {}", reason)
                }
                e if e.is_upstream() => {
                    error!("Payment initiation error: {} detail={}", e, e.detail())
                }
                e => warn!("Rejected payment request: {}", e),
            }
            payment_error_to_response(&err).into_response()
        }
    }
}

async fn process_payment(state: &AppState, request: Request) -> PaymentResult<InitiatedPayment> {
    if request.method() != Method::POST {
        return Err(PaymentError::MethodNotAllowed {
            method: request.method().to_string(),
        });
    }

    let strategy = state.gateway.strategy()?;

    let body = Bytes::from_request(request, state)
        .await
        .map_err(|e| PaymentError::InvalidRequest(e.body_text()))?;

    let request: InitiatePaymentRequest = serde_json::from_slice(&body)
        .map_err(|e| PaymentError::InvalidRequest(e.to_string()))?;

    let order = request.into_order(state.callback_url())?;

    debug!(
        "Initiating payment: provider={}, external_reference={}, amount={}, description={:?}, user_id={:?}",
        strategy.provider_name(),
        order.external_reference,
        order.amount,
        order.description,
        order.user_id
    );

    strategy.initiate_payment(&order).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> InitiatePaymentRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let order = parse(json!({"phoneNumber": "0712345678"}))
            .into_order("https://example.com/cb".to_string())
            .unwrap();

        assert_eq!(order.phone_number, "0712345678");
        assert_eq!(order.amount, Number::from(75));
        assert_eq!(order.description, "SurvayPay Account Activation");
        assert_eq!(order.callback_url, "https://example.com/cb");
    }

    #[test]
    fn test_request_overrides() {
        let order = parse(json!({
            "phoneNumber": "0712345678",
            "userId": 17,
            "amount": 120.5,
            "description": "Renewal"
        }))
        .into_order("https://example.com/cb".to_string())
        .unwrap();

        assert_eq!(order.amount.as_f64(), Some(120.5));
        assert_eq!(order.description, "Renewal");
        assert_eq!(order.user_id, Some(json!(17)));
    }

    #[test]
    fn test_missing_phone_number() {
        for body in [json!({}), json!({"phoneNumber": null}), json!({"phoneNumber": "  "})] {
            let err = parse(body)
                .into_order("https://example.com/cb".to_string())
                .unwrap_err();
            assert!(matches!(err, PaymentError::MissingField { field: "phoneNumber" }));
        }
    }

    #[test]
    fn test_phone_number_forwarded_verbatim() {
        let order = parse(json!({"phoneNumber": " 0712345678 "}))
            .into_order("https://example.com/cb".to_string())
            .unwrap();

        assert_eq!(order.phone_number, " 0712345678 ");
    }

    #[test]
    fn test_error_envelopes() {
        let (status, Json(body)) = payment_error_to_response(&PaymentError::MissingField {
            field: "phoneNumber",
        });
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Phone number is required");
        assert!(!body.success);
        assert!(body.error.is_none());

        let (status, Json(body)) =
            payment_error_to_response(&PaymentError::Configuration("missing".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Server configuration error: Missing API credentials.");

        let (status, Json(body)) = payment_error_to_response(&PaymentError::ProviderError {
            provider: "payhero".into(),
            status: 402,
            message: "HTTP 402".into(),
            detail: Some(json!({"error": "insufficient funds"})),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Failed to initiate payment");
        assert_eq!(body.error, Some(json!({"error": "insufficient funds"})));
    }

    #[test]
    fn test_success_envelope_shape() {
        let payment = InitiatedPayment {
            external_reference: pay_core::ExternalReference::generate(),
            checkout_request_id: "abc123".into(),
            status: None,
            provider_reference: None,
        };

        let value = serde_json::to_value(PaymentResponse::initiated(&payment)).unwrap();

        assert_eq!(value["success"], json!(true));
        assert_eq!(value["data"]["checkoutRequestId"], json!("abc123"));
        assert_eq!(
            value["data"]["externalReference"],
            json!(payment.external_reference.as_str())
        );
        assert!(value.get("error").is_none());
    }
}
