//! # Routes
//!
//! Axum router configuration for the payment API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue,
    },
    routing::{any, get},
    Router,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

/// Paths the initiation handler answers on
pub const PAYMENT_PATHS: &[&str] = &[
    "/",
    "/initiate-payment",
    "/.netlify/functions/initiate-payment",
];

/// Create the main application router
///
/// Routes:
/// - GET  /health - Health check
/// - ANY  /, /initiate-payment, /.netlify/functions/initiate-payment -
///   payment initiation (POST, OPTIONS preflight; other methods 405)
pub fn create_router(state: AppState) -> Router {
    let mut payment_routes = Router::new();
    for path in PAYMENT_PATHS {
        payment_routes = payment_routes.route(path, any(handlers::initiate_payment));
    }

    // Every payment response carries the same permissive CORS headers,
    // including errors and the preflight answer.
    let payment_routes = payment_routes
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(payment_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
