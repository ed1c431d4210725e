//! # pay-api
//!
//! HTTP API layer for the PayHero payment initiation service.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The payment initiation endpoint with CORS preflight handling
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/`, `/initiate-payment`, `/.netlify/functions/initiate-payment` | Initiate payment |
//! | OPTIONS | same as above | CORS preflight |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, Gateway};
