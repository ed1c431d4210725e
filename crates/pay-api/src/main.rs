//! # PayHero Initiate
//!
//! Payment initiation service in front of the PayHero gateway.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export PAYHERO_API_USERNAME=...
//! export PAYHERO_API_PASSWORD=...
//! export URL=https://your-deployment.example.com
//!
//! # Run the server
//! payhero-initiate
//! ```

use pay_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Gateway configured: {}", state.gateway.is_configured());
    info!("Callback URL: {}", state.callback_url());

    let app = routes::create_router(state);

    info!("payhero-initiate {} listening on http://{}", env!("CARGO_PKG_VERSION"), addr);

    if !is_prod {
        info!("Health: GET http://{}/health", addr);
        info!("Initiate: POST http://{}/initiate-payment", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `LOG_FORMAT=json` switches to structured JSON output
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
