//! # chipin-gateway
//!
//! Standalone server for CHIP checkout redirects and payment callbacks.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export CHIPIN_API_KEY=...
//! export CHIPIN_BRAND_ID=...
//! export CHIPIN_WEBHOOK_SECRET=...
//!
//! # Run the server
//! chipin-gateway
//! ```

use chipin_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let prefix = state.config.route_prefix.clone();

    info!("Environment: {}", state.config.environment);
    info!("CHIP mode: {}", state.gateway_mode());
    info!(
        "Webhook verification: {}",
        if state.callbacks.verifier().is_enforced() {
            "enforced"
        } else {
            "DISABLED"
        }
    );

    let callback_url = state.config.urls().callback_url();
    let is_prod = state.config.is_production();

    // Create router
    let app = routes::create_router(state);

    info!("chipin-gateway {} starting on http://{}", env!("CARGO_PKG_VERSION"), addr);

    if !is_prod {
        info!("Checkout: POST http://{}{}/checkout", addr, prefix);
        info!("Callback URL sent to CHIP: {}", callback_url);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
