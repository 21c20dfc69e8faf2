//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the purchase endpoint, the callback processor and server config.

use chipin_client::{
    BoxedCallbackHandler, CallbackProcessor, ChipClient, GatewayConfig, GatewayMode, Purchase,
    WebhookVerifier,
};
use chipin_core::{urls::normalize_prefix, ChipInUrls};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public base URL used to build callback and redirect URLs
    pub base_url: String,
    /// Prefix the CHIP routes are mounted under
    pub route_prefix: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080),
            base_url: lookup("BASE_URL").unwrap_or_else(|| "http://localhost:8080".to_string()),
            route_prefix: normalize_prefix(
                &lookup("CHIPIN_ROUTE_PREFIX").unwrap_or_else(|| "/chipin".to_string()),
            ),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Public URLs of the mounted CHIP routes
    pub fn urls(&self) -> ChipInUrls {
        ChipInUrls::new(&self.base_url, &self.route_prefix)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Purchase endpoint adapter
    pub purchase: Purchase,
    /// Callback verification and dispatch
    pub callbacks: CallbackProcessor,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state from environment variables, without an application
    /// callback handler
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let gateway = GatewayConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load CHIP config: {}", e))?;

        Self::build(config, gateway, None)
    }

    /// Create state from explicit configuration
    pub fn build(
        config: AppConfig,
        gateway: GatewayConfig,
        handler: Option<BoxedCallbackHandler>,
    ) -> anyhow::Result<Self> {
        let verifier = WebhookVerifier::from_secret(gateway.webhook_secret.as_deref());

        if gateway.is_production() && !verifier.is_enforced() {
            tracing::warn!(
                "CHIP is in production mode but CHIPIN_WEBHOOK_SECRET is not set; \
                 payment callbacks are NOT authenticated"
            );
        }

        let client = ChipClient::new(gateway)
            .map_err(|e| anyhow::anyhow!("Failed to initialize CHIP client: {}", e))?;
        let purchase = Purchase::new(client, config.urls());

        let mut callbacks = CallbackProcessor::new(purchase.clone(), verifier);
        if let Some(handler) = handler {
            callbacks = callbacks.with_handler(handler);
        }

        Ok(Self {
            purchase,
            callbacks,
            config,
        })
    }

    pub fn gateway_mode(&self) -> GatewayMode {
        self.purchase.client().config().mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.route_prefix, "/chipin");
        assert!(!config.is_production());
    }

    #[test]
    fn test_app_config_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "3000"),
            ("BASE_URL", "https://shop.example.com"),
            ("CHIPIN_ROUTE_PREFIX", "payments/chip/"),
            ("ENVIRONMENT", "production"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.port, 3000);
        assert_eq!(config.route_prefix, "/payments/chip");
        assert!(config.is_production());
        assert_eq!(
            config.urls().callback_url(),
            "https://shop.example.com/payments/chip/callback"
        );
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            route_prefix: "/chipin".to_string(),
            environment: "test".to_string(),
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_build_state() {
        let gateway = GatewayConfig::new("key_abc").with_webhook_secret("S");
        let state = AppState::build(AppConfig::from_lookup(|_| None), gateway, None).unwrap();

        assert!(state.callbacks.verifier().is_enforced());
        assert!(!state.callbacks.has_handler());
        assert_eq!(state.gateway_mode(), GatewayMode::Sandbox);
    }
}
