//! # Gateway Configuration
//!
//! Configuration management for the CHIP integration.
//! Secrets are loaded from environment variables once at startup and the
//! resulting `GatewayConfig` is passed explicitly to the client.

use chipin_core::{ChipError, ChipResult};
use std::fmt;
use std::time::Duration;

/// Default CHIP API base URL
pub const DEFAULT_BASE_URL: &str = "https://gate.chip-in.asia/api/v1/";

/// Account mode. Informational only: CHIP selects sandbox or production
/// from the API key, not from the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatewayMode {
    #[default]
    Sandbox,
    Production,
}

impl GatewayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayMode::Sandbox => "sandbox",
            GatewayMode::Production => "production",
        }
    }

    fn parse(value: &str) -> ChipResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "sandbox" => Ok(GatewayMode::Sandbox),
            "production" | "live" => Ok(GatewayMode::Production),
            other => Err(ChipError::Configuration(format!(
                "CHIPIN_MODE must be sandbox or production, got {}",
                other
            ))),
        }
    }
}

impl fmt::Display for GatewayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CHIP API configuration
#[derive(Clone)]
pub struct GatewayConfig {
    /// API base URL, always ending with `/`
    pub base_url: String,

    /// Secret API key, sent as a bearer token
    pub api_key: String,

    /// Brand ID injected into purchase requests that lack one
    pub brand_id: Option<String>,

    /// Shared secret expected in the callback signature header
    pub webhook_secret: Option<String>,

    pub mode: GatewayMode,

    /// Per-request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `CHIPIN_API_KEY`
    ///
    /// Optional:
    /// - `CHIPIN_BRAND_ID`
    /// - `CHIPIN_MODE` (`sandbox` or `production`)
    /// - `CHIPIN_BASE_URL`
    /// - `CHIPIN_WEBHOOK_SECRET`
    /// - `CHIPIN_TIMEOUT_SECS`
    pub fn from_env() -> ChipResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ChipResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = var("CHIPIN_API_KEY")
            .ok_or_else(|| ChipError::Configuration("CHIPIN_API_KEY not set".to_string()))?;

        let mode = match var("CHIPIN_MODE") {
            Some(mode) => GatewayMode::parse(&mode)?,
            None => GatewayMode::default(),
        };

        let timeout = match var("CHIPIN_TIMEOUT_SECS") {
            Some(secs) => {
                let secs: u64 = secs.trim().parse().map_err(|_| {
                    ChipError::Configuration(
                        "CHIPIN_TIMEOUT_SECS must be a whole number of seconds".to_string(),
                    )
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let mut config = Self::new(api_key).with_mode(mode);
        config.brand_id = var("CHIPIN_BRAND_ID");
        config.webhook_secret = var("CHIPIN_WEBHOOK_SECRET");
        config.timeout = timeout;

        if let Some(base_url) = var("CHIPIN_BASE_URL") {
            config = config.with_base_url(base_url);
        }

        Ok(config)
    }

    /// Create config with the default base URL and no optional settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            brand_id: None,
            webhook_secret: None,
            mode: GatewayMode::default(),
            timeout: None,
        }
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Absolute URL for an API endpoint such as `purchases/`
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    pub fn is_production(&self) -> bool {
        self.mode == GatewayMode::Production
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.base_url = url;
        self
    }

    pub fn with_brand_id(mut self, brand_id: impl Into<String>) -> Self {
        self.brand_id = Some(brand_id.into());
        self
    }

    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    pub fn with_mode(mut self, mode: GatewayMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// Keeps the API key and webhook secret out of logs
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("brand_id", &self.brand_id)
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("mode", &self.mode)
            .field("timeout", &self.timeout)
            .finish()
    }
}
